//! Collaborator boundary between the AR scene and the anchor store
//!
//! The scene supplies new anchors, asks for persisted anchors once tracking is
//! available, and requests clearing. Everything else stays on its side.

pub mod anchor_session;
pub mod mock;
pub mod scene;

pub use anchor_session::{AnchorSession, SessionError};
pub use mock::MockScene;
pub use scene::{AnchorScene, Notice, SceneError};
