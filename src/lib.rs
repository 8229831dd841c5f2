//! Geo Anchor Store
//!
//! Durable persistence for geospatial AR anchors: identity assignment, a JSON
//! codec and a file-backed store that survives application restarts.

pub mod core;
pub mod identity;
pub mod codec;
pub mod store;
pub mod validation;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use crate::core::{AnchorRecord, DEFAULT_STORE_FILE_NAME};
pub use identity::{Factory, IdAssigner, IdPolicy};
pub use codec::{AnchorCodec, CodecError, JsonAnchorCodec};
pub use store::{AnchorStore, StoreError, StoreResult};
pub use validation::ValidationError;
pub use session::{AnchorScene, AnchorSession, MockScene, Notice, SceneError, SessionError};
pub use utils::{ConfigError, StoreConfig};
