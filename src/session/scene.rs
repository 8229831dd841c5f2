//! Boundary to the AR scene that displays anchors

use crate::core::AnchorRecord;
use std::fmt;

/// The rendering/UI layer as seen by an [`AnchorSession`](super::AnchorSession).
///
/// The store never talks to the scene directly; the session decides when
/// persisted records become live anchors and when live anchors are torn down.
pub trait AnchorScene {
    /// Whether geospatial tracking is currently good enough to place anchors
    fn is_geospatially_ready(&self) -> bool;

    /// Turn a record into a live anchor
    fn materialize(&mut self, record: &AnchorRecord) -> Result<(), SceneError>;

    /// Tear down every live anchor
    fn detach_all(&mut self);

    /// Show a user-visible notice
    fn notify(&mut self, notice: Notice);
}

/// User-visible outcomes reported to the scene
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Persisted anchors were restored at startup
    Restored { count: usize },
    /// A new anchor was placed and persisted
    Placed { anchor_id: u32, live_count: usize },
    /// All anchors were removed
    Cleared,
    /// The store could not be written
    PersistenceFailed { reason: String },
}

/// Errors raised by the scene while materializing anchors
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// Tracking was lost between the readiness check and the call
    NotTracking,
    /// The scene refused or failed to create the anchor
    MaterializeFailed { anchor_id: u32, reason: String },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::NotTracking => write!(f, "Geospatial tracking is not available"),
            SceneError::MaterializeFailed { anchor_id, reason } => {
                write!(f, "Failed to materialize anchor {}: {}", anchor_id, reason)
            }
        }
    }
}

impl std::error::Error for SceneError {}
