//! Scripted scene for testing and demos

use crate::core::AnchorRecord;
use crate::session::{AnchorScene, Notice, SceneError};
use std::collections::HashSet;

/// In-memory scene that records what the session asked of it
#[derive(Debug, Default)]
pub struct MockScene {
    ready: bool,
    live: Vec<AnchorRecord>,
    notices: Vec<Notice>,
    rejected_ids: HashSet<u32>,
    detach_count: u32,
}

impl MockScene {
    /// Scene with geospatial tracking available
    pub fn tracking() -> Self {
        Self {
            ready: true,
            ..Self::default()
        }
    }

    /// Scene still waiting for geospatial tracking
    pub fn not_tracking() -> Self {
        Self::default()
    }

    pub fn set_tracking(&mut self, ready: bool) {
        self.ready = ready;
    }

    /// Make `materialize` fail for the record with `anchor_id`
    pub fn reject(&mut self, anchor_id: u32) {
        self.rejected_ids.insert(anchor_id);
    }

    pub fn live_anchors(&self) -> &[AnchorRecord] {
        &self.live
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn detach_count(&self) -> u32 {
        self.detach_count
    }
}

impl AnchorScene for MockScene {
    fn is_geospatially_ready(&self) -> bool {
        self.ready
    }

    fn materialize(&mut self, record: &AnchorRecord) -> Result<(), SceneError> {
        if !self.ready {
            return Err(SceneError::NotTracking);
        }
        if self.rejected_ids.contains(&record.id()) {
            return Err(SceneError::MaterializeFailed {
                anchor_id: record.id(),
                reason: "rejected by mock scene".to_string(),
            });
        }
        self.live.push(record.clone());
        Ok(())
    }

    fn detach_all(&mut self) {
        self.live.clear();
        self.detach_count += 1;
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
