//! Drives the anchor store on behalf of an AR scene

use crate::core::AnchorRecord;
use crate::identity::{IdAssigner, IdPolicy};
use crate::session::{AnchorScene, Notice, SceneError};
use crate::store::{AnchorStore, StoreError};
use crate::validation::{duplicate_ids, validate_placement, validate_shape, ValidationError};
use tracing::{debug, info, warn};

/// Errors surfaced by session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Connects an [`AnchorScene`] to an [`AnchorStore`].
///
/// Persisted anchors are restored on the first frame with geospatial tracking.
/// Each placement is persisted immediately with one store rewrite.
pub struct AnchorSession<S: AnchorScene> {
    store: AnchorStore,
    scene: S,
    ids: IdAssigner,
    id_policy: IdPolicy,
    live: Vec<u32>,
    initialized: bool,
}

impl<S: AnchorScene> AnchorSession<S> {
    pub fn new(store: AnchorStore, scene: S, id_policy: IdPolicy) -> Self {
        Self {
            store,
            scene,
            ids: IdAssigner::new(),
            id_policy,
            live: Vec::new(),
            initialized: false,
        }
    }

    /// Per-frame hook. Restores persisted anchors once tracking is available.
    pub fn on_frame(&mut self) {
        if !self.initialized && self.scene.is_geospatially_ready() {
            self.initialize();
        }
    }

    fn initialize(&mut self) {
        let persisted = self.load_saved_anchors();

        let duplicates = duplicate_ids(&persisted);
        if !duplicates.is_empty() {
            warn!(?duplicates, "persisted anchors share ids");
        }

        self.ids = self.id_policy.assigner_for(&persisted);
        self.initialized = true;

        let restored = persisted.iter().filter(|record| self.restore(record)).count();
        info!(restored, persisted = persisted.len(), "restored anchors");
        self.scene.notify(Notice::Restored { count: restored });
    }

    // Load failures are not fatal: the session continues with no anchors.
    fn load_saved_anchors(&self) -> Vec<AnchorRecord> {
        match self.store.load() {
            Ok(records) => records,
            Err(error) if error.is_missing() => {
                debug!(path = %self.store.path().display(), "no saved anchors yet");
                Vec::new()
            }
            Err(error) => {
                warn!(%error, "unable to load anchors");
                Vec::new()
            }
        }
    }

    fn restore(&mut self, record: &AnchorRecord) -> bool {
        if let Err(error) = validate_shape(record) {
            warn!(%error, "skipping persisted anchor");
            return false;
        }
        match self.scene.materialize(record) {
            Ok(()) => {
                self.live.push(record.id());
                true
            }
            Err(error) => {
                warn!(%error, "skipping persisted anchor");
                false
            }
        }
    }

    /// Place and persist a new anchor.
    ///
    /// Returns `Ok(None)` without touching the store when tracking is not
    /// available. A failed write is reported to the scene and returned; the
    /// anchor stays live for the rest of the run.
    pub fn place(
        &mut self,
        resource_id: impl Into<String>,
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        altitude: f64,
        rotation: [f32; 4],
    ) -> Result<Option<AnchorRecord>, SessionError> {
        if !self.scene.is_geospatially_ready() {
            debug!("tracking unavailable, ignoring placement");
            return Ok(None);
        }
        self.on_frame();

        let record = AnchorRecord::new(&mut self.ids, resource_id, name)
            .positioned(latitude, longitude, altitude, rotation);
        validate_placement(&record)?;

        self.scene.materialize(&record)?;
        self.live.push(record.id());

        if let Err(error) = self.store.append(std::slice::from_ref(&record)) {
            warn!(%error, anchor_id = record.id(), "failed to persist anchor");
            self.scene.notify(Notice::PersistenceFailed { reason: error.to_string() });
            return Err(error.into());
        }

        let heading = record.orientation().map(|q| q.euler_angles().2.to_degrees());
        info!(anchor_id = record.id(), latitude, longitude, altitude, heading, "placed anchor");
        self.scene.notify(Notice::Placed {
            anchor_id: record.id(),
            live_count: self.live.len(),
        });
        Ok(Some(record))
    }

    /// Tear down live anchors and empty the store.
    pub fn clear_all(&mut self) -> Result<(), SessionError> {
        self.scene.detach_all();
        self.live.clear();

        if let Err(error) = self.store.clear() {
            warn!(%error, "failed to clear anchor store");
            self.scene.notify(Notice::PersistenceFailed { reason: error.to_string() });
            return Err(error.into());
        }

        self.scene.notify(Notice::Cleared);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Ids of anchors currently live in the scene
    pub fn live_ids(&self) -> &[u32] {
        &self.live
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn store(&self) -> &AnchorStore {
        &self.store
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }
}
