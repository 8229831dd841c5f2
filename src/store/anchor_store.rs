//! File-backed anchor store

use crate::codec::{AnchorCodec, JsonAnchorCodec};
use crate::core::AnchorRecord;
use crate::identity::IdAssigner;
use crate::store::{StoreError, StoreResult};
use crate::utils::StoreConfig;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Sole owner of one store file holding a JSON array of anchor records.
///
/// Every operation opens and releases the file within the call. Writes go to a
/// sibling temporary file which is then renamed over the store, so a crash
/// mid-write leaves either the old or the new content. The store is meant to be
/// driven from a single thread; concurrent use of one path is not supported.
#[derive(Debug, Clone)]
pub struct AnchorStore {
    path: PathBuf,
    codec: JsonAnchorCodec,
    durable_writes: bool,
    create_parent_dirs: bool,
}

impl AnchorStore {
    /// Store at `path`. The file is not created until the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let defaults = StoreConfig::default();
        Self {
            path: path.into(),
            codec: JsonAnchorCodec::new(),
            durable_writes: defaults.durable_writes,
            create_parent_dirs: defaults.create_parent_dirs,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        let codec = if config.pretty {
            JsonAnchorCodec::pretty()
        } else {
            JsonAnchorCodec::new()
        };
        Self {
            path: config.store_path(),
            codec,
            durable_writes: config.durable_writes,
            create_parent_dirs: config.create_parent_dirs,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read every persisted record, in file order.
    ///
    /// An empty or blank file is an empty store. A missing file is reported as
    /// [`StoreError::Read`]; callers usually treat that as "no data yet".
    /// Content that is not UTF-8 is a [`StoreError::Decode`].
    pub fn load(&self) -> StoreResult<Vec<AnchorRecord>> {
        let bytes = fs::read(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let content = self.codec.decode_text(bytes).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })?;

        if content.trim().is_empty() {
            debug!(path = %self.path.display(), "anchor store is blank");
            return Ok(Vec::new());
        }

        let records = self
            .codec
            .parse_many(&content)
            .map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;

        debug!(path = %self.path.display(), count = records.len(), "loaded anchors");
        Ok(records)
    }

    /// Replace the whole store with `records`, in the order given.
    ///
    /// Records with non-finite coordinates are refused with
    /// [`StoreError::Encode`] and the file is left untouched.
    pub fn overwrite(&self, records: &[AnchorRecord]) -> StoreResult<()> {
        let content = self.codec.serialize_array(records).map_err(StoreError::Encode)?;
        self.write_atomic(&content)?;
        debug!(path = %self.path.display(), count = records.len(), "wrote anchor store");
        Ok(())
    }

    /// Empty the store. The file afterwards holds `[]`.
    pub fn clear(&self) -> StoreResult<()> {
        self.overwrite(&[])?;
        info!(path = %self.path.display(), "cleared anchor store");
        Ok(())
    }

    /// Add `records` after the persisted ones and rewrite the store.
    ///
    /// A store that cannot be read counts as empty, so the first append to a
    /// new path succeeds. Invalid content is not overwritten; it surfaces as
    /// [`StoreError::Decode`].
    pub fn append(&self, records: &[AnchorRecord]) -> StoreResult<()> {
        let mut combined = match self.load() {
            Ok(existing) => existing,
            Err(error) if error.is_read_failure() => {
                debug!(%error, "starting anchor store from empty");
                Vec::new()
            }
            Err(error) => return Err(error),
        };

        combined.extend_from_slice(records);
        self.overwrite(&combined)?;
        info!(
            path = %self.path.display(),
            appended = records.len(),
            total = combined.len(),
            "appended anchors"
        );
        Ok(())
    }

    /// Number of persisted records. Reads and decodes the whole file.
    pub fn len(&self) -> StoreResult<usize> {
        self.load().map(|records| records.len())
    }

    /// Same cost as [`AnchorStore::len`].
    pub fn is_empty(&self) -> StoreResult<bool> {
        self.len().map(|len| len == 0)
    }

    /// Id counter continuing after the highest persisted id.
    ///
    /// An unreadable store yields a fresh counter; invalid content is an error.
    pub fn id_assigner(&self) -> StoreResult<IdAssigner> {
        match self.load() {
            Ok(records) => Ok(IdAssigner::seeded_from(&records)),
            Err(error) if error.is_read_failure() => Ok(IdAssigner::new()),
            Err(error) => Err(error),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }

    fn write_atomic(&self, content: &str) -> StoreResult<()> {
        if self.create_parent_dirs {
            if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let temp_path = self.temp_path();
        if let Err(source) = write_file(&temp_path, content, self.durable_writes) {
            let _ = fs::remove_file(&temp_path);
            return Err(StoreError::Write { path: temp_path, source });
        }

        fs::rename(&temp_path, &self.path).map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            StoreError::Write {
                path: self.path.clone(),
                source,
            }
        })
    }
}

fn write_file(path: &Path, content: &str, sync: bool) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::identity::{Factory, IdPolicy};
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> AnchorStore {
        AnchorStore::new(dir.path().join("anchors.adb"))
    }

    fn anchor(ids: &mut IdAssigner, resource_id: &str, latitude: f64) -> AnchorRecord {
        AnchorRecord::new(ids, resource_id, "Name").positioned(latitude, 7.5, 10.0, [0.0, 0.0, 0.0, 1.0])
    }

    #[test]
    fn test_new_store_does_not_create_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(!store.exists());
        assert!(!dir.path().join("anchors.adb").exists());
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let error = store.load().unwrap_err();
        assert!(error.is_missing());
    }

    #[test]
    fn test_blank_content_is_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        for content in ["", "   ", "\n\t \n", "[]", " [ ] \n"] {
            fs::write(store.path(), content).unwrap();
            assert!(store.load().unwrap().is_empty(), "content {:?}", content);
        }
    }

    #[test]
    fn test_clear_writes_empty_array() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.clear().unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
        assert!(store.load().unwrap().is_empty());

        store.clear().unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut ids = IdAssigner::new();
        let first = vec![anchor(&mut ids, "1", 45.0), anchor(&mut ids, "2", 46.0)];
        let second = vec![anchor(&mut ids, "3", 47.0)];

        store.overwrite(&first).unwrap();
        assert_eq!(store.load().unwrap(), first);

        store.overwrite(&second).unwrap();
        assert_eq!(store.load().unwrap(), second);
    }

    #[test]
    fn test_append_grows_in_order() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut ids = IdAssigner::new();
        let a = anchor(&mut ids, "a", 45.0);
        let b = anchor(&mut ids, "b", 46.0);

        store.overwrite(&[]).unwrap();
        store.append(&[a.clone()]).unwrap();
        store.append(&[b.clone()]).unwrap();

        assert_eq!(store.load().unwrap(), vec![a, b]);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_append_to_missing_file_creates_it() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut ids = IdAssigner::new();
        let record = anchor(&mut ids, "23", 45.0);

        store.append(&[record.clone()]).unwrap();
        assert!(store.exists());
        assert_eq!(store.load().unwrap(), vec![record]);
    }

    #[test]
    fn test_append_same_record_twice_keeps_both() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut ids = IdAssigner::new();
        let record = anchor(&mut ids, "23", 23.0);

        store.append(&[record.clone()]).unwrap();
        store.append(&[record.clone()]).unwrap();
        assert_eq!(store.load().unwrap(), vec![record.clone(), record]);
    }

    #[test]
    fn test_append_to_blank_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "  \n").unwrap();
        let mut ids = IdAssigner::new();

        store.append(&[anchor(&mut ids, "a", 1.0)]).unwrap();
        assert_eq!(store.len().unwrap(), 1);
    }

    #[test]
    fn test_corrupt_store_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{\"broken\": ").unwrap();
        let mut ids = IdAssigner::new();

        assert!(matches!(store.load(), Err(StoreError::Decode { .. })));
        assert!(matches!(store.append(&[anchor(&mut ids, "a", 1.0)]), Err(StoreError::Decode { .. })));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{\"broken\": ");
    }

    #[test]
    fn test_non_utf8_store_is_not_overwritten() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let original = b"[{\"id\":1,\"name\":\"\xff\xfe\"}]".to_vec();
        fs::write(store.path(), &original).unwrap();
        let mut ids = IdAssigner::new();

        let load_error = store.load().unwrap_err();
        assert!(matches!(
            load_error,
            StoreError::Decode { source: CodecError::InvalidUtf8(_), .. }
        ));
        assert!(!load_error.is_read_failure());

        let result = store.append(&[anchor(&mut ids, "a", 1.0)]);
        assert!(matches!(result, Err(StoreError::Decode { .. })));
        assert_eq!(fs::read(store.path()).unwrap(), original);
        assert!(matches!(store.id_assigner(), Err(StoreError::Decode { .. })));
    }

    #[test]
    fn test_non_finite_record_is_refused() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut ids = IdAssigner::new();
        let good = anchor(&mut ids, "a", 1.0);
        store.append(&[good.clone()]).unwrap();
        let before = fs::read(store.path()).unwrap();

        let mut bad = anchor(&mut ids, "b", 2.0);
        bad.latitude = f64::NAN;
        assert!(matches!(
            store.append(&[bad.clone()]),
            Err(StoreError::Encode(CodecError::NonFinite(_)))
        ));
        assert!(matches!(store.overwrite(&[bad]), Err(StoreError::Encode(_))));

        assert_eq!(fs::read(store.path()).unwrap(), before);
        assert_eq!(store.load().unwrap(), vec![good]);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut ids = IdAssigner::new();

        store.append(&[anchor(&mut ids, "a", 1.0)]).unwrap();
        store.clear().unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["anchors.adb".to_string()]);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = AnchorStore::new(dir.path().join("nested").join("deeper").join("anchors.adb"));

        store.clear().unwrap();
        assert!(store.exists());
    }

    #[test]
    fn test_missing_parent_without_create_is_write_error() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_directory(dir.path().join("absent")).with_create_parent_dirs(false);
        let store = AnchorStore::from_config(&config);

        assert!(matches!(store.clear(), Err(StoreError::Write { .. })));
    }

    #[test]
    fn test_from_config_pretty() {
        let dir = TempDir::new().unwrap();
        let config = StoreConfig::in_directory(dir.path())
            .with_file_name("markers.json")
            .with_pretty(true)
            .with_durable_writes(false);
        let store = AnchorStore::from_config(&config);
        let mut ids = IdAssigner::new();
        let record = anchor(&mut ids, "a", 1.0);

        store.append(&[record.clone()]).unwrap();
        assert_eq!(store.path(), dir.path().join("markers.json"));
        assert!(fs::read_to_string(store.path()).unwrap().contains('\n'));
        assert_eq!(store.load().unwrap(), vec![record]);
    }

    #[test]
    fn test_id_assigner_continues_after_persisted_ids() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.id_assigner().unwrap().produce(), 1);

        let mut ids = IdAssigner::starting_after(10);
        store.append(&[anchor(&mut ids, "a", 1.0), anchor(&mut ids, "b", 2.0)]).unwrap();

        assert_eq!(store.id_assigner().unwrap().produce(), 13);
        assert_eq!(IdPolicy::ProcessScoped.assigner_for(&store.load().unwrap()).produce(), 1);
    }

    #[test]
    fn test_loaded_records_keep_stored_ids() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(
            store.path(),
            r#"[{"id":24,"resourceId":"test","name":"Name","latitude":1.0,"altitude":2.0,"longitude":3.0,"rotation":[]}]"#,
        )
        .unwrap();

        let records = store.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id(), 24);
        assert!(!records[0].is_placed());
    }
}
