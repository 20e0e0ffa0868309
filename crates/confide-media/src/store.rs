use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use confide_shared::constants::MAX_MEDIA_SIZE;
use confide_shared::MediaKind;

/// File store for message media, rooted at the application document
/// directory.
///
/// File names are fresh UUIDs rather than content hashes: nothing here
/// needs deduplication, and skipping the hash keeps writes O(1).
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Create a store rooted at `root` and make a best-effort attempt
    /// to create both namespace directories up front.
    pub fn new(root: PathBuf) -> Self {
        let store = Self { root };
        store.ensure_dir(MediaKind::Image);
        store.ensure_dir(MediaKind::Audio);
        store
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding files of the given kind.
    pub fn dir(&self, kind: MediaKind) -> PathBuf {
        self.root.join(kind.dir_name())
    }

    /// Idempotently create the namespace directory. A failed mkdir is
    /// logged and swallowed; the caller degrades to "no media".
    pub fn ensure_dir(&self, kind: MediaKind) {
        let dir = self.dir(kind);
        if let Err(e) = std::fs::create_dir_all(&dir) {
            warn!(path = %dir.display(), error = %e, "Failed to create media directory");
        }
    }

    /// Write `data` under a fresh `{uuid}.{ext}` name and return the
    /// file name, or `None` if the write failed.
    ///
    /// `None` is a hard signal: the caller must not record a message
    /// referencing a file that is not on disk.
    pub fn save(&self, kind: MediaKind, data: &[u8]) -> Option<String> {
        if data.len() > MAX_MEDIA_SIZE {
            warn!(size = data.len(), max = MAX_MEDIA_SIZE, "Media file too large, not saving");
            return None;
        }

        self.ensure_dir(kind);

        let file_name = format!("{}.{}", Uuid::new_v4(), kind.extension());
        let path = self.dir(kind).join(&file_name);

        match std::fs::write(&path, data) {
            Ok(()) => {
                debug!(file = %file_name, size = data.len(), "Saved media file");
                Some(file_name)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to save media file");
                None
            }
        }
    }

    /// Read a stored file. `None` if the name is invalid or the file
    /// is missing or unreadable; the caller renders a placeholder.
    pub fn load(&self, kind: MediaKind, file_name: &str) -> Option<Vec<u8>> {
        let path = self.file_path(kind, file_name)?;
        match std::fs::read(&path) {
            Ok(data) => Some(data),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Failed to read media file");
                None
            }
        }
    }

    /// Whether a file with this name exists in the namespace.
    pub fn contains(&self, kind: MediaKind, file_name: &str) -> bool {
        self.file_path(kind, file_name)
            .is_some_and(|p| p.is_file())
    }

    /// Best-effort removal. A stale file is a leak, not a correctness
    /// violation, so failure is logged and swallowed.
    pub fn delete(&self, kind: MediaKind, file_name: &str) {
        let Some(path) = self.file_path(kind, file_name) else {
            return;
        };
        match std::fs::remove_file(&path) {
            Ok(()) => debug!(file = %file_name, "Deleted media file"),
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to delete media file"),
        }
    }

    /// Resolve a file name inside the namespace, rejecting anything
    /// that could escape it. Message content comes from the database,
    /// so a tampered row must not turn into a path traversal.
    fn file_path(&self, kind: MediaKind, file_name: &str) -> Option<PathBuf> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..")
        {
            warn!(file = %file_name, "Rejected media file name");
            return None;
        }
        Some(self.dir(kind).join(file_name))
    }
}
