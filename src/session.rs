use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Allocates request-scoped scratch directories under a fixed root
#[derive(Debug, Clone)]
pub struct SessionManager {
    scratch_root: PathBuf,
}

/// A scratch directory owned by exactly one request.
///
/// The directory tree is removed when the session is dropped, so every
/// handler exit path cleans up.
#[derive(Debug)]
pub struct UploadSession {
    id: String,
    dir: PathBuf,
    destroyed: bool,
}

impl SessionManager {
    pub fn new(scratch_root: impl Into<PathBuf>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
        }
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    /// Create a fresh, uniquely named directory.
    ///
    /// Format: label_YYYYMMDD-HHMMSS_{uuid}
    pub fn create_session(&self) -> io::Result<UploadSession> {
        fs::create_dir_all(&self.scratch_root)?;

        let timestamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
        let id = Uuid::new_v4().as_simple().to_string();
        let dir = self.scratch_root.join(format!("label_{}_{}", timestamp, id));

        // create_dir (not create_dir_all) so an existing directory is an error
        fs::create_dir(&dir)?;
        debug!("Created upload session {} at {:?}", id, dir);

        Ok(UploadSession {
            id,
            dir,
            destroyed: false,
        })
    }
}

impl UploadSession {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Remove the directory tree now. Failures are logged, never returned.
    pub fn destroy(mut self) {
        self.remove_dir();
    }

    fn remove_dir(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => debug!("Removed upload session {}", self.id),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove session directory {:?}: {}", self.dir, e),
        }
    }
}

impl Drop for UploadSession {
    fn drop(&mut self) {
        self.remove_dir();
    }
}
