//! Filesystem project store.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/
//! ├── active_id                 (id of the active project)
//! ├── projects/
//! │   └── 1718000000000.json    (one snapshot per project)
//! └── media/
//!     └── 1718000000000/
//!         └── sc-1-1718000000123.mp4
//! ```
//!
//! Every write goes to a temp file first and is renamed into place.

use crate::{ProjectStore, sort_newest_first, video_extension};
use cinereel_core::{Project, VideoClip};
use cinereel_error::{CinereelResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

const PROJECTS_DIR: &str = "projects";
const MEDIA_DIR: &str = "media";
const ACTIVE_ID_FILE: &str = "active_id";

/// Project store backed by JSON files.
#[derive(Debug, Clone)]
pub struct FileSystemProjectStore {
    root: PathBuf,
}

impl FileSystemProjectStore {
    /// Open (and create if needed) a store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns error if the directories cannot be created.
    #[tracing::instrument(skip(root))]
    pub fn new(root: impl Into<PathBuf>) -> CinereelResult<Self> {
        let root = root.into();
        for dir in [root.join(PROJECTS_DIR), root.join(MEDIA_DIR)] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    dir.display(),
                    e
                )))
            })?;
        }

        tracing::info!(path = %root.display(), "Opened project store");
        Ok(Self { root })
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn snapshot_path(&self, id: &str) -> CinereelResult<PathBuf> {
        validate_id(id)?;
        Ok(self.root.join(PROJECTS_DIR).join(format!("{}.json", id)))
    }

    fn media_dir(&self, project_id: &str) -> CinereelResult<PathBuf> {
        validate_id(project_id)?;
        Ok(self.root.join(MEDIA_DIR).join(project_id))
    }

    fn active_path(&self) -> PathBuf {
        self.root.join(ACTIVE_ID_FILE)
    }

    async fn read_snapshot(path: &Path) -> CinereelResult<Option<Project>> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };

        let project = serde_json::from_slice::<Project>(&bytes).map_err(|e| {
            StorageError::new(StorageErrorKind::Snapshot {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        Ok(Some(project))
    }
}

/// Ids become file names, so only `[A-Za-z0-9_-]` is accepted.
fn validate_id(id: &str) -> CinereelResult<()> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::new(StorageErrorKind::InvalidId(id.to_string())).into())
    }
}

/// Write `data` to a sibling temp file, then rename it over `path`.
async fn write_atomic(path: &Path, data: &[u8]) -> CinereelResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                parent.display(),
                e
            )))
        })?;
    }

    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, data).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "{}: {}",
            temp_path.display(),
            e
        )))
    })?;

    tokio::fs::rename(&temp_path, path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "rename {} to {}: {}",
            temp_path.display(),
            path.display(),
            e
        )))
    })?;
    Ok(())
}

#[async_trait::async_trait]
impl ProjectStore for FileSystemProjectStore {
    #[tracing::instrument(skip(self, project), fields(id = %project.id, scenes = project.scenes.len()))]
    async fn put(&self, project: &Project) -> CinereelResult<()> {
        let path = self.snapshot_path(&project.id)?;
        let json = serde_json::to_vec_pretty(project).map_err(|e| {
            StorageError::new(StorageErrorKind::Snapshot {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        })?;
        write_atomic(&path, &json).await?;
        tracing::debug!(path = %path.display(), size = json.len(), "Saved project snapshot");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn get(&self, id: &str) -> CinereelResult<Option<Project>> {
        let path = self.snapshot_path(id)?;
        Self::read_snapshot(&path).await
    }

    #[tracing::instrument(skip(self))]
    async fn get_all(&self) -> CinereelResult<Vec<Project>> {
        let dir = self.root.join(PROJECTS_DIR);
        let mut entries = tokio::fs::read_dir(&dir).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", dir.display(), e)))
        })?;

        let mut projects = Vec::new();
        loop {
            let entry = entries.next_entry().await.map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", dir.display(), e)))
            })?;
            let Some(entry) = entry else { break };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read_snapshot(&path).await {
                Ok(Some(project)) => projects.push(project),
                Ok(None) => {}
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable snapshot"),
            }
        }

        sort_newest_first(&mut projects);
        tracing::debug!(count = projects.len(), "Listed projects");
        Ok(projects)
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> CinereelResult<()> {
        let path = self.snapshot_path(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => tracing::info!(path = %path.display(), "Deleted project snapshot"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(id, "Project already absent");
            }
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileDelete(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        }

        let media = self.media_dir(id)?;
        match tokio::fs::remove_dir_all(&media).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileDelete(format!(
                "{}: {}",
                media.display(),
                e
            )))
            .into()),
        }
    }

    async fn active_id(&self) -> CinereelResult<Option<String>> {
        let path = self.active_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(id) => {
                let id = id.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn set_active_id(&self, id: &str) -> CinereelResult<()> {
        validate_id(id)?;
        write_atomic(&self.active_path(), id.as_bytes()).await
    }

    #[tracing::instrument(skip(self))]
    async fn clear_active_id(&self) -> CinereelResult<()> {
        let path = self.active_path();
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::new(StorageErrorKind::FileDelete(format!(
                "{}: {}",
                path.display(),
                e
            )))
            .into()),
        }
    }

    #[tracing::instrument(skip(self, clip), fields(size = clip.bytes.len(), mime_type = %clip.mime_type))]
    async fn save_video(
        &self,
        project_id: &str,
        scene_id: &str,
        clip: &VideoClip,
    ) -> CinereelResult<String> {
        validate_id(scene_id)?;
        let path = self
            .media_dir(project_id)?
            .join(format!("{}.{}", scene_id, video_extension(&clip.mime_type)));
        write_atomic(&path, &clip.bytes).await?;
        tracing::info!(path = %path.display(), "Stored scene video");
        Ok(path.to_string_lossy().to_string())
    }
}
