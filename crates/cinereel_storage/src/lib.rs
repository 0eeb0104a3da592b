//! Project persistence for Cinereel.
//!
//! A project is stored as one self-contained JSON snapshot keyed by its id,
//! next to a single "active project" pointer and the downloaded scene videos.
//!
//! # Backends
//!
//! - [`FileSystemProjectStore`]: snapshots under `<root>/projects`, videos under `<root>/media`
//! - [`InMemoryProjectStore`]: process-local maps, for tests and dry runs
//!
//! # Example
//!
//! ```rust
//! use cinereel_core::{HeroCharacter, Project, ProjectConfig};
//! use cinereel_storage::{InMemoryProjectStore, ProjectStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryProjectStore::new();
//! let project = Project::new(
//!     "1718000000000",
//!     "Laut",
//!     "A fisher's daughter sails into the storm.",
//!     HeroCharacter::default(),
//!     ProjectConfig::default(),
//!     Vec::new(),
//! );
//! store.put(&project).await?;
//! store.set_active_id(&project.id).await?;
//!
//! let active = store.active_project().await?;
//! assert_eq!(active.map(|p| p.id), Some(project.id));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod memory;

pub use cinereel_error::{StorageError, StorageErrorKind};
pub use filesystem::FileSystemProjectStore;
pub use memory::InMemoryProjectStore;

use cinereel_core::{Project, VideoClip};
use cinereel_error::CinereelResult;

/// Trait for project snapshot backends.
#[async_trait::async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert or replace the snapshot with `project.id`.
    async fn put(&self, project: &Project) -> CinereelResult<()>;

    /// Snapshot by id, `None` if absent.
    async fn get(&self, id: &str) -> CinereelResult<Option<Project>>;

    /// Every snapshot, most recently updated first.
    async fn get_all(&self) -> CinereelResult<Vec<Project>>;

    /// Remove a snapshot and its videos. Removing an unknown id is not an error.
    ///
    /// The active pointer is left alone; [`active_project`](Self::active_project)
    /// then reports no active project.
    async fn delete(&self, id: &str) -> CinereelResult<()>;

    /// Id the active pointer holds.
    async fn active_id(&self) -> CinereelResult<Option<String>>;

    /// Point the active pointer at `id`.
    async fn set_active_id(&self, id: &str) -> CinereelResult<()>;

    /// Clear the active pointer.
    async fn clear_active_id(&self) -> CinereelResult<()>;

    /// Store a downloaded scene video and return its reference.
    async fn save_video(
        &self,
        project_id: &str,
        scene_id: &str,
        clip: &VideoClip,
    ) -> CinereelResult<String>;

    /// The snapshot the active pointer references.
    ///
    /// A pointer to a snapshot that no longer exists yields `None`.
    async fn active_project(&self) -> CinereelResult<Option<Project>> {
        match self.active_id().await? {
            Some(id) => self.get(&id).await,
            None => Ok(None),
        }
    }
}

/// Order snapshots newest update first.
pub(crate) fn sort_newest_first(projects: &mut [Project]) {
    projects.sort_by(|a, b| b.date.cmp(&a.date));
}

/// File extension for a video MIME type.
pub(crate) fn video_extension(mime_type: &str) -> &'static str {
    match mime_type {
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        _ => "mp4",
    }
}
