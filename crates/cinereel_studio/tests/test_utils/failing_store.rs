//! Project store whose writes can be made to fail.

use async_trait::async_trait;
use cinereel_core::{Project, VideoClip};
use cinereel_error::CinereelResult;
use cinereel_storage::{InMemoryProjectStore, ProjectStore, StorageError, StorageErrorKind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Delegates to an in-memory store until a failure switch is flipped.
#[derive(Default)]
pub struct FailingStore {
    inner: Arc<InMemoryProjectStore>,
    fail_puts: AtomicBool,
    fail_pointer: AtomicBool,
}

impl FailingStore {
    pub fn new(inner: Arc<InMemoryProjectStore>) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    /// Make `put` fail from now on.
    pub fn fail_puts(&self) {
        self.fail_puts.store(true, Ordering::SeqCst);
    }

    /// Make `set_active_id` fail from now on.
    pub fn fail_pointer(&self) {
        self.fail_pointer.store(true, Ordering::SeqCst);
    }
}

fn disk_full() -> StorageError {
    StorageError::new(StorageErrorKind::FileWrite("disk full".to_string()))
}

#[async_trait]
impl ProjectStore for FailingStore {
    async fn put(&self, project: &Project) -> CinereelResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(disk_full().into());
        }
        self.inner.put(project).await
    }

    async fn get(&self, id: &str) -> CinereelResult<Option<Project>> {
        self.inner.get(id).await
    }

    async fn get_all(&self) -> CinereelResult<Vec<Project>> {
        self.inner.get_all().await
    }

    async fn delete(&self, id: &str) -> CinereelResult<()> {
        self.inner.delete(id).await
    }

    async fn active_id(&self) -> CinereelResult<Option<String>> {
        self.inner.active_id().await
    }

    async fn set_active_id(&self, id: &str) -> CinereelResult<()> {
        if self.fail_pointer.load(Ordering::SeqCst) {
            return Err(disk_full().into());
        }
        self.inner.set_active_id(id).await
    }

    async fn clear_active_id(&self) -> CinereelResult<()> {
        self.inner.clear_active_id().await
    }

    async fn save_video(
        &self,
        project_id: &str,
        scene_id: &str,
        clip: &VideoClip,
    ) -> CinereelResult<String> {
        self.inner.save_video(project_id, scene_id, clip).await
    }
}
