//! Process-local project store.

use crate::{ProjectStore, sort_newest_first, video_extension};
use cinereel_core::{Project, VideoClip};
use cinereel_error::CinereelResult;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Project store kept in memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    projects: RwLock<HashMap<String, Project>>,
    active: RwLock<Option<String>>,
    videos: RwLock<HashMap<String, VideoClip>>,
}

impl InMemoryProjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A video stored by [`save_video`](ProjectStore::save_video).
    pub async fn video(&self, reference: &str) -> Option<VideoClip> {
        self.videos.read().await.get(reference).cloned()
    }
}

#[async_trait::async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn put(&self, project: &Project) -> CinereelResult<()> {
        self.projects
            .write()
            .await
            .insert(project.id.clone(), project.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> CinereelResult<Option<Project>> {
        Ok(self.projects.read().await.get(id).cloned())
    }

    async fn get_all(&self) -> CinereelResult<Vec<Project>> {
        let mut projects = self.projects.read().await.values().cloned().collect::<Vec<_>>();
        sort_newest_first(&mut projects);
        Ok(projects)
    }

    async fn delete(&self, id: &str) -> CinereelResult<()> {
        self.projects.write().await.remove(id);
        let prefix = format!("memory://{}/", id);
        self.videos
            .write()
            .await
            .retain(|reference, _| !reference.starts_with(&prefix));
        Ok(())
    }

    async fn active_id(&self) -> CinereelResult<Option<String>> {
        Ok(self.active.read().await.clone())
    }

    async fn set_active_id(&self, id: &str) -> CinereelResult<()> {
        *self.active.write().await = Some(id.to_string());
        Ok(())
    }

    async fn clear_active_id(&self) -> CinereelResult<()> {
        *self.active.write().await = None;
        Ok(())
    }

    async fn save_video(
        &self,
        project_id: &str,
        scene_id: &str,
        clip: &VideoClip,
    ) -> CinereelResult<String> {
        let reference = format!(
            "memory://{}/{}.{}",
            project_id,
            scene_id,
            video_extension(&clip.mime_type)
        );
        self.videos
            .write()
            .await
            .insert(reference.clone(), clip.clone());
        Ok(reference)
    }
}
