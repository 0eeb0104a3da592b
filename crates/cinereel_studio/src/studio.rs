//! The studio orchestrator.

use crate::export;
use crate::session::{Draft, Session, TicketKind};
use crate::status::{ProgressTicker, StudioStatus};
use chrono::Utc;
use cinereel_core::{AnimationScene, EncodedImage, Project, SceneCount, SceneRecord};
use cinereel_error::{CinereelResult, GeminiErrorKind, StudioError, StudioErrorKind};
use cinereel_models::{
    CredentialProvider, ManifestRequestBuilder, SceneVisualRequestBuilder, StudioModels,
};
use cinereel_storage::ProjectStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

/// Studio behavior that is not part of the model configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioSettings {
    /// Rotation period of the video progress messages
    pub progress_interval: Duration,
    /// Starting draft (style, language, scene count)
    pub draft: Draft,
}

impl Default for StudioSettings {
    fn default() -> Self {
        Self {
            progress_interval: Duration::from_secs(4),
            draft: Draft::default(),
        }
    }
}

struct Inner {
    models: StudioModels,
    store: Arc<dyn ProjectStore>,
    credentials: Arc<dyn CredentialProvider>,
    session: Mutex<Session>,
    status: Arc<watch::Sender<StudioStatus>>,
    progress_interval: Duration,
}

/// Handle to the storyboard session.
///
/// Cloning is cheap; clones share the session, so independent operations (for
/// example renders of different scenes) can run concurrently. The session lock
/// is never held across a model call.
#[derive(Clone)]
pub struct Studio {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("models", &self.inner.models)
            .field("progress_interval", &self.inner.progress_interval)
            .finish_non_exhaustive()
    }
}

#[track_caller]
fn studio_error(kind: StudioErrorKind) -> StudioError {
    StudioError::new(kind)
}

impl Studio {
    /// Open a session, restoring the active project if the pointer references one.
    ///
    /// An unreadable active snapshot is logged and skipped; the file and the
    /// pointer are left for the user to repair or replace.
    #[instrument(name = "studio_open", skip_all)]
    pub async fn open(
        models: StudioModels,
        store: Arc<dyn ProjectStore>,
        credentials: Arc<dyn CredentialProvider>,
        settings: StudioSettings,
    ) -> CinereelResult<Self> {
        let mut session = Session::new(settings.draft);
        match store.active_project().await {
            Ok(Some(project)) => {
                info!(id = %project.id, scenes = project.scenes.len(), "Restored active project");
                session.load(project);
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Active project unreadable, starting with an empty session"),
        }

        let (status, _) = watch::channel(StudioStatus::Idle);
        Ok(Self {
            inner: Arc::new(Inner {
                models,
                store,
                credentials,
                session: Mutex::new(session),
                status: Arc::new(status),
                progress_interval: settings.progress_interval,
            }),
        })
    }

    /// Receive status and progress updates.
    pub fn subscribe(&self) -> watch::Receiver<StudioStatus> {
        self.inner.status.subscribe()
    }

    /// Current status.
    pub fn status(&self) -> StudioStatus {
        self.inner.status.borrow().clone()
    }

    /// A copy of the session.
    pub async fn session(&self) -> Session {
        self.inner.session.lock().await.clone()
    }

    fn publish(&self, status: StudioStatus) {
        self.inner.status.send_replace(status);
    }

    async fn persist(&self, session: &Session) -> CinereelResult<()> {
        if let Some(project) = session.snapshot() {
            self.inner.store.put(&project).await?;
            debug!(id = %project.id, "Persisted session");
        }
        Ok(())
    }

    /// The single mutation path: apply `f`, then write the active snapshot while
    /// the lock is still held. Nothing is written when `f` fails.
    async fn update<R>(
        &self,
        f: impl FnOnce(&mut Session) -> CinereelResult<R>,
    ) -> CinereelResult<R> {
        let mut session = self.inner.session.lock().await;
        let result = f(&mut session)?;
        self.persist(&session).await?;
        Ok(result)
    }

    /// Set the movie title.
    pub async fn set_title(&self, title: impl Into<String>) -> CinereelResult<()> {
        let title = title.into();
        self.update(|s| {
            s.draft_mut().title = title;
            Ok(())
        })
        .await
    }

    /// Set the synopsis.
    pub async fn set_synopsis(&self, synopsis: impl Into<String>) -> CinereelResult<()> {
        let synopsis = synopsis.into();
        self.update(|s| {
            s.draft_mut().synopsis = synopsis;
            Ok(())
        })
        .await
    }

    /// Set the visual style used for every frame.
    pub async fn set_visual_style(&self, style: impl Into<String>) -> CinereelResult<()> {
        let style = style.into();
        self.update(|s| {
            s.draft_mut().visual_style = style;
            Ok(())
        })
        .await
    }

    /// Set the language of generated scene text.
    pub async fn set_language(&self, language: impl Into<String>) -> CinereelResult<()> {
        let language = language.into();
        self.update(|s| {
            s.draft_mut().language = language;
            Ok(())
        })
        .await
    }

    /// Set how many scenes the next manifest should have (`1..=20`).
    pub async fn set_scene_count(&self, count: u32) -> CinereelResult<()> {
        let count = SceneCount::new(count)?;
        self.update(|s| {
            s.draft_mut().scene_count = count;
            Ok(())
        })
        .await
    }

    /// Add hero reference images and re-derive the hero DNA from all of them.
    ///
    /// Only the first four images are ever kept. The image list change sticks
    /// even when the analysis fails; the description only changes on success.
    #[instrument(skip(self, images), fields(offered = images.len()))]
    pub async fn add_hero_images(&self, images: Vec<EncodedImage>) -> CinereelResult<String> {
        if images.is_empty() {
            return Err(studio_error(StudioErrorKind::MissingHeroImages).into());
        }

        let (references, epoch) = self
            .update(|s| {
                let hero = s.hero_mut();
                let kept = hero.add_images(images);
                hero.is_analyzing = true;
                debug!(kept, total = hero.images.len(), "Added hero images");
                Ok((hero.images.clone(), s.epoch))
            })
            .await?;
        self.publish(StudioStatus::Analyzing);

        let analysis = self.inner.models.analyze_hero(&references).await;

        let applied = self
            .update(|s| {
                if s.epoch != epoch {
                    return Ok(None);
                }
                let hero = s.hero_mut();
                hero.is_analyzing = false;
                if let Ok(description) = &analysis {
                    hero.description = description.clone();
                }
                Ok(Some(()))
            })
            .await?;

        if applied.is_none() {
            warn!("Discarding hero analysis for a replaced project");
            self.publish(StudioStatus::Idle);
            return Err(studio_error(StudioErrorKind::Superseded("hero analysis".to_string())).into());
        }

        match analysis {
            Ok(description) => {
                info!(chars = description.len(), "Hero DNA locked");
                self.publish(StudioStatus::DnaLocked);
                Ok(description)
            }
            Err(e) => {
                warn!(error = %e, "Hero analysis failed");
                self.publish(StudioStatus::Idle);
                Err(studio_error(StudioErrorKind::AnalysisFailed(e.to_string())).into())
            }
        }
    }

    /// Remove the hero reference image at `index` (zero-based).
    ///
    /// The hero DNA is not re-derived. Returns how many images remain.
    #[instrument(skip(self))]
    pub async fn remove_hero_image(&self, index: usize) -> CinereelResult<usize> {
        self.update(|s| {
            let count = s.hero().images.len();
            s.hero_mut()
                .remove_image(index)
                .ok_or_else(|| studio_error(StudioErrorKind::HeroImageNotFound { index, count }))?;
            debug!(index, remaining = count - 1, "Removed hero image");
            Ok(count - 1)
        })
        .await
    }

    /// Generate the scene manifest and start a new project from it.
    ///
    /// Needs a title, a synopsis and at least one hero image; otherwise fails
    /// without calling the model. On any failure, including a failed save, the
    /// current scenes and active project are kept.
    #[instrument(skip(self))]
    pub async fn build_manifest(&self) -> CinereelResult<Project> {
        let (request, count, epoch) = {
            let mut session = self.inner.session.lock().await;
            let draft = session.draft();
            if draft.title().trim().is_empty() {
                return Err(studio_error(StudioErrorKind::MissingTitle).into());
            }
            if draft.synopsis().trim().is_empty() {
                return Err(studio_error(StudioErrorKind::MissingSynopsis).into());
            }
            if session.hero().images.is_empty() {
                return Err(studio_error(StudioErrorKind::MissingHeroImages).into());
            }

            let request = ManifestRequestBuilder::default()
                .title(draft.title().clone())
                .synopsis(draft.synopsis().clone())
                .hero_description(session.hero().description.clone())
                .visual_style(draft.visual_style().clone())
                .count(*draft.scene_count())
                .language(draft.language().clone())
                .build()
                .map_err(|e| studio_error(StudioErrorKind::GenerationFailed(e.to_string())))?;
            let count = *draft.scene_count();
            session.set_generating(true);
            (request, count, session.epoch)
        };
        self.publish(StudioStatus::Directing);

        let outcome = match self.inner.models.generate_manifest(&request).await {
            Ok(records) => {
                let records = normalize_manifest(records, count);
                if records.is_empty() {
                    Err(studio_error(StudioErrorKind::GenerationFailed(
                        "the model returned no usable scenes".to_string(),
                    )))
                } else {
                    Ok(records)
                }
            }
            Err(e) => Err(studio_error(StudioErrorKind::GenerationFailed(e.to_string()))),
        };

        let mut session = self.inner.session.lock().await;
        session.set_generating(false);
        self.publish(StudioStatus::Idle);

        let records = match outcome {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Manifest generation failed, keeping current scenes");
                return Err(e.into());
            }
        };
        if session.epoch != epoch {
            warn!("Discarding manifest for a replaced project");
            return Err(studio_error(StudioErrorKind::Superseded("scene manifest".to_string())).into());
        }

        let millis = Utc::now().timestamp_millis();
        let scenes = records
            .into_iter()
            .map(|record| {
                let id = format!("sc-{}-{}", record.scene_number, millis);
                AnimationScene::from_record(id, record)
            })
            .collect::<Vec<_>>();
        let project = session.project_with(millis.to_string(), scenes);

        // The session switches only once the project and pointer are on disk.
        self.inner.store.put(&project).await?;
        if let Err(e) = self.inner.store.set_active_id(&project.id).await {
            let replaced_active = session.active_id().as_deref() == Some(project.id.as_str());
            if !replaced_active {
                if let Err(cleanup) = self.inner.store.delete(&project.id).await {
                    warn!(id = %project.id, error = %cleanup, "Could not remove unreferenced project");
                }
            }
            return Err(e);
        }
        session.start_project(project.id.clone(), project.scenes.clone());
        info!(id = %project.id, scenes = project.scenes.len(), "Created project from manifest");
        Ok(project)
    }

    /// Render (or with `remake_instruction`, re-render) a scene's frame.
    ///
    /// A new frame invalidates any clip made from the previous one.
    #[instrument(skip(self, remake_instruction), fields(remake = remake_instruction.is_some()))]
    pub async fn render_scene(
        &self,
        scene_id: &str,
        remake_instruction: Option<String>,
    ) -> CinereelResult<EncodedImage> {
        let (request, scene_number, ticket) = self
            .update(|s| {
                if s.scene(scene_id).is_none() {
                    return Err(studio_error(StudioErrorKind::SceneNotFound(scene_id.to_string())).into());
                }
                let ticket = s.tickets.issue(TicketKind::Render, scene_id);
                let hero = s.hero().clone();
                let visual_style = s.draft().visual_style().clone();
                let scene = s
                    .scene_mut(scene_id)
                    .ok_or_else(|| studio_error(StudioErrorKind::SceneNotFound(scene_id.to_string())))?;
                scene.status = cinereel_core::RenderStatus::Loading;

                let mut builder = SceneVisualRequestBuilder::default();
                builder
                    .scene(scene.record())
                    .hero_images(hero.images)
                    .hero_description(hero.description)
                    .visual_style(visual_style);
                if let Some(instruction) = remake_instruction {
                    builder.remake_instruction(instruction);
                }
                let request = builder
                    .build()
                    .map_err(|e| studio_error(StudioErrorKind::RenderFailed {
                        scene: scene.scene_number,
                        cause: GeminiErrorKind::ApiRequest(e.to_string()),
                    }))?;
                Ok((request, scene.scene_number, ticket))
            })
            .await?;
        self.publish(StudioStatus::Rendering { scene_number });

        let result = self.inner.models.generate_scene_visual(&request).await;

        let outcome = self
            .update(|s| {
                if !s.tickets.is_current(TicketKind::Render, scene_id, ticket) {
                    return Ok(None);
                }
                let Some(scene) = s.scene_mut(scene_id) else {
                    return Ok(None);
                };
                match &result {
                    Ok(image) => scene.set_rendered(image.clone()),
                    Err(_) => scene.status = cinereel_core::RenderStatus::Error,
                }
                Ok(Some(()))
            })
            .await?;
        self.publish(StudioStatus::Idle);

        if outcome.is_none() {
            debug!(scene_id, ticket, "Discarding stale render");
            return Err(studio_error(StudioErrorKind::Superseded(format!("scene {}", scene_number))).into());
        }

        match result {
            Ok(image) => {
                info!(scene_number, "Scene rendered");
                Ok(image)
            }
            Err(e) => {
                warn!(scene_number, error = %e, "Scene render failed");
                let cause = e
                    .gemini_kind()
                    .cloned()
                    .unwrap_or_else(|| GeminiErrorKind::InvalidResponse(e.to_string()));
                Err(studio_error(StudioErrorKind::RenderFailed {
                    scene: scene_number,
                    cause,
                })
                .into())
            }
        }
    }

    /// Render every scene concurrently; results are in scene order.
    #[instrument(skip(self))]
    pub async fn render_all(&self) -> Vec<(String, CinereelResult<EncodedImage>)> {
        let ids = self
            .session()
            .await
            .scenes()
            .iter()
            .map(|s| s.id.clone())
            .collect::<Vec<_>>();

        let renders = ids.iter().map(|id| self.render_scene(id, None));
        let results = futures::future::join_all(renders).await;
        ids.into_iter().zip(results).collect()
    }

    /// Ask for a new API key.
    #[instrument(skip(self))]
    pub async fn select_credential(&self) -> CinereelResult<()> {
        self.inner.credentials.select_credential().await?;
        self.publish(StudioStatus::KeyUpdated);
        Ok(())
    }

    /// Animate a rendered scene frame and store the clip.
    ///
    /// Prompts for an API key first if none is selected. If the video service
    /// rejects the key, a new one is requested once and the scene is marked
    /// failed; retry after that. The status always ends as `KeyUpdated` (a new
    /// key was selected) or `Idle`.
    #[instrument(skip(self))]
    pub async fn extend_scene(&self, scene_id: &str) -> CinereelResult<String> {
        if !self.inner.credentials.has_credential() {
            info!("No API key selected, prompting before video generation");
            self.select_credential().await?;
        }

        let (scene, hero_description, project_id, ticket) = self
            .update(|s| {
                let hero_description = s.hero().description.clone();
                let project_id = s.active_id().clone();
                let scene = s
                    .scene(scene_id)
                    .ok_or_else(|| studio_error(StudioErrorKind::SceneNotFound(scene_id.to_string())))?;
                if !scene.has_image() {
                    return Err(cinereel_error::GeminiError::new(
                        cinereel_error::GeminiErrorKind::MissingSceneImage(scene.scene_number),
                    )
                    .into());
                }
                let ticket = s.tickets.issue(TicketKind::Video, scene_id);
                let scene = s
                    .scene_mut(scene_id)
                    .ok_or_else(|| studio_error(StudioErrorKind::SceneNotFound(scene_id.to_string())))?;
                scene.video_status = Some(cinereel_core::VideoStatus::Extending);
                Ok((scene.clone(), hero_description, project_id, ticket))
            })
            .await?;

        let scene_number = scene.scene_number;
        let ticker = ProgressTicker::start(
            self.inner.status.clone(),
            scene_number,
            self.inner.progress_interval,
        );

        let result = match self
            .inner
            .models
            .extend_scene_to_video(&scene, &hero_description)
            .await
        {
            Ok(clip) => {
                let project_id = project_id.as_deref().unwrap_or("unsaved");
                self.inner.store.save_video(project_id, scene_id, &clip).await
            }
            Err(e) => Err(e),
        };
        ticker.stop().await;

        let credential_rejected = result.as_ref().err().is_some_and(|e| e.is_credential_error());
        let key_replaced = if credential_rejected {
            warn!(scene_number, "API key rejected by the video service, requesting a new one");
            match self.inner.credentials.select_credential().await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "Key selection failed");
                    false
                }
            }
        } else {
            false
        };

        let source_image = scene.image.clone();
        let outcome = self
            .update(|s| {
                if !s.tickets.is_current(TicketKind::Video, scene_id, ticket) {
                    return Ok(None);
                }
                let Some(current) = s.scene_mut(scene_id) else {
                    return Ok(None);
                };
                if current.image != source_image {
                    return Ok(None);
                }
                match &result {
                    Ok(reference) => {
                        current.set_video(reference.clone());
                    }
                    Err(_) => current.video_status = Some(cinereel_core::VideoStatus::Error),
                }
                Ok(Some(()))
            })
            .await?;
        self.publish(if key_replaced {
            StudioStatus::KeyUpdated
        } else {
            StudioStatus::Idle
        });

        if outcome.is_none() {
            debug!(scene_id, ticket, "Discarding stale video");
            return Err(studio_error(StudioErrorKind::Superseded(format!("scene {} video", scene_number))).into());
        }

        match result {
            Ok(reference) => {
                info!(scene_number, reference = %reference, "Scene extended to video");
                Ok(reference)
            }
            Err(_) if key_replaced => {
                Err(studio_error(StudioErrorKind::CredentialRejected(scene_number)).into())
            }
            Err(_) if credential_rejected => {
                Err(studio_error(StudioErrorKind::CredentialUnavailable(scene_number)).into())
            }
            Err(e) => {
                warn!(scene_number, error = %e, "Scene extend failed");
                Err(studio_error(StudioErrorKind::ExtendFailed {
                    scene: scene_number,
                    reason: e.to_string(),
                })
                .into())
            }
        }
    }

    /// Start an unsaved draft: clear the session but keep the active pointer.
    ///
    /// Nothing is persisted until a manifest creates the new project, so the
    /// previous project stays active if that fails.
    #[instrument(skip(self))]
    pub async fn start_draft(&self) {
        self.inner.session.lock().await.reset();
        self.publish(StudioStatus::Idle);
        debug!("Started an unsaved draft");
    }

    /// Start a new project: clear the session and the active pointer.
    ///
    /// Saved projects are left untouched.
    #[instrument(skip(self))]
    pub async fn new_project(&self) -> CinereelResult<()> {
        let mut session = self.inner.session.lock().await;
        session.reset();
        self.inner.store.clear_active_id().await?;
        self.publish(StudioStatus::Idle);
        info!("Started a new project");
        Ok(())
    }

    /// Open a saved project and make it active.
    #[instrument(skip(self))]
    pub async fn load_project(&self, id: &str) -> CinereelResult<Project> {
        let project = self.get_project(id).await?;

        let mut session = self.inner.session.lock().await;
        session.load(project.clone());
        self.inner.store.set_active_id(&project.id).await?;
        info!(id, scenes = project.scenes.len(), "Loaded project");
        Ok(project)
    }

    /// A saved project, without making it active.
    pub async fn get_project(&self, id: &str) -> CinereelResult<Project> {
        self.inner
            .store
            .get(id)
            .await?
            .ok_or_else(|| studio_error(StudioErrorKind::ProjectNotFound(id.to_string())).into())
    }

    /// Saved projects, most recently updated first.
    pub async fn list_projects(&self) -> CinereelResult<Vec<Project>> {
        self.inner.store.get_all().await
    }

    /// Delete a saved project.
    ///
    /// Deleting the project being edited detaches the session from it and clears
    /// the active pointer; the scenes stay on screen but are no longer saved.
    #[instrument(skip(self))]
    pub async fn delete_project(&self, id: &str) -> CinereelResult<()> {
        let mut session = self.inner.session.lock().await;
        self.inner.store.delete(id).await?;
        if session.active_id().as_deref() == Some(id) {
            session.detach();
            self.inner.store.clear_active_id().await?;
        }
        info!(id, "Deleted project");
        Ok(())
    }

    /// Shooting script (number, visual, dialogue per scene) as pretty JSON.
    pub async fn export_script(&self) -> CinereelResult<String> {
        let json = export::script_json(self.session().await.scenes())?;
        self.publish(StudioStatus::Notice("Copied!".to_string()));
        Ok(json)
    }

    /// Every scene's descriptive fields as pretty JSON, without images.
    pub async fn export_manifest(&self) -> CinereelResult<String> {
        let json = export::manifest_json(self.session().await.scenes())?;
        self.publish(StudioStatus::Notice("Copied!".to_string()));
        Ok(json)
    }

    /// One scene's visual and technical prompt as pretty JSON.
    pub async fn export_scene_prompt(&self, scene_id: &str) -> CinereelResult<String> {
        let session = self.session().await;
        let scene = session
            .scene(scene_id)
            .ok_or_else(|| studio_error(StudioErrorKind::SceneNotFound(scene_id.to_string())))?;
        let json = export::scene_prompt_json(scene)?;
        self.publish(StudioStatus::Notice("Copied!".to_string()));
        Ok(json)
    }

    /// Write every rendered frame into `dir`.
    #[instrument(skip(self, dir), fields(dir = %dir.display()))]
    pub async fn export_images(&self, dir: &Path) -> CinereelResult<Vec<PathBuf>> {
        let session = self.session().await;
        let written = export::write_scene_images(session.scenes(), dir).await?;
        info!(count = written.len(), "Exported scene frames");
        self.publish(StudioStatus::Notice(format!("Saved {} images", written.len())));
        Ok(written)
    }
}

/// Order by scene number, keep at most `count`, renumber `1..=n`.
fn normalize_manifest(mut records: Vec<SceneRecord>, count: SceneCount) -> Vec<SceneRecord> {
    records.sort_by_key(|r| r.scene_number);
    records.truncate(count.get() as usize);
    for (index, record) in records.iter_mut().enumerate() {
        record.scene_number = index as u32 + 1;
    }
    records
}
