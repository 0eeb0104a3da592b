//! Direct, render and extend command handlers.

use super::credentials::PromptCredentials;
use cinereel::{
    AnimationScene, CinereelConfig, CinereelResult, EncodedImage, FileSystemProjectStore,
    GeminiClient, LANGUAGES, RenderStatus, StorageError, StorageErrorKind, Studio, StudioError,
    StudioErrorKind, StudioModels, VISUAL_STYLES,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, instrument};

/// Studio wired to Gemini and the filesystem store from `config`.
pub async fn open_studio(config: &CinereelConfig) -> CinereelResult<Studio> {
    let credentials = Arc::new(PromptCredentials::from_env());
    let client = GeminiClient::new(&config.gemini, credentials.clone())?;
    let models = StudioModels::new(
        Arc::new(client),
        config.gemini.models(),
        config.poll_config(),
    );
    let store = Arc::new(FileSystemProjectStore::new(config.storage_root())?);
    Studio::open(models, store, credentials, config.studio_settings()?).await
}

/// Echo status changes to stderr until aborted.
fn echo_status(studio: &Studio) -> JoinHandle<()> {
    let mut status = studio.subscribe();
    tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let line = status.borrow_and_update().to_string();
            if !line.is_empty() {
                eprintln!("{}", line);
            }
        }
    })
}

fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

async fn load_image(path: &Path) -> CinereelResult<EncodedImage> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        StorageError::new(StorageErrorKind::FileRead(format!("{}: {}", path.display(), e)))
    })?;
    Ok(EncodedImage::from_bytes(image_mime(path), &bytes))
}

/// Id of scene `number` in the active project.
pub async fn scene_id(studio: &Studio, number: u32) -> CinereelResult<String> {
    studio
        .session()
        .await
        .scenes()
        .iter()
        .find(|s| s.scene_number == number)
        .map(|s| s.id.clone())
        .ok_or_else(|| StudioError::new(StudioErrorKind::SceneNotFound(format!("#{}", number))).into())
}

pub fn print_scenes(scenes: &[AnimationScene]) {
    for scene in scenes {
        let video = if scene.video_url.is_some() { " +video" } else { "" };
        println!(
            "{:>2}. {} [{}{}] - {}, {}",
            scene.scene_number, scene.title, scene.status, video, scene.location, scene.time_of_day
        );
        println!("    {}", scene.visual);
        if !scene.dialogue.is_empty() {
            println!("    \"{}\"", scene.dialogue);
        }
    }
}

/// Analyze the hero and generate a fresh manifest.
#[instrument(skip(config, synopsis, hero))]
pub async fn direct(
    config: &CinereelConfig,
    title: String,
    synopsis: String,
    hero: Vec<PathBuf>,
    style: Option<String>,
    language: Option<String>,
    scenes: Option<u32>,
) -> CinereelResult<()> {
    let studio = open_studio(config).await?;
    let echo = echo_status(&studio);

    studio.start_draft().await;
    studio.set_title(title).await?;
    studio.set_synopsis(synopsis).await?;
    if let Some(style) = style {
        studio.set_visual_style(style).await?;
    }
    if let Some(language) = language {
        studio.set_language(language).await?;
    }
    if let Some(count) = scenes {
        studio.set_scene_count(count).await?;
    }

    let mut images = Vec::with_capacity(hero.len());
    for path in &hero {
        images.push(load_image(path).await?);
    }
    let dna = studio.add_hero_images(images).await?;
    println!("Hero DNA: {}", dna);

    let result = studio.build_manifest().await;
    echo.abort();
    let project = result?;

    info!(id = %project.id, scenes = project.scenes.len(), "Manifest ready");
    println!("Project {} \"{}\"", project.id, project.name);
    print_scenes(&project.scenes);
    Ok(())
}

/// Render one scene (optionally as a remake) or all of them.
#[instrument(skip(config, remake))]
pub async fn render(
    config: &CinereelConfig,
    scene: Option<u32>,
    all: bool,
    remake: Option<String>,
) -> CinereelResult<()> {
    let studio = open_studio(config).await?;
    let echo = echo_status(&studio);

    let outcome = match (all, scene) {
        (true, _) | (false, None) => {
            let results = studio.render_all().await;
            let failed = results.iter().filter(|(_, r)| r.is_err()).count();
            for (_, result) in &results {
                if let Err(e) = result {
                    eprintln!("{}", e);
                }
            }
            println!("Rendered {} of {} scenes", results.len() - failed, results.len());
            Ok(())
        }
        (false, Some(number)) => match scene_id(&studio, number).await {
            Ok(id) => studio.render_scene(&id, remake).await.map(|_| ()),
            Err(e) => Err(e),
        },
    };
    echo.abort();
    outcome?;

    let session = studio.session().await;
    print_scenes(session.scenes());
    Ok(())
}

/// Animate one rendered scene.
#[instrument(skip(config))]
pub async fn extend(config: &CinereelConfig, scene: u32) -> CinereelResult<()> {
    let studio = open_studio(config).await?;
    let id = scene_id(&studio, scene).await?;
    let echo = echo_status(&studio);
    let result = studio.extend_scene(&id).await;
    echo.abort();

    let reference = result?;
    println!("Scene {} clip: {}", scene, reference);
    Ok(())
}

/// Add hero reference images to the active project and re-derive the DNA.
#[instrument(skip(config, images), fields(count = images.len()))]
pub async fn add_hero(config: &CinereelConfig, images: Vec<PathBuf>) -> CinereelResult<()> {
    let studio = open_studio(config).await?;
    let mut loaded = Vec::with_capacity(images.len());
    for path in &images {
        loaded.push(load_image(path).await?);
    }
    let dna = studio.add_hero_images(loaded).await?;
    println!("Hero DNA: {}", dna);
    Ok(())
}

/// Drop the hero reference image at 1-based `position`.
#[instrument(skip(config))]
pub async fn remove_hero(config: &CinereelConfig, position: usize) -> CinereelResult<()> {
    let studio = open_studio(config).await?;
    let remaining = studio.remove_hero_image(position.saturating_sub(1)).await?;
    println!("Removed hero image {}, {} left", position, remaining);
    Ok(())
}

/// Clear the session and the active pointer.
pub async fn new_project(config: &CinereelConfig) -> CinereelResult<()> {
    let studio = open_studio(config).await?;
    studio.new_project().await?;
    println!("Started a new project");
    Ok(())
}

pub fn styles() {
    println!("Visual styles:");
    for style in VISUAL_STYLES {
        println!("  {}", style);
    }
    println!("Languages:");
    for language in LANGUAGES {
        println!("  {}", language);
    }
}

/// Frames still waiting for a render, for the `projects show` summary.
pub fn pending_renders(scenes: &[AnimationScene]) -> usize {
    scenes
        .iter()
        .filter(|s| s.status != RenderStatus::Done)
        .count()
}
