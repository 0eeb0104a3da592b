//! Project persistence, switching and export.

mod test_utils;

use chrono::{Duration as ChronoDuration, Utc};
use cinereel_core::{AnimationScene, HeroCharacter, Project, ProjectConfig};
use cinereel_error::StudioErrorKind;
use cinereel_storage::{FileSystemProjectStore, InMemoryProjectStore, ProjectStore};
use cinereel_studio::StudioStatus;
use std::sync::Arc;
use test_utils::{Harness, MockBackend, MockCredentials, manifest_json, open_studio, record};

async fn storyboarded(backend: MockBackend, scenes: u32) -> (Harness, Project) {
    let harness = Harness::new(backend).await;
    harness.prepare_draft(scenes).await;
    let project = harness.studio.build_manifest().await.unwrap();
    (harness, project)
}

fn saved_project(id: &str, name: &str, minutes_ago: i64) -> Project {
    let scenes = (1..=2)
        .map(|n| AnimationScene::from_record(format!("{}-sc-{}", id, n), record(n)))
        .collect();
    let mut project = Project::new(
        id,
        name,
        "Saved earlier",
        HeroCharacter::default(),
        ProjectConfig::default(),
        scenes,
    );
    project.date = Utc::now() - ChronoDuration::minutes(minutes_ago);
    project
}

#[tokio::test]
async fn test_reopen_restores_active_project() -> anyhow::Result<()> {
    let backend = MockBackend::new()
        .text("Amber eyes")
        .text(manifest_json(1..=2))
        .image("AAAA");
    let (harness, project) = storyboarded(backend, 2).await;
    harness.studio.render_scene(&project.scenes[0].id, None).await?;

    let reopened = Harness::with_store(MockBackend::new(), harness.store.clone()).await;

    let session = reopened.studio.session().await;
    assert_eq!(session.active_id().as_deref(), Some(project.id.as_str()));
    assert_eq!(session.draft().title(), "Laut");
    assert_eq!(session.hero().description, "Amber eyes");
    assert_eq!(session.scenes().len(), 2);
    assert!(session.scenes()[0].has_image());
    assert_eq!(reopened.backend.total_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_corrupt_active_snapshot_opens_empty_session() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let store = Arc::new(FileSystemProjectStore::new(dir.path())?);
    store.put(&saved_project("p1", "Laut", 0)).await?;
    store.put(&saved_project("p2", "Gunung", 5)).await?;
    store.set_active_id("p1").await?;
    tokio::fs::write(dir.path().join("projects").join("p1.json"), "{not json").await?;

    let studio = open_studio(
        Arc::new(MockBackend::new()),
        store.clone(),
        Arc::new(MockCredentials::with_key("AIza-test")),
    )
    .await?;

    let session = studio.session().await;
    assert!(session.active_id().is_none());
    assert!(session.scenes().is_empty());
    assert_eq!(store.active_id().await?.as_deref(), Some("p1"));
    let listed = studio.list_projects().await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "p2");
    studio.load_project("p2").await?;
    assert_eq!(store.active_id().await?.as_deref(), Some("p2"));
    Ok(())
}

#[tokio::test]
async fn test_pointer_to_missing_snapshot_opens_empty_session() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryProjectStore::new());
    store.set_active_id("gone").await?;

    let harness = Harness::with_store(MockBackend::new(), store).await;

    let session = harness.studio.session().await;
    assert!(session.active_id().is_none());
    assert!(session.scenes().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_get_project_does_not_switch_session() -> anyhow::Result<()> {
    let (harness, project) =
        storyboarded(MockBackend::new().text("DNA").text(manifest_json([1])), 1).await;
    harness.store.put(&saved_project("42", "Gunung", 5)).await?;

    let other = harness.studio.get_project("42").await?;

    assert_eq!(other.name, "Gunung");
    assert_eq!(
        harness.studio.session().await.active_id(),
        &Some(project.id.clone())
    );
    assert_eq!(harness.store.active_id().await?, Some(project.id));
    let err = harness.studio.get_project("43").await.unwrap_err();
    assert_eq!(
        err.studio_kind(),
        Some(&StudioErrorKind::ProjectNotFound("43".to_string()))
    );
    Ok(())
}

#[tokio::test]
async fn test_new_project_keeps_saved_snapshots() -> anyhow::Result<()> {
    let (harness, project) =
        storyboarded(MockBackend::new().text("DNA").text(manifest_json([1])), 1).await;

    harness.studio.new_project().await?;

    let session = harness.studio.session().await;
    assert!(session.scenes().is_empty());
    assert!(session.draft().title().is_empty());
    assert!(session.hero().images.is_empty());
    assert!(session.active_id().is_none());
    assert!(harness.store.active_id().await?.is_none());
    assert!(harness.store.get(&project.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_deleting_active_project_detaches_session() -> anyhow::Result<()> {
    let (harness, project) =
        storyboarded(MockBackend::new().text("DNA").text(manifest_json([1])), 1).await;

    harness.studio.delete_project(&project.id).await?;

    assert!(harness.store.active_project().await?.is_none());
    assert!(harness.store.get(&project.id).await?.is_none());
    let session = harness.studio.session().await;
    assert!(session.active_id().is_none());
    assert_eq!(session.scenes().len(), 1);

    harness.studio.set_title("Laut 2").await?;
    assert!(harness.store.get_all().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_deleting_other_project_keeps_session() -> anyhow::Result<()> {
    let (harness, project) =
        storyboarded(MockBackend::new().text("DNA").text(manifest_json([1])), 1).await;
    harness.store.put(&saved_project("42", "Gunung", 5)).await?;

    harness.studio.delete_project("42").await?;

    let active = harness.store.active_project().await?.expect("still active");
    assert_eq!(active.id, project.id);
    Ok(())
}

#[tokio::test]
async fn test_load_project_switches_session() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryProjectStore::new());
    store.put(&saved_project("100", "Gunung", 10)).await?;
    store.put(&saved_project("200", "Sungai", 5)).await?;
    let harness = Harness::with_store(MockBackend::new(), store).await;

    let loaded = harness.studio.load_project("100").await?;

    assert_eq!(loaded.name, "Gunung");
    let session = harness.studio.session().await;
    assert_eq!(session.draft().title(), "Gunung");
    assert_eq!(session.scenes().len(), 2);
    assert_eq!(harness.store.active_id().await?.as_deref(), Some("100"));

    let err = harness.studio.load_project("300").await.unwrap_err();
    assert_eq!(
        err.studio_kind(),
        Some(&StudioErrorKind::ProjectNotFound("300".to_string()))
    );
    assert_eq!(harness.store.active_id().await?.as_deref(), Some("100"));
    Ok(())
}

#[tokio::test]
async fn test_list_projects_newest_first() -> anyhow::Result<()> {
    let store = Arc::new(InMemoryProjectStore::new());
    store.put(&saved_project("1", "Oldest", 30)).await?;
    store.put(&saved_project("3", "Newest", 1)).await?;
    store.put(&saved_project("2", "Middle", 15)).await?;
    let harness = Harness::with_store(MockBackend::new(), store).await;

    let names = harness
        .studio
        .list_projects()
        .await?
        .into_iter()
        .map(|p| p.name)
        .collect::<Vec<_>>();

    assert_eq!(names, ["Newest", "Middle", "Oldest"]);
    Ok(())
}

#[tokio::test]
async fn test_export_images_writes_rendered_frames() -> anyhow::Result<()> {
    let backend = MockBackend::new()
        .text("DNA")
        .text(manifest_json(1..=3))
        .image("iVBORw0KGgo=");
    let (harness, project) = storyboarded(backend, 3).await;
    harness.studio.render_scene(&project.scenes[1].id, None).await?;
    let dir = tempfile::tempdir()?;

    let written = harness.studio.export_images(dir.path()).await?;

    assert_eq!(written, vec![dir.path().join("scene_2.png")]);
    assert!(!dir.path().join("scene_1.png").exists());
    let bytes = std::fs::read(dir.path().join("scene_2.png"))?;
    assert_eq!(&bytes[..4], b"\x89PNG");
    assert_eq!(
        harness.studio.status(),
        StudioStatus::Notice("Saved 1 images".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_export_script_and_prompt() -> anyhow::Result<()> {
    let (harness, project) =
        storyboarded(MockBackend::new().text("DNA").text(manifest_json(1..=2)), 2).await;

    let script: serde_json::Value = serde_json::from_str(&harness.studio.export_script().await?)?;
    let lines = script.as_array().expect("array");
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1]["scene"], 2);
    assert_eq!(lines[1]["visual"], "Lantern light over water, shot 2");
    assert_eq!(lines[1]["dialogue"], "Tunggu aku, ayah.");
    assert_eq!(
        harness.studio.status(),
        StudioStatus::Notice("Copied!".to_string())
    );

    let prompt: serde_json::Value = serde_json::from_str(
        &harness
            .studio
            .export_scene_prompt(&project.scenes[0].id)
            .await?,
    )?;
    assert_eq!(prompt["visual"], "Lantern light over water, shot 1");
    assert_eq!(prompt["technical"], "35mm, slow push in, waves");

    let manifest: serde_json::Value =
        serde_json::from_str(&harness.studio.export_manifest().await?)?;
    assert_eq!(manifest[0]["sceneNumber"], 1);
    assert_eq!(manifest[0]["cinematicNotes"], "35mm, slow push in, waves");
    Ok(())
}
