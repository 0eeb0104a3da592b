//! Export command handlers.

use super::commands::{ExportCommands, JsonExport};
use super::storyboard::{open_studio, scene_id};
use cinereel::{CinereelConfig, CinereelResult, StudioError, StudioErrorKind};

/// Handle export commands.
pub async fn handle_export_command(
    config: &CinereelConfig,
    cmd: ExportCommands,
) -> CinereelResult<()> {
    let studio = open_studio(config).await?;
    match cmd {
        ExportCommands::Json { kind, scene, out } => {
            let json = match (kind, scene) {
                (JsonExport::Script, _) => studio.export_script().await?,
                (JsonExport::Manifest, _) => studio.export_manifest().await?,
                (JsonExport::Prompt, Some(number)) => {
                    let id = scene_id(&studio, number).await?;
                    studio.export_scene_prompt(&id).await?
                }
                (JsonExport::Prompt, None) => {
                    return Err(StudioError::new(StudioErrorKind::SceneNotFound(
                        "no scene number given".to_string(),
                    ))
                    .into());
                }
            };
            match out {
                Some(path) => {
                    tokio::fs::write(&path, json).await.map_err(|e| {
                        StudioError::new(StudioErrorKind::Export(format!(
                            "{}: {}",
                            path.display(),
                            e
                        )))
                    })?;
                    println!("Wrote {}", path.display());
                }
                None => println!("{}", json),
            }
        }

        ExportCommands::Images { dir } => {
            let written = studio.export_images(&dir).await?;
            for path in &written {
                println!("{}", path.display());
            }
            println!("{}", studio.status());
        }
    }
    Ok(())
}
