//! Saved project command handlers.

use super::commands::ProjectCommands;
use super::storyboard::{open_studio, pending_renders, print_scenes};
use cinereel::{CinereelConfig, CinereelResult};

/// Handle saved project commands.
pub async fn handle_project_command(
    config: &CinereelConfig,
    cmd: ProjectCommands,
) -> CinereelResult<()> {
    let studio = open_studio(config).await?;
    match cmd {
        ProjectCommands::List => {
            let active = studio.session().await.active_id().clone();
            let projects = studio.list_projects().await?;
            if projects.is_empty() {
                println!("No saved projects");
            }
            for project in projects {
                let marker = if active.as_deref() == Some(project.id.as_str()) {
                    "*"
                } else {
                    " "
                };
                println!(
                    "{} {}  {}  {} scenes  {}",
                    marker,
                    project.id,
                    project.date.format("%Y-%m-%d %H:%M"),
                    project.scenes.len(),
                    project.name
                );
            }
        }

        ProjectCommands::Show { id } => {
            let project = studio.get_project(&id).await?;
            println!("{} \"{}\"", project.id, project.name);
            println!("{}", project.synopsis);
            println!(
                "Style: {} | Language: {}",
                project.config.visual_style(),
                project.config.language()
            );
            if !project.hero.description.is_empty() {
                println!("Hero DNA: {}", project.hero.description);
            }
            println!(
                "{} of {} frames still to render",
                pending_renders(&project.scenes),
                project.scenes.len()
            );
            print_scenes(&project.scenes);
        }

        ProjectCommands::Open { id } => {
            let project = studio.load_project(&id).await?;
            println!("Opened {} \"{}\"", project.id, project.name);
            print_scenes(&project.scenes);
        }

        ProjectCommands::Delete { id } => {
            studio.delete_project(&id).await?;
            println!("Deleted {}", id);
        }
    }
    Ok(())
}
