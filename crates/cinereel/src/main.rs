//! Cinereel CLI binary.
//!
//! This binary provides command-line access to Cinereel's functionality:
//! - Direct a new film (hero analysis and scene manifest)
//! - Add or remove hero reference images
//! - Render scene frames and animate them into clips
//! - Manage and export saved projects

use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{
        Cli, Commands, HeroCommands, add_hero, direct, extend, handle_export_command,
        handle_project_command, new_project, remove_hero, render, styles,
    };

    // Pick up GEMINI_API_KEY and CINEREEL_* from .env if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    cinereel::init_console_telemetry(cli.verbose)?;

    let config = cinereel::CinereelConfig::load()?;
    tracing::debug!(storage = %config.storage_root().display(), "Configuration loaded");

    match cli.command {
        Commands::Direct {
            title,
            synopsis,
            hero,
            style,
            language,
            scenes,
        } => {
            direct(&config, title, synopsis, hero, style, language, scenes).await?;
        }

        Commands::Render { scene, all, remake } => {
            render(&config, scene, all, remake).await?;
        }

        Commands::Extend { scene } => {
            extend(&config, scene).await?;
        }

        Commands::Hero(HeroCommands::Add { images }) => {
            add_hero(&config, images).await?;
        }

        Commands::Hero(HeroCommands::Remove { position }) => {
            remove_hero(&config, position as usize).await?;
        }

        Commands::Projects(cmd) => {
            handle_project_command(&config, cmd).await?;
        }

        Commands::New => {
            new_project(&config).await?;
        }

        Commands::Export(cmd) => {
            handle_export_command(&config, cmd).await?;
        }

        Commands::Styles => styles(),
    }

    Ok(())
}
