//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cinereel - script, storyboard and animate short films with Gemini
#[derive(Parser, Debug)]
#[command(name = "cinereel")]
#[command(about = "Script, storyboard and animate short films with Gemini", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze the hero and generate the scene manifest for a new project
    Direct {
        /// Movie title
        #[arg(long)]
        title: String,

        /// Story synopsis
        #[arg(long)]
        synopsis: String,

        /// Hero reference images (up to 4 are kept)
        #[arg(long = "hero", required = true)]
        hero: Vec<PathBuf>,

        /// Visual style (see `cinereel styles`)
        #[arg(long)]
        style: Option<String>,

        /// Language of the generated scene text
        #[arg(long)]
        language: Option<String>,

        /// Number of scenes (1-20)
        #[arg(long)]
        scenes: Option<u32>,
    },

    /// Render scene frames of the active project
    Render {
        /// Scene number to render
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        scene: Option<u32>,

        /// Render every scene
        #[arg(long)]
        all: bool,

        /// Extra instruction for a remake of an existing frame
        #[arg(long, requires = "scene")]
        remake: Option<String>,
    },

    /// Animate a rendered scene frame into a video clip
    Extend {
        /// Scene number to animate
        scene: u32,
    },

    /// Hero reference images of the active project
    #[command(subcommand)]
    Hero(HeroCommands),

    /// Saved project management
    #[command(subcommand)]
    Projects(ProjectCommands),

    /// Start a new empty project
    New,

    /// Export the active project
    #[command(subcommand)]
    Export(ExportCommands),

    /// List the visual styles and languages
    Styles,
}

/// Hero subcommands
#[derive(Subcommand, Debug)]
pub enum HeroCommands {
    /// Add reference images and re-analyze the hero
    Add {
        /// Image files (the hero keeps at most 4)
        #[arg(required = true)]
        images: Vec<PathBuf>,
    },

    /// Remove a reference image
    Remove {
        /// Image position, starting at 1
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        position: u64,
    },
}

/// Saved project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List saved projects, most recently updated first
    List,

    /// Show the scenes of a saved project
    Show {
        /// Project id
        id: String,
    },

    /// Make a saved project the active one
    Open {
        /// Project id
        id: String,
    },

    /// Delete a saved project
    Delete {
        /// Project id
        id: String,
    },
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Print scene metadata as JSON
    Json {
        /// What to export
        #[arg(long, default_value = "script")]
        kind: JsonExport,

        /// Scene number, for `--kind prompt`
        #[arg(long, required_if_eq("kind", "prompt"))]
        scene: Option<u32>,

        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Save every rendered frame as `scene_<n>.<ext>`
    Images {
        /// Target directory
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

/// JSON export flavors
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JsonExport {
    /// Scene number, visual and dialogue per scene
    Script,
    /// Full scene records
    Manifest,
    /// Visual and technical prompt of one scene
    Prompt,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hero_remove_takes_one_based_position() {
        let cli = Cli::try_parse_from(["cinereel", "hero", "remove", "2"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Hero(HeroCommands::Remove { position: 2 })
        ));
        assert!(Cli::try_parse_from(["cinereel", "hero", "remove", "0"]).is_err());
        assert!(Cli::try_parse_from(["cinereel", "hero", "add"]).is_err());
    }
}
