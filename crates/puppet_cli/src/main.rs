//! Puppet CLI
//!
//! Load an avatar model, inflate it and inspect the resulting entity tree.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use puppet_rig::config::BodyPart;
use puppet_rig::loader::ModelLoaderRegistry;
use puppet_rig::{AvatarRig, RigConfig};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "puppet")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Avatar rig inflation tools", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inflate a model and print its entity tree
    Inspect {
        /// Model file (.gltf, .glb)
        model: PathBuf,

        /// Rig config file (defaults to puppet.toml next to the model)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Hide a body part (hands, shirt, head); repeatable
        #[arg(long, value_enum)]
        hide: Vec<Part>,

        /// Print the outline as JSON
        #[arg(long)]
        json: bool,

        /// Report how the model's clips bind to the inflated tree
        #[arg(long)]
        clips: bool,
    },

    /// Show supported model formats
    Info,
}

#[derive(Clone, Copy, ValueEnum)]
enum Part {
    Hands,
    Shirt,
    Head,
}

impl From<Part> for BodyPart {
    fn from(part: Part) -> Self {
        match part {
            Part::Hands => BodyPart::Hands,
            Part::Shirt => BodyPart::Shirt,
            Part::Head => BodyPart::Head,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Inspect {
            model,
            config,
            hide,
            json,
            clips,
        } => cmd_inspect(&model, config.as_deref(), &hide, json, clips),

        Commands::Info => cmd_info(),
    }
}

fn load_config(model: &Path, config: Option<&Path>) -> Result<RigConfig> {
    match config {
        Some(path) => RigConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let dir = model.parent().unwrap_or(Path::new("."));
            RigConfig::load_from_dir(dir)
                .with_context(|| format!("Failed to load config from {}", dir.display()))
        }
    }
}

fn cmd_inspect(
    model: &Path,
    config: Option<&Path>,
    hide: &[Part],
    json: bool,
    show_clips: bool,
) -> Result<()> {
    let mut config = load_config(model, config)?;
    for part in hide {
        config.visibility.set_visible((*part).into(), false);
    }

    let mut rig = AvatarRig::new(config).context("Invalid rig config")?;
    let Some(root) = rig
        .load(model)
        .with_context(|| format!("Failed to inflate {}", model.display()))?
    else {
        warn!("Nothing in {} qualified for inflation", model.display());
        return Ok(());
    };

    let stats = rig.stats();
    info!(
        "Inflated {}: {} of {} nodes became entities ({} from templates)",
        model.display(),
        stats.inflated,
        stats.visited,
        stats.templated
    );

    let outline = root.outline();
    if json {
        println!("{}", serde_json::to_string_pretty(&outline)?);
    } else {
        print!("{}", outline.render_tree());
    }

    if show_clips {
        for binding in rig.bind_clips(&root) {
            println!();
            println!("clip {}: {} targets bound", binding.clip, binding.targets.len());
            for name in &binding.missing {
                println!("  missing: {}", name);
            }
        }
    }

    Ok(())
}

fn cmd_info() -> Result<()> {
    println!("Puppet avatar rig tools");
    println!("=======================");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Supported model formats:");
    let registry = ModelLoaderRegistry::new();
    let extensions = registry.supported_extensions();
    if extensions.is_empty() {
        println!("  (none, built without loaders)");
    }
    for ext in extensions {
        println!("  - .{}", ext);
    }
    println!();
    println!("Config file: {}", RigConfig::FILE_NAME);

    Ok(())
}
