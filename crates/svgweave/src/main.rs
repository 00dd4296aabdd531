use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::{error, info};

use svgweave::app::compile::SymbolSpriter;
use svgweave::app::pipeline::{Pipeline, RunOptions, RunOutcome};
use svgweave::infra::config::{Config, Overrides};

#[derive(Parser)]
#[command(name = "svgweave")]
#[command(about = "Compile SVG icons into an inline sprite sheet injected into an HTML template")]
struct Cli {
    /// Path to an explicit configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the compile-and-inject pipeline once
    Build {
        /// Directory containing the icon files
        #[arg(short, long)]
        icons: Option<PathBuf>,
        /// Target template path
        #[arg(short, long)]
        template: Option<PathBuf>,
        /// Base directory for resolving relative paths
        #[arg(short, long)]
        base: Option<PathBuf>,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() -> Result<()> {
    svgweave::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Build {
            icons,
            template,
            base,
        } => run_build(cli.config, icons, template, base),
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "svgweave", &mut io::stdout());
            Ok(())
        }
    }
}

/// Run the pipeline and report the outcome through the status log lines.
/// Pipeline failures end the run cleanly rather than propagating a fault to
/// the hosting build process; only usage and configuration errors bubble up.
fn run_build(
    config_path: Option<PathBuf>,
    icons: Option<PathBuf>,
    template: Option<PathBuf>,
    base: Option<PathBuf>,
) -> Result<()> {
    let base_dir = match base {
        Some(dir) => dir,
        None => std::env::current_dir().context("failed to determine invocation directory")?,
    };

    let overrides = Overrides {
        icons_dir: icons,
        template,
    };
    let config = Config::load(&base_dir, config_path.as_deref(), overrides)?;

    let icons_dir = config.build.icons_dir.clone().context(
        "no icon directory configured; pass --icons or set [build] icons_dir in svgweave.toml",
    )?;

    let options = RunOptions {
        base_dir,
        icons_dir,
        template: config.build.template.clone(),
    };

    let pipeline = Pipeline::new(SymbolSpriter::new());
    match pipeline.run(&options, &config) {
        Ok(report) => {
            let verb = match report.outcome {
                RunOutcome::Injected => "injected into",
                RunOutcome::Scaffolded => "scaffolded at",
            };
            info!(
                icons = report.icon_count,
                "✔ SVG sprite {verb} {}",
                report.template_path.display()
            );
        }
        Err(err) if err.is_write_failure() => {
            error!("✘ SVG sprite built but could not be saved: {err}");
        }
        Err(err) => {
            error!("✘ SVG sprite could not be generated: {err}");
        }
    }
    Ok(())
}
