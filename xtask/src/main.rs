use std::fs;
use std::path::PathBuf;
use std::process::Command;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about = "Project automation commands", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run cargo nextest with default configuration
    Nextest {
        #[arg(long)]
        profile: Option<String>,
        #[arg(long)]
        release: bool,
    },
    /// Write the demo icon set used for manual pipeline runs
    Fixtures {
        #[arg(long, default_value = "demos/icons")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Nextest { profile, release } => run_nextest(profile, release)?,
        Commands::Fixtures { out } => write_fixtures(out)?,
    }
    Ok(())
}

fn run_nextest(profile: Option<String>, release: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("nextest").arg("run");
    if let Some(profile) = profile {
        cmd.arg("--profile").arg(profile);
    }
    if release {
        cmd.arg("--release");
    }
    let status = cmd.status()?;
    if !status.success() {
        anyhow::bail!("cargo nextest run failed");
    }
    Ok(())
}

const DEMO_ICONS: &[(&str, &str)] = &[
    (
        "arrow.svg",
        r#"<svg viewBox="0 0 24 24"><path d="M4 12h14m-6-6 6 6-6 6"/></svg>"#,
    ),
    (
        "check.svg",
        r#"<svg viewBox="0 0 24 24"><path d="M5 13l4 4L19 7"/></svg>"#,
    ),
    (
        "cross.svg",
        r#"<svg viewBox="0 0 24 24"><path d="M6 6l12 12M18 6 6 18"/></svg>"#,
    ),
];

fn write_fixtures(out: PathBuf) -> Result<()> {
    fs::create_dir_all(&out)?;
    for (name, contents) in DEMO_ICONS {
        fs::write(out.join(name), contents)?;
    }
    println!("wrote {} demo icons to {}", DEMO_ICONS.len(), out.display());
    Ok(())
}
