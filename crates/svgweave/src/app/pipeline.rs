//! Pipeline orchestration: collect, compile, inject, persist.
//!
//! Execution is single-threaded and strictly sequential, with exactly one
//! in-flight run per process invocation. Concurrent invocations against the
//! same template path are not coordinated and may race; run one build at a
//! time.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::app::collect::collect_icons;
use crate::app::compile::SpriteCompiler;
use crate::app::inject::{inject_existing, synthesize};
use crate::domain::errors::PipelineError;
use crate::domain::model::TemplateDocument;
use crate::infra::config::Config;
use crate::infra::fs::write_atomic;

/// Caller-supplied inputs for one run. Relative paths resolve against
/// `base_dir`; the pipeline never consults the ambient working directory.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub base_dir: PathBuf,
    pub icons_dir: PathBuf,
    pub template: PathBuf,
}

/// Which injector path the run took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// An existing template's marker region was replaced.
    Injected,
    /// No template existed; a scaffold was synthesized.
    Scaffolded,
}

/// Successful run summary for the status report.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub template_path: PathBuf,
    pub icon_count: usize,
}

/// One-shot compile-and-inject pipeline over an injected sprite compiler.
pub struct Pipeline<C> {
    compiler: C,
}

impl<C: SpriteCompiler> Pipeline<C> {
    pub fn new(compiler: C) -> Self {
        Self { compiler }
    }

    /// Run the pipeline once: collect icons, compile the sprite, then
    /// replace the marker region of the template at `options.template` or
    /// synthesize a scaffold when none exists, and persist the result.
    ///
    /// Any failure before the final write aborts with no write attempted;
    /// a pre-existing template is left exactly as found. The write itself
    /// replaces the full prior contents atomically; its failure is reported
    /// as `WriteFailure`, distinct from upstream failures.
    pub fn run(&self, options: &RunOptions, config: &Config) -> Result<RunReport, PipelineError> {
        let icons_dir = resolve_path(&options.base_dir, &options.icons_dir);
        let template_path = resolve_path(&options.base_dir, &options.template);

        let icons = collect_icons(&icons_dir)?;
        debug!(count = icons.len(), directory = %icons_dir.display(), "collected icons");

        let sprite = self.compiler.compile(&icons, &config.sprite())?;

        let document = probe_template(&template_path)?;
        let marker = config.marker();
        let (html, outcome) = match document.raw_text.as_deref() {
            Some(raw) => (
                inject_existing(&document.path, raw, &sprite, &marker)?,
                RunOutcome::Injected,
            ),
            None => (synthesize(&sprite, &marker), RunOutcome::Scaffolded),
        };

        write_atomic(&document.path, &html).map_err(|source| PipelineError::WriteFailure {
            path: document.path.clone(),
            source,
        })?;
        info!(template = %document.path.display(), ?outcome, "template written");

        Ok(RunReport {
            outcome,
            template_path: document.path,
            icon_count: icons.len(),
        })
    }
}

/// Probe the template path: a missing file signals scaffold creation, any
/// other read failure is terminal with the template untouched.
fn probe_template(path: &Path) -> Result<TemplateDocument, PipelineError> {
    match fs::read_to_string(path) {
        Ok(raw_text) => Ok(TemplateDocument {
            path: path.to_path_buf(),
            raw_text: Some(raw_text),
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(TemplateDocument {
            path: path.to_path_buf(),
            raw_text: None,
        }),
        Err(source) => Err(PipelineError::TemplateUnreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolve `raw` against `base`: absolute paths pass through, a leading `~/`
/// aliases the base directory, anything else joins onto it.
pub fn resolve_path(base: &Path, raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        return raw.to_path_buf();
    }
    if let Ok(stripped) = raw.strip_prefix("~") {
        return base.join(stripped);
    }
    base.join(raw)
}
