//! Domain models for icons, sprite markup, and templates.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One icon source file captured during collection.
///
/// `name` is the file stem and feeds sprite id generation; names must be
/// unique within a run, duplicate names collide in the generated sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFile {
    pub name: String,
    pub absolute_path: PathBuf,
    pub base_directory: PathBuf,
    pub contents: Vec<u8>,
}

/// Compiled sprite markup. Opaque to everything downstream of the compiler:
/// it is spliced into templates as one atomic unit, never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteMarkup(String);

impl SpriteMarkup {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteMarkup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shape-level transform passes applied to each icon before assembly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transform {
    /// Strip the XML prolog, doctype, and comments, and collapse whitespace
    /// between tags.
    Optimize,
}

/// Immutable sprite-affecting configuration handed to the compiler.
/// Constructed once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteConfig {
    /// Id-generation pattern; `%s` is substituted with the sanitized icon
    /// name, a pattern without `%s` acts as a prefix.
    pub id_generator: String,
    pub transforms: Vec<Transform>,
    /// Inline sprites omit the XML prolog so they can sit inside HTML.
    pub inline: bool,
    /// Assemble icons as `<symbol>` definitions. The pipeline consumes
    /// exactly this output mode.
    pub symbol: bool,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            id_generator: "icon-%s".to_owned(),
            transforms: vec![Transform::Optimize],
            inline: true,
            symbol: true,
        }
    }
}

/// An existing template's text, or `raw_text: None` when no template exists
/// and scaffold creation is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDocument {
    pub path: PathBuf,
    pub raw_text: Option<String>,
}

/// Delimiter pair bracketing the replaceable sprite region of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionMarker {
    start: String,
    end: String,
}

impl InjectionMarker {
    /// Build the marker pair for a comment tag, e.g. `svg-sprite` becomes
    /// `<!-- svg-sprite -->` / `<!-- endsvg-sprite -->`.
    pub fn for_tag(tag: &str) -> Self {
        Self {
            start: format!("<!-- {tag} -->"),
            end: format!("<!-- end{tag} -->"),
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }
}

impl Default for InjectionMarker {
    fn default() -> Self {
        Self::for_tag("svg-sprite")
    }
}
