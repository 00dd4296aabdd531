//! Layered configuration loading and merging.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::{InjectionMarker, SpriteConfig, Transform};

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
const PROJECT_CONFIG_FILE: &str = "svgweave.toml";

/// Fully-resolved configuration: built-in defaults layered under the
/// user-global file, the project file, and CLI overrides, in that order.
/// Constructed once per run and never mutated afterwards.
///
/// Merging is shallow: a top-level section supplied by a higher layer
/// replaces the lower layer's section wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub build: Build,
    pub shape: Shape,
    pub mode: Mode,
    pub inject: Inject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    /// Directory holding the icon files. No built-in default; supplied by a
    /// config layer or the CLI.
    #[serde(default)]
    pub icons_dir: Option<PathBuf>,
    #[serde(default = "Build::default_template")]
    pub template: PathBuf,
}

impl Build {
    fn default_template() -> PathBuf {
        PathBuf::from("app.html")
    }
}

impl Default for Build {
    fn default() -> Self {
        Self {
            icons_dir: None,
            template: Self::default_template(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(default)]
    pub transform: Vec<Transform>,
    #[serde(default)]
    pub id: ShapeId,
}

impl Default for Shape {
    fn default() -> Self {
        Self {
            transform: vec![Transform::Optimize],
            id: ShapeId::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeId {
    #[serde(default = "ShapeId::default_generator")]
    pub generator: String,
}

impl ShapeId {
    fn default_generator() -> String {
        "icon-%s".to_owned()
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self {
            generator: Self::default_generator(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mode {
    #[serde(default = "Mode::default_flag")]
    pub inline: bool,
    #[serde(default = "Mode::default_flag")]
    pub symbol: bool,
}

impl Mode {
    fn default_flag() -> bool {
        true
    }
}

impl Default for Mode {
    fn default() -> Self {
        Self {
            inline: true,
            symbol: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inject {
    /// Comment tag deriving the marker pair bracketing the sprite region.
    #[serde(default = "Inject::default_tag")]
    pub tag: String,
}

impl Inject {
    fn default_tag() -> String {
        "svg-sprite".to_owned()
    }
}

impl Default for Inject {
    fn default() -> Self {
        Self {
            tag: Self::default_tag(),
        }
    }
}

/// CLI-level overrides applied on top of every file layer.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub icons_dir: Option<PathBuf>,
    pub template: Option<PathBuf>,
}

/// One configuration layer as parsed from a file. Sections absent here fall
/// through to the layer below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
struct Layer {
    build: Option<Build>,
    shape: Option<Shape>,
    mode: Option<Mode>,
    inject: Option<Inject>,
}

impl Layer {
    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&data)
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse TOML config")
    }

    fn merge(self, overlay: Layer) -> Layer {
        Layer {
            build: overlay.build.or(self.build),
            shape: overlay.shape.or(self.shape),
            mode: overlay.mode.or(self.mode),
            inject: overlay.inject.or(self.inject),
        }
    }
}

impl Config {
    /// Load configuration for a run rooted at `base_dir`. An `explicit`
    /// config path replaces the conventional project file and must exist.
    pub fn load(base_dir: &Path, explicit: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let project = explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(|| base_dir.join(PROJECT_CONFIG_FILE));
        Self::load_with_layers(
            global_config_path(),
            Some(project),
            explicit.is_some(),
            overrides,
        )
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        project: Option<PathBuf>,
        project_required: bool,
        overrides: Overrides,
    ) -> Result<Self> {
        let mut merged =
            Layer::parse(&DEFAULT_CONFIG).context("built-in default configuration is invalid")?;

        if let Some(path) = global.filter(|path| path.exists()) {
            merged = merged.merge(Layer::from_file(&path)?);
        }

        if let Some(path) = project {
            if path.exists() {
                merged = merged.merge(Layer::from_file(&path)?);
            } else if project_required {
                anyhow::bail!("configuration file not found: {}", path.display());
            }
        }

        let mut config = Config {
            build: merged.build.unwrap_or_default(),
            shape: merged.shape.unwrap_or_default(),
            mode: merged.mode.unwrap_or_default(),
            inject: merged.inject.unwrap_or_default(),
        };
        if let Some(icons_dir) = overrides.icons_dir {
            config.build.icons_dir = Some(icons_dir);
        }
        if let Some(template) = overrides.template {
            config.build.template = template;
        }
        Ok(config)
    }

    /// Immutable sprite view handed to the compiler.
    pub fn sprite(&self) -> SpriteConfig {
        SpriteConfig {
            id_generator: self.shape.id.generator.clone(),
            transforms: self.shape.transform.clone(),
            inline: self.mode.inline,
            symbol: self.mode.symbol,
        }
    }

    /// Marker pair derived from the configured injection tag.
    pub fn marker(&self) -> InjectionMarker {
        InjectionMarker::for_tag(&self.inject.tag)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            build: Build::default(),
            shape: Shape::default(),
            mode: Mode::default(),
            inject: Inject::default(),
        }
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("svgweave/config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, false, Overrides::default())
            .expect("load default config");
        assert_eq!(config.build.icons_dir, None);
        assert_eq!(config.build.template, PathBuf::from("app.html"));
        assert_eq!(config.shape.id.generator, "icon-%s");
        assert_eq!(config.shape.transform, vec![Transform::Optimize]);
        assert!(config.mode.inline);
        assert!(config.mode.symbol);
        assert_eq!(config.inject.tag, "svg-sprite");
    }

    #[test]
    fn supplied_section_replaces_the_default_wholesale() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let project = temp.path().join("svgweave.toml");
        fs::write(
            &project,
            r#"
[shape.id]
generator = "glyph-%s"
"#,
        )?;

        let config =
            Config::load_with_layers(None, Some(project), false, Overrides::default())?;
        assert_eq!(config.shape.id.generator, "glyph-%s");
        // Shallow override: the whole [shape] section came from the project
        // file, so the default transform list is gone.
        assert!(config.shape.transform.is_empty());
        // Untouched sections keep their defaults.
        assert!(config.mode.symbol);
        Ok(())
    }

    #[test]
    fn project_layer_overrides_global() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("global.toml");
        fs::write(
            &global,
            r#"
[build]
icons_dir = "shared/icons"

[inject]
tag = "global-sprite"
"#,
        )?;
        let project = temp.path().join("svgweave.toml");
        fs::write(
            &project,
            r#"
[inject]
tag = "project-sprite"
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(project), false, Overrides::default())?;
        assert_eq!(config.inject.tag, "project-sprite");
        assert_eq!(config.build.icons_dir, Some(PathBuf::from("shared/icons")));
        Ok(())
    }

    #[test]
    fn cli_overrides_take_precedence() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let project = temp.path().join("svgweave.toml");
        fs::write(
            &project,
            r#"
[build]
icons_dir = "from-file"
template = "index.html"
"#,
        )?;

        let overrides = Overrides {
            icons_dir: Some(PathBuf::from("from-cli")),
            template: None,
        };
        let config = Config::load_with_layers(None, Some(project), false, overrides)?;
        assert_eq!(config.build.icons_dir, Some(PathBuf::from("from-cli")));
        assert_eq!(config.build.template, PathBuf::from("index.html"));
        Ok(())
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("nope.toml");
        let result =
            Config::load_with_layers(None, Some(missing), true, Overrides::default());
        assert!(result.is_err());
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        assert!(Layer::from_file(&file).is_err());
        Ok(())
    }

    #[test]
    fn unknown_transform_is_rejected() {
        let result = Layer::parse(
            r#"
[shape]
transform = ["minify-harder"]
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn marker_reflects_configured_tag() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let project = temp.path().join("svgweave.toml");
        fs::write(
            &project,
            r#"
[inject]
tag = "icons"
"#,
        )?;

        let config =
            Config::load_with_layers(None, Some(project), false, Overrides::default())?;
        let marker = config.marker();
        assert_eq!(marker.start(), "<!-- icons -->");
        assert_eq!(marker.end(), "<!-- endicons -->");
        Ok(())
    }
}
