//! Sprite compilation: the injectable compiler contract and the default
//! symbol-mode implementation.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::domain::errors::CompileError;
use crate::domain::model::{IconFile, SpriteConfig, SpriteMarkup, Transform};

/// Compiles an ordered icon list into one self-contained sprite block.
///
/// The contract is a single fallible completion: on error no partial sprite
/// exists and nothing downstream runs. Identical ordered input and
/// configuration must yield byte-identical markup, so implementations can be
/// substituted with deterministic test doubles.
pub trait SpriteCompiler {
    fn compile(
        &self,
        icons: &[IconFile],
        config: &SpriteConfig,
    ) -> Result<SpriteMarkup, CompileError>;
}

const SPRITE_OPEN: &str =
    r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#;
const XML_PROLOG_LINE: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";

/// Default compiler: every icon becomes a `<symbol>` definition addressable
/// by `<use>` elsewhere, assembled under a single `<svg>` root.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymbolSpriter;

impl SymbolSpriter {
    pub fn new() -> Self {
        Self
    }
}

impl SpriteCompiler for SymbolSpriter {
    fn compile(
        &self,
        icons: &[IconFile],
        config: &SpriteConfig,
    ) -> Result<SpriteMarkup, CompileError> {
        if !config.symbol {
            return Err(CompileError::SymbolModeDisabled);
        }

        let mut markup = String::new();
        if !config.inline {
            markup.push_str(XML_PROLOG_LINE);
        }
        markup.push_str(SPRITE_OPEN);

        let mut seen = HashSet::new();
        for icon in icons {
            let id = generate_id(&config.id_generator, &icon.name);
            if !seen.insert(id.clone()) {
                warn!(
                    id = %id,
                    icon = %icon.absolute_path.display(),
                    "duplicate sprite id; definitions collide"
                );
            }
            markup.push_str(&render_symbol(icon, &id, config)?);
        }

        markup.push_str("</svg>");
        Ok(SpriteMarkup::new(markup))
    }
}

fn render_symbol(
    icon: &IconFile,
    id: &str,
    config: &SpriteConfig,
) -> Result<String, CompileError> {
    let text = std::str::from_utf8(&icon.contents).map_err(|source| CompileError::NotUtf8 {
        name: icon.name.clone(),
        source,
    })?;
    let shape = apply_transforms(text, &config.transforms);
    let root = SvgRoot::parse(&shape).ok_or_else(|| CompileError::MissingSvgRoot {
        name: icon.name.clone(),
    })?;

    let mut symbol = String::new();
    symbol.push_str("<symbol id=\"");
    symbol.push_str(id);
    symbol.push('"');
    if let Some(view_box) = root.view_box() {
        symbol.push_str(" viewBox=\"");
        symbol.push_str(&view_box);
        symbol.push('"');
    }
    if let Some(ratio) = root.preserve_aspect_ratio() {
        symbol.push_str(" preserveAspectRatio=\"");
        symbol.push_str(&ratio);
        symbol.push('"');
    }
    symbol.push('>');
    symbol.push_str(root.inner.trim());
    symbol.push_str("</symbol>");
    Ok(symbol)
}

/// Expand the id pattern for one icon. `%s` is substituted with the
/// sanitized name; a pattern without `%s` acts as a plain prefix.
fn generate_id(pattern: &str, name: &str) -> String {
    let sanitized = sanitize_name(name);
    if pattern.contains("%s") {
        pattern.replace("%s", &sanitized)
    } else {
        format!("{pattern}{sanitized}")
    }
}

/// Map characters outside `[A-Za-z0-9_-]` to `-` so the name is usable as an
/// XML id fragment.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

static XML_PROLOG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<\?xml.*?\?>").expect("prolog pattern"));
static DOCTYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<!doctype[^>]*>").expect("doctype pattern"));
static COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment pattern"));
static INTER_TAG_WS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">\s+<").expect("inter-tag whitespace pattern"));

fn apply_transforms(text: &str, transforms: &[Transform]) -> String {
    let mut shape = text.to_owned();
    for transform in transforms {
        match transform {
            Transform::Optimize => {
                shape = XML_PROLOG.replace_all(&shape, "").into_owned();
                shape = DOCTYPE.replace_all(&shape, "").into_owned();
                shape = COMMENT.replace_all(&shape, "").into_owned();
                shape = INTER_TAG_WS.replace_all(&shape, "><").into_owned();
                shape = shape.trim().to_owned();
            }
        }
    }
    shape
}

static SVG_OPEN_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<svg\b([^>]*?)(/?)>").expect("svg open tag pattern"));
static SVG_CLOSE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</svg\s*>").expect("svg close tag pattern"));

/// The root `<svg>` element of one icon, split into its attribute text and
/// inner markup.
struct SvgRoot<'a> {
    attrs: &'a str,
    inner: &'a str,
}

impl<'a> SvgRoot<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        let caps = SVG_OPEN_TAG.captures(text)?;
        let open = caps.get(0)?;
        let attrs = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let self_closing = caps.get(2).map(|m| m.as_str() == "/").unwrap_or(false);

        let inner = if self_closing {
            ""
        } else {
            let rest = &text[open.end()..];
            // The outermost close tag: nested <svg> elements close earlier.
            let close = SVG_CLOSE_TAG.find_iter(rest).last()?;
            &rest[..close.start()]
        };

        Some(Self { attrs, inner })
    }

    /// The explicit viewBox, or one synthesized from numeric width/height.
    fn view_box(&self) -> Option<String> {
        if let Some(explicit) = attr_value(self.attrs, "viewBox") {
            return Some(explicit);
        }
        let width = attr_value(self.attrs, "width").and_then(|v| parse_length(&v))?;
        let height = attr_value(self.attrs, "height").and_then(|v| parse_length(&v))?;
        Some(format!("0 0 {width} {height}"))
    }

    fn preserve_aspect_ratio(&self) -> Option<String> {
        attr_value(self.attrs, "preserveAspectRatio")
    }
}

fn attr_value(attrs: &str, name: &str) -> Option<String> {
    let pattern = format!(r#"(?i)\b{name}\s*=\s*(?:"([^"]*)"|'([^']*)')"#);
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(attrs)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_owned())
}

fn parse_length(value: &str) -> Option<f64> {
    value.trim().trim_end_matches("px").trim().parse().ok()
}
