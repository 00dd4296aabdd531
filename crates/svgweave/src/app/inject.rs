//! Template injection and scaffold synthesis.

use std::path::Path;

use minijinja::{Environment, context};

use crate::domain::errors::PipelineError;
use crate::domain::model::{InjectionMarker, SpriteMarkup};

/// A template split structurally at its marker pair. `prefix` ends just
/// after the start tag, `region` is strictly between the tags, and `suffix`
/// begins at the end tag, so reassembling the three parts reproduces the
/// input byte-for-byte.
#[derive(Debug, PartialEq, Eq)]
pub struct TemplateParts<'a> {
    pub prefix: &'a str,
    pub region: &'a str,
    pub suffix: &'a str,
}

/// Split `raw` at the first marker pair. `None` when the pair is absent or
/// the end tag never follows the start tag.
pub fn split_at_marker<'a>(raw: &'a str, marker: &InjectionMarker) -> Option<TemplateParts<'a>> {
    let start = raw.find(marker.start())?;
    let region_start = start + marker.start().len();
    let end = raw[region_start..].find(marker.end())? + region_start;

    Some(TemplateParts {
        prefix: &raw[..region_start],
        region: &raw[region_start..end],
        suffix: &raw[end..],
    })
}

/// Wrapper block substituted between the marker tags.
fn wrapper_block(sprite: &SpriteMarkup) -> String {
    format!("\n<div id=\"svg-defs\">\n{}\n</div>\n", sprite.as_str())
}

/// Replace the marker-delimited region of an existing template with the
/// sprite wrapper.
///
/// Marker tags and all text outside the region are preserved byte-for-byte.
/// The region is replaced, not appended to: feeding the output back through
/// this operation with the same sprite yields identical output, so repeated
/// builds converge. A template without the marker pair fails with
/// `MarkerNotFound`, never an undefined or empty write.
pub fn inject_existing(
    path: &Path,
    raw: &str,
    sprite: &SpriteMarkup,
    marker: &InjectionMarker,
) -> Result<String, PipelineError> {
    let parts = split_at_marker(raw, marker).ok_or_else(|| PipelineError::MarkerNotFound {
        path: path.to_path_buf(),
    })?;

    let block = wrapper_block(sprite);
    let mut output = String::with_capacity(parts.prefix.len() + block.len() + parts.suffix.len());
    output.push_str(parts.prefix);
    output.push_str(&block);
    output.push_str(parts.suffix);
    Ok(output)
}

// The four framework placeholders are emitted literally for a downstream
// templating pass; {% raw %} keeps minijinja from resolving them here.
const SCAFFOLD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html {% raw %}{{ HTML_ATTRS }}{% endraw %}>
  <head>
    {% raw %}{{ HEAD }}{% endraw %}
    <style>
      #svg-defs {
        width: 0;
        height: 0;
        overflow: hidden;
        position: absolute;
      }
    </style>
  </head>
  <body {% raw %}{{ BODY_ATTRS }}{% endraw %}>
    {{ marker_start }}
    <div id="svg-defs">
      {{ sprite }}
    </div>
    {{ marker_end }}
    {% raw %}{{ APP }}{% endraw %}
  </body>
</html>
"#;

/// Render the minimal scaffold used when no template exists yet.
///
/// The sprite sits inside the same marker-delimited region that
/// [`inject_existing`] manages, so the next run against this output takes
/// the idempotent replace path. The style block keeps the hidden sprite
/// container out of layout entirely. Rendering cannot fail for a well-formed
/// sprite string.
pub fn synthesize(sprite: &SpriteMarkup, marker: &InjectionMarker) -> String {
    let mut env = Environment::new();
    env.add_template("scaffold", SCAFFOLD_TEMPLATE)
        .expect("embedded scaffold template is statically valid");
    env.get_template("scaffold")
        .expect("scaffold template was just registered")
        .render(context! {
            sprite => sprite.as_str(),
            marker_start => marker.start(),
            marker_end => marker.end(),
        })
        .expect("scaffold rendering is infallible for string inputs")
}
