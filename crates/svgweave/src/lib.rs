//! svgweave: compile a directory of SVG icons into one inline sprite sheet
//! and inject it into a base HTML page template.
//!
//! The pipeline runs once per build invocation and mutates a single output
//! file: an existing template's marker-delimited sprite region is replaced
//! in place, or a scaffold template is synthesized when none exists.
//! Concurrent invocations against the same template path are not
//! coordinated and are unsafe; run one build at a time.

pub mod app;
pub mod domain;
pub mod infra;

pub fn init() {
    infra::logging::init();
}
