//! Renderer turning parsed templates into text

mod config;
pub mod format;
mod text;

pub use config::NumberFormat;
pub use text::{render, render_token, render_value, RenderError, UNBOUND_TEXT};
