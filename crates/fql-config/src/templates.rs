//! The default schema, shared by `fql init` and the built-in fallback.
//!
//! The template is a valid `.fql.toml` describing the movie and TV catalog,
//! with comments explaining each key.

/// Default configuration template (valid TOML).
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Returns the configuration template written by `fql init`.
pub fn init_template() -> &'static str {
    DEFAULT_TEMPLATE
}
