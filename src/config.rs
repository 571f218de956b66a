//! Configuration loading from environment variables.

use std::env;
use std::path::PathBuf;

use crate::render::RenderOptions;

pub const DEFAULT_LOG_FILTER: &str = "jot_tui=info";

/// Runtime configuration for the `jot` host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// `EnvFilter` directive for the log subscriber.
    pub log_filter: String,
    /// Where log events go. Logging is off when unset.
    pub log_file: Option<PathBuf>,
    pub indent_width: usize,
    pub bullet: char,
}

impl Default for Config {
    fn default() -> Self {
        let render = RenderOptions::default();
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
            indent_width: render.indent_width,
            bullet: render.bullet,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, applying defaults for
    /// anything missing or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_filter: lookup("JOT_LOG")
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            log_file: lookup("JOT_LOG_FILE")
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
            indent_width: lookup("JOT_INDENT_WIDTH")
                .and_then(|value| value.trim().parse().ok())
                .filter(|width| (1..=16).contains(width))
                .unwrap_or(defaults.indent_width),
            bullet: lookup("JOT_BULLET")
                .and_then(|value| single_char(&value))
                .unwrap_or(defaults.bullet),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            indent_width: self.indent_width,
            bullet: self.bullet,
        }
    }
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.trim().chars();
    let ch = chars.next()?;
    chars.next().is_none().then_some(ch)
}
