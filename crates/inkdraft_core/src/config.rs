//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_AUTOSAVE_DELAY_MS, DEFAULT_DRAFT_RELATIVE_PATH, DEFAULT_HISTORY_LIMIT,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for an editing session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub draft_path: String,
    pub autosave_delay_ms: u64,
    pub history_limit: usize,
    pub render_embeds: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// Expand tilde (~) in paths to the user's home directory
fn expand_tilde(path: String, home: Option<PathBuf>) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = home {
            return home.join(rest).to_string_lossy().to_string();
        }
    }
    path
}

fn resolve_home_dir<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(home) = non_blank("HOME") {
        return Some(PathBuf::from(home));
    }

    // Windows USERPROFILE (standard)
    if let Some(profile) = non_blank("USERPROFILE") {
        return Some(PathBuf::from(profile));
    }

    None
}

/// Read an on/off switch such as `INKDRAFT_RENDER_EMBEDS`.
///
/// Accepts `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off` in any case,
/// with surrounding whitespace ignored; an empty value reads as off.
/// Anything else is `None` so callers keep their default.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    const ENABLED: [&str; 4] = ["1", "true", "yes", "on"];
    const DISABLED: [&str; 5] = ["", "0", "false", "no", "off"];

    let value = value.trim();
    let listed = |spellings: &[&str]| {
        spellings
            .iter()
            .any(|spelling| value.eq_ignore_ascii_case(spelling))
    };
    if listed(&ENABLED[..]) {
        Some(true)
    } else if listed(&DISABLED[..]) {
        Some(false)
    } else {
        None
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = resolve_home_dir(&lookup);
        let draft_path = match lookup("INKDRAFT_DRAFT_PATH") {
            Some(path) if !path.trim().is_empty() => expand_tilde(path, home),
            _ => home
                .unwrap_or_else(|| PathBuf::from("."))
                .join(DEFAULT_DRAFT_RELATIVE_PATH)
                .to_string_lossy()
                .to_string(),
        };
        Self {
            draft_path,
            autosave_delay_ms: lookup("INKDRAFT_AUTOSAVE_MS")
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(DEFAULT_AUTOSAVE_DELAY_MS),
            history_limit: lookup("INKDRAFT_HISTORY_LIMIT")
                .and_then(|value| value.trim().parse().ok())
                .filter(|limit: &usize| *limit > 0)
                .unwrap_or(DEFAULT_HISTORY_LIMIT),
            render_embeds: lookup("INKDRAFT_RENDER_EMBEDS")
                .and_then(|value| parse_env_flag(&value))
                .unwrap_or(true),
        }
    }

    /// Autosave quiet period as a [`Duration`].
    pub fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_env_flag, Config};
    use crate::constants::{DEFAULT_AUTOSAVE_DELAY_MS, DEFAULT_HISTORY_LIMIT};
    use std::collections::HashMap;
    use std::path::Path;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn render_embeds_flag_spellings() {
        let cases = [
            ("On", Some(true)),
            (" YES ", Some(true)),
            ("1", Some(true)),
            ("Off", Some(false)),
            ("no", Some(false)),
            ("", Some(false)),
            ("iframe", None),
        ];
        for (value, expected) in cases {
            assert_eq!(parse_env_flag(value), expected, "value: {:?}", value);
            let config =
                Config::from_lookup(lookup_from(&[("INKDRAFT_RENDER_EMBEDS", value)]));
            assert_eq!(
                config.render_embeds,
                expected.unwrap_or(true),
                "value: {:?}",
                value
            );
        }
    }

    #[test]
    fn defaults_apply_when_variables_are_missing() {
        let config = Config::from_lookup(lookup_from(&[("HOME", "/home/writer")]));
        assert_eq!(config.autosave_delay_ms, DEFAULT_AUTOSAVE_DELAY_MS);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(config.render_embeds);
        assert_eq!(
            Path::new(&config.draft_path),
            Path::new("/home/writer").join(".cache/inkdraft/draft.md")
        );
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("HOME", "/home/writer"),
            ("INKDRAFT_DRAFT_PATH", "~/notes/post.md"),
            ("INKDRAFT_AUTOSAVE_MS", "250"),
            ("INKDRAFT_HISTORY_LIMIT", "20"),
            ("INKDRAFT_RENDER_EMBEDS", "off"),
        ]));
        assert_eq!(
            Path::new(&config.draft_path),
            Path::new("/home/writer").join("notes/post.md")
        );
        assert_eq!(config.autosave_delay().as_millis(), 250);
        assert_eq!(config.history_limit, 20);
        assert!(!config.render_embeds);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        let config = Config::from_lookup(lookup_from(&[
            ("INKDRAFT_AUTOSAVE_MS", "soon"),
            ("INKDRAFT_HISTORY_LIMIT", "0"),
            ("INKDRAFT_RENDER_EMBEDS", "sometimes"),
        ]));
        assert_eq!(config.autosave_delay_ms, DEFAULT_AUTOSAVE_DELAY_MS);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
        assert!(config.render_embeds);
    }
}
