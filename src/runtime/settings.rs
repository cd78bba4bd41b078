use tracing::warn;

use crate::config;

/// Load settings, falling back to defaults when the config is unusable.
///
/// Runs before logging is set up, so problems are returned as a message for
/// the caller to log once the subscriber exists.
pub fn load_settings() -> (config::Settings, Option<String>) {
    match config::Settings::load() {
        Ok(s) => match s.validate() {
            Ok(()) => (s, None),
            Err(msg) => (
                config::Settings::default(),
                Some(format!("invalid config, using defaults: {msg}")),
            ),
        },
        // Config is optional; failures should not prevent the app from starting.
        Err(e) => (
            config::Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    }
}

/// Log a problem reported by `load_settings`.
pub fn report(problem: Option<&str>) {
    if let Some(msg) = problem {
        warn!("{msg}");
    }
}
