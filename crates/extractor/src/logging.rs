//! Logging Initialisation

use crate::error::SettingsError;
use crate::settings::LoggingSettings;
use std::str::FromStr;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global tracing subscriber described by `settings`.
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> Result<(), SettingsError> {
    let level = Level::from_str(&settings.level).map_err(|_| SettingsError::LogLevel(settings.level.clone()))?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(settings.target);

    if settings.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}
