use anyhow::Result;
use chrono_tz::Tz;
use config::Config;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// IANA zone that schedule slots and "now" are interpreted in.
    pub timezone: String,
    /// Default projection horizon when `--horizon` is not given.
    pub horizon_days: u32,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads settings from defaults, an optional TOML file, and `COURSEFORGE_*`
    /// environment variables, in increasing order of precedence.
    ///
    /// Without an explicit `path`, `./courseforge.toml` is read if it exists.
    /// Nested keys use a double underscore: `COURSEFORGE_LOGGING__LEVEL=debug`.
    ///
    /// ## Errors
    /// Returns an error if an explicit file is missing, or if building or
    /// deserializing the configuration fails.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let file = match path {
            Some(path) => config::File::with_name(path).required(true),
            None => config::File::with_name("courseforge").required(false),
        };

        Ok(Config::builder()
            .set_default("timezone", "UTC")?
            .set_default("horizon_days", 7)?
            .set_default("logging.level", "warn")?
            .add_source(file)
            .add_source(
                config::Environment::with_prefix("COURSEFORGE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }

    /// ## Summary
    /// Resolves the configured timezone.
    ///
    /// ## Errors
    /// Returns an error if the name is not a known IANA zone.
    pub fn tz(&self) -> Result<Tz> {
        Ok(courseforge_core::parse_timezone(&self.timezone)?)
    }
}
