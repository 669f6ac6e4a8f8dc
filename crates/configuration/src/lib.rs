use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{Config, JournalSettings, ServerSettings};

/// Loads the application configuration from a TOML file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, and returns it.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        // Environment variables win over the file, e.g. JOURNAL__SERVER__PORT.
        .add_source(config::Environment::with_prefix("JOURNAL").separator("__"))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;

    if config.server.host.is_empty() {
        return Err(ConfigError::ValidationError(
            "server.host must not be empty".to_string(),
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_settings_from_toml() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nhost = \"127.0.0.1\"\nport = 3000\n\n[journal]\nseed_demo = true\n"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert!(config.journal.seed_demo);
    }
}
