use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerSettings,
    pub journal: JournalSettings,
}

/// Where the JSON API listens.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Journal behavior toggles.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalSettings {
    /// When true, the store is populated with demo data at startup.
    #[serde(default)]
    pub seed_demo: bool,
}
