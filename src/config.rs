use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Root of the contacts API; `/contacts` is appended to it
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Ask before deleting a contact
    pub confirm_deletes: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000/api".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confirm_deletes: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional config file and the environment
    pub fn load() -> anyhow::Result<Self> {
        let builder = Self::defaults()?
            // Add config file if it exists
            .add_source(config::File::with_name("config").required(false))
            // Environment variables with prefix "CONTACTS_", e.g. CONTACTS_API__BASE_URL
            .add_source(
                config::Environment::with_prefix("CONTACTS")
                    .prefix_separator("_")
                    .separator("__"),
            );

        let app_config: AppConfig = builder.build()?.try_deserialize()?;
        Ok(app_config)
    }

    fn defaults() -> anyhow::Result<ConfigBuilder<DefaultState>> {
        Ok(config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    #[test]
    fn test_defaults_point_at_local_api() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:3000/api");
        assert!(config.ui.confirm_deletes);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = r#"
            [api]
            base_url = "http://contacts.internal:8080/api"
        "#;
        let config: AppConfig = AppConfig::defaults()
            .unwrap()
            .add_source(File::from_str(file, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.api.base_url, "http://contacts.internal:8080/api");
        assert!(config.ui.confirm_deletes);
    }
}
