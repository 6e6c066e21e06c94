use odt_editor::controllers::ContentSize;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "odt.config.json";

/// ODT editor configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Member id used for operations issued from this machine
    #[serde(default = "default_member_id")]
    pub member_id: String,

    /// Page content area used to scale inserted images
    #[serde(default = "default_page_content_width_px")]
    pub page_content_width_px: f64,

    #[serde(default = "default_page_content_height_px")]
    pub page_content_height_px: f64,

    /// Log filter used when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_member_id() -> String {
    "localuser".to_string()
}

// A4 with 2cm margins at 37.8 px/cm
fn default_page_content_width_px() -> f64 {
    642.6
}

fn default_page_content_height_px() -> f64 {
    971.46
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn page_content_size(&self) -> ContentSize {
        ContentSize::new(self.page_content_width_px, self.page_content_height_px)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            member_id: default_member_id(),
            page_content_width_px: default_page_content_width_px(),
            page_content_height_px: default_page_content_height_px(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "memberId": "alice",
            "pageContentWidthPx": 600,
            "logLevel": "debug"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.member_id, "alice");
        assert_eq!(config.page_content_width_px, 600.0);
        assert_eq!(config.page_content_height_px, 971.46);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.member_id, "localuser");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let cwd = dir.path().display().to_string();

        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.member_id, "localuser");

        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{"memberId":"bob"}"#,
        )
        .unwrap();
        let config = Config::load(&cwd).unwrap();
        assert_eq!(config.member_id, "bob");
    }
}
