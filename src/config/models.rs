use crate::humanize::HumanDuration;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub cadence: CadenceConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Channel URLs, keyed `url1`..`url5` like the host settings form
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ChannelsConfig {
    pub url1: Option<String>,
    pub url2: Option<String>,
    pub url3: Option<String>,
    pub url4: Option<String>,
    pub url5: Option<String>,
}

impl ChannelsConfig {
    pub fn get_key(&self, key: &str) -> Option<&str> {
        let value = match key {
            "url1" => &self.url1,
            "url2" => &self.url2,
            "url3" => &self.url3,
            "url4" => &self.url4,
            "url5" => &self.url5,
            _ => return None,
        };
        value.as_deref()
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: HumanDuration,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: HumanDuration,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Honour HTTP_PROXY/HTTPS_PROXY from the environment
    #[serde(default = "default_system_proxy")]
    pub system_proxy: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
            user_agent: default_user_agent(),
            system_proxy: default_system_proxy(),
        }
    }
}

fn default_connect_timeout() -> HumanDuration {
    HumanDuration::from_millis(5_000)
}

fn default_request_timeout() -> HumanDuration {
    HumanDuration::from_millis(10_000)
}

fn default_user_agent() -> String {
    format!("camview/{}", env!("CARGO_PKG_VERSION"))
}

fn default_system_proxy() -> bool {
    true
}

/// Pauses between refresh cycles
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CadenceConfig {
    #[serde(default = "default_success_delay")]
    pub success_delay: HumanDuration,
    #[serde(default = "default_error_delay")]
    pub error_delay: HumanDuration,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            success_delay: default_success_delay(),
            error_delay: default_error_delay(),
        }
    }
}

fn default_success_delay() -> HumanDuration {
    HumanDuration::from_millis(100)
}

fn default_error_delay() -> HumanDuration {
    HumanDuration::from_millis(500)
}

/// Headless display output (used by the CLI host)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
        }
    }
}

fn default_output_path() -> PathBuf {
    PathBuf::from("background.img")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.cadence.success_delay.as_duration(), Duration::from_millis(100));
        assert_eq!(config.cadence.error_delay.as_duration(), Duration::from_millis(500));
        assert_eq!(config.fetch.request_timeout.as_duration(), Duration::from_secs(10));
        assert!(config.fetch.user_agent.starts_with("camview/"));
        assert!(config.channels.url1.is_none());
    }

    #[test]
    fn test_channels_get_key() {
        let channels: ChannelsConfig = toml::from_str(
            r#"
url1 = "http://cam-a/img.jpg"
url4 = "http://cam-d/img.jpg"
            "#,
        )
        .unwrap();

        assert_eq!(channels.get_key("url1"), Some("http://cam-a/img.jpg"));
        assert_eq!(channels.get_key("url2"), None);
        assert_eq!(channels.get_key("url4"), Some("http://cam-d/img.jpg"));
        assert_eq!(channels.get_key("url9"), None);
    }
}
