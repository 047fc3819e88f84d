use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use regex::Regex;

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an assistant that describes the differences between two images. \
Focus on what objects have been removed or changed in the second image compared to the first one.";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub vision: VisionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Parent directory of per-request upload sessions
    #[serde(default = "default_scratch_root")]
    pub scratch_root: PathBuf,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Translation relay fronting the multi-provider library.
    /// When unset only `google` is served, directly.
    #[serde(default)]
    pub relay_url: Option<String>,
    #[serde(default = "default_google_endpoint")]
    pub google_endpoint: String,
    #[serde(default = "default_translation_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisionConfig {
    #[serde(default = "default_base_url")]
    pub default_base_url: String,
    #[serde(default = "default_model")]
    pub default_model: String,
    #[serde(default = "default_system_prompt")]
    pub default_system_prompt: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_vision_timeout")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5005
}

fn default_scratch_root() -> PathBuf {
    std::env::temp_dir().join("kontext_uploads")
}

fn default_max_body_bytes() -> usize {
    500 * 1024 * 1024
}

fn default_google_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_translation_timeout() -> u64 {
    30
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4-vision-preview".to_string()
}

fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_max_tokens() -> u32 {
    300
}

fn default_vision_timeout() -> u64 {
    120
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            scratch_root: default_scratch_root(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            google_endpoint: default_google_endpoint(),
            timeout_secs: default_translation_timeout(),
        }
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            default_base_url: default_base_url(),
            default_model: default_model(),
            default_system_prompt: default_system_prompt(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_vision_timeout(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }
        let content = substitute_env_vars(&fs::read_to_string(path)?);
        Self::parse(path, &content)
    }

    /// Parse config text, picking the format from the file extension
    pub fn parse(path: &str, content: &str) -> Result<Self> {
        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".json") {
            Ok(serde_json::from_str(content)?)
        } else {
            Ok(serde_yaml::from_str(content)?)
        }
    }

    /// Try each candidate path in order. Falls back to defaults when none load.
    pub fn load_first(paths: &[String]) -> (Self, Option<String>) {
        for path in paths {
            match Self::load(path) {
                Ok(cfg) => return (cfg, Some(path.clone())),
                Err(e) => {
                    tracing::debug!("Failed to load config from {}: {}", path, e);
                }
            }
        }
        (Self::default(), None)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Replace `${VAR_NAME}` with the environment value; unknown variables are left as-is
pub fn substitute_env_vars(content: &str) -> String {
    let pattern = Regex::new(r"\$\{(\w+)\}").expect("static regex");
    pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let cfg = Config::parse("conf.yaml", "server:\n  port: 8080\n").unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.server.max_body_bytes, 500 * 1024 * 1024);
        assert_eq!(cfg.vision.default_model, "gpt-4-vision-preview");
        assert_eq!(cfg.vision.default_base_url, "https://api.openai.com/v1");
        assert!(cfg.translation.relay_url.is_none());
    }

    #[test]
    fn test_json_config() {
        let cfg = Config::parse(
            "conf.json",
            r#"{"translation": {"relay_url": "http://localhost:8000"}}"#,
        )
        .unwrap();
        assert_eq!(cfg.translation.relay_url.as_deref(), Some("http://localhost:8000"));
        assert_eq!(cfg.translation.timeout_secs, 30);
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("KONTEXT_TEST_RELAY", "http://relay:9000");
        let out = substitute_env_vars("relay_url: ${KONTEXT_TEST_RELAY}\nother: ${KONTEXT_UNSET_VAR_X}");
        assert_eq!(out, "relay_url: http://relay:9000\nother: ${KONTEXT_UNSET_VAR_X}");
    }

    #[test]
    fn test_load_first_falls_back_to_defaults() {
        let (cfg, loaded) = Config::load_first(&["/nonexistent/conf.yaml".to_string()]);
        assert!(loaded.is_none());
        assert_eq!(cfg.server.port, 5005);
    }
}
