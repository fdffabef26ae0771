use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::utils::path::get_settings_path;

pub const DEFAULT_BIO_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VOICE: &str = "Kore";

/// Policy för nya försök mot extern tjänst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 500,
            max_delay_ms: 4_000,
        }
    }
}

/// Applikationsinställningar (sparas som TOML)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub dark_mode: bool,
    pub window_width: f32,
    pub window_height: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub bio_model: String,
    pub tts_model: String,
    pub voice_name: String,
    pub request_timeout_secs: u64,
    pub retry: RetrySettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            dark_mode: true,
            window_width: 1280.0,
            window_height: 800.0,
            api_key: None,
            bio_model: DEFAULT_BIO_MODEL.to_string(),
            tts_model: DEFAULT_TTS_MODEL.to_string(),
            voice_name: DEFAULT_VOICE.to_string(),
            request_timeout_secs: 30,
            retry: RetrySettings::default(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::load_from(&get_settings_path())
    }

    /// Läs från fil; saknad eller trasig fil ger standardvärden
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };

        match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ogiltig inställningsfil {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&get_settings_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// API-nyckel: inställningar först, sedan GEMINI_API_KEY och API_KEY
    pub fn effective_api_key(&self) -> Option<String> {
        let env_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .or_else(|| std::env::var("API_KEY").ok());
        self.api_key_with_fallback(env_key)
    }

    fn api_key_with_fallback(&self, env_key: Option<String>) -> Option<String> {
        let non_blank = |k: &str| {
            let k = k.trim();
            (!k.is_empty()).then(|| k.to_string())
        };
        self.api_key
            .as_deref()
            .and_then(non_blank)
            .or_else(|| env_key.as_deref().and_then(non_blank))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_settings_toml_roundtrip() {
        let mut settings = AppSettings::default();
        settings.api_key = Some("abc123".into());
        settings.retry.max_attempts = 5;

        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let loaded: AppSettings = toml::from_str(&toml_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_app_settings_backwards_compat() {
        // Äldre fil utan modell- och retry-fält ska ge standardvärden
        let old_toml = r#"
dark_mode = false
window_width = 1024.0
"#;
        let loaded: AppSettings = toml::from_str(old_toml).unwrap();
        assert!(!loaded.dark_mode);
        assert_eq!(loaded.window_width, 1024.0);
        assert_eq!(loaded.window_height, 800.0);
        assert_eq!(loaded.bio_model, DEFAULT_BIO_MODEL);
        assert_eq!(loaded.retry, RetrySettings::default());
        assert!(loaded.api_key.is_none());
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut settings = AppSettings::default();
        settings.voice_name = "Puck".into();
        settings.save_to(&path).unwrap();

        let loaded = AppSettings::load_from(&path);
        assert_eq!(loaded.voice_name, "Puck");
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "dark_mode = [[[").unwrap();

        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
        assert_eq!(
            AppSettings::load_from(&dir.path().join("saknas.toml")),
            AppSettings::default()
        );
    }

    #[test]
    fn test_api_key_precedence() {
        let mut settings = AppSettings::default();
        assert_eq!(settings.api_key_with_fallback(None), None);
        assert_eq!(
            settings.api_key_with_fallback(Some("env".into())).as_deref(),
            Some("env")
        );

        settings.api_key = Some("  egen  ".into());
        assert_eq!(
            settings.api_key_with_fallback(Some("env".into())).as_deref(),
            Some("egen")
        );

        settings.api_key = Some("   ".into());
        assert_eq!(settings.api_key_with_fallback(None), None);
        assert_eq!(
            settings.api_key_with_fallback(Some("env".into())).as_deref(),
            Some("env")
        );

        settings.api_key = Some(String::new());
        assert_eq!(
            settings.api_key_with_fallback(Some(" env ".into())).as_deref(),
            Some("env")
        );
        assert_eq!(settings.api_key_with_fallback(Some("  ".into())), None);
    }
}
