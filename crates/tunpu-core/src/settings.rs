use crate::region::Pitch;
use crate::theme::ThemeVariant;
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const CONFIG_FILE: &str = "config.toml";
const ENV_PREFIX: &str = "TUNPU_";

const SYSTEM_INSTRUCTION: &str = r#"You are a helpful, enthusiastic, and knowledgeable smart guide for the "Yunfeng Tunpu" (云峰屯堡) scenic area in China.
You are represented as a 3D digital avatar.
Keep your answers concise, friendly, and helpful for tourists on mobile devices.
If asked about the weather, assume it's pleasant and 19°C.
Answer in Chinese."#;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] Box<figment::Error>),
    #[error("failed to parse configuration file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to write configuration: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must be positive")]
    NonPositivePitch(&'static str),
    #[error("lock timeout must be greater than zero")]
    ZeroLockTimeout,
    #[error("smooth scroll ({scroll_ms}ms) outlasts the scroll lock ({lock_ms}ms)")]
    ScrollOutlastsLock { scroll_ms: u64, lock_ms: u64 },
    #[error("px_per_cell must be positive")]
    NonPositiveCell,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationSettings {
    /// Usually supplied through `API_KEY`; never written back to disk.
    #[serde(skip_serializing)]
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout_secs: u64,
    pub system_instruction: String,
    pub fallback_message: String,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-3-flash-preview".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 30,
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            fallback_message: "网络开小差了，请稍后再试。".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SyncSettings {
    pub lock_timeout_ms: u64,
    pub settle_tolerance_px: f32,
    pub smooth_scroll_ms: u64,
    /// Release a lock as soon as the animation it guards settles instead of
    /// waiting for the timeout.
    pub release_on_settle: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            lock_timeout_ms: 600,
            settle_tolerance_px: 10.0,
            smooth_scroll_ms: 450,
            release_on_settle: false,
        }
    }
}

impl SyncSettings {
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    pub fn smooth_scroll(&self) -> Duration {
        Duration::from_millis(self.smooth_scroll_ms)
    }
}

/// Item geometry in pixels, plus the pixel size of one terminal cell.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutSettings {
    pub hero_card_width: f32,
    pub hero_gap: f32,
    pub agent_item_width: f32,
    pub agent_gap: f32,
    pub chip_width: f32,
    pub chip_gap: f32,
    pub px_per_cell: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            hero_card_width: 300.0,
            hero_gap: 20.0,
            agent_item_width: 96.0,
            agent_gap: 0.0,
            chip_width: 88.0,
            chip_gap: 8.0,
            px_per_cell: 8.0,
        }
    }
}

impl LayoutSettings {
    pub fn hero_pitch(&self) -> Pitch {
        Pitch::new(self.hero_card_width, self.hero_gap)
    }

    pub fn agent_pitch(&self) -> Pitch {
        Pitch::new(self.agent_item_width, self.agent_gap)
    }

    pub fn chip_pitch(&self) -> Pitch {
        Pitch::new(self.chip_width, self.chip_gap)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DragSettings {
    pub threshold_px: f32,
}

impl Default for DragSettings {
    fn default() -> Self {
        Self {
            threshold_px: crate::drag::DEFAULT_DRAG_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// One of trace, debug, info, warn, error.
    pub level: String,
    /// Log file; defaults to `tunpu.log` in the platform data directory.
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub theme: ThemeVariant,
    pub generation: GenerationSettings,
    pub sync: SyncSettings,
    pub layout: LayoutSettings,
    pub drag: DragSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load from the platform config file, falling back to defaults for
    /// anything it does not set.
    pub fn new() -> Result<Self, SettingsError> {
        Self::load_from(&config_path())
    }

    /// Defaults, then `path`, then `TUNPU_*` variables (`__` separates
    /// sections), then a bare `API_KEY`.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        Self::figment(path).extract().map_err(|e| SettingsError::Load(Box::new(e)))
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .merge(Env::raw().only(&["API_KEY"]).map(|_| "generation.api_key".into()))
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        write_config(path, &toml::to_string_pretty(self)?)
    }

    /// Persist the theme choice to the platform config file.
    pub fn save_theme(theme: ThemeVariant) -> Result<(), SettingsError> {
        Self::save_theme_to(&config_path(), theme)
    }

    /// Rewrite only the `theme` key of the file at `path`. Other keys keep
    /// what the file holds, so nothing merged from the environment or from
    /// defaults is written. A file that does not parse is left alone.
    pub fn save_theme_to(path: &Path, theme: ThemeVariant) -> Result<(), SettingsError> {
        let mut table = match fs::read_to_string(path) {
            Ok(text) => text.parse::<toml::Table>()?,
            Err(e) if e.kind() == ErrorKind::NotFound => toml::Table::new(),
            Err(e) => return Err(e.into()),
        };
        table.insert("theme".to_string(), toml::Value::try_from(theme)?);
        write_config(path, &toml::to_string_pretty(&table)?)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let layout = &self.layout;
        for (name, value) in [
            ("hero pitch", layout.hero_pitch().value()),
            ("agent pitch", layout.agent_pitch().value()),
            ("chip pitch", layout.chip_pitch().value()),
        ] {
            if value <= 0.0 {
                return Err(ValidationError::NonPositivePitch(name));
            }
        }
        if self.sync.lock_timeout_ms == 0 {
            return Err(ValidationError::ZeroLockTimeout);
        }
        if self.sync.smooth_scroll_ms > self.sync.lock_timeout_ms {
            return Err(ValidationError::ScrollOutlastsLock {
                scroll_ms: self.sync.smooth_scroll_ms,
                lock_ms: self.sync.lock_timeout_ms,
            });
        }
        if layout.px_per_cell <= 0.0 {
            return Err(ValidationError::NonPositiveCell);
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        !self.generation.api_key.trim().is_empty()
    }
}

fn write_config(path: &Path, contents: &str) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "tunpu")
}

/// `config.toml` in the platform config directory, or the working directory
/// when none can be determined.
pub fn config_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
}

/// Default log file location.
pub fn default_log_path() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_local_dir().join("tunpu.log"))
        .unwrap_or_else(|| PathBuf::from("tunpu.log"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.theme, ThemeVariant::Dusk);
        assert_eq!(settings.sync.lock_timeout_ms, 600);
        assert_eq!(settings.layout.hero_pitch().value(), 320.0);
        assert_eq!(settings.layout.agent_pitch().value(), 96.0);
        assert_eq!(settings.generation.model, "gemini-3-flash-preview");
        assert!(!settings.has_api_key());
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    theme = "Daylight"

                    [sync]
                    lock_timeout_ms = 800

                    [generation]
                    model = "from-file"
                "#,
            )?;
            jail.set_env("TUNPU_GENERATION__MODEL", "from-env");
            jail.set_env("API_KEY", "secret");

            let settings = Settings::load_from(Path::new("config.toml")).expect("settings load");

            assert_eq!(settings.theme, ThemeVariant::Daylight);
            assert_eq!(settings.sync.lock_timeout_ms, 800);
            assert_eq!(settings.sync.smooth_scroll_ms, 450);
            assert_eq!(settings.generation.model, "from-env");
            assert_eq!(settings.generation.api_key, "secret");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let settings = Settings::load_from(Path::new("absent.toml")).expect("settings load");
            assert_eq!(settings.sync, SyncSettings::default());
            assert_eq!(settings.layout, LayoutSettings::default());
            assert_eq!(settings.drag, DragSettings::default());
            Ok(())
        });
    }

    #[test]
    fn test_save_round_trip() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("nested").join("config.toml");
            let mut settings = Settings::default();
            settings.drag.threshold_px = 4.0;
            settings.save_to(&path).expect("save");

            let loaded = Settings::load_from(&path).expect("reload");
            assert_eq!(loaded.drag.threshold_px, 4.0);
            Ok(())
        });
    }

    #[test]
    fn test_theme_save_keeps_secrets_out_of_the_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    [generation]
                    model = "from-file"
                "#,
            )?;
            jail.set_env("API_KEY", "super-secret");
            jail.set_env("TUNPU_SYNC__LOCK_TIMEOUT_MS", "900");
            let path = jail.directory().join("config.toml");

            let settings = Settings::load_from(&path).expect("settings load");
            assert!(settings.has_api_key());
            Settings::save_theme_to(&path, ThemeVariant::Daylight).expect("save theme");

            let written = fs::read_to_string(&path).expect("read back");
            assert!(!written.contains("super-secret"));
            assert!(!written.contains("lock_timeout_ms"));
            assert!(written.contains("from-file"));

            let reloaded = Settings::load_from(&path).expect("reload");
            assert_eq!(reloaded.theme, ThemeVariant::Daylight);
            assert_eq!(reloaded.generation.model, "from-file");
            Ok(())
        });
    }

    #[test]
    fn test_theme_save_leaves_unreadable_file_alone() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "theme = [")?;
            let path = jail.directory().join("config.toml");

            assert!(Settings::load_from(&path).is_err());
            let result = Settings::save_theme_to(&path, ThemeVariant::Daylight);
            assert!(matches!(result, Err(SettingsError::Parse(_))));
            assert_eq!(fs::read_to_string(&path).expect("read back"), "theme = [");
            Ok(())
        });
    }

    #[test]
    fn test_full_save_omits_api_key() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("config.toml");
            let mut settings = Settings::default();
            settings.generation.api_key = "super-secret".to_string();
            settings.save_to(&path).expect("save");
            let written = fs::read_to_string(&path).expect("read back");
            assert!(!written.contains("super-secret"));
            Ok(())
        });
    }

    #[test]
    fn test_validation_rejects_bad_geometry() {
        let mut settings = Settings::default();
        settings.layout.agent_item_width = 0.0;
        assert_eq!(
            settings.validate(),
            Err(ValidationError::NonPositivePitch("agent pitch"))
        );

        let mut settings = Settings::default();
        settings.sync.smooth_scroll_ms = 900;
        assert_eq!(
            settings.validate(),
            Err(ValidationError::ScrollOutlastsLock {
                scroll_ms: 900,
                lock_ms: 600
            })
        );

        let mut settings = Settings::default();
        settings.sync.lock_timeout_ms = 0;
        settings.sync.smooth_scroll_ms = 0;
        assert_eq!(settings.validate(), Err(ValidationError::ZeroLockTimeout));
    }
}
