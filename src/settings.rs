use std::env;
use std::error::Error;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::slack::ResolveOptions;

static CONFIG_FILE_RELPATH: &'static str = ".config/slack_channels.json";

lazy_static! {
    pub static ref GLOBAL_SETTINGS: Arc<RwLock<Settings>> =
        Arc::new(RwLock::new(Settings::default()));
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// env_logger filter, used when RUST_LOG is not set.
    pub log_filter: String,
    /// Reject payload keys a representation does not declare.
    pub strict_keys: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: "info".to_owned(),
            strict_keys: true,
        }
    }
}

impl Settings {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            strict: self.strict_keys,
        }
    }

    /// A copy for one run that ignores undeclared keys. `GLOBAL_SETTINGS`
    /// and the settings file are left alone.
    pub fn with_lenient_keys(&self) -> Settings {
        Settings {
            strict_keys: false,
            ..self.clone()
        }
    }
}

fn get_settings_file_path() -> Option<PathBuf> {
    let home = env::var_os("HOME")?;
    Some(PathBuf::from(home).join(CONFIG_FILE_RELPATH))
}

pub fn parse_settings(contents: &str) -> Result<Settings, serde_json::Error> {
    serde_json::from_str(contents)
}

/// Reads a settings file. Only a missing file falls back to the defaults.
pub fn read_settings_from(path: &Path) -> Result<Settings, Box<dyn Error>> {
    let mut file: File = match File::open(path) {
        Ok(file) => file,
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => return Ok(Settings::default()),
        Err(e) => return Err(format!("Can't open settings file {}: {}", path.display(), e).into()),
    };
    let contents = &mut String::new();
    file.read_to_string(contents)?;
    parse_settings(contents)
        .map_err(|e| format!("Invalid settings file {}: {}", path.display(), e).into())
}

/// Loads the settings file into `GLOBAL_SETTINGS` and returns a copy.
pub fn load_settings() -> Result<Settings, Box<dyn Error>> {
    let settings = match get_settings_file_path() {
        Some(path) => read_settings_from(&path)?,
        None => Settings::default(),
    };
    let mut global = GLOBAL_SETTINGS.write().map_err(|e| e.to_string())?;
    *global = settings.clone();
    Ok(settings)
}

pub fn save_settings() -> Result<(), Box<dyn Error>> {
    let settings = GLOBAL_SETTINGS.read().map_err(|e| e.to_string())?;
    let path = get_settings_file_path().ok_or("HOME is not set, can't locate the settings file")?;

    let mut file = File::create(path)?;
    let encoded = serde_json::to_string_pretty(&*settings)?;
    file.set_len(0)?;
    file.write_all(encoded.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_settings_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("slack_channels_{}_{}.json", std::process::id(), name))
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings = parse_settings(r#"{ "log_filter": "debug" }"#).unwrap();
        assert_eq!(settings.log_filter, "debug");
        assert!(settings.strict_keys);
        assert_eq!(settings.resolve_options(), ResolveOptions::strict());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(parse_settings("{}").unwrap(), Settings::default());
    }

    #[test]
    fn lenient_keys_can_be_configured() {
        let settings = parse_settings(r#"{ "strict_keys": false }"#).unwrap();
        assert_eq!(settings.resolve_options(), ResolveOptions::lenient());
    }

    #[test]
    fn lenient_override_leaves_stored_settings_alone() {
        let stored = Settings::default();
        let run = stored.with_lenient_keys();
        assert_eq!(run.resolve_options(), ResolveOptions::lenient());
        assert_eq!(run.log_filter, stored.log_filter);
        assert!(stored.strict_keys);
        assert_eq!(
            serde_json::to_value(&stored).unwrap()["strict_keys"],
            serde_json::Value::Bool(true)
        );
    }

    #[test]
    fn rejects_malformed_file() {
        assert!(parse_settings(r#"{ "strict_keys": "yes" }"#).is_err());
    }

    #[test]
    fn absent_file_uses_defaults() {
        let path = temp_settings_path("absent");
        let _ = fs::remove_file(&path);
        assert_eq!(read_settings_from(&path).unwrap(), Settings::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = temp_settings_path("malformed");
        fs::write(&path, r#"{ "strict_keys": "yes" }"#).unwrap();
        let err = read_settings_from(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().starts_with("Invalid settings file"));

        let path = temp_settings_path("typo");
        fs::write(&path, r#"{ "log_filter": "info", }"#).unwrap();
        assert!(read_settings_from(&path).is_err());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn valid_file_is_read() {
        let path = temp_settings_path("valid");
        fs::write(&path, r#"{ "log_filter": "warn", "strict_keys": false }"#).unwrap();
        let settings = read_settings_from(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(
            settings,
            Settings {
                log_filter: "warn".to_owned(),
                strict_keys: false,
            }
        );
    }
}
