//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Load `.env` into the process environment when present
//! 2. Build from environment variables
//! 3. If a required variable is missing, fall back to a config file
//! 4. Validate the result
//!
//! ## Environment Variables
//! - `STUDYLENS_FOLDER_ID` (required)
//! - `STUDYLENS_REFRESH_TOKEN`: refresh secret; absence is reported on first
//!   renewal, not here
//! - `STUDYLENS_IDENTITY_URL`, `STUDYLENS_VISION_URL`, `STUDYLENS_GPT_URL`
//! - `STUDYLENS_GPT_MODEL`: full model URI
//! - `STUDYLENS_LANGUAGES`: comma list, e.g. `ru,en`
//! - `STUDYLENS_REQUEST_TIMEOUT_SECS`, `STUDYLENS_RENEWAL_MARGIN_SECS`,
//!   `STUDYLENS_EVENT_LOG_CAPACITY`
//!
//! ## File Locations
//! 1. `./studylens.{json,toml}`, then `./config.{json,toml}`
//! 2. The same names next to the executable

use std::path::{Path, PathBuf};
use std::str::FromStr;

use studylens_domain::{AppConfig, Result, StudyLensError};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["studylens.json", "studylens.toml", "config.json", "config.toml"];

/// Load configuration with the environment-then-file fallback.
///
/// # Errors
/// Returns `StudyLensError::Config` when neither source yields a valid
/// configuration.
pub fn load() -> Result<AppConfig> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = %e, "Environment incomplete, trying config file");
            load_from_file(None)
        }
    }
}

/// Load configuration from `STUDYLENS_*` environment variables.
///
/// # Errors
/// Returns `StudyLensError::Config` if `STUDYLENS_FOLDER_ID` is missing, a
/// numeric variable does not parse, or validation fails.
pub fn load_from_env() -> Result<AppConfig> {
    let mut config = AppConfig::with_folder(env_var("STUDYLENS_FOLDER_ID")?);

    config.identity.refresh_token = env_opt("STUDYLENS_REFRESH_TOKEN");
    if let Some(url) = env_opt("STUDYLENS_IDENTITY_URL") {
        config.identity.url = url;
    }
    if let Some(url) = env_opt("STUDYLENS_VISION_URL") {
        config.vision.url = url;
    }
    if let Some(url) = env_opt("STUDYLENS_GPT_URL") {
        config.generation.url = url;
    }
    config.generation.model_uri = env_opt("STUDYLENS_GPT_MODEL");
    if let Some(languages) = env_opt("STUDYLENS_LANGUAGES") {
        config.vision.language_codes = parse_languages(&languages);
    }
    if let Some(secs) = env_parse("STUDYLENS_REQUEST_TIMEOUT_SECS")? {
        config.runtime.request_timeout_secs = secs;
    }
    if let Some(secs) = env_parse("STUDYLENS_RENEWAL_MARGIN_SECS")? {
        config.identity.renewal_margin_secs = secs;
    }
    if let Some(capacity) = env_parse("STUDYLENS_EVENT_LOG_CAPACITY")? {
        config.runtime.event_log_capacity = capacity;
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file.
///
/// If `path` is `None`, uses [`probe_config_paths`]. Format follows the
/// extension (`.json` or `.toml`).
///
/// # Errors
/// Returns `StudyLensError::Config` if the file is missing or unreadable, the
/// format is invalid, or validation fails.
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(StudyLensError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            StudyLensError::Config(
                "STUDYLENS_FOLDER_ID is not set and no config file was found".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| StudyLensError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| StudyLensError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| StudyLensError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(StudyLensError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file in the working directory, then beside the
/// executable.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn env_var(key: &str) -> Result<String> {
    env_opt(key).ok_or_else(|| {
        StudyLensError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Set and non-blank, trimmed.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|value| value.trim().to_string()).filter(|v| !v.is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| StudyLensError::Config(format!("Invalid value for {key}: {e}")))
        })
        .transpose()
}

fn parse_languages(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|code| !code.is_empty()).map(String::from).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::Builder;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 10] = [
        "STUDYLENS_FOLDER_ID",
        "STUDYLENS_REFRESH_TOKEN",
        "STUDYLENS_IDENTITY_URL",
        "STUDYLENS_VISION_URL",
        "STUDYLENS_GPT_URL",
        "STUDYLENS_GPT_MODEL",
        "STUDYLENS_LANGUAGES",
        "STUDYLENS_REQUEST_TIMEOUT_SECS",
        "STUDYLENS_RENEWAL_MARGIN_SECS",
        "STUDYLENS_EVENT_LOG_CAPACITY",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    fn write_config(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_from_env_with_defaults() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("STUDYLENS_FOLDER_ID", "b1gfolder");

        let config = load_from_env().unwrap();
        assert_eq!(config.folder_id, "b1gfolder");
        assert_eq!(config.identity.refresh_token, None);
        assert_eq!(config.model_uri(), "gpt://b1gfolder/yandexgpt-lite");
        assert_eq!(config.vision.language_codes, vec!["ru", "en"]);
        assert_eq!(config.runtime.request_timeout_secs, 30);

        clear_env();
    }

    #[test]
    fn test_load_from_env_overrides() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("STUDYLENS_FOLDER_ID", "b1gfolder");
        std::env::set_var("STUDYLENS_REFRESH_TOKEN", "refresh-secret");
        std::env::set_var("STUDYLENS_VISION_URL", "http://127.0.0.1:9000/vision");
        std::env::set_var("STUDYLENS_GPT_MODEL", "gpt://b1gfolder/yandexgpt/latest");
        std::env::set_var("STUDYLENS_LANGUAGES", " en , de ,");
        std::env::set_var("STUDYLENS_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("STUDYLENS_RENEWAL_MARGIN_SECS", "60");
        std::env::set_var("STUDYLENS_EVENT_LOG_CAPACITY", "10");

        let config = load_from_env().unwrap();
        assert_eq!(config.identity.refresh_token.as_deref(), Some("refresh-secret"));
        assert_eq!(config.vision.url, "http://127.0.0.1:9000/vision");
        assert_eq!(config.model_uri(), "gpt://b1gfolder/yandexgpt/latest");
        assert_eq!(config.vision.language_codes, vec!["en", "de"]);
        assert_eq!(config.runtime.request_timeout_secs, 5);
        assert_eq!(config.identity.renewal_margin_secs, 60);
        assert_eq!(config.runtime.event_log_capacity, 10);

        clear_env();
    }

    #[test]
    fn test_load_from_env_missing_folder() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, StudyLensError::Config(ref msg) if msg.contains("FOLDER_ID")));
    }

    #[test]
    fn test_load_from_env_invalid_number() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();
        std::env::set_var("STUDYLENS_FOLDER_ID", "b1gfolder");
        std::env::set_var("STUDYLENS_EVENT_LOG_CAPACITY", "many");

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, StudyLensError::Config(ref msg) if msg.contains("CAPACITY")));

        std::env::set_var("STUDYLENS_EVENT_LOG_CAPACITY", "0");
        assert!(load_from_env().is_err(), "zero capacity fails validation");

        clear_env();
    }

    #[test]
    fn test_load_from_file_json() {
        let file = write_config(
            ".json",
            r#"{ "folder_id": "b1gfolder", "runtime": { "request_timeout_secs": 12 } }"#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.folder_id, "b1gfolder");
        assert_eq!(config.runtime.request_timeout_secs, 12);
    }

    #[test]
    fn test_load_from_file_toml() {
        let file = write_config(
            ".toml",
            r#"
folder_id = "b1gfolder"

[vision]
language_codes = ["en"]
"#,
        );

        let config = load_from_file(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.vision.language_codes, vec!["en"]);
        assert_eq!(config.vision.model, "page");
    }

    #[test]
    fn test_load_from_file_not_found() {
        let err = load_from_file(Some(PathBuf::from("/nonexistent/studylens.json"))).unwrap_err();
        assert!(matches!(err, StudyLensError::Config(_)));
    }

    #[test]
    fn test_load_from_file_rejects_invalid_config() {
        let broken = write_config(".json", r#"{ "folder_id": "#);
        assert!(load_from_file(Some(broken.path().to_path_buf())).is_err());

        let empty_folder = write_config(".toml", r#"folder_id = """#);
        assert!(load_from_file(Some(empty_folder.path().to_path_buf())).is_err());
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("folder_id: x", Path::new("studylens.yaml"));
        assert!(result.is_err());
    }
}
