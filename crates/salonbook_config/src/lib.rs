use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;
pub mod models;
pub use models::*;

/// Marker value that is replaced by an environment variable named after the key path.
pub const SECRET_FROM_ENV: &str = "secret_from_env";

/// Loads the application configuration.
///
/// Sources are layered in this order, later ones winning:
/// `config/default.*`, `config/{RUN_ENV}.*` and `SALONBOOK_*` environment
/// variables (nested keys separated by `__`, e.g. `SALONBOOK_SERVER__PORT`).
/// The directory can be moved with `CONFIG_DIR`, the prefix with `PREFIX`.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    load_config_from(Path::new(&config_dir))
}

/// Same as [`load_config`] but reads the config files from `config_dir`.
pub fn load_config_from(config_dir: &Path) -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env::var("PREFIX").unwrap_or_else(|_| "SALONBOOK".to_string());

    let default_path: PathBuf = config_dir.join("default");
    let env_path: PathBuf = config_dir.join(&run_env);

    let builder = Config::builder()
        .add_source(File::with_name(&default_path.to_string_lossy()).required(false))
        .add_source(File::with_name(&env_path.to_string_lossy()).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let raw_config: AppConfig = builder.build()?.try_deserialize()?;
    apply_env_overrides_from_marker(raw_config)
}

/// Recursively replaces all "secret_from_env" string values with environment variable values
fn inject_env_secrets(value: &mut Value) {
    fn walk(path: Vec<String>, obj: &mut Value) {
        match obj {
            Value::Object(map) => {
                for (k, v) in map.iter_mut() {
                    let mut new_path = path.clone();
                    new_path.push(k.to_string());
                    walk(new_path, v);
                }
            }
            Value::String(s) if s == SECRET_FROM_ENV => {
                let env_key = path.join("_").to_uppercase();
                if let Ok(env_val) = std::env::var(&env_key) {
                    *obj = Value::String(env_val);
                } else {
                    warn!("env var {} not found for {}", env_key, SECRET_FROM_ENV);
                }
            }
            _ => {}
        }
    }

    walk(vec![], value);
}

/// Applies environment overrides based on "secret_from_env" markers in serialized config
pub fn apply_env_overrides_from_marker(config: AppConfig) -> Result<AppConfig, ConfigError> {
    let mut json = serde_json::to_value(&config)
        .map_err(|err| ConfigError::Message(format!("failed to serialize config: {err}")))?;
    inject_env_secrets(&mut json);
    serde_json::from_value(json)
        .map_err(|err| ConfigError::Message(format!("failed to rebuild config: {err}")))
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is taken from `DOTENV_OVERRIDE`, else from a first command line
/// argument starting with `.env`, else `.env`. Loading happens once per process.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = std::env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
