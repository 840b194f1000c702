// Configuration loading and parsing (config/rackmate.toml).

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

/// Top-level config assembled from rackmate.toml. Every section and field
/// has a default, so a partial (or empty) file is valid.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub query: QueryConfig,
}

/// The `[vocabulary]` table: where the ranked word list lives and how it is
/// filtered at load time.
#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyConfig {
    #[serde(default = "default_vocabulary_path")]
    pub path: String,
    /// Minimum Zipf frequency for a word to count as common.
    #[serde(default = "default_zipf_threshold")]
    pub zipf_threshold: f64,
    /// Cap on ranked rows read from the list.
    #[serde(default = "default_max_words")]
    pub max_words: usize,
    /// Length floor applied at load time. Query-time filtering still applies
    /// its own minimum, so this only bounds what the pool can ever contain.
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,
}

/// The `[source]` table: which candidate-word strategy to use.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// "local" (in-process vocabulary) or "remote" (HTTP lookup).
    #[serde(default = "default_source_mode")]
    pub mode: String,
    /// URL template for remote mode; must contain a `{rack}` placeholder.
    #[serde(default)]
    pub remote_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// The `[store]` table: where the allow/deny/seen lists are kept.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// "sqlite" (durable) or "memory" (ephemeral).
    #[serde(default = "default_store_backend")]
    pub backend: String,
    #[serde(default = "default_store_path")]
    pub path: String,
}

/// The `[display]` table: rendering layout.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_columns")]
    pub columns: usize,
    #[serde(default)]
    pub tiered: bool,
    #[serde(default = "default_notable_min")]
    pub notable_min: usize,
    #[serde(default = "default_notable_max")]
    pub notable_max: usize,
}

/// The `[query]` table: request-level defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_min_length")]
    pub default_min_length: usize,
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_vocabulary_path() -> String {
    "data/english_ranked.csv".to_string()
}

fn default_zipf_threshold() -> f64 {
    3.5
}

fn default_max_words() -> usize {
    250_000
}

fn default_min_word_length() -> usize {
    3
}

fn default_source_mode() -> String {
    "local".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_store_backend() -> String {
    "sqlite".to_string()
}

fn default_store_path() -> String {
    "rack-assistant.db".to_string()
}

fn default_columns() -> usize {
    5
}

fn default_notable_min() -> usize {
    6
}

fn default_notable_max() -> usize {
    7
}

fn default_min_length() -> usize {
    3
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        VocabularyConfig {
            path: default_vocabulary_path(),
            zipf_threshold: default_zipf_threshold(),
            max_words: default_max_words(),
            min_word_length: default_min_word_length(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            mode: default_source_mode(),
            remote_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            backend: default_store_backend(),
            path: default_store_path(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            columns: default_columns(),
            tiered: false,
            notable_min: default_notable_min(),
            notable_max: default_notable_max(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            default_min_length: default_min_length(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/rackmate.toml` relative to
/// the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_path = base_dir.join("config").join("rackmate.toml");
    let text = read_file(&config_path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: config_path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        // If config/ also doesn't exist, loading is guaranteed to fail.
        // Return an error with a clear message about the missing defaults directory.
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        // Skip non-files and entries without a file name
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    // Vocabulary validations
    if !config.vocabulary.zipf_threshold.is_finite() {
        return Err(ConfigError::ValidationError {
            field: "vocabulary.zipf_threshold".into(),
            message: format!("must be finite, got {}", config.vocabulary.zipf_threshold),
        });
    }

    if config.vocabulary.max_words == 0 {
        return Err(ConfigError::ValidationError {
            field: "vocabulary.max_words".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.vocabulary.min_word_length == 0 {
        return Err(ConfigError::ValidationError {
            field: "vocabulary.min_word_length".into(),
            message: "must be at least 1".into(),
        });
    }

    // Source validations
    match config.source.mode.as_str() {
        "local" => {}
        "remote" => {
            if !config.source.remote_url.contains("{rack}") {
                return Err(ConfigError::ValidationError {
                    field: "source.remote_url".into(),
                    message: "remote mode requires a URL containing a {rack} placeholder".into(),
                });
            }
        }
        other => {
            return Err(ConfigError::ValidationError {
                field: "source.mode".into(),
                message: format!("must be \"local\" or \"remote\", got \"{other}\""),
            });
        }
    }

    if config.source.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "source.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    // Store validations
    match config.store.backend.as_str() {
        "sqlite" => {
            if config.store.path.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    field: "store.path".into(),
                    message: "sqlite backend requires a database path".into(),
                });
            }
        }
        "memory" => {}
        other => {
            return Err(ConfigError::ValidationError {
                field: "store.backend".into(),
                message: format!("must be \"sqlite\" or \"memory\", got \"{other}\""),
            });
        }
    }

    // Display validations
    if config.display.columns == 0 {
        return Err(ConfigError::ValidationError {
            field: "display.columns".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.display.notable_min == 0 {
        return Err(ConfigError::ValidationError {
            field: "display.notable_min".into(),
            message: "must be at least 1".into(),
        });
    }

    if config.display.notable_min > config.display.notable_max {
        return Err(ConfigError::ValidationError {
            field: "display.notable_min".into(),
            message: format!(
                "must not exceed notable_max ({} > {})",
                config.display.notable_min, config.display.notable_max
            ),
        });
    }

    // Query validations
    if config.query.default_min_length == 0 {
        return Err(ConfigError::ValidationError {
            field: "query.default_min_length".into(),
            message: "must be at least 1".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    /// Helper: creates a temp base dir containing `config/rackmate.toml`
    /// with the given content. Caller removes it when done.
    fn write_config(name: &str, content: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("rackmate.toml"), content).unwrap();
        tmp
    }

    #[test]
    fn empty_file_loads_all_defaults() {
        let tmp = write_config("rackmate_config_test_empty", "");

        let config = load_config_from(&tmp).expect("empty file should load defaults");
        assert_eq!(config.vocabulary.path, "data/english_ranked.csv");
        assert!((config.vocabulary.zipf_threshold - 3.5).abs() < f64::EPSILON);
        assert_eq!(config.vocabulary.max_words, 250_000);
        assert_eq!(config.vocabulary.min_word_length, 3);
        assert_eq!(config.source.mode, "local");
        assert_eq!(config.source.timeout_secs, 10);
        assert_eq!(config.store.backend, "sqlite");
        assert_eq!(config.store.path, "rack-assistant.db");
        assert_eq!(config.display.columns, 5);
        assert!(!config.display.tiered);
        assert_eq!(config.display.notable_min, 6);
        assert_eq!(config.display.notable_max, 7);
        assert_eq!(config.query.default_min_length, 3);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn full_file_overrides_defaults() {
        let toml_text = r#"
[vocabulary]
path = "words/common.csv"
zipf_threshold = 4.0
max_words = 1000
min_word_length = 2

[source]
mode = "remote"
remote_url = "http://localhost:9999/racks/{rack}"
timeout_secs = 3

[store]
backend = "memory"

[display]
columns = 4
tiered = true
notable_min = 5
notable_max = 8

[query]
default_min_length = 4
"#;
        let tmp = write_config("rackmate_config_test_full", toml_text);

        let config = load_config_from(&tmp).expect("should load");
        assert_eq!(config.vocabulary.path, "words/common.csv");
        assert!((config.vocabulary.zipf_threshold - 4.0).abs() < f64::EPSILON);
        assert_eq!(config.vocabulary.max_words, 1000);
        assert_eq!(config.vocabulary.min_word_length, 2);
        assert_eq!(config.source.mode, "remote");
        assert_eq!(config.source.remote_url, "http://localhost:9999/racks/{rack}");
        assert_eq!(config.source.timeout_secs, 3);
        assert_eq!(config.store.backend, "memory");
        assert_eq!(config.display.columns, 4);
        assert!(config.display.tiered);
        assert_eq!(config.display.notable_min, 5);
        assert_eq!(config.display.notable_max, 8);
        assert_eq!(config.query.default_min_length, 4);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn partial_section_keeps_other_fields_default() {
        let tmp = write_config(
            "rackmate_config_test_partial",
            "[display]\ncolumns = 3\n",
        );

        let config = load_config_from(&tmp).expect("should load");
        assert_eq!(config.display.columns, 3);
        assert_eq!(config.display.notable_min, 6);
        assert_eq!(config.vocabulary.max_words, 250_000);

        let _ = fs::remove_dir_all(&tmp);
    }

    // -- Validation failures --

    fn assert_validation_field(tmp: &Path, expected_field: &str) {
        let err = load_config_from(tmp).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, expected_field);
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn rejects_zero_columns() {
        let tmp = write_config("rackmate_config_test_zero_cols", "[display]\ncolumns = 0\n");
        assert_validation_field(&tmp, "display.columns");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_source_mode() {
        let tmp = write_config(
            "rackmate_config_test_bad_mode",
            "[source]\nmode = \"oracle\"\n",
        );
        assert_validation_field(&tmp, "source.mode");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_remote_mode_without_rack_placeholder() {
        let tmp = write_config(
            "rackmate_config_test_no_placeholder",
            "[source]\nmode = \"remote\"\nremote_url = \"http://localhost/words\"\n",
        );
        assert_validation_field(&tmp, "source.remote_url");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_timeout() {
        let tmp = write_config(
            "rackmate_config_test_zero_timeout",
            "[source]\ntimeout_secs = 0\n",
        );
        assert_validation_field(&tmp, "source.timeout_secs");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_store_backend() {
        let tmp = write_config(
            "rackmate_config_test_bad_backend",
            "[store]\nbackend = \"spreadsheet\"\n",
        );
        assert_validation_field(&tmp, "store.backend");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_empty_sqlite_path() {
        let tmp = write_config(
            "rackmate_config_test_empty_db_path",
            "[store]\nbackend = \"sqlite\"\npath = \"\"\n",
        );
        assert_validation_field(&tmp, "store.path");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_max_words() {
        let tmp = write_config(
            "rackmate_config_test_zero_max",
            "[vocabulary]\nmax_words = 0\n",
        );
        assert_validation_field(&tmp, "vocabulary.max_words");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_finite_zipf_threshold() {
        let tmp = write_config(
            "rackmate_config_test_nan_zipf",
            "[vocabulary]\nzipf_threshold = nan\n",
        );
        assert_validation_field(&tmp, "vocabulary.zipf_threshold");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_inverted_notable_range() {
        let tmp = write_config(
            "rackmate_config_test_inverted_notable",
            "[display]\nnotable_min = 8\nnotable_max = 6\n",
        );
        assert_validation_field(&tmp, "display.notable_min");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_default_min_length() {
        let tmp = write_config(
            "rackmate_config_test_zero_minlen",
            "[query]\ndefault_min_length = 0\n",
        );
        assert_validation_field(&tmp, "query.default_min_length");
        let _ = fs::remove_dir_all(&tmp);
    }

    // -- Load error paths --

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("rackmate_config_test_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::FileNotFound { path } => {
                assert!(path.ends_with("rackmate.toml"));
            }
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = write_config(
            "rackmate_config_test_invalid_toml",
            "this is not valid [[[ toml",
        );

        let err = load_config_from(&tmp).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with("rackmate.toml"));
            }
            other => panic!("expected ParseError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    // -- Defaults copy --

    #[test]
    fn ensure_config_files_copies_missing_files() {
        let tmp = std::env::temp_dir().join("rackmate_config_test_ensure_copies");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::write(defaults_dir.join("rackmate.toml"), "[display]\ncolumns = 5\n").unwrap();
        // Add an example file that should NOT be copied
        fs::write(
            defaults_dir.join("rackmate.toml.example"),
            "[display]\ncolumns = 99\n",
        )
        .unwrap();

        // No config/ dir exists yet
        assert!(!tmp.join("config").exists());

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert_eq!(copied.len(), 1);

        assert!(tmp.join("config/rackmate.toml").exists());
        assert!(!tmp.join("config/rackmate.toml.example").exists());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_skips_existing() {
        let tmp = std::env::temp_dir().join("rackmate_config_test_ensure_skips");
        let _ = fs::remove_dir_all(&tmp);

        let defaults_dir = tmp.join("defaults");
        let config_dir = tmp.join("config");
        fs::create_dir_all(&defaults_dir).unwrap();
        fs::create_dir_all(&config_dir).unwrap();

        fs::write(defaults_dir.join("rackmate.toml"), "[display]\ncolumns = 5\n").unwrap();

        // Pre-create rackmate.toml in config/ with custom content
        fs::write(config_dir.join("rackmate.toml"), "# custom\n").unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());

        // Original custom content should be preserved
        let content = fs::read_to_string(config_dir.join("rackmate.toml")).unwrap();
        assert_eq!(content, "# custom\n");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_no_defaults_dir_is_ok() {
        let tmp = std::env::temp_dir().join("rackmate_config_test_no_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        // Create config/ so it's not an error (just no defaults to copy)
        fs::create_dir_all(tmp.join("config")).unwrap();

        let copied = ensure_config_files(&tmp).expect("should succeed");
        assert!(copied.is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("rackmate_config_test_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        // Neither defaults/ nor config/ exist
        let err = ensure_config_files(&tmp).unwrap_err();
        match &err {
            ConfigError::DefaultsCopyError { message } => {
                assert!(message.contains("neither defaults/ nor config/"));
            }
            other => panic!("expected DefaultsCopyError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }
}
