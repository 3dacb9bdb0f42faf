use std::path::PathBuf;

use chrono::NaiveDate;

pub const AS_OF_VAR: &str = "RUSTY_BONDS_AS_OF";
pub const FILE_VAR: &str = "RUSTY_BONDS_FILE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: '{value}' is not a YYYY-MM-DD date")]
    InvalidDate { var: &'static str, value: String },

    #[error("{var}: file not found: {}", .path.display())]
    MissingFile { var: &'static str, path: PathBuf },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Start-up settings read from the environment (and an optional `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Date metrics are computed against; today when unset.
    pub as_of: NaiveDate,
    /// File loaded before the window opens.
    pub initial_file: Option<PathBuf>,
}

impl ViewerConfig {
    pub fn from_env() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok(), today())
    }

    /// Build from an arbitrary variable lookup; `today` is used when no
    /// as-of date is configured.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        today: NaiveDate,
    ) -> ConfigResult<Self> {
        let as_of = match non_empty(lookup(AS_OF_VAR)) {
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                ConfigError::InvalidDate {
                    var: AS_OF_VAR,
                    value: raw.clone(),
                }
            })?,
            None => today,
        };

        let initial_file = match non_empty(lookup(FILE_VAR)) {
            Some(raw) => {
                let path = PathBuf::from(raw);
                if !path.is_file() {
                    return Err(ConfigError::MissingFile {
                        var: FILE_VAR,
                        path,
                    });
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            as_of,
            initial_file,
        })
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            as_of: today(),
            initial_file: None,
        }
    }
}

/// The local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
