//! Environment-driven settings for the CLI.
//!
//! Values are read after `dotenvy` has loaded any `.env` file:
//!
//! | Variable        | Meaning                      |
//! |-----------------|------------------------------|
//! | `LOG_FILE_PATH` | JSON log file (rolled daily) |

pub const DEFAULT_LOG_FILE_PATH: &str = "logs/otp_fare_inspector.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub log_file_path: String,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        Settings {
            log_file_path: get("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
        }
    }
}
