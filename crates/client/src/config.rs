/// Owner API base URL used when `STAFFDESK_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "https://core-4dme.onrender.com/api";

/// Per-request timeout used when `REQUEST_TIMEOUT_SECS` is not set.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while reading client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Owner API client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL without a trailing slash, e.g. `https://host/api`.
    pub api_url: String,
    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                              |
    /// |------------------------|--------------------------------------|
    /// | `STAFFDESK_API_URL`    | `https://core-4dme.onrender.com/api` |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                                 |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = match lookup("STAFFDESK_API_URL") {
            Some(value) => parse_api_url(value)?,
            None => DEFAULT_API_URL.to_string(),
        };

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "REQUEST_TIMEOUT_SECS",
                        value,
                        reason: "must be a positive number of seconds",
                    })
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            request_timeout_secs,
        })
    }
}

fn parse_api_url(value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidValue {
            var: "STAFFDESK_API_URL",
            value,
            reason: "must be an http:// or https:// URL",
        });
    }
    Ok(trimmed.to_string())
}
