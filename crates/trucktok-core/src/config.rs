//! Process-wide configuration.
//!
//! Only [`AppConfig::from_env`] reads the environment. Adapters receive their
//! credentials through constructors and never look anything up themselves.
//!
//! | Setting | Primary | Fallback | Default |
//! |---------|---------|----------|---------|
//! | YouTube key | `TRUCKTOK_YOUTUBE_API_KEY` | `YOUTUBE_API_KEY` | - |
//! | Twitter auth mode | `TRUCKTOK_TWITTER_AUTH` | - | inferred |
//! | Twitter bearer | `TRUCKTOK_TWITTER_BEARER_TOKEN` | `TWITTER_BEARER_TOKEN` | - |
//! | Twitter key | `TRUCKTOK_TWITTER_API_KEY` | `TWITTER_API_KEY` | - |
//! | Twitter secret | `TRUCKTOK_TWITTER_API_SECRET` | `TWITTER_API_SECRET` | - |
//! | Twitter access token | `TRUCKTOK_TWITTER_ACCESS_TOKEN` | `TWITTER_ACCESS_TOKEN` | - |
//! | Twitter access secret | `TRUCKTOK_TWITTER_ACCESS_TOKEN_SECRET` | `TWITTER_ACCESS_TOKEN_SECRET` | - |
//! | Default query | `TRUCKTOK_DEFAULT_QUERY` | - | `custom trucks` |
//! | Max results | `TRUCKTOK_MAX_RESULTS` | - | `12` |
//! | Provider timeout | `TRUCKTOK_PROVIDER_TIMEOUT_MS` | - | `10000` |
//! | Bind address | `TRUCKTOK_BIND` | - | `0.0.0.0:3000` |

use std::env;
use std::fmt::{Debug, Formatter};

use crate::oauth::OAuth1Credentials;
use crate::ConfigError;

pub const DEFAULT_QUERY: &str = "custom trucks";
pub const DEFAULT_MAX_RESULTS: usize = 12;
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Twitter auth strategy, selected once per deployment.
#[derive(Clone, PartialEq, Eq)]
pub enum TwitterAuth {
    /// Pre-issued app bearer token.
    StaticToken { bearer_token: String },
    /// `key:secret` exchanged for a short-lived bearer token on every request.
    ClientCredentials { api_key: String, api_secret: String },
    /// OAuth 1.0a user-context signing.
    RequestSigning(OAuth1Credentials),
}

impl TwitterAuth {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::StaticToken { .. } => "bearer",
            Self::ClientCredentials { .. } => "client_credentials",
            Self::RequestSigning(_) => "oauth1",
        }
    }
}

impl Debug for TwitterAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "TwitterAuth::{}(<redacted>)", self.label())
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct YoutubeConfig {
    pub api_key: Option<String>,
}

impl Debug for YoutubeConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoutubeConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TwitterConfig {
    pub auth: Option<TwitterAuth>,
}

/// Everything the adapters, aggregator and gateway need at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub youtube: YoutubeConfig,
    pub twitter: TwitterConfig,
    pub default_query: String,
    pub max_results: usize,
    pub provider_timeout_ms: u64,
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            youtube: YoutubeConfig::default(),
            twitter: TwitterConfig::default(),
            default_query: String::from(DEFAULT_QUERY),
            max_results: DEFAULT_MAX_RESULTS,
            provider_timeout_ms: DEFAULT_PROVIDER_TIMEOUT_MS,
            bind_addr: String::from(DEFAULT_BIND_ADDR),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Blank values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        let get_either = |primary: &str, fallback: &str| get(primary).or_else(|| get(fallback));

        let youtube = YoutubeConfig {
            api_key: get_either("TRUCKTOK_YOUTUBE_API_KEY", "YOUTUBE_API_KEY"),
        };

        let credentials = TwitterCredentialSet {
            bearer_token: get_either("TRUCKTOK_TWITTER_BEARER_TOKEN", "TWITTER_BEARER_TOKEN"),
            api_key: get_either("TRUCKTOK_TWITTER_API_KEY", "TWITTER_API_KEY"),
            api_secret: get_either("TRUCKTOK_TWITTER_API_SECRET", "TWITTER_API_SECRET"),
            access_token: get_either("TRUCKTOK_TWITTER_ACCESS_TOKEN", "TWITTER_ACCESS_TOKEN"),
            access_token_secret: get_either(
                "TRUCKTOK_TWITTER_ACCESS_TOKEN_SECRET",
                "TWITTER_ACCESS_TOKEN_SECRET",
            ),
        };
        let twitter = TwitterConfig {
            auth: credentials.resolve(get("TRUCKTOK_TWITTER_AUTH").as_deref())?,
        };

        let max_results = match get("TRUCKTOK_MAX_RESULTS") {
            Some(value) => {
                let parsed = parse_positive("TRUCKTOK_MAX_RESULTS", &value)?;
                usize::try_from(parsed).map_err(|_| ConfigError::InvalidNumber {
                    key: "TRUCKTOK_MAX_RESULTS",
                    value,
                })?
            }
            None => DEFAULT_MAX_RESULTS,
        };
        let provider_timeout_ms = match get("TRUCKTOK_PROVIDER_TIMEOUT_MS") {
            Some(value) => parse_positive("TRUCKTOK_PROVIDER_TIMEOUT_MS", &value)?,
            None => DEFAULT_PROVIDER_TIMEOUT_MS,
        };

        Ok(Self {
            youtube,
            twitter,
            default_query: get("TRUCKTOK_DEFAULT_QUERY")
                .unwrap_or_else(|| String::from(DEFAULT_QUERY)),
            max_results,
            provider_timeout_ms,
            bind_addr: get("TRUCKTOK_BIND").unwrap_or_else(|| String::from(DEFAULT_BIND_ADDR)),
        })
    }

    /// Returns the caller's query, or the configured default when it is
    /// absent or blank.
    pub fn query_or_default<'a>(&'a self, query: Option<&'a str>) -> &'a str {
        query
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(&self.default_query)
    }
}

#[derive(Default)]
struct TwitterCredentialSet {
    bearer_token: Option<String>,
    api_key: Option<String>,
    api_secret: Option<String>,
    access_token: Option<String>,
    access_token_secret: Option<String>,
}

impl TwitterCredentialSet {
    fn resolve(self, mode: Option<&str>) -> Result<Option<TwitterAuth>, ConfigError> {
        match mode.map(str::to_ascii_lowercase).as_deref() {
            None => Ok(self.infer()),
            Some("bearer") => self
                .static_token()
                .map(Some)
                .ok_or(ConfigError::IncompleteTwitterAuth {
                    mode: "bearer",
                    missing: "TWITTER_BEARER_TOKEN",
                }),
            Some("client_credentials") => self.client_credentials().map(Some).ok_or(
                ConfigError::IncompleteTwitterAuth {
                    mode: "client_credentials",
                    missing: "TWITTER_API_KEY and TWITTER_API_SECRET",
                },
            ),
            Some("oauth1") => self.request_signing().map(Some).ok_or(
                ConfigError::IncompleteTwitterAuth {
                    mode: "oauth1",
                    missing: "TWITTER_API_KEY, TWITTER_API_SECRET, TWITTER_ACCESS_TOKEN and TWITTER_ACCESS_TOKEN_SECRET",
                },
            ),
            Some(other) => Err(ConfigError::InvalidTwitterAuth {
                value: other.to_owned(),
            }),
        }
    }

    /// Strongest variant the supplied credentials allow.
    fn infer(&self) -> Option<TwitterAuth> {
        self.request_signing()
            .or_else(|| self.client_credentials())
            .or_else(|| self.static_token())
    }

    fn static_token(&self) -> Option<TwitterAuth> {
        let bearer_token = self.bearer_token.clone()?;
        Some(TwitterAuth::StaticToken { bearer_token })
    }

    fn client_credentials(&self) -> Option<TwitterAuth> {
        Some(TwitterAuth::ClientCredentials {
            api_key: self.api_key.clone()?,
            api_secret: self.api_secret.clone()?,
        })
    }

    fn request_signing(&self) -> Option<TwitterAuth> {
        Some(TwitterAuth::RequestSigning(OAuth1Credentials {
            consumer_key: self.api_key.clone()?,
            consumer_secret: self.api_secret.clone()?,
            access_token: self.access_token.clone()?,
            access_token_secret: self.access_token_secret.clone()?,
        }))
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::InvalidNumber {
            key,
            value: value.to_owned(),
        }),
    }
}
