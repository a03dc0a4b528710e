use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Canonical provider tags carried on every record and used as merge keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Youtube,
    Twitter,
    Tiktok,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Twitter => "twitter",
            Self::Tiktok => "tiktok",
        }
    }

    /// Platform branding used in client-facing error messages.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Youtube => "YouTube",
            Self::Twitter => "Twitter",
            Self::Tiktok => "TikTok",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
