//! Account tier and API version resolution

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::errors::{Result, TranslationError};

/// Server URL for pro accounts
pub const SERVER_URL_PRO: &str = "https://api.deepl.com";
/// Server URL for free accounts
pub const SERVER_URL_FREE: &str = "https://api-free.deepl.com";

/// Account class inferred from the auth key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Free,
    Pro,
}

impl Tier {
    /// Keys ending in `:fx` belong to free accounts, everything else is pro
    pub fn from_auth_key(auth_key: &str) -> Self {
        if is_free_account_auth_key(auth_key) {
            Tier::Free
        } else {
            Tier::Pro
        }
    }

    /// Default server URL for this tier
    pub fn server_url(self) -> &'static str {
        match self {
            Tier::Free => SERVER_URL_FREE,
            Tier::Pro => SERVER_URL_PRO,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tier::Free => write!(f, "free"),
            Tier::Pro => write!(f, "pro"),
        }
    }
}

/// Determines whether the supplied auth key belongs to a free account
pub fn is_free_account_auth_key(auth_key: &str) -> bool {
    auth_key.ends_with(":fx")
}

/// Response shape returned by an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Flat result: `data`, `alternatives`, `source_lang`, ...
    V1,
    /// Segmented result: `translations: [{detected_source_language, text}]`
    V2,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::V1 => write!(f, "v1"),
            Variant::V2 => write!(f, "v2"),
        }
    }
}

/// Translate endpoint family, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    /// DeepLX free endpoint, `POST /translate`
    Free,
    /// DeepLX pro endpoint, `POST /v1/translate`
    Pro,
    /// DeepL official (and compatible) endpoint, `POST /v2/translate`
    Official,
}

impl ApiVersion {
    /// Endpoint path relative to the server URL
    pub fn path(self) -> &'static str {
        match self {
            ApiVersion::Free => "translate",
            ApiVersion::Pro => "v1/translate",
            ApiVersion::Official => "v2/translate",
        }
    }

    /// Response shape decoded for this version
    pub fn variant(self) -> Variant {
        match self {
            ApiVersion::Free | ApiVersion::Pro => Variant::V1,
            ApiVersion::Official => Variant::V2,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::Free => write!(f, "free"),
            ApiVersion::Pro => write!(f, "pro"),
            ApiVersion::Official => write!(f, "official"),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = TranslationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "free" => Ok(ApiVersion::Free),
            "pro" | "v1" => Ok(ApiVersion::Pro),
            "official" | "v2" => Ok(ApiVersion::Official),
            other => Err(TranslationError::config(format!(
                "invalid API version: {other:?}"
            ))),
        }
    }
}

/// Splits a trailing `/v1` or `/v2` off a base URL.
///
/// Trailing slashes are trimmed first. The returned version is `None` when the
/// URL carries no version suffix; callers fall back to [`ApiVersion::Free`],
/// which decodes V1 results.
pub fn split_version_suffix(base_url: &str) -> (&str, Option<ApiVersion>) {
    let trimmed = base_url.trim_end_matches('/');
    if let Some(server) = trimmed.strip_suffix("/v1") {
        (server, Some(ApiVersion::Pro))
    } else if let Some(server) = trimmed.strip_suffix("/v2") {
        (server, Some(ApiVersion::Official))
    } else {
        (trimmed, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_free_account_auth_key() {
        assert!(is_free_account_auth_key("abc:fx"));
        assert!(!is_free_account_auth_key("abc123"));
        assert!(!is_free_account_auth_key("abc:fx "));
        assert!(!is_free_account_auth_key(""));
    }

    #[test]
    fn test_tier_from_auth_key() {
        for key in ["free-auth-key:fx", ":fx", "00000000-0000-0000-0000-000000000000:fx"] {
            assert_eq!(Tier::from_auth_key(key), Tier::Free, "{key}");
        }
        for key in ["pro-auth-key", "", "fx", "key:FX", "key:fx:pro"] {
            assert_eq!(Tier::from_auth_key(key), Tier::Pro, "{key}");
        }
        assert_eq!(Tier::Free.server_url(), SERVER_URL_FREE);
        assert_eq!(Tier::Pro.server_url(), SERVER_URL_PRO);
    }

    #[test]
    fn test_version_paths_and_variants() {
        assert_eq!(ApiVersion::Free.path(), "translate");
        assert_eq!(ApiVersion::Pro.path(), "v1/translate");
        assert_eq!(ApiVersion::Official.path(), "v2/translate");
        assert_eq!(ApiVersion::Free.variant(), Variant::V1);
        assert_eq!(ApiVersion::Pro.variant(), Variant::V1);
        assert_eq!(ApiVersion::Official.variant(), Variant::V2);
    }

    #[test]
    fn test_split_version_suffix() {
        assert_eq!(
            split_version_suffix("https://api.deepl.com/v2"),
            (SERVER_URL_PRO, Some(ApiVersion::Official))
        );
        assert_eq!(
            split_version_suffix("http://localhost:1188/v1/"),
            ("http://localhost:1188", Some(ApiVersion::Pro))
        );
        assert_eq!(
            split_version_suffix("http://localhost:1188//"),
            ("http://localhost:1188", None)
        );
        assert_eq!(
            split_version_suffix("http://proxy/deeplx/v3"),
            ("http://proxy/deeplx/v3", None)
        );
    }

    #[test]
    fn test_parse_api_version() {
        assert_eq!("free".parse::<ApiVersion>().unwrap(), ApiVersion::Free);
        assert_eq!("V1".parse::<ApiVersion>().unwrap(), ApiVersion::Pro);
        assert_eq!("official".parse::<ApiVersion>().unwrap(), ApiVersion::Official);
        assert!("v3".parse::<ApiVersion>().is_err());
    }
}
