//! Translator facade with functional construction options

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::core::endpoint::{split_version_suffix, ApiVersion, Tier, Variant};
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{
    TranslateOption, TranslateOptions, TranslationRequest, TranslationResult,
    TranslationResultV1, TranslationResultV2,
};
use crate::core::response::decode_response;
use crate::core::retry::{execute_with_retry, RetryPolicy};
use crate::core::segment::{text_to_segments, text_to_string, Text};
use crate::core::transport::{
    HttpResponse, HttpTransport, PreparedRequest, ReqwestTransport, DEFAULT_TIMEOUT,
};

/// Construction-time settings that [`TranslatorOption`]s mutate
pub struct TranslatorSettings {
    pub base_url: String,
    pub version: Option<ApiVersion>,
    pub transport: Option<Arc<dyn HttpTransport>>,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl TranslatorSettings {
    /// Defaults for `auth_key`: tier-specific V2 base URL, 10 s timeout
    pub fn for_auth_key(auth_key: &str) -> Self {
        let server_url = Tier::from_auth_key(auth_key).server_url();

        Self {
            base_url: format!("{server_url}/v2"),
            version: None,
            transport: None,
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

/// Mutator applied to [`TranslatorSettings`] during construction
pub type TranslatorOption = Box<dyn FnOnce(&mut TranslatorSettings) -> Result<()> + Send>;

/// Override the base URL. Trailing slashes are trimmed.
///
/// A `/v1` or `/v2` suffix selects [`ApiVersion::Pro`] or
/// [`ApiVersion::Official`] unless a version is set explicitly; without a
/// suffix the free endpoint is used.
pub fn with_base_url(base_url: &str) -> TranslatorOption {
    let base_url = base_url.trim_end_matches('/').to_string();
    Box::new(move |s: &mut TranslatorSettings| {
        let parsed = Url::parse(&base_url).map_err(|e| {
            TranslationError::config(format!("invalid base URL {base_url:?}: {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TranslationError::config(format!(
                "invalid base URL {base_url:?}: unsupported scheme {}",
                parsed.scheme()
            )));
        }
        s.base_url = base_url;
        Ok(())
    })
}

/// Pin the API version instead of inferring it from the base URL
pub fn with_api_version(version: ApiVersion) -> TranslatorOption {
    Box::new(move |s: &mut TranslatorSettings| {
        s.version = Some(version);
        Ok(())
    })
}

/// Replace the HTTP transport
pub fn with_http_client(transport: Arc<dyn HttpTransport>) -> TranslatorOption {
    Box::new(move |s: &mut TranslatorSettings| {
        s.transport = Some(transport);
        Ok(())
    })
}

/// Use a preconfigured `reqwest::Client` as transport
pub fn with_reqwest_client(client: reqwest::Client) -> TranslatorOption {
    with_http_client(Arc::new(ReqwestTransport::from_client(client)))
}

/// Per-attempt timeout of the default transport
pub fn with_timeout(timeout: Duration) -> TranslatorOption {
    Box::new(move |s: &mut TranslatorSettings| {
        if timeout.is_zero() {
            return Err(TranslationError::config("timeout must be greater than 0"));
        }
        s.timeout = timeout;
        Ok(())
    })
}

/// Replace the default retry policy
pub fn with_retry_policy(policy: RetryPolicy) -> TranslatorOption {
    Box::new(move |s: &mut TranslatorSettings| {
        s.retry = policy;
        Ok(())
    })
}

/// DeepL / DeepLX translator.
///
/// Immutable once built; clones share the transport and can be used from many
/// tasks at once.
#[derive(Clone)]
pub struct Translator {
    transport: Arc<dyn HttpTransport>,
    server_url: Url,
    auth_key: String,
    auth_header: Option<HeaderValue>,
    version: ApiVersion,
    retry: RetryPolicy,
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("server_url", &self.server_url.as_str())
            .field("tier", &self.tier())
            .field("version", &self.version)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl Translator {
    /// Create a translator for `auth_key`, applying `opts` in order
    pub fn new(auth_key: &str, opts: impl IntoIterator<Item = TranslatorOption>) -> Result<Self> {
        let mut settings = TranslatorSettings::for_auth_key(auth_key);
        for opt in opts {
            opt(&mut settings)?;
        }

        let (server, inferred) = split_version_suffix(&settings.base_url);
        let version = settings
            .version
            .or(inferred)
            .unwrap_or(ApiVersion::Free);
        let server_url = Url::parse(server).map_err(|e| {
            TranslationError::config(format!("invalid base URL {server:?}: {e}"))
        })?;

        let auth_header = if auth_key.is_empty() {
            None
        } else {
            let mut value = HeaderValue::from_str(&format!("DeepL-Auth-Key {auth_key}"))
                .map_err(|_| TranslationError::config("auth key contains invalid characters"))?;
            value.set_sensitive(true);
            Some(value)
        };

        let transport = match settings.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(settings.timeout)?),
        };

        debug!("Translator ready: {} ({} API)", server_url, version);

        Ok(Self {
            transport,
            server_url,
            auth_key: auth_key.to_string(),
            auth_header,
            version,
            retry: settings.retry,
        })
    }

    /// Auth key the translator was built with
    pub fn auth_key(&self) -> &str {
        &self.auth_key
    }

    /// Account tier derived from the auth key
    pub fn tier(&self) -> Tier {
        Tier::from_auth_key(&self.auth_key)
    }

    /// Server URL, without the version suffix
    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// API version selecting endpoint path and response shape
    pub fn version(&self) -> ApiVersion {
        self.version
    }

    /// Full URL of `endpoint` under the server URL
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        let mut url = self.server_url.clone();
        url.path_segments_mut()
            .map_err(|_| TranslationError::config("error joining API url: base cannot hold a path"))?
            .pop_if_empty()
            .extend(endpoint.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    /// Send one request through the retry executor.
    ///
    /// The auth header is set first; `headers` are merged over it, last write
    /// wins per name. The returned response may carry any status.
    pub async fn call_api(
        &self,
        method: Method,
        endpoint: &str,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> Result<HttpResponse> {
        let url = self.endpoint_url(endpoint)?;

        let mut merged = HeaderMap::new();
        if let Some(auth) = &self.auth_header {
            merged.insert(AUTHORIZATION, auth.clone());
        }
        for (name, value) in headers.iter() {
            merged.insert(name.clone(), value.clone());
        }

        let request = PreparedRequest {
            method,
            url,
            headers: merged,
            body,
        };

        execute_with_retry(self.transport.as_ref(), &request, &self.retry).await
    }

    /// Translate `text` and return the translated string.
    ///
    /// V1 endpoints receive one string (lists are joined with newlines). The
    /// official endpoint receives segments; a long single string is split into
    /// sentences first and the translated segments are concatenated.
    pub async fn translate_text(
        &self,
        text: impl Into<Text>,
        target_lang: &str,
        opts: impl IntoIterator<Item = TranslateOption>,
    ) -> Result<String> {
        let result = self
            .translate_request(self.prepare_text(text.into()), target_lang, opts)
            .await?;
        Ok(result.into_text())
    }

    /// Translate against a V1 endpoint and return the full result
    pub async fn translate_text_v1(
        &self,
        text: impl Into<Text>,
        target_lang: &str,
        opts: impl IntoIterator<Item = TranslateOption>,
    ) -> Result<TranslationResultV1> {
        self.expect_variant(Variant::V1)?;
        let text = Text::Single(text_to_string(text.into()));
        match self.translate_request(text, target_lang, opts).await? {
            TranslationResult::V1(result) => Ok(result),
            other => Err(TranslationError::VersionMismatch {
                expected: Variant::V1,
                actual: other.variant(),
            }),
        }
    }

    /// Translate against the official endpoint and return every segment
    pub async fn translate_text_v2(
        &self,
        text: impl Into<Text>,
        target_lang: &str,
        opts: impl IntoIterator<Item = TranslateOption>,
    ) -> Result<TranslationResultV2> {
        self.expect_variant(Variant::V2)?;
        let text = Text::Many(text_to_segments(text.into()));
        match self.translate_request(text, target_lang, opts).await? {
            TranslationResult::V2(result) => Ok(result),
            other => Err(TranslationError::VersionMismatch {
                expected: Variant::V2,
                actual: other.variant(),
            }),
        }
    }

    fn prepare_text(&self, text: Text) -> Text {
        match self.version.variant() {
            Variant::V1 => Text::Single(text_to_string(text)),
            Variant::V2 => Text::Many(text_to_segments(text)),
        }
    }

    fn expect_variant(&self, expected: Variant) -> Result<()> {
        let actual = self.version.variant();
        if actual == expected {
            Ok(())
        } else {
            Err(TranslationError::VersionMismatch { expected, actual })
        }
    }

    /// Build, send and decode one translate call
    async fn translate_request(
        &self,
        text: Text,
        target_lang: &str,
        opts: impl IntoIterator<Item = TranslateOption>,
    ) -> Result<TranslationResult> {
        let options = TranslateOptions::gather(opts)?;
        let request = TranslationRequest::new(text, target_lang, options);
        let body = serde_json::to_vec(&request).map_err(TranslationError::EncodeError)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        debug!(
            "Translating to {} via {} ({} bytes)",
            target_lang,
            self.version.path(),
            body.len()
        );
        let response = self
            .call_api(Method::POST, self.version.path(), headers, Some(body))
            .await?;

        decode_response(self.version.variant(), &response)
    }
}
