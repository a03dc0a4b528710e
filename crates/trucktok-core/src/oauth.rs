//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! The signature base string is
//! `METHOD&pct(url)&pct(sorted, '&'-joined "k=v" pairs)` where every key and
//! value is percent-encoded before sorting, and the signing key is
//! `pct(consumer_secret)&pct(token_secret)`.

use std::fmt::{Debug, Formatter};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::http_client::HttpRequest;
use crate::video_source::SourceError;

type HmacSha1 = Hmac<Sha1>;

const NONCE_LEN: usize = 32;

/// Consumer key/secret plus user access token/secret.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth1Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Debug for OAuth1Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1Credentials")
            .field("consumer_key", &"<redacted>")
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &"<redacted>")
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

/// Per-call inputs that must be fresh for every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningParams {
    pub nonce: String,
    pub timestamp: i64,
}

impl SigningParams {
    /// Random alphanumeric nonce and the current unix time.
    pub fn fresh() -> Self {
        let nonce = std::iter::repeat_with(fastrand::alphanumeric)
            .take(NONCE_LEN)
            .collect();
        Self {
            nonce,
            timestamp: time::OffsetDateTime::now_utc().unix_timestamp(),
        }
    }
}

/// RFC 3986 percent-encoding: everything except `A-Za-z0-9-._~`.
pub fn percent_encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Signs requests on behalf of one set of credentials.
#[derive(Debug, Clone)]
pub struct OAuth1Signer {
    credentials: OAuth1Credentials,
}

impl OAuth1Signer {
    pub fn new(credentials: OAuth1Credentials) -> Self {
        Self { credentials }
    }

    /// Adds an `Authorization: OAuth ...` header built with fresh parameters.
    pub fn sign(&self, request: HttpRequest) -> Result<HttpRequest, SourceError> {
        self.sign_with(request, &SigningParams::fresh())
    }

    pub fn sign_with(
        &self,
        request: HttpRequest,
        params: &SigningParams,
    ) -> Result<HttpRequest, SourceError> {
        let oauth_params = self.oauth_params(params);
        let base_string = signature_base_string(&request, &oauth_params);
        let signature = self.signature(&base_string)?;

        let mut header_params = oauth_params;
        header_params.push((String::from("oauth_signature"), signature));
        header_params.sort();

        let header = header_params
            .iter()
            .map(|(name, value)| format!("{}=\"{}\"", percent_encode(name), percent_encode(value)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(request.with_header("authorization", format!("OAuth {header}")))
    }

    fn oauth_params(&self, params: &SigningParams) -> Vec<(String, String)> {
        vec![
            (
                String::from("oauth_consumer_key"),
                self.credentials.consumer_key.clone(),
            ),
            (String::from("oauth_nonce"), params.nonce.clone()),
            (
                String::from("oauth_signature_method"),
                String::from("HMAC-SHA1"),
            ),
            (String::from("oauth_timestamp"), params.timestamp.to_string()),
            (
                String::from("oauth_token"),
                self.credentials.access_token.clone(),
            ),
            (String::from("oauth_version"), String::from("1.0")),
        ]
    }

    fn signature(&self, base_string: &str) -> Result<String, SourceError> {
        let key = format!(
            "{}&{}",
            percent_encode(&self.credentials.consumer_secret),
            percent_encode(&self.credentials.access_token_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes())
            .map_err(|error| SourceError::internal(format!("invalid signing key: {error}")))?;
        mac.update(base_string.as_bytes());
        Ok(BASE64.encode(mac.finalize().into_bytes()))
    }
}

/// Builds the canonical base string from the request method, endpoint and
/// every query and oauth parameter.
pub fn signature_base_string(request: &HttpRequest, oauth_params: &[(String, String)]) -> String {
    let mut encoded = request
        .query
        .iter()
        .chain(oauth_params.iter())
        .map(|(name, value)| (percent_encode(name), percent_encode(value)))
        .collect::<Vec<_>>();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        request.method.as_str(),
        percent_encode(&request.url),
        percent_encode(&parameter_string)
    )
}
