//! Bounty board API clients
//!
//! [`BountyBoardClient`] (blocking) and [`AsyncBountyBoardClient`] share
//! everything except how they wait on the network: endpoints are described by
//! [`Endpoint`], responses are classified by [`interpret`], and JSON is turned
//! into models by the `decode_*` helpers. Each adapter only moves bytes.
//!
//! Status dispatch always happens before any model is constructed.

mod blocking;
mod nonblocking;

pub use blocking::BountyBoardClient;
pub use nonblocking::AsyncBountyBoardClient;

use std::fmt;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, USER_AGENT};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{Error, ParseError, Result};
use crate::models::{Bounty, FromJson};

const CLIENT_USER_AGENT: &str = concat!("owockibot-rs/", env!("CARGO_PKG_VERSION"));

/// Parameters for a new bounty. Creation is paid through x402, which this
/// client cannot sign, so `create_bounty` always fails with
/// [`Error::PaymentRequired`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBounty {
    pub title: String,
    pub description: String,
    pub reward_usdc: Decimal,
    pub requirements: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// ISO date, e.g. `2026-03-01`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
}

impl Method {
    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
        }
    }
}

/// One API call described as plain data
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Endpoint {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl Endpoint {
    fn get(path: String) -> Self {
        Self {
            method: Method::Get,
            path,
            body: None,
        }
    }

    fn post(path: String, body: Value) -> Self {
        Self {
            method: Method::Post,
            path,
            body: Some(body),
        }
    }

    fn bounty_path(id: &str) -> String {
        format!("/bounties/{}", urlencoding::encode(id))
    }

    pub(crate) fn list_bounties() -> Self {
        Self::get("/bounties".to_string())
    }

    pub(crate) fn get_bounty(id: &str) -> Self {
        Self::get(Self::bounty_path(id))
    }

    pub(crate) fn stats() -> Self {
        Self::get("/stats".to_string())
    }

    pub(crate) fn x402_config() -> Self {
        Self::get("/.well-known/x402".to_string())
    }

    pub(crate) fn claim(id: &str, wallet_address: &str) -> Self {
        Self::post(
            format!("{}/claim", Self::bounty_path(id)),
            json!({ "walletAddress": wallet_address }),
        )
    }

    pub(crate) fn submit(id: &str, wallet_address: &str, content: &str, proof: Option<&str>) -> Self {
        let mut body = Map::new();
        body.insert("walletAddress".into(), json!(wallet_address));
        body.insert("content".into(), json!(content));
        if let Some(proof) = proof.filter(|p| !p.is_empty()) {
            body.insert("proof".into(), json!(proof));
        }
        Self::post(format!("{}/submit", Self::bounty_path(id)), Value::Object(body))
    }
}

/// What an adapter hands back after the exchange
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub status: u16,
    pub retry_after: Option<String>,
    pub body: String,
}

/// Settings resolved once at construction
#[derive(Debug, Clone)]
pub(crate) struct ClientCore {
    base_url: String,
    timeout: Duration,
}

impl ClientCore {
    /// Validate the config and build the default header set
    pub(crate) fn prepare(config: &ClientConfig) -> Result<(Self, HeaderMap)> {
        let base_url = config.normalized_base_url().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "base URL must start with http:// or https://, got {:?}",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("invalid value for header {}: {}", name, e)))?;
            headers.insert(name, value);
        }

        Ok((
            Self {
                base_url,
                timeout: config.timeout(),
            },
            headers,
        ))
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn timeout(&self) -> Duration {
        self.timeout
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Map a reqwest failure that produced no usable response
    pub(crate) fn transport_error(&self, endpoint: &Endpoint, err: reqwest::Error) -> Error {
        let message = if err.is_timeout() {
            format!("Request timed out after {}s", self.timeout.as_secs_f64())
        } else {
            format!("Request failed: {}", err)
        };
        warn!("{} {}: {}", endpoint.method, endpoint.path, message);
        Error::transport(message, Box::new(err))
    }
}

fn parse_json_opt(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str(body).ok()
}

/// Classify a response and decode its body
pub(crate) fn interpret(endpoint: &Endpoint, response: RawResponse) -> Result<Value> {
    let RawResponse {
        status,
        retry_after,
        body,
    } = response;

    debug!(
        "{} {} -> {} ({} bytes)",
        endpoint.method,
        endpoint.path,
        status,
        body.len()
    );

    if !(200..300).contains(&status) {
        warn!("{} {} failed with status {}", endpoint.method, endpoint.path, status);
    }

    match status {
        404 => {
            return Err(Error::NotFound {
                path: endpoint.path.clone(),
            })
        }
        400 => {
            let response = parse_json_opt(&body);
            return Err(Error::Validation { body, response });
        }
        401 => {
            return Err(Error::Authentication {
                response: parse_json_opt(&body),
            })
        }
        429 => {
            return Err(Error::RateLimit {
                retry_after: retry_after.and_then(|v| v.trim().parse().ok()),
                response: parse_json_opt(&body),
            })
        }
        s if s >= 500 => {
            return Err(Error::Server {
                status_code: s,
                response: parse_json_opt(&body),
            })
        }
        s if !(200..300).contains(&s) => {
            return Err(Error::Api {
                message: format!("API error: {}", s),
                status_code: s,
                response: parse_json_opt(&body),
                source: None,
            })
        }
        _ => {}
    }

    if status == 204 || body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    serde_json::from_str(&body).map_err(|e| Error::Api {
        message: format!("Invalid JSON response: {}", e),
        status_code: status,
        response: None,
        source: Some(Box::new(e)),
    })
}

pub(crate) fn decode<T: FromJson>(value: Value) -> Result<T> {
    Ok(T::from_json(&value)?)
}

/// An empty body on a list endpoint means no bounties
pub(crate) fn decode_bounty_list(value: Value) -> Result<Vec<Bounty>> {
    match &value {
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        Value::Array(_) => Ok(Bounty::from_json_array(&value)?),
        _ => Err(ParseError::NotAnArray { entity: "Bounty" }.into()),
    }
}

pub(crate) fn payment_required(request: &CreateBounty) -> Error {
    warn!(
        "create_bounty({:?}) rejected: x402 payment signing is not supported",
        request.title
    );
    Error::PaymentRequired
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            retry_after: None,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(Endpoint::list_bounties().path, "/bounties");
        assert_eq!(Endpoint::get_bounty("143").path, "/bounties/143");
        assert_eq!(Endpoint::get_bounty("a/b c").path, "/bounties/a%2Fb%20c");
        assert_eq!(Endpoint::x402_config().path, "/.well-known/x402");

        let claim = Endpoint::claim("143", "0xabc");
        assert_eq!(claim.method, Method::Post);
        assert_eq!(claim.path, "/bounties/143/claim");
        assert_eq!(claim.body, Some(json!({"walletAddress": "0xabc"})));
    }

    #[test]
    fn test_submit_omits_empty_proof() {
        let with_proof = Endpoint::submit("1", "0xabc", "done", Some("https://x"));
        assert_eq!(with_proof.body.unwrap()["proof"], "https://x");

        for proof in [None, Some("")] {
            let body = Endpoint::submit("1", "0xabc", "done", proof).body.unwrap();
            assert!(body.get("proof").is_none());
            assert_eq!(body["content"], "done");
        }
    }

    #[test]
    fn test_prepare_merges_headers() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:3000/")
            .with_header("X-Agent", "tester")
            .with_header("Accept", "application/vnd.custom+json");
        let (core, headers) = ClientCore::prepare(&config).unwrap();

        assert_eq!(core.base_url(), "http://localhost:3000");
        assert_eq!(core.url("/bounties"), "http://localhost:3000/bounties");
        assert_eq!(headers["x-agent"], "tester");
        assert_eq!(headers[ACCEPT], "application/vnd.custom+json");
        assert!(headers.contains_key(USER_AGENT));
    }

    #[test]
    fn test_prepare_rejects_bad_config() {
        let bad_url = ClientConfig::default().with_base_url("ftp://nope");
        assert!(matches!(ClientCore::prepare(&bad_url), Err(Error::Config(_))));

        let bad_header = ClientConfig::default().with_header("bad header", "x");
        assert!(matches!(ClientCore::prepare(&bad_header), Err(Error::Config(_))));
    }

    #[test]
    fn test_interpret_status_mapping() {
        let ep = Endpoint::get_bounty("9");

        assert!(matches!(
            interpret(&ep, ok(404, "")),
            Err(Error::NotFound { ref path }) if path == "/bounties/9"
        ));

        let err = interpret(&ep, ok(400, r#"{"error":"already claimed"}"#)).unwrap_err();
        assert_eq!(err.response().unwrap()["error"], "already claimed");

        assert!(matches!(
            interpret(&ep, ok(401, "")),
            Err(Error::Authentication { .. })
        ));

        let rate_limited = RawResponse {
            status: 429,
            retry_after: Some("5".into()),
            body: String::new(),
        };
        assert_eq!(interpret(&ep, rate_limited).unwrap_err().retry_after(), Some(5));

        let http_date = RawResponse {
            status: 429,
            retry_after: Some("Wed, 21 Oct 2026 07:28:00 GMT".into()),
            body: String::new(),
        };
        assert_eq!(interpret(&ep, http_date).unwrap_err().retry_after(), None);

        assert!(matches!(
            interpret(&ep, ok(503, "down")),
            Err(Error::Server { status_code: 503, .. })
        ));

        let teapot = interpret(&ep, ok(418, r#"{"error":"teapot"}"#)).unwrap_err();
        assert_eq!(teapot.status_code(), Some(418));
        assert_eq!(teapot.response().unwrap()["error"], "teapot");
    }

    #[test]
    fn test_interpret_bodies() {
        let ep = Endpoint::stats();
        assert_eq!(interpret(&ep, ok(204, "")).unwrap(), json!({}));
        assert_eq!(interpret(&ep, ok(200, "  ")).unwrap(), json!({}));
        assert_eq!(interpret(&ep, ok(200, r#"{"a":1}"#)).unwrap(), json!({"a": 1}));

        let err = interpret(&ep, ok(200, "not json")).unwrap_err();
        assert!(matches!(err, Error::Api { status_code: 200, .. }));
        assert!(err.to_string().starts_with("Invalid JSON response"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_decode_bounty_list() {
        assert!(decode_bounty_list(json!({})).unwrap().is_empty());
        assert!(decode_bounty_list(json!([])).unwrap().is_empty());
        assert!(matches!(
            decode_bounty_list(json!({"bounties": []})),
            Err(Error::Parse(ParseError::NotAnArray { .. }))
        ));
    }
}
