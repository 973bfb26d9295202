//! Async client, for use inside a Tokio runtime

use std::fmt;
use std::time::Duration;

use futures::future::try_join_all;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use super::{
    decode, decode_bounty_list, interpret, payment_required, ClientCore, CreateBounty, Endpoint,
    RawResponse,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::filters::BountyFilter;
use crate::models::{Bounty, Stats, X402Config};

/// Non-blocking bounty board client
///
/// Cheap to clone; clones share one connection pool, which is released when
/// the last clone is dropped.
///
/// ```no_run
/// # async fn run() -> owockibot::Result<()> {
/// let client = owockibot::AsyncBountyBoardClient::new()?;
/// for bounty in client.list_bounties().await? {
///     println!("{}: {}", bounty.title, bounty.reward_formatted);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AsyncBountyBoardClient {
    http: Client,
    core: ClientCore,
}

impl AsyncBountyBoardClient {
    /// Client for the public board with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        let (core, headers) = ClientCore::prepare(config)?;
        let http = Client::builder()
            .timeout(core.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        info!("Async bounty board client initialized for {}", core.base_url());
        Ok(Self { http, core })
    }

    pub fn base_url(&self) -> &str {
        self.core.base_url()
    }

    pub fn timeout(&self) -> Duration {
        self.core.timeout()
    }

    /// Drop this handle. Clones share one connection pool, which is
    /// released once the last clone is gone.
    pub fn close(self) {
        debug!("Closing async client for {}", self.core.base_url());
    }

    async fn execute(&self, endpoint: Endpoint) -> Result<Value> {
        let url = self.core.url(&endpoint.path);
        debug!("{} {}", endpoint.method, url);

        let mut request = self.http.request(endpoint.method.as_reqwest(), &url);
        if let Some(body) = &endpoint.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.core.transport_error(&endpoint, e))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| self.core.transport_error(&endpoint, e))?;

        interpret(
            &endpoint,
            RawResponse {
                status,
                retry_after,
                body,
            },
        )
    }

    /// All bounties on the board
    pub async fn list_bounties(&self) -> Result<Vec<Bounty>> {
        decode_bounty_list(self.execute(Endpoint::list_bounties()).await?)
    }

    /// All bounties, narrowed client-side by `filter`
    pub async fn list_bounties_filtered(&self, filter: &BountyFilter) -> Result<Vec<Bounty>> {
        let bounties = self.list_bounties().await?;
        Ok(filter.apply(&bounties))
    }

    pub async fn get_bounty(&self, bounty_id: impl fmt::Display) -> Result<Bounty> {
        let endpoint = Endpoint::get_bounty(&bounty_id.to_string());
        decode(self.execute(endpoint).await?)
    }

    /// Fetch several bounties concurrently; the first failure wins
    pub async fn get_bounties<I, S>(&self, bounty_ids: I) -> Result<Vec<Bounty>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        try_join_all(
            bounty_ids
                .into_iter()
                .map(|id| async move { self.get_bounty(id.as_ref()).await }),
        )
        .await
    }

    pub async fn get_stats(&self) -> Result<Stats> {
        decode(self.execute(Endpoint::stats()).await?)
    }

    pub async fn get_x402_config(&self) -> Result<X402Config> {
        decode(self.execute(Endpoint::x402_config()).await?)
    }

    /// Always fails with [`Error::PaymentRequired`](crate::Error::PaymentRequired)
    pub async fn create_bounty(&self, request: &CreateBounty) -> Result<Bounty> {
        Err(payment_required(request))
    }

    /// Claim a bounty for `wallet_address`; returns the updated bounty
    pub async fn claim_bounty(
        &self,
        bounty_id: impl fmt::Display,
        wallet_address: &str,
    ) -> Result<Bounty> {
        let endpoint = Endpoint::claim(&bounty_id.to_string(), wallet_address);
        decode(self.execute(endpoint).await?)
    }

    /// Submit work for a claimed bounty; an empty `proof` is not sent
    pub async fn submit_work(
        &self,
        bounty_id: impl fmt::Display,
        wallet_address: &str,
        content: &str,
        proof: Option<&str>,
    ) -> Result<Bounty> {
        let endpoint = Endpoint::submit(&bounty_id.to_string(), wallet_address, content, proof);
        decode(self.execute(endpoint).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_new() {
        let client = AsyncBountyBoardClient::new().unwrap();
        assert_eq!(client.base_url(), "https://bounty.owockibot.xyz");
        assert_eq!(client.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let config = ClientConfig::default().with_base_url("https://api.example.com/");
        let client = AsyncBountyBoardClient::with_config(&config).unwrap();
        assert_eq!(client.base_url(), "https://api.example.com");
    }

    #[tokio::test]
    async fn test_create_bounty_requires_payment() {
        let client = AsyncBountyBoardClient::new().unwrap();
        let request = CreateBounty {
            title: "Write docs".into(),
            description: "Document the SDK".into(),
            reward_usdc: rust_decimal::Decimal::new(10, 0),
            requirements: vec!["README".into()],
            tags: vec![],
            deadline: None,
        };
        let err = client.create_bounty(&request).await.unwrap_err();
        assert!(matches!(err, Error::PaymentRequired));
        assert!(err.status_code().is_none());
    }
}
