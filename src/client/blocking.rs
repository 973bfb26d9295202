//! Blocking client
//!
//! Wraps `reqwest::blocking`, which runs its own internal runtime. Do not
//! create or drop this client from inside an async context; use
//! [`AsyncBountyBoardClient`](super::AsyncBountyBoardClient) there.

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::RETRY_AFTER;
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

/// Blocking bounty board client
///
/// ```no_run
/// let client = owockibot::BountyBoardClient::new()?;
/// let bounty = client.get_bounty("143")?;
/// println!("{} pays {}", bounty.title, bounty.reward_usdc());
/// # Ok::<(), owockibot::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct BountyBoardClient {
    http: Client,
    core: ClientCore,
}

impl BountyBoardClient {
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

        info!("Bounty board client initialized for {}", core.base_url());
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
        debug!("Closing client for {}", self.core.base_url());
    }

    fn execute(&self, endpoint: Endpoint) -> Result<Value> {
        let url = self.core.url(&endpoint.path);
        debug!("{} {}", endpoint.method, url);

        let mut request = self.http.request(endpoint.method.as_reqwest(), &url);
        if let Some(body) = &endpoint.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .map_err(|e| self.core.transport_error(&endpoint, e))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
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
    pub fn list_bounties(&self) -> Result<Vec<Bounty>> {
        decode_bounty_list(self.execute(Endpoint::list_bounties())?)
    }

    /// All bounties, narrowed client-side by `filter`
    pub fn list_bounties_filtered(&self, filter: &BountyFilter) -> Result<Vec<Bounty>> {
        Ok(filter.apply(&self.list_bounties()?))
    }

    pub fn get_bounty(&self, bounty_id: impl fmt::Display) -> Result<Bounty> {
        decode(self.execute(Endpoint::get_bounty(&bounty_id.to_string()))?)
    }

    pub fn get_stats(&self) -> Result<Stats> {
        decode(self.execute(Endpoint::stats())?)
    }

    pub fn get_x402_config(&self) -> Result<X402Config> {
        decode(self.execute(Endpoint::x402_config())?)
    }

    /// Always fails with [`Error::PaymentRequired`]
    pub fn create_bounty(&self, request: &CreateBounty) -> Result<Bounty> {
        Err(payment_required(request))
    }

    /// Claim a bounty for `wallet_address`; returns the updated bounty
    pub fn claim_bounty(&self, bounty_id: impl fmt::Display, wallet_address: &str) -> Result<Bounty> {
        decode(self.execute(Endpoint::claim(&bounty_id.to_string(), wallet_address))?)
    }

    /// Submit work for a claimed bounty; an empty `proof` is not sent
    pub fn submit_work(
        &self,
        bounty_id: impl fmt::Display,
        wallet_address: &str,
        content: &str,
        proof: Option<&str>,
    ) -> Result<Bounty> {
        let endpoint = Endpoint::submit(&bounty_id.to_string(), wallet_address, content, proof);
        decode(self.execute(endpoint)?)
    }
}
