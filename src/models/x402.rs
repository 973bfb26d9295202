//! x402 payment configuration published at `/.well-known/x402`

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::fields::{Fields, FromJson};
use crate::error::ParseError;
use crate::utils::micro_to_usdc;

/// A token accepted for x402 payments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenConfig {
    pub network: String,
    pub token: String,
    /// Token contract address
    pub address: String,
    /// Minimum amount in micro-units, as sent by the server
    pub min_amount: String,
}

impl TokenConfig {
    /// Minimum amount in USDC, if `min_amount` is an integer
    pub fn min_amount_usdc(&self) -> Option<Decimal> {
        u64::from_str(self.min_amount.trim())
            .ok()
            .map(micro_to_usdc)
    }
}

impl FromJson for TokenConfig {
    const ENTITY: &'static str = "TokenConfig";

    fn from_json(value: &Value) -> Result<Self, ParseError> {
        let f = Fields::of(Self::ENTITY, value)?;
        Ok(Self {
            network: f.string("network")?,
            token: f.string("token")?,
            address: f.string("address")?,
            min_amount: f.string("minAmount")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct X402Config {
    pub version: String,
    pub network: String,
    pub chain_id: u64,
    pub accepts: Vec<TokenConfig>,
    pub facilitator: String,
    pub treasury: String,
}

impl X402Config {
    /// First accepted token with the given symbol (case-insensitive)
    pub fn accepted_token(&self, symbol: &str) -> Option<&TokenConfig> {
        self.accepts
            .iter()
            .find(|t| t.token.eq_ignore_ascii_case(symbol))
    }
}

impl FromJson for X402Config {
    const ENTITY: &'static str = "X402Config";

    fn from_json(value: &Value) -> Result<Self, ParseError> {
        let f = Fields::of(Self::ENTITY, value)?;
        Ok(Self {
            version: f.string("version")?,
            network: f.string("network")?,
            chain_id: f.u64("chainId")?,
            accepts: f.required_list("accepts")?,
            facilitator: f.string("facilitator")?,
            treasury: f.string("treasury")?,
        })
    }
}
