//! Payment records attached to bounties

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use super::fields::{Fields, FromJson};
use crate::error::ParseError;
use crate::utils::micro_to_usdc;

/// Payment queued for a completed bounty but not yet on-chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingPayment {
    /// Platform fee, micro-USDC
    pub fee: u64,
    pub chain: String,
    pub token: String,
    /// Amount paid to the recipient, micro-USDC
    pub net_reward: u64,
    /// Reward before fees, micro-USDC
    pub gross_reward: u64,
    pub recipient: String,
}

impl PendingPayment {
    pub fn fee_usdc(&self) -> Decimal {
        micro_to_usdc(self.fee)
    }

    pub fn net_reward_usdc(&self) -> Decimal {
        micro_to_usdc(self.net_reward)
    }

    pub fn gross_reward_usdc(&self) -> Decimal {
        micro_to_usdc(self.gross_reward)
    }

    /// `fee + net_reward == gross_reward`
    pub fn is_balanced(&self) -> bool {
        self.fee.checked_add(self.net_reward) == Some(self.gross_reward)
    }
}

impl FromJson for PendingPayment {
    const ENTITY: &'static str = "PendingPayment";

    fn from_json(value: &Value) -> Result<Self, ParseError> {
        let f = Fields::of(Self::ENTITY, value)?;
        Ok(Self {
            fee: f.u64("fee")?,
            chain: f.string("chain")?,
            token: f.string("token")?,
            net_reward: f.u64("netReward")?,
            gross_reward: f.u64("grossReward")?,
            recipient: f.string("recipient")?,
        })
    }
}

/// Payment that was processed on-chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payment {
    pub fee: u64,
    pub chain: String,
    pub token: String,
    pub net_reward: u64,
    pub gross_reward: u64,
    pub tx_hash: String,
    pub processed_at: DateTime<Utc>,
    pub processed_by: String,
    pub fee_percent: String,
    pub fee_formatted: String,
    pub net_reward_formatted: String,
}

impl Payment {
    pub fn fee_usdc(&self) -> Decimal {
        micro_to_usdc(self.fee)
    }

    pub fn net_reward_usdc(&self) -> Decimal {
        micro_to_usdc(self.net_reward)
    }

    pub fn gross_reward_usdc(&self) -> Decimal {
        micro_to_usdc(self.gross_reward)
    }

    pub fn is_balanced(&self) -> bool {
        self.fee.checked_add(self.net_reward) == Some(self.gross_reward)
    }
}

impl FromJson for Payment {
    const ENTITY: &'static str = "Payment";

    fn from_json(value: &Value) -> Result<Self, ParseError> {
        let f = Fields::of(Self::ENTITY, value)?;
        Ok(Self {
            fee: f.u64("fee")?,
            chain: f.string("chain")?,
            token: f.string("token")?,
            net_reward: f.u64("netReward")?,
            gross_reward: f.u64("grossReward")?,
            tx_hash: f.string("txHash")?,
            processed_at: f.timestamp("processedAt")?,
            processed_by: f.string("processedBy")?,
            fee_percent: f.string("feePercent")?,
            fee_formatted: f.string("feeFormatted")?,
            net_reward_formatted: f.string("netRewardFormatted")?,
        })
    }
}
