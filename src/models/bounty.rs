//! Bounty, its status, submissions and rejections

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::fields::{Fields, FromJson};
use super::payment::{Payment, PendingPayment};
use crate::error::ParseError;
use crate::utils::micro_to_usdc;

/// Lifecycle state of a bounty
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BountyStatus {
    Open,
    Claimed,
    Submitted,
    Completed,
    Cancelled,
    PaymentFailed,
}

impl BountyStatus {
    pub const ALL: [BountyStatus; 6] = [
        BountyStatus::Open,
        BountyStatus::Claimed,
        BountyStatus::Submitted,
        BountyStatus::Completed,
        BountyStatus::Cancelled,
        BountyStatus::PaymentFailed,
    ];

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            BountyStatus::Open => "open",
            BountyStatus::Claimed => "claimed",
            BountyStatus::Submitted => "submitted",
            BountyStatus::Completed => "completed",
            BountyStatus::Cancelled => "cancelled",
            BountyStatus::PaymentFailed => "payment_failed",
        }
    }
}

impl fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BountyStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BountyStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

/// Work submitted against a bounty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: String,
    pub content: String,
    pub submitted_at: DateTime<Utc>,
    pub proof: Option<String>,
}

impl FromJson for Submission {
    const ENTITY: &'static str = "Submission";

    fn from_json(value: &Value) -> Result<Self, ParseError> {
        let f = Fields::of(Self::ENTITY, value)?;
        Ok(Self {
            id: f.string("id")?,
            content: f.string("content")?,
            submitted_at: f.timestamp("submittedAt")?,
            proof: f.opt_string("proof")?,
        })
    }
}

/// A rejected claim, with what the previous claimant had submitted
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub reason: String,
    pub rejected_at: DateTime<Utc>,
    pub previous_claimant: Option<String>,
    pub previous_submissions: Vec<Submission>,
}

impl FromJson for Rejection {
    const ENTITY: &'static str = "Rejection";

    fn from_json(value: &Value) -> Result<Self, ParseError> {
        let f = Fields::of(Self::ENTITY, value)?;
        Ok(Self {
            reason: f.string("reason")?,
            rejected_at: f.timestamp("rejectedAt")?,
            previous_claimant: f.opt_string("previousClaimant")?,
            previous_submissions: f.list("previousSubmissions")?,
        })
    }
}

/// A task posted on the bounty board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounty {
    pub id: String,
    pub uuid: Uuid,
    pub title: String,
    pub description: String,
    /// Micro-USDC
    pub reward: u64,
    pub reward_formatted: String,
    pub status: BountyStatus,
    pub creator: String,
    pub deadline: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub requirements: Vec<String>,
    pub submissions: Vec<Submission>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub claimed_by: Option<String>,
    pub claimed_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub payment_error: Option<String>,
    pub pending_payment: Option<PendingPayment>,
    pub payment: Option<Payment>,
    pub rejections: Vec<Rejection>,
}

impl Bounty {
    /// Reward in USDC
    pub fn reward_usdc(&self) -> Decimal {
        micro_to_usdc(self.reward)
    }

    pub fn is_open(&self) -> bool {
        self.status == BountyStatus::Open
    }

    pub fn is_claimed(&self) -> bool {
        self.status == BountyStatus::Claimed
    }

    pub fn is_submitted(&self) -> bool {
        self.status == BountyStatus::Submitted
    }

    pub fn is_completed(&self) -> bool {
        self.status == BountyStatus::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == BountyStatus::Cancelled
    }

    pub fn is_payment_failed(&self) -> bool {
        self.status == BountyStatus::PaymentFailed
    }

    /// Case-insensitive tag membership
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl FromJson for Bounty {
    const ENTITY: &'static str = "Bounty";

    fn from_json(value: &Value) -> Result<Self, ParseError> {
        let f = Fields::of(Self::ENTITY, value)?;
        Ok(Self {
            id: f.string("id")?,
            uuid: f.parsed("uuid", |s| Uuid::parse_str(s).map_err(|e| e.to_string()))?,
            title: f.string("title")?,
            description: f.string("description")?,
            reward: f.u64("reward")?,
            reward_formatted: f.string("rewardFormatted")?,
            status: f.parsed("status", |s| BountyStatus::from_str(s).map_err(|e| e.to_string()))?,
            creator: f.string("creator")?,
            deadline: f.opt_timestamp("deadline")?,
            tags: f.string_list("tags")?,
            requirements: f.string_list("requirements")?,
            submissions: f.list("submissions")?,
            created_at: f.timestamp("createdAt")?,
            updated_at: f.timestamp("updatedAt")?,
            claimed_by: f.opt_string("claimedBy")?,
            claimed_at: f.opt_timestamp("claimedAt")?,
            approved_at: f.opt_timestamp("approvedAt")?,
            completed_at: f.opt_timestamp("completedAt")?,
            payment_error: f.opt_string("paymentError")?,
            pending_payment: f.opt_object("pendingPayment")?,
            payment: f.opt_object("payment")?,
            rejections: f.list("rejections")?,
        })
    }
}
