//! Platform statistics

use serde::Serialize;
use serde_json::Value;

use super::fields::{Fields, FromJson};
use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub total_bounties: u64,
    pub open_bounties: u64,
    pub completed_bounties: u64,
    /// Already in whole USDC on the wire
    pub total_rewards_usdc: f64,
    pub total_agents: u64,
    pub db_connected: bool,
}

impl Stats {
    /// Completed bounties as a percentage of all bounties
    pub fn completion_rate(&self) -> f64 {
        if self.total_bounties == 0 {
            return 0.0;
        }
        self.completed_bounties as f64 / self.total_bounties as f64 * 100.0
    }

    /// Average payout per completed bounty
    pub fn average_reward_usdc(&self) -> f64 {
        if self.completed_bounties == 0 {
            return 0.0;
        }
        self.total_rewards_usdc / self.completed_bounties as f64
    }
}

impl FromJson for Stats {
    const ENTITY: &'static str = "Stats";

    fn from_json(value: &Value) -> Result<Self, ParseError> {
        let f = Fields::of(Self::ENTITY, value)?;
        Ok(Self {
            total_bounties: f.u64("totalBounties")?,
            open_bounties: f.u64("openBounties")?,
            completed_bounties: f.u64("completedBounties")?,
            total_rewards_usdc: f.f64("totalRewardsUSDC")?,
            total_agents: f.u64("totalAgents")?,
            db_connected: f.bool("dbConnected")?,
        })
    }
}
