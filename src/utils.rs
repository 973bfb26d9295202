//! Currency conversion and aggregate helpers
//!
//! Amounts travel as integer micro-USDC (6 decimals). Conversions use
//! `rust_decimal` so no binary floating point sits between the wire value
//! and what gets displayed.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{Bounty, BountyStatus};

/// Micro-units per whole USDC
pub const MICRO_PER_USDC: u64 = 1_000_000;

/// Number of decimal places carried by micro-USDC
pub const USDC_DECIMALS: u32 = 6;

/// Convert micro-USDC to USDC, exactly
pub fn micro_to_usdc(micro: u64) -> Decimal {
    Decimal::from_i128_with_scale(i128::from(micro), USDC_DECIMALS)
}

/// Convert USDC to micro-USDC. Sub-micro digits are truncated; negative or
/// out-of-range amounts yield `None`.
pub fn usdc_to_micro(usdc: Decimal) -> Option<u64> {
    if usdc.is_sign_negative() && !usdc.is_zero() {
        return None;
    }
    usdc.checked_mul(Decimal::from(MICRO_PER_USDC))?
        .trunc()
        .to_u64()
}

/// Format an amount as `"10.50 USDC"` (banker's rounding to cents)
pub fn format_usdc(amount: Decimal) -> String {
    let cents = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
    format!("{:.2} USDC", cents)
}

/// Sum of rewards in USDC
pub fn calculate_total_value(bounties: &[Bounty]) -> Decimal {
    bounties.iter().map(Bounty::reward_usdc).sum()
}

/// Mean reward in USDC, zero for an empty slice
pub fn calculate_average_reward(bounties: &[Bounty]) -> Decimal {
    if bounties.is_empty() {
        return Decimal::ZERO;
    }
    calculate_total_value(bounties) / Decimal::from(bounties.len() as u64)
}

/// Distinct tags across all bounties, sorted
pub fn get_unique_tags(bounties: &[Bounty]) -> Vec<String> {
    bounties
        .iter()
        .flat_map(|b| b.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Partition by status. Input order is kept within each bucket.
pub fn group_by_status(bounties: &[Bounty]) -> BTreeMap<BountyStatus, Vec<Bounty>> {
    let mut groups: BTreeMap<BountyStatus, Vec<Bounty>> = BTreeMap::new();
    for bounty in bounties {
        groups.entry(bounty.status).or_default().push(bounty.clone());
    }
    groups
}

/// Bucket by lower-cased tag; a bounty lands in every bucket it is tagged with
pub fn group_by_tag(bounties: &[Bounty]) -> BTreeMap<String, Vec<Bounty>> {
    let mut groups: BTreeMap<String, Vec<Bounty>> = BTreeMap::new();
    for bounty in bounties {
        let tags: BTreeSet<String> = bounty.tags.iter().map(|t| t.to_lowercase()).collect();
        for tag in tags {
            groups.entry(tag).or_default().push(bounty.clone());
        }
    }
    groups
}

/// Shorten a wallet address for display, e.g. `0xccD7...f83F`
pub fn truncate_address(address: &str, chars: usize) -> String {
    let len = address.chars().count();
    if len <= chars * 2 + 2 {
        return address.to_string();
    }
    let head: String = address.chars().take(chars + 2).collect();
    let tail: String = address.chars().skip(len - chars).collect();
    format!("{}...{}", head, tail)
}
