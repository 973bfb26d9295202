//! Client-side bounty filtering and sorting
//!
//! The API has no server-side filtering, so [`BountyFilter`] narrows a
//! fetched list locally. The builder is by-value: every `with_*` call returns
//! a new filter, so a base filter can be cloned and narrowed per branch.
//!
//! ```
//! use owockibot::{BountyFilter, BountyStatus};
//! use rust_decimal::Decimal;
//!
//! let filter = BountyFilter::new()
//!     .with_status([BountyStatus::Open])
//!     .with_tags(["coding"])
//!     .with_min_reward(Decimal::new(10, 0));
//! assert!(!filter.is_empty());
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::{Bounty, BountyStatus};
use crate::utils::usdc_to_micro;

/// Caller-supplied predicate stored in the filter's custom slot
pub type BountyPredicate = Arc<dyn Fn(&Bounty) -> bool + Send + Sync>;

/// Sort order for the `sort_by_*` helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Composable filter over a list of bounties
///
/// Stages run in a fixed order: status, tags (all required), min reward,
/// max reward, creator, claimant, search text, custom predicate. Unset
/// stages are skipped. Text comparisons ignore case.
#[derive(Clone, Default)]
pub struct BountyFilter {
    statuses: Vec<BountyStatus>,
    tags: Vec<String>,
    min_reward: Option<Decimal>,
    max_reward: Option<Decimal>,
    creator: Option<String>,
    claimed_by: Option<String>,
    search_query: Option<String>,
    custom: Option<BountyPredicate>,
}

impl fmt::Debug for BountyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BountyFilter")
            .field("statuses", &self.statuses)
            .field("tags", &self.tags)
            .field("min_reward", &self.min_reward)
            .field("max_reward", &self.max_reward)
            .field("creator", &self.creator)
            .field("claimed_by", &self.claimed_by)
            .field("search_query", &self.search_query)
            .field("custom", &self.custom.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl BountyFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no criterion is set
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
            && self.tags.is_empty()
            && self.min_reward.is_none()
            && self.max_reward.is_none()
            && self.creator.is_none()
            && self.claimed_by.is_none()
            && self.search_query.is_none()
            && self.custom.is_none()
    }

    /// Keep bounties whose status is any of `statuses` (accumulates)
    pub fn with_status(mut self, statuses: impl IntoIterator<Item = BountyStatus>) -> Self {
        for status in statuses {
            if !self.statuses.contains(&status) {
                self.statuses.push(status);
            }
        }
        self
    }

    /// Keep bounties carrying every one of `tags` (accumulates).
    /// Matching ignores case; query params keep the caller's spelling.
    pub fn with_tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Keep bounties carrying at least one of `tags`.
    ///
    /// This occupies the custom-predicate slot: it replaces any predicate
    /// set earlier with [`with_predicate`](Self::with_predicate), and a later
    /// `with_predicate` call replaces it.
    pub fn with_any_tags<S: Into<String>>(self, tags: impl IntoIterator<Item = S>) -> Self {
        let wanted: Vec<String> = tags.into_iter().map(|t| t.into().to_lowercase()).collect();
        self.with_predicate(move |bounty: &Bounty| wanted.iter().any(|t| bounty.has_tag(t)))
    }

    /// Keep bounties with a reward of at least `amount` USDC
    pub fn with_min_reward(mut self, amount: Decimal) -> Self {
        self.min_reward = Some(amount);
        self
    }

    /// Keep bounties with a reward of at most `amount` USDC
    pub fn with_max_reward(mut self, amount: Decimal) -> Self {
        self.max_reward = Some(amount);
        self
    }

    pub fn with_reward_range(self, min: Decimal, max: Decimal) -> Self {
        self.with_min_reward(min).with_max_reward(max)
    }

    /// Keep bounties created by `creator` (wallet address). A blank
    /// value leaves the stage unset.
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = non_empty_lowercase(creator.into());
        self
    }

    /// Keep bounties claimed by `claimant` (wallet address). A blank
    /// value leaves the stage unset.
    pub fn with_claimed_by(mut self, claimant: impl Into<String>) -> Self {
        self.claimed_by = non_empty_lowercase(claimant.into());
        self
    }

    /// Substring search over title and description. A blank query leaves
    /// the stage unset.
    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search_query = non_empty_lowercase(query.into());
        self
    }

    /// Set the custom predicate, replacing whatever occupied the slot
    /// (including [`with_any_tags`](Self::with_any_tags))
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Bounty) -> bool + Send + Sync + 'static,
    {
        self.custom = Some(Arc::new(predicate));
        self
    }

    /// Apply every stage in order, returning the survivors in input order
    pub fn apply(&self, bounties: &[Bounty]) -> Vec<Bounty> {
        let mut result: Vec<Bounty> = bounties.to_vec();

        if !self.statuses.is_empty() {
            result.retain(|b| self.statuses.contains(&b.status));
        }

        if !self.tags.is_empty() {
            result.retain(|b| self.tags.iter().all(|t| b.has_tag(t)));
        }

        if let Some(min) = self.min_reward {
            result.retain(|b| b.reward_usdc() >= min);
        }

        if let Some(max) = self.max_reward {
            result.retain(|b| b.reward_usdc() <= max);
        }

        if let Some(creator) = &self.creator {
            result.retain(|b| b.creator.to_lowercase() == *creator);
        }

        if let Some(claimant) = &self.claimed_by {
            result.retain(|b| {
                b.claimed_by
                    .as_deref()
                    .is_some_and(|c| c.to_lowercase() == *claimant)
            });
        }

        if let Some(query) = &self.search_query {
            result.retain(|b| {
                b.title.to_lowercase().contains(query.as_str())
                    || b.description.to_lowercase().contains(query.as_str())
            });
        }

        if let Some(predicate) = &self.custom {
            result.retain(|b| predicate(b));
        }

        result
    }

    /// Query parameters for a future server-side filter. The live API
    /// ignores them. Rewards are sent in micro-USDC.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();

        if !self.statuses.is_empty() {
            let joined: Vec<&str> = self.statuses.iter().map(|s| s.as_str()).collect();
            params.push(("status", joined.join(",")));
        }
        if !self.tags.is_empty() {
            params.push(("tags", self.tags.join(",")));
        }
        if let Some(micro) = self.min_reward.and_then(usdc_to_micro) {
            params.push(("minReward", micro.to_string()));
        }
        if let Some(micro) = self.max_reward.and_then(usdc_to_micro) {
            params.push(("maxReward", micro.to_string()));
        }
        if let Some(creator) = &self.creator {
            params.push(("creator", creator.clone()));
        }
        if let Some(query) = &self.search_query {
            params.push(("q", query.clone()));
        }

        params
    }
}

fn non_empty_lowercase(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

/// Bounties carrying all of `tags`
pub fn filter_by_tags<S: Into<String>>(
    bounties: &[Bounty],
    tags: impl IntoIterator<Item = S>,
) -> Vec<Bounty> {
    BountyFilter::new().with_tags(tags).apply(bounties)
}

/// Bounties that are open for claiming
pub fn filter_open(bounties: &[Bounty]) -> Vec<Bounty> {
    BountyFilter::new()
        .with_status([BountyStatus::Open])
        .apply(bounties)
}

/// Bounties whose title or description contains `query`
pub fn search_bounties(bounties: &[Bounty], query: &str) -> Vec<Bounty> {
    BountyFilter::new().search(query).apply(bounties)
}

/// Stable sort by reward
pub fn sort_by_reward(bounties: &[Bounty], direction: SortDirection) -> Vec<Bounty> {
    let mut sorted = bounties.to_vec();
    sorted.sort_by(|a, b| direction.apply(a.reward.cmp(&b.reward)));
    sorted
}

/// Stable sort by creation time
pub fn sort_by_created(bounties: &[Bounty], direction: SortDirection) -> Vec<Bounty> {
    let mut sorted = bounties.to_vec();
    sorted.sort_by(|a, b| direction.apply(a.created_at.cmp(&b.created_at)));
    sorted
}

/// Stable sort by deadline. Bounties without one rank after every dated
/// bounty, so they come last ascending and first descending.
pub fn sort_by_deadline(bounties: &[Bounty], direction: SortDirection) -> Vec<Bounty> {
    let key = |b: &Bounty| b.deadline.unwrap_or(DateTime::<Utc>::MAX_UTC);
    let mut sorted = bounties.to_vec();
    sorted.sort_by(|a, b| direction.apply(key(a).cmp(&key(b))));
    sorted
}
