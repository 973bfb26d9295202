//! owockibot - Rust client for the AI bounty board
//!
//! Talks to the owockibot bounty board at https://bounty.owockibot.xyz,
//! turning its JSON into typed, immutable models.
//!
//! # How it works
//!
//! 1. A client ([`BountyBoardClient`] or [`AsyncBountyBoardClient`]) sends the request
//! 2. HTTP status codes map onto [`Error`] variants before any body is decoded
//! 3. The JSON body is normalized into models (timestamps to UTC, micro-USDC to `Decimal`)
//! 4. [`BountyFilter`] and the sort/group helpers narrow results client-side
//!
//! # Not supported
//!
//! - Creating bounties: that requires x402 payment signing, so
//!   `create_bounty` always returns [`Error::PaymentRequired`]
//! - Retries, caching, pagination

pub mod client;
pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod timestamp;
pub mod utils;

pub use client::{AsyncBountyBoardClient, BountyBoardClient, CreateBounty};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{Error, ParseError, Result};
pub use filters::{
    filter_by_tags, filter_open, search_bounties, sort_by_created, sort_by_deadline,
    sort_by_reward, BountyFilter, BountyPredicate, SortDirection,
};
pub use models::{
    Bounty, BountyStatus, FromJson, Payment, PendingPayment, Rejection, Stats, Submission,
    TokenConfig, X402Config,
};
pub use timestamp::parse_timestamp;
pub use utils::{
    calculate_average_reward, calculate_total_value, format_usdc, get_unique_tags,
    group_by_status, group_by_tag, micro_to_usdc, truncate_address, usdc_to_micro,
};
