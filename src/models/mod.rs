//! Domain models for the bounty board API
//!
//! Every model is an immutable value built by [`FromJson::from_json`] from
//! the raw JSON the client received. Parsing is all-or-nothing.

mod bounty;
mod fields;
mod payment;
mod stats;
mod x402;

pub use bounty::{Bounty, BountyStatus, Rejection, Submission};
pub use fields::FromJson;
pub use payment::{Payment, PendingPayment};
pub use stats::Stats;
pub use x402::{TokenConfig, X402Config};
