//! Fee resolution logic for the Seller Fee Engine.
//!
//! This module contains the pure resolver functions for each seller fee
//! (referral, weight handling, closing, pick & pack) and the aggregator that
//! combines them into net earnings. Every resolver takes an explicit rate
//! table, returns its amount together with an audit step, and never reads a
//! rate it does not need.

mod closing_fee;
mod pick_and_pack_fee;
mod referral_fee;
mod total_fees;
mod weight_handling_fee;

pub use closing_fee::{ClosingFeeResult, calculate_closing_fee};
pub use pick_and_pack_fee::{PickAndPackFeeResult, calculate_pick_and_pack_fee};
pub use referral_fee::{
    DEFAULT_REFERRAL_PERCENTAGE, ReferralFeeResult, calculate_referral_fee, classify_category,
};
pub use total_fees::{aggregate_fees, calculate_total_fees};
pub use weight_handling_fee::{BandCharge, WeightHandlingFeeResult, calculate_weight_handling_fee};
