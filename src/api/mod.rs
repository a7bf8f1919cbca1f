//! HTTP API module for the Seller Fee Engine.
//!
//! This module exposes the fee resolvers over a small REST API: one
//! endpoint per fee, a combined `/calculate` endpoint and a read-only view
//! of the closing-fee table.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    CalculationRequest, ClosingFeeRequest, FeeResponse, OtherFeesRequest, ReferralFeeRequest,
    WeightHandlingFeeRequest,
};
pub use response::ApiError;
pub use state::AppState;
