//! Seller Fee Engine for marketplace listings
//!
//! This crate resolves the fees a marketplace charges a seller for one
//! listing (referral, weight handling, closing and pick & pack) from the
//! marketplace's published rate sheets, and sums them into net earnings.
//!
//! - [`config`] parses raw rate-sheet rows into a typed [`config::RateTable`]
//! - [`calculation`] holds the pure fee resolvers and the aggregator
//! - [`api`] exposes the resolvers over HTTP

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
