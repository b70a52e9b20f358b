//! Test helpers module
//!
//! Shared setup for the integration tests: an application context backed by
//! the in-memory stores, wiremock servers standing in for the bank and
//! exchange-rate APIs, and builders for test records.

#![allow(dead_code)]

pub mod bank_mock;
pub mod currency_mock;
pub mod test_context;
pub mod test_data;

pub use bank_mock::*;
pub use currency_mock::*;
pub use test_context::*;
pub use test_data::*;
