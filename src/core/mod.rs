//! Core business logic abstractions

pub mod cache;
pub mod config;
pub mod convert;
pub mod currency;
pub mod log;
pub mod rate;

// Re-export main types for cleaner imports
pub use currency::{CurrencyCode, CurrencyPair};
pub use rate::{RateProvider, RateSeries, RateTable};
