//! Market data providers for barloom.
//!
//! Each source implements [`BarProvider`], returning raw bars with
//! whatever zone information it reports; normalization happens
//! downstream. Sources:
//!
//! - [`AlpacaProvider`] - credentialed intraday and daily bars
//! - [`StooqProvider`] - keyless daily bars
//! - [`AlphaVantageProvider`] - keyed fallback with a tight budget
//!
//! [`default_chain`] assembles the standard ordering from the
//! environment.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod alpaca;
mod alpha_vantage;
mod chain;
mod error;
mod http;
mod provider;
mod stooq;

pub use alpaca::AlpacaProvider;
pub use alpha_vantage::AlphaVantageProvider;
pub use chain::default_chain;
pub use error::ProviderError;
pub use provider::{BarProvider, ProviderKind};
pub use stooq::StooqProvider;
