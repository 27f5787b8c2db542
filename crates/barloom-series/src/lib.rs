//! Time-series utilities for barloom.
//!
//! This crate provides the transformations applied to every fetched bar
//! table before it is returned to callers:
//!
//! - [`normalize_utc`] - Timezone normalization of provider output
//! - [`restrict_to_session`] - Regular-trading-hours filtering
//! - [`resample`] - OHLCV-preserving aggregation to a coarser interval

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod normalize;
mod resample;
mod session;

pub use normalize::normalize_utc;
pub use resample::resample;
pub use session::restrict_to_session;
