//! On-disk parquet cache for bar queries.
//!
//! Each (symbol, interval, date range) query maps to one parquet file
//! under a hive-style partition layout:
//!
//! - [`cache_key`] - relative path of a query's entry
//! - [`BarCache`] - load/save of cached bar tables

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod cache;
mod key;

pub use cache::{BarCache, CacheError};
pub use key::cache_key;
