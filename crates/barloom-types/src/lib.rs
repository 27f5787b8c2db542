//! Core types for barloom market-data dataset building.
//!
//! This crate provides the fundamental data structures used throughout barloom:
//!
//! - [`Bar`] - A single OHLCV sample with a UTC timestamp
//! - [`RawBar`] - A bar as reported by a provider, before timezone normalization
//! - [`BarTable`] - An ordered, deduplicated sequence of bars
//! - [`Interval`] - Bar sampling granularity
//! - [`DateRange`] - Inclusive date range for queries

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bar;
mod date_range;
mod error;
mod interval;
mod table;

pub use bar::{Bar, RawBar, RawStamp};
pub use date_range::{DateRange, DayIterator};
pub use error::{BarloomError, DateRangeError, Result};
pub use interval::{Interval, IntervalParseError};
pub use table::BarTable;
