//! Parquet persistence for barloom.
//!
//! Bar tables and feature frames are stored as parquet with a
//! microsecond-precision UTC timestamp column, so a save→load round
//! trip preserves every instant exactly:
//!
//! - [`write_bars`] / [`read_bars`] - OHLCV tables
//! - [`write_frame`] / [`read_frame`] - feature/label frames

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bars;
mod error;
mod frames;

pub use bars::{read_bars, write_bars};
pub use error::FormatError;
pub use frames::{read_frame, write_frame};
