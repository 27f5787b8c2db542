//! Feature engineering and labeling for barloom datasets.
//!
//! This crate turns bar tables into machine-learning-ready data:
//!
//! - [`FeatureFrame`] - Column-oriented feature/label table
//! - [`indicators`] - Returns, rolling statistics and RSI
//! - [`future_log_return`] - Forward log-return labels
//! - [`StandardScaler`] - Per-column standardization
//! - [`build_dataset`] - The full per-symbol pipeline

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod frame;
pub mod indicators;
mod labels;
mod pipeline;
mod scaler;

pub use frame::{FeatureColumn, FeatureFrame, FrameError};
pub use labels::future_log_return;
pub use pipeline::{FeatureMeta, build_dataset, engineer_basic_features};
pub use scaler::StandardScaler;
