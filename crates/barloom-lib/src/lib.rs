//! OHLCV market data fetching and ML dataset building.
//!
//! This is a facade crate that re-exports functionality from the
//! barloom workspace crates for convenient access.
//!
//! # Quick Start
//!
//! ```ignore
//! use barloom_lib::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let fetcher = BarFetcher::from_env()?;
//!
//!     let range = DateRange::new(
//!         chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         chrono::NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
//!     )?;
//!
//!     let bars = fetcher.get_bars("AAPL", range, Interval::Day1, false).await?;
//!     println!("Fetched {} bars", bars.len());
//!
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use barloom_types::*;

// Re-export time-series transformations
pub use barloom_series::{normalize_utc, resample, restrict_to_session};

// Re-export persistence
pub use barloom_format::{FormatError, read_bars, read_frame, write_bars, write_frame};

// Re-export feature engineering
pub use barloom_features::{
    FeatureColumn, FeatureFrame, FeatureMeta, FrameError, StandardScaler, build_dataset,
    engineer_basic_features, future_log_return, indicators,
};

// Re-export providers
pub use barloom_providers::{
    AlpacaProvider, AlphaVantageProvider, BarProvider, ProviderError, ProviderKind, StooqProvider,
    default_chain,
};

// Re-export caching and orchestration
pub use barloom_cache::{BarCache, CacheError, cache_key};
pub use barloom_fetch::{BarFetcher, ProviderOutcome};

/// Prelude module for convenient imports.
///
/// ```
/// use barloom_lib::prelude::*;
/// ```
pub mod prelude {
    pub use barloom_types::{
        Bar, BarTable, BarloomError, DateRange, DateRangeError, Interval, RawBar, RawStamp, Result,
    };

    pub use barloom_cache::BarCache;
    pub use barloom_features::{FeatureFrame, FeatureMeta, build_dataset};
    pub use barloom_fetch::BarFetcher;
    pub use barloom_providers::{BarProvider, ProviderKind, default_chain};
    pub use barloom_series::{normalize_utc, resample, restrict_to_session};
}
