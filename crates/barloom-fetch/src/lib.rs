//! Bar fetch orchestration.
//!
//! [`BarFetcher`] ties the pieces together: the on-disk cache, the
//! ordered provider chain, UTC normalization, session filtering, and
//! resampling. [`ProviderOutcome`] classifies what each provider
//! answered during the fallback walk.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod fetcher;
mod outcome;

pub use fetcher::BarFetcher;
pub use outcome::ProviderOutcome;
