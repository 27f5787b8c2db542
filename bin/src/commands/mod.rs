//! CLI command implementations.

use indicatif::{ProgressBar, ProgressStyle};

pub(crate) mod build_features;
pub(crate) mod build_panel;
pub(crate) mod delta_ingest;
pub(crate) mod feature_update;
pub(crate) mod fetch;
pub(crate) mod label_mature;

/// Splits a comma-separated symbol list, dropping empty tokens.
pub(crate) fn split_symbols(symbols: &str) -> Vec<String> {
    symbols
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .collect()
}

/// Creates a per-symbol progress bar, hidden in quiet mode.
pub(crate) fn symbol_progress(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} symbols {msg}")
            .expect("Invalid progress template")
            .progress_chars("=>-"),
    );
    pb
}
