//! Per-provider query outcomes.

use barloom_providers::ProviderError;
use barloom_types::BarTable;

/// The result of asking one provider for bars.
///
/// "No data" and "failed" are distinct: an empty answer means the
/// source was reachable but has nothing for the query, while a
/// failure means the source could not be consulted. Both cause
/// fallback to the next provider, but they are logged differently.
#[derive(Debug)]
pub enum ProviderOutcome {
    /// The provider returned data, already normalized to UTC.
    Bars(BarTable),
    /// The provider answered with no data for the query.
    Empty,
    /// The query failed.
    Failed(ProviderError),
}
