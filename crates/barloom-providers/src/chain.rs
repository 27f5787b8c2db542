//! Default provider ordering.

use crate::{
    AlpacaProvider, AlphaVantageProvider, BarProvider, ProviderError, StooqProvider,
};

/// Assembles the default provider chain from the environment.
///
/// Order matters: the credentialed intraday source first (when its
/// keys are present), then the keyless daily source, then the
/// rate-limited fallback (when its key is present).
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be created.
pub fn default_chain() -> Result<Vec<Box<dyn BarProvider>>, ProviderError> {
    let mut providers: Vec<Box<dyn BarProvider>> = Vec::new();
    if let Some(alpaca) = AlpacaProvider::from_env()? {
        providers.push(Box::new(alpaca));
    }
    providers.push(Box::new(StooqProvider::new()?));
    if let Some(av) = AlphaVantageProvider::from_env()? {
        providers.push(Box::new(av));
    }
    Ok(providers)
}
