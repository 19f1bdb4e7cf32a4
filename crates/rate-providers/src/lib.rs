//! Exchange-rate provider clients and the fallback chain that tries them
//! in priority order.
//!
//! Every provider here is a free public API with no key requirement. The
//! chain treats any provider failure as a reason to move on to the next
//! one; only total exhaustion surfaces to the caller, and even that is a
//! `None`, not an error.

mod chain;
pub mod errors;
pub mod provider;

pub use chain::{ProviderChain, ProviderRate};
pub use errors::RateProviderError;
pub use provider::RateProvider;
