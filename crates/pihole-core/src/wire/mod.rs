//! Wire adapters for the two API generations
//!
//! - [`CurrentApi`]: session-based REST API
//! - [`LegacyApi`]: query-string `api.php` API

mod current;
mod legacy;

pub use current::{AUTH_HEADER, AUTH_PATH, CurrentApi};
pub use legacy::{AUTH_PARAM, LegacyApi};

use std::sync::Arc;

use crate::config::ApiGeneration;
use crate::traits::WireAdapter;

/// Adapter for the given API generation
pub fn adapter_for(generation: ApiGeneration) -> Arc<dyn WireAdapter> {
    match generation {
        ApiGeneration::Current => Arc::new(CurrentApi),
        ApiGeneration::Legacy => Arc::new(LegacyApi),
    }
}
