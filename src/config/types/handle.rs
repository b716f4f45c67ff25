//! Global config handle.
//!
//! `arc-swap` gives lock-free reads; commands call `cfg()` wherever they need
//! the loaded `kleio.toml`.

use crate::config::KleioConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<KleioConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(KleioConfig::default()));

#[inline]
pub fn cfg() -> Arc<KleioConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: KleioConfig) -> Arc<KleioConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
