use std::sync::atomic::{AtomicBool, Ordering};

use crate::{
    config::PipelineConfig,
    filters::{FilterKind, FilterRegistry},
};

/// Controls shared between the render loop and the UI
///
/// The UI is the only writer of each field; the render loop only reads, once
/// per tick, through [`Session::snapshot`].
#[derive(Debug)]
pub struct Session {
    registry: FilterRegistry,
    mirror: AtomicBool,
}

/// Settings frozen for the duration of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSettings {
    pub filter: FilterKind,
    pub mirror: bool,
}

impl Session {
    pub fn new(registry: FilterRegistry, mirror: bool) -> Self {
        Self {
            registry,
            mirror: AtomicBool::new(mirror),
        }
    }

    /// Built-in catalog with the configured initial filter and mirror flag
    pub fn from_config(config: &PipelineConfig) -> Self {
        let registry = FilterRegistry::new();
        registry.select_kind(config.initial_filter);
        Self::new(registry, config.mirror)
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn mirror_enabled(&self) -> bool {
        self.mirror.load(Ordering::Acquire)
    }

    pub fn set_mirror(&self, enabled: bool) {
        self.mirror.store(enabled, Ordering::Release);
    }

    /// Read every shared control exactly once
    pub fn snapshot(&self) -> TickSettings {
        TickSettings {
            filter: self.registry.active_filter().kind,
            mirror: self.mirror_enabled(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(FilterRegistry::new(), true)
    }
}
