use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::error::{FilterError, Result};
use crate::filters::FilterKind;

/// One catalog entry: a user-facing name, an opaque icon id for the
/// presentation layer, and the transform it selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterDefinition {
    pub name: String,
    pub icon: String,
    pub kind: FilterKind,
}

impl FilterDefinition {
    pub fn new<N: Into<String>, I: Into<String>>(name: N, icon: I, kind: FilterKind) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            kind,
        }
    }
}

/// Ordered catalog of filters plus the active selection
///
/// The catalog is fixed once built: insertion order is the display order and
/// the first entry is the default selection. The selection lives in an atomic
/// so a UI thread can change it while the render loop reads it without a lock;
/// the loop picks up a change on its next tick.
#[derive(Debug)]
pub struct FilterRegistry {
    definitions: Vec<FilterDefinition>,
    active: AtomicUsize,
}

impl FilterRegistry {
    /// Create a registry with all built-in filters
    pub fn new() -> Self {
        Self {
            definitions: builtin_definitions(),
            active: AtomicUsize::new(0),
        }
    }

    /// Build a registry from a custom catalog
    ///
    /// Names must be unique and the catalog must not be empty.
    pub fn from_definitions(definitions: Vec<FilterDefinition>) -> Result<Self> {
        if definitions.is_empty() {
            return Err(FilterError::EmptyCatalog.into());
        }

        let mut seen = HashSet::new();
        for definition in &definitions {
            if !seen.insert(definition.name.as_str()) {
                return Err(FilterError::DuplicateName {
                    name: definition.name.clone(),
                }
                .into());
            }
        }

        Ok(Self {
            definitions,
            active: AtomicUsize::new(0),
        })
    }

    /// All filters in display order
    pub fn list(&self) -> &[FilterDefinition] {
        &self.definitions
    }

    /// The currently selected filter
    pub fn active_filter(&self) -> &FilterDefinition {
        &self.definitions[self.active_index()]
    }

    pub fn active_index(&self) -> usize {
        // Only ever stored after a bounds check, min() keeps the read infallible
        self.active
            .load(Ordering::Acquire)
            .min(self.definitions.len() - 1)
    }

    /// Select a filter by exact name; unknown names leave the selection unchanged
    pub fn select(&self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => self.select_index(index),
            None => {
                debug!("Ignoring selection of unknown filter '{}'", name);
                false
            }
        }
    }

    /// Select a filter by position; out-of-range indices are ignored
    pub fn select_index(&self, index: usize) -> bool {
        if index >= self.definitions.len() {
            debug!("Ignoring out-of-range filter index {}", index);
            return false;
        }
        self.active.store(index, Ordering::Release);
        true
    }

    /// Select the first catalog entry backed by `kind`
    pub fn select_kind(&self, kind: FilterKind) -> bool {
        match self.definitions.iter().position(|d| d.kind == kind) {
            Some(index) => self.select_index(index),
            None => false,
        }
    }

    /// Position of the filter called `name`
    pub fn position(&self, name: &str) -> Option<usize> {
        self.definitions.iter().position(|d| d.name == name)
    }

    /// Get the number of registered filters
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_definitions() -> Vec<FilterDefinition> {
    vec![
        FilterDefinition::new("Normal", "circle", FilterKind::Identity),
        FilterDefinition::new("Orange & Teal", "sun", FilterKind::OrangeTeal),
        FilterDefinition::new("White Noise", "tv", FilterKind::WhiteNoise),
        FilterDefinition::new("8-Bit", "grid", FilterKind::EightBit),
        FilterDefinition::new("ASCII", "type", FilterKind::Ascii),
        FilterDefinition::new("Grayscale", "contrast", FilterKind::Grayscale),
        FilterDefinition::new("Pixelate", "squares", FilterKind::Pixelate),
    ]
}
