//! Per-node memo of layout results.
//!
//! Each node remembers the inputs and output of its last performed layout
//! plus a small ring of measurement-only results. A lookup hits when the
//! inputs match, or when an exact request equals the size the node already
//! settled on for that axis. The tree clears a node's entries the first time
//! a pass visits it while dirty.

use boxflow_core::Size;

use crate::engine::axis::{OwnerSize, SizeConstraint};
use crate::style::Direction;

/// Number of measurement entries kept per node.
pub(crate) const MEASUREMENT_SLOTS: usize = 8;

const SIZE_EPSILON: f32 = 1e-4;

/// Inputs that fully determine a node's layout while it stays clean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct CacheKey {
    pub width: SizeConstraint,
    pub height: SizeConstraint,
    pub owner: OwnerSize,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct CacheEntry {
    key: CacheKey,
    size: Size,
}

impl CacheEntry {
    fn answers(&self, key: &CacheKey) -> bool {
        self.key.direction == key.direction
            && self.key.owner == key.owner
            && axis_answers(self.key.width, self.size.width, key.width)
            && axis_answers(self.key.height, self.size.height, key.height)
    }
}

fn axis_answers(cached: SizeConstraint, computed: f32, requested: SizeConstraint) -> bool {
    if cached == requested {
        return true;
    }
    matches!(requested, SizeConstraint::Exact(v) if (v - computed).abs() < SIZE_EPSILON)
}

#[derive(Debug, Clone, Default)]
pub(crate) struct LayoutCache {
    layout: Option<CacheEntry>,
    measurements: [Option<CacheEntry>; MEASUREMENT_SLOTS],
    next_slot: usize,
}

impl LayoutCache {
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Result of a previous performed layout with matching inputs.
    pub(crate) fn layout(&self, key: &CacheKey) -> Option<Size> {
        self.layout
            .filter(|entry| entry.answers(key))
            .map(|entry| entry.size)
    }

    /// Result of a previous measurement, or of a performed layout, with
    /// matching inputs.
    pub(crate) fn measurement(&self, key: &CacheKey) -> Option<Size> {
        self.layout(key).or_else(|| {
            self.measurements
                .iter()
                .flatten()
                .find(|entry| entry.answers(key))
                .map(|entry| entry.size)
        })
    }

    pub(crate) fn store_layout(&mut self, key: CacheKey, size: Size) {
        self.layout = Some(CacheEntry { key, size });
    }

    /// Store a measurement, overwriting the oldest slot once the ring is full.
    pub(crate) fn store_measurement(&mut self, key: CacheKey, size: Size) {
        self.measurements[self.next_slot] = Some(CacheEntry { key, size });
        self.next_slot = (self.next_slot + 1) % MEASUREMENT_SLOTS;
    }
}
