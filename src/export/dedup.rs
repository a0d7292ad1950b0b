//! Attribute deduplication tables.
//!
//! Each table maps a rounded attribute key to a compact local index while
//! keeping the raw (unrounded) value for emission. Rounding to 4 decimal
//! places collapses floating-point noise from transform and tessellation
//! into shared indices; it is an intentional lossy quantization.
//!
//! Tables are scoped to one mesh and discarded after emission: sharing is
//! about minimizing per-object redundancy, not cross-object deduplication.

use std::collections::HashMap;
use std::hash::Hash;

/// Append-only arena with a hash lookup from rounded key to arena index.
#[derive(Debug, Default)]
pub struct DedupTable<K, V> {
    lookup: HashMap<K, u32>,
    values: Vec<V>,
}

impl<K: Eq + Hash, V> DedupTable<K, V> {
    pub fn new() -> Self {
        Self {
            lookup: HashMap::new(),
            values: Vec::new(),
        }
    }

    /// Look up `key`, or insert it with `value` and the next local index.
    /// Indices are assigned in strictly increasing first-occurrence order,
    /// making output deterministic for identical input.
    pub fn intern(&mut self, key: K, value: V) -> u32 {
        if let Some(&index) = self.lookup.get(&key) {
            return index;
        }
        let index = self.values.len() as u32;
        self.lookup.insert(key, index);
        self.values.push(value);
        index
    }

    /// Unique values in index order, for emission.
    pub fn values(&self) -> &[V] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

const KEY_SCALE: f64 = 1e4;

fn round4(v: f32) -> i64 {
    (v as f64 * KEY_SCALE).round() as i64
}

/// Position and normal key: the 3 components rounded to 4 decimal places.
pub fn vec3_key(v: [f32; 3]) -> [i64; 3] {
    [round4(v[0]), round4(v[1]), round4(v[2])]
}

/// UV key: the owning vertex index plus the rounded coordinates, so UV
/// sharing never crosses vertex boundaries even when coordinates coincide.
pub fn uv_key(vertex: u32, uv: [f32; 2]) -> (u32, [i64; 2]) {
    (vertex, [round4(uv[0]), round4(uv[1])])
}
