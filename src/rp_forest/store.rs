//! Dense vector storage keyed by caller-supplied item ids.

use std::collections::HashMap;

use crate::RetrieveError;

/// Flat (SoA) vector storage.
///
/// Items are addressed internally by *slot*, their insertion position. Trees
/// store slots, never ids, so that the query engine can track visited items
/// in a plain bitmap.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    dimension: usize,
    vectors: Vec<f32>,
    ids: Vec<u32>,
    slots: HashMap<u32, u32>,
}

impl VectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            ..Default::default()
        }
    }

    /// Append an item. On error nothing is stored.
    pub fn insert(&mut self, id: u32, vector: &[f32]) -> Result<(), RetrieveError> {
        if vector.len() != self.dimension {
            return Err(RetrieveError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if self.slots.contains_key(&id) {
            return Err(RetrieveError::DuplicateId(id));
        }
        let slot = u32::try_from(self.ids.len()).map_err(|_| {
            RetrieveError::InvalidParameter("store is limited to u32::MAX items".to_string())
        })?;

        self.vectors.extend_from_slice(vector);
        self.ids.push(id);
        self.slots.insert(id, slot);
        Ok(())
    }

    /// Vector stored under `id`.
    pub fn get(&self, id: u32) -> Result<&[f32], RetrieveError> {
        self.slot_of(id)
            .map(|slot| self.vector(slot))
            .ok_or(RetrieveError::NotFound(id))
    }

    #[inline]
    pub fn slot_of(&self, id: u32) -> Option<u32> {
        self.slots.get(&id).copied()
    }

    /// Vector at `slot`. Panics if the slot is out of range.
    #[inline]
    pub(crate) fn vector(&self, slot: u32) -> &[f32] {
        let start = slot as usize * self.dimension;
        &self.vectors[start..start + self.dimension]
    }

    #[inline]
    pub(crate) fn id(&self, slot: u32) -> u32 {
        self.ids[slot as usize]
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// `(id, vector)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &[f32])> + '_ {
        self.ids
            .iter()
            .copied()
            .zip(self.vectors.chunks_exact(self.dimension.max(1)))
    }

    pub(crate) fn size_bytes(&self) -> usize {
        self.vectors.len() * std::mem::size_of::<f32>()
            + self.ids.len() * std::mem::size_of::<u32>()
            + self.slots.capacity() * 2 * std::mem::size_of::<u32>()
    }
}
