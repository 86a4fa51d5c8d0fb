//! Cache of coordinate transformations between the elements of a system
use crate::{nodes::ElementId, utils::geom_transformation::Transform};

/// Dense N×N table of pairwise transforms plus the local-to-global transform of every element.
///
/// Entries are filled lazily and flushed explicitly when an element moves or is removed. The table grows with the
/// number of elements; it never shrinks.
#[derive(Debug, Clone, Default)]
pub struct TransformCache {
    size: usize,
    global: Vec<Option<Transform>>,
    pairwise: Vec<Option<Transform>>,
}
impl TransformCache {
    /// Creates a new (empty) [`TransformCache`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns the number of elements covered by this [`TransformCache`].
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
    /// Grow the cache to cover `size` elements. Existing entries are preserved.
    pub fn grow(&mut self, size: usize) {
        if size <= self.size {
            return;
        }
        let mut pairwise = vec![None; size * size];
        for from in 0..self.size {
            let old_row = &self.pairwise[from * self.size..(from + 1) * self.size];
            pairwise[from * size..from * size + self.size].copy_from_slice(old_row);
        }
        self.pairwise = pairwise;
        self.global.resize(size, None);
        self.size = size;
    }
    fn index(&self, from: ElementId, to: ElementId) -> Option<usize> {
        (from.0 < self.size && to.0 < self.size).then(|| from.0 * self.size + to.0)
    }
    /// Returns the cached transform from the frame of `from` into the frame of `to`.
    #[must_use]
    pub fn get(&self, from: ElementId, to: ElementId) -> Option<Transform> {
        self.index(from, to).and_then(|i| self.pairwise[i])
    }
    /// Store the transform from the frame of `from` into the frame of `to` (and its inverse).
    pub fn insert(&mut self, from: ElementId, to: ElementId, transform: Transform) {
        if let Some(i) = self.index(from, to) {
            self.pairwise[i] = Some(transform);
        }
        if let Some(i) = self.index(to, from) {
            self.pairwise[i] = Some(transform.inverse());
        }
    }
    /// Returns the cached local-to-global transform of the given element.
    #[must_use]
    pub fn global(&self, id: ElementId) -> Option<Transform> {
        self.global.get(id.0).copied().flatten()
    }
    /// Store the local-to-global transform of the given element.
    pub fn insert_global(&mut self, id: ElementId, transform: Transform) {
        if let Some(entry) = self.global.get_mut(id.0) {
            *entry = Some(transform);
        }
    }
    /// Flush all entries (global transform, row and column) referencing the given element.
    pub fn invalidate(&mut self, id: ElementId) {
        if id.0 >= self.size {
            return;
        }
        self.global[id.0] = None;
        for other in 0..self.size {
            self.pairwise[id.0 * self.size + other] = None;
            self.pairwise[other * self.size + id.0] = None;
        }
    }
    /// Returns the number of cached pairwise transforms.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.pairwise.iter().filter(|t| t.is_some()).count()
    }
}
