//! Ordered list of elements for sequential ray traces
use super::System;
use crate::{
    error::{OptError, OptResult},
    nodes::{ElementId, ElementKind},
};
use serde::{Deserialize, Serialize};

/// The order in which rays pass the elements of a [`System`] in a sequential trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    elements: Vec<ElementId>,
}
impl Sequence {
    /// Creates a new [`Sequence`] from the given list of element ids.
    #[must_use]
    pub const fn new(elements: Vec<ElementId>) -> Self {
        Self { elements }
    }
    /// Creates a [`Sequence`] containing all sources and surface-like elements of a [`System`].
    ///
    /// The elements are sorted by the global z position of their origins. Elements with equal positions keep their
    /// id order.
    ///
    /// # Errors
    ///
    /// This function will return an error if a global transform could not be determined.
    pub fn from_system(system: &System) -> OptResult<Self> {
        let mut elements = system
            .iter()
            .filter(|(_, e)| {
                e.kind().is_interceptable() || matches!(e.kind(), ElementKind::Source(_))
            })
            .map(|(id, _)| Ok((id, system.transform_to_global(id)?.translation().z)))
            .collect::<OptResult<Vec<(ElementId, f64)>>>()?;
        elements.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(Self::new(elements.into_iter().map(|(id, _)| id).collect()))
    }
    /// Append an element to this [`Sequence`].
    pub fn add(&mut self, id: ElementId) {
        self.elements.push(id);
    }
    /// Insert an element at the given position.
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is larger than the length of the sequence.
    pub fn insert(&mut self, index: usize, id: ElementId) -> OptResult<()> {
        if index > self.elements.len() {
            return Err(OptError::Config(format!(
                "cannot insert {id} at position {index} of a sequence with {} elements",
                self.elements.len()
            )));
        }
        self.elements.insert(index, id);
        Ok(())
    }
    /// Remove all occurrences of an element. Returns `true` if the element was found.
    pub fn remove(&mut self, id: ElementId) -> bool {
        let len = self.elements.len();
        self.elements.retain(|e| *e != id);
        len != self.elements.len()
    }
    /// Returns the position of the given element.
    #[must_use]
    pub fn position(&self, id: ElementId) -> Option<usize> {
        self.elements.iter().position(|e| *e == id)
    }
    /// Returns the element following the given element (`None` for the last element or an unknown id).
    #[must_use]
    pub fn next_after(&self, id: ElementId) -> Option<ElementId> {
        self.position(id)
            .and_then(|pos| self.elements.get(pos + 1))
            .copied()
    }
    /// Returns the elements following the given element.
    #[must_use]
    pub fn following(&self, id: ElementId) -> Option<&[ElementId]> {
        self.position(id).map(|pos| &self.elements[pos + 1..])
    }
    /// Returns the elements following the given position.
    #[must_use]
    pub fn following_step(&self, step: usize) -> &[ElementId] {
        self.elements.get(step + 1..).unwrap_or_default()
    }
    /// Returns an iterator over the elements of this [`Sequence`].
    pub fn iter(&self) -> impl Iterator<Item = &ElementId> {
        self.elements.iter()
    }
    /// Returns `true` if this [`Sequence`] contains the given element.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains(&id)
    }
    /// Returns the number of elements of this [`Sequence`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }
    /// Returns `true` if this [`Sequence`] is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        millimeter,
        nodes::{Element, Source, Stop},
        shape::Disk,
        utils::geom_transformation::Transform,
    };
    use std::sync::Arc;

    fn stop_at(z: f64) -> Element {
        Element::new("stop", Stop::new(Arc::new(Disk::new(millimeter!(5.0)).unwrap())))
            .with_transform(Transform::new_along_z(millimeter!(z)).unwrap())
    }
    #[test]
    fn from_system() {
        let mut s = System::new();
        let a = s.add(stop_at(20.0));
        let g = s.add(Element::group("group").with_transform(Transform::new_along_z(millimeter!(5.0)).unwrap()));
        let b = s.add_to(g, stop_at(-5.0)).unwrap();
        let c = s.add(stop_at(10.0));
        let d = s.add(stop_at(10.0));
        let src = s.add(Element::new("source", Source::default()));
        let seq = Sequence::from_system(&s).unwrap();
        assert_eq!(seq.iter().copied().collect::<Vec<_>>(), vec![b, src, c, d, a]);
        assert!(!seq.contains(g));
    }
    #[test]
    fn edit() {
        let mut seq = Sequence::default();
        assert!(seq.is_empty());
        seq.add(ElementId(1));
        seq.add(ElementId(3));
        seq.insert(1, ElementId(2)).unwrap();
        assert!(seq.insert(5, ElementId(4)).is_err());
        assert_eq!(seq.len(), 3);
        assert_eq!(seq.position(ElementId(2)), Some(1));
        assert_eq!(seq.next_after(ElementId(1)), Some(ElementId(2)));
        assert_eq!(seq.next_after(ElementId(3)), None);
        assert_eq!(seq.next_after(ElementId(9)), None);
        assert_eq!(seq.following(ElementId(1)).unwrap(), &[ElementId(2), ElementId(3)]);
        assert!(seq.following(ElementId(9)).is_none());
        assert_eq!(seq.following_step(1), &[ElementId(3)]);
        assert!(seq.following_step(2).is_empty());
        assert!(seq.following_step(7).is_empty());
        assert!(seq.remove(ElementId(2)));
        assert!(!seq.remove(ElementId(2)));
        assert_eq!(seq, Sequence::new(vec![ElementId(1), ElementId(3)]));
    }
    #[test]
    fn serde() {
        let seq = Sequence::new(vec![ElementId(0), ElementId(2)]);
        let yaml = serde_yaml::to_string(&seq).unwrap();
        let back: Sequence = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(seq, back);
    }
}
