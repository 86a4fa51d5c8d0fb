//! The optical system: scene graph of elements with cached coordinate transforms
//!
//! A [`System`] owns all elements of an optical assembly in an arena indexed by [`ElementId`]. Elements are placed
//! relative to their container (a group or the system root). Transforms between the frames of any two elements are
//! computed on demand and cached in a [`TransformCache`].
use crate::{
    error::{OptError, OptResult},
    material::{MaterialRef, Solid},
    nodes::{Element, ElementId, ElementKind},
    utils::geom_transformation::Transform,
};
use log::debug;
use std::{
    cell::RefCell,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

mod sequence;
mod transform_cache;

pub use sequence::Sequence;
pub use transform_cache::TransformCache;

static NEXT_SYSTEM_UID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone)]
struct Node {
    element: Element,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
}

/// Top-level container of an optical assembly.
///
/// The transform cache is filled lazily through shared references. Hence, a [`System`] must not be shared between
/// threads.
#[derive(Debug)]
pub struct System {
    uid: u64,
    nodes: Vec<Option<Node>>,
    roots: Vec<ElementId>,
    cache: RefCell<TransformCache>,
    entrance_pupil: Option<ElementId>,
    environment: MaterialRef,
}
impl Default for System {
    fn default() -> Self {
        Self {
            uid: NEXT_SYSTEM_UID.fetch_add(1, Ordering::Relaxed),
            nodes: Vec::new(),
            roots: Vec::new(),
            cache: RefCell::new(TransformCache::new()),
            entrance_pupil: None,
            environment: Arc::new(Solid::air()),
        }
    }
}
impl System {
    /// Creates a new (empty) [`System`] surrounded by air.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
    /// Returns the unique identity of this [`System`].
    #[must_use]
    pub const fn uid(&self) -> u64 {
        self.uid
    }
    fn insert(&mut self, element: Element, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.nodes.len());
        debug!("add {} '{}' as {id}", element.kind().name(), element.name());
        self.nodes.push(Some(Node {
            element,
            parent,
            children: Vec::new(),
        }));
        self.cache.borrow_mut().grow(self.nodes.len());
        id
    }
    /// Add an element to the root of this [`System`] and return its id.
    pub fn add(&mut self, element: Element) -> ElementId {
        let id = self.insert(element, None);
        self.roots.push(id);
        id
    }
    /// Add an element to the given group and return its id.
    ///
    /// # Errors
    ///
    /// This function will return an error if `group` does not exist or is not a group.
    pub fn add_to(&mut self, group: ElementId, element: Element) -> OptResult<ElementId> {
        if !matches!(self.element(group)?.kind(), ElementKind::Group) {
            return Err(OptError::System(format!(
                "{group} is not a group and cannot contain elements"
            )));
        }
        let id = self.insert(element, Some(group));
        self.node_mut(group)?.children.push(id);
        Ok(id)
    }
    /// Remove an element (and, for groups, all contained elements) from this [`System`].
    ///
    /// The ids of all removed elements become invalid and are never reused. Returns the removed element.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist.
    pub fn remove(&mut self, id: ElementId) -> OptResult<Element> {
        let subtree = self.subtree(id)?;
        match self.node(id)?.parent {
            Some(parent) => self.node_mut(parent)?.children.retain(|c| *c != id),
            None => self.roots.retain(|c| *c != id),
        }
        let mut cache = self.cache.borrow_mut();
        let mut removed = None;
        for sub_id in subtree {
            cache.invalidate(sub_id);
            if self.entrance_pupil == Some(sub_id) {
                self.entrance_pupil = None;
            }
            let node = self.nodes[sub_id.0].take();
            if sub_id == id {
                removed = node;
            }
        }
        debug!("removed {id}");
        removed
            .map(|n| n.element)
            .ok_or_else(|| OptError::System(format!("{id} does not exist")))
    }
    fn node(&self, id: ElementId) -> OptResult<&Node> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or_else(|| OptError::System(format!("{id} does not exist")))
    }
    fn node_mut(&mut self, id: ElementId) -> OptResult<&mut Node> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| OptError::System(format!("{id} does not exist")))
    }
    /// Returns the given element and all its descendants.
    fn subtree(&self, id: ElementId) -> OptResult<Vec<ElementId>> {
        let mut ids = vec![id];
        let mut i = 0;
        while i < ids.len() {
            ids.extend_from_slice(&self.node(ids[i])?.children);
            i += 1;
        }
        Ok(ids)
    }
    /// Returns a reference to the given element.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist.
    pub fn element(&self, id: ElementId) -> OptResult<&Element> {
        Ok(&self.node(id)?.element)
    }
    /// Returns a mutable reference to the given element.
    ///
    /// The placement of an element must be changed using [`System::set_transform`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist.
    pub fn element_mut(&mut self, id: ElementId) -> OptResult<&mut Element> {
        Ok(&mut self.node_mut(id)?.element)
    }
    /// Returns the container of the given element (`None` for elements at the system root).
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist.
    pub fn parent(&self, id: ElementId) -> OptResult<Option<ElementId>> {
        Ok(self.node(id)?.parent)
    }
    /// Returns the elements contained in the given group.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist.
    pub fn children(&self, id: ElementId) -> OptResult<&[ElementId]> {
        Ok(&self.node(id)?.children)
    }
    /// Returns the elements at the root of this [`System`].
    #[must_use]
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }
    /// Change the placement of an element relative to its container.
    ///
    /// All cached transforms of the element and its descendants are flushed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist.
    pub fn set_transform(&mut self, id: ElementId, transform: Transform) -> OptResult<()> {
        self.node_mut(id)?.element.set_transform(transform);
        let subtree = self.subtree(id)?;
        let mut cache = self.cache.borrow_mut();
        for sub_id in subtree {
            cache.invalidate(sub_id);
        }
        Ok(())
    }
    /// Returns the transform from the local frame of the given element into global coordinates.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist.
    pub fn transform_to_global(&self, id: ElementId) -> OptResult<Transform> {
        if let Some(t) = self.cache.borrow().global(id) {
            return Ok(t);
        }
        let node = self.node(id)?;
        let global = match node.parent {
            Some(parent) => node.element.transform().then(&self.transform_to_global(parent)?),
            None => *node.element.transform(),
        };
        self.cache.borrow_mut().insert_global(id, global);
        Ok(global)
    }
    /// Returns the transform from global coordinates into the local frame of the given element.
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist.
    pub fn transform_from_global(&self, id: ElementId) -> OptResult<Transform> {
        Ok(self.transform_to_global(id)?.inverse())
    }
    /// Returns the transform from the local frame of `from` into the local frame of `to`.
    ///
    /// # Errors
    ///
    /// This function will return an error if one of the elements does not exist.
    pub fn transform(&self, from: ElementId, to: ElementId) -> OptResult<Transform> {
        if let Some(t) = self.cache.borrow().get(from, to) {
            return Ok(t);
        }
        let t = self
            .transform_to_global(from)?
            .then(&self.transform_from_global(to)?);
        self.cache.borrow_mut().insert(from, to, t);
        Ok(t)
    }
    /// Returns a copy of the current transform cache.
    #[must_use]
    pub fn cache(&self) -> TransformCache {
        self.cache.borrow().clone()
    }
    /// Explicitly set the entrance pupil of this [`System`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the element does not exist or has no aperture.
    pub fn set_entrance_pupil(&mut self, id: ElementId) -> OptResult<()> {
        if self.element(id)?.kind().aperture().is_none() {
            return Err(OptError::Config(format!(
                "{id} has no aperture and cannot be used as entrance pupil"
            )));
        }
        self.entrance_pupil = Some(id);
        Ok(())
    }
    /// Returns the entrance pupil of this [`System`].
    ///
    /// If no entrance pupil has been set explicitly, the first enabled stop is used.
    ///
    /// # Errors
    ///
    /// This function will return an error if no entrance pupil is set and the system contains no enabled stop.
    pub fn entrance_pupil(&self) -> OptResult<ElementId> {
        if let Some(id) = self.entrance_pupil {
            return Ok(id);
        }
        self.iter()
            .find(|(_, e)| e.is_enabled() && matches!(e.kind(), ElementKind::Stop(_)))
            .map(|(id, _)| id)
            .ok_or_else(|| OptError::Config("system has no entrance pupil".into()))
    }
    /// Returns the material surrounding all elements of this [`System`].
    #[must_use]
    pub const fn environment(&self) -> &MaterialRef {
        &self.environment
    }
    /// Set the material surrounding all elements of this [`System`].
    pub fn set_environment(&mut self, material: MaterialRef) {
        self.environment = material;
    }
    /// Returns the ids of all elements in id order.
    #[must_use]
    pub fn ids(&self) -> Vec<ElementId> {
        self.iter().map(|(id, _)| id).collect()
    }
    /// Returns an iterator over all elements in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ElementId, &Element)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (ElementId(i), &n.element)))
    }
    /// Returns the number of elements of this [`System`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.iter().flatten().count()
    }
    /// Returns `true` if this [`System`] contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
