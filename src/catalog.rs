//! The ordered list of descriptors handed to the bootstrap.
//!
//! Order matters: construction is a single pass, so a component's
//! constructor parameters must appear earlier in the catalog.

use crate::descriptor::{ComponentDescriptor, Describe};

/// Ordered component descriptors.
///
/// # Examples
///
/// ```rust
/// use autowire::{Catalog, ComponentDescriptor};
///
/// #[derive(Default)]
/// struct Clock;
///
/// let catalog = Catalog::new().with(ComponentDescriptor::component(Clock::default));
/// assert_eq!(catalog.len(), 1);
/// assert!(catalog.get("Clock").is_some());
/// ```
#[derive(Debug, Default)]
pub struct Catalog {
    components: Vec<ComponentDescriptor>,
}

impl Catalog {
    /// Create an empty catalog
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-allocated capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            components: Vec::with_capacity(capacity),
        }
    }

    /// Append a descriptor (builder style)
    #[inline]
    pub fn with(mut self, descriptor: impl Into<ComponentDescriptor>) -> Self {
        self.push(descriptor);
        self
    }

    /// Append the descriptor of a [`Describe`] type (builder style)
    #[inline]
    pub fn with_component<T: Describe>(self) -> Self {
        self.with(T::descriptor())
    }

    /// Append a descriptor
    #[inline]
    pub fn push(&mut self, descriptor: impl Into<ComponentDescriptor>) {
        self.components.push(descriptor.into());
    }

    /// First descriptor registered under an identifier
    pub fn get(&self, identifier: &str) -> Option<&ComponentDescriptor> {
        self.components
            .iter()
            .find(|descriptor| descriptor.identifier() == identifier)
    }

    /// Descriptors in catalog order
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, ComponentDescriptor> {
        self.components.iter()
    }

    /// Number of descriptors
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl FromIterator<ComponentDescriptor> for Catalog {
    fn from_iter<I: IntoIterator<Item = ComponentDescriptor>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}

impl Extend<ComponentDescriptor> for Catalog {
    fn extend<I: IntoIterator<Item = ComponentDescriptor>>(&mut self, iter: I) {
        self.components.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a ComponentDescriptor;
    type IntoIter = std::slice::Iter<'a, ComponentDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
