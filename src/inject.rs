//! Injection slots for field injection
//!
//! A component declares each injectable field as an [`Inject<T>`]. The slot
//! starts empty, is filled once during the field injection phase, and holds a
//! non-owning reference: the instance pool keeps ownership of every singleton.

use crate::provider::identifier_of;
use crate::{DiError, Result};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Weak};

/// A write-once, non-owning reference to another pooled component.
///
/// `T` is either a concrete component type or a capability (`dyn Trait`).
///
/// The container owns every component, so keep the [`Container`](crate::Container)
/// alive for as long as injected fields are used. After it is dropped the
/// slot still reports [`Inject::is_injected`], but [`Inject::get`] returns
/// `None` and [`Inject::resolve`] fails with [`DiError::ContainerDropped`].
///
/// # Examples
///
/// ```rust
/// use autowire::Inject;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct Frontend {
///     greeter: Inject<dyn Greeter>,
/// }
///
/// let frontend = Frontend::default();
/// assert!(!frontend.greeter.is_injected());
/// assert!(frontend.greeter.get().is_none());
/// ```
pub struct Inject<T: ?Sized> {
    target: OnceCell<Weak<T>>,
}

impl<T: ?Sized> Inject<T> {
    /// Create an empty slot
    #[inline]
    pub const fn new() -> Self {
        Self {
            target: OnceCell::new(),
        }
    }

    /// The injected component, if the slot is filled and the pool is alive
    #[inline]
    pub fn get(&self) -> Option<Arc<T>> {
        self.target.get().and_then(|target| target.upgrade())
    }

    /// Like [`Inject::get`], reporting why nothing is available.
    ///
    /// Fails with [`DiError::NotInjected`] while the slot is empty and with
    /// [`DiError::ContainerDropped`] once the container that filled it is gone.
    pub fn resolve(&self) -> Result<Arc<T>> {
        let type_name = identifier_of::<T>();
        self.target
            .get()
            .ok_or(DiError::NotInjected { type_name })?
            .upgrade()
            .ok_or(DiError::ContainerDropped { type_name })
    }

    /// Whether the injector has filled this slot
    #[inline]
    pub fn is_injected(&self) -> bool {
        self.target.get().is_some()
    }

    /// Fill the slot. Returns false when it was already filled.
    pub(crate) fn set(&self, target: &Arc<T>) -> bool {
        self.target.set(Arc::downgrade(target)).is_ok()
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> std::fmt::Debug for Inject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inject")
            .field("type", &identifier_of::<T>())
            .field("injected", &self.is_injected())
            .finish()
    }
}
