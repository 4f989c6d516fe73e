//! Component descriptors
//!
//! A [`ComponentDescriptor`] is the explicit registration record for one
//! component: its identifier, the capabilities it implements, how it is
//! constructed and which of its fields are injected. Descriptors are built
//! through the typed [`DescriptorBuilder`], which captures the upcasts and
//! field accessors needed to wire the component without runtime reflection.
//!
//! # Example
//!
//! ```rust
//! use autowire::{ComponentDescriptor, Inject};
//! use std::sync::Arc;
//!
//! trait Store: Send + Sync {}
//!
//! #[derive(Default)]
//! struct MemoryStore;
//! impl Store for MemoryStore {}
//!
//! #[derive(Default)]
//! struct Handler {
//!     store: Inject<dyn Store>,
//! }
//!
//! let store = ComponentDescriptor::component(MemoryStore::default)
//!     .implements::<dyn Store>(|store| store)
//!     .build();
//!
//! let handler = ComponentDescriptor::component(Handler::default)
//!     .field::<dyn Store>("store", |handler| &handler.store)
//!     .build();
//!
//! assert_eq!(store.capabilities(), ["Store"]);
//! assert_eq!(handler.fields()[0].type_name(), "Store");
//! ```

use crate::inject::Inject;
use crate::provider::{identifier_of, Argument, Instance, Parameters};
use crate::{DiError, Injectable};
use ahash::RandomState;
use std::any::Any;
use std::collections::HashMap;
use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;

/// A pooled instance seen through one of its types, boxed as `Arc<C>`
pub(crate) type View = Box<dyn Any>;

/// Produces the `Arc<C>` view of a pooled instance for one capability
pub(crate) type Upcast = Arc<dyn Fn(&Instance) -> Option<View> + Send + Sync>;

/// Views of a component keyed by type identifier (its own and each capability)
pub(crate) type ViewTable = HashMap<&'static str, Upcast, RandomState>;

/// Type-erased constructor; the default construction ignores its arguments
pub(crate) type Constructor =
    Arc<dyn Fn(Vec<Argument>) -> std::result::Result<Instance, ConstructionError> + Send + Sync>;

type FieldSetter = Arc<dyn Fn(&Instance, View) -> std::result::Result<(), SetError> + Send + Sync>;

fn constructor_of<F>(constructor: F) -> Constructor
where
    F: Fn(Vec<Argument>) -> std::result::Result<Instance, ConstructionError> + Send + Sync + 'static,
{
    Arc::new(constructor)
}

fn view_of<F>(view: F) -> Upcast
where
    F: Fn(&Instance) -> Option<View> + Send + Sync + 'static,
{
    Arc::new(view)
}

fn setter_of<F>(setter: F) -> FieldSetter
where
    F: Fn(&Instance, View) -> std::result::Result<(), SetError> + Send + Sync + 'static,
{
    Arc::new(setter)
}

/// Why a constructor did not produce an instance
pub(crate) enum ConstructionError {
    /// A parameter could not be resolved
    Dependency(DiError),
    /// The constructor itself failed
    Failed(String),
}

impl ConstructionError {
    pub(crate) fn into_error(self, component: &'static str) -> DiError {
        match self {
            Self::Dependency(err) => err,
            Self::Failed(reason) => DiError::Instantiation { component, reason },
        }
    }
}

/// Why a field setter rejected a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SetError {
    /// The owning instance is not the descriptor's component type
    Owner,
    /// The resolved value is not an `Arc` of the field's type
    Value,
    /// The slot was already filled
    Occupied,
}

/// How a marked component is instantiated
pub(crate) enum Construction {
    /// Zero-argument construction
    Default(Constructor),
    /// Designated constructor with ordered parameter identifiers
    Injected {
        parameters: Vec<&'static str>,
        constructor: Constructor,
    },
}

// =============================================================================
// Field Descriptor
// =============================================================================

/// An injectable field of a component.
#[derive(Clone)]
pub struct FieldDescriptor {
    name: &'static str,
    type_name: &'static str,
    qualifier: Option<&'static str>,
    setter: FieldSetter,
}

impl FieldDescriptor {
    /// Field name, for diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identifier of the field's declared type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Qualifier choosing among several implementors
    pub fn qualifier(&self) -> Option<&'static str> {
        self.qualifier
    }

    pub(crate) fn set(&self, owner: &Instance, value: View) -> std::result::Result<(), SetError> {
        (self.setter)(owner, value)
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("qualifier", &self.qualifier)
            .finish()
    }
}

// =============================================================================
// Component Descriptor
// =============================================================================

/// Registration record for one component.
pub struct ComponentDescriptor {
    identifier: &'static str,
    capabilities: Vec<&'static str>,
    construction: Option<Construction>,
    fields: Vec<FieldDescriptor>,
    views: ViewTable,
}

impl ComponentDescriptor {
    /// A component built by a zero-argument factory.
    #[inline]
    pub fn component<T, D>(factory: D) -> DescriptorBuilder<T>
    where
        T: Injectable,
        D: Fn() -> T + Send + Sync + 'static,
    {
        DescriptorBuilder::new(Some(Construction::Default(constructor_of(move |_| {
            Ok(Arc::new(factory()) as Instance)
        }))))
    }

    /// A component built by a fallible zero-argument factory.
    ///
    /// A factory error aborts the bootstrap with [`DiError::Instantiation`].
    pub fn try_component<T, D, E>(factory: D) -> DescriptorBuilder<T>
    where
        T: Injectable,
        D: Fn() -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Display,
    {
        DescriptorBuilder::new(Some(Construction::Default(constructor_of(move |_| {
            factory()
                .map(|component| Arc::new(component) as Instance)
                .map_err(|err| ConstructionError::Failed(err.to_string()))
        }))))
    }

    /// A component with a designated injectable constructor.
    ///
    /// Each parameter is looked up in the instance pool by its type's
    /// identifier when the component is constructed.
    pub fn constructed<T, P, C>(constructor: C) -> DescriptorBuilder<T>
    where
        T: Injectable,
        P: Parameters,
        C: Fn(P) -> T + Send + Sync + 'static,
    {
        Self::try_constructed(move |parameters: P| {
            Ok::<_, std::convert::Infallible>(constructor(parameters))
        })
    }

    /// A component with a fallible designated constructor.
    pub fn try_constructed<T, P, C, E>(constructor: C) -> DescriptorBuilder<T>
    where
        T: Injectable,
        P: Parameters,
        C: Fn(P) -> std::result::Result<T, E> + Send + Sync + 'static,
        E: Display,
    {
        DescriptorBuilder::new(Some(Construction::Injected {
            parameters: P::identifiers(),
            constructor: constructor_of(move |arguments| {
                let parameters = P::from_arguments(arguments).map_err(ConstructionError::Dependency)?;
                constructor(parameters)
                    .map(|component| Arc::new(component) as Instance)
                    .map_err(|err| ConstructionError::Failed(err.to_string()))
            }),
        }))
    }

    /// A type that is indexed but never instantiated or injected.
    #[inline]
    pub fn scanned<T: Injectable>() -> DescriptorBuilder<T> {
        DescriptorBuilder::new(None)
    }

    /// The component's identifier
    #[inline]
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Capability identifiers, in declaration order
    #[inline]
    pub fn capabilities(&self) -> &[&'static str] {
        &self.capabilities
    }

    /// Whether the component is instantiated during bootstrap
    #[inline]
    pub fn is_component(&self) -> bool {
        self.construction.is_some()
    }

    /// Parameter identifiers of the designated constructor, if there is one
    pub fn constructor_parameters(&self) -> Option<&[&'static str]> {
        match &self.construction {
            Some(Construction::Injected { parameters, .. }) => Some(parameters),
            _ => None,
        }
    }

    /// Injectable fields, in declaration order
    #[inline]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub(crate) fn construction(&self) -> Option<&Construction> {
        self.construction.as_ref()
    }

    pub(crate) fn views(&self) -> &ViewTable {
        &self.views
    }
}

impl std::fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("identifier", &self.identifier)
            .field("capabilities", &self.capabilities)
            .field("component", &self.is_component())
            .field("constructor", &self.constructor_parameters())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Types that can describe themselves, usually via `#[derive(Component)]`.
pub trait Describe: Injectable + Sized {
    /// The descriptor registered for this type
    fn descriptor() -> ComponentDescriptor;
}

// =============================================================================
// Builder
// =============================================================================

/// Typed builder for a [`ComponentDescriptor`].
///
/// The type parameter ties upcasts and field accessors to the component type.
pub struct DescriptorBuilder<T> {
    identifier: &'static str,
    capabilities: Vec<(&'static str, Upcast)>,
    construction: Option<Construction>,
    fields: Vec<FieldDescriptor>,
    _component: PhantomData<fn() -> T>,
}

impl<T: Injectable> DescriptorBuilder<T> {
    fn new(construction: Option<Construction>) -> Self {
        Self {
            identifier: identifier_of::<T>(),
            capabilities: Vec::new(),
            construction,
            fields: Vec::new(),
            _component: PhantomData,
        }
    }

    /// Register under an explicit identifier instead of the type's simple name
    pub fn named(mut self, identifier: &'static str) -> Self {
        self.identifier = identifier;
        self
    }

    /// Declare that the component implements capability `C`.
    ///
    /// `upcast` is normally the identity closure `|component| component`,
    /// which coerces `Arc<T>` into `Arc<dyn Capability>`.
    pub fn implements<C>(mut self, upcast: fn(Arc<T>) -> Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let view = view_of(move |instance| {
            Arc::clone(instance)
                .downcast::<T>()
                .ok()
                .map(|component| Box::new(upcast(component)) as View)
        });
        self.capabilities.push((identifier_of::<C>(), view));
        self
    }

    /// Declare an injectable field of type `F`.
    pub fn field<F>(self, name: &'static str, accessor: fn(&T) -> &Inject<F>) -> Self
    where
        F: ?Sized + Send + Sync + 'static,
    {
        self.push_field(name, None, accessor)
    }

    /// Declare an injectable field with a qualifier.
    pub fn qualified_field<F>(
        self,
        name: &'static str,
        qualifier: &'static str,
        accessor: fn(&T) -> &Inject<F>,
    ) -> Self
    where
        F: ?Sized + Send + Sync + 'static,
    {
        self.push_field(name, Some(qualifier), accessor)
    }

    fn push_field<F>(
        mut self,
        name: &'static str,
        qualifier: Option<&'static str>,
        accessor: fn(&T) -> &Inject<F>,
    ) -> Self
    where
        F: ?Sized + Send + Sync + 'static,
    {
        let setter = setter_of(move |owner, value| {
            let owner = (**owner).downcast_ref::<T>().ok_or(SetError::Owner)?;
            let value = value.downcast::<Arc<F>>().map_err(|_| SetError::Value)?;
            if accessor(owner).set(&value) {
                Ok(())
            } else {
                Err(SetError::Occupied)
            }
        });

        self.fields.push(FieldDescriptor {
            name,
            type_name: identifier_of::<F>(),
            qualifier,
            setter,
        });
        self
    }

    /// Finish the descriptor
    pub fn build(self) -> ComponentDescriptor {
        let own = view_of(|instance| {
            Arc::clone(instance)
                .downcast::<T>()
                .ok()
                .map(|component| Box::new(component) as View)
        });

        let mut views = ViewTable::default();
        views.insert(self.identifier, own);

        let mut capabilities = Vec::with_capacity(self.capabilities.len());
        for (capability, view) in self.capabilities {
            capabilities.push(capability);
            views.entry(capability).or_insert(view);
        }

        ComponentDescriptor {
            identifier: self.identifier,
            capabilities,
            construction: self.construction,
            fields: self.fields,
            views,
        }
    }
}

impl<T: Injectable> From<DescriptorBuilder<T>> for ComponentDescriptor {
    fn from(builder: DescriptorBuilder<T>) -> Self {
        builder.build()
    }
}
