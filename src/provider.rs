//! Component identity and constructor parameters
//!
//! Components are identified by the simple name of their Rust type, and
//! constructor parameters are resolved from the instance pool by that same
//! name. This module holds both halves: [`identifier_of`] and the
//! [`Dependency`]/[`Parameters`] traits a designated constructor is declared
//! with.

use crate::config::ResolutionPolicy;
use crate::{DiError, Result};
use std::any::Any;
use std::sync::Arc;

/// Type-erased pooled instance
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

/// Marker trait for types that can live in the instance pool.
///
/// This is automatically implemented for all types that are `Send + Sync + 'static`.
/// You never need to implement this manually.
pub trait Injectable: Send + Sync + 'static {}

// Blanket implementation - everything that's Send + Sync + 'static is Injectable
impl<T: Send + Sync + 'static> Injectable for T {}

/// Simple name of a type: the last path segment without `dyn`, extra bounds
/// or generic arguments.
///
/// ```rust
/// use autowire::identifier_of;
///
/// trait Greeter: Send + Sync {}
/// struct English;
///
/// assert_eq!(identifier_of::<English>(), "English");
/// assert_eq!(identifier_of::<dyn Greeter>(), "Greeter");
/// assert_eq!(identifier_of::<Vec<u8>>(), "Vec");
/// ```
pub fn identifier_of<T: ?Sized>() -> &'static str {
    simple_name(std::any::type_name::<T>())
}

fn simple_name(full: &'static str) -> &'static str {
    let name = full.strip_prefix("dyn ").unwrap_or(full);
    let name = name.split(" + ").next().unwrap_or(name);
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name)
}

// =============================================================================
// Constructor Arguments
// =============================================================================

/// One resolved constructor parameter, handed to [`Dependency::from_argument`].
pub struct Argument {
    pub(crate) component: &'static str,
    pub(crate) identifier: &'static str,
    pub(crate) position: usize,
    pub(crate) instance: Option<Instance>,
    pub(crate) policy: ResolutionPolicy,
}

impl Argument {
    /// Identifier of the component being constructed
    pub fn component(&self) -> &'static str {
        self.component
    }

    /// Identifier the parameter was looked up by
    pub fn identifier(&self) -> &'static str {
        self.identifier
    }

    /// Zero-based parameter position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Policy in force for this bootstrap
    pub fn policy(&self) -> ResolutionPolicy {
        self.policy
    }

    /// Whether the pool had an instance under [`Argument::identifier`]
    pub fn is_present(&self) -> bool {
        self.instance.is_some()
    }

    /// Downcast the pooled instance, if any.
    ///
    /// An instance of a different type under the same identifier is an error.
    pub fn downcast<T: Injectable>(self) -> Result<Option<Arc<T>>> {
        match self.instance {
            None => Ok(None),
            Some(instance) => instance
                .downcast::<T>()
                .map(Some)
                .map_err(|_| DiError::mismatch(self.identifier, std::any::type_name::<T>())),
        }
    }
}

impl std::fmt::Debug for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argument")
            .field("component", &self.component)
            .field("identifier", &self.identifier)
            .field("position", &self.position)
            .field("present", &self.is_present())
            .finish()
    }
}

/// A single constructor parameter type.
///
/// Implemented for:
/// - `Arc<T>` - required; an absent instance is always an error
/// - `Option<Arc<T>>` - nullable; `None` under [`ResolutionPolicy::Lenient`]
pub trait Dependency: Sized + 'static {
    /// Identifier the parameter is looked up by in the instance pool
    fn identifier() -> &'static str;

    /// Build the parameter value from the pool lookup
    fn from_argument(argument: Argument) -> Result<Self>;
}

impl<T: Injectable> Dependency for Arc<T> {
    #[inline]
    fn identifier() -> &'static str {
        identifier_of::<T>()
    }

    fn from_argument(argument: Argument) -> Result<Self> {
        let component = argument.component;
        argument
            .downcast::<T>()?
            .ok_or_else(|| DiError::unresolved(component, identifier_of::<T>()))
    }
}

impl<T: Injectable> Dependency for Option<Arc<T>> {
    #[inline]
    fn identifier() -> &'static str {
        identifier_of::<T>()
    }

    fn from_argument(argument: Argument) -> Result<Self> {
        match argument.policy {
            ResolutionPolicy::Strict => Arc::<T>::from_argument(argument).map(Some),
            ResolutionPolicy::Lenient => argument.downcast::<T>(),
        }
    }
}

/// The ordered parameter list of a designated constructor.
///
/// Implemented for `()` and tuples of up to eight [`Dependency`] types.
pub trait Parameters: Sized + 'static {
    /// Identifiers of every parameter, in order
    fn identifiers() -> Vec<&'static str>;

    /// Build the parameter tuple from the resolved arguments
    fn from_arguments(arguments: Vec<Argument>) -> Result<Self>;
}

impl Parameters for () {
    #[inline]
    fn identifiers() -> Vec<&'static str> {
        Vec::new()
    }

    #[inline]
    fn from_arguments(_arguments: Vec<Argument>) -> Result<Self> {
        Ok(())
    }
}

fn next_argument(arguments: &mut std::vec::IntoIter<Argument>) -> Result<Argument> {
    arguments
        .next()
        .ok_or_else(|| DiError::Internal("constructor received too few arguments".into()))
}

macro_rules! impl_parameters_tuple {
    ($($T:ident),+) => {
        impl<$($T: Dependency),+> Parameters for ($($T,)+) {
            #[inline]
            fn identifiers() -> Vec<&'static str> {
                vec![$($T::identifier()),+]
            }

            fn from_arguments(arguments: Vec<Argument>) -> Result<Self> {
                let mut arguments = arguments.into_iter();
                Ok(($($T::from_argument(next_argument(&mut arguments)?)?,)+))
            }
        }
    };
}

impl_parameters_tuple!(A);
impl_parameters_tuple!(A, B);
impl_parameters_tuple!(A, B, C);
impl_parameters_tuple!(A, B, C, D);
impl_parameters_tuple!(A, B, C, D, E);
impl_parameters_tuple!(A, B, C, D, E, F);
impl_parameters_tuple!(A, B, C, D, E, F, G);
impl_parameters_tuple!(A, B, C, D, E, F, G, H);

/// A component with a designated injectable constructor.
///
/// # Example
///
/// ```rust
/// use autowire::Construct;
/// use std::sync::Arc;
///
/// struct Config;
///
/// struct Database {
///     config: Arc<Config>,
/// }
///
/// impl Construct for Database {
///     type Parameters = (Arc<Config>,);
///
///     fn construct((config,): Self::Parameters) -> Self {
///         Database { config }
///     }
/// }
/// ```
pub trait Construct: Injectable + Sized {
    /// Constructor parameters, resolved by identifier from the pool
    type Parameters: Parameters;

    /// Build the component from its resolved parameters
    fn construct(parameters: Self::Parameters) -> Self;
}
