//! Bootstrap configuration

/// What to do when a dependency cannot be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResolutionPolicy {
    /// Absent parameters, absent field targets and unmatched qualifiers
    /// abort the bootstrap
    #[default]
    Strict,

    /// Absent field targets and unmatched qualifiers leave the field unset;
    /// `Option<Arc<T>>` constructor parameters receive `None`
    Lenient,
}

impl ResolutionPolicy {
    /// Returns true for [`ResolutionPolicy::Lenient`]
    #[inline]
    pub fn is_lenient(self) -> bool {
        self == Self::Lenient
    }

    #[cfg(any(feature = "logging", test))]
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

/// Settings applied to a single bootstrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapConfig {
    /// Policy for unresolved dependencies
    pub policy: ResolutionPolicy,
}

impl BootstrapConfig {
    /// Create a config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resolution policy
    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shorthand for `with_policy(ResolutionPolicy::Lenient)`
    pub fn lenient(self) -> Self {
        self.with_policy(ResolutionPolicy::Lenient)
    }
}
