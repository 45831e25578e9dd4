// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Runtime type descriptions handed in by the plan compiler.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one runtime type description.
///
/// Tokens are allocated once per [`TypeInfo`] and never reused, so they are
/// safe as keys for process-lifetime caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeToken(u64);

impl TypeToken {
    fn next() -> Self {
        Self(NEXT_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw token value (stable for the process lifetime).
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Description of one runtime type: simple name, namespace, defining unit
/// ("assembly" in the wire headers), generic arguments and the declaring
/// type for nested types.
///
/// Open generic parameters carry a name but no namespace or assembly; they
/// have no resolvable full name.
#[derive(Debug)]
pub struct TypeInfo {
    token: TypeToken,
    name: Arc<str>,
    namespace: Option<Arc<str>>,
    assembly: Option<Arc<str>>,
    generic_args: Vec<Arc<TypeInfo>>,
    declaring: Option<Arc<TypeInfo>>,
}

impl TypeInfo {
    /// Create a plain (non-generic, non-nested) type description.
    pub fn new(
        assembly: impl Into<Arc<str>>,
        namespace: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            token: TypeToken::next(),
            name: name.into(),
            namespace: Some(namespace.into()),
            assembly: Some(assembly.into()),
            generic_args: Vec::new(),
            declaring: None,
        })
    }

    /// Create a closed generic type description.
    pub fn generic(
        assembly: impl Into<Arc<str>>,
        namespace: impl Into<Arc<str>>,
        name: impl Into<Arc<str>>,
        args: Vec<Arc<TypeInfo>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            token: TypeToken::next(),
            name: name.into(),
            namespace: Some(namespace.into()),
            assembly: Some(assembly.into()),
            generic_args: args,
            declaring: None,
        })
    }

    /// Create a type nested inside `declaring`, inheriting its namespace
    /// and assembly.
    pub fn nested(declaring: &Arc<TypeInfo>, name: impl Into<Arc<str>>) -> Arc<Self> {
        Arc::new(Self {
            token: TypeToken::next(),
            name: name.into(),
            namespace: declaring.namespace.clone(),
            assembly: declaring.assembly.clone(),
            generic_args: Vec::new(),
            declaring: Some(declaring.clone()),
        })
    }

    /// Create an open generic parameter; it has no resolvable full name.
    pub fn parameter(name: impl Into<Arc<str>>) -> Arc<Self> {
        Arc::new(Self {
            token: TypeToken::next(),
            name: name.into(),
            namespace: None,
            assembly: None,
            generic_args: Vec::new(),
            declaring: None,
        })
    }

    /// Start a fluent builder.
    pub fn builder(name: impl Into<Arc<str>>) -> TypeInfoBuilder {
        TypeInfoBuilder::new(name)
    }

    /// Identity token.
    pub fn token(&self) -> TypeToken {
        self.token
    }

    /// Simple type name (no namespace, no generic suffix).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace, if the type has a resolvable full name.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Defining unit short name, if any.
    pub fn assembly(&self) -> Option<&str> {
        self.assembly.as_deref()
    }

    /// Generic arguments (empty for non-generic types).
    pub fn generic_args(&self) -> &[Arc<TypeInfo>] {
        &self.generic_args
    }

    /// Declaring type for nested types.
    pub fn declaring(&self) -> Option<&Arc<TypeInfo>> {
        self.declaring.as_ref()
    }

    /// Check if this is a closed generic type.
    pub fn is_generic(&self) -> bool {
        !self.generic_args.is_empty()
    }

    /// Check if a full name can be derived at all.
    pub fn has_full_name(&self) -> bool {
        self.namespace.is_some()
    }
}

/// Equality is identity: two descriptions are the same type only if they
/// are the same description.
impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.token == other.token
    }
}

impl Eq for TypeInfo {}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.token.hash(state);
    }
}

/// Fluent builder for [`TypeInfo`].
#[derive(Debug)]
pub struct TypeInfoBuilder {
    name: Arc<str>,
    namespace: Option<Arc<str>>,
    assembly: Option<Arc<str>>,
    generic_args: Vec<Arc<TypeInfo>>,
    declaring: Option<Arc<TypeInfo>>,
}

impl TypeInfoBuilder {
    /// Create a builder for a type with the given simple name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            assembly: None,
            generic_args: Vec::new(),
            declaring: None,
        }
    }

    /// Set the namespace.
    pub fn namespace(mut self, namespace: impl Into<Arc<str>>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Set the defining unit short name.
    pub fn assembly(mut self, assembly: impl Into<Arc<str>>) -> Self {
        self.assembly = Some(assembly.into());
        self
    }

    /// Append a generic argument.
    pub fn generic_arg(mut self, arg: Arc<TypeInfo>) -> Self {
        self.generic_args.push(arg);
        self
    }

    /// Nest inside `declaring`; namespace and assembly are inherited unless
    /// set explicitly.
    pub fn nested_in(mut self, declaring: &Arc<TypeInfo>) -> Self {
        if self.namespace.is_none() {
            self.namespace = declaring.namespace.clone();
        }
        if self.assembly.is_none() {
            self.assembly = declaring.assembly.clone();
        }
        self.declaring = Some(declaring.clone());
        self
    }

    /// Build the immutable description.
    pub fn build(self) -> Arc<TypeInfo> {
        Arc::new(TypeInfo {
            token: TypeToken::next(),
            name: self.name,
            namespace: self.namespace,
            assembly: self.assembly,
            generic_args: self.generic_args,
            declaring: self.declaring,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_are_unique() {
        let a = TypeInfo::new("demo_models", "demo.models", "Person");
        let b = TypeInfo::new("demo_models", "demo.models", "Person");
        assert_ne!(a.token(), b.token());
        assert_ne!(a, b); // identity, not structure
    }

    #[test]
    fn test_nested_inherits_namespace_and_assembly() {
        let outer = TypeInfo::new("demo_models", "demo.models", "Order");
        let inner = TypeInfo::nested(&outer, "Line");

        assert_eq!(inner.namespace(), Some("demo.models"));
        assert_eq!(inner.assembly(), Some("demo_models"));
        assert_eq!(inner.declaring().map(|d| d.name()), Some("Order"));
    }

    #[test]
    fn test_parameter_has_no_full_name() {
        let param = TypeInfo::parameter("T");
        assert!(!param.has_full_name());
        assert!(param.namespace().is_none());
        assert!(param.assembly().is_none());
    }

    #[test]
    fn test_builder() {
        let inner = TypeInfo::new("core", "core", "i32");
        let ty = TypeInfo::builder("Vec")
            .namespace("alloc.vec")
            .assembly("alloc")
            .generic_arg(inner)
            .build();

        assert!(ty.is_generic());
        assert_eq!(ty.generic_args().len(), 1);
        assert_eq!(ty.namespace(), Some("alloc.vec"));
    }
}
