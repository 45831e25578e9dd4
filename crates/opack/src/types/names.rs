// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical type-name decomposition with a process-lifetime memo.
//!
//! Object headers on the wire carry an `(assembly, namespace, name)` tuple.
//! Deriving it walks the generic-argument graph, so the result is memoized
//! per [`TypeToken`]. Entries are pure derived data and are never
//! invalidated.

use crate::types::{TypeInfo, TypeToken};
use dashmap::DashMap;
use std::sync::Arc;

/// Defining units whose names are stripped from headers to keep them
/// compact. Decoders fall back to the local runtime for these.
pub const IGNORED_ASSEMBLIES: &[&str] = &["core", "alloc", "std"];

/// Canonical `(assembly, namespace, name)` decomposition of one type.
///
/// `assembly` is `None` for core-runtime types. Generic names compose as
/// `Outer[[Arg1],[Arg2]]`; nested names carry a `Declaring+Nested` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeNameTuple {
    pub assembly: Option<Arc<str>>,
    pub namespace: Arc<str>,
    pub name: Arc<str>,
}

/// Memoized resolver from runtime types to [`TypeNameTuple`]s.
///
/// The memo is a concurrent get-then-insert map: computing a tuple is
/// idempotent and side-effect-free, so two threads racing on first use may
/// both compute it and either result may win the insert. No locking beyond
/// the atomic insert is needed.
#[derive(Debug, Default)]
pub struct TypeNameResolver {
    tuples: DashMap<TypeToken, Option<Arc<TypeNameTuple>>>,
    flats: DashMap<TypeToken, Option<Arc<str>>>,
}

impl TypeNameResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the canonical tuple for `ty`.
    ///
    /// Returns `None` when no full name can be derived (open generic
    /// parameter anywhere in the argument graph); the caller decides
    /// whether that is fatal for the member being described.
    pub fn resolve(&self, ty: &Arc<TypeInfo>) -> Option<Arc<TypeNameTuple>> {
        if let Some(hit) = self.tuples.get(&ty.token()) {
            return hit.clone();
        }

        let computed = self.compute_tuple(ty);
        log::trace!(
            "[TypeNameResolver] resolved {} ({}) -> {:?}",
            ty.name(),
            ty.token(),
            computed.as_ref().map(|t| t.name.as_ref())
        );
        self.tuples.insert(ty.token(), computed.clone());
        computed
    }

    /// Flat single-string form: `namespace.Name` plus the generic suffix.
    ///
    /// Unlike the tuple form this does NOT apply the `Declaring+Nested`
    /// prefix and never carries an assembly component.
    pub fn flat_name(&self, ty: &Arc<TypeInfo>) -> Option<Arc<str>> {
        if let Some(hit) = self.flats.get(&ty.token()) {
            return hit.clone();
        }

        let computed = self.compute_flat(ty);
        self.flats.insert(ty.token(), computed.clone());
        computed
    }

    /// Number of memoized tuple entries (diagnostics only).
    pub fn memo_len(&self) -> usize {
        self.tuples.len()
    }

    fn compute_tuple(&self, ty: &Arc<TypeInfo>) -> Option<Arc<TypeNameTuple>> {
        let namespace = ty.namespace()?;

        let mut name = nested_chain(ty);
        if ty.is_generic() {
            let mut parts = Vec::with_capacity(ty.generic_args().len());
            for arg in ty.generic_args() {
                let tuple = self.resolve(arg)?;
                parts.push(render_argument(&tuple));
            }
            name = format!("{}[[{}]]", name, parts.join("],["));
        }

        Some(Arc::new(TypeNameTuple {
            assembly: header_assembly(ty),
            namespace: Arc::from(namespace),
            name: Arc::from(name.as_str()),
        }))
    }

    fn compute_flat(&self, ty: &Arc<TypeInfo>) -> Option<Arc<str>> {
        let namespace = ty.namespace()?;

        // Nested prefix deliberately skipped in the flat form.
        let mut name = ty.name().to_string();
        if ty.is_generic() {
            let mut parts = Vec::with_capacity(ty.generic_args().len());
            for arg in ty.generic_args() {
                parts.push(self.flat_name(arg)?.to_string());
            }
            name = format!("{}[[{}]]", name, parts.join("],["));
        }

        Some(Arc::from(format!("{}.{}", namespace, name).as_str()))
    }
}

/// `Declaring+Nested` prefix chain for the tuple form.
fn nested_chain(ty: &TypeInfo) -> String {
    match ty.declaring() {
        Some(declaring) => format!("{}+{}", nested_chain(declaring), ty.name()),
        None => ty.name().to_string(),
    }
}

/// Assembly component for a header; omitted for core-runtime units.
fn header_assembly(ty: &TypeInfo) -> Option<Arc<str>> {
    let assembly = ty.assembly()?;
    if IGNORED_ASSEMBLIES.contains(&assembly) {
        None
    } else {
        Some(Arc::from(assembly))
    }
}

/// Rendering of one generic argument inside `[[..]]`: the argument's full
/// name, with its assembly appended when the header would carry one.
fn render_argument(tuple: &TypeNameTuple) -> String {
    match &tuple.assembly {
        Some(assembly) => format!("{}.{}, {}", tuple.namespace, tuple.name, assembly),
        None => format!("{}.{}", tuple.namespace, tuple.name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_ty() -> Arc<TypeInfo> {
        TypeInfo::new("core", "core", "i32")
    }

    #[test]
    fn test_plain_type_resolves() {
        let resolver = TypeNameResolver::new();
        let ty = TypeInfo::new("demo_models", "demo.models", "Person");

        let tuple = resolver.resolve(&ty).expect("resolvable");
        assert_eq!(tuple.assembly.as_deref(), Some("demo_models"));
        assert_eq!(tuple.namespace.as_ref(), "demo.models");
        assert_eq!(tuple.name.as_ref(), "Person");
    }

    #[test]
    fn test_ignored_assembly_is_omitted() {
        let resolver = TypeNameResolver::new();
        let tuple = resolver.resolve(&int_ty()).expect("resolvable");
        assert!(tuple.assembly.is_none());
    }

    #[test]
    fn test_generic_composition() {
        let resolver = TypeNameResolver::new();
        let vec_int = TypeInfo::generic("alloc", "alloc.vec", "Vec", vec![int_ty()]);

        let tuple = resolver.resolve(&vec_int).expect("resolvable");
        assert_eq!(tuple.name.as_ref(), "Vec[[core.i32]]");
        assert_eq!(tuple.namespace.as_ref(), "alloc.vec");
    }

    #[test]
    fn test_generic_argument_carries_user_assembly() {
        let resolver = TypeNameResolver::new();
        let person = TypeInfo::new("demo_models", "demo.models", "Person");
        let vec_person = TypeInfo::generic("alloc", "alloc.vec", "Vec", vec![person]);

        let tuple = resolver.resolve(&vec_person).expect("resolvable");
        assert_eq!(tuple.name.as_ref(), "Vec[[demo.models.Person, demo_models]]");
    }

    #[test]
    fn test_two_level_generic_composition() {
        let resolver = TypeNameResolver::new();
        let inner = TypeInfo::generic("alloc", "alloc.vec", "Vec", vec![int_ty()]);
        let outer = TypeInfo::generic(
            "demo_models",
            "demo.models",
            "Envelope",
            vec![inner],
        );

        let tuple = resolver.resolve(&outer).expect("resolvable");
        assert_eq!(tuple.name.as_ref(), "Envelope[[alloc.vec.Vec[[core.i32]]]]");
    }

    #[test]
    fn test_multi_argument_composition() {
        let resolver = TypeNameResolver::new();
        let str_ty = TypeInfo::new("alloc", "alloc.string", "String");
        let map = TypeInfo::generic(
            "std",
            "std.collections",
            "HashMap",
            vec![str_ty, int_ty()],
        );

        let tuple = resolver.resolve(&map).expect("resolvable");
        assert_eq!(
            tuple.name.as_ref(),
            "HashMap[[alloc.string.String],[core.i32]]"
        );
        assert!(tuple.assembly.is_none()); // std is ignored
    }

    #[test]
    fn test_nested_prefix_in_tuple_form() {
        let resolver = TypeNameResolver::new();
        let outer = TypeInfo::new("demo_models", "demo.models", "Order");
        let inner = TypeInfo::nested(&outer, "Line");

        let tuple = resolver.resolve(&inner).expect("resolvable");
        assert_eq!(tuple.name.as_ref(), "Order+Line");
    }

    #[test]
    fn test_flat_name_skips_nested_prefix() {
        let resolver = TypeNameResolver::new();
        let outer = TypeInfo::new("demo_models", "demo.models", "Order");
        let inner = TypeInfo::nested(&outer, "Line");

        // Tuple form carries the prefix, flat form does not. Decoders
        // already depend on the asymmetry.
        let tuple = resolver.resolve(&inner).expect("resolvable");
        let flat = resolver.flat_name(&inner).expect("resolvable");
        assert_eq!(tuple.name.as_ref(), "Order+Line");
        assert_eq!(flat.as_ref(), "demo.models.Line");
    }

    #[test]
    fn test_flat_name_generic_suffix() {
        let resolver = TypeNameResolver::new();
        let vec_int = TypeInfo::generic("alloc", "alloc.vec", "Vec", vec![int_ty()]);
        let flat = resolver.flat_name(&vec_int).expect("resolvable");
        assert_eq!(flat.as_ref(), "alloc.vec.Vec[[core.i32]]");
    }

    #[test]
    fn test_open_parameter_is_unresolvable() {
        let resolver = TypeNameResolver::new();
        let param = TypeInfo::parameter("T");
        assert!(resolver.resolve(&param).is_none());
        assert!(resolver.flat_name(&param).is_none());

        // An unresolvable argument poisons the whole composition.
        let open_vec = TypeInfo::generic("alloc", "alloc.vec", "Vec", vec![param]);
        assert!(resolver.resolve(&open_vec).is_none());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let resolver = TypeNameResolver::new();
        let ty = TypeInfo::generic("alloc", "alloc.vec", "Vec", vec![int_ty()]);

        let first = resolver.resolve(&ty).expect("resolvable");
        let second = resolver.resolve(&ty).expect("resolvable");
        assert_eq!(first, second);
    }

    #[test]
    fn test_concurrent_first_resolution() {
        let resolver = Arc::new(TypeNameResolver::new());
        let ty = TypeInfo::generic("alloc", "alloc.vec", "Vec", vec![int_ty()]);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let resolver = Arc::clone(&resolver);
            let ty = Arc::clone(&ty);
            handles.push(std::thread::spawn(move || {
                resolver.resolve(&ty).expect("resolvable")
            }));
        }

        let results: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread join"))
            .collect();
        for pair in results.windows(2) {
            assert_eq!(pair[0], pair[1]);
        }
    }
}
