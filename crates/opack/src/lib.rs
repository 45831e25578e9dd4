// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # opack - plan-driven traversal engine
//!
//! The compilation/traversal core underneath the opack binary object
//! serializer. Reflection over a runtime type graph is compiled (by an
//! external plan compiler) into a cached, reusable [`Plan`]: an ordered
//! instruction sequence describing how to walk an object's shape - scalars,
//! properties, lists, dictionaries, polymorphic slots and self/cyclic
//! references. A [`Scope`] cursor drives one plan against one concrete
//! value during one encode or decode pass.
//!
//! The byte-level reader/writer, the plan compiler proper and everything
//! above them (compression, messaging) live outside this crate; this crate
//! defines the instruction set, the cursor machinery, the type-name
//! resolution used for object headers, and the caches and pools that keep
//! the hot path allocation-free.
//!
//! ## Quick Start
//!
//! ```rust
//! use opack::{Plan, PlanItem, PropertyValue, Scope, TypeInfo, TypeStart};
//! use opack::{CodecKind, ObjectValue, TypeNameResolver, Value};
//! use std::sync::Arc;
//!
//! // A plan the compiler would produce for `Point { x: i32, y: i32 }`.
//! let resolver = TypeNameResolver::new();
//! let point_ty = TypeInfo::new("demo_models", "demo.models", "Point");
//! let tuple = resolver.resolve(&point_ty).expect("resolvable");
//! let items: Vec<PlanItem> = vec![
//!     PlanItem::TypeStart(TypeStart::new(point_ty.clone(), false, false, false, &tuple)),
//!     PlanItem::PropertyValue(PropertyValue::new("x", 0, CodecKind::I32, false)),
//!     PlanItem::PropertyValue(PropertyValue::new("y", 1, CodecKind::I32, false)),
//!     PlanItem::TypeEnd,
//! ];
//! let plan = Plan::new(Arc::from(items), point_ty.clone(), false, false);
//!
//! // Bind a scope to one value and consume the instructions.
//! let point = Value::Object(Arc::new(ObjectValue::new(
//!     point_ty.clone(),
//!     vec![Value::I32(3), Value::I32(4)],
//! )));
//! let mut scope = Scope::new();
//! scope.bind(Some(&plan), point_ty, point);
//! while let Some(item) = scope.next_if_available() {
//!     // ... hand `item` to the byte codec ...
//!     let _ = item.kind();
//! }
//! assert_eq!(scope.index(), scope.plan_len());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +--------------------------------------------------------------+
//! |                  plan compiler (external)                     |
//! |    reflection over TypeInfo graph -> PlanItem array           |
//! +--------------------------------------------------------------+
//! |                        this crate                             |
//! |  TypeNameResolver | PlanItem | Plan | PlanCache               |
//! |  Scope cursor | ScopePool | RuntimePlanPool                   |
//! +--------------------------------------------------------------+
//! |                   byte codec (external)                       |
//! |    per-item discriminator + payload -> wire format            |
//! +--------------------------------------------------------------+
//! ```
//!
//! ## Concurrency model
//!
//! Traversal is single-threaded and synchronous per [`Scope`]; any number of
//! threads may traverse concurrently, each with its own scope, sharing the
//! same immutable [`Plan`]. Compilation and name resolution are
//! effectively-once per type via atomic get-or-insert caches; redundant
//! concurrent computes are tolerated because results are interchangeable.

pub mod plan;
pub mod types;
pub mod value;

pub use plan::{
    DictionaryStart, FieldAccessor, ListStart, LookupStats, Plan, PlanCache, PlanItem,
    PlanItemKind, PropertyReference, PropertyValue, RuntimePlanPool, RuntimeValue, Scope,
    ScopePool, TypeStart, ValueItem, WriteBytes, DEFAULT_PLAN_CACHE_CAPACITY,
};
pub use types::{TypeInfo, TypeInfoBuilder, TypeNameResolver, TypeNameTuple, TypeToken,
    IGNORED_ASSEMBLIES};
pub use value::{AccessError, CodecKind, ObjectValue, Value};
