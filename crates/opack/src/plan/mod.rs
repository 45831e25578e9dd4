// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compiled traversal plans and the cursor machinery that drives them.
//!
//! The plan compiler (external to this module) enumerates a type's
//! properties in declaration order and classifies each into a [`PlanItem`].
//! A [`Plan`] is the resulting immutable instruction array for one static
//! type; a [`Scope`] is the cursor that drives one plan against one
//! concrete value during one encode/decode pass. The byte codec consumes
//! items sequentially via [`Scope::next`] and is responsible for looping a
//! `ListStart`/`ListEnd` pair once per actual element; element counts are
//! runtime-driven and never encoded in a plan.

mod cache;
mod item;
mod plan;
mod pool;
mod scope;

pub use cache::{LookupStats, PlanCache, DEFAULT_PLAN_CACHE_CAPACITY};
pub use item::{
    DictionaryStart, FieldAccessor, ListStart, PlanItem, PlanItemKind, PropertyReference,
    PropertyValue, RuntimeValue, TypeStart, ValueItem, WriteBytes,
};
pub use plan::Plan;
pub use pool::{RuntimePlanPool, ScopePool};
pub use scope::Scope;
