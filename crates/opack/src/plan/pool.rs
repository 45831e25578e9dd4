// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Free-list pools for scopes and runtime-value plans.
//!
//! Borrow and return are same-thread and LIFO, matching recursive traversal
//! depth; nothing here is shared across threads. Pooling exists to keep
//! deep graph traversal allocation-free, not to provide synchronization.

use crate::plan::item::{PlanItem, RuntimeValue};
use crate::plan::scope::Scope;
use crate::types::TypeInfo;
use crate::value::{CodecKind, Value};
use std::sync::Arc;

/// LIFO free-list of [`Scope`]s.
#[derive(Debug, Default)]
pub struct ScopePool {
    free: Vec<Box<Scope>>,
}

impl ScopePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate the free list for a known traversal depth.
    pub fn with_capacity(depth: usize) -> Self {
        let free = (0..depth).map(|_| Box::new(Scope::new())).collect();
        Self { free }
    }

    /// Take a scope from the free list, or allocate one if empty. The
    /// returned scope is always idle.
    pub fn acquire(&mut self) -> Box<Scope> {
        match self.free.pop() {
            Some(scope) => scope,
            None => {
                log::trace!("[ScopePool] free list empty, allocating");
                Box::new(Scope::new())
            }
        }
    }

    /// Return a scope; it is reset before going back on the free list.
    pub fn release(&mut self, mut scope: Box<Scope>) {
        scope.reset();
        self.free.push(scope);
    }

    /// Scopes currently on the free list.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}

/// LIFO free-list of single-item [`RuntimeValue`] plans.
///
/// A polymorphic slot needs a one-instruction plan per observed value.
/// Reuse reinitializes the slot in place via [`Arc::get_mut`], which only
/// succeeds while the pool holds the sole reference; a plan still bound to
/// a live scope is dropped and a fresh one allocated instead.
#[derive(Debug, Default)]
pub struct RuntimePlanPool {
    free: Vec<Arc<[PlanItem]>>,
}

impl RuntimePlanPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a runtime plan initialized for the observed value.
    pub fn acquire(&mut self, ty: Arc<TypeInfo>, codec: CodecKind, value: Value) -> Arc<[PlanItem]> {
        while let Some(mut plan) = self.free.pop() {
            if let Some(items) = Arc::get_mut(&mut plan) {
                if let Some(PlanItem::RuntimeValue(slot)) = items.first_mut() {
                    slot.init(ty, codec, value);
                    return plan;
                }
            }
            // Still referenced by a live scope; drop it and keep looking.
            log::trace!("[RuntimePlanPool] pooled plan still referenced, discarding");
        }

        let slot = RuntimeValue::new(ty, codec, value);
        let plan: Arc<[PlanItem]> = Arc::new([PlanItem::RuntimeValue(slot)]);
        plan
    }

    /// Return a runtime plan to the free list.
    pub fn release(&mut self, plan: Arc<[PlanItem]>) {
        debug_assert!(
            plan.len() == 1 && matches!(plan.first(), Some(PlanItem::RuntimeValue(_))),
            "RuntimePlanPool only holds single-item RuntimeValue plans"
        );
        self.free.push(plan);
    }

    /// Plans currently on the free list.
    pub fn available(&self) -> usize {
        self.free.len()
    }
}
