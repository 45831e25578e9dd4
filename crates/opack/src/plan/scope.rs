// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Scope: the cursor driving one plan against one concrete value.
//!
//! A scope never owns its plan; many scopes may read the same compiled plan
//! concurrently. Traversal states: IDLE (no plan) -> BOUND (plan + value,
//! index 0) -> STREAMING (`next` advancing) -> DONE (index == length), then
//! back to IDLE via [`Scope::reset`] or directly re-BOUND via
//! [`Scope::bind`] / [`Scope::change_plan`].
//!
//! Overrunning the plan is a compiler defect, not a data error, and panics
//! immediately rather than continuing with a corrupted index.

use crate::plan::item::PlanItem;
use crate::plan::plan::Plan;
use crate::types::TypeInfo;
use crate::value::Value;
use std::sync::{Arc, OnceLock};

fn empty_items() -> Arc<[PlanItem]> {
    static EMPTY: OnceLock<Arc<[PlanItem]>> = OnceLock::new();
    EMPTY.get_or_init(|| Arc::from(Vec::new())).clone()
}

/// Cursor binding a compiled plan to one runtime value for one traversal.
#[derive(Debug, Clone)]
pub struct Scope {
    items: Arc<[PlanItem]>,
    ty: Option<Arc<TypeInfo>>,
    value: Value,
    index: usize,
    len: usize,
    is_list: bool,
    is_dictionary: bool,
}

impl Scope {
    /// Create an idle scope (usually drawn from a
    /// [`ScopePool`](crate::plan::ScopePool) instead).
    pub fn new() -> Self {
        Self {
            items: empty_items(),
            ty: None,
            value: Value::Null,
            index: 0,
            len: 0,
            is_list: false,
            is_dictionary: false,
        }
    }

    /// Reset to idle: no plan, index 0, no value. Called before a scope is
    /// returned to its pool.
    pub fn reset(&mut self) {
        self.items = empty_items();
        self.ty = None;
        self.value = Value::Null;
        self.index = 0;
        self.len = 0;
        self.is_list = false;
        self.is_dictionary = false;
    }

    /// Bind to a compiled plan and a concrete value; copies the plan's
    /// list/dictionary flags and length and resets the index.
    ///
    /// When `plan` is `None` the existing plan fields are left untouched
    /// rather than cleared; callers rely on this to re-drive the same
    /// instructions over a new value (see
    /// `test_bind_without_plan_keeps_stale_items`). Changing it is a wire
    /// compatibility break.
    pub fn bind(&mut self, plan: Option<&Plan>, original_type: Arc<TypeInfo>, value: Value) {
        if let Some(plan) = plan {
            self.items = plan.share_items();
            self.len = plan.plan_len();
            self.is_list = plan.is_list();
            self.is_dictionary = plan.is_dictionary();
        }
        self.ty = Some(original_type);
        self.value = value;
        self.index = 0;
    }

    /// Bind to a runtime-value plan (the polymorphic-leaf case); forces the
    /// list/dictionary flags off and resets the index. The previously bound
    /// value is left untouched: the polymorphic value travels inside the
    /// [`RuntimeValue`](crate::plan::RuntimeValue) item itself.
    pub fn bind_runtime(&mut self, items: Arc<[PlanItem]>, ty: Arc<TypeInfo>) {
        self.len = items.len();
        self.items = items;
        self.is_list = false;
        self.is_dictionary = false;
        self.ty = Some(ty);
        self.index = 0;
    }

    /// Rebind just the instruction array and reset the index, keeping the
    /// bound value; used for mid-traversal substitution once a more
    /// specific runtime type is discovered.
    pub fn change_plan(&mut self, items: Arc<[PlanItem]>) {
        self.len = items.len();
        self.items = items;
        self.index = 0;
    }

    /// Return the current item and advance the index by one.
    ///
    /// # Panics
    /// Panics when no item remains; calling `next` past the end of a plan
    /// is a plan-compiler defect.
    pub fn next(&mut self) -> &PlanItem {
        assert!(
            self.index < self.len,
            "scope overrun: next() at index {} of {}-item plan",
            self.index,
            self.len
        );
        let item = &self.items[self.index];
        self.index += 1;
        item
    }

    /// Like [`next`](Scope::next) but returns `None` instead of panicking
    /// when the plan is exhausted; never advances past the end.
    pub fn next_if_available(&mut self) -> Option<&PlanItem> {
        if self.index < self.len {
            let item = &self.items[self.index];
            self.index += 1;
            Some(item)
        } else {
            None
        }
    }

    /// `true` while items remain.
    pub fn has_pending(&self) -> bool {
        self.index < self.len
    }

    /// Current cursor position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Length of the bound instruction array.
    pub fn plan_len(&self) -> usize {
        self.len
    }

    pub fn is_list(&self) -> bool {
        self.is_list
    }

    pub fn is_dictionary(&self) -> bool {
        self.is_dictionary
    }

    /// The bound value (null when idle).
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The type this traversal was bound with.
    pub fn bound_type(&self) -> Option<&Arc<TypeInfo>> {
        self.ty.as_ref()
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}
