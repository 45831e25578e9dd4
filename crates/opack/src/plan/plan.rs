// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Compiled plan: an immutable ordered instruction array for one static type.

use crate::plan::item::PlanItem;
use crate::types::TypeInfo;
use std::sync::Arc;

/// Ordered [`PlanItem`] array compiled for one static type.
///
/// Once published (typically behind an `Arc` in the
/// [`PlanCache`](crate::plan::PlanCache)) a plan is immutable and safe for
/// concurrent read-only sharing across any number of scopes.
/// [`replace_items`](Plan::replace_items) takes `&mut self`: widening a
/// published plan is the rare path and exclusive access is the caller's
/// responsibility (copy-on-write republish or an external lock).
#[derive(Debug, Clone)]
pub struct Plan {
    items: Arc<[PlanItem]>,
    ty: Arc<TypeInfo>,
    is_list: bool,
    is_dictionary: bool,
    len: usize,
}

impl Plan {
    /// Create a plan from the compiler's instruction array.
    pub fn new(
        items: Arc<[PlanItem]>,
        ty: Arc<TypeInfo>,
        is_list: bool,
        is_dictionary: bool,
    ) -> Self {
        let len = items.len();
        Self {
            items,
            ty,
            is_list,
            is_dictionary,
            len,
        }
    }

    /// Hot-swap the instruction array, preserving the static type and
    /// list/dictionary flags. The cached length is recomputed here; it must
    /// track the backing array reference.
    pub fn replace_items(&mut self, items: Arc<[PlanItem]>) {
        self.len = items.len();
        self.items = items;
    }

    /// Instruction slice.
    pub fn items(&self) -> &[PlanItem] {
        &self.items
    }

    /// Shared handle to the instruction array (what scopes bind to).
    pub fn share_items(&self) -> Arc<[PlanItem]> {
        Arc::clone(&self.items)
    }

    /// Instruction at `index`, if any.
    pub fn item(&self, index: usize) -> Option<&PlanItem> {
        self.items.get(index)
    }

    /// Cached instruction count.
    pub fn plan_len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Static type this plan was compiled from.
    pub fn ty(&self) -> &Arc<TypeInfo> {
        &self.ty
    }

    pub fn is_list(&self) -> bool {
        self.is_list
    }

    pub fn is_dictionary(&self) -> bool {
        self.is_dictionary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::item::{PropertyValue, WriteBytes};
    use crate::value::CodecKind;

    fn sample_items(n: usize) -> Arc<[PlanItem]> {
        let items: Vec<PlanItem> = (0..n)
            .map(|i| PlanItem::WriteBytes(WriteBytes::new(vec![i as u8])))
            .collect();
        Arc::from(items)
    }

    #[test]
    fn test_plan_len_matches_items() {
        let ty = TypeInfo::new("demo_models", "demo.models", "Person");
        let plan = Plan::new(sample_items(4), ty, false, false);
        assert_eq!(plan.plan_len(), 4);
        assert_eq!(plan.plan_len(), plan.items().len());
    }

    #[test]
    fn test_replace_items_recomputes_len_and_keeps_flags() {
        let ty = TypeInfo::new("demo_models", "demo.models", "Person");
        let mut plan = Plan::new(sample_items(2), ty.clone(), true, false);

        let widened: Vec<PlanItem> = vec![
            PlanItem::TypeEnd,
            PlanItem::PropertyValue(PropertyValue::new("age", 0, CodecKind::I32, false)),
            PlanItem::TypeEnd,
        ];
        plan.replace_items(Arc::from(widened));

        assert_eq!(plan.plan_len(), 3);
        assert_eq!(plan.plan_len(), plan.items().len());
        assert!(plan.is_list());
        assert!(!plan.is_dictionary());
        assert_eq!(plan.ty().token(), ty.token());
    }

    #[test]
    fn test_item_lookup() {
        let ty = TypeInfo::new("demo_models", "demo.models", "Person");
        let plan = Plan::new(sample_items(2), ty, false, false);
        assert!(plan.item(1).is_some());
        assert!(plan.item(2).is_none());
    }
}
