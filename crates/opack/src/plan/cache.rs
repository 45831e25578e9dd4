// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Concurrent LRU cache for compiled plans.
//!
//! Plan compilation reflects over the whole type graph and must happen only
//! once per static type. Lookups are served from an in-memory LRU keyed by
//! [`TypeToken`]; a secondary dashmap tracks "pinned" tokens that must never
//! be evicted (hot message types, roots of deep graphs). The size bound
//! matters for hosts that keep minting types at runtime.

use crate::plan::plan::Plan;
use crate::types::TypeToken;
use dashmap::DashSet;
use lru::LruCache;
use parking_lot::RwLock;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

/// Default plan cache capacity.
pub const DEFAULT_PLAN_CACHE_CAPACITY: usize = 1024;

/// Cache hit/miss statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct LookupStats {
    pub hits: u64,
    pub misses: u64,
    pub last_miss_ns: u64,
}

/// LRU-based concurrent cache of compiled [`Plan`]s.
pub struct PlanCache {
    inner: RwLock<LruCache<TypeToken, Arc<Plan>>>,
    pinned: DashSet<TypeToken>,
    stats: RwLock<LookupStats>,
}

impl PlanCache {
    /// # Panics
    /// Panics when `capacity` is zero.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).expect("capacity > 0");
        Self {
            inner: RwLock::new(LruCache::new(capacity)),
            pinned: DashSet::new(),
            stats: RwLock::new(LookupStats::default()),
        }
    }

    #[must_use]
    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_PLAN_CACHE_CAPACITY)
    }

    /// Get the compiled plan for `token`, invoking `compile` on first use.
    #[must_use]
    pub fn get_or_build<F>(&self, token: TypeToken, compile: F) -> Arc<Plan>
    where
        F: FnOnce() -> Plan,
    {
        #[allow(clippy::expect_used)] // Ok::<_, ()> closure is infallible by construction
        self.get_or_try_build(token, || Ok::<Plan, ()>(compile()))
            .expect("compile closure is infallible")
    }

    /// Fallible variant: compilation errors propagate to the caller and
    /// nothing is cached.
    pub fn get_or_try_build<F, E>(&self, token: TypeToken, compile: F) -> Result<Arc<Plan>, E>
    where
        F: FnOnce() -> Result<Plan, E>,
    {
        if let Some(hit) = self.try_peek(token) {
            self.record_hit();
            return Ok(hit);
        }

        let mut cache = self.inner.write();
        if let Some(hit) = cache.get(&token) {
            self.record_hit();
            return Ok(Arc::clone(hit));
        }

        let start = Instant::now();
        let built = Arc::new(compile()?);
        log::trace!(
            "[PlanCache] compiled {}-item plan for {} in {} ns",
            built.plan_len(),
            token,
            start.elapsed().as_nanos()
        );

        if cache.len() >= cache.cap().into() && !self.free_slot(&mut cache) {
            // Everything resident is pinned; serve the plan uncached.
            self.record_miss(start);
            return Ok(built);
        }

        cache.put(token, Arc::clone(&built));
        self.record_miss(start);
        Ok(built)
    }

    /// Look up without compiling.
    #[must_use]
    pub fn get(&self, token: TypeToken) -> Option<Arc<Plan>> {
        let hit = self.try_peek(token);
        if hit.is_some() {
            self.record_hit();
        }
        hit
    }

    /// Mark a token as never-evict.
    pub fn pin(&self, token: TypeToken) {
        self.pinned.insert(token);
    }

    #[must_use]
    pub fn stats(&self) -> LookupStats {
        *self.stats.read()
    }

    /// Resident plan count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn try_peek(&self, token: TypeToken) -> Option<Arc<Plan>> {
        let cache = self.inner.read();
        cache.peek(&token).map(Arc::clone)
    }

    fn free_slot(&self, cache: &mut LruCache<TypeToken, Arc<Plan>>) -> bool {
        if cache.len() < cache.cap().into() {
            return true;
        }

        let attempts = cache.len();
        for _ in 0..attempts {
            if let Some((old_token, old_plan)) = cache.pop_lru() {
                if self.pinned.contains(&old_token) {
                    cache.put(old_token, old_plan);
                } else {
                    return true;
                }
            } else {
                break;
            }
        }

        false
    }

    fn record_hit(&self) {
        let mut stats = self.stats.write();
        stats.hits = stats.hits.saturating_add(1);
    }

    fn record_miss(&self, start: Instant) {
        let mut stats = self.stats.write();
        stats.misses = stats.misses.saturating_add(1);
        stats.last_miss_ns = start.elapsed().as_nanos() as u64;
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::item::{PlanItem, WriteBytes};
    use crate::types::TypeInfo;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn trivial_plan(ty: &Arc<TypeInfo>) -> Plan {
        let items: Vec<PlanItem> = vec![PlanItem::WriteBytes(WriteBytes::new(vec![0u8]))];
        Plan::new(Arc::from(items), ty.clone(), false, false)
    }

    #[test]
    fn test_compile_happens_once() {
        let cache = PlanCache::new(8);
        let ty = TypeInfo::new("demo_models", "demo.models", "Person");
        let compiles = AtomicUsize::new(0);

        for _ in 0..5 {
            let plan = cache.get_or_build(ty.token(), || {
                compiles.fetch_add(1, Ordering::Relaxed);
                trivial_plan(&ty)
            });
            assert_eq!(plan.plan_len(), 1);
        }

        assert_eq!(compiles.load(Ordering::Relaxed), 1);
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 4);
    }

    #[test]
    fn test_try_build_error_is_not_cached() {
        let cache = PlanCache::new(8);
        let ty = TypeInfo::new("demo_models", "demo.models", "Broken");

        let err: Result<_, &str> = cache.get_or_try_build(ty.token(), || Err("unresolvable"));
        assert!(err.is_err());
        assert!(cache.get(ty.token()).is_none());

        // A later successful compile still lands.
        let ok = cache.get_or_try_build::<_, &str>(ty.token(), || Ok(trivial_plan(&ty)));
        assert!(ok.is_ok());
    }

    #[test]
    fn test_eviction_skips_pinned() {
        let cache = PlanCache::new(2);
        let hot = TypeInfo::new("demo_models", "demo.models", "Hot");
        let cold = TypeInfo::new("demo_models", "demo.models", "Cold");
        let newer = TypeInfo::new("demo_models", "demo.models", "Newer");

        cache.pin(hot.token());
        let _ = cache.get_or_build(hot.token(), || trivial_plan(&hot));
        let _ = cache.get_or_build(cold.token(), || trivial_plan(&cold));
        let _ = cache.get_or_build(newer.token(), || trivial_plan(&newer));

        assert!(cache.get(hot.token()).is_some()); // pinned survives
        assert!(cache.get(cold.token()).is_none()); // LRU victim
        assert!(cache.get(newer.token()).is_some());
    }

    #[test]
    fn test_all_pinned_serves_uncached() {
        let cache = PlanCache::new(1);
        let a = TypeInfo::new("demo_models", "demo.models", "A");
        let b = TypeInfo::new("demo_models", "demo.models", "B");

        cache.pin(a.token());
        let _ = cache.get_or_build(a.token(), || trivial_plan(&a));
        let plan_b = cache.get_or_build(b.token(), || trivial_plan(&b));

        assert_eq!(plan_b.plan_len(), 1);
        assert!(cache.get(b.token()).is_none()); // no slot freed, not resident
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_first_use() {
        let cache = Arc::new(PlanCache::new(16));
        let ty = TypeInfo::new("demo_models", "demo.models", "Shared");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let ty = Arc::clone(&ty);
            handles.push(std::thread::spawn(move || {
                cache.get_or_build(ty.token(), || trivial_plan(&ty))
            }));
        }

        let plans: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("thread join"))
            .collect();
        for pair in plans.windows(2) {
            assert!(Arc::ptr_eq(&pair[0], &pair[1])); // one shared plan
        }
    }
}
