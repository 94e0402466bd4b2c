//! Memoization of signature verification results. Verifying the same
//! `(signature, public key, message)` triple twice — e.g. when a transaction
//! is re-validated after leaving the orphan pool — hits the cache instead of
//! running the curve math again.

use indexmap::IndexMap;
use parking_lot::RwLock;
use rand::Rng;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

#[derive(Clone, Hash, PartialEq, Eq)]
pub(crate) enum Signature {
    Schnorr(secp256k1::schnorr::Signature),
    Ecdsa(secp256k1::ecdsa::Signature),
}

#[derive(Clone, Hash, PartialEq, Eq)]
pub(crate) enum PublicKey {
    Schnorr(secp256k1::XOnlyPublicKey),
    Ecdsa(secp256k1::PublicKey),
}

/// The key of a memoized signature check: the parsed signature and public key
/// along with the signed message. Malformed signatures and keys never reach
/// the cache since they fail parsing before verification.
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct SigCacheKey {
    pub(crate) signature: Signature,
    pub(crate) pub_key: PublicKey,
    pub(crate) message: secp256k1::Message,
}

/// A bounded, thread-safe map of signature verification outcomes.
///
/// Entries are never evicted while the cache has room; once full, a random
/// victim is replaced. An `IndexMap` backs the store so the victim can be
/// removed by position without a second key lookup. Hits and misses are
/// counted so the cache behaviour stays observable.
#[derive(Clone)]
pub struct SigCache {
    map: Arc<RwLock<IndexMap<SigCacheKey, bool>>>,
    capacity: usize,
    counters: Arc<SigCacheCounters>,
}

impl SigCache {
    pub fn new(capacity: u64) -> Self {
        Self::with_counters(capacity, Default::default())
    }

    pub fn with_counters(capacity: u64, counters: Arc<SigCacheCounters>) -> Self {
        let capacity = capacity as usize;
        Self { map: Arc::new(RwLock::new(IndexMap::with_capacity(capacity))), capacity, counters }
    }

    pub fn get(&self, key: &SigCacheKey) -> Option<bool> {
        let valid = self.map.read().get(key).copied();
        match valid {
            Some(_) => self.counters.hits.fetch_add(1, Ordering::Relaxed),
            None => self.counters.misses.fetch_add(1, Ordering::Relaxed),
        };
        valid
    }

    pub fn insert(&self, key: SigCacheKey, valid: bool) {
        if self.capacity == 0 {
            return;
        }
        let mut map = self.map.write();
        if map.len() == self.capacity {
            let victim = rand::thread_rng().gen_range(0..map.len());
            map.swap_remove_index(victim);
        }
        map.insert(key, valid);
    }

    pub fn clear(&self) {
        self.map.write().clear();
    }

    pub fn counters(&self) -> Arc<SigCacheCounters> {
        self.counters.clone()
    }
}

#[derive(Default)]
pub struct SigCacheCounters {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
}

impl SigCacheCounters {
    pub fn snapshot(&self) -> SigCacheCountersSnapshot {
        SigCacheCountersSnapshot { hits: self.hits.load(Ordering::Relaxed), misses: self.misses.load(Ordering::Relaxed) }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigCacheCountersSnapshot {
    pub hits: u64,
    pub misses: u64,
}

impl SigCacheCountersSnapshot {
    pub fn hit_ratio(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0f64,
            lookups => self.hits as f64 / lookups as f64,
        }
    }
}
