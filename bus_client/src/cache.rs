//! Memoized resolution results

use bus_abi::{EntityKind, Handle};
use std::collections::HashMap;

/// Identity of one resolution: the name plus the handles it is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Service(String),
    Interface(Handle, String),
    Method(Handle, Handle, String),
}

impl CacheKey {
    pub fn entity(&self) -> EntityKind {
        match self {
            CacheKey::Service(_) => EntityKind::Service,
            CacheKey::Interface(..) => EntityKind::Interface,
            CacheKey::Method(..) => EntityKind::Method,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CacheKey::Service(name)
            | CacheKey::Interface(_, name)
            | CacheKey::Method(_, _, name) => name,
        }
    }
}

/// A remembered outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEntry {
    Resolved(Handle),
    /// The bus reported no match (only kept under `FailurePolicy::CacheFailure`)
    Missing,
}

/// Write-once map from resolution identity to outcome.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: HashMap<CacheKey, CacheEntry>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key).copied()
    }

    /// Records an outcome unless one is already present; returns the
    /// outcome that is now cached.
    pub fn insert(&mut self, key: CacheKey, entry: CacheEntry) -> CacheEntry {
        *self.entries.entry(key).or_insert(entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
