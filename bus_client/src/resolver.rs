//! Identifier resolution with memoization.
//!
//! Each distinct (name, scope) is resolved with one `Method` transaction
//! and remembered for the lifetime of the resolver. The topology of
//! services, interfaces and methods is static for a client process, so
//! entries are never re-queried or expired.
//!
//! First use is race-free: a miss takes the channel's transaction lock and
//! checks the cache again before querying, so two callers racing on the
//! same key produce a single boundary call.

use crate::cache::{CacheEntry, CacheKey, ResolutionCache};
use crate::channel::BusChannel;
use crate::config::{FailurePolicy, ResolverConfig};
use bus_abi::{Boundary, BusError, Handle, ResolutionRequest, Result};
use log::debug;
use spin::Mutex;

/// Memoizing name resolver.
#[derive(Debug, Default)]
pub struct Resolver {
    config: ResolverConfig,
    cache: Mutex<ResolutionCache>,
}

impl Resolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            config,
            cache: Mutex::new(ResolutionCache::new()),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a service name.
    ///
    /// A cache miss holds `channel`'s spin lock for the whole query; other
    /// callers spin meanwhile. Resolving from a thread that already holds a
    /// transaction on `channel` never returns. The same holds for
    /// [`Self::resolve_interface`] and [`Self::resolve_method`].
    pub fn resolve_service<B: Boundary>(
        &self,
        channel: &BusChannel<B>,
        name: &str,
    ) -> Result<Handle> {
        self.resolve(
            channel,
            CacheKey::Service(name.to_string()),
            ResolutionRequest::Service { name },
        )
    }

    /// Resolves an interface name within a service.
    pub fn resolve_interface<B: Boundary>(
        &self,
        channel: &BusChannel<B>,
        service: Handle,
        name: &str,
    ) -> Result<Handle> {
        self.resolve(
            channel,
            CacheKey::Interface(service, name.to_string()),
            ResolutionRequest::Interface { service, name },
        )
    }

    /// Resolves a method name within a service's interface.
    pub fn resolve_method<B: Boundary>(
        &self,
        channel: &BusChannel<B>,
        service: Handle,
        interface: Handle,
        name: &str,
    ) -> Result<Handle> {
        self.resolve(
            channel,
            CacheKey::Method(service, interface, name.to_string()),
            ResolutionRequest::Method {
                service,
                interface,
                name,
            },
        )
    }

    /// Number of remembered outcomes.
    pub fn cached_entries(&self) -> usize {
        self.cache.lock().len()
    }

    /// Forgets every remembered outcome.
    pub fn clear_cache(&self) {
        self.cache.lock().clear();
    }

    fn lookup(&self, key: &CacheKey) -> Option<Result<Handle>> {
        let entry = self.cache.lock().get(key)?;
        Some(Self::outcome(key, entry))
    }

    fn outcome(key: &CacheKey, entry: CacheEntry) -> Result<Handle> {
        match entry {
            CacheEntry::Resolved(handle) => Ok(handle),
            CacheEntry::Missing => Err(BusError::NotFound {
                entity: key.entity(),
                name: key.name().to_string(),
            }),
        }
    }

    fn resolve<B: Boundary>(
        &self,
        channel: &BusChannel<B>,
        key: CacheKey,
        request: ResolutionRequest<'_>,
    ) -> Result<Handle> {
        if let Some(outcome) = self.lookup(&key) {
            return outcome;
        }

        let mut transaction = channel.transaction();
        // Another caller may have resolved this key while we waited.
        if let Some(outcome) = self.lookup(&key) {
            return outcome;
        }

        debug!(
            "resolving {} {:?} with record {}",
            key.entity(),
            key.name(),
            request.record()
        );
        let status = transaction.codec().submit(&request)?;
        let handle = Handle::from_status(status);

        if handle.is_valid() {
            debug!("resolved {} {:?} to {}", key.entity(), key.name(), handle);
            let entry = self
                .cache
                .lock()
                .insert(key.clone(), CacheEntry::Resolved(handle));
            return Self::outcome(&key, entry);
        }

        debug!(
            "{} {:?} not found (status {})",
            key.entity(),
            key.name(),
            status
        );
        let error = BusError::NotFound {
            entity: key.entity(),
            name: key.name().to_string(),
        };
        if self.config.failure_policy == FailurePolicy::CacheFailure {
            self.cache.lock().insert(key, CacheEntry::Missing);
        }
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bus_abi::{
        BoundaryRequest, EntityKind, MethodInvocationRecord, StatusCode, SyscallKind,
        STATUS_FAILURE,
    };

    /// Far side that answers every lookup with a fixed status.
    struct Answer {
        status: StatusCode,
        records: Vec<MethodInvocationRecord>,
        pushes: usize,
        fail_pushes: bool,
    }

    impl Answer {
        fn new(status: StatusCode) -> Self {
            Self {
                status,
                records: Vec::new(),
                pushes: 0,
                fail_pushes: false,
            }
        }
    }

    impl Boundary for Answer {
        fn call(&mut self, request: BoundaryRequest<'_>) -> StatusCode {
            match request {
                BoundaryRequest::Method(record) => {
                    self.records.push(record);
                    self.status
                }
                BoundaryRequest::Push(_) if self.fail_pushes => STATUS_FAILURE,
                BoundaryRequest::Push(_) => {
                    self.pushes += 1;
                    0
                }
                _ => STATUS_FAILURE,
            }
        }
    }

    #[test]
    fn test_service_resolution_is_memoized() {
        let channel = BusChannel::new(Answer::new(5));
        let resolver = Resolver::default();

        assert_eq!(resolver.resolve_service(&channel, "vfs"), Ok(Handle::new(5)));
        assert_eq!(resolver.resolve_service(&channel, "vfs"), Ok(Handle::new(5)));

        channel.with_boundary(|far| {
            assert_eq!(far.records, vec![MethodInvocationRecord::new(0, 1, 0)]);
            assert_eq!(far.pushes, 1);
        });
        assert_eq!(resolver.cached_entries(), 1);
    }

    #[test]
    fn test_interface_and_method_records() {
        let channel = BusChannel::new(Answer::new(2));
        let resolver = Resolver::default();

        resolver
            .resolve_interface(&channel, Handle::new(9), "file")
            .unwrap();
        resolver
            .resolve_method(&channel, Handle::new(9), Handle::new(2), "read")
            .unwrap();

        channel.with_boundary(|far| {
            assert_eq!(
                far.records,
                vec![
                    MethodInvocationRecord::new(9, 0, 0),
                    MethodInvocationRecord::new(9, 0, 1),
                ]
            );
            assert_eq!(far.pushes, 3);
        });
    }

    #[test]
    fn test_not_found_is_retried_by_default() {
        let channel = BusChannel::new(Answer::new(-1));
        let resolver = Resolver::default();

        for _ in 0..2 {
            assert_eq!(
                resolver.resolve_service(&channel, "ghost"),
                Err(BusError::NotFound {
                    entity: EntityKind::Service,
                    name: "ghost".to_string(),
                })
            );
        }
        assert_eq!(channel.with_boundary(|far| far.records.len()), 2);
        assert_eq!(resolver.cached_entries(), 0);
    }

    #[test]
    fn test_not_found_is_remembered_when_configured() {
        let channel = BusChannel::new(Answer::new(-1));
        let resolver = Resolver::new(
            ResolverConfig::new().with_failure_policy(FailurePolicy::CacheFailure),
        );

        assert!(resolver
            .resolve_service(&channel, "ghost")
            .unwrap_err()
            .is_not_found());
        assert!(resolver
            .resolve_service(&channel, "ghost")
            .unwrap_err()
            .is_not_found());
        assert_eq!(channel.with_boundary(|far| far.records.len()), 1);
    }

    #[test]
    fn test_push_failure_is_transport_error_and_not_cached() {
        let mut far = Answer::new(3);
        far.fail_pushes = true;
        let channel = BusChannel::new(far);
        let resolver = Resolver::new(
            ResolverConfig::new().with_failure_policy(FailurePolicy::CacheFailure),
        );

        assert_eq!(
            resolver.resolve_service(&channel, "vfs"),
            Err(BusError::transport(SyscallKind::Push, STATUS_FAILURE))
        );
        assert_eq!(resolver.cached_entries(), 0);

        channel.with_boundary(|far| far.fail_pushes = false);
        assert_eq!(resolver.resolve_service(&channel, "vfs"), Ok(Handle::new(3)));
    }

    #[test]
    fn test_clear_cache_forces_requery() {
        let channel = BusChannel::new(Answer::new(1));
        let resolver = Resolver::default();

        resolver.resolve_service(&channel, "vfs").unwrap();
        resolver.clear_cache();
        resolver.resolve_service(&channel, "vfs").unwrap();

        assert_eq!(channel.with_boundary(|far| far.records.len()), 2);
    }
}
