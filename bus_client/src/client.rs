//! Bus client: a channel plus its resolver.

use crate::channel::{BusChannel, Transaction};
use crate::codec::ParamCodec;
use crate::config::ResolverConfig;
use crate::identifiers::{InterfaceDecl, MethodDecl, ServiceDecl};
use crate::resolver::Resolver;
use bus_abi::{Boundary, Handle, MethodTarget, Parameter, Result, StatusCode};
use log::trace;

/// Client for one bus boundary.
///
/// All resolutions share one cache and all transactions one channel, so
/// each identifier is queried at most once however many threads use the
/// client.
///
/// # Example
///
/// ```
/// use bus_abi::Parameter;
/// use bus_client::{BusClient, InterfaceDecl, MethodDecl, ServiceDecl};
/// use sim_bus::{MethodReply, SimBus};
///
/// static MATH: ServiceDecl = ServiceDecl::new("math");
/// static ARITH: InterfaceDecl = InterfaceDecl::new(&MATH, "arith");
/// static ADD: MethodDecl = MethodDecl::new(&ARITH, "add");
///
/// let mut bus = SimBus::new();
/// let math = bus.register_service("math").unwrap();
/// let arith = bus.register_interface(math, "arith").unwrap();
/// bus.register_method(math, arith, "add", |args| {
///     let sum = args.iter().map(|arg| match arg {
///         Parameter::Primitive(value) => *value,
///         Parameter::Array(_) => 0,
///     }).sum::<i64>();
///     MethodReply::ok(0).with_result(Parameter::Primitive(sum))
/// }).unwrap();
///
/// let client = BusClient::new(bus);
/// let sum = client
///     .call(&ADD, &[Parameter::Primitive(2), Parameter::Primitive(3)], |_, codec| {
///         codec.pop_int()
///     })
///     .unwrap();
/// assert_eq!(sum, 5);
/// ```
pub struct BusClient<B> {
    channel: BusChannel<B>,
    resolver: Resolver,
}

impl<B: Boundary> BusClient<B> {
    /// Creates a client with the default resolver configuration.
    pub fn new(boundary: B) -> Self {
        Self::with_config(boundary, ResolverConfig::default())
    }

    pub fn with_config(boundary: B, config: ResolverConfig) -> Self {
        Self {
            channel: BusChannel::new(boundary),
            resolver: Resolver::new(config),
        }
    }

    pub fn channel(&self) -> &BusChannel<B> {
        &self.channel
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Starts a raw push…pop transaction.
    ///
    /// Holds the channel's spin lock until dropped. Resolving, calling or
    /// starting another transaction on this client from the same thread
    /// meanwhile never returns.
    pub fn transaction(&self) -> Transaction<'_, B> {
        self.channel.transaction()
    }

    /// Gives direct access to the boundary (see [`BusChannel::with_boundary`]).
    pub fn with_boundary<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut B) -> R,
    {
        self.channel.with_boundary(f)
    }

    /// Resolves a service name, querying the far side on a cache miss.
    ///
    /// A miss takes a transaction, so this must not run while the calling
    /// thread holds one.
    pub fn resolve_service(&self, name: &str) -> Result<Handle> {
        self.resolver.resolve_service(&self.channel, name)
    }

    pub fn resolve_interface(&self, service: Handle, name: &str) -> Result<Handle> {
        self.resolver.resolve_interface(&self.channel, service, name)
    }

    pub fn resolve_method(&self, service: Handle, interface: Handle, name: &str) -> Result<Handle> {
        self.resolver
            .resolve_method(&self.channel, service, interface, name)
    }

    /// Like [`Self::resolve_service`], collapsing every failure to
    /// [`Handle::UNRESOLVED`].
    pub fn lookup_service(&self, name: &str) -> Handle {
        self.resolve_service(name).unwrap_or(Handle::UNRESOLVED)
    }

    pub fn lookup_interface(&self, service: Handle, name: &str) -> Handle {
        self.resolve_interface(service, name)
            .unwrap_or(Handle::UNRESOLVED)
    }

    pub fn lookup_method(&self, service: Handle, interface: Handle, name: &str) -> Handle {
        self.resolve_method(service, interface, name)
            .unwrap_or(Handle::UNRESOLVED)
    }

    /// Resolves a declared service.
    pub fn service(&self, decl: &ServiceDecl) -> Result<Handle> {
        self.resolve_service(decl.name())
    }

    /// Resolves a declared interface (and its service).
    pub fn interface(&self, decl: &InterfaceDecl) -> Result<Handle> {
        let service = self.service(decl.service())?;
        self.resolve_interface(service, decl.name())
    }

    /// Resolves a declared method to a full invocation target.
    ///
    /// Same locking rule as [`Self::resolve_service`].
    pub fn method(&self, decl: &MethodDecl) -> Result<MethodTarget> {
        let service = self.service(decl.service())?;
        let interface = self.resolve_interface(service, decl.interface().name())?;
        let method = self.resolve_method(service, interface, decl.name())?;
        Ok(MethodTarget::new(service, interface, method))
    }

    /// Pushes `args` and invokes `target` in one transaction, returning
    /// the remote status. Any results are discarded when the transaction
    /// ends; use [`Self::call`] to read them.
    pub fn invoke(&self, target: MethodTarget, args: &[Parameter]) -> Result<StatusCode> {
        self.channel.call(|codec| Self::push_and_invoke(codec, target, args))
    }

    /// Calls a declared method.
    ///
    /// The target is resolved first (cached after the first call). Then,
    /// in one transaction, `args` are pushed in order, the method is
    /// invoked, and `decode` pops the results. Whatever `decode` leaves
    /// pending is discarded.
    ///
    /// `decode` runs with the channel locked and must not use this client.
    pub fn call<R, F>(&self, decl: &MethodDecl, args: &[Parameter], decode: F) -> Result<R>
    where
        F: FnOnce(StatusCode, &mut ParamCodec<'_, B>) -> Result<R>,
    {
        let target = self.method(decl)?;
        trace!("calling {} at {}", decl, target);
        self.channel.call(|codec| {
            let status = Self::push_and_invoke(codec, target, args)?;
            decode(status, codec)
        })
    }

    /// Number of remembered resolution outcomes.
    pub fn cached_entries(&self) -> usize {
        self.resolver.cached_entries()
    }

    pub fn clear_cache(&self) {
        self.resolver.clear_cache();
    }

    fn push_and_invoke(
        codec: &mut ParamCodec<'_, B>,
        target: MethodTarget,
        args: &[Parameter],
    ) -> Result<StatusCode> {
        for arg in args {
            codec.push_parameter(arg)?;
        }
        codec.invoke(target)
    }
}
