//! # Bus Client
//!
//! Client-side marshalling for the kernel bus.
//!
//! ## Architecture
//!
//! - [`ParamCodec`]: push, peek and pop of primitive and array parameters
//! - [`BusChannel`]: one boundary behind a lock; a [`Transaction`] holds it
//!   for a whole push…pop sequence
//! - [`Resolver`]: service, interface and method names to handles, each
//!   resolved once and remembered
//! - [`BusClient`]: the above together, plus calls to declared methods
//!
//! A remote call resolves its target (cached), pushes its arguments,
//! issues the invocation record and pops its results, all but the
//! resolution inside a single transaction.
//!
//! Enable the `native` feature to talk to the kernel through
//! [`native_client`].

pub mod cache;
pub mod channel;
pub mod client;
pub mod codec;
pub mod config;
pub mod identifiers;
pub mod resolver;

#[cfg(feature = "native")]
pub mod native;

pub use cache::{CacheEntry, CacheKey, ResolutionCache};
pub use channel::{BusChannel, Transaction};
pub use client::BusClient;
pub use codec::ParamCodec;
pub use config::{FailurePolicy, ResolverConfig};
pub use identifiers::{InterfaceDecl, MethodDecl, ServiceDecl};
pub use resolver::Resolver;

#[cfg(feature = "native")]
pub use bus_abi::NativeBoundary;
#[cfg(feature = "native")]
pub use native::native_client;
