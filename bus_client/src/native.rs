//! The process-wide client over the kernel boundary.

use crate::client::BusClient;
use bus_abi::NativeBoundary;
use spin::Once;

static NATIVE_CLIENT: Once<BusClient<NativeBoundary>> = Once::new();

/// Returns the process-wide client, creating it on first use.
pub fn native_client() -> &'static BusClient<NativeBoundary> {
    NATIVE_CLIENT.call_once(|| BusClient::new(NativeBoundary::new()))
}
