//! Comick importer for the tier list.
//!
//! Provides the `ItemSource` implementations used by the front ends: a direct
//! client for the comick site, a client for the import proxy, and the proxy
//! server itself.

pub mod api;
pub mod parse;
pub mod proxy;
pub mod server;

pub use api::ComickClient;
pub use proxy::ProxyClient;
pub use server::{router, serve, ProxyState};
