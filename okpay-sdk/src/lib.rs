//! Shared types and HTTP clients for okpay.
//!
//! The value types under [`objects`] and the URL builders in [`links`] are
//! I/O free. The typed HTTP clients live under `client` and are gated behind
//! the `client` cargo feature so consumers that only need the shared types do
//! not pull in `reqwest`.

#[cfg(feature = "client")]
pub mod client;
pub mod links;
pub mod objects;
