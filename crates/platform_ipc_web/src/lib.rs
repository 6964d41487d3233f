//! Browser (`wasm32`) implementation of the [`platform_ipc`] transport
//! contract.
//!
//! This crate is the concrete webview-side wiring for backend command
//! dispatch. The JS interop layer lives under `bridge/` behind a shared
//! `bridge::interop` wasm/non-wasm transport split, so the crate still
//! compiles (and its adapter fails with a transport error) off-wasm.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod bridge;
pub mod transport;

pub use transport::TauriCommandTransport;
