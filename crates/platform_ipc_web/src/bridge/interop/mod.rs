//! Shared transport interop for the webview command bridge.
//!
//! This module routes calls to target-specific implementations while
//! preserving a uniform API for the bridge module.

use platform_ipc::CommandError;
use serde_json::Value;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

pub async fn invoke(command: &str, args: &Value) -> Result<Value, CommandError> {
    imp::invoke(command, args).await
}
