//! Tauri command-backed transport adapter.
//!
//! This adapter uses the bridge interop layer, which routes command calls to
//! the Tauri `invoke` API when available in desktop webview contexts.

use platform_ipc::{CommandError, CommandTransport, CommandTransportFuture};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Default)]
/// Desktop command transport backed by the Tauri `invoke` bridge.
pub struct TauriCommandTransport;

impl CommandTransport for TauriCommandTransport {
    fn invoke<'a>(
        &'a self,
        command: &'a str,
        args: &'a Value,
    ) -> CommandTransportFuture<'a, Result<Value, CommandError>> {
        Box::pin(async move { crate::bridge::invoke(command, args).await })
    }
}
