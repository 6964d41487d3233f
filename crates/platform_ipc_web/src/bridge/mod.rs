//! Webview command bridge used by `platform_ipc_web` transport adapters.

mod interop;

use platform_ipc::CommandError;
use serde_json::Value;

pub(crate) async fn invoke(command: &str, args: &Value) -> Result<Value, CommandError> {
    interop::invoke(command, args).await
}
