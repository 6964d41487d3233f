use platform_ipc::CommandError;
use serde_json::Value;

fn unsupported() -> CommandError {
    CommandError::transport("the Tauri IPC bridge is only available when compiled for wasm32")
}

pub async fn invoke(_command: &str, _args: &Value) -> Result<Value, CommandError> {
    Err(unsupported())
}
