use js_sys::Promise;
use platform_ipc::CommandError;
use serde::Serialize;
use serde_json::Value;
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

#[wasm_bindgen(inline_js = r#"
export async function jsCommandInvoke(command, args) {
  const internals = window.__TAURI_INTERNALS__;
  if (!internals || typeof internals.invoke !== 'function') {
    throw { kind: 'transport', message: 'Tauri IPC bridge is unavailable in this context' };
  }
  return await internals.invoke(command, args);
}
"#)]
extern "C" {
    #[wasm_bindgen(js_name = jsCommandInvoke)]
    fn js_command_invoke(command: &str, args: JsValue) -> Promise;
}

fn js_error_to_command_error(err: JsValue) -> CommandError {
    if let Some(text) = err.as_string() {
        return CommandError::from_wire(&Value::String(text));
    }
    if let Ok(wire) = from_value::<Value>(err.clone()) {
        if wire.is_object() || wire.is_string() {
            return CommandError::from_wire(&wire);
        }
    }
    if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
        if let Some(text) = message.as_string() {
            return CommandError::execution(text);
        }
    }
    CommandError::transport(format!("{err:?}"))
}

pub async fn invoke(command: &str, args: &Value) -> Result<Value, CommandError> {
    let args = args
        .serialize(&Serializer::json_compatible())
        .map_err(|e| CommandError::transport(e.to_string()))?;
    let value = JsFuture::from(js_command_invoke(command, args))
        .await
        .map_err(js_error_to_command_error)?;
    from_value(value).map_err(|e| CommandError::transport(e.to_string()))
}
