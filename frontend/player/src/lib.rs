use wasm_bindgen::prelude::*;

mod player;
mod playlist;
mod tracing_console;

#[wasm_bindgen(start, skip_typescript)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    tracing_console::set_as_global_default();

    Ok(())
}
