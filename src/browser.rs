//! Small wrappers over browser APIs used by the components.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

const REVOKE_DELAY_MS: i32 = 1_000;

/// Read a picked file fully into memory.
pub async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buf = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("Failed to read {}: {:?}", file.name(), e))?;
    Ok(js_sys::Uint8Array::new(&buf).to_vec())
}

/// Offer `text` as a file download.
pub fn download_text(filename: &str, text: &str, mime: &str) -> Result<(), String> {
    let parts = js_sys::Array::of1(&wasm_bindgen::JsValue::from_str(text));
    let opts = web_sys::BlobPropertyBag::new();
    opts.set_type(mime);
    let blob = web_sys::Blob::new_with_str_sequence_and_options(&parts, &opts)
        .map_err(|e| format!("Blob creation failed: {:?}", e))?;
    let url = web_sys::Url::create_object_url_with_blob(&blob)
        .map_err(|e| format!("Object URL failed: {:?}", e))?;

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or("No document")?;
    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")
        .map_err(|e| format!("{:?}", e))?
        .unchecked_into();
    anchor.set_href(&url);
    anchor.set_download(filename);
    anchor.click();
    revoke_later(url);
    Ok(())
}

/// Revoke an object URL once the browser has had time to start the download.
fn revoke_later(url: String) {
    let Some(win) = web_sys::window() else { return };
    let cb = wasm_bindgen::closure::Closure::once_into_js(move || {
        if let Err(e) = web_sys::Url::revoke_object_url(&url) {
            log::warn!("revoking {url} failed: {:?}", e);
        }
    });
    if let Err(e) =
        win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), REVOKE_DELAY_MS)
    {
        log::warn!("could not schedule object URL revoke: {:?}", e);
    }
}

pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

pub fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

pub fn input_from_event(ev: &web_sys::Event) -> Option<web_sys::HtmlInputElement> {
    ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
}

/// First file of an `<input type="file">` change event.
pub fn first_file(ev: &web_sys::Event) -> Option<web_sys::File> {
    input_from_event(ev)?.files()?.get(0)
}
