//! Platform abstraction layer
//!
//! Browser side of file handling:
//! - Reading a picked file as text
//! - Triggering a download of generated text

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Blob, BlobPropertyBag, File, HtmlAnchorElement, Url};

    /// Best-effort readable message from a JS exception
    pub fn js_error_message(err: &JsValue) -> String {
        if let Some(e) = err.dyn_ref::<js_sys::Error>() {
            return String::from(e.message());
        }
        err.as_string().unwrap_or_else(|| format!("{:?}", err))
    }

    /// Read the whole file as UTF-8 text
    pub async fn read_file_text(file: &File) -> Result<String, String> {
        let value = JsFuture::from(file.text())
            .await
            .map_err(|e| js_error_message(&e))?;
        value
            .as_string()
            .ok_or_else(|| "file contents were not text".to_string())
    }

    /// Offer `contents` as a download named `file_name`
    pub fn download_text(file_name: &str, contents: &str, mime: &str) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let parts = js_sys::Array::of1(&JsValue::from_str(contents));
        let props = BlobPropertyBag::new();
        props.set_type(mime);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &props)?;
        let href = Url::create_object_url_with_blob(&blob)?;

        let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        anchor.set_href(&href);
        anchor.set_download(file_name);
        anchor.click();

        Url::revoke_object_url(&href)
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::{download_text, js_error_message, read_file_text};
