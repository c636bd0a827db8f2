use super::ExportError;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Destination for exported file content
pub trait FileSink {
    fn save(&self, content: &str, mime_type: &str, filename: &str) -> Result<(), ExportError>;
}

/// Saves files through a hidden `<a download>` element
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserDownload;

impl FileSink for BrowserDownload {
    fn save(&self, content: &str, mime_type: &str, filename: &str) -> Result<(), ExportError> {
        let blob = create_blob(content, mime_type).map_err(ExportError::Download)?;
        download_blob(&blob, filename).map_err(ExportError::Download)
    }
}

fn create_blob(content: &str, mime_type: &str) -> Result<Blob, String> {
    let parts = js_sys::Array::new();
    parts.push(&wasm_bindgen::JsValue::from_str(content));

    let properties = BlobPropertyBag::new();
    properties.set_type(mime_type);

    Blob::new_with_str_sequence_and_options(&parts, &properties)
        .map_err(|e| format!("Failed to create blob: {:?}", e))
}

/// Object URL lifecycle of one download
trait LinkDownload {
    fn create_url(&self) -> Result<String, String>;
    fn click(&self, url: &str, filename: &str) -> Result<(), String>;
    fn revoke_url(&self, url: &str) -> Result<(), String>;
}

/// Click through a fresh object URL; the URL is revoked even if the click failed
fn download_via<L: LinkDownload>(link: &L, filename: &str) -> Result<(), String> {
    let url = link.create_url()?;
    let clicked = link.click(&url, filename);
    let revoked = link.revoke_url(&url);
    clicked.and(revoked)
}

struct BlobLink<'a> {
    blob: &'a Blob,
    document: web_sys::Document,
    body: web_sys::HtmlElement,
}

impl LinkDownload for BlobLink<'_> {
    fn create_url(&self) -> Result<String, String> {
        Url::create_object_url_with_blob(self.blob)
            .map_err(|e| format!("Failed to create object URL: {:?}", e))
    }

    fn click(&self, url: &str, filename: &str) -> Result<(), String> {
        click_hidden_link(&self.document, &self.body, url, filename)
    }

    fn revoke_url(&self, url: &str) -> Result<(), String> {
        Url::revoke_object_url(url).map_err(|e| format!("Failed to revoke URL: {:?}", e))
    }
}

fn download_blob(blob: &Blob, filename: &str) -> Result<(), String> {
    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document object")?;
    let body = document.body().ok_or("No body element")?;

    download_via(
        &BlobLink {
            blob,
            document,
            body,
        },
        filename,
    )
}

fn click_hidden_link(
    document: &web_sys::Document,
    body: &web_sys::HtmlElement,
    url: &str,
    filename: &str,
) -> Result<(), String> {
    let anchor = document
        .create_element("a")
        .map_err(|e| format!("Failed to create anchor: {:?}", e))?
        .dyn_into::<HtmlAnchorElement>()
        .map_err(|e| format!("Failed to cast to anchor: {:?}", e))?;

    anchor.set_href(url);
    anchor.set_download(filename);
    anchor
        .style()
        .set_property("visibility", "hidden")
        .map_err(|e| format!("Failed to set style: {:?}", e))?;

    body.append_child(&anchor)
        .map_err(|e| format!("Failed to append anchor: {:?}", e))?;

    anchor.click();

    body.remove_child(&anchor)
        .map_err(|e| format!("Failed to remove anchor: {:?}", e))?;

    Ok(())
}
