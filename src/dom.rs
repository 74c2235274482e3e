use crate::camera::Viewport;
use crate::error::SiteError;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn js_error(context: &str, value: JsValue) -> SiteError {
    SiteError::Dom(format!("{}: {:?}", context, value))
}

pub fn element_by_id<T: JsCast>(document: &web::Document, id: &str) -> Result<T, SiteError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| SiteError::Dom(format!("missing #{}", id)))?
        .dyn_into::<T>()
        .map_err(|e| js_error(id, e.into()))
}

/// Current client size of the mount element and the device pixel ratio.
pub fn mount_viewport(mount: &web::HtmlElement) -> Viewport {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    Viewport::new(mount.client_width() as f64, mount.client_height() as f64, dpr)
}

/// Create the render canvas inside `mount`, stretched to fill it.
pub fn append_canvas(
    document: &web::Document,
    mount: &web::HtmlElement,
) -> Result<web::HtmlCanvasElement, SiteError> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| js_error("create canvas", e))?
        .dyn_into()
        .map_err(|e| js_error("canvas cast", e.into()))?;
    let style = canvas.style();
    _ = style.set_property("display", "block");
    _ = style.set_property("width", "100%");
    _ = style.set_property("height", "100%");
    _ = style.set_property("touch-action", "none");
    mount
        .append_child(&canvas)
        .map_err(|e| js_error("append canvas", e))?;
    Ok(canvas)
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, size: (u32, u32)) {
    canvas.set_width(size.0.max(1));
    canvas.set_height(size.1.max(1));
}
