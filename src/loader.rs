use crate::error::SiteError;
use crate::model::{self, LoadProgress, ResourceBundle};
use crate::scene::ModelAsset;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn fetch_error(url: &str, reason: impl Into<String>) -> SiteError {
    SiteError::Fetch {
        url: url.to_string(),
        reason: reason.into(),
    }
}

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, SiteError> {
    let window = web::window().ok_or_else(|| fetch_error(url, "no window"))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| fetch_error(url, format!("{:?}", e)))?;
    let response: web::Response = response
        .dyn_into()
        .map_err(|_| fetch_error(url, "not a Response"))?;
    if !response.ok() {
        return Err(fetch_error(url, format!("HTTP {}", response.status())));
    }
    let buffer = response
        .array_buffer()
        .map_err(|e| fetch_error(url, format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| fetch_error(url, format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Fetch a glTF or GLB document plus the files it references and build the asset.
pub async fn load_model(url: &str) -> Result<ModelAsset, SiteError> {
    log::info!("[model] loading {}", url);
    let document = fetch_bytes(url).await?;
    let gltf = model::parse(&document)?;

    let uris = model::external_uris(&gltf);
    let mut progress = LoadProgress::new(uris.len() + 1);
    log::info!("[model] {:.0}% loaded", progress.advance().percent());

    let mut resources = ResourceBundle::new();
    for uri in uris {
        let resolved = model::resolve_uri(url, &uri);
        let bytes = fetch_bytes(&resolved).await?;
        resources.insert(uri, bytes);
        log::info!("[model] {:.0}% loaded", progress.advance().percent());
    }

    model::build_model(&gltf, &resources)
}
