use thiserror::Error;

/// Errors raised while assembling the page: DOM lookups, GPU setup and asset loading.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("dom: {0}")]
    Dom(String),
    #[error("gpu: {0}")]
    Gpu(String),
    #[error("fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("gltf: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
    #[error("missing resource: {0}")]
    MissingResource(String),
}

pub type Result<T, E = SiteError> = std::result::Result<T, E>;
