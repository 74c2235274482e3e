//! glTF model assembly.
//!
//! Fetching is the web layer's job: it parses the document, asks
//! [`external_uris`] for the auxiliary files, downloads them into a
//! [`ResourceBundle`] and hands everything to [`build_model`]. GLB binary chunks
//! and base64 `data:` URIs are resolved here without any fetch.

use crate::error::{Result, SiteError};
use crate::scene::{
    DrawGroup, Geometry, Material, MaterialId, MeshRef, ModelAsset, Node, NodeId, Texture,
    TextureId, Transform,
};
use base64::Engine;
use fnv::FnvHashMap;
use glam::{Quat, Vec3};
use smallvec::SmallVec;
use std::borrow::Cow;

/// Auxiliary files keyed by the URI exactly as written in the document.
#[derive(Clone, Debug, Default)]
pub struct ResourceBundle {
    files: FnvHashMap<String, Vec<u8>>,
}

impl ResourceBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(uri.into(), bytes);
    }

    pub fn get(&self, uri: &str) -> Option<&[u8]> {
        self.files.get(uri).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Files fetched so far out of the total the model needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    loaded: usize,
    total: usize,
}

impl LoadProgress {
    pub fn new(total: usize) -> Self {
        Self { loaded: 0, total }
    }

    pub fn set_total(&mut self, total: usize) {
        self.total = total.max(self.loaded);
    }

    pub fn advance(&mut self) -> Self {
        self.loaded += 1;
        self.total = self.total.max(self.loaded);
        *self
    }

    pub fn loaded(&self) -> usize {
        self.loaded
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.loaded as f32 / self.total as f32 * 100.0
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.loaded >= self.total
    }
}

pub fn parse(bytes: &[u8]) -> Result<gltf::Gltf> {
    Ok(gltf::Gltf::from_slice(bytes)?)
}

/// Resolve `uri` against the directory of `base`. Absolute and data URIs pass through.
pub fn resolve_uri(base: &str, uri: &str) -> String {
    if uri.starts_with("data:") || uri.starts_with('/') || uri.contains("://") {
        return uri.to_string();
    }
    match base.rfind('/') {
        Some(i) => format!("{}{}", &base[..=i], uri),
        None => uri.to_string(),
    }
}

/// External buffers and images the document needs, in first-reference order.
pub fn external_uris(gltf: &gltf::Gltf) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |uri: &str| {
        if !uri.starts_with("data:") && !out.iter().any(|u| u == uri) {
            out.push(uri.to_string());
        }
    };
    for buffer in gltf.buffers() {
        if let gltf::buffer::Source::Uri(uri) = buffer.source() {
            push(uri);
        }
    }
    for image in gltf.images() {
        if let gltf::image::Source::Uri { uri, .. } = image.source() {
            push(uri);
        }
    }
    out
}

fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let (_, payload) = uri
        .split_once(";base64,")
        .ok_or_else(|| SiteError::MissingResource(format!("unsupported data uri: {:.40}", uri)))?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| SiteError::MissingResource(format!("bad base64 payload: {}", e)))
}

fn load_buffers(gltf: &gltf::Gltf, resources: &ResourceBundle) -> Result<Vec<Vec<u8>>> {
    gltf.buffers()
        .map(|buffer| {
            let data = match buffer.source() {
                gltf::buffer::Source::Bin => gltf.blob.clone().ok_or_else(|| {
                    SiteError::MissingResource("GLB binary chunk".to_string())
                })?,
                gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => decode_data_uri(uri)?,
                gltf::buffer::Source::Uri(uri) => resources
                    .get(uri)
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| SiteError::MissingResource(uri.to_string()))?,
            };
            if data.len() < buffer.length() {
                return Err(SiteError::MissingResource(format!(
                    "buffer {} holds {} of {} bytes",
                    buffer.index(),
                    data.len(),
                    buffer.length()
                )));
            }
            Ok(data)
        })
        .collect()
}

/// Smooth normals from triangle faces, for primitives that ship without them.
pub fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from_array(positions[a]);
        let pb = Vec3::from_array(positions[b]);
        let pc = Vec3::from_array(positions[c]);
        let n = (pb - pa).cross(pc - pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

/// Build a scene-ready asset from a parsed document and its fetched resources.
pub fn build_model(gltf: &gltf::Gltf, resources: &ResourceBundle) -> Result<ModelAsset> {
    let scene = gltf
        .default_scene()
        .or_else(|| gltf.scenes().next())
        .ok_or_else(|| SiteError::MissingResource("scene".to_string()))?;
    let mut builder = ModelBuilder {
        resources,
        buffers: load_buffers(gltf, resources)?,
        asset: ModelAsset::new(),
        textures: FnvHashMap::default(),
        materials: FnvHashMap::default(),
        meshes: FnvHashMap::default(),
    };
    for node in scene.nodes() {
        builder.node(node, None)?;
    }
    let asset = builder.asset;
    log::info!(
        "[model] nodes={} geometries={} materials={} textures={}",
        asset.nodes().len(),
        asset.geometries.len(),
        asset.materials.len(),
        asset.textures.len()
    );
    Ok(asset)
}

struct ModelBuilder<'a> {
    resources: &'a ResourceBundle,
    buffers: Vec<Vec<u8>>,
    asset: ModelAsset,
    textures: FnvHashMap<usize, TextureId>,
    materials: FnvHashMap<Option<usize>, MaterialId>,
    meshes: FnvHashMap<usize, Option<MeshRef>>,
}

impl<'a> ModelBuilder<'a> {
    fn node(&mut self, node: gltf::Node<'a>, parent: Option<NodeId>) -> Result<()> {
        let (t, r, s) = node.transform().decomposed();
        let transform = Transform {
            translation: Vec3::from_array(t),
            rotation: Quat::from_array(r),
            scale: Vec3::from_array(s),
        };
        let mut out = Node::new().with_transform(transform);
        if let Some(name) = node.name() {
            out = out.with_name(name);
        }
        if let Some(mesh) = node.mesh() {
            if let Some(mesh_ref) = self.mesh(mesh)? {
                out = out.with_mesh(mesh_ref);
            }
        }
        let id = self.asset.push_node(out, parent);
        for child in node.children() {
            self.node(child, Some(id))?;
        }
        Ok(())
    }

    /// Merge every triangle primitive of a mesh into one geometry with a draw
    /// group per primitive. Meshes shared between nodes share the geometry.
    fn mesh(&mut self, mesh: gltf::Mesh<'a>) -> Result<Option<MeshRef>> {
        if let Some(cached) = self.meshes.get(&mesh.index()) {
            return Ok(cached.clone());
        }
        let mut geometry = Geometry::default();
        let mut materials: SmallVec<[MaterialId; 1]> = SmallVec::new();
        for prim in mesh.primitives() {
            if prim.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "[model] mesh {} skips {:?} primitive",
                    mesh.index(),
                    prim.mode()
                );
                continue;
            }
            let buffers = &self.buffers;
            let reader = prim.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
            let Some(positions) = reader.read_positions() else {
                log::warn!("[model] mesh {} primitive without positions", mesh.index());
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let n = positions.len();
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|i| i.into_u32().collect())
                .unwrap_or_else(|| (0..n as u32).collect());
            let normals = reader
                .read_normals()
                .map(|it| it.collect::<Vec<_>>())
                .filter(|v| v.len() == n)
                .unwrap_or_else(|| compute_normals(&positions, &indices));
            let mut uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|tc| tc.into_f32().collect())
                .unwrap_or_default();
            uvs.resize(n, [0.0, 0.0]);

            let base = geometry.positions.len() as u32;
            let start = geometry.indices.len() as u32;
            geometry.indices.extend(indices.iter().map(|i| i + base));
            geometry.positions.extend(positions);
            geometry.normals.extend(normals);
            geometry.uvs.extend(uvs);

            let material = self.material(prim.material())?;
            let material_index = match materials.iter().position(|m| *m == material) {
                Some(i) => i,
                None => {
                    materials.push(material);
                    materials.len() - 1
                }
            };
            geometry.groups.push(DrawGroup {
                start,
                count: indices.len() as u32,
                material_index,
            });
        }
        let mesh_ref = if geometry.positions.is_empty() {
            None
        } else {
            Some(MeshRef {
                geometry: self.asset.push_geometry(geometry),
                materials,
            })
        };
        self.meshes.insert(mesh.index(), mesh_ref.clone());
        Ok(mesh_ref)
    }

    fn material(&mut self, material: gltf::Material<'a>) -> Result<MaterialId> {
        if let Some(id) = self.materials.get(&material.index()) {
            return Ok(*id);
        }
        let pbr = material.pbr_metallic_roughness();
        let map = match pbr.base_color_texture() {
            Some(info) => Some(self.texture(info.texture())?),
            None => None,
        };
        let id = self.asset.push_material(Material {
            name: material.name().map(str::to_string),
            base_color: pbr.base_color_factor(),
            map,
            double_sided: material.double_sided(),
        });
        self.materials.insert(material.index(), id);
        Ok(id)
    }

    fn texture(&mut self, texture: gltf::Texture<'a>) -> Result<TextureId> {
        let image = texture.source();
        if let Some(id) = self.textures.get(&image.index()) {
            return Ok(*id);
        }
        let bytes: Cow<[u8]> = match image.source() {
            gltf::image::Source::View { view, .. } => {
                let data = self
                    .buffers
                    .get(view.buffer().index())
                    .and_then(|b| b.get(view.offset()..view.offset() + view.length()))
                    .ok_or_else(|| {
                        SiteError::MissingResource(format!("image view {}", view.index()))
                    })?;
                Cow::Borrowed(data)
            }
            gltf::image::Source::Uri { uri, .. } if uri.starts_with("data:") => {
                Cow::Owned(decode_data_uri(uri)?)
            }
            gltf::image::Source::Uri { uri, .. } => Cow::Borrowed(
                self.resources
                    .get(uri)
                    .ok_or_else(|| SiteError::MissingResource(uri.to_string()))?,
            ),
        };
        let rgba = image::load_from_memory(&bytes)?.to_rgba8();
        let id = self.asset.push_texture(Texture {
            width: rgba.width(),
            height: rgba.height(),
            rgba: rgba.into_raw(),
        });
        self.textures.insert(image.index(), id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri_decodes_octet_stream_and_gltf_buffer() {
        let a = decode_data_uri("data:application/octet-stream;base64,AQID").unwrap();
        let b = decode_data_uri("data:application/gltf-buffer;base64,AQID").unwrap();
        assert_eq!(a, vec![1, 2, 3]);
        assert_eq!(a, b);
    }

    #[test]
    fn data_uri_without_base64_marker_is_rejected() {
        assert!(decode_data_uri("data:text/plain,hello").is_err());
    }
}
