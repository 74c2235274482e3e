//! Device copies of scene resources, keyed by scene ids.

use super::helpers::{create_rgba_texture, create_uniform_buffer};
use crate::scene::{
    DrawGroup, Disposer, Geometry, GeometryId, Material, MaterialId, NodeId, Texture, TextureId,
};
use crate::uniforms::{interleave, MaterialUniform, NodeUniform};
use fnv::FnvHashMap;
use wgpu::util::DeviceExt;

pub(crate) struct GpuMesh {
    pub(crate) vertex: wgpu::Buffer,
    pub(crate) index: wgpu::Buffer,
    pub(crate) groups: Vec<DrawGroup>,
}

pub(crate) struct GpuMaterial {
    uniform: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
    pub(crate) double_sided: bool,
}

pub(crate) struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

pub(crate) struct NodeBinding {
    buffer: wgpu::Buffer,
    pub(crate) bind_group: wgpu::BindGroup,
}

#[derive(Default)]
pub struct GpuResources {
    pub(crate) meshes: FnvHashMap<GeometryId, GpuMesh>,
    pub(crate) materials: FnvHashMap<MaterialId, GpuMaterial>,
    pub(crate) textures: FnvHashMap<TextureId, GpuTexture>,
    pub(crate) nodes: FnvHashMap<NodeId, NodeBinding>,
}

impl GpuResources {
    pub(crate) fn upload_geometry(&mut self, device: &wgpu::Device, id: GeometryId, geo: &Geometry) {
        if self.meshes.contains_key(&id) || geo.indices.is_empty() {
            return;
        }
        let vertices = interleave(&geo.positions, &geo.normals, &geo.uvs);
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&geo.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let groups = if geo.groups.is_empty() {
            vec![DrawGroup {
                start: 0,
                count: geo.indices.len() as u32,
                material_index: 0,
            }]
        } else {
            geo.groups.clone()
        };
        self.meshes.insert(
            id,
            GpuMesh {
                vertex,
                index,
                groups,
            },
        );
    }

    pub(crate) fn upload_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        id: TextureId,
        tex: &Texture,
    ) {
        if self.textures.contains_key(&id) || tex.width == 0 || tex.height == 0 {
            return;
        }
        let (texture, view) =
            create_rgba_texture(device, queue, "map_texture", tex.width, tex.height, &tex.rgba);
        self.textures.insert(id, GpuTexture { texture, view });
    }

    /// Materials without an uploaded map bind `fallback_view`.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn upload_material(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        fallback_view: &wgpu::TextureView,
        id: MaterialId,
        mat: &Material,
    ) {
        if self.materials.contains_key(&id) {
            return;
        }
        let uniform = create_uniform_buffer(
            device,
            "material_uniforms",
            std::mem::size_of::<MaterialUniform>(),
        );
        let mut data = MaterialUniform::from(mat);
        let view = match mat.map.and_then(|t| self.textures.get(&t)) {
            Some(t) => &t.view,
            None => {
                data.flags[0] = 0.0;
                fallback_view
            }
        };
        queue.write_buffer(&uniform, 0, bytemuck::bytes_of(&data));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bg"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        self.materials.insert(
            id,
            GpuMaterial {
                uniform,
                bind_group,
                double_sided: mat.double_sided,
            },
        );
    }

    /// Write this frame's transform for `node`, creating its binding on first use.
    pub(crate) fn write_node(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        node: NodeId,
        data: &NodeUniform,
    ) {
        let binding = self.nodes.entry(node).or_insert_with(|| {
            let buffer =
                create_uniform_buffer(device, "node_uniforms", std::mem::size_of::<NodeUniform>());
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("node_bg"),
                layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });
            NodeBinding { buffer, bind_group }
        });
        queue.write_buffer(&binding.buffer, 0, bytemuck::bytes_of(data));
    }

    pub(crate) fn release_nodes(&mut self) {
        for (_, binding) in self.nodes.drain() {
            binding.buffer.destroy();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty() && self.materials.is_empty() && self.textures.is_empty()
    }
}

impl Disposer for GpuResources {
    fn dispose_geometry(&mut self, id: GeometryId) {
        if let Some(mesh) = self.meshes.remove(&id) {
            mesh.vertex.destroy();
            mesh.index.destroy();
        }
    }

    fn dispose_material(&mut self, id: MaterialId) {
        if let Some(mat) = self.materials.remove(&id) {
            mat.uniform.destroy();
        }
    }

    fn dispose_texture(&mut self, id: TextureId) {
        if let Some(tex) = self.textures.remove(&id) {
            tex.texture.destroy();
        }
    }
}
