use crate::camera::PerspectiveCamera;
use crate::constants::SHADOW_MAP_SIZE;
use crate::scene::{DrawItem, Scene};
use crate::uniforms::{NodeUniform, SceneGlobals};
use web_sys as web;

mod helpers;
mod pipelines;
mod resources;

use helpers::{create_depth_texture, create_rgba_texture, create_uniform_buffer};
use pipelines::{Layouts, Pipelines};
pub use resources::GpuResources;

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    layouts: Layouts,
    pipelines: Pipelines,

    globals_buffer: wgpu::Buffer,
    globals_bg: wgpu::BindGroup,
    shadow_globals_bg: wgpu::BindGroup,
    shadow_texture: wgpu::Texture,
    shadow_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    map_sampler: wgpu::Sampler,
    white_texture: wgpu::Texture,
    white_view: wgpu::TextureView,

    resources: GpuResources,
    synced_revision: Option<u64>,
    width: u32,
    height: u32,
}

impl GpuState {
    pub async fn new(canvas: &web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let layouts = Layouts::new(&device);
        let pipelines = Pipelines::new(&device, &layouts, format);

        let globals_buffer = create_uniform_buffer(
            &device,
            "scene_globals",
            std::mem::size_of::<SceneGlobals>(),
        );
        let (shadow_texture, shadow_view) = create_depth_texture(
            &device,
            "shadow_map",
            SHADOW_MAP_SIZE,
            SHADOW_MAP_SIZE,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        let map_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("map_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &layouts.globals,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });
        let shadow_globals_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_globals_bg"),
            layout: &layouts.shadow_globals,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let (depth_texture, depth_view) = create_depth_texture(
            &device,
            "depth",
            width,
            height,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let (white_texture, white_view) =
            create_rgba_texture(&device, &queue, "white_texture", 1, 1, &[255, 255, 255, 255]);

        log::info!("[gpu] ready {}x{} format={:?}", width, height, format);
        Ok(Self {
            surface,
            device,
            queue,
            config,
            layouts,
            pipelines,
            globals_buffer,
            globals_bg,
            shadow_globals_bg,
            shadow_texture,
            shadow_view,
            depth_texture,
            depth_view,
            map_sampler,
            white_texture,
            white_view,
            resources: GpuResources::default(),
            synced_revision: None,
            width,
            height,
        })
    }

    pub fn resources_mut(&mut self) -> &mut GpuResources {
        &mut self.resources
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 || (width == self.width && height == self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.reconfigure();
        self.depth_texture.destroy();
        let (tex, view) = create_depth_texture(
            &self.device,
            "depth",
            width,
            height,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        self.depth_texture = tex;
        self.depth_view = view;
    }

    /// Reapply the surface configuration after a lost or outdated frame.
    pub fn reconfigure(&mut self) {
        self.config.width = self.width;
        self.config.height = self.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Upload resources the scene gained since the last sync.
    fn sync_scene(&mut self, scene: &Scene) {
        if self.synced_revision == Some(scene.revision()) {
            return;
        }
        for (id, tex) in scene.textures() {
            self.resources
                .upload_texture(&self.device, &self.queue, id, tex);
        }
        for (id, mat) in scene.materials() {
            self.resources.upload_material(
                &self.device,
                &self.queue,
                &self.layouts.material,
                &self.map_sampler,
                &self.white_view,
                id,
                mat,
            );
        }
        for (id, geo) in scene.geometries() {
            self.resources.upload_geometry(&self.device, id, geo);
        }
        if scene.node_count() == 0 {
            self.resources.release_nodes();
        }
        self.synced_revision = Some(scene.revision());
    }

    pub fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
    ) -> Result<(), wgpu::SurfaceError> {
        self.sync_scene(scene);
        let globals = SceneGlobals::pack(camera, scene.lights());
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));
        let items = scene.draw_items();
        for item in &items {
            self.resources.write_node(
                &self.device,
                &self.queue,
                &self.layouts.node,
                item.node,
                &NodeUniform::from_world(item.world),
            );
        }

        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut spass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if globals.casts_shadow() {
                spass.set_pipeline(&self.pipelines.shadow);
                spass.set_bind_group(0, &self.shadow_globals_bg, &[]);
                self.draw_shadow_casters(&mut spass, &items);
            }
        }
        {
            let [r, g, b] = scene.background;
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bg, &[]);
            self.draw_meshes(&mut rpass, &items);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn draw_shadow_casters(&self, pass: &mut wgpu::RenderPass<'_>, items: &[DrawItem]) {
        for item in items {
            let (Some(mesh), Some(node)) = (
                self.resources.meshes.get(&item.mesh.geometry),
                self.resources.nodes.get(&item.node),
            ) else {
                continue;
            };
            pass.set_bind_group(1, &node.bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex.slice(..));
            pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint32);
            for group in &mesh.groups {
                pass.draw_indexed(group.start..group.start + group.count, 0, 0..1);
            }
        }
    }

    fn draw_meshes(&self, pass: &mut wgpu::RenderPass<'_>, items: &[DrawItem]) {
        for item in items {
            let (Some(mesh), Some(node)) = (
                self.resources.meshes.get(&item.mesh.geometry),
                self.resources.nodes.get(&item.node),
            ) else {
                continue;
            };
            pass.set_bind_group(1, &node.bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex.slice(..));
            pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint32);
            for group in &mesh.groups {
                let Some(material) = item
                    .mesh
                    .material_for(group)
                    .and_then(|id| self.resources.materials.get(&id))
                else {
                    continue;
                };
                pass.set_pipeline(if material.double_sided {
                    &self.pipelines.double_sided
                } else {
                    &self.pipelines.single_sided
                });
                pass.set_bind_group(2, &material.bind_group, &[]);
                pass.draw_indexed(group.start..group.start + group.count, 0, 0..1);
            }
        }
    }

    /// Release the remaining device objects. Scene resources should already
    /// have gone through [`GpuResources`] as a disposer.
    pub fn dispose(mut self) {
        if !self.resources.is_empty() {
            log::warn!("[gpu] disposing with scene resources still resident");
        }
        self.resources.release_nodes();
        self.globals_buffer.destroy();
        self.shadow_texture.destroy();
        self.depth_texture.destroy();
        self.white_texture.destroy();
        self.device.destroy();
        log::info!("[gpu] disposed");
    }
}
