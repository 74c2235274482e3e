//! CPU-side scene graph: nodes, geometry, materials, textures and lights.
//!
//! GPU copies of these resources live in the renderer and are keyed by the
//! ids handed out here. Teardown walks the graph and reports every resource to
//! a [`Disposer`] exactly once, even when several nodes share it.

use crate::constants::*;
use fnv::{FnvHashMap, FnvHashSet};
use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(pub u32);

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut bb = Aabb::new(first, first);
        for p in it {
            bb.min = bb.min.min(p);
            bb.max = bb.max.max(p);
        }
        Some(bb)
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Box enclosing the eight transformed corners.
    pub fn transformed(&self, m: &Mat4) -> Aabb {
        let (a, b) = (self.min, self.max);
        let corners = [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(b.x, b.y, b.z),
        ];
        // corners is never empty
        Aabb::from_points(corners.iter().map(|c| m.transform_point3(*c)))
            .unwrap_or(*self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

/// Index range drawn with one of the owning mesh's materials.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawGroup {
    pub start: u32,
    pub count: u32,
    pub material_index: usize,
}

/// Indexed triangle list. Attribute arrays share one length.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    pub groups: Vec<DrawGroup>,
}

impl Geometry {
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.positions.iter().map(|p| Vec3::from_array(*p)))
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    pub base_color: [f32; 4],
    pub map: Option<TextureId>,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            base_color: [1.0, 1.0, 1.0, 1.0],
            map: None,
            double_sided: false,
        }
    }
}

/// Decoded RGBA8 image.
#[derive(Clone, Debug)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// A node's renderable part. Most meshes carry a single material; multi-primitive
/// meshes carry one per draw group.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshRef {
    pub geometry: GeometryId,
    pub materials: SmallVec<[MaterialId; 1]>,
}

impl MeshRef {
    pub fn single(geometry: GeometryId, material: MaterialId) -> Self {
        let mut materials = SmallVec::new();
        materials.push(material);
        Self {
            geometry,
            materials,
        }
    }

    pub fn material_for(&self, group: &DrawGroup) -> Option<MaterialId> {
        self.materials
            .get(group.material_index)
            .or_else(|| self.materials.first())
            .copied()
    }
}

#[derive(Clone, Debug, Default)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub mesh: Option<MeshRef>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshRef) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    Ambient {
        color: [f32; 3],
        intensity: f32,
    },
    Directional {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
        target: Vec3,
        cast_shadow: bool,
    },
    Point {
        color: [f32; 3],
        intensity: f32,
        position: Vec3,
        decay: f32,
    },
}

/// Ambient fill, a shadow-casting key light and a back point light.
pub fn standard_lights() -> [Light; 3] {
    [
        Light::Ambient {
            color: LIGHT_COLOR,
            intensity: AMBIENT_INTENSITY,
        },
        Light::Directional {
            color: LIGHT_COLOR,
            intensity: DIRECTIONAL_INTENSITY,
            position: DIRECTIONAL_POSITION,
            target: Vec3::ZERO,
            cast_shadow: true,
        },
        Light::Point {
            color: LIGHT_COLOR,
            intensity: POINT_INTENSITY,
            position: POINT_POSITION,
            decay: POINT_DECAY,
        },
    ]
}

/// A loaded asset before it joins a scene. Ids inside are indices into this
/// asset's own vectors and are remapped by [`Scene::add_model`].
#[derive(Clone, Debug, Default)]
pub struct ModelAsset {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    pub geometries: Vec<Geometry>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
}

impl ModelAsset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_node(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn push_geometry(&mut self, geometry: Geometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() as u32 - 1)
    }

    pub fn push_material(&mut self, material: Material) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() as u32 - 1)
    }

    pub fn push_texture(&mut self, texture: Texture) -> TextureId {
        self.textures.push(texture);
        TextureId(self.textures.len() as u32 - 1)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }
}

/// Receives each GPU-backed resource once at teardown.
pub trait Disposer {
    fn dispose_geometry(&mut self, id: GeometryId);
    fn dispose_material(&mut self, id: MaterialId);
    fn dispose_texture(&mut self, id: TextureId);
}

/// For scenes whose resources never reached a device.
pub struct NoopDisposer;

impl Disposer for NoopDisposer {
    fn dispose_geometry(&mut self, _id: GeometryId) {}
    fn dispose_material(&mut self, _id: MaterialId) {}
    fn dispose_texture(&mut self, _id: TextureId) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DisposeReport {
    pub geometries: usize,
    pub materials: usize,
    pub textures: usize,
}

/// One mesh node ready to draw.
#[derive(Clone, Debug)]
pub struct DrawItem {
    pub node: NodeId,
    pub mesh: MeshRef,
    pub world: Mat4,
}

pub struct Scene {
    pub background: [f32; 3],
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    geometries: FnvHashMap<GeometryId, Geometry>,
    materials: FnvHashMap<MaterialId, Material>,
    textures: FnvHashMap<TextureId, Texture>,
    lights: Vec<Light>,
    next_resource: u32,
    revision: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(BACKGROUND_COLOR)
    }
}

impl Scene {
    pub fn new(background: [f32; 3]) -> Self {
        Self {
            background,
            nodes: Vec::new(),
            roots: Vec::new(),
            geometries: FnvHashMap::default(),
            materials: FnvHashMap::default(),
            textures: FnvHashMap::default(),
            lights: Vec::new(),
            next_resource: 0,
            revision: 0,
        }
    }

    /// Bumped whenever resources are added or dropped; the renderer uploads on change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn add_node(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.parent = parent;
        node.children.clear();
        self.nodes.push(node);
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_resource;
        self.next_resource += 1;
        self.revision += 1;
        id
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        let id = GeometryId(self.next_id());
        self.geometries.insert(id, geometry);
        id
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.next_id());
        self.materials.insert(id, material);
        id
    }

    pub fn add_texture(&mut self, texture: Texture) -> TextureId {
        let id = TextureId(self.next_id());
        self.textures.insert(id, texture);
        id
    }

    /// Attach an asset under a fresh group node and return that group.
    pub fn add_model(&mut self, asset: ModelAsset) -> NodeId {
        let ModelAsset {
            nodes,
            roots,
            geometries,
            materials,
            textures,
        } = asset;

        let texture_ids: Vec<TextureId> =
            textures.into_iter().map(|t| self.add_texture(t)).collect();
        let material_ids: Vec<MaterialId> = materials
            .into_iter()
            .map(|mut m| {
                m.map = m.map.and_then(|t| texture_ids.get(t.0 as usize).copied());
                self.add_material(m)
            })
            .collect();
        let geometry_ids: Vec<GeometryId> =
            geometries.into_iter().map(|g| self.add_geometry(g)).collect();

        let group = self.add_node(Node::new().with_name("model"), None);
        let mut stack: Vec<(NodeId, NodeId)> = roots.iter().rev().map(|r| (*r, group)).collect();
        while let Some((local, parent)) = stack.pop() {
            let Some(src) = nodes.get(local.0) else {
                continue;
            };
            let mut node = src.clone();
            node.mesh = src.mesh.as_ref().and_then(|mesh| {
                let geometry = geometry_ids.get(mesh.geometry.0 as usize).copied()?;
                let materials = mesh
                    .materials
                    .iter()
                    .filter_map(|m| material_ids.get(m.0 as usize).copied())
                    .collect();
                Some(MeshRef {
                    geometry,
                    materials,
                })
            });
            let id = self.add_node(node, Some(parent));
            for child in src.children.iter().rev() {
                stack.push((*child, id));
            }
        }
        group
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(&id)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn texture(&self, id: TextureId) -> Option<&Texture> {
        self.textures.get(&id)
    }

    pub fn geometries(&self) -> impl Iterator<Item = (GeometryId, &Geometry)> {
        self.geometries.iter().map(|(k, v)| (*k, v))
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter().map(|(k, v)| (*k, v))
    }

    pub fn textures(&self) -> impl Iterator<Item = (TextureId, &Texture)> {
        self.textures.iter().map(|(k, v)| (*k, v))
    }

    /// Spin a node about its parent's Y axis.
    pub fn rotate_y(&mut self, id: NodeId, angle: f32) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.transform.rotation =
                    (Quat::from_rotation_y(angle) * node.transform.rotation).normalize();
                true
            }
            None => false,
        }
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(node) = self.nodes.get(c.0) else {
                break;
            };
            m = node.transform.matrix() * m;
            cur = node.parent;
        }
        m
    }

    /// Depth-first walk from `root`, handing each node its world matrix.
    pub fn traverse(&self, root: NodeId, mut f: impl FnMut(NodeId, &Node, Mat4)) {
        let parent_world = self
            .node(root)
            .and_then(|n| n.parent)
            .map(|p| self.world_matrix(p))
            .unwrap_or(Mat4::IDENTITY);
        let mut stack = vec![(root, parent_world)];
        while let Some((id, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(id.0) else {
                continue;
            };
            let world = parent * node.transform.matrix();
            f(id, node, world);
            for child in node.children.iter().rev() {
                stack.push((*child, world));
            }
        }
    }

    /// World-space bounds of every mesh under `root`.
    pub fn world_bounds(&self, root: NodeId) -> Option<Aabb> {
        let mut bounds: Option<Aabb> = None;
        self.traverse(root, |_, node, world| {
            let Some(mesh) = &node.mesh else {
                return;
            };
            let Some(local) = self.geometries.get(&mesh.geometry).and_then(|g| g.bounds()) else {
                return;
            };
            let b = local.transformed(&world);
            bounds = Some(match bounds {
                Some(acc) => acc.union(&b),
                None => b,
            });
        });
        bounds
    }

    pub fn draw_items(&self) -> Vec<DrawItem> {
        let mut items = Vec::new();
        for root in &self.roots {
            self.traverse(*root, |id, node, world| {
                if let Some(mesh) = &node.mesh {
                    items.push(DrawItem {
                        node: id,
                        mesh: mesh.clone(),
                        world,
                    });
                }
            });
        }
        items
    }

    /// Release every geometry, material and texture map reachable from the
    /// graph, then drop the graph itself.
    pub fn dispose(&mut self, disposer: &mut dyn Disposer) -> DisposeReport {
        let mut geometries = FnvHashSet::default();
        let mut materials = FnvHashSet::default();
        let mut textures = FnvHashSet::default();
        for root in &self.roots {
            self.traverse(*root, |_, node, _| {
                let Some(mesh) = &node.mesh else {
                    return;
                };
                if geometries.insert(mesh.geometry) {
                    disposer.dispose_geometry(mesh.geometry);
                }
                for material in &mesh.materials {
                    if let Some(map) = self.materials.get(material).and_then(|m| m.map) {
                        if textures.insert(map) {
                            disposer.dispose_texture(map);
                        }
                    }
                    if materials.insert(*material) {
                        disposer.dispose_material(*material);
                    }
                }
            });
        }
        self.nodes.clear();
        self.roots.clear();
        self.geometries.clear();
        self.materials.clear();
        self.textures.clear();
        self.revision += 1;
        DisposeReport {
            geometries: geometries.len(),
            materials: materials.len(),
            textures: textures.len(),
        }
    }
}
