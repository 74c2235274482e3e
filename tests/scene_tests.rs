// Host-side tests for the scene graph and teardown accounting.

use glam::Vec3;
use rolling_soon_web::scene::*;

#[derive(Default)]
struct CountingDisposer {
    geometries: Vec<GeometryId>,
    materials: Vec<MaterialId>,
    textures: Vec<TextureId>,
}

impl Disposer for CountingDisposer {
    fn dispose_geometry(&mut self, id: GeometryId) {
        self.geometries.push(id);
    }
    fn dispose_material(&mut self, id: MaterialId) {
        self.materials.push(id);
    }
    fn dispose_texture(&mut self, id: TextureId) {
        self.textures.push(id);
    }
}

fn unit_box() -> Geometry {
    Geometry {
        positions: vec![[-1.0, -1.0, -1.0], [1.0, 1.0, 1.0]],
        ..Default::default()
    }
}

/// Parent and translated child sharing one geometry, one textured material.
fn shared_asset() -> ModelAsset {
    let mut asset = ModelAsset::new();
    let texture = asset.push_texture(Texture {
        width: 1,
        height: 1,
        rgba: vec![255; 4],
    });
    let material = asset.push_material(Material {
        map: Some(texture),
        ..Default::default()
    });
    let geometry = asset.push_geometry(unit_box());
    let mesh = MeshRef::single(geometry, material);
    let parent = asset.push_node(Node::new().with_name("body").with_mesh(mesh.clone()), None);
    let child = Node::new()
        .with_mesh(mesh)
        .with_transform(Transform {
            translation: Vec3::new(2.0, 0.0, 0.0),
            ..Default::default()
        });
    asset.push_node(child, Some(parent));
    asset
}

#[test]
fn add_model_remaps_ids_and_nests_under_group() {
    let mut scene = Scene::default();
    scene.add_geometry(unit_box());
    let group = scene.add_model(shared_asset());

    let group_node = scene.node(group).expect("group");
    assert_eq!(group_node.name.as_deref(), Some("model"));
    assert_eq!(group_node.children().len(), 1);

    let items = scene.draw_items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].mesh.geometry, items[1].mesh.geometry);
    assert_ne!(items[0].mesh.geometry, GeometryId(0));

    let material = scene.material(items[0].mesh.materials[0]).expect("material");
    let map = material.map.expect("map");
    assert!(scene.texture(map).is_some());
}

#[test]
fn world_bounds_follow_hierarchy() {
    let mut scene = Scene::default();
    let group = scene.add_model(shared_asset());
    let b = scene.world_bounds(group).expect("bounds");
    assert!((b.min - Vec3::new(-1.0, -1.0, -1.0)).length() < 1e-5);
    assert!((b.max - Vec3::new(3.0, 1.0, 1.0)).length() < 1e-5);
    assert!((b.center() - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
}

#[test]
fn rotate_y_spins_the_subtree() {
    let mut scene = Scene::default();
    let group = scene.add_model(shared_asset());
    assert!(scene.rotate_y(group, std::f32::consts::FRAC_PI_2));
    let b = scene.world_bounds(group).expect("bounds");
    assert!((b.min.z - -3.0).abs() < 1e-4);
    assert!((b.max.x - 1.0).abs() < 1e-4);
    assert!(!scene.rotate_y(NodeId(999), 1.0));
}

#[test]
fn shared_resources_dispose_once() {
    let mut scene = Scene::default();
    scene.add_model(shared_asset());
    let revision = scene.revision();
    let mut disposer = CountingDisposer::default();
    let report = scene.dispose(&mut disposer);

    assert_eq!(
        report,
        DisposeReport {
            geometries: 1,
            materials: 1,
            textures: 1
        }
    );
    assert_eq!(disposer.geometries.len(), 1);
    assert_eq!(disposer.materials.len(), 1);
    assert_eq!(disposer.textures.len(), 1);
    assert_eq!(scene.node_count(), 0);
    assert_eq!(scene.geometries().count(), 0);
    assert!(scene.draw_items().is_empty());
    assert!(scene.revision() > revision);
}

#[test]
fn multi_material_mesh_falls_back_to_first() {
    let mut materials = smallvec::SmallVec::new();
    materials.push(MaterialId(4));
    materials.push(MaterialId(9));
    let mesh = MeshRef {
        geometry: GeometryId(0),
        materials,
    };
    let group = |material_index| DrawGroup {
        start: 0,
        count: 3,
        material_index,
    };
    assert_eq!(mesh.material_for(&group(1)), Some(MaterialId(9)));
    assert_eq!(mesh.material_for(&group(5)), Some(MaterialId(4)));
}

#[test]
fn aabb_transform_encloses_corners() {
    let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
    let m = glam::Mat4::from_scale(Vec3::splat(2.0));
    let t = b.transformed(&m);
    assert_eq!(t.max, Vec3::splat(2.0));
    assert_eq!(Aabb::from_points(std::iter::empty()), None);
}
