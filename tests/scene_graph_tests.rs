//! Scene Graph Tests
//!
//! Tests for:
//! - Hierarchy construction (`add_child`), pre-order flattening, name lookup
//! - Eager world-matrix propagation under arbitrary local edits
//! - Transform observer notifications for lights and models
//! - Light direction/position derivation from world transforms
//! - World-aligned interactive edits (`NodeEdit`)

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use snowglobe::errors::ViewerError;
use snowglobe::renderer::UniformTable;
use snowglobe::resources::{Material, Mesh};
use snowglobe::scene::light::Light;
use snowglobe::scene::{
    LightKind, Node, NodeEdit, NodeHandle, NoopObserver, RenderObject, Scene, TransformObserver,
};

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y) && approx_eq(a.z, b.z)
}

fn mat4_approx(a: &Mat4, b: &Mat4) -> bool {
    a.abs_diff_eq(*b, EPSILON)
}

fn translation(m: &Mat4) -> Vec3 {
    m.w_axis.truncate()
}

fn model_node(name: &str, local: Mat4) -> Node {
    let object = RenderObject::new(Arc::new(Mesh::wire_box(Vec3::ONE)), Arc::new(Material::fallback()));
    Node::model(name, local, object)
}

/// root
/// ├── a
/// │   ├── a1
/// │   └── a2
/// └── b
///     └── b1
struct Fixture {
    scene: Scene,
    root: NodeHandle,
    a: NodeHandle,
    a1: NodeHandle,
    a2: NodeHandle,
    b: NodeHandle,
    b1: NodeHandle,
}

fn fixture() -> Fixture {
    let mut scene = Scene::new(Node::group("root", Mat4::IDENTITY));
    let root = scene.root();
    let a = scene
        .add_child(root, Node::group("a", Mat4::from_translation(Vec3::X)))
        .unwrap();
    let a1 = scene
        .add_child(a, model_node("a1", Mat4::from_rotation_y(FRAC_PI_2)))
        .unwrap();
    let a2 = scene
        .add_child(a, Node::group("a2", Mat4::from_scale(Vec3::splat(2.0))))
        .unwrap();
    let b = scene
        .add_child(root, Node::group("b", Mat4::from_translation(Vec3::Z)))
        .unwrap();
    let b1 = scene
        .add_child(b, Node::light("b1", Mat4::from_translation(Vec3::Y), Light::new_point(0, Vec3::ONE, 1.0)))
        .unwrap();
    Fixture {
        scene,
        root,
        a,
        a1,
        a2,
        b,
        b1,
    }
}

/// World matrix recomputed from scratch by walking parent links.
fn reference_world(scene: &Scene, handle: NodeHandle) -> Mat4 {
    let node = scene.get_node(handle).unwrap();
    let local = *node.local_transform();
    match node.parent() {
        Some(parent) => reference_world(scene, parent) * local,
        None => local,
    }
}

fn assert_consistent(scene: &Scene) {
    for handle in scene.flatten() {
        let cached = scene.world_transform(handle).unwrap();
        let expected = reference_world(scene, handle);
        assert!(mat4_approx(&cached, &expected), "stale world matrix on {handle:?}");
    }
}

#[derive(Default)]
struct Recorder {
    lights: Vec<(NodeHandle, Light)>,
    moved: Vec<NodeHandle>,
}

impl TransformObserver for Recorder {
    fn light_updated(&mut self, node: NodeHandle, light: &Light) {
        self.lights.push((node, light.clone()));
    }

    fn object_moved(&mut self, node: NodeHandle, _world: &Mat4) {
        self.moved.push(node);
    }
}

// ============================================================================
// Hierarchy
// ============================================================================

#[test]
fn add_child_links_both_sides() {
    let f = fixture();
    let a = f.scene.get_node(f.a).unwrap();
    assert_eq!(a.parent(), Some(f.root));
    assert_eq!(a.children(), &[f.a1, f.a2]);
    assert_eq!(f.scene.get_node(f.a1).unwrap().parent(), Some(f.a));
    assert_eq!(f.scene.get_node(f.root).unwrap().parent(), None);
    assert_eq!(f.scene.len(), 6);
}

#[test]
fn add_child_computes_the_initial_world_matrix() {
    let f = fixture();
    assert_consistent(&f.scene);
    let b1 = f.scene.world_transform(f.b1).unwrap();
    assert!(vec3_approx(translation(&b1), Vec3::new(0.0, 1.0, 1.0)));
}

#[test]
fn add_child_to_a_stale_handle_fails() {
    let mut scene = Scene::new(Node::group("root", Mat4::IDENTITY));
    let result = scene.add_child(NodeHandle::default(), Node::group("orphan", Mat4::IDENTITY));
    assert!(matches!(result, Err(ViewerError::InvalidHandle)));
    assert_eq!(scene.len(), 1);
}

#[test]
fn flatten_is_pre_order_with_children_in_insertion_order() {
    let f = fixture();
    assert_eq!(f.scene.flatten(), vec![f.root, f.a, f.a1, f.a2, f.b, f.b1]);
    assert_eq!(f.scene.flatten_from(f.b), vec![f.b, f.b1]);
}

#[test]
fn find_by_name_returns_the_first_pre_order_match() {
    let mut f = fixture();
    let dup = f.scene.add_child(f.b1, Node::group("a2", Mat4::IDENTITY)).unwrap();

    assert_eq!(f.scene.find_by_name("a1").unwrap(), f.a1);
    assert_eq!(f.scene.find_by_name("a2").unwrap(), f.a2);
    assert_ne!(f.scene.find_by_name("a2").unwrap(), dup);
}

#[test]
fn find_by_name_reports_missing_nodes() {
    let f = fixture();
    match f.scene.find_by_name("nope") {
        Err(ViewerError::NodeNotFound(name)) => assert_eq!(name, "nope"),
        other => panic!("expected NodeNotFound, got {other:?}"),
    }
}

// ============================================================================
// Propagation
// ============================================================================

#[test]
fn set_local_transform_updates_the_whole_subtree() {
    let mut f = fixture();
    let moved = Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0));
    f.scene.set_local_transform(f.a, moved, &mut NoopObserver).unwrap();

    assert_consistent(&f.scene);
    let a1 = f.scene.world_transform(f.a1).unwrap();
    assert!(vec3_approx(translation(&a1), Vec3::new(5.0, 0.0, 0.0)));
    // Sibling subtree untouched.
    let b1 = f.scene.world_transform(f.b1).unwrap();
    assert!(vec3_approx(translation(&b1), Vec3::new(0.0, 1.0, 1.0)));
}

#[test]
fn render_object_follows_its_node() {
    let mut f = fixture();
    f.scene
        .set_local_transform(f.root, Mat4::from_translation(Vec3::splat(3.0)), &mut NoopObserver)
        .unwrap();
    let node = f.scene.get_node(f.a1).unwrap();
    let object = node.object().unwrap();
    assert!(mat4_approx(object.model_matrix(), node.world_transform()));
}

#[test]
fn random_edits_keep_every_world_matrix_consistent() {
    let mut f = fixture();
    let handles = f.scene.flatten();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let target = handles[rng.random_range(0..handles.len())];
        let rotation = Quat::from_euler(
            glam::EulerRot::ZYX,
            rng.random_range(-3.0..3.0),
            rng.random_range(-3.0..3.0),
            rng.random_range(-3.0..3.0),
        );
        let local = Mat4::from_scale_rotation_translation(
            Vec3::splat(rng.random_range(0.5..1.5)),
            rotation,
            Vec3::new(
                rng.random_range(-2.0..2.0),
                rng.random_range(-2.0..2.0),
                rng.random_range(-2.0..2.0),
            ),
        );
        f.scene.set_local_transform(target, local, &mut NoopObserver).unwrap();
        assert_consistent(&f.scene);
    }
}

#[test]
fn set_local_transform_on_a_stale_handle_fails() {
    let mut f = fixture();
    let result = f.scene.set_local_transform(NodeHandle::default(), Mat4::IDENTITY, &mut NoopObserver);
    assert!(matches!(result, Err(ViewerError::InvalidHandle)));
}

// ============================================================================
// Observer & Lights
// ============================================================================

#[test]
fn observer_sees_every_light_and_model_in_the_edited_subtree() {
    let mut f = fixture();
    let mut recorder = Recorder::default();
    f.scene.refresh(&mut recorder);

    assert_eq!(recorder.lights.len(), 1);
    assert_eq!(recorder.lights[0].0, f.b1);
    assert_eq!(recorder.moved, vec![f.a1]);

    let mut recorder = Recorder::default();
    f.scene.set_local_transform(f.b, Mat4::IDENTITY, &mut recorder).unwrap();
    assert_eq!(recorder.lights.len(), 1);
    assert!(recorder.moved.is_empty());
}

#[test]
fn point_light_position_is_the_world_translation() {
    let mut f = fixture();
    let mut recorder = Recorder::default();
    f.scene
        .set_local_transform(f.b, Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)), &mut recorder)
        .unwrap();

    let (_, light) = &recorder.lights[0];
    match light.kind {
        LightKind::Point { position } => assert!(vec3_approx(position, Vec3::new(2.0, 1.0, 0.0))),
        other => panic!("expected a point light, got {other:?}"),
    }
}

#[test]
fn directional_light_follows_world_rotation() {
    let mut scene = Scene::new(Node::group("root", Mat4::from_rotation_x(FRAC_PI_2)));
    let root = scene.root();
    let sun = scene
        .add_child(root, Node::light("sun", Mat4::IDENTITY, Light::new_directional(0, Vec3::ONE, 1.0)))
        .unwrap();
    scene.refresh(&mut NoopObserver);

    let light = scene.get_node(sun).unwrap().light_data().unwrap();
    match light.kind {
        // Rotating -Y by +90° about X gives -Z.
        LightKind::Directional { direction } => assert!(vec3_approx(direction, Vec3::NEG_Z)),
        other => panic!("expected a directional light, got {other:?}"),
    }
}

#[test]
fn uniform_table_observer_mirrors_light_uniforms() {
    let mut f = fixture();
    let mut table = UniformTable::new();
    f.scene
        .set_local_transform(f.root, Mat4::from_translation(Vec3::X), &mut table)
        .unwrap();

    assert_eq!(table.get_vec3("u_lights_point[0].color"), Some(Vec3::ONE));
    assert_eq!(table.get_f32("u_lights_point[0].intensity"), Some(1.0));
    let position = table.get_vec3("u_lights_point[0].position").unwrap();
    assert!(vec3_approx(position, Vec3::new(1.0, 1.0, 1.0)));
}

#[test]
fn lights_are_listed_in_pre_order() {
    let mut f = fixture();
    let extra = f
        .scene
        .add_child(f.a2, Node::light("a2_light", Mat4::IDENTITY, Light::new_ambient(0, Vec3::ONE, 0.5)))
        .unwrap();
    let order: Vec<_> = f.scene.lights().map(|(h, _)| h).collect();
    assert_eq!(order, vec![extra, f.b1]);
}

// ============================================================================
// Interactive Edits
// ============================================================================

#[test]
fn translate_edit_moves_along_world_axes_under_a_rotated_parent() {
    let mut scene = Scene::new(Node::group("root", Mat4::from_rotation_y(FRAC_PI_2) * Mat4::from_scale(Vec3::splat(2.0))));
    let root = scene.root();
    let child = scene
        .add_child(root, Node::group("child", Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0))))
        .unwrap();

    let before = translation(&scene.world_transform(child).unwrap());
    scene
        .apply_edit(child, &NodeEdit::translate(Vec3::new(0.0, 0.0, 0.5)), &mut NoopObserver)
        .unwrap();
    let after = translation(&scene.world_transform(child).unwrap());

    assert!(vec3_approx(after - before, Vec3::new(0.0, 0.0, 0.5)));
    assert_consistent(&scene);
}

#[test]
fn rotate_edit_turns_about_a_world_axis_in_place() {
    let mut scene = Scene::new(Node::group("root", Mat4::from_rotation_x(FRAC_PI_4)));
    let root = scene.root();
    let child = scene
        .add_child(root, Node::group("child", Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0))))
        .unwrap();

    let before = scene.world_transform(child).unwrap();
    scene
        .apply_edit(child, &NodeEdit::rotate(Vec3::Y, FRAC_PI_2), &mut NoopObserver)
        .unwrap();
    let after = scene.world_transform(child).unwrap();

    assert!(vec3_approx(translation(&after), translation(&before)));
    let expected = Mat4::from_rotation_y(FRAC_PI_2) * Mat4::from_rotation_x(FRAC_PI_4);
    assert!(vec3_approx(after.x_axis.truncate(), expected.x_axis.truncate()));
    assert!(vec3_approx(after.y_axis.truncate(), expected.y_axis.truncate()));
}

#[test]
fn scale_edit_scales_about_the_node_origin() {
    let mut scene = Scene::new(Node::group("root", Mat4::IDENTITY));
    let root = scene.root();
    let child = scene
        .add_child(root, Node::group("child", Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))))
        .unwrap();

    scene.apply_edit(child, &NodeEdit::scale(2.0), &mut NoopObserver).unwrap();
    let world = scene.world_transform(child).unwrap();
    assert!(vec3_approx(translation(&world), Vec3::new(1.0, 2.0, 3.0)));
    assert!(approx_eq(world.x_axis.length(), 2.0));
}
