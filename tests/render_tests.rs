//! Rendering Tests
//!
//! Drives the scene and viewer against the headless backend, which records
//! every upload, uniform and draw.
//!
//! Tests for:
//! - Shader program compilation
//! - Geometry upload (once per object, interleaved sizes)
//! - Draw order, shader selection and model matrices
//! - Texture unit binding
//! - Viewer frame: camera and light uniforms, skybox, particles, shake
//! - Camera interaction

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};
use snowglobe::assets::MemorySource;
use snowglobe::config::ViewerConfig;
use snowglobe::renderer::{DrawMode, HeadlessBackend, ShaderKind, ShaderSet, UniformValue};
use snowglobe::scene::{Camera, SceneManager};
use snowglobe::viewer::Viewer;

// ============================================================================
// Helpers
// ============================================================================

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

const SCENE: &str = r#"{
    "models": [
        { "name": "plain", "obj": "models/plain.obj" },
        { "name": "wood", "obj": "models/wood.obj" }
    ],
    "lights": [{ "name": "bulb", "type": "point", "color": [1, 0.5, 0], "intensity": 2 }],
    "scenegraph": {
        "name": "root",
        "children": [
            { "name": "a", "type": "model", "content": "plain",
              "transformation": { "translation": [1, 0, 0] } },
            { "name": "bulb", "type": "light", "content": "bulb",
              "transformation": { "translation": [0, 3, 0] } },
            { "name": "b", "type": "model", "content": "wood",
              "transformation": { "scale": [0.5, 0.5, 0.5] } }
        ]
    }
}"#;

fn assets() -> MemorySource {
    MemorySource::new()
        .with_file("scene.json", SCENE)
        .with_file(
            "models/plain.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .with_file(
            "models/wood.obj",
            "mtllib wood.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\nvt 1 0\nvt 0 1\nvn 0 0 1\n\
             usemtl wood\nf 1/1/1 2/2/1 3/3/1\n",
        )
        .with_file("models/wood.mtl", "newmtl wood\nKd 1 1 1\nmap_Kd wood.png\n")
}

fn loaded_manager() -> SceneManager {
    let mut manager = SceneManager::new();
    manager
        .load_file(&assets(), Path::new("scene.json"))
        .expect("scene loads");
    manager
}

fn sky_faces() -> [PathBuf; 6] {
    ["px", "nx", "py", "ny", "pz", "nz"].map(|f| PathBuf::from(format!("sky/{f}.png")))
}

// ============================================================================
// Shaders
// ============================================================================

#[test]
fn every_shader_kind_compiles() {
    let mut backend = HeadlessBackend::new();
    let shaders = ShaderSet::compile(&mut backend).unwrap();

    let handles: Vec<_> = ShaderKind::ALL.iter().map(|&k| shaders.get(k).unwrap()).collect();
    for (i, a) in handles.iter().enumerate() {
        for b in &handles[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn shader_sources_define_the_shared_uniforms() {
    let (vertex, fragment) = ShaderKind::Phong.sources();
    for name in ["u_m", "u_v", "u_p"] {
        assert!(vertex.contains(name), "mesh.vert lacks {name}");
    }
    assert!(fragment.contains("u_lights_point"));
    assert!(fragment.contains("u_material"));
}

// ============================================================================
// Scene Rendering
// ============================================================================

#[test]
fn nothing_is_drawn_before_upload() {
    let manager = loaded_manager();
    let mut backend = HeadlessBackend::new();
    let shaders = ShaderSet::compile(&mut backend).unwrap();

    manager.active_scene().unwrap().render(&mut backend, &shaders);
    assert!(backend.draws().is_empty());
}

#[test]
fn upload_happens_once_per_object() {
    let mut manager = loaded_manager();
    let mut backend = HeadlessBackend::new();
    let scene = manager.active_scene_mut().unwrap();

    // Two models and one light gizmo.
    assert_eq!(scene.upload(&mut backend), 3);
    assert_eq!(scene.upload(&mut backend), 0);
    assert_eq!(backend.geometry_count(), 3);
}

#[test]
fn geometry_records_interleaved_sizes() {
    let mut manager = loaded_manager();
    let mut backend = HeadlessBackend::new();
    let scene = manager.active_scene_mut().unwrap();
    scene.upload(&mut backend);

    let b = scene.find_by_name("b").unwrap();
    let geometry = scene.get_node(b).unwrap().object().unwrap().geometry().unwrap();
    let record = backend.geometry(geometry).unwrap();

    // position + normal + tangent + uv
    assert_eq!(record.stride_bytes, 11 * 4);
    assert_eq!(record.vertex_count, 3);
    assert_eq!(record.index_count, 3);
    assert_eq!(record.vertex_bytes, record.vertex_count * record.stride_bytes);
}

#[test]
fn models_and_gizmos_use_their_shaders() {
    let mut manager = loaded_manager();
    let mut backend = HeadlessBackend::new();
    let shaders = ShaderSet::compile(&mut backend).unwrap();
    let scene = manager.active_scene_mut().unwrap();
    scene.upload(&mut backend);
    scene.render(&mut backend, &shaders);

    let draws = backend.draws();
    assert_eq!(draws.len(), 3);

    let phong = shaders.get(ShaderKind::Phong);
    let gizmo = shaders.get(ShaderKind::Gizmo);
    // Pre-order: a, bulb, b.
    assert_eq!(draws[0].shader, phong);
    assert_eq!(draws[0].mode, DrawMode::Triangles);
    assert_eq!(draws[0].count, 6);
    assert_eq!(draws[1].shader, gizmo);
    assert_eq!(draws[1].mode, DrawMode::Lines);
    assert_eq!(draws[1].count, 24);
    assert_eq!(draws[2].shader, phong);

    let gizmo_uniforms = backend.uniforms(gizmo.unwrap()).unwrap();
    assert_eq!(gizmo_uniforms.get_vec3("u_color"), Some(Vec3::new(1.0, 0.5, 0.0)));
}

#[test]
fn draws_carry_world_matrices() {
    let mut manager = loaded_manager();
    let mut backend = HeadlessBackend::new();
    let shaders = ShaderSet::compile(&mut backend).unwrap();
    let scene = manager.active_scene_mut().unwrap();
    scene.upload(&mut backend);
    scene.render(&mut backend, &shaders);

    let draws = backend.draws();
    let a = draws[0].model_matrix.unwrap();
    assert!(a.abs_diff_eq(Mat4::from_translation(Vec3::X), EPSILON));
    let bulb = draws[1].model_matrix.unwrap();
    assert!(vec3_approx(bulb.w_axis.truncate(), Vec3::new(0.0, 3.0, 0.0)));
    let b = draws[2].model_matrix.unwrap();
    assert!(b.abs_diff_eq(Mat4::from_scale(Vec3::splat(0.5)), EPSILON));
}

#[test]
fn textured_models_bind_their_maps() {
    let mut manager = loaded_manager();
    let mut backend = HeadlessBackend::new();
    let shaders = ShaderSet::compile(&mut backend).unwrap();
    let scene = manager.active_scene_mut().unwrap();
    scene.upload(&mut backend);
    scene.render(&mut backend, &shaders);

    let b = scene.find_by_name("b").unwrap();
    let map = scene.get_node(b).unwrap().object().unwrap().material.map.unwrap();
    let draws = backend.draws();

    assert!(draws[0].textures.is_empty());
    assert_eq!(draws[2].textures, vec![(0, map)]);

    let phong = backend.uniforms(shaders.get(ShaderKind::Phong).unwrap()).unwrap();
    assert_eq!(phong.get("u_material.map_kD"), Some(UniformValue::Sampler(0)));
    assert_eq!(phong.get("u_material.has_map_kD"), Some(UniformValue::Bool(true)));
}

// ============================================================================
// Viewer Frame
// ============================================================================

#[test]
fn viewer_frame_writes_camera_and_light_uniforms() {
    let source = assets();
    let mut viewer = Viewer::new(ViewerConfig::default());
    viewer.load_scene(&source, Path::new("scene.json")).unwrap();
    let mut backend = HeadlessBackend::new();

    viewer.render(&mut backend).unwrap();

    let shaders = viewer.shaders().unwrap();
    let phong = backend.uniforms(shaders.get(ShaderKind::Phong).unwrap()).unwrap();
    assert_eq!(phong.get_mat4("u_v"), Some(viewer.camera().view_matrix()));
    assert_eq!(phong.get_vec3("u_eye"), Some(viewer.camera().eye));
    assert_eq!(phong.get_f32("u_lights_point[0].intensity"), Some(2.0));
    let position = phong.get_vec3("u_lights_point[0].position").unwrap();
    assert!(vec3_approx(position, Vec3::new(0.0, 3.0, 0.0)));
    assert_eq!(phong.get_f32("u_lights_point[1].intensity"), Some(0.0));

    let points = backend.uniforms(shaders.get(ShaderKind::Points).unwrap()).unwrap();
    assert_eq!(points.get_mat4("u_p"), Some(viewer.camera().projection_matrix()));
}

#[test]
fn viewer_without_scene_still_renders() {
    let mut viewer = Viewer::new(ViewerConfig::default());
    let mut backend = HeadlessBackend::new();
    viewer.render(&mut backend).unwrap();
    assert!(backend.draws().is_empty());
}

#[test]
fn skybox_draws_first_with_its_cube_map() {
    let source = assets();
    let mut viewer = Viewer::new(ViewerConfig::default());
    viewer.load_scene(&source, Path::new("scene.json")).unwrap();
    viewer.set_skybox(sky_faces());
    let mut backend = HeadlessBackend::new();

    viewer.render(&mut backend).unwrap();

    let shaders = viewer.shaders().unwrap();
    let sky = &backend.draws()[0];
    assert_eq!(sky.shader, shaders.get(ShaderKind::Skybox));
    assert_eq!(sky.count, 36);
    assert_eq!(sky.textures, vec![(0, viewer.skybox().unwrap().texture())]);

    let uniforms = backend.uniforms(shaders.get(ShaderKind::Skybox).unwrap()).unwrap();
    let view = uniforms.get_mat4("u_v").unwrap();
    assert_eq!(view.w_axis.truncate(), Vec3::ZERO);
}

#[test]
fn skybox_survives_scene_swaps() {
    let source = assets();
    let mut viewer = Viewer::new(ViewerConfig::default());
    viewer.set_skybox(sky_faces());
    viewer.load_scene(&source, Path::new("scene.json")).unwrap();
    viewer.load_scene(&source, Path::new("scene.json")).unwrap();

    let texture = viewer.skybox().unwrap().texture();
    assert!(viewer.scenes().textures().get(texture).is_some());
}

#[test]
fn replaced_skybox_releases_its_cube_map() {
    let source = assets();
    let mut viewer = Viewer::new(ViewerConfig::default());
    viewer.set_skybox(sky_faces());
    let first = viewer.skybox().unwrap().texture();

    let night = ["px", "nx", "py", "ny", "pz", "nz"].map(|f| PathBuf::from(format!("night/{f}.png")));
    viewer.set_skybox(night);
    let second = viewer.skybox().unwrap().texture();
    viewer.load_scene(&source, Path::new("scene.json")).unwrap();

    let textures = viewer.scenes().textures();
    assert!(textures.get(first).is_none());
    assert!(textures.get(second).unwrap().is_pinned());
}

#[test]
fn reapplying_the_same_skybox_keeps_it_pinned() {
    let source = assets();
    let mut viewer = Viewer::new(ViewerConfig::default());
    viewer.set_skybox(sky_faces());
    viewer.set_skybox(sky_faces());
    viewer.load_scene(&source, Path::new("scene.json")).unwrap();

    let texture = viewer.skybox().unwrap().texture();
    assert!(viewer.scenes().textures().get(texture).unwrap().is_pinned());
}

#[test]
fn particles_are_drawn_as_points() {
    let source = assets();
    let mut viewer = Viewer::new(ViewerConfig::default());
    let mut backend = HeadlessBackend::new();

    let stats = viewer.update(0.5, &source);
    assert_eq!(stats.particles_emitted, 3);
    assert_eq!(stats.particles_alive, 3);
    viewer.render(&mut backend).unwrap();

    let last = backend.draws().last().unwrap();
    assert_eq!(last.mode, DrawMode::Points);
    assert_eq!(last.count, 3);
    assert_eq!(last.shader, viewer.shaders().unwrap().get(ShaderKind::Points));
}

#[test]
fn update_decodes_textures_within_budget() {
    let source = assets();
    let mut viewer = Viewer::new(ViewerConfig::default());
    viewer.load_scene(&source, Path::new("scene.json")).unwrap();

    // wood.png is not in the source: it is processed and fails.
    let stats = viewer.update(0.016, &source);
    assert_eq!(stats.textures_decoded, 1);
    assert_eq!(viewer.scenes().textures().pending_count(), 0);
}

#[test]
fn shake_moves_the_globe_and_its_scene() {
    let source = assets();
    let mut viewer = Viewer::new(ViewerConfig::default());
    viewer.load_scene(&source, Path::new("scene.json")).unwrap();
    viewer.start_shake();

    for _ in 0..10 {
        assert!(viewer.update(0.05, &source).shaking);
    }

    let center = viewer.globe_center();
    assert_ne!(center, Vec3::ZERO);
    let scene = viewer.scenes().active_scene().unwrap();
    let root = scene.world_transform(scene.root()).unwrap();
    assert!(vec3_approx(root.w_axis.truncate(), center));
    assert!(vec3_approx(viewer.emitter().position, center + Vec3::Y));
}

#[test]
fn shake_ends_after_its_duration() {
    let source = MemorySource::new();
    let mut config = ViewerConfig::default();
    config.shake.duration = 0.1;
    let mut viewer = Viewer::new(config);
    viewer.start_shake();

    assert!(viewer.update(0.05, &source).shaking);
    assert!(viewer.update(0.05, &source).shaking);
    assert!(!viewer.update(0.05, &source).shaking);
    assert!(!viewer.shake().is_active());
}

// ============================================================================
// Camera
// ============================================================================

#[test]
fn orbit_keeps_distance_to_center() {
    let mut camera = Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
    camera.orbit(12.0, -7.0, 0.1);

    assert!((camera.eye.length() - 3.0).abs() < EPSILON);
    assert_ne!(camera.eye, Vec3::new(0.0, 0.0, 3.0));
    assert_eq!(camera.center, Vec3::ZERO);
}

#[test]
fn horizontal_orbit_rotates_about_world_y() {
    let mut camera = Camera::new(Vec3::new(0.0, 1.0, 3.0), Vec3::ZERO);
    camera.orbit(-9.0, 0.0, 1.0);

    // -10 * -9 = 90 degrees about +Y.
    assert!(vec3_approx(camera.eye, Vec3::new(3.0, 1.0, 0.0)));
}

#[test]
fn pan_moves_eye_and_center_together() {
    let mut camera = Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
    let offset = camera.eye - camera.center;
    camera.pan(4.0, 2.0, 0.5);

    assert!(vec3_approx(camera.eye - camera.center, offset));
    assert!(vec3_approx(camera.center, Vec3::new(-1.5, 0.75, 0.0)));
}

#[test]
fn zoom_moves_along_the_view_axis() {
    let mut camera = Camera::new(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
    camera.zoom(1.0, 0.5);
    assert!(vec3_approx(camera.eye, Vec3::new(0.0, 0.0, 2.5)));

    camera.zoom(-2.0, 0.5);
    assert!(vec3_approx(camera.eye, Vec3::new(0.0, 0.0, 3.5)));
}

#[test]
fn aspect_ignores_zero_height() {
    let mut camera = Camera::new(Vec3::Z, Vec3::ZERO);
    camera.set_aspect(800.0, 400.0);
    assert_eq!(camera.aspect, 2.0);
    camera.set_aspect(800.0, 0.0);
    assert_eq!(camera.aspect, 2.0);
}
