//! Headless Snow Globe
//!
//! Loads the bundled snow globe scene, shakes it, and runs a few seconds of
//! simulation against the recording backend. Prints a summary of what a GPU
//! backend would have been asked to draw.
//!
//! Run with `RUST_LOG=debug` to see loader and texture output.

use std::path::{Path, PathBuf};

use anyhow::Context;
use snowglobe::prelude::*;

const FRAME_TIME: f32 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let assets = FileSource::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets"));
    let config = ViewerConfig::load(&assets, Path::new("viewer.json"))
        .context("reading viewer config")?;

    let mut viewer = Viewer::new(config);
    viewer
        .load_scene(&assets, Path::new("scenes/snowglobe.json"))
        .context("loading snow globe scene")?;
    viewer.set_skybox(["px", "nx", "py", "ny", "pz", "nz"].map(|face| PathBuf::from(format!("textures/sky_{face}.png"))));

    // A broken scene is reported and the globe stays as it was.
    if let Err(e) = viewer.load_scene(&assets, Path::new("scenes/bad_light.json")) {
        println!("rejected bad scene: {e}");
    }

    let scenes = viewer.scenes();
    let scene = scenes.active_scene().context("no scene after load")?;
    println!("scene: {} nodes", scene.len());
    for handle in scene.flatten() {
        if let Some(node) = scene.get_node(handle) {
            let position = node.world_transform().w_axis.truncate();
            println!("  {:<12} {:<6} at {position:.3}", node.name, node.kind.type_name());
        }
    }

    let mut backend = HeadlessBackend::new();
    viewer.start_shake();

    let mut emitted = 0;
    for frame in 0..240 {
        let stats = viewer.update(FRAME_TIME, &assets);
        emitted += stats.particles_emitted;

        backend.begin_frame();
        viewer.render(&mut backend)?;

        if frame % 60 == 0 {
            println!(
                "frame {frame:>3}: {} particles, {} draws, shaking: {}",
                stats.particles_alive,
                backend.draws().len(),
                stats.shaking
            );
        }
    }

    println!("emitted {emitted} particles, {} geometries uploaded", backend.geometry_count());
    println!("globe settled at {:.4}", viewer.globe_center());
    Ok(())
}
