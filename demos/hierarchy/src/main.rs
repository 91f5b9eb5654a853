use std::time::{Duration, Instant};

use log::info;
use sgraph::{Camera, Light, Node, NodeId, Object3D, Scene, SceneConfig, Vector3, color};

const FRAMES: u32 = 120;
const FRAME_TIME: Duration = Duration::from_millis(16);
const GRID_SIZE: usize = 15;

/// Three boxes chained together, each spinning relative to its parent.
struct Hierarchy {
    scene: Scene,
    camera: NodeId,
    cube_1: NodeId,
    cube_2: NodeId,
    cube_3: NodeId,
}

impl Hierarchy {
    fn new(aspect: f32) -> anyhow::Result<Self> {
        let mut scene = Scene::new(
            SceneConfig::default()
                .with_background_color(color::WHITE)
                .with_ambient_light([0.2, 0.2, 0.2]),
        );
        let light = scene.spawn(
            Node::light("Light", Light::point([0.8, 0.8, 0.8]))
                .with_position(Vector3::new(2.0, 2.0, 2.0)),
        );
        scene.add(light)?;

        let cube = |name: &str, rgb| -> anyhow::Result<Node> {
            Ok(Node::geometry(name, Object3D::cube(1.0, 1.0, 1.0)?.with_color(rgb)))
        };
        let cube_1 = scene.spawn(cube("Cube_1", [0.9, 0.5, 0.4])?);
        let cube_2 = scene.spawn(cube("Cube_2", [0.5, 0.9, 0.4])?);
        let cube_3 = scene.spawn(cube("Cube_3", [0.4, 0.5, 0.9])?);
        scene.attach(cube_1, cube_2)?;
        scene.attach(cube_2, cube_3)?;
        let mut graph = scene.graph_mut();
        graph.set_local_position(cube_2, Vector3::new(5.0, 0.0, 0.0))?;
        graph.set_local_position(cube_3, Vector3::new(0.0, 3.0, 0.0))?;
        scene.add(cube_1)?;

        let camera = scene.spawn(
            Node::camera("Camera", Camera::perspective(45.0, aspect, 0.01, 1000.0)?)
                .with_position(Vector3::new(0.0, 0.0, 30.0)),
        );

        Ok(Self {
            scene,
            camera,
            cube_1,
            cube_2,
            cube_3,
        })
    }

    fn update(&mut self, time: f32) -> anyhow::Result<()> {
        let rot = time * 100.0;
        let scale = time.sin().abs() + 1.0;
        let mut graph = self.scene.graph_mut();
        graph.set_local_euler_angles(self.cube_1, Vector3::new(0.0, rot, 0.0))?;
        graph.set_local_euler_angles(self.cube_2, Vector3::new(0.0, -rot, rot))?;
        graph.set_scale(self.cube_1, Vector3::new(scale, scale, scale))?;
        graph.set_scale(self.cube_2, Vector3::new(scale, scale, scale) * 0.5)?;
        graph.set_scale(self.cube_3, Vector3::new(scale, scale, scale))?;
        Ok(())
    }
}

/// A grid of small cubes with matrices computed once, viewed by a spinning camera.
struct Performance {
    scene: Scene,
    camera: NodeId,
}

impl Performance {
    fn new(aspect: f32) -> anyhow::Result<Self> {
        // matrices never change after setup, skip the per-frame walk
        let mut scene = Scene::new(
            SceneConfig::default()
                .with_background_color(color::WHITE)
                .with_auto_update(false),
        );
        let half = GRID_SIZE as f32 / 2.0;
        let light = scene.spawn(
            Node::light("Light", Light::point([0.8, 0.8, 0.8]))
                .with_position(Vector3::new(half, half, half)),
        );
        scene.add(light)?;

        for i in 0..GRID_SIZE {
            for j in 0..GRID_SIZE {
                for k in 0..GRID_SIZE {
                    let cube = scene.spawn(
                        Node::geometry(
                            format!("Cube({i}, {j}, {k})"),
                            Object3D::cube(0.3, 0.3, 0.3)?.with_color([0.9, 0.5, 0.4]),
                        )
                        .with_position(Vector3::new(i as f32, j as f32, k as f32)),
                    );
                    scene.add(cube)?;
                }
            }
        }
        scene.update_world_matrix()?;

        let camera = scene.spawn(
            Node::camera("Camera", Camera::perspective(45.0, aspect, 1.0, 1000.0)?)
                .with_position(Vector3::new(half - 0.5, half - 0.5, half - 0.5)),
        );
        Ok(Self { scene, camera })
    }

    fn update(&mut self, time: f32) -> anyhow::Result<()> {
        let rot = (time * 40.0) % 90.0;
        self.scene
            .graph_mut()
            .set_local_euler_angles(self.camera, Vector3::new(0.0, rot, 0.0))?;
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let aspect = 800.0 / 600.0;

    let mut hierarchy = Hierarchy::new(aspect)?;
    let mut performance = Performance::new(aspect)?;
    info!(
        "performance scene holds {} cubes",
        performance.scene.render_list().geometry.len()
    );

    let start = Instant::now();
    for frame in 0..FRAMES {
        let time = (frame * FRAME_TIME.as_millis() as u32) as f32 / 1000.0;

        hierarchy.update(time)?;
        let data = hierarchy.scene.frame(hierarchy.camera)?;
        if frame % 30 == 0 {
            let tip = hierarchy.scene.graph().node(hierarchy.cube_3)?;
            info!(
                "frame {frame}: cube_3 at {:?}, {} objects, {} bytes of object data",
                tip.world_position(),
                data.objects.len(),
                data.object_bytes().len()
            );
        }

        performance.update(time)?;
        let data = performance.scene.frame(performance.camera)?;
        if frame % 30 == 0 {
            info!(
                "frame {frame}: grid view_proj row 0 {:?}",
                data.camera.view_proj[0]
            );
        }
    }
    info!("rendered {} frames of both scenes in {:?}", FRAMES, start.elapsed());
    Ok(())
}
