use sgraph::{
    Camera, Node, Object3D, Projection, Scene, SceneError, SquareMatrix, Vector3, Vector4, color,
};

use crate::common::test_utils::{assert_vec_close, init_logger};

mod common;

#[test]
fn perspective_construction() -> anyhow::Result<()> {
    let camera = Camera::perspective(45.0, 1.0, 0.1, 100.0)?;
    assert_eq!(
        camera.projection(),
        Projection::Perspective {
            fov: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 100.0
        }
    );
    let fov = camera.fov_radians().unwrap_or_default();
    assert!((fov - std::f32::consts::FRAC_PI_4).abs() < 1e-6);

    let err = Camera::perspective(190.0, 1.0, 0.1, 100.0).unwrap_err();
    assert!(matches!(err, SceneError::InvalidParameter { .. }));
    assert!(err.to_string().contains("190"));
    Ok(())
}

#[test]
fn view_projection_maps_target_to_center() -> anyhow::Result<()> {
    init_logger();
    let mut scene = Scene::default();
    let cube = scene.spawn(
        Node::geometry("cube", Object3D::cube(1.0, 1.0, 1.0)?.with_color(color::ORANGE))
            .with_position(Vector3::new(0.0, 1.0, 0.0)),
    );
    scene.add(cube)?;

    let rig = scene.spawn(Node::new("rig").with_position(Vector3::new(0.0, 1.0, 0.0)));
    let camera = scene.spawn(
        Node::camera("camera", Camera::perspective(45.0, 16.0 / 9.0, 0.01, 1000.0)?)
            .with_position(Vector3::new(0.0, 1.0, 10.0)),
    );
    scene.add(rig)?;
    scene.attach(rig, camera)?;
    // orbit a quarter turn around the cube
    scene.graph_mut().rotate_y(rig, 90.0, sgraph::Space::Local)?;
    assert_vec_close(
        scene.graph().node(camera)?.world_position(),
        Vector3::new(10.0, 1.0, 0.0),
    );

    let frame = scene.frame(camera)?;
    let view_proj = sgraph::Matrix4::from(frame.camera.view_proj);
    let clip = view_proj * Vector4::new(0.0, 1.0, 0.0, 1.0);
    assert!(clip.x.abs() < 1e-4 && clip.y.abs() < 1e-4);
    assert!(clip.w > 0.0);
    assert!((frame.camera.view_position[0] - 10.0).abs() < 1e-4);
    assert_eq!(frame.objects.len(), 1);
    assert_eq!(frame.light, None);
    Ok(())
}

#[test]
fn orthographic_view_keeps_depth_linear() -> anyhow::Result<()> {
    let mut scene = Scene::default();
    let camera = scene.spawn(
        Node::camera("ortho", Camera::orthographic(-2.0, 2.0, 2.0, -2.0, 1.0, 11.0)?)
            .with_position(Vector3::new(0.0, 0.0, 6.0)),
    );
    let frame = scene.frame(camera)?;
    let view_proj = sgraph::Matrix4::from(frame.camera.view_proj);
    // the middle of the depth range lands on the middle of clip space
    let clip = view_proj * Vector4::new(1.0, -1.0, 0.0, 1.0);
    assert_vec_close(clip.truncate(), Vector3::new(0.5, -0.5, 0.0));
    assert!((clip.w - 1.0).abs() < 1e-6);
    assert!(view_proj.invert().is_some());
    Ok(())
}
