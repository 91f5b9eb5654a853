use sgraph::{
    Camera, Light, Node, NodeId, Object3D, Scene, SceneConfig, SceneError, Space, Vector3, color,
};

use crate::common::test_utils::{assert_hierarchy_consistent, assert_vec_close, init_logger};

mod common;

fn cube(scene: &mut Scene, name: &str) -> anyhow::Result<NodeId> {
    Ok(scene.spawn(Node::geometry(name, Object3D::cube(1.0, 1.0, 1.0)?)))
}

fn point_light(scene: &mut Scene, name: &str) -> NodeId {
    scene.spawn(Node::light(name, Light::point(color::WHITE)))
}

#[test]
fn only_one_point_light_is_rendered() -> anyhow::Result<()> {
    init_logger();
    let mut scene = Scene::default();
    let cube = cube(&mut scene, "cube")?;
    let first = point_light(&mut scene, "first");
    let second = point_light(&mut scene, "second");

    scene.add(cube)?;
    scene.add(first)?;
    scene.add(second)?;

    assert_eq!(scene.render_list().geometry, vec![cube]);
    assert_eq!(scene.render_list().point_lights, vec![first]);
    assert_eq!(scene.inactive_point_lights(), &[second]);
    // the ignored light is still part of the graph
    assert_eq!(scene.graph().node(second)?.parent(), Some(scene.root()));

    scene.remove(second)?;
    assert!(scene.inactive_point_lights().is_empty());
    assert_eq!(scene.render_list().point_lights, vec![first]);
    Ok(())
}

#[test]
fn removed_node_leaves_scene() -> anyhow::Result<()> {
    init_logger();
    let mut scene = Scene::default();
    let cube = cube(&mut scene, "cube")?;
    scene.add(cube)?;
    scene.graph_mut().set_local_position(cube, Vector3::new(1.0, 2.0, 3.0))?;

    scene.remove(cube)?;

    let node = scene.graph().node(cube)?;
    assert!(node.parent().is_none());
    assert!(!scene.graph().node(scene.root())?.children().contains(&cube));
    assert!(scene.render_list().geometry.is_empty());
    assert!(!scene.contains(cube));
    assert_vec_close(node.local_position(), Vector3::new(1.0, 2.0, 3.0));

    assert!(matches!(scene.remove(cube), Err(SceneError::InvalidOperation(_))));
    Ok(())
}

#[test]
fn nested_subtrees_are_classified() -> anyhow::Result<()> {
    init_logger();
    let mut scene = Scene::default();
    let arm = scene.spawn(Node::new("arm"));
    let hand = cube(&mut scene, "hand")?;
    let lamp = point_light(&mut scene, "lamp");
    let eye = scene.spawn(Node::camera("eye", Camera::perspective(60.0, 1.0, 0.1, 50.0)?));
    scene.add(arm)?;
    scene.attach(arm, hand)?;
    scene.attach(hand, lamp)?;
    scene.attach(hand, eye)?;

    assert_eq!(scene.render_list().geometry, vec![hand]);
    assert_eq!(scene.render_list().point_lights, vec![lamp]);

    scene.graph_mut().rotate_y(arm, 45.0, Space::Local)?;
    assert_hierarchy_consistent(scene.graph(), scene.root());

    scene.detach(arm, hand)?;
    assert!(scene.render_list().geometry.is_empty());
    assert!(scene.render_list().point_lights.is_empty());
    // the subtree travels with its root
    assert_eq!(scene.graph().node(lamp)?.parent(), Some(hand));
    Ok(())
}

#[test]
fn failed_add_leaves_scene_untouched() -> anyhow::Result<()> {
    let mut scene = Scene::default();
    let group = scene.spawn(Node::new("group"));
    let cube = cube(&mut scene, "cube")?;
    let sun = scene.spawn(Node::light("sun", Light::directional(color::YELLOW)));
    scene.attach(group, cube)?;
    scene.attach(cube, sun)?;

    assert!(matches!(scene.add(group), Err(SceneError::NotImplemented(_))));
    assert!(scene.render_list().geometry.is_empty());
    assert!(scene.graph().node(scene.root())?.children().is_empty());

    let added = cube_in_scene(&mut scene)?;
    assert!(matches!(scene.add(added), Err(SceneError::InvalidOperation(_))));
    assert_eq!(scene.render_list().geometry, vec![added]);
    Ok(())
}

fn cube_in_scene(scene: &mut Scene) -> anyhow::Result<NodeId> {
    let id = cube(scene, "added")?;
    scene.add(id)?;
    Ok(id)
}

#[test]
fn frames_follow_removal_and_despawn() -> anyhow::Result<()> {
    init_logger();
    let mut scene = Scene::default();
    let camera = scene.spawn(Node::camera("camera", Camera::perspective(45.0, 1.0, 0.1, 100.0)?));
    let group = scene.spawn(Node::new("group"));
    let a = cube(&mut scene, "a")?;
    let b = cube(&mut scene, "b")?;
    scene.attach(group, a)?;
    scene.add(group)?;
    scene.add(b)?;
    assert_eq!(scene.frame(camera)?.objects.len(), 2);

    scene.detach(group, a)?;
    assert_eq!(scene.render_list().geometry, vec![b]);
    assert_eq!(scene.frame(camera)?.objects.len(), 1);

    assert!(matches!(scene.despawn(b), Err(SceneError::InvalidOperation(_))));
    scene.despawn(a)?;
    scene.remove(b)?;
    scene.despawn(b)?;
    assert!(!scene.graph().contains(b));

    let frame = scene.frame(camera)?;
    assert!(frame.objects.is_empty());
    assert!(frame.object_bytes().is_empty());
    Ok(())
}

#[test]
fn clear_detaches_direct_children() -> anyhow::Result<()> {
    let mut scene = Scene::default();
    let group = scene.spawn(Node::new("group"));
    let a = cube(&mut scene, "a")?;
    let b = cube(&mut scene, "b")?;
    let light = point_light(&mut scene, "light");
    scene.attach(group, a)?;
    scene.add(group)?;
    scene.add(b)?;
    scene.add(light)?;

    scene.clear()?;

    assert!(scene.render_list().geometry.is_empty());
    assert!(scene.render_list().point_lights.is_empty());
    assert!(scene.graph().node(scene.root())?.children().is_empty());
    for id in [group, b, light] {
        assert!(scene.graph().node(id)?.parent().is_none());
    }
    assert_eq!(scene.graph().node(a)?.parent(), Some(group));

    scene.add(b)?;
    assert_eq!(scene.render_list().geometry, vec![b]);
    Ok(())
}

#[test]
fn config_builder() {
    let config = SceneConfig::default()
        .with_background_color(color::WHITE)
        .with_ambient_light([0.1, 0.1, 0.1])
        .with_auto_update(false);
    let scene = Scene::new(config);
    assert_eq!(scene.config().background_color, color::WHITE);
    assert_eq!(scene.config().ambient_light, [0.1, 0.1, 0.1]);
    assert!(!scene.config().auto_update);
    assert_eq!(scene.graph().node(scene.root()).map(|n| n.name().to_string()), Ok("Scene".to_string()));
}
