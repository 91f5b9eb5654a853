use sgraph::{Node, NodeId, Quaternion, SceneGraph, Vector3, math};

pub const TOLERANCE: f32 = 1e-4;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn assert_vec_close(actual: Vector3<f32>, expected: Vector3<f32>) {
    assert!(
        (actual.x - expected.x).abs() < TOLERANCE
            && (actual.y - expected.y).abs() < TOLERANCE
            && (actual.z - expected.z).abs() < TOLERANCE,
        "expected {:?}, got {:?}",
        expected,
        actual
    );
}

/// Euler angles in degrees, compared with a tolerance matching f32 trigonometry.
pub fn assert_angles_close(actual: Vector3<f32>, expected: Vector3<f32>) {
    let delta = actual - expected;
    assert!(
        delta.x.abs() < 1e-3 && delta.y.abs() < 1e-3 && delta.z.abs() < 1e-3,
        "expected angles {:?}, got {:?}",
        expected,
        actual
    );
}

pub fn assert_rotation_eq(actual: Quaternion<f32>, expected: Quaternion<f32>) {
    assert!(
        math::quaternions_are_equal(actual, expected, math::QUATERNION_EPSILON),
        "expected rotation {:?}, got {:?}",
        expected,
        actual
    );
}

/// Checks `world = parent.world (+) local` for every node of the subtree.
pub fn assert_hierarchy_consistent(graph: &SceneGraph, root: NodeId) {
    for id in graph.leaf_nodes(root).unwrap() {
        let node = graph.node(id).unwrap();
        match node.parent() {
            Some(parent) => {
                let parent = graph.node(parent).unwrap();
                assert_vec_close(
                    node.world_position(),
                    parent.world_position()
                        + math::rotate(parent.world_rotation(), node.local_position()),
                );
                assert_rotation_eq(
                    node.world_rotation(),
                    math::compose(parent.world_rotation(), node.local_rotation()),
                );
            }
            None => {
                assert_vec_close(node.world_position(), node.local_position());
                assert_rotation_eq(node.world_rotation(), node.local_rotation());
            }
        }
    }
}

/// root -> child_1, root -> child_2 -> {child_2_1, child_2_2}
pub struct Hierarchy {
    pub root: NodeId,
    pub child_1: NodeId,
    pub child_2: NodeId,
    pub child_2_1: NodeId,
    pub child_2_2: NodeId,
}

impl Hierarchy {
    pub fn build(graph: &mut SceneGraph) -> anyhow::Result<Self> {
        let root = graph.insert(Node::new("root"));
        let child_1 = graph.insert(Node::new("child_1"));
        let child_2 = graph.insert(Node::new("child_2"));
        let child_2_1 = graph.insert(Node::new("child_2_1"));
        let child_2_2 = graph.insert(Node::new("child_2_2"));
        graph.add(root, child_1)?;
        graph.add(root, child_2)?;
        graph.add(child_2, child_2_1)?;
        graph.add(child_2, child_2_2)?;
        Ok(Self {
            root,
            child_1,
            child_2,
            child_2_1,
            child_2_2,
        })
    }
}
