//! Nodes of the scene graph.
//!
//! A [`Node`] is plain data: its transforms, its place in the hierarchy and a
//! payload decided at construction ([`NodeKind`]). All hierarchy aware
//! mutation goes through [`SceneGraph`](super::scene_graph::SceneGraph), which
//! keeps world transforms consistent with the parent chain.

use std::{cell::Cell, fmt};

use cgmath::{Matrix4, Quaternion, SquareMatrix, Vector3};

use crate::{
    camera::Camera,
    color::Color,
    data_structures::{
        light::Light,
        object::Object3D,
        transform::{compose_matrix, Transform},
    },
    error::Result,
    math::{self, AngleBounds},
};

/// Handle of a node inside its [`SceneGraph`](super::scene_graph::SceneGraph).
///
/// Carries the id of the graph that issued it, so a handle from one graph is
/// never resolved against another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub(crate) graph: u64,
    pub(crate) index: u64,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

/// What a node is. Decided at construction, the payload may be edited later.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Group,
    Geometry(Object3D),
    Light(Light),
    Camera(Camera),
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Group => "group",
            NodeKind::Geometry(_) => "geometry",
            NodeKind::Light(Light::Point(_)) => "point light",
            NodeKind::Light(Light::Directional(_)) => "directional light",
            NodeKind::Camera(_) => "camera",
        }
    }
}

/// State of the cached local matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatrixState {
    Clean,
    Dirty,
}

/// Frame an axis rotation is applied in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Space {
    /// About the node's own axes.
    Local,
    /// About the global axes.
    World,
}

#[derive(Clone, Debug)]
pub struct Node {
    name: String,
    kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) local: Transform,
    pub(crate) world_position: Vector3<f32>,
    pub(crate) world_rotation: Quaternion<f32>,
    pub(crate) world_matrix: Matrix4<f32>,
    local_matrix: Cell<Matrix4<f32>>,
    matrix_state: Cell<MatrixState>,
}

impl Node {
    /// A standalone group node at the origin.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Group)
    }

    pub fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        let local = Transform::new();
        Self {
            name: name.into(),
            kind,
            parent: None,
            children: Vec::new(),
            local,
            world_position: local.position,
            world_rotation: local.rotation,
            world_matrix: Matrix4::identity(),
            local_matrix: Cell::new(Matrix4::identity()),
            matrix_state: Cell::new(MatrixState::Clean),
        }
    }

    pub fn geometry(name: impl Into<String>, object: Object3D) -> Self {
        Self::with_kind(name, NodeKind::Geometry(object))
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::with_kind(name, NodeKind::Light(light))
    }

    pub fn camera(name: impl Into<String>, camera: Camera) -> Self {
        Self::with_kind(name, NodeKind::Camera(camera))
    }

    // Builders for standalone nodes, where local and world coincide.

    pub fn with_position(mut self, position: Vector3<f32>) -> Self {
        self.local.position = position;
        self.world_position = position;
        self.mark_dirty();
        self
    }

    /// The rotation is stored normalized, a zero or non-finite quaternion is
    /// rejected.
    pub fn with_rotation(mut self, rotation: Quaternion<f32>) -> Result<Self> {
        let rotation = math::normalize_rotation(rotation)?;
        self.local.rotation = rotation;
        self.world_rotation = rotation;
        self.mark_dirty();
        Ok(self)
    }

    /// YZX Euler angles in degrees.
    pub fn with_euler_angles(self, degrees: Vector3<f32>) -> Result<Self> {
        for angle in [degrees.x, degrees.y, degrees.z] {
            AngleBounds::ROTATION.check(angle, "euler angle")?;
        }
        self.with_rotation(math::from_euler(degrees))
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.local.scale = scale;
        self.mark_dirty();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn local_position(&self) -> Vector3<f32> {
        self.local.position
    }

    pub fn world_position(&self) -> Vector3<f32> {
        self.world_position
    }

    pub fn local_rotation(&self) -> Quaternion<f32> {
        self.local.rotation
    }

    pub fn world_rotation(&self) -> Quaternion<f32> {
        self.world_rotation
    }

    pub fn local_euler_angles(&self) -> Vector3<f32> {
        math::to_euler(self.local.rotation)
    }

    pub fn world_euler_angles(&self) -> Vector3<f32> {
        math::to_euler(self.world_rotation)
    }

    pub fn scale(&self) -> Vector3<f32> {
        self.local.scale
    }

    pub fn local_transform(&self) -> Transform {
        self.local
    }

    pub fn world_transform(&self) -> Transform {
        Transform {
            position: self.world_position,
            rotation: self.world_rotation,
            scale: self.local.scale,
        }
    }

    /// `T * R * S` of the local transform, recomputed only after a mutation.
    pub fn local_matrix(&self) -> Matrix4<f32> {
        if self.matrix_state.get() == MatrixState::Dirty {
            self.local_matrix.set(compose_matrix(
                self.local.position,
                self.local.rotation,
                self.local.scale,
            ));
            self.matrix_state.set(MatrixState::Clean);
        }
        self.local_matrix.get()
    }

    /// World matrix as of the last `update_world_matrix` walk.
    pub fn world_matrix(&self) -> Matrix4<f32> {
        self.world_matrix
    }

    pub fn matrix_state(&self) -> MatrixState {
        self.matrix_state.get()
    }

    pub(crate) fn mark_dirty(&self) {
        self.matrix_state.set(MatrixState::Dirty);
    }

    pub fn object(&self) -> Option<&Object3D> {
        match &self.kind {
            NodeKind::Geometry(object) => Some(object),
            _ => None,
        }
    }

    pub fn object_mut(&mut self) -> Option<&mut Object3D> {
        match &mut self.kind {
            NodeKind::Geometry(object) => Some(object),
            _ => None,
        }
    }

    pub fn light_source(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn light_source_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn camera_payload(&self) -> Option<&Camera> {
        match &self.kind {
            NodeKind::Camera(camera) => Some(camera),
            _ => None,
        }
    }

    /// Color of geometry and lights.
    pub fn color(&self) -> Option<Color> {
        match &self.kind {
            NodeKind::Geometry(object) => Some(object.color),
            NodeKind::Light(light) => Some(light.color()),
            _ => None,
        }
    }

    /// Bounding extent of geometry.
    pub fn size(&self) -> Option<Vector3<f32>> {
        self.object().map(Object3D::size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    use crate::color;

    #[test]
    fn new_node_is_identity() {
        let node = Node::new("node");
        assert_eq!(node.name(), "node");
        assert!(node.parent().is_none());
        assert!(node.children().is_empty());
        assert_eq!(node.local_position(), Vector3::new(0.0, 0.0, 0.0));
        assert_eq!(node.scale(), Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(node.world_rotation(), math::quat(0.0, 0.0, 0.0, 1.0));
        assert_eq!(node.local_matrix(), Matrix4::identity());
    }

    #[test]
    fn local_matrix_is_cached_until_mutation() {
        let node = Node::new("node").with_position(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(node.matrix_state(), MatrixState::Dirty);
        let first = node.local_matrix();
        assert_eq!(node.matrix_state(), MatrixState::Clean);
        assert_eq!(first, node.local_matrix());
        assert_eq!(first.w.truncate(), Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn builder_rotation_is_normalized() {
        let node = Node::new("node")
            .with_rotation(math::quat(0.0, 0.0, 1.0, 1.0))
            .unwrap();
        assert!((node.world_rotation().magnitude2() - 1.0).abs() < 1e-6);
        let origin = node.local_matrix() * cgmath::Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!((origin.x - 0.0).abs() < 1e-5 && (origin.y - 1.0).abs() < 1e-5);

        assert!(Node::new("zero").with_rotation(math::quat(0.0, 0.0, 0.0, 0.0)).is_err());
        assert!(Node::new("nan").with_euler_angles(Vector3::new(f32::NAN, 0.0, 0.0)).is_err());
    }

    #[test]
    fn payload_accessors() {
        let cube = Node::geometry(
            "cube",
            Object3D::cube(1.0, 1.0, 1.0).unwrap().with_color(color::RED),
        );
        assert_eq!(cube.color(), Some(color::RED));
        assert_eq!(cube.size(), Some(Vector3::new(1.0, 1.0, 1.0)));
        assert_eq!(cube.kind().label(), "geometry");

        let mut light = Node::light("light", Light::point(color::WHITE));
        assert!(light.size().is_none());
        if let Some(Light::Point(point)) = light.light_source_mut() {
            point.color = color::BLUE;
        }
        assert_eq!(light.color(), Some(color::BLUE));
    }
}
