//! The root of a renderable scene.
//!
//! A [`Scene`] owns a [`SceneGraph`] with a distinguished root node. Every
//! subtree added below the root is classified node by node into the lists a
//! renderer consumes ([`RenderList`]): geometry and point lights. Groups and
//! cameras are structural and never listed.
//!
//! Only one point light can be rendered. Further point lights are kept in an
//! inactive list with a warning and are never rendered.
//!
//! The graph is only handed out mutably as a [`TransformsMut`], which edits
//! transforms and payloads but not the hierarchy. Structural edits go through
//! the scene so the render list always matches the tree.

use std::ops::Deref;

use cgmath::{Quaternion, Vector3};
use log::{debug, warn};

use crate::{
    color::{self, Color},
    data_structures::{
        light::Light,
        node::{Node, NodeId, NodeKind, Space},
        object::Object3D,
        scene_graph::SceneGraph,
    },
    error::{Result, SceneError},
};

/// Scene wide settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    pub background_color: Color,
    pub ambient_light: Color,
    /// Recompute world matrices on every [`Scene::update`]. When disabled the
    /// caller must run [`Scene::update_world_matrix`] after mutations.
    pub auto_update: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            background_color: color::BLACK,
            ambient_light: [0.2, 0.2, 0.2],
            auto_update: true,
        }
    }
}

impl SceneConfig {
    pub fn with_background_color(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_ambient_light(mut self, color: Color) -> Self {
        self.ambient_light = color;
        self
    }

    pub fn with_auto_update(mut self, auto_update: bool) -> Self {
        self.auto_update = auto_update;
        self
    }
}

/// Nodes a renderer draws, in the order they were added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderList {
    pub geometry: Vec<NodeId>,
    pub point_lights: Vec<NodeId>,
}

enum Listing {
    Geometry,
    PointLight,
    Unlisted,
}

fn listing(node: &Node) -> Result<Listing> {
    match node.kind() {
        NodeKind::Geometry(_) => Ok(Listing::Geometry),
        NodeKind::Light(Light::Point(_)) => Ok(Listing::PointLight),
        NodeKind::Group | NodeKind::Camera(_) => Ok(Listing::Unlisted),
        NodeKind::Light(Light::Directional(_)) => Err(SceneError::NotImplemented(format!(
            "node '{}' is a {}, scenes only render point lights",
            node.name(),
            node.kind().label()
        ))),
    }
}

#[derive(Debug)]
pub struct Scene {
    graph: SceneGraph,
    root: NodeId,
    config: SceneConfig,
    render_list: RenderList,
    inactive_point_lights: Vec<NodeId>,
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Node::new("Scene"));
        Self {
            graph,
            root,
            config,
            render_list: RenderList::default(),
            inactive_point_lights: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Transform setters and payload edits. The hierarchy can't be changed
    /// through the returned handle:
    ///
    /// ```compile_fail
    /// use sgraph::{Node, Scene};
    ///
    /// let mut scene = Scene::default();
    /// let a = scene.spawn(Node::new("a"));
    /// let b = scene.spawn(Node::new("b"));
    /// scene.graph_mut().add(a, b).unwrap();
    /// ```
    pub fn graph_mut(&mut self) -> TransformsMut<'_> {
        TransformsMut {
            graph: &mut self.graph,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SceneConfig {
        &mut self.config
    }

    pub fn render_list(&self) -> &RenderList {
        &self.render_list
    }

    /// Point lights beyond the first, never rendered.
    pub fn inactive_point_lights(&self) -> &[NodeId] {
        &self.inactive_point_lights
    }

    /// Insert a standalone node into the scene's graph without attaching it.
    pub fn spawn(&mut self, node: Node) -> NodeId {
        self.graph.insert(node)
    }

    /// Whether `id` is attached below the root.
    pub fn contains(&self, id: NodeId) -> bool {
        self.graph.is_ancestor(self.root, id)
    }

    /// Attach `node` and its subtree below the root.
    pub fn add(&mut self, node: NodeId) -> Result<()> {
        self.attach(self.root, node)
    }

    /// Attach `child` and its subtree below `parent`.
    ///
    /// When `parent` is part of the scene the subtree is classified into the
    /// render list. Otherwise this only builds a detached subtree. Nothing
    /// changes when an error is returned.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.graph.validate_add(parent, child)?;
        if child == self.root {
            return Err(SceneError::InvalidOperation(format!(
                "the scene root {} cannot be attached",
                child
            )));
        }
        if !self.contains(parent) {
            return self.graph.add(parent, child);
        }
        let subtree = self.graph.leaf_nodes(child)?;
        let mut listings = Vec::with_capacity(subtree.len());
        for id in &subtree {
            listings.push((*id, listing(self.graph.node(*id)?)?));
        }

        self.graph.add(parent, child)?;
        for (id, listing) in listings {
            match listing {
                Listing::Geometry => self.render_list.geometry.push(id),
                Listing::PointLight if self.render_list.point_lights.is_empty() => {
                    self.render_list.point_lights.push(id)
                }
                Listing::PointLight => {
                    warn!(
                        "only one point light is supported, light {} '{}' will not be rendered",
                        id,
                        self.graph.node(id)?.name()
                    );
                    self.inactive_point_lights.push(id);
                }
                Listing::Unlisted => {}
            }
        }
        debug!("attached {} nodes below {}", subtree.len(), parent);
        Ok(())
    }

    /// Detach `node` and its subtree from the root.
    pub fn remove(&mut self, node: NodeId) -> Result<()> {
        self.detach(self.root, node)
    }

    /// Detach `child` from `parent` and drop its subtree from the render list.
    /// Nothing changes when an error is returned.
    pub fn detach(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.graph.validate_remove(parent, child)?;
        if !self.contains(parent) {
            return self.graph.remove(parent, child);
        }
        let subtree = self.graph.leaf_nodes(child)?;
        for id in &subtree {
            let listed = match listing(self.graph.node(*id)?)? {
                Listing::Geometry => self.render_list.geometry.contains(id),
                Listing::PointLight => {
                    self.render_list.point_lights.contains(id)
                        || self.inactive_point_lights.contains(id)
                }
                Listing::Unlisted => true,
            };
            if !listed {
                return Err(SceneError::InvalidOperation(format!(
                    "node {} is missing from the render list",
                    id
                )));
            }
        }

        self.graph.remove(parent, child)?;
        self.render_list.geometry.retain(|id| !subtree.contains(id));
        self.render_list.point_lights.retain(|id| !subtree.contains(id));
        self.inactive_point_lights.retain(|id| !subtree.contains(id));
        debug!("detached {} nodes from {}", subtree.len(), parent);
        Ok(())
    }

    /// Drop a node that is not part of the scene, with its subtree.
    pub fn despawn(&mut self, id: NodeId) -> Result<Node> {
        if self.contains(id) {
            return Err(SceneError::InvalidOperation(format!(
                "node {} is part of the scene, remove it first",
                id
            )));
        }
        self.graph.despawn(id)
    }

    /// Empty the render list and detach every direct child of the root.
    pub fn clear(&mut self) -> Result<()> {
        self.render_list.geometry.clear();
        self.render_list.point_lights.clear();
        self.inactive_point_lights.clear();
        self.graph.detach_children(self.root)?;
        Ok(())
    }

    /// Recompute all world matrices from the root.
    pub fn update_world_matrix(&mut self) -> Result<()> {
        self.graph.update_world_matrix(self.root)
    }

    /// Per frame hook, recomputes matrices when `auto_update` is set.
    pub fn update(&mut self) -> Result<()> {
        if self.config.auto_update {
            self.update_world_matrix()?;
        }
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

/// Mutable view of a scene's graph, see [`Scene::graph_mut`].
///
/// Derefs to [`SceneGraph`] for reading. Writes are limited to transforms,
/// names and payload attributes, none of which move a node in or out of the
/// render list.
pub struct TransformsMut<'a> {
    graph: &'a mut SceneGraph,
}

impl Deref for TransformsMut<'_> {
    type Target = SceneGraph;

    fn deref(&self) -> &SceneGraph {
        self.graph
    }
}

impl TransformsMut<'_> {
    pub fn set_local_position(&mut self, id: NodeId, position: Vector3<f32>) -> Result<()> {
        self.graph.set_local_position(id, position)
    }

    pub fn set_world_position(&mut self, id: NodeId, position: Vector3<f32>) -> Result<()> {
        self.graph.set_world_position(id, position)
    }

    pub fn set_local_rotation(&mut self, id: NodeId, rotation: Quaternion<f32>) -> Result<()> {
        self.graph.set_local_rotation(id, rotation)
    }

    pub fn set_world_rotation(&mut self, id: NodeId, rotation: Quaternion<f32>) -> Result<()> {
        self.graph.set_world_rotation(id, rotation)
    }

    pub fn set_local_euler_angles(&mut self, id: NodeId, degrees: Vector3<f32>) -> Result<()> {
        self.graph.set_local_euler_angles(id, degrees)
    }

    pub fn set_world_euler_angles(&mut self, id: NodeId, degrees: Vector3<f32>) -> Result<()> {
        self.graph.set_world_euler_angles(id, degrees)
    }

    pub fn set_scale(&mut self, id: NodeId, scale: Vector3<f32>) -> Result<()> {
        self.graph.set_scale(id, scale)
    }

    pub fn rotate_x(&mut self, id: NodeId, angle: f32, space: Space) -> Result<()> {
        self.graph.rotate_x(id, angle, space)
    }

    pub fn rotate_y(&mut self, id: NodeId, angle: f32, space: Space) -> Result<()> {
        self.graph.rotate_y(id, angle, space)
    }

    pub fn rotate_z(&mut self, id: NodeId, angle: f32, space: Space) -> Result<()> {
        self.graph.rotate_z(id, angle, space)
    }

    pub fn update_world_matrix(&mut self, id: NodeId) -> Result<()> {
        self.graph.update_world_matrix(id)
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        self.graph.node_mut(id)?.set_name(name);
        Ok(())
    }

    /// Geometry payload of `id`. The shape stays fixed, its color is editable.
    pub fn object_mut(&mut self, id: NodeId) -> Result<&mut Object3D> {
        let node = self.graph.node_mut(id)?;
        let label = node.kind().label();
        node.object_mut().ok_or_else(|| {
            SceneError::InvalidOperation(format!("node {} is a {}, not geometry", id, label))
        })
    }

    /// Recolor geometry or a light.
    pub fn set_color(&mut self, id: NodeId, color: Color) -> Result<()> {
        let node = self.graph.node_mut(id)?;
        let label = node.kind().label();
        match node.light_source_mut() {
            Some(Light::Point(light)) => light.color = color,
            Some(Light::Directional(light)) => light.color = color,
            None => match node.object_mut() {
                Some(object) => object.color = color,
                None => {
                    return Err(SceneError::InvalidOperation(format!(
                        "node {} is a {} and has no color",
                        id, label
                    )));
                }
            },
        }
        Ok(())
    }
}
