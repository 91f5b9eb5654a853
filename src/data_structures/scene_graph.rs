//! Scene graph and hierarchical transform propagation.
//!
//! The [`SceneGraph`] owns every [`Node`] and hands out [`NodeId`] handles. The
//! children list of a node is the ownership relation of the tree; the parent
//! id is a non-owning back-reference. Two transform caches are maintained with
//! different strategies:
//!
//! - world position and world rotation are propagated eagerly: every setter
//!   recomputes them for the node and all of its descendants before returning
//! - matrices are lazy: setters only mark the node's local matrix dirty and
//!   world matrices are refreshed by an explicit top-down walk
//!   ([`SceneGraph::update_world_matrix`]).

use std::{
    collections::HashMap,
    sync::atomic::{AtomicU64, Ordering},
};

use cgmath::{Quaternion, Vector3};
use log::{debug, trace};

use crate::{
    data_structures::{
        node::{Node, NodeId, Space},
        transform::Transform,
    },
    error::{Result, SceneError},
    math::{self, AngleBounds, Axis},
};

static NEXT_GRAPH_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
pub struct SceneGraph {
    id: u64,
    nodes: HashMap<NodeId, Node>,
    next_node_id: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self {
            id: NEXT_GRAPH_ID.fetch_add(1, Ordering::Relaxed),
            nodes: HashMap::new(),
            next_node_id: 0,
        }
    }

    /// Store a standalone node and return its handle.
    ///
    /// Hierarchy fields of `node` are reset, a node always enters the graph
    /// parentless and without children.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        let id = NodeId {
            graph: self.id,
            index: self.next_node_id,
        };
        self.next_node_id += 1;
        node.parent = None;
        node.children.clear();
        debug!("inserted node {} '{}'", id, node.name());
        self.nodes.insert(id, node);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.check_owner(id)?;
        self.nodes
            .get(&id)
            .ok_or_else(|| SceneError::InvalidOperation(format!("unknown node {}", id)))
    }

    /// Mutable access for editing names and payloads. Transforms and the
    /// hierarchy can only be changed through the graph.
    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.check_owner(id)?;
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| SceneError::InvalidOperation(format!("unknown node {}", id)))
    }

    fn check_owner(&self, id: NodeId) -> Result<()> {
        if id.graph != self.id {
            return Err(SceneError::InvalidOperation(format!(
                "node {} belongs to another graph",
                id
            )));
        }
        Ok(())
    }

    /// First node (in insertion order) called `name`.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.name() == name)
            .map(|(id, _)| *id)
            .min()
    }

    /// Whether `ancestor` is `id` itself or lies on its parent chain.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.nodes.get(&node_id).and_then(Node::parent);
        }
        false
    }

    /// Topmost node of the parent chain of `id`.
    pub fn root_of(&self, id: NodeId) -> Result<NodeId> {
        let mut current = id;
        while let Some(parent) = self.node(current)?.parent() {
            current = parent;
        }
        Ok(current)
    }

    /// Checks everything [`SceneGraph::add`] checks, without mutating.
    pub fn validate_add(&self, parent: NodeId, child: NodeId) -> Result<()> {
        self.node(parent)?;
        let child_node = self.node(child)?;
        if parent == child {
            return Err(SceneError::InvalidOperation(format!(
                "cannot add node {} to itself",
                child
            )));
        }
        if let Some(current) = child_node.parent() {
            return Err(SceneError::InvalidOperation(format!(
                "node {} already has parent {}, remove it first",
                child, current
            )));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::InvalidOperation(format!(
                "adding node {} below {} would create a cycle",
                child, parent
            )));
        }
        Ok(())
    }

    /// Attach `child` below `parent`.
    ///
    /// The child keeps its world position and rotation. Its local position and
    /// rotation are re-expressed relative to the new parent.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.validate_add(parent, child)?;
        let parent_world = self.node(parent)?.world_transform();

        let child_node = self.node_mut(child)?;
        let local = child_node.world_transform().to_local(&parent_world);
        child_node.local.position = local.position;
        child_node.local.rotation = local.rotation;
        child_node.parent = Some(parent);
        child_node.mark_dirty();

        self.node_mut(parent)?.children.push(child);
        debug!("added node {} to {}", child, parent);
        Ok(())
    }

    /// Checks everything [`SceneGraph::remove`] checks, without mutating.
    pub fn validate_remove(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.node(parent)?.children().contains(&child) {
            return Err(SceneError::InvalidOperation(format!(
                "node {} is not a child of {}",
                child, parent
            )));
        }
        Ok(())
    }

    /// Detach `child` from `parent`. The child's world transform becomes its
    /// local transform.
    pub fn remove(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.validate_remove(parent, child)?;
        self.node_mut(parent)?.children.retain(|id| *id != child);
        self.unparent(child)?;
        debug!("removed node {} from {}", child, parent);
        Ok(())
    }

    /// Detach every direct child of `parent`, without walking their subtrees.
    pub fn detach_children(&mut self, parent: NodeId) -> Result<Vec<NodeId>> {
        let children = std::mem::take(&mut self.node_mut(parent)?.children);
        for child in &children {
            self.unparent(*child)?;
        }
        debug!("detached {} children from {}", children.len(), parent);
        Ok(children)
    }

    fn unparent(&mut self, id: NodeId) -> Result<()> {
        let node = self.node_mut(id)?;
        node.parent = None;
        node.local.position = node.world_position;
        node.local.rotation = node.world_rotation;
        node.mark_dirty();
        Ok(())
    }

    /// Drop a parentless node and its whole subtree from the graph.
    pub fn despawn(&mut self, id: NodeId) -> Result<Node> {
        if let Some(parent) = self.node(id)?.parent() {
            return Err(SceneError::InvalidOperation(format!(
                "node {} is still attached to {}, remove it first",
                id, parent
            )));
        }
        let subtree = self.leaf_nodes(id)?;
        for descendant in subtree.iter().skip(1) {
            self.nodes.remove(descendant);
        }
        debug!("despawned node {} with {} descendants", id, subtree.len() - 1);
        self.nodes
            .remove(&id)
            .ok_or_else(|| SceneError::InvalidOperation(format!("unknown node {}", id)))
    }

    /// Every node of the subtree rooted at `id` in pre-order, `id` first.
    pub fn leaf_nodes(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut nodes = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            nodes.push(current);
            // reversed so the first child is visited first
            stack.extend(node.children().iter().rev());
        }
        Ok(nodes)
    }

    fn parent_world(&self, id: NodeId) -> Result<Option<Transform>> {
        match self.node(id)?.parent() {
            Some(parent) => Ok(Some(self.node(parent)?.world_transform())),
            None => Ok(None),
        }
    }

    pub fn set_local_position(&mut self, id: NodeId, position: Vector3<f32>) -> Result<()> {
        let parent_world = self.parent_world(id)?;
        let node = self.node_mut(id)?;
        node.local.position = position;
        node.world_position = match parent_world {
            Some(parent) => parent.position + math::rotate(parent.rotation, position),
            None => position,
        };
        node.mark_dirty();
        self.cascade(id)
    }

    pub fn set_world_position(&mut self, id: NodeId, position: Vector3<f32>) -> Result<()> {
        let parent_world = self.parent_world(id)?;
        let node = self.node_mut(id)?;
        node.world_position = position;
        node.local.position = match parent_world {
            Some(parent) => math::rotate(math::inverse(parent.rotation), position - parent.position),
            None => position,
        };
        node.mark_dirty();
        self.cascade(id)
    }

    /// `rotation` is stored normalized. Zero length and non-finite
    /// quaternions are rejected.
    pub fn set_local_rotation(&mut self, id: NodeId, rotation: Quaternion<f32>) -> Result<()> {
        let rotation = math::normalize_rotation(rotation)?;
        let parent_world = self.parent_world(id)?;
        let node = self.node_mut(id)?;
        node.local.rotation = rotation;
        node.world_rotation = match parent_world {
            Some(parent) => math::compose(parent.rotation, rotation),
            None => rotation,
        };
        node.mark_dirty();
        self.cascade(id)
    }

    pub fn set_world_rotation(&mut self, id: NodeId, rotation: Quaternion<f32>) -> Result<()> {
        let rotation = math::normalize_rotation(rotation)?;
        let parent_world = self.parent_world(id)?;
        let node = self.node_mut(id)?;
        node.world_rotation = rotation;
        node.local.rotation = match parent_world {
            Some(parent) => math::compose(math::inverse(parent.rotation), rotation),
            None => rotation,
        };
        node.mark_dirty();
        self.cascade(id)
    }

    /// YZX Euler angles in degrees.
    pub fn set_local_euler_angles(&mut self, id: NodeId, degrees: Vector3<f32>) -> Result<()> {
        check_euler(degrees)?;
        self.set_local_rotation(id, math::from_euler(degrees))
    }

    /// YZX Euler angles in degrees.
    pub fn set_world_euler_angles(&mut self, id: NodeId, degrees: Vector3<f32>) -> Result<()> {
        check_euler(degrees)?;
        self.set_world_rotation(id, math::from_euler(degrees))
    }

    /// Scale is local only, descendants pick it up through their world matrix.
    pub fn set_scale(&mut self, id: NodeId, scale: Vector3<f32>) -> Result<()> {
        let node = self.node_mut(id)?;
        node.local.scale = scale;
        node.mark_dirty();
        Ok(())
    }

    pub fn rotate_x(&mut self, id: NodeId, angle: f32, space: Space) -> Result<()> {
        self.rotate_axis(id, Axis::X, angle, space)
    }

    pub fn rotate_y(&mut self, id: NodeId, angle: f32, space: Space) -> Result<()> {
        self.rotate_axis(id, Axis::Y, angle, space)
    }

    pub fn rotate_z(&mut self, id: NodeId, angle: f32, space: Space) -> Result<()> {
        self.rotate_axis(id, Axis::Z, angle, space)
    }

    fn rotate_axis(&mut self, id: NodeId, axis: Axis, angle: f32, space: Space) -> Result<()> {
        AngleBounds::ROTATION.check(angle, "rotation angle")?;
        let rotation = math::axis_rotation(axis, angle);
        let node = self.node(id)?;
        match space {
            Space::Local => {
                let local = math::compose(node.local_rotation(), rotation);
                self.set_local_rotation(id, local)
            }
            Space::World => {
                let world = math::compose(rotation, node.world_rotation());
                self.set_world_rotation(id, world)
            }
        }
    }

    /// Recompute world position and rotation of every descendant of `id`,
    /// parents before children.
    fn cascade(&mut self, id: NodeId) -> Result<()> {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            let parent_position = node.world_position;
            let parent_rotation = node.world_rotation;
            let children = node.children.clone();
            for child in &children {
                let child_node = self.node_mut(*child)?;
                child_node.world_position =
                    parent_position + math::rotate(parent_rotation, child_node.local.position);
                child_node.world_rotation =
                    math::compose(parent_rotation, child_node.local.rotation);
            }
            stack.extend(children);
        }
        Ok(())
    }

    /// Walk the subtree rooted at `id` top-down and refresh world matrices:
    /// `parent.world_matrix * local_matrix`, or the local matrix for a
    /// parentless node.
    pub fn update_world_matrix(&mut self, id: NodeId) -> Result<()> {
        let start = self.node(id)?;
        let mut stack = vec![(id, start.parent())];
        let mut visited = 0;
        while let Some((current, parent)) = stack.pop() {
            let parent_matrix = match parent {
                Some(parent) => Some(self.node(parent)?.world_matrix()),
                None => None,
            };
            let node = self.node_mut(current)?;
            let local_matrix = node.local_matrix();
            node.world_matrix = match parent_matrix {
                Some(parent_matrix) => parent_matrix * local_matrix,
                None => local_matrix,
            };
            stack.extend(node.children.iter().rev().map(|child| (*child, Some(current))));
            visited += 1;
        }
        trace!("updated world matrices of {} nodes below {}", visited, id);
        Ok(())
    }
}

fn check_euler(degrees: Vector3<f32>) -> Result<()> {
    for angle in [degrees.x, degrees.y, degrees.z] {
        AngleBounds::ROTATION.check(angle, "euler angle")?;
    }
    Ok(())
}
