//! sgraph
//!
//! A lightweight 3D scene graph: a tree of spatial nodes with local/world
//! transform propagation, used to describe simple scenes (primitives, a point
//! light, a camera) for a render backend. The crate does no GPU work itself; it
//! keeps world transforms consistent under arbitrary reparenting and mutation
//! and hands out world matrices and a per-frame snapshot in GPU layout.
//!
//! High-level modules
//! - `camera`: perspective and orthographic cameras with memoized projection
//! - `color`: named RGB constants
//! - `data_structures`: nodes, the scene graph arena, transforms, geometry and lights
//! - `error`: the crate error type
//! - `math`: quaternion and Euler helpers, angle validation, ray utilities
//! - `render`: per-frame snapshot (`Frame`) with camera, light and object uniforms
//! - `scene`: the scene root and its render list
//!

pub mod camera;
pub mod color;
pub mod data_structures;
pub mod error;
pub mod math;
pub mod render;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use camera::{Camera, Projection};
pub use cgmath::*;
pub use data_structures::{
    light::{Light, PointLight},
    node::{MatrixState, Node, NodeId, NodeKind, Space},
    object::{Object3D, Shape},
    scene_graph::SceneGraph,
    transform::Transform,
};
pub use error::{Result, SceneError};
pub use render::Frame;
pub use scene::{RenderList, Scene, SceneConfig, TransformsMut};
