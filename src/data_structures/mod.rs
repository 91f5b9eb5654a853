//! Scene data structures: nodes, the scene graph, transforms and payloads.
//!
//! - `node` holds a single node with its cached transforms and payload kind
//! - `scene_graph` owns all nodes and keeps the hierarchy consistent
//! - `transform` holds position/rotation/scale and their GPU layout
//! - `object` contains geometry primitives with color and size
//! - `light` contains light payloads

pub mod light;
pub mod node;
pub mod object;
pub mod scene_graph;
pub mod transform;
