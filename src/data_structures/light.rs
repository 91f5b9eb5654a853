//! Light payloads.

use crate::color::{self, Color};

/// Light source attached to a node. Its position comes from the node's world
/// position, its direction from the node's world rotation.
#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Point(PointLight),
    /// Shines along the node's local -Z axis. Not supported by scenes yet.
    Directional(DirectionalLight),
}

impl Light {
    pub fn point(color: Color) -> Self {
        Light::Point(PointLight { color })
    }

    pub fn directional(color: Color) -> Self {
        Light::Directional(DirectionalLight { color })
    }

    pub fn color(&self) -> Color {
        match self {
            Light::Point(light) => light.color,
            Light::Directional(light) => light.color,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: color::WHITE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
}
