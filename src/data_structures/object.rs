//! Renderable geometry primitives.
//!
//! Vertex generation is left to the backend. An [`Object3D`] only carries what
//! a backend needs to pick and size a mesh: the [`Shape`] with its dimensions,
//! the color, and the bounding extent returned by [`Object3D::size`].

use cgmath::Vector3;

use crate::{
    color::{self, Color},
    error::{Result, SceneError},
};

/// Primitive shape with its dimensions in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box { width: f32, height: f32, depth: f32 },
    Plane { width: f32, height: f32 },
    Circle { radius: f32 },
    Triangle { width: f32, height: f32 },
    Icosahedron { radius: f32 },
    Tetrahedral { radius: f32 },
    Pyramid { width: f32, height: f32 },
    Cylinder { height: f32, radius: f32 },
}

impl Shape {
    fn dimensions(&self) -> Vec<(&'static str, f32)> {
        match *self {
            Shape::Box {
                width,
                height,
                depth,
            } => vec![("width", width), ("height", height), ("depth", depth)],
            Shape::Plane { width, height }
            | Shape::Triangle { width, height }
            | Shape::Pyramid { width, height } => vec![("width", width), ("height", height)],
            Shape::Circle { radius }
            | Shape::Icosahedron { radius }
            | Shape::Tetrahedral { radius } => vec![("radius", radius)],
            Shape::Cylinder { height, radius } => vec![("height", height), ("radius", radius)],
        }
    }

    /// Axis aligned bounding extent of the unrotated primitive.
    pub fn size(&self) -> Vector3<f32> {
        match *self {
            Shape::Box {
                width,
                height,
                depth,
            } => Vector3::new(width, height, depth),
            // planar shapes lie in the XY plane
            Shape::Plane { width, height } | Shape::Triangle { width, height } => {
                Vector3::new(width, height, 0.0)
            }
            Shape::Circle { radius } => Vector3::new(2.0 * radius, 2.0 * radius, 0.0),
            Shape::Icosahedron { radius } | Shape::Tetrahedral { radius } => {
                Vector3::new(2.0 * radius, 2.0 * radius, 2.0 * radius)
            }
            Shape::Pyramid { width, height } => Vector3::new(width, height, width),
            Shape::Cylinder { height, radius } => Vector3::new(2.0 * radius, height, 2.0 * radius),
        }
    }
}

/// Geometry payload of a node.
#[derive(Clone, Debug, PartialEq)]
pub struct Object3D {
    shape: Shape,
    pub color: Color,
}

impl Object3D {
    /// Validates that every dimension of `shape` is finite and strictly positive.
    pub fn new(shape: Shape, color: Color) -> Result<Self> {
        for (name, value) in shape.dimensions() {
            if !(value.is_finite() && value > 0.0) {
                return Err(SceneError::invalid_parameter(
                    value,
                    format!("{name} of {:?} must be a positive number", shape),
                ));
            }
        }
        Ok(Self { shape, color })
    }

    pub fn cube(width: f32, height: f32, depth: f32) -> Result<Self> {
        Self::new(
            Shape::Box {
                width,
                height,
                depth,
            },
            color::WHITE,
        )
    }

    pub fn plane(width: f32, height: f32) -> Result<Self> {
        Self::new(Shape::Plane { width, height }, color::WHITE)
    }

    pub fn circle(radius: f32) -> Result<Self> {
        Self::new(Shape::Circle { radius }, color::WHITE)
    }

    pub fn triangle(width: f32, height: f32) -> Result<Self> {
        Self::new(Shape::Triangle { width, height }, color::WHITE)
    }

    pub fn icosahedron(radius: f32) -> Result<Self> {
        Self::new(Shape::Icosahedron { radius }, color::WHITE)
    }

    pub fn tetrahedral(radius: f32) -> Result<Self> {
        Self::new(Shape::Tetrahedral { radius }, color::WHITE)
    }

    pub fn pyramid(width: f32, height: f32) -> Result<Self> {
        Self::new(Shape::Pyramid { width, height }, color::WHITE)
    }

    pub fn cylinder(height: f32, radius: f32) -> Result<Self> {
        Self::new(Shape::Cylinder { height, radius }, color::WHITE)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn size(&self) -> Vector3<f32> {
        self.shape.size()
    }
}
