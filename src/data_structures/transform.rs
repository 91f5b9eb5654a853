//! Position, rotation and scale of a node and their matrix form.
//!
//! A [`Transform`] is expressed either relative to a parent (local) or in the
//! global frame (world). [`Transform::to_local`] and [`Transform::to_global`]
//! convert between the two. Scale never takes part in that conversion: it is a
//! purely local property that only reaches descendants through matrices.

use std::ops::Mul;

use cgmath::{Matrix3, Matrix4, One, Quaternion, SquareMatrix, Vector3};

use crate::math;

/// Position, rotation (as quaternion) and scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    /// Identity transform: no move, no rotation, unit scale.
    pub fn new() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Quaternion::one(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn to_matrix(&self) -> Matrix4<f32> {
        compose_matrix(self.position, self.rotation, self.scale)
    }

    pub fn to_raw(&self) -> TransformRaw {
        TransformRaw::from_matrix(self.to_matrix(), self.rotation)
    }

    /// Express this (world) transform relative to `parent` (a world transform).
    pub fn to_local(&self, parent: &Transform) -> Transform {
        let parent_inverse = math::inverse(parent.rotation);
        Transform {
            position: math::rotate(parent_inverse, self.position - parent.position),
            rotation: math::compose(parent_inverse, self.rotation),
            scale: self.scale,
        }
    }

    /// Express this (local) transform in the frame `parent` lives in.
    pub fn to_global(&self, parent: &Transform) -> Transform {
        Transform {
            position: parent.position + math::rotate(parent.rotation, self.position),
            rotation: math::compose(parent.rotation, self.rotation),
            scale: self.scale,
        }
    }
}

/// `parent * local` places `local` below `parent`, see [`Transform::to_global`].
impl Mul<Transform> for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Self::Output {
        rhs.to_global(&self)
    }
}

impl<'a, 'b> Mul<&'b Transform> for &'a Transform {
    type Output = Transform;

    fn mul(self, rhs: &'b Transform) -> Self::Output {
        rhs.to_global(self)
    }
}

impl From<Vector3<f32>> for Transform {
    fn from(position: Vector3<f32>) -> Self {
        Transform {
            position,
            ..Default::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

/// Column-major `T * R * S`.
pub fn compose_matrix(
    position: Vector3<f32>,
    rotation: Quaternion<f32>,
    scale: Vector3<f32>,
) -> Matrix4<f32> {
    Matrix4::from_translation(position)
        * Matrix4::from(rotation)
        * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
}

/**
 * The raw transform is the layout a backend uploads per object:
 * model matrix, rotation matrix for normals and the sign of the model determinant.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformRaw {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 3]; 3],
    pub handedness: f32,
}

impl TransformRaw {
    pub fn from_matrix(model: Matrix4<f32>, rotation: Quaternion<f32>) -> Self {
        // mirrored scales flip the winding order
        let handedness = model.determinant().signum();
        TransformRaw {
            model: model.into(),
            normal: Matrix3::from(rotation).into(),
            handedness,
        }
    }
}
