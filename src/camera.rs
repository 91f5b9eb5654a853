//! Camera payloads and their projection matrices.
//!
//! A camera is a node like any other: its pose is the node's world matrix. The
//! camera itself only owns the frustum. The frustum is validated once at
//! construction and never changes afterwards, so the projection matrix is
//! computed on first use and then served from the cache.
//!
//! The view-projection matrix used for rendering is
//! `projection_matrix() * inverse(world_matrix)`, see [`crate::render`].

use std::cell::Cell;

use cgmath::{Deg, Matrix4};

use crate::{
    error::{Result, SceneError},
    math::{self, AngleBounds},
};

/// Frustum parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Projection {
    /// `fov` is the vertical field of view in degrees.
    Perspective {
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    },
}

impl Projection {
    fn calc_matrix(&self) -> Matrix4<f32> {
        match *self {
            Projection::Perspective {
                fov,
                aspect,
                near,
                far,
            } => cgmath::perspective(Deg(fov), aspect, near, far),
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
                near,
                far,
            } => cgmath::ortho(left, right, bottom, top, near, far),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Camera {
    projection: Projection,
    projection_matrix: Cell<Option<Matrix4<f32>>>,
}

impl Camera {
    /// Perspective camera. `fov` is the vertical field of view in degrees and
    /// must lie strictly between 0 and 180.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Result<Self> {
        AngleBounds::FIELD_OF_VIEW.check(fov, "field of view")?;
        if !(fov > 0.0 && fov < 180.0) {
            return Err(SceneError::invalid_parameter(
                fov,
                "field of view must be between 0 and 180 degrees (exclusive)",
            ));
        }
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(SceneError::invalid_parameter(
                aspect,
                "aspect ratio must be positive",
            ));
        }
        check_depth_range(near, far)?;

        Ok(Self::from_projection(Projection::Perspective {
            fov,
            aspect,
            near,
            far,
        }))
    }

    pub fn orthographic(
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        near: f32,
        far: f32,
    ) -> Result<Self> {
        if ![left, right, top, bottom].iter().all(|bound| bound.is_finite()) {
            return Err(SceneError::invalid_parameter(
                (left, right, top, bottom),
                "orthographic bounds must be finite",
            ));
        }
        if !(left < right) {
            return Err(SceneError::invalid_parameter(
                (left, right),
                "left must be smaller than right",
            ));
        }
        if !(bottom < top) {
            return Err(SceneError::invalid_parameter(
                (bottom, top),
                "bottom must be smaller than top",
            ));
        }
        check_depth_range(near, far)?;

        Ok(Self::from_projection(Projection::Orthographic {
            left,
            right,
            top,
            bottom,
            near,
            far,
        }))
    }

    fn from_projection(projection: Projection) -> Self {
        Self {
            projection,
            projection_matrix: Cell::new(None),
        }
    }

    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Whether the projection matrix has already been computed.
    pub fn is_projection_cached(&self) -> bool {
        self.projection_matrix.get().is_some()
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        if let Some(matrix) = self.projection_matrix.get() {
            return matrix;
        }
        let matrix = self.projection.calc_matrix();
        self.projection_matrix.set(Some(matrix));
        matrix
    }

    /// Vertical field of view in radians, if this is a perspective camera.
    pub fn fov_radians(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { fov, .. } => {
                Some(math::to_radians(fov, AngleBounds::FIELD_OF_VIEW).0)
            }
            Projection::Orthographic { .. } => None,
        }
    }
}

impl PartialEq for Camera {
    fn eq(&self, other: &Self) -> bool {
        self.projection == other.projection
    }
}

fn check_depth_range(near: f32, far: f32) -> Result<()> {
    if !(near > 0.0) {
        return Err(SceneError::invalid_parameter(
            near,
            "near plane must be positive",
        ));
    }
    if !(near < far) || !far.is_finite() {
        return Err(SceneError::invalid_parameter(
            (near, far),
            "near plane must be closer than the far plane",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perspective_matrix_matches_opengl_frustum() {
        let camera = Camera::perspective(45.0, 1.0, 0.1, 100.0).unwrap();
        let m = camera.projection_matrix();
        let f = 1.0 / (22.5_f32.to_radians()).tan();
        assert!((m.x.x - f).abs() < 1e-5);
        assert!((m.y.y - f).abs() < 1e-5);
        assert!((m.z.z - (100.1 / -99.9)).abs() < 1e-5);
        assert_eq!(m.z.w, -1.0);
        assert!((m.w.z - (2.0 * 100.0 * 0.1 / -99.9)).abs() < 1e-5);
        assert_eq!(m.w.w, 0.0);
    }

    #[test]
    fn projection_is_memoized() {
        let camera = Camera::perspective(60.0, 1.5, 0.1, 10.0).unwrap();
        assert!(!camera.is_projection_cached());
        let first = camera.projection_matrix();
        assert!(camera.is_projection_cached());
        assert_eq!(first, camera.projection_matrix());
    }

    #[test]
    fn rejects_invalid_perspective() {
        for (fov, aspect, near, far) in [
            (190.0, 1.0, 0.1, 100.0),
            (180.0, 1.0, 0.1, 100.0),
            (0.0, 1.0, 0.1, 100.0),
            (-45.0, 1.0, 0.1, 100.0),
            (f32::NAN, 1.0, 0.1, 100.0),
            (45.0, 0.0, 0.1, 100.0),
            (45.0, 1.0, 0.0, 100.0),
            (45.0, 1.0, 10.0, 1.0),
        ] {
            assert!(
                matches!(
                    Camera::perspective(fov, aspect, near, far),
                    Err(SceneError::InvalidParameter { .. })
                ),
                "{fov} {aspect} {near} {far}"
            );
        }
    }

    #[test]
    fn orthographic_box() {
        let camera = Camera::orthographic(-1.0, 1.0, 1.0, -1.0, 0.1, 10.0).unwrap();
        let m = camera.projection_matrix();
        assert_eq!(m.x.x, 1.0);
        assert_eq!(m.y.y, 1.0);
        assert_eq!(m.w.w, 1.0);
        assert!(camera.fov_radians().is_none());

        assert!(Camera::orthographic(1.0, -1.0, 1.0, -1.0, 0.1, 10.0).is_err());
        assert!(Camera::orthographic(-1.0, 1.0, -1.0, 1.0, 0.1, 10.0).is_err());
        assert!(Camera::orthographic(-1.0, 1.0, 1.0, -1.0, 0.0, 10.0).is_err());
    }

    #[test]
    fn orthographic_rejects_unbounded_box() {
        let inf = f32::INFINITY;
        assert!(matches!(
            Camera::orthographic(-inf, inf, 1.0, -1.0, 0.1, 10.0),
            Err(SceneError::InvalidParameter { .. })
        ));
        assert!(Camera::orthographic(-1.0, 1.0, inf, -1.0, 0.1, 10.0).is_err());
        assert!(Camera::orthographic(-1.0, 1.0, 1.0, -inf, 0.1, 10.0).is_err());
        assert!(Camera::orthographic(f32::NAN, 1.0, 1.0, -1.0, 0.1, 10.0).is_err());
    }
}
