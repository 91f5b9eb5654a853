//! Vector and quaternion helpers on top of `cgmath`.
//!
//! The scene graph stores positions as `cgmath::Vector3<f32>` and rotations as
//! `cgmath::Quaternion<f32>`. This module fixes the conventions the rest of the
//! crate relies on:
//!
//! - `compose(a, b)` is the Hamilton product `a * b` and applies `b` first, then `a`
//!   (the same order as the matrix product `M_a * M_b`).
//! - Euler angles are always in degrees and always in YZX order: heading about Y,
//!   then attitude about Z, then bank about X, i.e. `Ry * Rz * Rx`.
//! - Two quaternions are the same rotation iff `|dot(a, b)| > 1 - epsilon` (q == -q).

use std::f32::consts::{FRAC_PI_2, PI};

use cgmath::{Deg, InnerSpace, Matrix4, Quaternion, Rad, Rotation3, Vector3};

use crate::error::{Result, SceneError};

/// Default tolerance used by [`quaternions_are_equal`] callers in this crate.
pub const QUATERNION_EPSILON: f32 = 1e-5;

/// Build a quaternion from components in (x, y, z, w) order.
///
/// `cgmath::Quaternion::new` takes the scalar part first, which is easy to get
/// wrong when porting rotation tables around.
pub fn quat(x: f32, y: f32, z: f32, w: f32) -> Quaternion<f32> {
    Quaternion::new(w, x, y, z)
}

/// Components of `q` in (x, y, z, w) order.
pub fn quat_to_array(q: Quaternion<f32>) -> [f32; 4] {
    [q.v.x, q.v.y, q.v.z, q.s]
}

/// Coerce a slice into a vector. Anything but exactly three elements is rejected.
pub fn vec3(values: &[f32]) -> Result<Vector3<f32>> {
    match values {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(SceneError::TypeMismatch {
            expected: "Vector3 (3 elements)".to_string(),
            found: format!("{} elements {:?}", values.len(), values),
        }),
    }
}

/// Coerce a slice in (x, y, z, w) order into a unit quaternion.
pub fn quat_from_slice(values: &[f32]) -> Result<Quaternion<f32>> {
    match values {
        [x, y, z, w] => normalize_rotation(quat(*x, *y, *z, *w)),
        _ => Err(SceneError::TypeMismatch {
            expected: "Quaternion (4 elements, x y z w)".to_string(),
            found: format!("{} elements {:?}", values.len(), values),
        }),
    }
}

/// Scale `q` to unit length so it can be stored as a rotation.
///
/// `cgmath`'s quaternion to matrix conversion assumes unit length, a longer
/// quaternion would skew the matrix. Zero length and non-finite components
/// describe no rotation and are rejected.
pub fn normalize_rotation(q: Quaternion<f32>) -> Result<Quaternion<f32>> {
    let norm = q.magnitude2();
    if !(norm.is_finite() && norm > 0.0) {
        return Err(SceneError::invalid_parameter(
            quat_to_array(q),
            "rotation quaternion must be finite with non-zero length",
        ));
    }
    Ok(q / norm.sqrt())
}

/// Hamilton product. Applies `b` first, then `a`.
pub fn compose(a: Quaternion<f32>, b: Quaternion<f32>) -> Quaternion<f32> {
    a * b
}

/// Inverse rotation. Equals the conjugate for unit quaternions.
pub fn inverse(q: Quaternion<f32>) -> Quaternion<f32> {
    let norm = q.magnitude2();
    if norm == 0.0 {
        return q.conjugate();
    }
    q.conjugate() / norm
}

/// Rotate `v` by `q` as `q * (v, 0) * q^-1`, discarding the scalar part.
pub fn rotate(q: Quaternion<f32>, v: Vector3<f32>) -> Vector3<f32> {
    let p = compose(compose(q, Quaternion::from_sv(0.0, v)), inverse(q));
    p.v
}

/// 4x4 column-major rotation matrix of `q`.
pub fn rotation_matrix(q: Quaternion<f32>) -> Matrix4<f32> {
    Matrix4::from(q)
}

/// Convert YZX Euler angles (degrees, `x` = bank, `y` = heading, `z` = attitude)
/// into a quaternion.
pub fn from_euler(degrees: Vector3<f32>) -> Quaternion<f32> {
    let bank_half = degrees.x.to_radians() / 2.0;
    let heading_half = degrees.y.to_radians() / 2.0;
    let attitude_half = degrees.z.to_radians() / 2.0;

    let (s1, c1) = heading_half.sin_cos();
    let (s2, c2) = attitude_half.sin_cos();
    let (s3, c3) = bank_half.sin_cos();
    let c1c2 = c1 * c2;
    let s1s2 = s1 * s2;

    quat(
        c1c2 * s3 + s1s2 * c3,
        s1 * c2 * c3 + c1 * s2 * s3,
        c1 * s2 * c3 - s1 * c2 * s3,
        c1c2 * c3 - s1s2 * s3,
    )
}

/// Convert a quaternion into YZX Euler angles in degrees (`x` = bank,
/// `y` = heading, `z` = attitude).
///
/// At the poles (attitude of +/-90 degrees) bank is pinned to zero and the whole
/// rotation about the vertical axis is reported as heading. Only the composite
/// rotation is meaningful there, not the individual angles.
pub fn to_euler(q: Quaternion<f32>) -> Vector3<f32> {
    let (x, y, z, w) = (q.v.x, q.v.y, q.v.z, q.s);
    let sqw = w * w;
    let sqx = x * x;
    let sqy = y * y;
    let sqz = z * z;
    // one for unit quaternions, otherwise a correction factor
    let unit = sqx + sqy + sqz + sqw;
    let test = x * y + z * w;

    let (bank, heading, attitude) = if test > 0.499 * unit {
        (0.0, 2.0 * x.atan2(w), FRAC_PI_2)
    } else if test < -0.499 * unit {
        (0.0, -2.0 * x.atan2(w), -FRAC_PI_2)
    } else {
        (
            (2.0 * x * w - 2.0 * y * z).atan2(-sqx + sqy - sqz + sqw),
            (2.0 * y * w - 2.0 * x * z).atan2(sqx - sqy - sqz + sqw),
            (2.0 * test / unit).clamp(-1.0, 1.0).asin(),
        )
    };

    Vector3::new(bank.to_degrees(), heading.to_degrees(), attitude.to_degrees())
}

/// Whether two quaternions represent the same rotation.
pub fn quaternions_are_equal(a: Quaternion<f32>, b: Quaternion<f32>, epsilon: f32) -> bool {
    a.dot(b).abs() > 1.0 - epsilon
}

/// Single axis rotation of `angle` degrees.
pub fn axis_rotation(axis: Axis, angle: f32) -> Quaternion<f32> {
    let angle = Deg(angle);
    match axis {
        Axis::X => Quaternion::from_angle_x(angle),
        Axis::Y => Quaternion::from_angle_y(angle),
        Axis::Z => Quaternion::from_angle_z(angle),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Bounds an angle must respect to be accepted as input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AngleBounds {
    /// Degrees when set, radians otherwise.
    pub in_degrees: bool,
    pub allow_negative: bool,
    /// Restrict the angle to one full turn.
    pub limit_to_circle: bool,
}

impl AngleBounds {
    /// Unsigned degrees within one turn, as used for fields of view.
    pub const FIELD_OF_VIEW: AngleBounds = AngleBounds {
        in_degrees: true,
        allow_negative: false,
        limit_to_circle: true,
    };

    /// Any finite, signed angle in degrees.
    pub const ROTATION: AngleBounds = AngleBounds {
        in_degrees: true,
        allow_negative: true,
        limit_to_circle: false,
    };

    /// Fail with `InvalidParameter` if `angle` is outside of these bounds.
    pub fn check(&self, angle: f32, what: &str) -> Result<()> {
        if is_angle(angle, *self) {
            Ok(())
        } else {
            Err(SceneError::invalid_parameter(
                angle,
                format!("{what} is not a valid angle for {:?}", self),
            ))
        }
    }
}

/// Check whether `angle` is a valid angle under `bounds`. NaN and infinite
/// values are never valid.
pub fn is_angle(angle: f32, bounds: AngleBounds) -> bool {
    if !angle.is_finite() {
        return false;
    }
    let (lower, upper) = if bounds.limit_to_circle {
        let turn = if bounds.in_degrees { 360.0 } else { 2.0 * PI };
        (if bounds.allow_negative { -turn } else { 0.0 }, turn)
    } else {
        (
            if bounds.allow_negative {
                f32::NEG_INFINITY
            } else {
                0.0
            },
            f32::INFINITY,
        )
    };
    lower <= angle && angle <= upper
}

/// Convert an angle to radians according to the unit of `bounds`.
pub fn to_radians(angle: f32, bounds: AngleBounds) -> Rad<f32> {
    if bounds.in_degrees {
        Deg(angle).into()
    } else {
        Rad(angle)
    }
}

/// Half line `origin + t * direction` with `t >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vector3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    /// The direction is normalized on construction.
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center: Vector3<f32>,
    pub radius: f32,
}

/// Intersection points of a ray and a sphere, in the order the quadratic
/// yields them. Points behind the ray origin are dropped.
pub fn ray_intersect_sphere(ray: &Ray, sphere: &Sphere) -> Vec<Vector3<f32>> {
    let to_origin = ray.origin - sphere.center;
    let a = 1.0;
    let b = 2.0 * ray.direction.dot(to_origin);
    let c = to_origin.dot(to_origin) - sphere.radius * sphere.radius;

    solve_quadratic(a, b, c)
        .into_iter()
        .filter(|t| *t >= 0.0)
        .map(|t| ray.origin + ray.direction * t)
        .collect()
}

/// Real roots of `a*x^2 + b*x + c`.
///
/// Two roots when the discriminant is positive, one when it is zero, none
/// otherwise. Uses the cancellation free form `q = -(b +/- sqrt(delta)) / 2`.
pub fn solve_quadratic(a: f32, b: f32, c: f32) -> Vec<f32> {
    let delta = b * b - 4.0 * a * c;
    if delta > 0.0 {
        let q = if b > 0.0 {
            -0.5 * (b + delta.sqrt())
        } else {
            -0.5 * (b - delta.sqrt())
        };
        vec![q / a, c / q]
    } else if delta == 0.0 {
        vec![-b / (2.0 * a)]
    } else {
        Vec::new()
    }
}
