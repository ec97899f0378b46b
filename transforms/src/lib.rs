use nalgebra::{Matrix3, Matrix4, RowVector4, Scalar, Vector3};
use serde::{Deserialize, Serialize};
use sim_value::SimValue;
use std::ops::{Index, Mul};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformErrors {
    #[error("bottom row of a homogeneous transform must be [0, 0, 0, 1]")]
    InvalidBottomRow,
    #[error("rotation block is not orthonormal")]
    NotOrthonormal,
    #[error("rotation block is not right handed")]
    NotRightHanded,
}

/// A 4x4 homogeneous rigid-body transform, SE(3).
///
/// We use the terminology B_from_A, so composition reads like matrix
/// multiplication: `c_from_a = c_from_b * b_from_a`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Scalar + Serialize",
    deserialize = "T: Scalar + Deserialize<'de>"
))]
pub struct Transform<T = f64>(Matrix4<T>);

impl<T> Transform<T>
where
    T: SimValue,
{
    /// Creates a transform, checking that the matrix is a proper rigid-body
    /// transform to within `1e-9`.
    pub fn new(matrix: Matrix4<T>) -> Result<Self, TransformErrors> {
        let tol = T::from_f64(1e-9);
        let exceeds = |e: &T| e.abs() > tol;

        let bottom = RowVector4::new(T::zero(), T::zero(), T::zero(), T::one());
        if (matrix.fixed_view::<1, 4>(3, 0) - bottom).iter().any(exceeds) {
            return Err(TransformErrors::InvalidBottomRow);
        }

        let transform = Self(matrix);
        let r = transform.rotation();
        if (r.transpose() * r - Matrix3::identity()).iter().any(exceeds) {
            return Err(TransformErrors::NotOrthonormal);
        }
        if transform.determinant() < T::zero() {
            return Err(TransformErrors::NotRightHanded);
        }
        Ok(transform)
    }

    /// Wraps a matrix without checking it. The caller guarantees the matrix
    /// is a rigid-body transform.
    #[inline]
    pub fn from_matrix_unchecked(matrix: Matrix4<T>) -> Self {
        Self(matrix)
    }

    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    pub fn from_parts(rotation: Matrix3<T>, translation: Vector3<T>) -> Self {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&rotation);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&translation);
        Self(m)
    }

    pub fn from_translation(x: T, y: T, z: T) -> Self {
        Self::from_parts(Matrix3::identity(), Vector3::new(x, y, z))
    }

    /// Pure rotation about the x axis.
    pub fn rotation_x(angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        let (o, l) = (T::zero(), T::one());
        Self::from_parts(Matrix3::new(l, o, o, o, c, -s, o, s, c), Vector3::zeros())
    }

    /// Pure rotation about the z axis.
    pub fn rotation_z(angle: T) -> Self {
        let (s, c) = angle.sin_cos();
        let (o, l) = (T::zero(), T::one());
        Self::from_parts(Matrix3::new(c, -s, o, s, c, o, o, o, l), Vector3::zeros())
    }

    pub fn translation_x(distance: T) -> Self {
        Self::from_translation(distance, T::zero(), T::zero())
    }

    pub fn translation_z(distance: T) -> Self {
        Self::from_translation(T::zero(), T::zero(), distance)
    }

    pub fn matrix(&self) -> &Matrix4<T> {
        &self.0
    }

    pub fn into_matrix(self) -> Matrix4<T> {
        self.0
    }

    pub fn rotation(&self) -> Matrix3<T> {
        self.0.fixed_view::<3, 3>(0, 0).into_owned()
    }

    pub fn translation(&self) -> Vector3<T> {
        self.0.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Inverse of a rigid-body transform, [R^T, -R^T t].
    pub fn inv(&self) -> Self {
        let rotation_t = self.rotation().transpose();
        let translation = -(rotation_t * self.translation());
        Self::from_parts(rotation_t, translation)
    }

    /// Maps a point expressed in the child frame into the parent frame.
    pub fn transform_point(&self, point: Vector3<T>) -> Vector3<T> {
        self.rotation() * point + self.translation()
    }

    /// Rotates a free vector, ignoring the translation.
    pub fn rotate(&self, v: Vector3<T>) -> Vector3<T> {
        self.rotation() * v
    }

    // det(R) = (c0 x c1) . c2
    fn determinant(&self) -> T {
        let r = self.rotation();
        r.column(0).cross(&r.column(1)).dot(&r.column(2))
    }
}

impl<T> Default for Transform<T>
where
    T: SimValue,
{
    fn default() -> Self {
        Self::identity()
    }
}

impl<T> PartialEq for Transform<T>
where
    T: SimValue,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Index<(usize, usize)> for Transform<T>
where
    T: SimValue,
{
    type Output = T;
    #[inline]
    fn index(&self, index: (usize, usize)) -> &T {
        &self.0[index]
    }
}

impl<T> Mul<Transform<T>> for Transform<T>
where
    T: SimValue,
{
    type Output = Transform<T>;

    fn mul(self, rhs: Transform<T>) -> Transform<T> {
        Transform(self.0 * rhs.0)
    }
}

impl From<Transform<f64>> for Matrix4<f64> {
    fn from(transform: Transform<f64>) -> Matrix4<f64> {
        transform.0
    }
}

impl TryFrom<Matrix4<f64>> for Transform<f64> {
    type Error = TransformErrors;
    fn try_from(matrix: Matrix4<f64>) -> Result<Self, Self::Error> {
        Transform::new(matrix)
    }
}
