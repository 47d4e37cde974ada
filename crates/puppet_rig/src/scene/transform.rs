//! Local transform of a loaded scene node

use puppet_core::{Euler, EulerOrder, Mat4, Quat, Vec3};

/// Local transform relative to the parent node
///
/// Mirrors the layout model loaders produce: position, Euler rotation and
/// quaternion, scale, plus the combined matrix. The two rotation forms are
/// only reachable through accessors so they never disagree. When
/// `matrix_auto_update` is off the matrix is authoritative and is never
/// rebuilt from the decomposed fields.
#[derive(Clone, Debug, PartialEq)]
pub struct LocalTransform {
    /// Local position relative to parent
    pub position: Vec3,
    /// Local rotation as Euler angles in the authored axis order
    rotation: Euler,
    /// Local rotation as quaternion
    quaternion: Quat,
    /// Local scale
    pub scale: Vec3,
    /// Combined local matrix
    pub matrix: Mat4,
    /// Whether `matrix` is rebuilt from position/rotation/scale on update
    pub matrix_auto_update: bool,
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Euler::zero(EulerOrder::default()),
            quaternion: Quat::IDENTITY,
            scale: Vec3::ONE,
            matrix: Mat4::IDENTITY,
            matrix_auto_update: true,
        }
    }
}

impl LocalTransform {
    /// Identity transform
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decomposed parts, keeping every representation in sync
    pub fn from_parts(position: Vec3, quaternion: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation: Euler::from_quat(quaternion, EulerOrder::default()),
            quaternion,
            scale,
            matrix: Mat4::compose(position, quaternion, scale),
            matrix_auto_update: true,
        }
    }

    /// Set position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vec3::new(x, y, z);
        self.update_matrix();
        self
    }

    /// Set rotation from Euler angles (radians) in the given order
    pub fn with_rotation(mut self, rotation: Euler) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Set scale
    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vec3::new(x, y, z);
        self.update_matrix();
        self
    }

    /// Rotation as Euler angles
    pub fn rotation(&self) -> Euler {
        self.rotation
    }

    /// Rotation as quaternion
    pub fn quaternion(&self) -> Quat {
        self.quaternion
    }

    /// Replace the rotation, syncing the quaternion
    pub fn set_rotation(&mut self, rotation: Euler) {
        self.rotation = rotation;
        self.quaternion = rotation.to_quat();
        self.update_matrix();
    }

    /// Replace the rotation from a quaternion, keeping the Euler order
    pub fn set_quaternion(&mut self, quaternion: Quat) {
        self.quaternion = quaternion;
        self.rotation = Euler::from_quat(quaternion, self.rotation.order);
        self.update_matrix();
    }

    /// Express the rotation in `order`, recomputing it from the quaternion
    ///
    /// Returns `true` when the order actually changed.
    pub fn reorder_rotation(&mut self, order: EulerOrder) -> bool {
        if self.rotation.order == order {
            return false;
        }
        self.rotation = Euler::from_quat(self.quaternion, order);
        true
    }

    /// Rebuild the matrix from position/rotation/scale
    pub fn update_matrix(&mut self) {
        if self.matrix_auto_update {
            self.matrix = Mat4::compose(self.position, self.quaternion, self.scale);
        }
    }

    /// Freeze the transform at identity
    ///
    /// Disables matrix auto-update, resets the matrix and decomposes it back
    /// into position, rotation and scale. Afterwards the owner contributes no
    /// local offset of its own.
    pub fn freeze_at_identity(&mut self) {
        self.matrix_auto_update = false;
        self.matrix = Mat4::IDENTITY;

        let (position, quaternion, scale) = self.matrix.decompose();
        self.position = position;
        self.quaternion = quaternion;
        self.rotation = Euler::from_quat(quaternion, self.rotation.order);
        self.scale = scale;
    }

    /// Whether the decomposed fields describe the identity transform
    pub fn is_identity(&self) -> bool {
        self.position.abs_diff_eq(Vec3::ZERO, puppet_core::EPSILON)
            && self.scale.abs_diff_eq(Vec3::ONE, puppet_core::EPSILON)
            && self.quaternion.dot(Quat::IDENTITY).abs() >= 1.0 - puppet_core::EPSILON
    }
}
