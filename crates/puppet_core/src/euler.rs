//! Euler angles with an explicit axis order
//!
//! Model loaders hand over rotations in whatever order the asset was authored
//! in, while the host scene expects YXZ (yaw, pitch, roll). Conversions go
//! through the quaternion so no order mismatch leaks into the pose.

use crate::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis order in which Euler angles are applied
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EulerOrder {
    #[default]
    Xyz,
    Yxz,
    Zxy,
    Zyx,
    Yzx,
    Xzy,
}

impl EulerOrder {
    /// Every supported order
    pub const ALL: [EulerOrder; 6] = [
        EulerOrder::Xyz,
        EulerOrder::Yxz,
        EulerOrder::Zxy,
        EulerOrder::Zyx,
        EulerOrder::Yzx,
        EulerOrder::Xzy,
    ];

    /// Order used by the host scene for entity rotations
    pub const HOST: EulerOrder = EulerOrder::Yxz;

    pub fn as_str(&self) -> &'static str {
        match self {
            EulerOrder::Xyz => "XYZ",
            EulerOrder::Yxz => "YXZ",
            EulerOrder::Zxy => "ZXY",
            EulerOrder::Zyx => "ZYX",
            EulerOrder::Yzx => "YZX",
            EulerOrder::Xzy => "XZY",
        }
    }
}

/// Rotation as three angles in radians plus the order they apply in
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub order: EulerOrder,
}

impl Euler {
    pub const fn new(x: f32, y: f32, z: f32, order: EulerOrder) -> Self {
        Self { x, y, z, order }
    }

    /// Zero rotation in the given order
    pub const fn zero(order: EulerOrder) -> Self {
        Self::new(0.0, 0.0, 0.0, order)
    }

    /// Build from angles given in degrees
    pub fn from_degrees(degrees: Vec3, order: EulerOrder) -> Self {
        let r = degrees.to_radians();
        Self::new(r.x, r.y, r.z, order)
    }

    /// Decompose a quaternion into angles applied in `order`
    pub fn from_quat(q: Quat, order: EulerOrder) -> Self {
        Self::from_rotation_matrix(&q.to_mat4(), order)
    }

    /// Decompose the upper 3x3 of an unscaled rotation matrix
    pub fn from_rotation_matrix(m: &Mat4, order: EulerOrder) -> Self {
        // Past this the middle axis is treated as gimbal locked
        const LOCK: f32 = 0.999_999_9;

        let e = |r: usize, c: usize| m.cols[c][r];
        let (m11, m12, m13) = (e(0, 0), e(0, 1), e(0, 2));
        let (m21, m22, m23) = (e(1, 0), e(1, 1), e(1, 2));
        let (m31, m32, m33) = (e(2, 0), e(2, 1), e(2, 2));
        let clamp = |v: f32| v.clamp(-1.0, 1.0);

        let (x, y, z) = match order {
            EulerOrder::Xyz => {
                let y = clamp(m13).asin();
                if m13.abs() < LOCK {
                    ((-m23).atan2(m33), y, (-m12).atan2(m11))
                } else {
                    (m32.atan2(m22), y, 0.0)
                }
            }
            EulerOrder::Yxz => {
                let x = (-clamp(m23)).asin();
                if m23.abs() < LOCK {
                    (x, m13.atan2(m33), m21.atan2(m22))
                } else {
                    (x, (-m31).atan2(m11), 0.0)
                }
            }
            EulerOrder::Zxy => {
                let x = clamp(m32).asin();
                if m32.abs() < LOCK {
                    (x, (-m31).atan2(m33), (-m12).atan2(m22))
                } else {
                    (x, 0.0, m21.atan2(m11))
                }
            }
            EulerOrder::Zyx => {
                let y = (-clamp(m31)).asin();
                if m31.abs() < LOCK {
                    (m32.atan2(m33), y, m21.atan2(m11))
                } else {
                    (0.0, y, (-m12).atan2(m22))
                }
            }
            EulerOrder::Yzx => {
                let z = clamp(m21).asin();
                if m21.abs() < LOCK {
                    ((-m23).atan2(m22), (-m31).atan2(m11), z)
                } else {
                    (0.0, m13.atan2(m33), z)
                }
            }
            EulerOrder::Xzy => {
                let z = (-clamp(m12)).asin();
                if m12.abs() < LOCK {
                    (m32.atan2(m22), m13.atan2(m11), z)
                } else {
                    ((-m23).atan2(m33), 0.0, z)
                }
            }
        };

        Self { x, y, z, order }
    }

    /// Re-express the same rotation in another order
    pub fn reorder(&self, order: EulerOrder) -> Self {
        if self.order == order {
            return *self;
        }
        Self::from_quat(self.to_quat(), order)
    }

    pub fn to_quat(&self) -> Quat {
        Quat::from_euler(self)
    }

    /// Angles as a vector in radians
    pub fn angles(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Angles as a vector in degrees
    pub fn to_degrees(&self) -> Vec3 {
        self.angles().to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_quat_roundtrip_all_orders() {
        for order in EulerOrder::ALL {
            let original = Euler::new(0.3, -0.6, 1.1, order);
            let back = Euler::from_quat(original.to_quat(), order);
            assert!(
                back.angles().abs_diff_eq(original.angles(), 1e-4),
                "order {:?}: {:?} vs {:?}",
                order,
                back,
                original
            );
        }
    }

    #[test]
    fn test_reorder_preserves_rotation() {
        let xyz = Euler::new(0.5, 0.25, -0.75, EulerOrder::Xyz);
        let yxz = xyz.reorder(EulerOrder::Yxz);

        assert_eq!(yxz.order, EulerOrder::Yxz);
        assert!(xyz.to_quat().dot(yxz.to_quat()).abs() > 0.99999);
    }

    #[test]
    fn test_reorder_same_order_is_noop() {
        let e = Euler::new(0.1, 0.2, 0.3, EulerOrder::Yxz);
        assert_eq!(e.reorder(EulerOrder::Yxz), e);
    }

    #[test]
    fn test_gimbal_lock_yxz() {
        let e = Euler::new(FRAC_PI_2, 0.4, 0.0, EulerOrder::Yxz);
        let back = Euler::from_quat(e.to_quat(), EulerOrder::Yxz);
        assert!(e.to_quat().dot(back.to_quat()).abs() > 0.9999);
    }

    #[test]
    fn test_host_order_name() {
        assert_eq!(EulerOrder::HOST.as_str(), "YXZ");
        assert_eq!(EulerOrder::default(), EulerOrder::Xyz);
    }
}
