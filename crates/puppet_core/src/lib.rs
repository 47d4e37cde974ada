//! Puppet Core
//!
//! Math and identity primitives shared by the puppet rig crates.
//!
//! # Features
//!
//! - **Vectors and matrices**: column-major `Mat4` with compose/decompose
//! - **Rotations**: quaternions and Euler angles in any of the six axis orders
//! - **Identity tokens**: process-wide unique tokens used to address scene
//!   objects by identity rather than by position in a tree
//!
//! # Example
//!
//! ```rust
//! use puppet_core::{Euler, EulerOrder, Quat, Vec3};
//!
//! let q = Quat::from_axis_angle(Vec3::UP, std::f32::consts::FRAC_PI_2);
//! let e = Euler::from_quat(q, EulerOrder::Yxz);
//! assert!((e.y - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
//! ```

pub mod euler;
pub mod identity;
pub mod matrix;
pub mod quat;
pub mod vector;

pub use euler::{Euler, EulerOrder};
pub use identity::Identity;
pub use matrix::Mat4;
pub use quat::Quat;
pub use vector::Vec3;

/// Tolerance used when comparing floating point transforms
pub const EPSILON: f32 = 1e-5;

/// Compare two floats within [`EPSILON`]
pub fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() <= EPSILON
}
