//! 4x4 transformation matrix

use crate::{Quat, Vec3};

/// 4x4 transformation matrix (column-major)
///
/// Elements are addressed as `cols[col][row]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mat4 {
    pub const IDENTITY: Mat4 = Mat4 {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Self {
            cols: [
                [x, 0.0, 0.0, 0.0],
                [0.0, y, 0.0, 0.0],
                [0.0, 0.0, z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Create from column-major array
    pub fn from_cols_array(arr: &[f32; 16]) -> Self {
        Self {
            cols: [
                [arr[0], arr[1], arr[2], arr[3]],
                [arr[4], arr[5], arr[6], arr[7]],
                [arr[8], arr[9], arr[10], arr[11]],
                [arr[12], arr[13], arr[14], arr[15]],
            ],
        }
    }

    /// Build a matrix from translation, rotation and scale
    pub fn compose(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let r = rotation.to_mat4();
        let mut cols = r.cols;
        for (i, s) in [scale.x, scale.y, scale.z].into_iter().enumerate() {
            cols[i][0] *= s;
            cols[i][1] *= s;
            cols[i][2] *= s;
        }
        cols[3] = [position.x, position.y, position.z, 1.0];
        Self { cols }
    }

    /// Split an affine matrix into translation, rotation and scale
    ///
    /// A negative determinant is folded into the X scale.
    pub fn decompose(&self) -> (Vec3, Quat, Vec3) {
        let column = |i: usize| Vec3::new(self.cols[i][0], self.cols[i][1], self.cols[i][2]);

        let mut sx = column(0).length();
        let sy = column(1).length();
        let sz = column(2).length();
        if self.determinant() < 0.0 {
            sx = -sx;
        }

        let position = column(3);

        let inv = |s: f32| if s.abs() < 1e-12 { 0.0 } else { 1.0 / s };
        let (ix, iy, iz) = (inv(sx), inv(sy), inv(sz));

        let mut rotation = *self;
        for row in 0..3 {
            rotation.cols[0][row] *= ix;
            rotation.cols[1][row] *= iy;
            rotation.cols[2][row] *= iz;
        }

        (
            position,
            Quat::from_rotation_matrix(&rotation),
            Vec3::new(sx, sy, sz),
        )
    }

    /// Determinant of the full matrix
    pub fn determinant(&self) -> f32 {
        let m = |r: usize, c: usize| self.cols[c][r];

        let (n11, n12, n13, n14) = (m(0, 0), m(0, 1), m(0, 2), m(0, 3));
        let (n21, n22, n23, n24) = (m(1, 0), m(1, 1), m(1, 2), m(1, 3));
        let (n31, n32, n33, n34) = (m(2, 0), m(2, 1), m(2, 2), m(2, 3));
        let (n41, n42, n43, n44) = (m(3, 0), m(3, 1), m(3, 2), m(3, 3));

        n41 * (n14 * n23 * n32 - n13 * n24 * n32 - n14 * n22 * n33
            + n12 * n24 * n33
            + n13 * n22 * n34
            - n12 * n23 * n34)
            + n42
                * (n11 * n23 * n34 - n11 * n24 * n33 + n14 * n21 * n33 - n13 * n21 * n34
                    + n13 * n24 * n31
                    - n14 * n23 * n31)
            + n43
                * (n11 * n24 * n32 - n11 * n22 * n34 - n14 * n21 * n32
                    + n12 * n21 * n34
                    + n14 * n22 * n31
                    - n12 * n24 * n31)
            + n44
                * (-n13 * n22 * n31 - n11 * n23 * n32 + n11 * n22 * n33 + n13 * n21 * n32
                    - n12 * n21 * n33
                    + n12 * n23 * n31)
    }

    /// Multiply two matrices
    pub fn mul(&self, other: &Mat4) -> Mat4 {
        let mut result = [[0.0f32; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                for k in 0..4 {
                    result[i][j] += self.cols[k][j] * other.cols[i][k];
                }
            }
        }
        Mat4 { cols: result }
    }

    /// Transform a point (applies translation)
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * p.x + c[1][0] * p.y + c[2][0] * p.z + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[2][1] * p.z + c[3][1],
            c[0][2] * p.x + c[1][2] * p.y + c[2][2] * p.z + c[3][2],
        )
    }

    /// Translation column
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.cols[3][0], self.cols[3][1], self.cols[3][2])
    }

    /// Element-wise comparison within `epsilon`
    pub fn abs_diff_eq(&self, other: &Mat4, epsilon: f32) -> bool {
        self.cols
            .iter()
            .flatten()
            .zip(other.cols.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}
