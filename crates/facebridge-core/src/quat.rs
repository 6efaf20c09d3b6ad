//! Orientation math for eye poses
//!
//! Eye orientations arrive as raw quaternions straight from the producer.
//! Nothing here assumes unit length on input: every angular derivation goes
//! through [`Quaternion::normalize`] first, and a degenerate quaternion makes
//! the caller skip the derivation instead of producing NaN.

/// Dot product above which slerp falls back to linear interpolation
pub const SLERP_DOT_THRESHOLD: f32 = 0.9995;

/// Orientation quaternion (x, y, z, w), same component order as the wire
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Build from yaw (around Y), pitch (around X) and roll (around Z)
    pub fn from_euler(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (sy, cy) = (yaw * 0.5).sin_cos();
        let (sp, cp) = (pitch * 0.5).sin_cos();
        let (sr, cr) = (roll * 0.5).sin_cos();

        Self {
            x: cy * sp * cr + sy * cp * sr,
            y: sy * cp * cr - cy * sp * sr,
            z: cy * cp * sr - sy * sp * cr,
            w: cy * cp * cr + sy * sp * sr,
        }
    }

    #[inline]
    pub fn dot(&self, other: &Quaternion) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    #[inline]
    pub fn norm(&self) -> f32 {
        self.dot(self).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    /// Negate all four components (same rotation, opposite hemisphere)
    #[inline]
    pub fn negated(&self) -> Quaternion {
        Quaternion::new(-self.x, -self.y, -self.z, -self.w)
    }

    /// Divide by the Euclidean norm
    ///
    /// Returns `None` when the norm is zero or not finite.
    pub fn normalize(&self) -> Option<Quaternion> {
        let norm = self.norm();
        if !norm.is_finite() || norm == 0.0 {
            return None;
        }

        Some(Quaternion {
            x: self.x / norm,
            y: self.y / norm,
            z: self.z / norm,
            w: self.w / norm,
        })
    }

    /// Gaze angles of a normalized quaternion
    ///
    /// The asin argument is clamped since rounding can push it just outside
    /// [-1, 1]. atan2 is defined for every finite pair and needs no clamp.
    pub fn to_gaze_angles(&self) -> GazeAngles {
        let Quaternion { x, y, z, w } = *self;

        let pitch = (2.0 * (x * z - w * y)).clamp(-1.0, 1.0).asin();
        let yaw = (2.0 * (y * z + w * x)).atan2(w * w - x * x - y * y + z * z);

        GazeAngles { pitch, yaw }
    }

    /// Spherical linear interpolation along the shortest arc
    ///
    /// Nearly parallel inputs use plain linear interpolation, returned
    /// without renormalizing.
    pub fn slerp(&self, other: &Quaternion, t: f32) -> Quaternion {
        let mut dot = self.dot(other);

        let other = if dot < 0.0 {
            dot = -dot;
            other.negated()
        } else {
            *other
        };

        if dot > SLERP_DOT_THRESHOLD {
            let inv = 1.0 - t;
            return Quaternion {
                x: inv * self.x + t * other.x,
                y: inv * self.y + t * other.y,
                z: inv * self.z + t * other.z,
                w: inv * self.w + t * other.w,
            };
        }

        let theta_0 = dot.acos();
        let theta = theta_0 * t;
        let sin_theta = theta.sin();
        let sin_theta_0 = theta_0.sin();

        let s0 = theta.cos() - dot * sin_theta / sin_theta_0;
        let s1 = sin_theta / sin_theta_0;

        Quaternion {
            x: s0 * self.x + s1 * other.x,
            y: s0 * self.y + s1 * other.y,
            z: s0 * self.z + s1 * other.z,
            w: s0 * self.w + s1 * other.w,
        }
    }

    /// Component-wise closeness, treating q and -q as the same rotation
    pub fn approx_same_rotation(&self, other: &Quaternion, epsilon: f32) -> bool {
        let close = |a: &Quaternion, b: &Quaternion| {
            (a.x - b.x).abs() <= epsilon
                && (a.y - b.y).abs() <= epsilon
                && (a.z - b.z).abs() <= epsilon
                && (a.w - b.w).abs() <= epsilon
        };
        close(self, other) || close(self, &other.negated())
    }
}

/// Eye-look direction in radians
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GazeAngles {
    pub pitch: f32,
    pub yaw: f32,
}

impl GazeAngles {
    pub const FORWARD: GazeAngles = GazeAngles {
        pitch: 0.0,
        yaw: 0.0,
    };

    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }
}
