//! In-memory Gaussian splat scene.
//!
//! A [`GaussianCloud`] stores every per-point attribute in its own flat
//! `f32` buffer, keyed by implicit point index. Attributes are kept in their
//! activation-space encodings (log scale, logit opacity, SH DC colour) so
//! codecs can move data between formats without re-deriving anything.

use splat_math::{CoordinateConverter, CoordinateSystem, Quat, Vec3};
use thiserror::Error;

/// Errors reported when a cloud breaks its length invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloudError {
    #[error("{attribute} has {actual} values, expected {expected}")]
    LengthMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported spherical harmonics degree: {0} (max 3)")]
    UnsupportedShDegree(u8),
}

pub type CloudResult<T> = Result<T, CloudError>;

/// Highest supported spherical-harmonics degree.
pub const MAX_SH_DEGREE: u8 = 3;

/// Number of higher-order SH coefficients per colour channel for a degree.
///
/// Degree 0 carries only the DC term, so it has none.
pub fn sh_coeffs_per_channel(degree: u8) -> usize {
    let bands = degree as usize + 1;
    bands * bands - 1
}

/// A single splat, in the same encodings the cloud stores.
#[derive(Clone, Debug, PartialEq)]
pub struct SplatPoint {
    pub position: Vec3,

    /// Natural log of the linear scale per axis
    pub log_scale: Vec3,

    /// Unit quaternion
    pub rotation: Quat,

    /// Logit of the linear opacity
    pub alpha: f32,

    /// SH DC coefficient per channel
    pub color: Vec3,

    /// Higher-order SH, `3 * sh_coeffs_per_channel(degree)` values
    pub sh: Vec<f32>,
}

/// A complete Gaussian splat scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GaussianCloud {
    /// Number of splats; authoritative length for every attribute buffer
    pub num_points: usize,

    /// Spherical harmonics degree (0-3)
    pub sh_degree: u8,

    /// Whether the splats were trained with antialiasing
    pub antialiased: bool,

    /// x, y, z per point
    pub positions: Vec<f32>,

    /// ln(scale) x, y, z per point
    pub scales: Vec<f32>,

    /// Quaternion x, y, z, w per point
    pub rotations: Vec<f32>,

    /// logit(opacity) per point
    pub alphas: Vec<f32>,

    /// SH DC r, g, b per point
    pub colors: Vec<f32>,

    /// Higher-order SH coefficients
    pub sh: Vec<f32>,
}

impl GaussianCloud {
    /// Create an empty cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cloud with room for `num_points` splats.
    pub fn with_capacity(num_points: usize, sh_degree: u8) -> Self {
        Self {
            num_points: 0,
            sh_degree,
            antialiased: false,
            positions: Vec::with_capacity(num_points * 3),
            scales: Vec::with_capacity(num_points * 3),
            rotations: Vec::with_capacity(num_points * 4),
            alphas: Vec::with_capacity(num_points),
            colors: Vec::with_capacity(num_points * 3),
            sh: Vec::with_capacity(num_points * 3 * sh_coeffs_per_channel(sh_degree)),
        }
    }

    /// Returns true if the cloud holds no splats.
    ///
    /// Loaders use an empty cloud to signal that nothing usable was loaded.
    pub fn is_empty(&self) -> bool {
        self.num_points == 0
    }

    /// Higher-order SH coefficients per point (all three channels).
    pub fn sh_stride(&self) -> usize {
        3 * sh_coeffs_per_channel(self.sh_degree)
    }

    /// Append a splat and bump the point count.
    pub fn push_point(&mut self, point: SplatPoint) {
        self.positions.extend_from_slice(&point.position.to_array());
        self.scales.extend_from_slice(&point.log_scale.to_array());
        self.rotations.extend_from_slice(&point.rotation.to_array());
        self.alphas.push(point.alpha);
        self.colors.extend_from_slice(&point.color.to_array());
        self.sh.extend_from_slice(&point.sh);
        self.num_points += 1;
    }

    /// Read back the splat at `index`.
    ///
    /// Returns `None` if the index is out of range or a buffer is too short.
    pub fn point(&self, index: usize) -> Option<SplatPoint> {
        if index >= self.num_points {
            return None;
        }
        let stride = self.sh_stride();
        Some(SplatPoint {
            position: Vec3::from_slice(self.positions.get(index * 3..index * 3 + 3)?),
            log_scale: Vec3::from_slice(self.scales.get(index * 3..index * 3 + 3)?),
            rotation: Quat::from_slice(self.rotations.get(index * 4..index * 4 + 4)?),
            alpha: *self.alphas.get(index)?,
            color: Vec3::from_slice(self.colors.get(index * 3..index * 3 + 3)?),
            sh: self.sh.get(index * stride..(index + 1) * stride)?.to_vec(),
        })
    }

    /// Check that every buffer matches `num_points` times its arity.
    pub fn validate(&self) -> CloudResult<()> {
        if self.sh_degree > MAX_SH_DEGREE {
            return Err(CloudError::UnsupportedShDegree(self.sh_degree));
        }

        let n = self.num_points;
        let checks = [
            ("positions", self.positions.len(), n * 3),
            ("scales", self.scales.len(), n * 3),
            ("rotations", self.rotations.len(), n * 4),
            ("alphas", self.alphas.len(), n),
            ("colors", self.colors.len(), n * 3),
            ("sh", self.sh.len(), n * self.sh_stride()),
        ];
        for (attribute, actual, expected) in checks {
            if actual != expected {
                return Err(CloudError::LengthMismatch {
                    attribute,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Re-express positions and rotations from `from` to `to`, in place.
    ///
    /// Scales, opacities, colours and SH are untouched. Higher-order SH are
    /// not reoriented. Equal or unspecified conventions leave the cloud
    /// exactly as it was.
    pub fn convert_coordinates(&mut self, from: CoordinateSystem, to: CoordinateSystem) {
        let Some(converter) = CoordinateConverter::between(from, to) else {
            return;
        };

        if let Err(err) = self.validate() {
            log::warn!(
                "Converting {} -> {} on an inconsistent cloud ({}), only whole records are remapped",
                from,
                to,
                err
            );
        }

        let n = self.num_points;
        for chunk in self.positions.chunks_exact_mut(3).take(n) {
            let p = converter.convert_position(Vec3::from_slice(chunk));
            p.write_to_slice(chunk);
        }
        for chunk in self.rotations.chunks_exact_mut(4).take(n) {
            let q = converter.convert_rotation(Quat::from_slice(chunk));
            q.write_to_slice(chunk);
        }

        log::debug!("Converted {} points from {} to {}", n, from, to);
    }
}
