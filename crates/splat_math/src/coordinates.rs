//! Axis conventions for splat scenes.
//!
//! Each concrete [`CoordinateSystem`] names which way +x, +y and +z point
//! (Right/Left, Up/Down, Front/Back). Conversions between two conventions
//! are signed permutations, so they are exact for positions and map
//! rotations onto rotations.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Axis convention of a splat scene.
///
/// The three letters read as the direction of +x, +y and +z. `Unspecified`
/// means "no conversion known or requested" and has no basis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "&'static str")]
pub enum CoordinateSystem {
    #[default]
    Unspecified,
    /// Left Down Back
    Ldb,
    /// Right Down Back
    Rdb,
    /// Left Up Back
    Lub,
    /// Right Up Back (legacy `.splat`, SPZ, three.js)
    Rub,
    /// Left Down Front
    Ldf,
    /// Right Down Front (PLY)
    Rdf,
    /// Left Up Front (glTF/GLB)
    Luf,
    /// Right Up Front (Unity)
    Ruf,
}

impl CoordinateSystem {
    /// All concrete conventions, in declaration order.
    pub const ALL: [CoordinateSystem; 8] = [
        CoordinateSystem::Ldb,
        CoordinateSystem::Rdb,
        CoordinateSystem::Lub,
        CoordinateSystem::Rub,
        CoordinateSystem::Ldf,
        CoordinateSystem::Rdf,
        CoordinateSystem::Luf,
        CoordinateSystem::Ruf,
    ];

    /// Resolve a three-letter token such as `"RUB"`.
    ///
    /// Matching is exact; anything else resolves to `Unspecified`.
    pub fn from_token(token: &str) -> Self {
        match token {
            "LDB" => CoordinateSystem::Ldb,
            "RDB" => CoordinateSystem::Rdb,
            "LUB" => CoordinateSystem::Lub,
            "RUB" => CoordinateSystem::Rub,
            "LDF" => CoordinateSystem::Ldf,
            "RDF" => CoordinateSystem::Rdf,
            "LUF" => CoordinateSystem::Luf,
            "RUF" => CoordinateSystem::Ruf,
            _ => CoordinateSystem::Unspecified,
        }
    }

    /// The three-letter token for this convention.
    pub fn as_str(self) -> &'static str {
        match self {
            CoordinateSystem::Unspecified => "UNSPECIFIED",
            CoordinateSystem::Ldb => "LDB",
            CoordinateSystem::Rdb => "RDB",
            CoordinateSystem::Lub => "LUB",
            CoordinateSystem::Rub => "RUB",
            CoordinateSystem::Ldf => "LDF",
            CoordinateSystem::Rdf => "RDF",
            CoordinateSystem::Luf => "LUF",
            CoordinateSystem::Ruf => "RUF",
        }
    }

    /// Returns true for every variant except `Unspecified`.
    pub fn is_specified(self) -> bool {
        self != CoordinateSystem::Unspecified
    }

    /// Returns `self` if specified, otherwise `fallback`.
    pub fn or(self, fallback: CoordinateSystem) -> CoordinateSystem {
        if self.is_specified() {
            self
        } else {
            fallback
        }
    }

    /// Basis of this convention in the canonical Right-Up-Back frame.
    ///
    /// Columns are the canonical directions of +x, +y and +z.
    pub fn basis(self) -> Option<Mat3> {
        let (x, y, z) = match self {
            CoordinateSystem::Unspecified => return None,
            CoordinateSystem::Ldb => (Vec3::NEG_X, Vec3::NEG_Y, Vec3::Z),
            CoordinateSystem::Rdb => (Vec3::X, Vec3::NEG_Y, Vec3::Z),
            CoordinateSystem::Lub => (Vec3::NEG_X, Vec3::Y, Vec3::Z),
            CoordinateSystem::Rub => (Vec3::X, Vec3::Y, Vec3::Z),
            CoordinateSystem::Ldf => (Vec3::NEG_X, Vec3::NEG_Y, Vec3::NEG_Z),
            CoordinateSystem::Rdf => (Vec3::X, Vec3::NEG_Y, Vec3::NEG_Z),
            CoordinateSystem::Luf => (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
            CoordinateSystem::Ruf => (Vec3::X, Vec3::Y, Vec3::NEG_Z),
        };
        Some(Mat3::from_cols(x, y, z))
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoordinateSystem {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(s))
    }
}

impl From<String> for CoordinateSystem {
    fn from(token: String) -> Self {
        Self::from_token(&token)
    }
}

impl From<CoordinateSystem> for &'static str {
    fn from(system: CoordinateSystem) -> Self {
        system.as_str()
    }
}

/// Signed-permutation mapping from one axis convention to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateConverter {
    /// `targetBasisᵀ · sourceBasis`
    pub matrix: Mat3,

    /// +1 for proper rotations, -1 when the mapping flips handedness.
    pub determinant: f32,

    /// Source axis read by each target axis, and whether it is negated
    axes: [(usize, bool); 3],
}

impl CoordinateConverter {
    /// Build the converter from `from` to `to`.
    ///
    /// Returns `None` when no conversion applies: the conventions are equal
    /// or either side is `Unspecified`.
    pub fn between(from: CoordinateSystem, to: CoordinateSystem) -> Option<Self> {
        if from == to {
            return None;
        }
        let source = from.basis()?;
        let target = to.basis()?;

        // Bases are orthonormal, so the inverse is the transpose.
        let matrix = target.transpose() * source;

        // Every row of a signed permutation holds exactly one ±1.
        let axes = [0, 1, 2].map(|i| {
            let row = matrix.row(i);
            let axis = (0..3).find(|&j| row[j] != 0.0).unwrap_or(i);
            (axis, row[axis] < 0.0)
        });

        Some(Self {
            matrix,
            determinant: matrix.determinant(),
            axes,
        })
    }

    /// Apply `M` to a vector by moving and negating components.
    ///
    /// Equivalent to `M · v`, but never mixes axes, so infinities, NaNs and
    /// signed zeros come through bit-exact.
    fn permute(&self, v: Vec3) -> Vec3 {
        let v = v.to_array();
        Vec3::from_array(
            self.axes
                .map(|(axis, negate)| if negate { -v[axis] } else { v[axis] }),
        )
    }

    /// Map a position into the target convention (`M · p`).
    pub fn convert_position(&self, position: Vec3) -> Vec3 {
        self.permute(position)
    }

    /// Map a rotation into the target convention (`M · R · Mᵗ`).
    ///
    /// For an orthogonal `M` the conjugated rotation turns about `M · axis`,
    /// reversed when `M` flips handedness, so the result is
    /// `(det(M) · M · q.xyz, q.w)`. The scalar part keeps the sign of the
    /// input for every point and converting back restores the input exactly.
    pub fn convert_rotation(&self, rotation: Quat) -> Quat {
        let mut v = self.permute(rotation.xyz());
        if self.determinant < 0.0 {
            v = -v;
        }
        Quat::from_xyzw(v.x, v.y, v.z, rotation.w)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKENS: [&str; 8] = ["RDF", "RUB", "LUF", "RUF", "LDB", "RDB", "LUB", "LDF"];

    #[test]
    fn test_token_roundtrip() {
        for token in TOKENS {
            let system = CoordinateSystem::from_token(token);
            assert!(system.is_specified(), "{token} should resolve");
            assert_eq!(system.as_str(), token);
            assert_eq!(token.parse::<CoordinateSystem>(), Ok(system));
        }
    }

    #[test]
    fn test_unknown_token_is_unspecified() {
        for token in ["", "rub", "XYZ", "RUBX", "UNSPECIFIED"] {
            assert_eq!(
                CoordinateSystem::from_token(token),
                CoordinateSystem::Unspecified
            );
        }
    }

    #[test]
    fn test_unspecified_has_no_basis() {
        assert!(CoordinateSystem::Unspecified.basis().is_none());
        for system in CoordinateSystem::ALL {
            let basis = system.basis().unwrap();
            let product = basis.transpose() * basis;
            assert_eq!(product, Mat3::IDENTITY, "{system} basis must be orthonormal");
        }
    }

    #[test]
    fn test_no_converter_for_noop_pairs() {
        for system in CoordinateSystem::ALL {
            assert!(CoordinateConverter::between(system, system).is_none());
            assert!(CoordinateConverter::between(system, CoordinateSystem::Unspecified).is_none());
            assert!(CoordinateConverter::between(CoordinateSystem::Unspecified, system).is_none());
        }
    }

    #[test]
    fn test_rub_to_rdf_flips_y_and_z() {
        let converter =
            CoordinateConverter::between(CoordinateSystem::Rub, CoordinateSystem::Rdf).unwrap();
        let p = converter.convert_position(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Vec3::new(1.0, -2.0, -3.0));
        assert_eq!(converter.determinant, 1.0);
    }

    #[test]
    fn test_rub_to_ruf_is_a_reflection() {
        let converter =
            CoordinateConverter::between(CoordinateSystem::Rub, CoordinateSystem::Ruf).unwrap();
        assert_eq!(converter.determinant, -1.0);
        assert_eq!(
            converter.convert_position(Vec3::new(1.0, 2.0, 3.0)),
            Vec3::new(1.0, 2.0, -3.0)
        );
    }

    #[test]
    fn test_position_conversion_is_invertible() {
        let p = Vec3::new(0.3, -1.7, 42.0);
        for a in CoordinateSystem::ALL {
            for b in CoordinateSystem::ALL {
                let Some(forward) = CoordinateConverter::between(a, b) else {
                    continue;
                };
                let back = CoordinateConverter::between(b, a).unwrap();
                let roundtrip = back.convert_position(forward.convert_position(p));
                assert!((roundtrip - p).length() < 1e-5, "{a} -> {b} -> {a}");
            }
        }
    }

    #[test]
    fn test_rotation_commutes_with_conversion() {
        // Rotating then converting must equal converting then applying the
        // converted rotation.
        let rotation = Quat::from_axis_angle(Vec3::new(1.0, 2.0, -0.5).normalize(), 0.8);
        let v = Vec3::new(0.4, -1.2, 2.5);
        for a in CoordinateSystem::ALL {
            for b in CoordinateSystem::ALL {
                let Some(converter) = CoordinateConverter::between(a, b) else {
                    continue;
                };
                let converted = converter.convert_rotation(rotation);
                assert!((converted.length() - 1.0).abs() < 1e-5);

                let expected = converter.convert_position(rotation * v);
                let actual = converted * converter.convert_position(v);
                assert!((expected - actual).length() < 1e-4, "{a} -> {b}");
            }
        }
    }

    #[test]
    fn test_rotation_keeps_scalar_sign() {
        let rotation = -Quat::from_rotation_y(0.6);
        assert!(rotation.w < 0.0);
        for b in CoordinateSystem::ALL {
            if let Some(converter) = CoordinateConverter::between(CoordinateSystem::Rub, b) {
                let converted = converter.convert_rotation(rotation);
                assert!((converted.w - rotation.w).abs() < 1e-5, "RUB -> {b}");
            }
        }
    }

    #[test]
    fn test_rotation_matches_conjugated_matrix() {
        let rotation = Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 2.0);
        for a in CoordinateSystem::ALL {
            for b in CoordinateSystem::ALL {
                let Some(converter) = CoordinateConverter::between(a, b) else {
                    continue;
                };
                let m = converter.matrix;
                let expected = m * Mat3::from_quat(rotation) * m.transpose();
                let actual = Mat3::from_quat(converter.convert_rotation(rotation));
                assert!(actual.abs_diff_eq(expected, 1e-5), "{a} -> {b}");
            }
        }
    }

    #[test]
    fn test_rotation_conversion_is_invertible() {
        let rotation = Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 2.0);
        for a in CoordinateSystem::ALL {
            for b in CoordinateSystem::ALL {
                let Some(forward) = CoordinateConverter::between(a, b) else {
                    continue;
                };
                let back = CoordinateConverter::between(b, a).unwrap();
                let roundtrip = back.convert_rotation(forward.convert_rotation(rotation));
                assert_eq!(roundtrip.to_array(), rotation.to_array(), "{a} -> {b} -> {a}");
            }
        }
    }

    #[test]
    fn test_position_components_are_not_mixed() {
        let converter =
            CoordinateConverter::between(CoordinateSystem::Rub, CoordinateSystem::Rdf).unwrap();
        let p = converter.convert_position(Vec3::new(f32::INFINITY, -0.0, f32::NAN));
        assert_eq!(p.x, f32::INFINITY);
        assert_eq!(p.y.to_bits(), 0.0f32.to_bits());
        assert!(p.z.is_nan());

        let p = Vec3::new(f32::NEG_INFINITY, -0.0, 3.25);
        for a in CoordinateSystem::ALL {
            for b in CoordinateSystem::ALL {
                let Some(forward) = CoordinateConverter::between(a, b) else {
                    continue;
                };
                let back = CoordinateConverter::between(b, a).unwrap();
                let roundtrip = back.convert_position(forward.convert_position(p));
                assert_eq!(
                    roundtrip.to_array().map(f32::to_bits),
                    p.to_array().map(f32::to_bits),
                    "{a} -> {b} -> {a}"
                );
            }
        }
    }
}
