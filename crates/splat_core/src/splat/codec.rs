//! Whole-buffer `.splat` decoding and encoding.

use splat_math::{CoordinateConverter, CoordinateSystem, Quat, Vec3};

use crate::cloud::{GaussianCloud, SplatPoint};
use crate::format::{PackOptions, UnpackOptions};
use crate::splat::record::{
    decode_alpha, decode_color_channel, decode_scale, encode_alpha, encode_color_channel,
    encode_rotation, encode_scale, DecodedRotation, SplatRecord, RECORD_SIZE,
};
use crate::splat::{SplatError, SplatResult};

/// Axis convention the `.splat` format stores its data in.
pub const SPLAT_NATIVE_COORDINATES: CoordinateSystem = CoordinateSystem::Rub;

/// Decode a `.splat` buffer into a cloud in `options.to` coordinates.
///
/// The buffer must be a whole number of 32-byte records. Data is read in
/// `options.from` coordinates when given, otherwise Right-Up-Back.
pub fn try_decode(bytes: &[u8], options: &UnpackOptions) -> SplatResult<GaussianCloud> {
    if bytes.len() % RECORD_SIZE != 0 {
        return Err(SplatError::InvalidLength { len: bytes.len() });
    }

    let num_points = bytes.len() / RECORD_SIZE;
    log::info!("Loading {} points from .splat data", num_points);

    let mut cloud = GaussianCloud::with_capacity(num_points, 0);
    for chunk in bytes.chunks_exact(RECORD_SIZE) {
        let chunk = chunk
            .try_into()
            .map_err(|_| SplatError::InvalidLength { len: bytes.len() })?;
        cloud.push_point(decode_record(&SplatRecord::from_le_bytes(chunk)));
    }
    debug_assert_eq!(cloud.num_points, num_points);

    let source = options.from.or(SPLAT_NATIVE_COORDINATES);
    cloud.convert_coordinates(source, options.to);
    Ok(cloud)
}

/// Decode a `.splat` buffer, returning an empty cloud on malformed input.
pub fn decode(bytes: &[u8], options: &UnpackOptions) -> GaussianCloud {
    match try_decode(bytes, options) {
        Ok(cloud) => cloud,
        Err(err) => {
            log::error!("Failed to decode .splat data: {}", err);
            GaussianCloud::new()
        }
    }
}

fn decode_record(record: &SplatRecord) -> SplatPoint {
    let [r, g, b, a] = record.color;
    SplatPoint {
        position: Vec3::from_array(record.position),
        log_scale: decode_scale(record.scale),
        rotation: DecodedRotation::from_bytes(record.rotation).into_quat(),
        alpha: decode_alpha(a),
        color: Vec3::new(
            decode_color_channel(r),
            decode_color_channel(g),
            decode_color_channel(b),
        ),
        sh: Vec::new(),
    }
}

/// Encode a cloud held in `options.from` coordinates as `.splat` bytes.
///
/// The cloud itself is not modified. Higher-order SH have no place in the
/// format and are dropped.
pub fn encode(cloud: &GaussianCloud, options: &PackOptions) -> SplatResult<Vec<u8>> {
    cloud.validate()?;

    if !cloud.sh.is_empty() {
        log::warn!(
            "Dropping degree {} spherical harmonics, .splat stores base colour only",
            cloud.sh_degree
        );
    }

    let converter = CoordinateConverter::between(options.from, SPLAT_NATIVE_COORDINATES);
    let mut bytes = Vec::with_capacity(cloud.num_points * RECORD_SIZE);

    for i in 0..cloud.num_points {
        let mut position = Vec3::from_slice(&cloud.positions[i * 3..i * 3 + 3]);
        let mut rotation = Quat::from_slice(&cloud.rotations[i * 4..i * 4 + 4]);
        if let Some(converter) = &converter {
            position = converter.convert_position(position);
            rotation = converter.convert_rotation(rotation);
        }

        let color = &cloud.colors[i * 3..i * 3 + 3];
        let record = SplatRecord {
            position: position.to_array(),
            scale: encode_scale(Vec3::from_slice(&cloud.scales[i * 3..i * 3 + 3])),
            color: [
                encode_color_channel(color[0]),
                encode_color_channel(color[1]),
                encode_color_channel(color[2]),
                encode_alpha(cloud.alphas[i]),
            ],
            rotation: encode_rotation(rotation),
        };
        bytes.extend_from_slice(&record.to_le_bytes());
    }

    log::info!("Encoded {} points as .splat data", cloud.num_points);
    Ok(bytes)
}
