//! The 32-byte `.splat` record and its per-attribute quantization.

use bytemuck::{Pod, Zeroable};
use splat_math::{inverse_sigmoid, sigmoid, Quat, Vec3, SH_C0};

/// Size of one record on disk.
pub const RECORD_SIZE: usize = 32;

/// Smallest linear scale accepted before taking its log.
const MIN_SCALE: f32 = 1e-8;

/// Requantization passes tried before searching neighbouring bytes.
const MAX_ROTATION_PASSES: usize = 8;

/// One splat as laid out on disk.
///
/// Floats are little-endian on disk; use [`SplatRecord::from_le_bytes`] and
/// [`SplatRecord::to_le_bytes`] rather than casting raw buffers.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SplatRecord {
    /// Position x, y, z
    pub position: [f32; 3],

    /// Linear scale x, y, z
    pub scale: [f32; 3],

    /// RGBA, 0-255
    pub color: [u8; 4],

    /// Quaternion x, y, z, w mapped from [-1, 1] to 0-255
    pub rotation: [u8; 4],
}

const _: () = assert!(std::mem::size_of::<SplatRecord>() == RECORD_SIZE);

impl SplatRecord {
    /// Read a record from its on-disk bytes.
    pub fn from_le_bytes(bytes: &[u8; RECORD_SIZE]) -> Self {
        let mut record: SplatRecord = bytemuck::cast(*bytes);
        record.position = record.position.map(f32_from_le);
        record.scale = record.scale.map(f32_from_le);
        record
    }

    /// Serialize into the on-disk byte order.
    pub fn to_le_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut record = *self;
        record.position = record.position.map(f32_to_le);
        record.scale = record.scale.map(f32_to_le);
        bytemuck::cast(record)
    }
}

fn f32_from_le(value: f32) -> f32 {
    f32::from_bits(u32::from_le(value.to_bits()))
}

fn f32_to_le(value: f32) -> f32 {
    f32::from_bits(value.to_bits().to_le())
}

/// Result of unpacking a quantized quaternion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DecodedRotation {
    /// The components had a nonzero norm and were normalized.
    Normalized(Quat),

    /// The components were all zero; no orientation can be recovered.
    Degenerate,
}

impl DecodedRotation {
    /// Normalize raw x, y, z, w components.
    pub fn from_components(components: [f32; 4]) -> Self {
        let q = Quat::from_array(components);
        let norm = q.length();
        if norm > 0.0 {
            DecodedRotation::Normalized(q / norm)
        } else {
            DecodedRotation::Degenerate
        }
    }

    /// Unpack four rotation bytes, mapping each from 0-255 to [-1, 1].
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::from_components(bytes.map(|b| (b as f32 / 255.0) * 2.0 - 1.0))
    }

    /// The rotation, with degenerate input falling back to identity.
    pub fn into_quat(self) -> Quat {
        match self {
            DecodedRotation::Normalized(q) => q,
            DecodedRotation::Degenerate => Quat::IDENTITY,
        }
    }
}

/// Linear scale to log scale, clamping non-positive input.
pub fn decode_scale(scale: [f32; 3]) -> Vec3 {
    Vec3::from_array(scale.map(|s| s.max(MIN_SCALE).ln()))
}

/// Log scale back to linear scale.
pub fn encode_scale(log_scale: Vec3) -> [f32; 3] {
    log_scale.to_array().map(f32::exp)
}

/// RGB byte to SH DC coefficient.
pub fn decode_color_channel(byte: u8) -> f32 {
    (byte as f32 / 255.0 - 0.5) / SH_C0
}

/// SH DC coefficient to RGB byte.
pub fn encode_color_channel(dc: f32) -> u8 {
    quantize_unit(dc * SH_C0 + 0.5)
}

/// Opacity byte to logit.
pub fn decode_alpha(byte: u8) -> f32 {
    inverse_sigmoid(byte as f32 / 255.0)
}

/// Logit to opacity byte.
pub fn encode_alpha(alpha: f32) -> u8 {
    quantize_unit(sigmoid(alpha))
}

/// Quaternion to rotation bytes.
///
/// Decoding renormalizes, so rounding each component on its own can produce
/// bytes that requantize differently. The result is always a byte group that
/// decodes and re-encodes to itself, chosen as close to `rotation` as found.
pub fn encode_rotation(rotation: Quat) -> [u8; 4] {
    let start = quantize_rotation(rotation);
    let mut bytes = start;
    for _ in 0..MAX_ROTATION_PASSES {
        let next = requantize_rotation(bytes);
        if next == bytes {
            return bytes;
        }
        bytes = next;
    }

    nearest_stable_rotation(start, rotation).unwrap_or_else(|| axis_rotation(rotation))
}

fn quantize_rotation(rotation: Quat) -> [u8; 4] {
    rotation.to_array().map(|c| quantize_unit((c + 1.0) / 2.0))
}

fn requantize_rotation(bytes: [u8; 4]) -> [u8; 4] {
    quantize_rotation(DecodedRotation::from_bytes(bytes).into_quat())
}

/// Closest stable byte group within one step of `start` in every component.
fn nearest_stable_rotation(start: [u8; 4], rotation: Quat) -> Option<[u8; 4]> {
    let mut best: Option<([u8; 4], f32)> = None;
    for code in 0..81u32 {
        let mut candidate = start;
        let mut in_range = true;
        for (i, byte) in candidate.iter_mut().enumerate() {
            let delta = (code / 3u32.pow(i as u32) % 3) as i16 - 1;
            match u8::try_from(*byte as i16 + delta) {
                Ok(b) => *byte = b,
                Err(_) => in_range = false,
            }
        }
        if !in_range || requantize_rotation(candidate) != candidate {
            continue;
        }

        let error = (DecodedRotation::from_bytes(candidate).into_quat() - rotation).length_squared();
        if best.map_or(true, |(_, best_error)| error < best_error) {
            best = Some((candidate, error));
        }
    }
    best.map(|(candidate, _)| candidate)
}

/// The signed unit axis nearest `rotation`. These byte groups are always stable.
fn axis_rotation(rotation: Quat) -> [u8; 4] {
    let c = rotation.to_array();
    let axis = (0..4).fold(3, |best, i| if c[i].abs() > c[best].abs() { i } else { best });
    let mut bytes = [128; 4];
    bytes[axis] = if c[axis] < 0.0 { 0 } else { 255 };
    bytes
}

/// Map [0, 1] onto a byte, rounding half away from zero.
fn quantize_unit(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}
