//! Legacy `.splat` support.
//!
//! A `.splat` file is a headerless sequence of 32-byte records:
//!
//! | Offset | Type       | Field                              |
//! |--------|------------|------------------------------------|
//! | 0      | `3 x f32`  | position                           |
//! | 12     | `3 x f32`  | linear scale                       |
//! | 24     | `4 x u8`   | RGBA                               |
//! | 28     | `4 x u8`   | quaternion x, y, z, w in [-1, 1]   |
//!
//! Floats are little-endian. Data is stored Right-Up-Back.
//!
//! # Example
//!
//! ```ignore
//! use splat_core::format::{SplatFormat, UnpackOptions};
//! use splat_core::splat::SplatFile;
//! use splat_math::CoordinateSystem;
//! use std::path::Path;
//!
//! let options = UnpackOptions::new(CoordinateSystem::Rdf);
//! let cloud = SplatFile.load(Path::new("scene.splat"), &options);
//! println!("Loaded {} points", cloud.num_points);
//! ```

use std::path::Path;

use splat_math::CoordinateSystem;
use thiserror::Error;

use crate::cloud::{CloudError, GaussianCloud};
use crate::format::{FormatResult, PackOptions, SplatFormat, UnpackOptions};

mod codec;
mod record;

pub use codec::{decode, encode, try_decode, SPLAT_NATIVE_COORDINATES};
pub use record::{DecodedRotation, SplatRecord, RECORD_SIZE};

/// Errors produced by the `.splat` codec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SplatError {
    #[error("Invalid .splat size: {len} bytes is not a multiple of 32")]
    InvalidLength { len: usize },

    #[error("Cannot encode cloud: {0}")]
    Cloud(#[from] CloudError),
}

pub type SplatResult<T> = Result<T, SplatError>;

/// File adapter for the legacy `.splat` format.
#[derive(Clone, Copy, Debug, Default)]
pub struct SplatFile;

impl SplatFormat for SplatFile {
    fn name(&self) -> &'static str {
        "splat"
    }

    fn native_coordinates(&self) -> CoordinateSystem {
        SPLAT_NATIVE_COORDINATES
    }

    fn try_load(&self, path: &Path, options: &UnpackOptions) -> FormatResult<GaussianCloud> {
        let bytes = std::fs::read(path)?;
        log::debug!("Read {} bytes from {}", bytes.len(), path.display());
        Ok(try_decode(&bytes, options)?)
    }

    fn try_save(&self, cloud: &GaussianCloud, options: &PackOptions, path: &Path) -> FormatResult<()> {
        let bytes = encode(cloud, options)?;
        std::fs::write(path, &bytes)?;
        log::info!("Wrote {} points to {}", cloud.num_points, path.display());
        Ok(())
    }
}
