//! Splat Core - Gaussian splat scenes and file conversion.
//!
//! This crate provides:
//!
//! - **Scene model**: `GaussianCloud`, flat per-point attribute buffers
//! - **Legacy `.splat` codec**: 32-byte record decoding/encoding
//! - **Format contract**: `SplatFormat` load/save adapters and a registry
//! - **Conversion**: file-to-file conversion between axis conventions
//!
//! # Example
//!
//! ```ignore
//! use splat_core::{convert_file, ConversionConfig, FormatRegistry};
//! use splat_math::CoordinateSystem;
//!
//! let config = ConversionConfig::new().with_to(CoordinateSystem::Rdf);
//! let report = convert_file(
//!     "in.splat".as_ref(),
//!     "out.splat".as_ref(),
//!     &config,
//!     &FormatRegistry::with_defaults(),
//! )?;
//! println!("Converted {} points", report.num_points);
//! ```

pub mod cloud;
pub mod config;
pub mod convert;
pub mod format;
pub mod splat;

// Re-export commonly used types
pub use cloud::{sh_coeffs_per_channel, CloudError, GaussianCloud, SplatPoint};
pub use config::{ConfigError, ConversionConfig};
pub use convert::{convert_file, ConversionReport, ConvertError};
pub use format::{FileKind, FormatError, FormatRegistry, PackOptions, SplatFormat, UnpackOptions};
pub use splat::{SplatError, SplatFile};
pub use splat_math::CoordinateSystem;
