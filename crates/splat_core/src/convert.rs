//! File-to-file scene conversion.
//!
//! Loads a scene with whichever adapter handles the input extension,
//! converting it into the configured target convention, then saves it with
//! the output adapter. The saved data is declared to already be in the
//! target convention, so the output adapter only applies its own native
//! remapping.

use std::path::{Path, PathBuf};

use splat_math::CoordinateSystem;
use thiserror::Error;

use crate::config::{ConfigError, ConversionConfig};
use crate::format::{FileKind, FormatError, FormatRegistry, PackOptions, UnpackOptions};

/// Errors that can occur during a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Input file does not exist: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("No adapter registered for .{0} files")]
    NoAdapter(&'static str),

    #[error("Failed to load input file or file contains no points: {}", .0.display())]
    EmptyCloud(PathBuf),

    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

pub type ConvertResult<T> = Result<T, ConvertError>;

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        ConvertError::Format(FormatError::Io(err))
    }
}

/// Summary of a finished conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionReport {
    pub num_points: usize,
    pub sh_degree: u8,
    pub antialiased: bool,

    /// Convention the input was read in
    pub source: CoordinateSystem,

    /// Convention the scene was converted to
    pub target: CoordinateSystem,

    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl ConversionReport {
    /// Input size over output size, or 0 if the output is empty.
    pub fn compression_ratio(&self) -> f64 {
        if self.output_bytes == 0 {
            return 0.0;
        }
        self.input_bytes as f64 / self.output_bytes as f64
    }
}

/// Convert the scene at `input` into `output`.
pub fn convert_file(
    input: &Path,
    output: &Path,
    config: &ConversionConfig,
    registry: &FormatRegistry,
) -> ConvertResult<ConversionReport> {
    config.validate()?;

    let input_kind = FileKind::from_path(input)
        .ok_or_else(|| ConvertError::UnsupportedFormat(input.to_path_buf()))?;
    let output_kind = FileKind::from_path(output)
        .ok_or_else(|| ConvertError::UnsupportedFormat(output.to_path_buf()))?;

    if !input.exists() {
        return Err(ConvertError::MissingInput(input.to_path_buf()));
    }

    let reader = registry
        .get(input_kind)
        .ok_or(ConvertError::NoAdapter(input_kind.extension()))?;
    let writer = registry
        .get(output_kind)
        .ok_or(ConvertError::NoAdapter(output_kind.extension()))?;

    let source = config.from.or(input_kind.native_coordinates());
    log::info!("Loading {} ({} -> {})", input.display(), source, config.to);

    let unpack = UnpackOptions {
        from: source,
        to: config.to,
    };
    let mut cloud = reader.try_load(input, &unpack)?;
    if cloud.is_empty() {
        return Err(ConvertError::EmptyCloud(input.to_path_buf()));
    }

    cloud.antialiased = config.antialiased;
    log::info!(
        "Loaded {} points (SH degree {}, antialiased: {})",
        cloud.num_points,
        cloud.sh_degree,
        cloud.antialiased
    );

    log::info!("Saving to {}", output.display());
    writer.try_save(&cloud, &PackOptions::new(config.to), output)?;

    let report = ConversionReport {
        num_points: cloud.num_points,
        sh_degree: cloud.sh_degree,
        antialiased: cloud.antialiased,
        source,
        target: config.to,
        input_bytes: std::fs::metadata(input)?.len(),
        output_bytes: std::fs::metadata(output)?.len(),
    };
    log::info!(
        "Conversion complete: {} -> {} bytes ({:.1}x)",
        report.input_bytes,
        report.output_bytes,
        report.compression_ratio()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splat::{self, SplatRecord};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("splat_convert_{}_{}", std::process::id(), name))
    }

    fn write_records(path: &Path, count: usize) {
        let mut bytes = Vec::new();
        for i in 0..count {
            let f = i as f32;
            let record = SplatRecord {
                position: [f, f + 1.0, f + 2.0],
                scale: [1.0, 1.0, 1.0],
                color: [200, 100, 50, 255],
                rotation: [128, 128, 128, 255],
            };
            bytes.extend_from_slice(&record.to_le_bytes());
        }
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn test_convert_splat_to_splat() {
        let _ = env_logger::builder().is_test(true).try_init();

        let input = temp_path("in.splat");
        let output = temp_path("out.splat");
        write_records(&input, 3);

        let config = ConversionConfig::new()
            .with_to(CoordinateSystem::Rdf)
            .with_antialiased(true);
        let registry = FormatRegistry::with_defaults();
        let report = convert_file(&input, &output, &config, &registry).unwrap();

        assert_eq!(report.num_points, 3);
        assert!(report.antialiased);
        assert_eq!(report.source, CoordinateSystem::Rub);
        assert_eq!(report.target, CoordinateSystem::Rdf);
        assert_eq!(report.input_bytes, 96);
        assert_eq!(report.output_bytes, 96);
        assert!((report.compression_ratio() - 1.0).abs() < 1e-9);

        // Saving declares the data as RDF, so the file comes back in RUB.
        assert_eq!(std::fs::read(&output).unwrap(), std::fs::read(&input).unwrap());

        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&output).ok();
    }

    #[test]
    fn test_source_override() {
        let input = temp_path("override_in.splat");
        let output = temp_path("override_out.splat");
        write_records(&input, 1);

        let config = ConversionConfig::new()
            .with_from(CoordinateSystem::Rdf)
            .with_to(CoordinateSystem::Rub);
        let registry = FormatRegistry::with_defaults();
        let report = convert_file(&input, &output, &config, &registry).unwrap();
        assert_eq!(report.source, CoordinateSystem::Rdf);

        let cloud = splat::decode(
            &std::fs::read(&output).unwrap(),
            &UnpackOptions::new(CoordinateSystem::Rub),
        );
        assert_eq!(cloud.positions, vec![0.0, -1.0, -2.0]);

        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&output).ok();
    }

    #[test]
    fn test_unsupported_extension() {
        let err = convert_file(
            Path::new("scene.obj"),
            Path::new("scene.splat"),
            &ConversionConfig::default(),
            &FormatRegistry::with_defaults(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_input() {
        let err = convert_file(
            &temp_path("missing.splat"),
            &temp_path("missing_out.splat"),
            &ConversionConfig::default(),
            &FormatRegistry::with_defaults(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::MissingInput(_)));
    }

    #[test]
    fn test_missing_adapter() {
        let input = temp_path("adapter_in.splat");
        write_records(&input, 1);

        let err = convert_file(
            &input,
            &temp_path("adapter_out.spz"),
            &ConversionConfig::default(),
            &FormatRegistry::with_defaults(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::NoAdapter("spz")));

        std::fs::remove_file(&input).ok();
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let input = temp_path("empty_in.splat");
        std::fs::write(&input, Vec::<u8>::new()).unwrap();

        let err = convert_file(
            &input,
            &temp_path("empty_out.splat"),
            &ConversionConfig::default(),
            &FormatRegistry::with_defaults(),
        )
        .unwrap_err();
        assert!(matches!(err, ConvertError::EmptyCloud(_)));

        std::fs::remove_file(&input).ok();
    }

    #[test]
    fn test_truncated_input_is_a_format_error() {
        let input = temp_path("truncated_in.splat");
        std::fs::write(&input, [0u8; 33]).unwrap();

        let err = convert_file(
            &input,
            &temp_path("truncated_out.splat"),
            &ConversionConfig::default(),
            &FormatRegistry::with_defaults(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Format(FormatError::Splat(splat::SplatError::InvalidLength { len: 33 }))
        ));

        std::fs::remove_file(&input).ok();
    }
}
