//! Load/save contract shared by every splat file format.
//!
//! Each on-disk format implements [`SplatFormat`]. Loaders hand back a cloud
//! already converted into the caller's requested axis convention; savers are
//! told which convention the cloud is in and convert to their own.
//!
//! Only the legacy `.splat` format ships with this crate. PLY and SPZ
//! adapters plug in through [`FormatRegistry::register`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use splat_math::CoordinateSystem;
use thiserror::Error;

use crate::cloud::GaussianCloud;
use crate::splat::{SplatError, SplatFile};

/// Errors that can occur while loading or saving a splat file.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Splat error: {0}")]
    Splat(#[from] SplatError),

    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    #[error("Adapter error: {0}")]
    Adapter(String),
}

/// Result type for format operations.
pub type FormatResult<T> = Result<T, FormatError>;

/// Options for loading a cloud.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnpackOptions {
    /// Convention the file data is in. `Unspecified` means the format's native one.
    pub from: CoordinateSystem,

    /// Convention the returned cloud should be in
    pub to: CoordinateSystem,
}

impl UnpackOptions {
    /// Load into `to`, reading the file in its native convention.
    pub fn new(to: CoordinateSystem) -> Self {
        Self {
            from: CoordinateSystem::Unspecified,
            to,
        }
    }
}

/// Options for saving a cloud.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PackOptions {
    /// Convention the cloud being saved is in
    pub from: CoordinateSystem,
}

impl PackOptions {
    pub fn new(from: CoordinateSystem) -> Self {
        Self { from }
    }
}

/// A splat file format that can load and save [`GaussianCloud`]s.
pub trait SplatFormat: Send + Sync {
    /// Short human-readable name, used in logs.
    fn name(&self) -> &'static str;

    /// Axis convention the format stores data in.
    fn native_coordinates(&self) -> CoordinateSystem;

    /// Load a cloud from `path`.
    fn try_load(&self, path: &Path, options: &UnpackOptions) -> FormatResult<GaussianCloud>;

    /// Save `cloud` to `path`.
    fn try_save(&self, cloud: &GaussianCloud, options: &PackOptions, path: &Path) -> FormatResult<()>;

    /// Load a cloud, returning an empty one if anything goes wrong.
    ///
    /// Zero points is the uniform "load failed" signal across formats.
    fn load(&self, path: &Path, options: &UnpackOptions) -> GaussianCloud {
        match self.try_load(path, options) {
            Ok(cloud) => cloud,
            Err(err) => {
                log::error!("Failed to load {} file {}: {}", self.name(), path.display(), err);
                GaussianCloud::new()
            }
        }
    }

    /// Save a cloud, returning whether it succeeded.
    fn save(&self, cloud: &GaussianCloud, options: &PackOptions, path: &Path) -> bool {
        match self.try_save(cloud, options, path) {
            Ok(()) => true,
            Err(err) => {
                log::error!("Failed to save {} file {}: {}", self.name(), path.display(), err);
                false
            }
        }
    }
}

/// File kinds recognised by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    Ply,
    Splat,
    Spz,
}

impl FileKind {
    /// Resolve a file kind from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ply" => Some(FileKind::Ply),
            "splat" => Some(FileKind::Splat),
            "spz" => Some(FileKind::Spz),
            _ => None,
        }
    }

    /// Axis convention files of this kind are stored in.
    pub fn native_coordinates(self) -> CoordinateSystem {
        match self {
            FileKind::Ply => CoordinateSystem::Rdf,
            FileKind::Splat | FileKind::Spz => CoordinateSystem::Rub,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            FileKind::Ply => "ply",
            FileKind::Splat => "splat",
            FileKind::Spz => "spz",
        }
    }
}

/// Maps file kinds to the adapters that handle them.
#[derive(Clone, Default)]
pub struct FormatRegistry {
    formats: HashMap<FileKind, Arc<dyn SplatFormat>>,
}

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the built-in `.splat` adapter.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FileKind::Splat, Arc::new(SplatFile));
        registry
    }

    /// Register (or replace) the adapter for a file kind.
    pub fn register(&mut self, kind: FileKind, format: Arc<dyn SplatFormat>) {
        if self.formats.insert(kind, format).is_some() {
            log::debug!("Replaced adapter for .{} files", kind.extension());
        }
    }

    /// Adapter for a file kind, if one is registered.
    pub fn get(&self, kind: FileKind) -> Option<Arc<dyn SplatFormat>> {
        self.formats.get(&kind).cloned()
    }

    /// Adapter for a path, resolved by extension.
    pub fn for_path(&self, path: &Path) -> Option<Arc<dyn SplatFormat>> {
        self.get(FileKind::from_path(path)?)
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self
            .formats
            .iter()
            .map(|(kind, format)| (kind.extension(), format.name()))
            .collect();
        names.sort();
        f.debug_struct("FormatRegistry").field("formats", &names).finish()
    }
}
