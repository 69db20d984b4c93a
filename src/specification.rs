//! The compression specification language.
//!
//! A dataset specification assigns one encoding per variable, written as a single string, a
//! name → specification mapping, or a flat YAML file. All input forms are normalized to one
//! canonical string and resolved through a single parsing path, so they cannot diverge.
//!
//! ```rust
//! use compspec::specification::DatasetSpecification;
//!
//! let specification =
//!     DatasetSpecification::from("lossy,sz,pw_rel,0.0001 temperature:lossy,zfp,rate,4");
//! let resolved = specification.resolve()?;
//! assert_eq!(resolved.default_encoding().to_string(), "lossy,sz,pw_rel,0.0001");
//! assert_eq!(resolved.coordinates_encoding().to_string(), "lossless,lz4,5");
//! # Ok::<(), compspec::specification::SpecificationError>(())
//! ```

mod dataset;
mod variable;

pub use dataset::{is_valid_specification, DatasetSpecification, ResolvedSpecification};
pub use variable::{is_valid_variable_specification, parse_variable_specification};

use std::path::PathBuf;

use thiserror::Error;

use crate::encoding::{
    FilterUnavailableError, ParameterKind, UnknownBackendError, UnknownCompressorError,
    UnknownModeError,
};

/// Separator between the fields of one variable's specification.
pub const PARAMETER_SEPARATOR: &str = ",";

/// Separator between two variable entries in a dataset specification.
pub const VARIABLE_SEPARATOR: &str = " ";

/// Separator between a variable name and its specification.
pub const NAME_SEPARATOR: &str = ":";

/// Reserved name providing the fallback encoding for data variables.
pub const DEFAULT_LABEL: &str = "default";

/// Reserved name providing the fallback encoding for coordinate variables.
pub const COORDINATES_LABEL: &str = "coordinates";

/// The specification synthesized for a missing `default` entry.
pub const DEFAULT_VALUE: &str = "lossless";

/// The specification synthesized for a missing `coordinates` entry (unless `default` is null).
pub const COORDINATES_VALUE: &str = "lossless";

/// A compression specification error.
///
/// All kinds are programmer-facing and fail fast; resolving a dataset specification is
/// all-or-nothing, so a single invalid fragment invalidates the entire call.
#[derive(Debug, Error)]
pub enum SpecificationError {
    /// Malformed specification: wrong field count or unknown keyword.
    #[error("invalid compression specification {0:?}")]
    InvalidSyntax(String),
    /// Lossy compressor name not in the registry.
    #[error(transparent)]
    UnknownCompressor(#[from] UnknownCompressorError),
    /// Lossless backend name not in the registry.
    #[error(transparent)]
    UnknownBackend(#[from] UnknownBackendError),
    /// Mode name not in the registry for the given compressor.
    #[error(transparent)]
    UnknownMode(#[from] UnknownModeError),
    /// Parameter not castable to the mode's declared numeric kind.
    #[error("could not cast parameter {parameter:?} to {kind}")]
    ParameterType {
        /// The rejected parameter text.
        parameter: String,
        /// The numeric kind the mode declares.
        kind: ParameterKind,
    },
    /// Parameter outside the mode's valid domain.
    #[error("parameter {parameter} is outside the valid domain {domain}")]
    ParameterRange {
        /// The rejected parameter value.
        parameter: String,
        /// The valid domain.
        domain: String,
    },
    /// Same variable name given two specifications in one resolve call.
    #[error("variable {0:?} has multiple definitions")]
    DuplicateVariable(String),
    /// Requested native codec not registered in the runtime environment.
    #[error(transparent)]
    FilterUnavailable(#[from] FilterUnavailableError),
    /// I/O failure reading a specification file.
    #[error("failed to read specification file {path:?}")]
    FileRead {
        /// The specification file path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A specification file that is not a flat name → specification mapping.
    #[error("specification file {path:?} is not a flat mapping of names to specifications")]
    FileFormat {
        /// The specification file path.
        path: PathBuf,
        /// The underlying deserialization error.
        #[source]
        source: serde_yaml::Error,
    },
}
