//! Per-variable compression encodings.
//!
//! An [`Encoding`] is a resolved, validated compression choice for one variable: no compression,
//! lossless BLOSC compression, or lossy error-bounded compression. Encodings are immutable once
//! constructed, and construction validates eagerly: an invalid backend/mode/parameter
//! combination fails at construction time, never later.
//!
//! The canonical textual form of an encoding is stable under parsing:
//! ```rust
//! # use compspec::encoding::Encoding;
//! let encoding: Encoding = "lossy,sz,abs,0.1".parse()?;
//! assert_eq!(encoding.to_string().parse::<Encoding>()?, encoding);
//! # Ok::<(), compspec::specification::SpecificationError>(())
//! ```

/// Native HDF5 filter ids, options and availability.
pub mod filter;
/// Lossless backends and compression levels.
pub mod lossless;
/// Lossy compressors, modes and parameter domains.
pub mod lossy;

pub use filter::{
    AssumeAvailable, FilterAvailability, FilterConfiguration, FilterUnavailableError,
    BLOSC_FILTER_ID, SZ3_FILTER_ID, SZ_FILTER_ID, ZFP_FILTER_ID,
};
pub use lossless::{CompressionLevel, LosslessBackend, UnknownBackendError};
pub use lossy::{
    LossyCompressor, LossyMethod, LossyParameter, ParameterDomain, ParameterKind, Sz3Mode, SzMode,
    UnknownCompressorError, UnknownModeError, ZfpMode,
};

use crate::config::global_config;
use crate::specification::{SpecificationError, PARAMETER_SEPARATOR};

/// A lossless encoding: a BLOSC backend and a compression level.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct LosslessEncoding {
    /// The BLOSC backend.
    pub backend: LosslessBackend,
    /// The compression level.
    pub level: CompressionLevel,
}

impl LosslessEncoding {
    /// Create a new [`LosslessEncoding`].
    ///
    /// Both field types are bounds-checked on construction, so no further validation applies.
    #[must_use]
    pub fn new(backend: LosslessBackend, level: CompressionLevel) -> Self {
        Self { backend, level }
    }

    /// Create a [`LosslessEncoding`] from the global configuration defaults.
    #[must_use]
    pub fn from_defaults() -> Self {
        let config = global_config();
        Self {
            backend: config.lossless_backend(),
            level: config.lossless_level(),
        }
    }
}

/// A lossy encoding: a (compressor, mode) pair and its numeric parameter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LossyEncoding {
    method: LossyMethod,
    parameter: LossyParameter,
}

impl LossyEncoding {
    /// Create a new [`LossyEncoding`], validating the parameter against the method's domain.
    ///
    /// An integer parameter given to a float mode (or an integral float given to an integer
    /// mode) is coerced to the mode's declared kind.
    ///
    /// # Errors
    /// Returns [`SpecificationError::ParameterType`] if the parameter cannot be represented in
    /// the mode's numeric kind, or [`SpecificationError::ParameterRange`] if it lies outside the
    /// mode's valid domain.
    pub fn new(method: LossyMethod, parameter: LossyParameter) -> Result<Self, SpecificationError> {
        let domain = method.domain();
        let parameter = match (domain.kind, parameter) {
            (ParameterKind::Integer, LossyParameter::Float(value)) => {
                if value.fract() == 0.0 && value >= 0.0 && value <= f64::from(u32::MAX) {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    let value = value as u32;
                    LossyParameter::Integer(value)
                } else {
                    return Err(SpecificationError::ParameterType {
                        parameter: value.to_string(),
                        kind: domain.kind,
                    });
                }
            }
            (ParameterKind::Float, LossyParameter::Integer(value)) => {
                LossyParameter::Float(f64::from(value))
            }
            (_, parameter) => parameter,
        };
        if !domain.contains(parameter.value()) {
            return Err(SpecificationError::ParameterRange {
                parameter: parameter.to_string(),
                domain: domain.to_string(),
            });
        }
        Ok(Self { method, parameter })
    }

    /// The (compressor, mode) pair.
    #[must_use]
    pub fn method(&self) -> LossyMethod {
        self.method
    }

    /// The validated parameter.
    #[must_use]
    pub fn parameter(&self) -> LossyParameter {
        self.parameter
    }
}

/// A resolved, validated compression choice for one variable.
#[derive(Clone, Debug, PartialEq)]
pub enum Encoding {
    /// No compression.
    Null,
    /// Lossless compression with the BLOSC filter.
    Lossless(LosslessEncoding),
    /// Lossy compression with an error-bounded filter.
    Lossy(LossyEncoding),
}

impl From<LosslessEncoding> for Encoding {
    fn from(encoding: LosslessEncoding) -> Self {
        Self::Lossless(encoding)
    }
}

impl From<LossyEncoding> for Encoding {
    fn from(encoding: LossyEncoding) -> Self {
        Self::Lossy(encoding)
    }
}

impl Encoding {
    /// Returns true for [`Encoding::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Re-run the domain validity checks.
    ///
    /// Construction already validates eagerly; this re-verification is what the dataset
    /// resolver applies to every entry before returning.
    ///
    /// # Errors
    /// Returns a [`SpecificationError`] if a parameter lies outside its valid domain.
    pub fn validate(&self) -> Result<(), SpecificationError> {
        match self {
            Self::Null => Ok(()),
            Self::Lossless(encoding) => {
                let level = u8::from(encoding.level);
                if (1..=9).contains(&level) {
                    Ok(())
                } else {
                    Err(SpecificationError::ParameterRange {
                        parameter: level.to_string(),
                        domain: "[1, 9]".to_string(),
                    })
                }
            }
            Self::Lossy(encoding) => {
                LossyEncoding::new(encoding.method, encoding.parameter).map(|_| ())
            }
        }
    }

    /// The native filter selection for this encoding, or [`None`] for [`Encoding::Null`].
    #[must_use]
    pub fn filter_configuration(&self) -> Option<FilterConfiguration> {
        match self {
            Self::Null => None,
            Self::Lossless(encoding) => {
                Some(FilterConfiguration::blosc(encoding.backend, encoding.level))
            }
            Self::Lossy(encoding) => Some(FilterConfiguration::lossy(
                encoding.method,
                encoding.parameter,
            )),
        }
    }

    /// A one-line human description of this encoding, or [`None`] for [`Encoding::Null`].
    ///
    /// The description always contains the literal token `id:<integer>` carrying the native
    /// filter id, which downstream availability checks extract.
    #[must_use]
    pub fn description(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Lossless(encoding) => Some(format!(
                "Losslessly compressed with the HDF5 Blosc filter: {self} \
                 (Using {:?} with compression level {}, filter id:{BLOSC_FILTER_ID})",
                encoding.backend.name(),
                encoding.level,
            )),
            Self::Lossy(encoding) => Some(format!(
                "Lossy compressed using the HDF5 filters with specification: {self} \
                 (Using {:?} with mode {:?} and parameter {}, filter id:{})",
                encoding.method.compressor().name(),
                encoding.method.mode_name(),
                encoding.parameter,
                filter::lossy_filter_id(encoding.method.compressor()),
            )),
        }
    }

    /// Confirm that the backing native filter is registered.
    ///
    /// # Errors
    /// Returns a [`FilterUnavailableError`] if the probe reports the filter as unregistered.
    pub fn ensure_available(
        &self,
        probe: &dyn FilterAvailability,
    ) -> Result<(), FilterUnavailableError> {
        match self.filter_configuration() {
            Some(configuration) if !probe.is_available(configuration.filter_id()) => {
                Err(FilterUnavailableError::new(configuration.filter_id()))
            }
            _ => Ok(()),
        }
    }
}

impl core::fmt::Display for Encoding {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Lossless(encoding) => write!(
                f,
                "lossless{PARAMETER_SEPARATOR}{}{PARAMETER_SEPARATOR}{}",
                encoding.backend, encoding.level
            ),
            Self::Lossy(encoding) => write!(
                f,
                "lossy{PARAMETER_SEPARATOR}{}{PARAMETER_SEPARATOR}{}{PARAMETER_SEPARATOR}{}",
                encoding.method.compressor(),
                encoding.method.mode_name(),
                encoding.parameter
            ),
        }
    }
}
