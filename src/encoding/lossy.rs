use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A lossy compressor family.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LossyCompressor {
    /// [SZ](https://szcompressor.org/): an error-bounded lossy compressor for scientific data.
    Sz,
    /// [SZ3](https://github.com/szcompressor/SZ3): the modular successor of SZ.
    Sz3,
    /// [zfp](https://zfp.readthedocs.io/): compressed numerical arrays with fixed rate, precision or accuracy.
    Zfp,
}

impl LossyCompressor {
    /// The lowercase name used in specification strings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sz => "sz",
            Self::Sz3 => "sz3",
            Self::Zfp => "zfp",
        }
    }
}

impl core::fmt::Display for LossyCompressor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A compressor name not present in the lossy compressor registry.
///
/// Compressor name comparison is case-sensitive lowercase.
#[derive(Debug, Error)]
#[error("compressor {0:?} is not a supported lossy compressor")]
pub struct UnknownCompressorError(pub String);

impl std::str::FromStr for LossyCompressor {
    type Err = UnknownCompressorError;
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "sz" => Ok(Self::Sz),
            "sz3" => Ok(Self::Sz3),
            "zfp" => Ok(Self::Zfp),
            _ => Err(UnknownCompressorError(name.to_string())),
        }
    }
}

/// An SZ error-control mode.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SzMode {
    /// Absolute error bound.
    Abs,
    /// Relative error bound.
    Rel,
    /// Pointwise relative error bound.
    PwRel,
}

/// An SZ3 error-control mode.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Sz3Mode {
    /// Absolute error bound.
    Abs,
    /// Relative error bound.
    Rel,
    /// L2 norm error bound.
    Norm2,
    /// Peak signal-to-noise ratio target.
    Psnr,
}

/// A zfp error-control mode.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ZfpMode {
    /// Fixed rate: compressed bits per value.
    Rate,
    /// Fixed precision: uncompressed bits per value.
    Precision,
    /// Fixed accuracy: absolute error tolerance.
    Accuracy,
}

/// A mode name not present in the registry for the given compressor.
#[derive(Debug, Error)]
#[error("mode {mode:?} is not a valid mode for compressor {compressor}")]
pub struct UnknownModeError {
    /// The compressor family.
    pub compressor: LossyCompressor,
    /// The rejected mode name.
    pub mode: String,
}

/// A validated (compressor, mode) pair.
///
/// Mode membership is compressor-specific, so the pair is a closed enum; an invalid combination
/// cannot be represented, and [`UnknownModeError`] can only arise at the text boundary in
/// [`LossyMethod::new`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LossyMethod {
    /// An SZ mode.
    Sz(SzMode),
    /// An SZ3 mode.
    Sz3(Sz3Mode),
    /// A zfp mode.
    Zfp(ZfpMode),
}

impl LossyMethod {
    /// Look up `mode` within `compressor`'s modes.
    ///
    /// Mode name comparison is case-sensitive lowercase.
    ///
    /// # Errors
    /// Returns an [`UnknownModeError`] if `compressor` has no mode named `mode`.
    pub fn new(compressor: LossyCompressor, mode: &str) -> Result<Self, UnknownModeError> {
        let method = match (compressor, mode) {
            (LossyCompressor::Sz, "abs") => Self::Sz(SzMode::Abs),
            (LossyCompressor::Sz, "rel") => Self::Sz(SzMode::Rel),
            (LossyCompressor::Sz, "pw_rel") => Self::Sz(SzMode::PwRel),
            (LossyCompressor::Sz3, "abs") => Self::Sz3(Sz3Mode::Abs),
            (LossyCompressor::Sz3, "rel") => Self::Sz3(Sz3Mode::Rel),
            (LossyCompressor::Sz3, "norm2") => Self::Sz3(Sz3Mode::Norm2),
            (LossyCompressor::Sz3, "psnr") => Self::Sz3(Sz3Mode::Psnr),
            (LossyCompressor::Zfp, "rate") => Self::Zfp(ZfpMode::Rate),
            (LossyCompressor::Zfp, "precision") => Self::Zfp(ZfpMode::Precision),
            (LossyCompressor::Zfp, "accuracy") => Self::Zfp(ZfpMode::Accuracy),
            _ => {
                return Err(UnknownModeError {
                    compressor,
                    mode: mode.to_string(),
                })
            }
        };
        Ok(method)
    }

    /// The compressor family of this method.
    #[must_use]
    pub const fn compressor(self) -> LossyCompressor {
        match self {
            Self::Sz(_) => LossyCompressor::Sz,
            Self::Sz3(_) => LossyCompressor::Sz3,
            Self::Zfp(_) => LossyCompressor::Zfp,
        }
    }

    /// The mode name used in specification strings.
    #[must_use]
    pub const fn mode_name(self) -> &'static str {
        match self {
            Self::Sz(SzMode::Abs) | Self::Sz3(Sz3Mode::Abs) => "abs",
            Self::Sz(SzMode::Rel) | Self::Sz3(Sz3Mode::Rel) => "rel",
            Self::Sz(SzMode::PwRel) => "pw_rel",
            Self::Sz3(Sz3Mode::Norm2) => "norm2",
            Self::Sz3(Sz3Mode::Psnr) => "psnr",
            Self::Zfp(ZfpMode::Rate) => "rate",
            Self::Zfp(ZfpMode::Precision) => "precision",
            Self::Zfp(ZfpMode::Accuracy) => "accuracy",
        }
    }

    /// The option keyword used by the native filter wrappers.
    ///
    /// Some compressors rename modes for the native filter call; this registry owns the
    /// translation so the specification parser stays codec-agnostic.
    #[must_use]
    pub const fn native_name(self) -> &'static str {
        match self {
            Self::Sz(SzMode::Abs) | Self::Sz3(Sz3Mode::Abs) => "absolute",
            Self::Sz(SzMode::Rel) | Self::Sz3(Sz3Mode::Rel) => "relative",
            Self::Sz(SzMode::PwRel) => "pointwise_relative",
            Self::Sz3(Sz3Mode::Norm2) => "norm2",
            Self::Sz3(Sz3Mode::Psnr) => "peak_signal_to_noise_ratio",
            Self::Zfp(ZfpMode::Rate) => "rate",
            Self::Zfp(ZfpMode::Precision) => "precision",
            Self::Zfp(ZfpMode::Accuracy) => "accuracy",
        }
    }

    /// The valid parameter domain for this method.
    #[must_use]
    pub const fn domain(self) -> ParameterDomain {
        match self {
            Self::Sz(SzMode::Abs) | Self::Sz3(Sz3Mode::Abs) | Self::Zfp(ZfpMode::Accuracy) => {
                ParameterDomain::float(0.0, f64::INFINITY)
            }
            Self::Sz(SzMode::Rel | SzMode::PwRel) | Self::Sz3(Sz3Mode::Rel | Sz3Mode::Norm2) => {
                ParameterDomain::float(0.0, 1.0)
            }
            Self::Sz3(Sz3Mode::Psnr) => ParameterDomain::float(1.0, 120.0),
            Self::Zfp(ZfpMode::Rate) => ParameterDomain::float(0.0, 32.0),
            Self::Zfp(ZfpMode::Precision) => ParameterDomain::integer(1.0, 32.0),
        }
    }
}

/// The numeric kind of a mode's parameter.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ParameterKind {
    /// An unsigned integer parameter.
    Integer,
    /// A floating point parameter.
    Float,
}

impl core::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::Float => "float",
        })
    }
}

/// The valid interval for a mode's parameter.
///
/// Both bounds are exclusive; `high` may be infinite.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ParameterDomain {
    /// The numeric kind of the parameter.
    pub kind: ParameterKind,
    /// The exclusive lower bound.
    pub low: f64,
    /// The exclusive upper bound.
    pub high: f64,
}

impl ParameterDomain {
    const fn float(low: f64, high: f64) -> Self {
        Self {
            kind: ParameterKind::Float,
            low,
            high,
        }
    }

    const fn integer(low: f64, high: f64) -> Self {
        Self {
            kind: ParameterKind::Integer,
            low,
            high,
        }
    }

    /// Returns true if `value` lies strictly inside the domain.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        value > self.low && value < self.high
    }
}

impl core::fmt::Display for ParameterDomain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// A lossy mode parameter, integer or floating point per the mode's [`ParameterDomain`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LossyParameter {
    /// An unsigned integer parameter (zfp precision).
    Integer(u32),
    /// A floating point parameter.
    Float(f64),
}

impl LossyParameter {
    /// The parameter as a float, for domain checks.
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Integer(value) => f64::from(value),
            Self::Float(value) => value,
        }
    }
}

impl core::fmt::Display for LossyParameter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn method_lookup() {
        assert!(LossyMethod::new(LossyCompressor::Sz, "abs").is_ok());
        assert!(LossyMethod::new(LossyCompressor::Sz, "norm2").is_err());
        assert!(LossyMethod::new(LossyCompressor::Sz3, "norm2").is_ok());
        assert!(LossyMethod::new(LossyCompressor::Zfp, "pw_rel").is_err());
        assert!(LossyMethod::new(LossyCompressor::Zfp, "RATE").is_err());
    }

    #[test]
    fn domains_are_open() {
        let rate = LossyMethod::Zfp(ZfpMode::Rate).domain();
        assert!(!rate.contains(0.0));
        assert!(rate.contains(0.5));
        assert!(rate.contains(31.9));
        assert!(!rate.contains(32.0));

        let abs = LossyMethod::Sz(SzMode::Abs).domain();
        assert!(!abs.contains(0.0));
        assert!(abs.contains(1e12));
        assert!(!abs.contains(f64::INFINITY));
    }

    #[test]
    fn native_names() {
        assert_eq!(LossyMethod::Sz(SzMode::Abs).native_name(), "absolute");
        assert_eq!(
            LossyMethod::Sz(SzMode::PwRel).native_name(),
            "pointwise_relative"
        );
        assert_eq!(
            LossyMethod::Sz3(Sz3Mode::Psnr).native_name(),
            "peak_signal_to_noise_ratio"
        );
        assert_eq!(LossyMethod::Zfp(ZfpMode::Rate).native_name(), "rate");
    }

    #[test]
    fn precision_is_integer() {
        assert_eq!(
            LossyMethod::Zfp(ZfpMode::Precision).domain().kind,
            ParameterKind::Integer
        );
        assert_eq!(
            LossyMethod::Zfp(ZfpMode::Rate).domain().kind,
            ParameterKind::Float
        );
    }
}
