//! Native HDF5 filter selection.
//!
//! The host serialization library selects a registered native filter by its numeric id plus an
//! ordered options tuple (the HDF5 `cd_values`). This module owns the mapping from resolved
//! encodings to those tuples; the filters themselves are opaque collaborators.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::lossless::{CompressionLevel, LosslessBackend};
use super::lossy::{LossyCompressor, LossyMethod, LossyParameter, SzMode, Sz3Mode, ZfpMode};

/// The registered HDF5 filter id of the BLOSC filter.
pub const BLOSC_FILTER_ID: u32 = 32001;
/// The registered HDF5 filter id of the ZFP filter.
pub const ZFP_FILTER_ID: u32 = 32013;
/// The registered HDF5 filter id of the SZ filter.
pub const SZ_FILTER_ID: u32 = 32017;
/// The registered HDF5 filter id of the SZ3 filter.
pub const SZ3_FILTER_ID: u32 = 32024;

/// The BLOSC byte-shuffle mode passed to the native filter.
const BLOSC_SHUFFLE: u32 = 1;

/// The registered filter id for a lossy compressor family.
#[must_use]
pub const fn lossy_filter_id(compressor: LossyCompressor) -> u32 {
    match compressor {
        LossyCompressor::Sz => SZ_FILTER_ID,
        LossyCompressor::Sz3 => SZ3_FILTER_ID,
        LossyCompressor::Zfp => ZFP_FILTER_ID,
    }
}

/// The conventional name of a registered filter id, for diagnostics.
#[must_use]
pub const fn filter_name(filter_id: u32) -> &'static str {
    match filter_id {
        BLOSC_FILTER_ID => "blosc",
        ZFP_FILTER_ID => "zfp",
        SZ_FILTER_ID => "sz",
        SZ3_FILTER_ID => "sz3",
        _ => "unknown",
    }
}

/// A native filter selection: the registered HDF5 filter id and its ordered options.
#[derive(Serialize, Deserialize, Clone, Eq, PartialEq, Debug, Display)]
#[display("{}", serde_json::to_string(self).unwrap_or_default())]
pub struct FilterConfiguration {
    /// The registered HDF5 filter id.
    filter_id: u32,
    /// The ordered filter options (`cd_values`).
    options: Vec<u32>,
}

impl FilterConfiguration {
    /// The registered HDF5 filter id.
    #[must_use]
    pub fn filter_id(&self) -> u32 {
        self.filter_id
    }

    /// The ordered filter options.
    #[must_use]
    pub fn options(&self) -> &[u32] {
        &self.options
    }

    /// The BLOSC filter configuration for a lossless backend and compression level.
    #[must_use]
    pub(crate) fn blosc(backend: LosslessBackend, level: CompressionLevel) -> Self {
        // (reserved x4, level, shuffle, compressor code), as the hdf5 blosc wrapper lays it out
        Self {
            filter_id: BLOSC_FILTER_ID,
            options: vec![
                0,
                0,
                0,
                0,
                u32::from(u8::from(level)),
                BLOSC_SHUFFLE,
                backend.compressor_code(),
            ],
        }
    }

    /// The filter configuration for a lossy method and parameter.
    pub(crate) fn lossy(method: LossyMethod, parameter: LossyParameter) -> Self {
        match method {
            LossyMethod::Sz(mode) => Self::sz(mode, parameter),
            LossyMethod::Sz3(mode) => Self::sz3(mode, parameter),
            LossyMethod::Zfp(mode) => Self::zfp(mode, parameter),
        }
    }

    fn sz(mode: SzMode, parameter: LossyParameter) -> Self {
        let mode_code = match mode {
            SzMode::Abs => 0,
            SzMode::Rel => 1,
            SzMode::PwRel => 10,
        };
        let (low, high) = pack_double(parameter.value());
        // The SZ filter takes the error bound once per supported mode slot.
        let options = vec![mode_code, high, low, high, low, high, low, high, low];
        log::info!("sz mode {mode_code} selected with filter options {options:?}");
        Self {
            filter_id: SZ_FILTER_ID,
            options,
        }
    }

    fn sz3(mode: Sz3Mode, parameter: LossyParameter) -> Self {
        let mode_code = match mode {
            Sz3Mode::Abs => 0,
            Sz3Mode::Rel => 1,
            Sz3Mode::Norm2 => 2,
            Sz3Mode::Psnr => 3,
        };
        let (low, high) = pack_double(parameter.value());
        Self {
            filter_id: SZ3_FILTER_ID,
            options: vec![mode_code, high, low],
        }
    }

    fn zfp(mode: ZfpMode, parameter: LossyParameter) -> Self {
        let options = match (mode, parameter) {
            (ZfpMode::Precision, LossyParameter::Integer(precision)) => {
                vec![2, 0, precision, 0, 0, 0]
            }
            (ZfpMode::Precision, LossyParameter::Float(precision)) => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let precision = precision as u32;
                vec![2, 0, precision, 0, 0, 0]
            }
            (ZfpMode::Rate, parameter) => {
                let (low, high) = pack_double(parameter.value());
                vec![1, 0, low, high, 0, 0]
            }
            (ZfpMode::Accuracy, parameter) => {
                let (low, high) = pack_double(parameter.value());
                vec![3, 0, low, high, 0, 0]
            }
        };
        Self {
            filter_id: ZFP_FILTER_ID,
            options,
        }
    }
}

/// Split an IEEE 754 double into its (least, most) significant 32-bit words.
fn pack_double(value: f64) -> (u32, u32) {
    let [b0, b1, b2, b3, b4, b5, b6, b7] = value.to_le_bytes();
    (
        u32::from_le_bytes([b0, b1, b2, b3]),
        u32::from_le_bytes([b4, b5, b6, b7]),
    )
}

/// Confirms that native filters are registered with the runtime serialization environment.
///
/// Implemented by the host application against its serialization library (e.g. an
/// `H5Zfilter_avail` call); this crate only consumes the probe.
pub trait FilterAvailability {
    /// Returns true if the filter with `filter_id` is registered.
    fn is_available(&self, filter_id: u32) -> bool;
}

/// A probe that assumes every filter is registered.
#[derive(Copy, Clone, Debug, Default)]
pub struct AssumeAvailable;

impl FilterAvailability for AssumeAvailable {
    fn is_available(&self, _filter_id: u32) -> bool {
        true
    }
}

/// A required native filter is not registered in the runtime environment.
#[derive(Debug, Error)]
#[error("native filter {filter_name} (id:{filter_id}) is not available")]
pub struct FilterUnavailableError {
    filter_id: u32,
    filter_name: &'static str,
}

impl FilterUnavailableError {
    /// Create a new [`FilterUnavailableError`] for `filter_id`.
    #[must_use]
    pub fn new(filter_id: u32) -> Self {
        Self {
            filter_id,
            filter_name: filter_name(filter_id),
        }
    }

    /// The unavailable filter id.
    #[must_use]
    pub fn filter_id(&self) -> u32 {
        self.filter_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blosc_options() {
        let configuration = FilterConfiguration::blosc(
            LosslessBackend::Zstd,
            CompressionLevel::try_from(9).unwrap(),
        );
        assert_eq!(configuration.filter_id(), BLOSC_FILTER_ID);
        assert_eq!(configuration.options(), &[0, 0, 0, 0, 9, 1, 5]);
    }

    #[test]
    fn zfp_precision_options() {
        let configuration = FilterConfiguration::lossy(
            LossyMethod::Zfp(ZfpMode::Precision),
            LossyParameter::Integer(19),
        );
        assert_eq!(configuration.filter_id(), ZFP_FILTER_ID);
        assert_eq!(configuration.options(), &[2, 0, 19, 0, 0, 0]);
    }

    #[test]
    fn zfp_rate_packs_double() {
        let configuration = FilterConfiguration::lossy(
            LossyMethod::Zfp(ZfpMode::Rate),
            LossyParameter::Float(4.0),
        );
        let (low, high) = pack_double(4.0);
        assert_eq!(configuration.options(), &[1, 0, low, high, 0, 0]);
    }

    #[test]
    fn sz_repeats_error_bound() {
        let configuration =
            FilterConfiguration::lossy(LossyMethod::Sz(SzMode::PwRel), LossyParameter::Float(0.1));
        let (low, high) = pack_double(0.1);
        assert_eq!(configuration.filter_id(), SZ_FILTER_ID);
        assert_eq!(
            configuration.options(),
            &[10, high, low, high, low, high, low, high, low]
        );
    }

    #[test]
    fn pack_double_words() {
        assert_eq!(pack_double(0.0), (0, 0));
        let (low, high) = pack_double(1.0);
        assert_eq!(low, 0);
        assert_eq!(high, 0x3FF0_0000);
    }

    #[test]
    fn configuration_display_is_json() {
        let configuration = FilterConfiguration::lossy(
            LossyMethod::Zfp(ZfpMode::Precision),
            LossyParameter::Integer(10),
        );
        let text = configuration.to_string();
        assert!(text.contains("32013"));
        serde_json::from_str::<FilterConfiguration>(&text).unwrap();
    }

    #[test]
    fn unavailable_error_names_filter() {
        let error = FilterUnavailableError::new(SZ_FILTER_ID);
        assert_eq!(error.to_string(), "native filter sz (id:32017) is not available");
    }
}
