use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An integer from 1 to 9 controlling the lossless compression level.
///
/// A level of 1 is the fastest compression method and produces the least compression, while 9 is
/// slowest and produces the most compression.
#[derive(Serialize, Copy, Clone, Debug, Eq, PartialEq)]
pub struct CompressionLevel(u8);

impl Default for CompressionLevel {
    fn default() -> Self {
        Self(5)
    }
}

impl From<CompressionLevel> for u8 {
    fn from(val: CompressionLevel) -> Self {
        val.0
    }
}

impl TryFrom<u8> for CompressionLevel {
    type Error = u8;
    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if (1..=9).contains(&level) {
            Ok(Self(level))
        } else {
            Err(level)
        }
    }
}

impl<'de> serde::Deserialize<'de> for CompressionLevel {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let level = u8::deserialize(d)?;
        if (1..=9).contains(&level) {
            Ok(Self(level))
        } else {
            Err(serde::de::Error::custom(
                "compression level must be between 1 and 9",
            ))
        }
    }
}

impl core::fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A BLOSC backend for lossless compression.
///
/// See <https://www.blosc.org/pages/>.
#[derive(Serialize, Deserialize, Copy, Clone, Debug, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LosslessBackend {
    /// [BloscLZ](https://github.com/Blosc/c-blosc/blob/master/blosc/blosclz.h): blosc default compressor, heavily based on [FastLZ](http://fastlz.org/).
    BloscLZ,
    /// [LZ4](http://fastcompression.blogspot.com/p/lz4.html): a compact, very popular and fast compressor.
    LZ4,
    /// [LZ4HC](http://fastcompression.blogspot.com/p/lz4.html): a tweaked version of LZ4, produces better compression ratios at the expense of speed.
    LZ4HC,
    /// [Snappy](https://code.google.com/p/snappy): a popular compressor used in many places.
    Snappy,
    /// [Zlib](http://www.zlib.net/): a classic; somewhat slower than the previous ones, but achieving better compression ratios.
    Zlib,
    /// [Zstd](http://www.zstd.net/): an extremely well balanced codec; it provides the best compression ratios among the others above, and at reasonably fast speed.
    Zstd,
}

impl LosslessBackend {
    /// All supported backends, in blosc compressor-code order.
    pub const ALL: [LosslessBackend; 6] = [
        LosslessBackend::BloscLZ,
        LosslessBackend::LZ4,
        LosslessBackend::LZ4HC,
        LosslessBackend::Snappy,
        LosslessBackend::Zlib,
        LosslessBackend::Zstd,
    ];

    /// The lowercase name used in specification strings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BloscLZ => "blosclz",
            Self::LZ4 => "lz4",
            Self::LZ4HC => "lz4hc",
            Self::Snappy => "snappy",
            Self::Zlib => "zlib",
            Self::Zstd => "zstd",
        }
    }

    /// The compressor code passed to the native BLOSC filter.
    #[must_use]
    pub const fn compressor_code(self) -> u32 {
        match self {
            Self::BloscLZ => 0,
            Self::LZ4 => 1,
            Self::LZ4HC => 2,
            Self::Snappy => 3,
            Self::Zlib => 4,
            Self::Zstd => 5,
        }
    }
}

impl core::fmt::Display for LosslessBackend {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// A backend name not present in the lossless backend registry.
///
/// Backend name comparison is case-sensitive lowercase.
#[derive(Debug, Error)]
#[error("backend {0:?} is not a valid lossless backend")]
pub struct UnknownBackendError(pub String);

impl std::str::FromStr for LosslessBackend {
    type Err = UnknownBackendError;
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "blosclz" => Ok(Self::BloscLZ),
            "lz4" => Ok(Self::LZ4),
            "lz4hc" => Ok(Self::LZ4HC),
            "snappy" => Ok(Self::Snappy),
            "zlib" => Ok(Self::Zlib),
            "zstd" => Ok(Self::Zstd),
            _ => Err(UnknownBackendError(name.to_string())),
        }
    }
}
