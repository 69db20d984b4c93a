//! Compspec global configuration options.

use std::sync::{OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::encoding::lossless::{CompressionLevel, LosslessBackend};

/// Global configuration options for the compspec crate.
///
/// Retrieve the global [`Config`] with [`global_config`] and modify it with [`global_config_mut`].
///
/// # Configuration Options
///
/// ## Lossless Backend
/// > default: [`LosslessBackend::LZ4`]
///
/// The BLOSC backend used by `lossless` specifications that omit the backend field, and by the
/// synthesized `default`/`coordinates` entries of a resolved dataset specification.
///
/// ## Lossless Level
/// > default: `5`
///
/// The compression level used by `lossless` specifications that omit the level field.
///
/// Changing these options is an initialization-time operation; it is not safe to change them
/// concurrently with in-flight specification resolution.
#[derive(Debug)]
pub struct Config {
    lossless_backend: LosslessBackend,
    lossless_level: CompressionLevel,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            lossless_backend: LosslessBackend::LZ4,
            lossless_level: CompressionLevel::default(),
        }
    }
}

impl Config {
    /// Get the [lossless backend](#lossless-backend) configuration.
    #[must_use]
    pub fn lossless_backend(&self) -> LosslessBackend {
        self.lossless_backend
    }

    /// Set the [lossless backend](#lossless-backend) configuration.
    pub fn set_lossless_backend(&mut self, backend: LosslessBackend) {
        self.lossless_backend = backend;
    }

    /// Get the [lossless level](#lossless-level) configuration.
    #[must_use]
    pub fn lossless_level(&self) -> CompressionLevel {
        self.lossless_level
    }

    /// Set the [lossless level](#lossless-level) configuration.
    pub fn set_lossless_level(&mut self, level: CompressionLevel) {
        self.lossless_level = level;
    }
}

static CONFIG: OnceLock<RwLock<Config>> = OnceLock::new();

/// Returns a reference to the global compspec configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global
/// config is already held by the current thread.
pub fn global_config() -> RwLockReadGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .read()
        .unwrap()
}

/// Returns a mutable reference to the global compspec configuration.
///
/// # Panics
/// This function panics if the underlying lock has been poisoned and might panic if the global
/// config is already held by the current thread.
pub fn global_config_mut() -> RwLockWriteGuard<'static, Config> {
    CONFIG
        .get_or_init(|| RwLock::new(Config::default()))
        .write()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_lossless_defaults() {
        let config = Config::default();
        assert_eq!(config.lossless_backend(), LosslessBackend::LZ4);
        assert_eq!(u8::from(config.lossless_level()), 5);
    }

    #[test]
    fn config_set_lossless() {
        let mut config = Config::default();
        config.set_lossless_backend(LosslessBackend::Zstd);
        config.set_lossless_level(CompressionLevel::try_from(9).unwrap());
        assert_eq!(config.lossless_backend(), LosslessBackend::Zstd);
        assert_eq!(u8::from(config.lossless_level()), 9);
    }
}
