//! Chunk shape advice for serialized variables.
//!
//! The host container stores each variable in chunks; the advisor picks an integer chunk size
//! per dimension so that one chunk occupies roughly a target number of bytes in memory.

use thiserror::Error;

/// The default in-memory chunk target, 10 MiB.
pub const DEFAULT_CHUNK_MEMORY_TARGET: u64 = 10 * 1024 * 1024;

/// Compute a chunk shape for a variable of `shape` with `item_size`-byte elements, targeting
/// `target_bytes` per chunk in memory.
///
/// Dimensions are processed ascending by size so that small dimensions are kept whole and the
/// large dimensions absorb the splitting. Every returned size is at least 1 and at most the
/// corresponding dimension size, in the caller's dimension order; the result is deterministic
/// for identical inputs.
#[must_use]
pub fn chunk_shape(shape: &[u64], item_size: usize, target_bytes: u64) -> Vec<u64> {
    if shape.is_empty() {
        return Vec::new();
    }

    let total_elements: u64 = shape.iter().product();
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let num_chunks = {
        let target_elements = target_bytes as f64 / item_size.max(1) as f64;
        ((total_elements as f64 / target_elements).floor() as u64).max(1)
    };

    // Stable sort: equal-sized dimensions keep the caller's order.
    let mut order: Vec<usize> = (0..shape.len()).collect();
    order.sort_by_key(|&index| shape[index]);

    let mut sizes = vec![0_u64; shape.len()];
    let mut pending_chunks = num_chunks;
    for index in order {
        let dim_size = shape[index];
        let chunk_size = (dim_size / pending_chunks.max(1)).max(1);
        let chunks_along_dim = (dim_size / chunk_size).max(1);
        sizes[index] = chunk_size;
        pending_chunks = pending_chunks.div_ceil(chunks_along_dim);
    }
    sizes
}

/// An unparseable memory size string.
#[derive(Debug, Error)]
#[error("invalid memory size {0:?}")]
pub struct InvalidMemorySizeError(String);

const SIZE_UNITS: [&str; 9] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB", "YB"];

/// Convert a human-readable size string such as `"10MB"` into a number of bytes.
///
/// Units are binary (1 KB = 1024 B) and case-insensitive; fractional sizes like `"1.5GB"` are
/// accepted.
///
/// # Errors
/// Returns an [`InvalidMemorySizeError`] if the string has no leading number or an unknown unit.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
pub fn parse_memory_size(size: &str) -> Result<u64, InvalidMemorySizeError> {
    let normalized = size.trim().to_uppercase();
    let digits_end = normalized
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(normalized.len());
    let (digits, unit) = normalized.split_at(digits_end);
    let value: f64 = digits
        .parse()
        .map_err(|_| InvalidMemorySizeError(size.to_string()))?;
    let magnitude = SIZE_UNITS
        .iter()
        .position(|u| *u == unit)
        .ok_or_else(|| InvalidMemorySizeError(size.to_string()))?;
    Ok((value * 1024_f64.powi(magnitude as i32)) as u64)
}

/// Render a byte count in human-readable binary units, e.g. `10485760` → `"10MB"`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
pub fn format_memory_size(size_bytes: u64) -> String {
    if size_bytes == 0 {
        return "0B".to_string();
    }
    let magnitude = ((size_bytes as f64).log(1024.0).floor() as usize).min(SIZE_UNITS.len() - 1);
    let size = size_bytes as f64 / 1024_f64.powi(magnitude as i32);
    let rounded = (size * 100.0).round() / 100.0;
    format!("{rounded}{}", SIZE_UNITS[magnitude])
}
