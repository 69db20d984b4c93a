use crate::config::global_config;
use crate::encoding::{
    CompressionLevel, Encoding, LosslessBackend, LosslessEncoding, LossyCompressor, LossyEncoding,
    LossyMethod, LossyParameter, ParameterKind,
};

use super::{SpecificationError, PARAMETER_SEPARATOR};

/// Parse a single variable's compression specification.
///
/// The grammar, with fields separated by [`PARAMETER_SEPARATOR`]:
/// - `None` / `none` / the empty string → [`Encoding::Null`];
/// - `lossless[,<backend>[,<level>]]` → [`Encoding::Lossless`], omitted fields falling back to
///   the global configuration defaults;
/// - `lossy,<compressor>,<mode>,<parameter>` → [`Encoding::Lossy`], exactly four fields.
///
/// Checks are applied fail-fast, the first failing check winning: field count, compressor/mode
/// membership, parameter numeric kind, parameter domain. Keyword and name comparison is
/// case-sensitive lowercase.
///
/// # Errors
/// Returns the corresponding [`SpecificationError`] kind for the first failing check.
pub fn parse_variable_specification(spec: &str) -> Result<Encoding, SpecificationError> {
    if spec.is_empty() || spec == "None" || spec == "none" {
        return Ok(Encoding::Null);
    }

    let fields: Vec<&str> = spec.split(PARAMETER_SEPARATOR).collect();
    match fields[0] {
        "lossless" => parse_lossless(spec, &fields),
        "lossy" => parse_lossy(spec, &fields),
        _ => Err(SpecificationError::InvalidSyntax(spec.to_string())),
    }
}

/// Pure predicate: does `spec` parse as a single-variable specification?
#[must_use]
pub fn is_valid_variable_specification(spec: &str) -> bool {
    parse_variable_specification(spec).is_ok()
}

impl std::str::FromStr for Encoding {
    type Err = SpecificationError;
    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        parse_variable_specification(spec)
    }
}

fn parse_lossless(spec: &str, fields: &[&str]) -> Result<Encoding, SpecificationError> {
    if fields.len() > 3 {
        return Err(SpecificationError::InvalidSyntax(spec.to_string()));
    }

    let backend = match fields.get(1) {
        Some(name) => name.parse::<LosslessBackend>()?,
        None => global_config().lossless_backend(),
    };

    let level = match fields.get(2) {
        Some(text) => {
            let level: u8 = text.parse().map_err(|_| SpecificationError::ParameterType {
                parameter: (*text).to_string(),
                kind: ParameterKind::Integer,
            })?;
            CompressionLevel::try_from(level).map_err(|level| {
                SpecificationError::ParameterRange {
                    parameter: level.to_string(),
                    domain: "[1, 9]".to_string(),
                }
            })?
        }
        None => global_config().lossless_level(),
    };

    Ok(Encoding::Lossless(LosslessEncoding::new(backend, level)))
}

fn parse_lossy(spec: &str, fields: &[&str]) -> Result<Encoding, SpecificationError> {
    // Lossy specifications must have exactly four fields: lossy,compressor,mode,parameter.
    if fields.len() != 4 {
        return Err(SpecificationError::InvalidSyntax(spec.to_string()));
    }

    let compressor: LossyCompressor = fields[1].parse()?;
    let method = LossyMethod::new(compressor, fields[2])?;
    let parameter = parse_parameter(fields[3], method.domain().kind)?;
    Ok(Encoding::Lossy(LossyEncoding::new(method, parameter)?))
}

fn parse_parameter(text: &str, kind: ParameterKind) -> Result<LossyParameter, SpecificationError> {
    let parameter = match kind {
        ParameterKind::Integer => text.parse::<u32>().map(LossyParameter::Integer).ok(),
        ParameterKind::Float => text.parse::<f64>().map(LossyParameter::Float).ok(),
    };
    parameter.ok_or_else(|| SpecificationError::ParameterType {
        parameter: text.to_string(),
        kind,
    })
}
