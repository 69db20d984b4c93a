use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::encoding::{Encoding, FilterAvailability, FilterUnavailableError};

use super::variable::parse_variable_specification;
use super::{
    SpecificationError, COORDINATES_LABEL, COORDINATES_VALUE, DEFAULT_LABEL, DEFAULT_VALUE,
    NAME_SEPARATOR, VARIABLE_SEPARATOR,
};

/// A raw dataset compression specification, before resolution.
///
/// All input forms are normalized to the canonical single-string form and resolved through one
/// parsing path, so a mapping and its serialized string produce identical results.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DatasetSpecification {
    /// No specification; resolves to the lossless defaults for everything.
    #[default]
    None,
    /// An inline specification string, e.g. `"lossless temperature:lossy,zfp,rate,4"`.
    Inline(String),
    /// A variable name → specification string mapping.
    Mapping(BTreeMap<String, String>),
    /// A YAML file holding a flat variable name → specification string mapping.
    File(PathBuf),
}

impl From<&str> for DatasetSpecification {
    fn from(specification: &str) -> Self {
        Self::Inline(specification.to_string())
    }
}

impl From<String> for DatasetSpecification {
    fn from(specification: String) -> Self {
        Self::Inline(specification)
    }
}

impl From<BTreeMap<String, String>> for DatasetSpecification {
    fn from(mapping: BTreeMap<String, String>) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<&Path> for DatasetSpecification {
    fn from(path: &Path) -> Self {
        Self::File(path.to_path_buf())
    }
}

impl From<PathBuf> for DatasetSpecification {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl DatasetSpecification {
    /// Normalize this specification to the canonical single-string form.
    ///
    /// Mapping entries are serialized as `name:spec` joined by [`VARIABLE_SEPARATOR`]; a file is
    /// read as a flat YAML mapping and serialized the same way; a missing specification is the
    /// empty string.
    ///
    /// # Errors
    /// Returns [`SpecificationError::FileRead`] / [`SpecificationError::FileFormat`] if a
    /// specification file cannot be read or is not a flat mapping.
    pub fn canonical_string(&self) -> Result<String, SpecificationError> {
        match self {
            Self::None => Ok(String::new()),
            Self::Inline(specification) => Ok(specification.clone()),
            Self::Mapping(mapping) => Ok(mapping_to_string(mapping)),
            Self::File(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| {
                    SpecificationError::FileRead {
                        path: path.clone(),
                        source,
                    }
                })?;
                let mapping: BTreeMap<String, String> =
                    serde_yaml::from_str(&text).map_err(|source| {
                        SpecificationError::FileFormat {
                            path: path.clone(),
                            source,
                        }
                    })?;
                Ok(mapping_to_string(&mapping))
            }
        }
    }

    /// Resolve this specification into one [`Encoding`] per named variable.
    ///
    /// The canonical string splits on [`VARIABLE_SEPARATOR`] into fragments; a fragment
    /// containing [`NAME_SEPARATOR`] is a `name:spec` entry, any other fragment belongs to the
    /// reserved `default` name. Missing `default`/`coordinates` entries are synthesized with
    /// the lossless fallback, except that a null `default` propagates to `coordinates`. Every
    /// resulting encoding is revalidated before returning.
    ///
    /// # Errors
    /// Returns the first [`SpecificationError`] encountered; resolution is all-or-nothing.
    pub fn resolve(&self) -> Result<ResolvedSpecification, SpecificationError> {
        ResolvedSpecification::from_canonical_string(&self.canonical_string()?)
    }

    /// As [`DatasetSpecification::resolve`], additionally confirming with `probe` that every
    /// referenced native filter is registered.
    ///
    /// # Errors
    /// Returns [`SpecificationError::FilterUnavailable`] for the first unregistered filter,
    /// rather than silently downgrading the encoding.
    pub fn resolve_available(
        &self,
        probe: &dyn FilterAvailability,
    ) -> Result<ResolvedSpecification, SpecificationError> {
        let resolved = self.resolve()?;
        resolved.ensure_available(probe)?;
        Ok(resolved)
    }
}

fn mapping_to_string(mapping: &BTreeMap<String, String>) -> String {
    mapping
        .iter()
        .map(|(name, spec)| format!("{name}{NAME_SEPARATOR}{spec}"))
        .join(VARIABLE_SEPARATOR)
}

/// Pure predicate: does `specification` resolve without error?
#[must_use]
pub fn is_valid_specification(specification: &DatasetSpecification) -> bool {
    specification.resolve().is_ok()
}

/// Per-variable encodings resolved from a [`DatasetSpecification`].
///
/// The reserved `default` and `coordinates` entries are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSpecification {
    default: Encoding,
    coordinates: Encoding,
    variables: BTreeMap<String, Encoding>,
}

impl ResolvedSpecification {
    fn from_canonical_string(specification: &str) -> Result<Self, SpecificationError> {
        let mut entries: BTreeMap<String, Encoding> = BTreeMap::new();
        for fragment in specification.split(VARIABLE_SEPARATOR) {
            if fragment.trim().is_empty() {
                continue;
            }
            let (name, variable_spec) = match fragment.split_once(NAME_SEPARATOR) {
                Some((name, variable_spec)) => (name, variable_spec),
                None => (DEFAULT_LABEL, fragment),
            };
            if entries.contains_key(name) {
                return Err(SpecificationError::DuplicateVariable(name.to_string()));
            }
            entries.insert(name.to_string(), parse_variable_specification(variable_spec)?);
        }

        let default = match entries.remove(DEFAULT_LABEL) {
            Some(encoding) => encoding,
            None => parse_variable_specification(DEFAULT_VALUE)?,
        };
        let coordinates = match entries.remove(COORDINATES_LABEL) {
            Some(encoding) => encoding,
            // A null default propagates "no compression" to the coordinates.
            None if default.is_null() => Encoding::Null,
            None => parse_variable_specification(COORDINATES_VALUE)?,
        };

        let resolved = Self {
            default,
            coordinates,
            variables: entries,
        };
        resolved.validate()?;
        Ok(resolved)
    }

    /// The fallback encoding for data variables.
    #[must_use]
    pub fn default_encoding(&self) -> &Encoding {
        &self.default
    }

    /// The fallback encoding for coordinate variables.
    #[must_use]
    pub fn coordinates_encoding(&self) -> &Encoding {
        &self.coordinates
    }

    /// The explicit encoding for `name`, if one was specified.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<&Encoding> {
        match name {
            DEFAULT_LABEL => Some(&self.default),
            COORDINATES_LABEL => Some(&self.coordinates),
            name => self.variables.get(name),
        }
    }

    /// Iterate over all entries, reserved names first, then variables in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Encoding)> {
        [
            (DEFAULT_LABEL, &self.default),
            (COORDINATES_LABEL, &self.coordinates),
        ]
        .into_iter()
        .chain(
            self.variables
                .iter()
                .map(|(name, encoding)| (name.as_str(), encoding)),
        )
    }

    /// Re-run the domain validity checks on every entry.
    ///
    /// # Errors
    /// Returns the first failing entry's [`SpecificationError`].
    pub fn validate(&self) -> Result<(), SpecificationError> {
        for (_, encoding) in self.iter() {
            encoding.validate()?;
        }
        Ok(())
    }

    /// Confirm that every referenced native filter is registered.
    ///
    /// # Errors
    /// Returns a [`FilterUnavailableError`] for the first unregistered filter.
    pub fn ensure_available(
        &self,
        probe: &dyn FilterAvailability,
    ) -> Result<(), FilterUnavailableError> {
        for (_, encoding) in self.iter() {
            encoding.ensure_available(probe)?;
        }
        Ok(())
    }
}

impl core::fmt::Display for ResolvedSpecification {
    /// The deterministic canonical serialization: `name:spec` entries joined by
    /// [`VARIABLE_SEPARATOR`], reserved names first.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let entries = self
            .iter()
            .map(|(name, encoding)| format!("{name}{NAME_SEPARATOR}{encoding}"))
            .join(VARIABLE_SEPARATOR);
        f.write_str(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_specification_uses_lossless_defaults() {
        let resolved = DatasetSpecification::None.resolve().unwrap();
        assert_eq!(resolved.default_encoding().to_string(), "lossless,lz4,5");
        assert_eq!(resolved.coordinates_encoding().to_string(), "lossless,lz4,5");
    }

    #[test]
    fn null_default_propagates_to_coordinates() {
        for spec in ["None", "none"] {
            let resolved = DatasetSpecification::from(spec).resolve().unwrap();
            assert!(resolved.default_encoding().is_null(), "{spec:?}");
            assert!(resolved.coordinates_encoding().is_null(), "{spec:?}");
        }
    }

    #[test]
    fn lossy_default_does_not_propagate_to_coordinates() {
        let resolved = DatasetSpecification::from("lossy,zfp,rate,4.0")
            .resolve()
            .unwrap();
        assert_eq!(resolved.default_encoding().to_string(), "lossy,zfp,rate,4");
        assert_eq!(resolved.coordinates_encoding().to_string(), "lossless,lz4,5");
    }

    #[test]
    fn explicit_coordinates_override() {
        let resolved = DatasetSpecification::from("coordinates:lossless,zstd,9")
            .resolve()
            .unwrap();
        assert_eq!(resolved.coordinates_encoding().to_string(), "lossless,zstd,9");
        assert_eq!(resolved.default_encoding().to_string(), "lossless,lz4,5");
    }

    #[test]
    fn named_variables_resolve() {
        let resolved = DatasetSpecification::from(
            "lossy,sz,pw_rel,0.0001 temperature:lossy,zfp,rate,4 vorticity:lossy,sz,abs,0.1",
        )
        .resolve()
        .unwrap();
        assert_eq!(
            resolved.variable("temperature").unwrap().to_string(),
            "lossy,zfp,rate,4"
        );
        assert_eq!(
            resolved.variable("vorticity").unwrap().to_string(),
            "lossy,sz,abs,0.1"
        );
        assert!(resolved.variable("pressure").is_none());
        assert_eq!(
            resolved.default_encoding().to_string(),
            "lossy,sz,pw_rel,0.0001"
        );
    }

    #[test]
    fn duplicate_variable_definitions_are_rejected() {
        let result = DatasetSpecification::from("var1:lossless var1:lossy,sz,abs,0.1").resolve();
        assert!(matches!(
            result,
            Err(SpecificationError::DuplicateVariable(name)) if name == "var1"
        ));

        let result = DatasetSpecification::from("lossless lossy,sz,abs,0.1").resolve();
        assert!(matches!(
            result,
            Err(SpecificationError::DuplicateVariable(name)) if name == "default"
        ));
    }

    #[test]
    fn mapping_and_string_inputs_are_idempotent() {
        let mut mapping = BTreeMap::new();
        mapping.insert("temperature".to_string(), "lossy,zfp,rate,4".to_string());
        mapping.insert("vorticity".to_string(), "lossy,sz,abs,0.1".to_string());
        let mapping = DatasetSpecification::from(mapping);

        let canonical = mapping.canonical_string().unwrap();
        assert_eq!(
            canonical,
            "temperature:lossy,zfp,rate,4 vorticity:lossy,sz,abs,0.1"
        );
        assert_eq!(
            mapping.resolve().unwrap(),
            DatasetSpecification::from(canonical).resolve().unwrap()
        );
    }

    #[test]
    fn blank_fragments_are_skipped() {
        let resolved = DatasetSpecification::from("  temperature:lossy,zfp,rate,4  ")
            .resolve()
            .unwrap();
        assert_eq!(
            resolved.variable("temperature").unwrap().to_string(),
            "lossy,zfp,rate,4"
        );
        assert_eq!(resolved.default_encoding().to_string(), "lossless,lz4,5");
    }

    #[test]
    fn invalid_fragment_invalidates_the_whole_resolution() {
        let result =
            DatasetSpecification::from("temperature:lossy,zfp,rate,4 vorticity:lossy,zfp,rate,64")
                .resolve();
        assert!(matches!(
            result,
            Err(SpecificationError::ParameterRange { .. })
        ));
    }

    #[test]
    fn resolved_specification_reserializes_deterministically() {
        let specification =
            DatasetSpecification::from("temperature:lossy,zfp,rate,4 lossy,sz,abs,0.1");
        let resolved = specification.resolve().unwrap();
        let rendered = resolved.to_string();
        assert_eq!(
            rendered,
            "default:lossy,sz,abs,0.1 coordinates:lossless,lz4,5 temperature:lossy,zfp,rate,4"
        );
        assert_eq!(
            DatasetSpecification::from(rendered).resolve().unwrap(),
            resolved
        );
    }

    #[test]
    fn unavailable_filters_fail_resolution() {
        struct NothingRegistered;
        impl FilterAvailability for NothingRegistered {
            fn is_available(&self, _filter_id: u32) -> bool {
                false
            }
        }

        let result = DatasetSpecification::from("lossy,sz,abs,0.1").resolve_available(&NothingRegistered);
        assert!(matches!(
            result,
            Err(SpecificationError::FilterUnavailable(_))
        ));

        let result = DatasetSpecification::from("None").resolve_available(&NothingRegistered);
        assert!(result.is_ok());
    }

    #[test]
    fn is_valid_predicate_never_panics() {
        assert!(is_valid_specification(&DatasetSpecification::None));
        assert!(is_valid_specification(&DatasetSpecification::from(
            "lossy,zfp,rate,4"
        )));
        assert!(!is_valid_specification(&DatasetSpecification::from(
            "var1:lossless var1:lossless"
        )));
        assert!(!is_valid_specification(&DatasetSpecification::from(
            "lossy,zfp,rate,64"
        )));
        assert!(!is_valid_specification(&DatasetSpecification::File(
            PathBuf::from("does-not-exist.yaml")
        )));
    }
}
