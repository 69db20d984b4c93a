//! Dataset-level assembly of resolved encodings.
//!
//! A [`DatasetLayout`] names the coordinates and data variables of a dataset to be serialized.
//! [`DatasetEncoding`] broadcasts a resolved specification over that inventory: coordinates
//! receive the `coordinates` fallback, data variables the `default` fallback, and explicit
//! per-variable entries override both. Each data variable additionally receives a chunk shape
//! from the [chunk-size advisor](crate::chunk).
//!
//! A [`DatasetEncoding`] is built fresh per serialization call and not persisted. Every
//! broadcast encoding is an independent clone, so attaching a chunk shape to one variable can
//! never alias another.

use std::collections::BTreeMap;

use derive_more::Deref;

use crate::chunk::{chunk_shape, DEFAULT_CHUNK_MEMORY_TARGET};
use crate::encoding::{Encoding, FilterAvailability, FilterUnavailableError};
use crate::specification::{DatasetSpecification, SpecificationError};

/// A data variable of a dataset: its name, dimension sizes in storage order, and element byte
/// width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetVariable {
    name: String,
    shape: Vec<u64>,
    item_size: usize,
}

impl DatasetVariable {
    /// Create a new [`DatasetVariable`].
    #[must_use]
    pub fn new(name: impl Into<String>, shape: Vec<u64>, item_size: usize) -> Self {
        Self {
            name: name.into(),
            shape,
            item_size,
        }
    }

    /// The variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The dimension sizes, in the variable's own storage order.
    #[must_use]
    pub fn shape(&self) -> &[u64] {
        &self.shape
    }

    /// The element width in bytes.
    #[must_use]
    pub fn item_size(&self) -> usize {
        self.item_size
    }
}

/// The variable/coordinate inventory of a dataset to be serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetLayout {
    coordinates: Vec<String>,
    data_variables: Vec<DatasetVariable>,
}

impl DatasetLayout {
    /// Create an empty [`DatasetLayout`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a coordinate variable.
    #[must_use]
    pub fn with_coordinate(mut self, name: impl Into<String>) -> Self {
        self.coordinates.push(name.into());
        self
    }

    /// Add a data variable.
    #[must_use]
    pub fn with_data_variable(mut self, variable: DatasetVariable) -> Self {
        self.data_variables.push(variable);
        self
    }

    /// The coordinate names.
    #[must_use]
    pub fn coordinates(&self) -> &[String] {
        &self.coordinates
    }

    /// The data variables.
    #[must_use]
    pub fn data_variables(&self) -> &[DatasetVariable] {
        &self.data_variables
    }
}

/// One variable's assembled encoding: the broadcast [`Encoding`] plus, for data variables, the
/// advised chunk shape in the variable's own dimension order.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableEncoding {
    encoding: Encoding,
    chunk_shape: Option<Vec<u64>>,
}

impl VariableEncoding {
    /// The compression encoding.
    #[must_use]
    pub fn encoding(&self) -> &Encoding {
        &self.encoding
    }

    /// The advised chunk shape; [`None`] for coordinates.
    #[must_use]
    pub fn chunk_shape(&self) -> Option<&[u64]> {
        self.chunk_shape.as_deref()
    }
}

/// The per-variable encodings for one dataset serialization.
///
/// Dereferences to the underlying name → [`VariableEncoding`] map.
#[derive(Debug, Clone, PartialEq, Deref)]
pub struct DatasetEncoding {
    encodings: BTreeMap<String, VariableEncoding>,
}

impl DatasetEncoding {
    /// Resolve `specification` and broadcast it over `layout`, advising chunk shapes with the
    /// default in-memory target of [`DEFAULT_CHUNK_MEMORY_TARGET`] bytes.
    ///
    /// # Errors
    /// Returns a [`SpecificationError`] if the specification does not resolve.
    pub fn new(
        layout: &DatasetLayout,
        specification: &DatasetSpecification,
    ) -> Result<Self, SpecificationError> {
        Self::with_chunk_target(layout, specification, DEFAULT_CHUNK_MEMORY_TARGET)
    }

    /// As [`DatasetEncoding::new`], with an explicit per-chunk byte budget.
    ///
    /// # Errors
    /// Returns a [`SpecificationError`] if the specification does not resolve.
    pub fn with_chunk_target(
        layout: &DatasetLayout,
        specification: &DatasetSpecification,
        chunk_target_bytes: u64,
    ) -> Result<Self, SpecificationError> {
        let resolved = specification.resolve()?;

        let mut encodings = BTreeMap::new();
        for name in layout.coordinates() {
            let encoding = resolved
                .variable(name)
                .unwrap_or_else(|| resolved.coordinates_encoding())
                .clone();
            encodings.insert(
                name.clone(),
                VariableEncoding {
                    encoding,
                    chunk_shape: None,
                },
            );
        }
        for variable in layout.data_variables() {
            let encoding = resolved
                .variable(variable.name())
                .unwrap_or_else(|| resolved.default_encoding())
                .clone();
            let chunks = chunk_shape(variable.shape(), variable.item_size(), chunk_target_bytes);
            encodings.insert(
                variable.name().to_string(),
                VariableEncoding {
                    encoding,
                    chunk_shape: Some(chunks),
                },
            );
        }

        Ok(Self { encodings })
    }

    /// A one-line description per variable for attaching as dataset metadata.
    ///
    /// Null encodings are omitted; every description contains the literal token `id:<integer>`
    /// with the native filter id.
    #[must_use]
    pub fn descriptions(&self) -> BTreeMap<String, String> {
        self.encodings
            .iter()
            .filter_map(|(name, variable)| {
                variable
                    .encoding()
                    .description()
                    .map(|description| (name.clone(), description))
            })
            .collect()
    }

    /// Confirm that every referenced native filter is registered.
    ///
    /// # Errors
    /// Returns a [`FilterUnavailableError`] for the first unregistered filter.
    pub fn ensure_available(
        &self,
        probe: &dyn FilterAvailability,
    ) -> Result<(), FilterUnavailableError> {
        for variable in self.encodings.values() {
            variable.encoding().ensure_available(probe)?;
        }
        Ok(())
    }
}
