//! A library for describing, with a compact textual grammar, how each variable of a
//! multi-variable scientific dataset should be compressed when it is serialized.
//!
//! A specification assigns every variable an encoding: no compression, lossless
//! compression with a [BLOSC](https://www.blosc.org/pages/) backend and compression level, or
//! lossy compression with an error-bounded compressor ([SZ](https://szcompressor.org/),
//! [SZ3](https://github.com/szcompressor/SZ3) or [zfp](https://zfp.readthedocs.io/)), a
//! compressor-specific mode, and a numeric parameter. Specifications can be written as a
//! single string, a name → specification mapping, or a flat YAML file, and all three
//! resolve to the same result. The resolved encodings map onto registered HDF5 filter ids
//! and options, ready to be handed to a serialization library.
//!
//! ## The specification grammar
//! One variable:
//! - `None`: no compression.
//! - `lossless[,<backend>[,<level>]]`, e.g. `lossless,zstd,9`; omitted fields fall back
//!   to the global defaults (`lz4`, level 5).
//! - `lossy,<compressor>,<mode>,<parameter>`, e.g. `lossy,zfp,rate,4` or
//!   `lossy,sz,pw_rel,0.0001`.
//!
//! A dataset specification joins entries with spaces, prefixing each with `<name>:`.
//! An entry without a name applies to the reserved name `default`, the fallback for data
//! variables; the reserved name `coordinates` is the fallback for coordinate variables.
//!
//! ## Example
//! ```rust
//! use compspec::dataset::{DatasetEncoding, DatasetLayout, DatasetVariable};
//! use compspec::specification::DatasetSpecification;
//!
//! let layout = DatasetLayout::new()
//!     .with_coordinate("time")
//!     .with_data_variable(DatasetVariable::new("temperature", vec![8, 91, 180], 4));
//!
//! let specification = DatasetSpecification::from("temperature:lossy,zfp,rate,4");
//! let encoding = DatasetEncoding::new(&layout, &specification)?;
//!
//! assert_eq!(encoding["temperature"].encoding().to_string(), "lossy,zfp,rate,4");
//! assert_eq!(encoding["time"].encoding().to_string(), "lossless,lz4,5");
//! # Ok::<(), compspec::specification::SpecificationError>(())
//! ```
//!
//! ## Licence
//! `compspec` is licensed under either of
//!  - the Apache License, Version 2.0 or <http://www.apache.org/licenses/LICENSE-2.0> or
//!  - the MIT license or <http://opensource.org/licenses/MIT>, at your option.

#![warn(unused_variables)]
#![warn(dead_code)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![deny(clippy::missing_panics_doc)]

pub mod chunk;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod specification;
