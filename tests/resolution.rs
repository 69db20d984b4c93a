use std::collections::BTreeMap;
use std::io::Write;

use compspec::dataset::{DatasetEncoding, DatasetLayout, DatasetVariable};
use compspec::encoding::{Encoding, FilterAvailability, SZ_FILTER_ID};
use compspec::specification::{DatasetSpecification, SpecificationError};

fn dummy_layout() -> DatasetLayout {
    DatasetLayout::new()
        .with_coordinate("lon")
        .with_coordinate("lat")
        .with_coordinate("time")
        .with_data_variable(DatasetVariable::new("temperature", vec![8, 91, 180], 4))
        .with_data_variable(DatasetVariable::new("vorticity", vec![8, 91, 180], 4))
        .with_data_variable(DatasetVariable::new("pressure", vec![8, 91, 180], 4))
}

#[test]
fn multivariate_specification_end_to_end() {
    let specification = DatasetSpecification::from(
        "lossy,sz,pw_rel,0.0001 temperature:lossy,zfp,rate,4 vorticity:lossy,sz,abs,0.1",
    );
    let encoding = DatasetEncoding::new(&dummy_layout(), &specification).unwrap();

    assert_eq!(
        encoding["temperature"].encoding(),
        &"lossy,zfp,rate,4".parse::<Encoding>().unwrap()
    );
    assert_eq!(
        encoding["vorticity"].encoding(),
        &"lossy,sz,abs,0.1".parse::<Encoding>().unwrap()
    );
    // pressure inherits the default.
    assert_eq!(
        encoding["pressure"].encoding(),
        &"lossy,sz,pw_rel,0.0001".parse::<Encoding>().unwrap()
    );
    for coordinate in ["lon", "lat", "time"] {
        assert_eq!(
            encoding[coordinate].encoding(),
            &"lossless,lz4,5".parse::<Encoding>().unwrap()
        );
    }
}

#[test]
fn mapping_specification_matches_inline_string() {
    let mut mapping = BTreeMap::new();
    mapping.insert("temperature".to_string(), "lossy,zfp,rate,4".to_string());
    mapping.insert("vorticity".to_string(), "lossy,sz,abs,0.1".to_string());

    let layout = dummy_layout();
    let from_mapping =
        DatasetEncoding::new(&layout, &DatasetSpecification::from(mapping)).unwrap();
    let from_string = DatasetEncoding::new(
        &layout,
        &DatasetSpecification::from("temperature:lossy,zfp,rate,4 vorticity:lossy,sz,abs,0.1"),
    )
    .unwrap();

    assert_eq!(from_mapping, from_string);
}

#[test]
fn file_specification_resolves_like_the_mapping() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "default: lossy,zfp,rate,4").unwrap();
    writeln!(file, "vorticity: lossy,sz,abs,0.1").unwrap();
    file.flush().unwrap();

    let resolved = DatasetSpecification::from(file.path()).resolve().unwrap();
    assert_eq!(resolved.default_encoding().to_string(), "lossy,zfp,rate,4");
    assert_eq!(
        resolved.variable("vorticity").unwrap().to_string(),
        "lossy,sz,abs,0.1"
    );
    // A lossy default never propagates to coordinates.
    assert_eq!(resolved.coordinates_encoding().to_string(), "lossless,lz4,5");
}

#[test]
fn missing_file_is_a_read_error() {
    let result = DatasetSpecification::from(std::path::Path::new("non-existing.yaml")).resolve();
    assert!(matches!(result, Err(SpecificationError::FileRead { .. })));
}

#[test]
fn nested_yaml_is_a_format_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "default:").unwrap();
    writeln!(file, "  compressor: zfp").unwrap();
    file.flush().unwrap();

    let result = DatasetSpecification::from(file.path()).resolve();
    assert!(matches!(result, Err(SpecificationError::FileFormat { .. })));
}

#[test]
fn no_specification_compresses_losslessly() {
    let encoding = DatasetEncoding::new(&dummy_layout(), &DatasetSpecification::None).unwrap();
    for variable in encoding.values() {
        assert_eq!(variable.encoding().to_string(), "lossless,lz4,5");
    }
}

#[test]
fn null_specification_disables_compression_everywhere() {
    let encoding =
        DatasetEncoding::new(&dummy_layout(), &DatasetSpecification::from("None")).unwrap();
    for variable in encoding.values() {
        assert!(variable.encoding().is_null());
    }
    assert!(encoding.descriptions().is_empty());
}

#[test]
fn chunk_shapes_match_variable_dimension_order() {
    let layout = DatasetLayout::new()
        .with_data_variable(DatasetVariable::new("wide", vec![4, 4096], 8))
        .with_data_variable(DatasetVariable::new("tall", vec![4096, 4], 8));
    let encoding =
        DatasetEncoding::with_chunk_target(&layout, &DatasetSpecification::None, 8 * 8192)
            .unwrap();

    let wide = encoding["wide"].chunk_shape().unwrap();
    let tall = encoding["tall"].chunk_shape().unwrap();
    assert_eq!(wide, &[2, 4096]);
    assert_eq!(tall, &[4096, 2]);
}

#[test]
fn descriptions_carry_extractable_filter_ids() {
    let specification = DatasetSpecification::from(
        "lossless temperature:lossy,zfp,rate,4 vorticity:lossy,sz,abs,0.1",
    );
    let encoding = DatasetEncoding::new(&dummy_layout(), &specification).unwrap();
    let descriptions = encoding.descriptions();

    assert!(descriptions["temperature"].contains("id:32013"));
    assert!(descriptions["vorticity"].contains("id:32017"));
    assert!(descriptions["pressure"].contains("id:32001"));
    assert!(descriptions["lon"].contains("id:32001"));
}

#[test]
fn unavailable_filters_fail_the_availability_check() {
    struct BloscOnly;
    impl FilterAvailability for BloscOnly {
        fn is_available(&self, filter_id: u32) -> bool {
            filter_id == compspec::encoding::BLOSC_FILTER_ID
        }
    }

    let specification = DatasetSpecification::from("vorticity:lossy,sz,abs,0.1");
    let encoding = DatasetEncoding::new(&dummy_layout(), &specification).unwrap();
    let error = encoding.ensure_available(&BloscOnly).unwrap_err();
    assert_eq!(error.filter_id(), SZ_FILTER_ID);

    let lossless_only = DatasetEncoding::new(&dummy_layout(), &DatasetSpecification::None).unwrap();
    assert!(lossless_only.ensure_available(&BloscOnly).is_ok());
}

#[test]
fn resolver_errors_surface_as_specification_errors() {
    let layout = dummy_layout();
    let duplicate = DatasetSpecification::from("var1:lossless var1:lossy,sz,abs,0.1");
    assert!(matches!(
        DatasetEncoding::new(&layout, &duplicate),
        Err(SpecificationError::DuplicateVariable(_))
    ));

    let out_of_range = DatasetSpecification::from("temperature:lossy,zfp,rate,32");
    assert!(matches!(
        DatasetEncoding::new(&layout, &out_of_range),
        Err(SpecificationError::ParameterRange { .. })
    ));
}
