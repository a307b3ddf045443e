mod test_data;

use axialsync::output::{DatasetOutput, OutputFormat, create_formatter};
use axialsync::{DatasetManifest, Provenance, Quantity, SyncError, SyncPipeline};
use test_data::TempDataset;

const MANIFEST: &str = r#"
name = "gel-phantom-03"
sampling_frequency = "500ms"

[loader]
has_header = true

[[measurement]]
quantity = "Displacement x"
file = "displacement.csv"

[[measurement]]
quantity = "Force x"
dependence = "Time"
file = "force.tsv"

[[measurement]]
quantity = "Rotation x"
file = "rotation.txt"
"#;

fn write_dataset(data: &TempDataset) {
    data.write("manifest.toml", MANIFEST)
        .write(
            "displacement.csv",
            "time,displacement_x\n# encoder\n0,0\n1.5,3\n0.5,1\n1,2\n2,4\n",
        )
        .write("force.tsv", "t\tf\n0\t0.0\n0.75\t0.3\n1.5\t0.6\n")
        .write("rotation.txt", "time rotation\n0 0\n1 45\n2 90\n");
}

#[test]
fn test_manifest_dataset_end_to_end() {
    let data = TempDataset::new("manifest-e2e");
    write_dataset(&data);

    let manifest = DatasetManifest::load(&data.path("manifest.toml")).unwrap();
    let dataset = SyncPipeline::new(&manifest.config())
        .run(&manifest.descriptors().unwrap(), &manifest.source())
        .unwrap();

    assert_eq!(dataset.len(), 5);
    assert_eq!(dataset.time(), Some(&[0.0, 0.5, 1.0, 1.5, 2.0][..]));
    assert_eq!(dataset.displacement(), Some(&[0.0, 1.0, 2.0, 3.0, 4.0][..]));
    assert_eq!(dataset.rotation(), Some(&[0.0, 22.5, 45.0, 67.5, 90.0][..]));

    // force stops at 1.5 s and is extended along its final slope
    let force = dataset.force().unwrap();
    assert!((force[4] - 0.8).abs() < 1e-5, "{:?}", force);

    let velocity = dataset.velocity().unwrap();
    assert!((velocity[2] - 2.0).abs() < 1e-5);
    assert_eq!(
        dataset.provenance(Quantity::VelocityX),
        Some(Provenance::Derived)
    );
}

#[test]
fn test_manifest_dataset_formats() {
    let data = TempDataset::new("manifest-formats");
    write_dataset(&data);

    let manifest = DatasetManifest::load(&data.path("manifest.toml")).unwrap();
    let dataset = SyncPipeline::new(&manifest.config())
        .run(&manifest.descriptors().unwrap(), &manifest.source())
        .unwrap();
    let name = manifest.display_name();
    let output = DatasetOutput {
        name: &name,
        sampling_frequency_hz: 2.0,
        dataset: &dataset,
    };

    let csv = create_formatter(OutputFormat::Csv, false)
        .format(&output)
        .unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("time,displacement_x,velocity_x,rotation_x,force_x")
    );
    assert_eq!(lines.count(), 5);

    let json = create_formatter(OutputFormat::Json, false)
        .format(&output)
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["name"], "gel-phantom-03");
    assert_eq!(value["quantities"].as_array().unwrap().len(), 5);

    let text = create_formatter(OutputFormat::Text, true)
        .format(&output)
        .unwrap();
    assert!(text.contains("gel-phantom-03"));
}

#[test]
fn test_missing_channel_file_reports_path() {
    let data = TempDataset::new("manifest-missing");
    data.write("manifest.toml", MANIFEST)
        .write("displacement.csv", "t,d\n0,0\n1,1\n");

    let manifest = DatasetManifest::load(&data.path("manifest.toml")).unwrap();
    let err = SyncPipeline::new(&manifest.config())
        .run(&manifest.descriptors().unwrap(), &manifest.source())
        .unwrap_err();

    match err {
        SyncError::Io { file, .. } => assert!(file.ends_with("force.tsv"), "{:?}", file),
        other => panic!("expected Io error, got {}", other),
    }
}

#[test]
fn test_malformed_row_reports_line() {
    let data = TempDataset::new("manifest-malformed");
    write_dataset(&data);
    data.write("rotation.txt", "time rotation\n0 0\n1 forty-five\n2 90\n");

    let manifest = DatasetManifest::load(&data.path("manifest.toml")).unwrap();
    let err = SyncPipeline::new(&manifest.config())
        .run(&manifest.descriptors().unwrap(), &manifest.source())
        .unwrap_err();

    assert!(
        matches!(err, SyncError::MalformedData { line: 3, .. }),
        "{}",
        err
    );
}

#[test]
fn test_json_manifest_with_constant_velocity() {
    let data = TempDataset::new("manifest-json");
    data.write(
        "dataset.json",
        r#"{
            "sampling_frequency": 1,
            "measurements": [
                {"quantity": "Force x", "dependence": "Displacement x", "file": "force.csv"},
                {"quantity": "Velocity x", "constant": 4.0}
            ]
        }"#,
    )
    .write("force.csv", "0,0\n2,0.5\n4,1.0\n");

    let manifest = DatasetManifest::load(&data.path("dataset.json")).unwrap();
    assert_eq!(manifest.display_name(), data.dir().file_name().unwrap().to_string_lossy());

    let dataset = SyncPipeline::new(&manifest.config())
        .run(&manifest.descriptors().unwrap(), &manifest.source())
        .unwrap();
    assert_eq!(dataset.time(), Some(&[0.0, 0.25, 0.5, 0.75, 1.0][..]));
    assert_eq!(dataset.velocity(), Some(&[4.0; 5][..]));
}
