//! End-to-end decoding of synthesized export archives

use knxproj_archive::{ArchiveError, FixedPassword, NoPassword};
use knxproj_backend::{BackendError, ExportArchive};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{AesMode, ZipWriter};

const PROJECT_META: &str = r#"<KNX xmlns="http://knx.org/xml/project/21">
    <Project Id="P-0497">
        <ProjectInformation Name="Testproject" Comment=""
            GroupAddressStyle="ThreeLevel"/>
    </Project>
</KNX>"#;

const INSTALLATION: &str = r#"<KNX xmlns="http://knx.org/xml/project/21">
    <Project Id="P-0497">
        <Installations>
            <Installation Name="">
                <Topology>
                    <Area Id="P-0497-0_A-2" Name="New area" Address="1">
                        <Line Id="P-0497-0_L-3" Name="New line" Address="1">
                            <Segment Id="P-0497-0_S-1" Number="0">
                                <DeviceInstance Id="P-0497-0_DI-1" Address="1"
                                    ProductRefId="M-0007_H-6131.2F20-1_P-6131.2F20"
                                    Hardware2ProgramRefId="M-0007_H-6131.2F20-1_HP-3120-32-269B">
                                    <ComObjectInstanceRefs>
                                        <ComObjectInstanceRef RefId="O-10_R-1" Links="GA-1"/>
                                    </ComObjectInstanceRefs>
                                </DeviceInstance>
                            </Segment>
                        </Line>
                    </Area>
                </Topology>
                <GroupAddresses>
                    <GroupRanges>
                        <GroupRange Id="P-0497-0_GR-1" Name="Lights"
                            RangeStart="1" RangeEnd="255">
                            <GroupAddress Id="P-0497-0_GA-1" Name="Kitchen" Address="1"/>
                        </GroupRange>
                    </GroupRanges>
                </GroupAddresses>
            </Installation>
        </Installations>
    </Project>
</KNX>"#;

const HARDWARE: &str = r#"<KNX xmlns="http://knx.org/xml/project/13">
    <ManufacturerData>
        <Manufacturer RefId="M-0007">
            <Hardware>
                <Hardware Id="M-0007_H-6131.2F20-1" Name="Switch actuator">
                    <Products>
                        <Product Id="M-0007_H-6131.2F20-1_P-6131.2F20" Text="6131/20"/>
                    </Products>
                </Hardware>
            </Hardware>
        </Manufacturer>
    </ManufacturerData>
</KNX>"#;

const MANUFACTURER: &str = r#"<KNX xmlns="http://knx.org/xml/project/11">
    <ManufacturerData>
        <Manufacturer RefId="M-0080">
            <ApplicationPrograms>
                <ApplicationProgram Id="M-0080_A-1012-10-5227-O00C5" Name="Dimmer"
                    ApplicationVersion="16">
                    <Static>
                        <ComObjectTable>
                            <ComObject Id="M-0080_A-1012-10-5227-O00C5_O-0"
                                Name="Switch" DatapointType="DPST-1-1"/>
                        </ComObjectTable>
                    </Static>
                </ApplicationProgram>
            </ApplicationPrograms>
        </Manufacturer>
    </ManufacturerData>
</KNX>"#;

/// A flat ETS 5 style export: documents sit directly in the container
fn write_flat_export(path: &Path) {
    let file = File::create(path).expect("create export");
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let entries = [
        ("P-0497/Project.xml", PROJECT_META),
        ("P-0497/0.xml", INSTALLATION),
        ("M-0007_H-6131.2F20-1/Hardware.xml", HARDWARE),
        ("M-0080/M-0080_A-1012-10-5227-O00C5.xml", MANUFACTURER),
    ];
    for (name, contents) in entries {
        zip.start_file(name, options).expect("start entry");
        zip.write_all(contents.as_bytes()).expect("write entry");
    }
    // Noise the classifier must ignore
    zip.start_file("Baggages/logo.png", options).expect("noise");
    zip.write_all(b"\x89PNG").expect("noise bytes");

    zip.finish().expect("finish export");
}

/// An ETS 6 style export: the project documents live in an encrypted
/// nested container whose entries are unprefixed
fn write_nested_export(path: &Path, password: &str) {
    let mut inner = ZipWriter::new(Cursor::new(Vec::new()));
    let inner_options = SimpleFileOptions::default();
    inner
        .start_file("Project.xml", inner_options)
        .expect("inner meta");
    inner.write_all(PROJECT_META.as_bytes()).expect("write");
    inner
        .start_file("0.xml", inner_options)
        .expect("inner installation");
    inner.write_all(INSTALLATION.as_bytes()).expect("write");
    let inner_bytes = inner.finish().expect("finish inner").into_inner();

    let file = File::create(path).expect("create export");
    let mut zip = ZipWriter::new(file);
    zip.start_file(
        "P-0497.zip",
        SimpleFileOptions::default().with_aes_encryption(AesMode::Aes256, password),
    )
    .expect("protected inner container");
    zip.write_all(&inner_bytes).expect("write inner");
    zip.start_file(
        "M-0007_H-6131.2F20-1/Hardware.xml",
        SimpleFileOptions::default(),
    )
    .expect("hardware entry");
    zip.write_all(HARDWARE.as_bytes()).expect("write hardware");
    zip.finish().expect("finish export");
}

#[test]
fn test_flat_export_classifies_and_decodes() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = TempDir::new().expect("temp dir");
    let export = dir.path().join("Testproject.knxproj");
    write_flat_export(&export);

    let archive = ExportArchive::open(&export, &NoPassword).expect("export opens");

    assert_eq!(archive.projects().len(), 1);
    let project_ref = &archive.projects()[0];
    assert_eq!(project_ref.installation_paths.len(), 1);

    let info = archive
        .decode_project_info(project_ref)
        .expect("meta decodes");
    assert_eq!(info.id.as_str(), "P-0497");
    assert_eq!(info.name, "Testproject");

    let project = archive
        .decode_installation(&project_ref.installation_paths[0])
        .expect("installation decodes");
    let device = &project.installations[0].topology[0].lines[0].devices[0];
    assert_eq!(device.id.as_str(), "DI-1");
    assert_eq!(device.manufacturer.as_ref().unwrap().as_str(), "M-0007");
    assert_eq!(
        device.hardware2_program.as_ref().unwrap().as_str(),
        "HP-3120-32-269B"
    );
    assert_eq!(device.com_objects[0].links[0].as_str(), "GA-1");

    assert_eq!(archive.hardware().len(), 1);
    let hardware_ref = &archive.hardware()[0];
    assert_eq!(hardware_ref.manufacturer_id.as_str(), "M-0007");
    let catalog = archive.decode_hardware(hardware_ref).expect("catalog");
    assert_eq!(catalog.hardware[0].id.as_str(), "H-6131.2F20-1");

    assert_eq!(archive.manufacturers().len(), 1);
    let manufacturer_ref = &archive.manufacturers()[0];
    assert_eq!(manufacturer_ref.manufacturer_id.as_str(), "M-0080");
    assert_eq!(
        manufacturer_ref.application_program_id.as_str(),
        "A-1012-10-5227-O00C5"
    );
    let data = archive
        .decode_manufacturer(manufacturer_ref)
        .expect("program document");
    assert_eq!(data.programs[0].com_objects[0].id.as_str(), "O-0");

    // Skipped noise never reaches the manifest
    assert!(archive
        .manifest()
        .entries()
        .all(|(relative, _)| !relative.contains("Baggages")));
}

#[test]
fn test_nested_encrypted_export_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let export = dir.path().join("Testproject.knxproj");
    write_nested_export(&export, "export-password");

    let archive = ExportArchive::open(&export, &FixedPassword("export-password".to_string()))
        .expect("protected export opens");

    // The nested container expanded into its sibling directory, which
    // restores the canonical P-0497/Project.xml layout.
    assert_eq!(archive.projects().len(), 1);
    let project_ref = &archive.projects()[0];
    let info = archive
        .decode_project_info(project_ref)
        .expect("meta decodes");
    assert_eq!(info.name, "Testproject");

    let project = archive
        .decode_installation(&project_ref.installation_paths[0])
        .expect("installation decodes");
    assert_eq!(project.id.as_str(), "P-0497");

    assert_eq!(archive.hardware().len(), 1);
}

#[test]
fn test_nested_export_with_wrong_password_fails() {
    let dir = TempDir::new().expect("temp dir");
    let export = dir.path().join("Testproject.knxproj");
    write_nested_export(&export, "export-password");

    let err = ExportArchive::open(&export, &FixedPassword("nope".to_string())).unwrap_err();
    match err {
        BackendError::Archive(ArchiveError::DecryptionFailed { entry }) => {
            assert_eq!(entry, "P-0497.zip");
        }
        other => panic!("expected DecryptionFailed, got {other:?}"),
    }
}

#[test]
fn test_close_removes_extraction_tree() {
    let dir = TempDir::new().expect("temp dir");
    let export = dir.path().join("Testproject.knxproj");
    write_flat_export(&export);

    let archive = ExportArchive::open(&export, &NoPassword).expect("export opens");
    let extraction_root = archive.manifest().root().to_path_buf();
    assert!(extraction_root.exists());

    archive.close().expect("close succeeds");
    assert!(!extraction_root.exists());
}
