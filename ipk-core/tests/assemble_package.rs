mod common;

use common::decode_ar;
use flate2::read::GzDecoder;
use ipk_core::assemble::DEBIAN_BINARY;
use ipk_core::payload::DeterministicTarGz;
use ipk_core::{assemble, Assembler, LaunchIndicator, PackageError, PackageSpec};
use std::collections::BTreeMap;
use std::io::Read;

fn untar(gz: &[u8]) -> BTreeMap<String, (u32, Vec<u8>)> {
    let mut archive = tar::Archive::new(GzDecoder::new(gz));
    let mut out = BTreeMap::new();
    for ent in archive.entries().unwrap() {
        let mut ent = ent.unwrap();
        let path = ent.path().unwrap().to_string_lossy().to_string();
        let mode = ent.header().mode().unwrap();
        let mut body = Vec::new();
        ent.read_to_end(&mut body).unwrap();
        out.insert(path, (mode, body));
    }
    out
}

fn sample() -> PackageSpec {
    PackageSpec::new("org.example.app").with_script("echo hi")
}

#[test]
fn first_member_is_debian_binary() {
    let pkg = assemble(&sample()).unwrap();
    let members = decode_ar(&pkg);
    assert_eq!(members[0].name, "debian-binary");
    assert_eq!(members[0].data, b"2.0\n");
    assert_eq!(DEBIAN_BINARY, "2.0\n");
}

#[test]
fn members_are_in_installer_order() {
    let members = decode_ar(&assemble(&sample()).unwrap());
    let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["debian-binary", "control.tar.gz", "data.tar.gz"]);
    for m in &members {
        assert_eq!(m.mode, 0o100644);
    }
}

#[test]
fn payloads_hold_the_generated_files() {
    let members = decode_ar(&assemble(&sample()).unwrap());

    let control = untar(&members[1].data);
    let (_, text) = &control["control"];
    assert!(String::from_utf8_lossy(text).starts_with("Package: org.example.app\nVersion: 0.0.1\n"));

    let data = untar(&members[2].data);
    let (mode, run) = &data["usr/palm/applications/org.example.app/run.sh"];
    assert_eq!(*mode, 0o755);
    assert_eq!(run, b"#!/usr/bin/env bash\necho hi\n");
    let (_, info) = &data["usr/palm/applications/org.example.app/appinfo.json"];
    let info: serde_json::Value = serde_json::from_slice(info).unwrap();
    assert_eq!(info["id"], "org.example.app");
    assert!(data.contains_key("usr/palm/packages/org.example.app/packageinfo.json"));
}

#[test]
fn assemble_is_deterministic() {
    let mut spec = sample();
    spec.mtime = 1_600_000_000;
    spec.launch_indicator = LaunchIndicator::Spinner;
    let a = assemble(&spec).unwrap();
    let b = Assembler::new(DeterministicTarGz::default()).assemble(&spec.clone()).unwrap();
    assert_eq!(a, b);
    assert_eq!(decode_ar(&a)[2].mtime, 1_600_000_000);
}

#[test]
fn malformed_shortcut_params_yield_no_package() {
    let spec = PackageSpec::new("org.example.app").with_shortcut("org.webosbrew.hbchannel", "[1,");
    assert!(matches!(assemble(&spec), Err(PackageError::MalformedInput(_))));
}

#[test]
fn unsafe_app_id_is_rejected() {
    let spec = PackageSpec::new("../../etc").with_script("true");
    assert!(matches!(assemble(&spec), Err(PackageError::InvalidAppId { .. })));
}

#[test]
fn spec_file_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.json");
    std::fs::write(
        &path,
        r#"{"appId":"org.example.app","version":"1.2.3","launch":{"kind":"shortcut","target":"com.webos.app.hdmi1"}}"#,
    )
    .unwrap();
    let spec = PackageSpec::from_json_path(&path).unwrap();
    assert_eq!(spec.version, "1.2.3");
    let data = untar(&decode_ar(&assemble(&spec).unwrap())[2].data);
    let (_, run) = &data["usr/palm/applications/org.example.app/run.sh"];
    let run = String::from_utf8_lossy(run);
    assert!(run.contains(r#"'{"id":"com.webos.app.hdmi1","params":{}}'"#), "{run}");
}

#[test]
fn longest_valid_app_id_assembles() {
    let id = format!("com.example.{}", "a".repeat(243));
    assert_eq!(id.len(), 255);
    ipk_core::validate::validate_app_id(&id).unwrap();

    let members = decode_ar(&assemble(&PackageSpec::new(id.clone()).with_script("true")).unwrap());
    let data = untar(&members[2].data);
    let (mode, run) = &data[&format!("usr/palm/applications/{id}/run.sh")];
    assert_eq!(*mode, 0o755);
    assert_eq!(run, b"#!/usr/bin/env bash\ntrue\n");
    let (_, info) = &data[&format!("usr/palm/packages/{id}/packageinfo.json")];
    let info: serde_json::Value = serde_json::from_slice(info).unwrap();
    assert_eq!(info["app"], id.as_str());
}
