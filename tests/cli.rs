use std::process::Command;

use tempfile::tempdir;

use bridgecrab::depict::{DepictionGenerator, Highlight, PINK, RED};
use bridgecrab::{analyze, parse_smiles, BridgeConfig, BridgeError};

fn mbr() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mbr"))
}

#[test]
fn depiction_written_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("norbornane.svg");

    let mut mol = parse_smiles("C1CC2CC1CC2").unwrap();
    mol.set_title("norbornane");
    let result = analyze(&mol, &BridgeConfig::default()).unwrap();
    let (ring, bridging) = result.first().unwrap();
    DepictionGenerator::new()
        .with_fill_to_fit()
        .depict(&mol, &Highlight::from_ring(&mol, ring, bridging))
        .write_to(&path)
        .unwrap();

    let svg = std::fs::read_to_string(&path).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.trim_end().ends_with("</svg>"));
    assert!(svg.contains(">norbornane<"));
    assert_eq!(svg.matches(&format!(r#"stroke="{}""#, RED)).count(), ring.len());
    assert_eq!(svg.matches(&format!(r#"fill="{}""#, PINK)).count(), 2);
}

#[test]
fn unwritable_path_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("out.svg");
    let mol = parse_smiles("C1CC1").unwrap();
    let err = DepictionGenerator::new()
        .depict(&mol, &Highlight::default())
        .write_to(&path)
        .unwrap_err();
    assert!(matches!(err, BridgeError::Io { .. }));
}

#[test]
fn cli_reports_and_depicts() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("bco.svg");
    let output = mbr()
        .args(["C1CC2CCC1CC2", "bicyclooctane", "--output"])
        .arg(&out)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Found 3 bridging rings");
    assert_eq!(lines[1..], ["Ring of size 6 with 2 bridging atoms"; 3]);
    assert!(std::fs::read_to_string(&out).unwrap().contains(">bicyclooctane<"));
}

#[test]
fn cli_defaults_output_to_title() {
    let dir = tempdir().unwrap();
    let output = mbr()
        .current_dir(dir.path())
        .args(["C1CCCCC1", "cyclohexane"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(dir.path().join("cyclohexane.svg").exists());
}

#[test]
fn cli_flags_and_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("mbr.toml");
    std::fs::write(&config, "bridge_length_max = 3\nparallel = false\n").unwrap();

    let output = mbr()
        .current_dir(dir.path())
        .args(["C1CC2CCC1CC2", "bco", "--no-depict", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Ring of size 6 with 0 bridging atoms"));
    assert!(!dir.path().join("bco.svg").exists());

    // The flag overrides the file.
    let output = mbr()
        .current_dir(dir.path())
        .args(["C1CC2CCC1CC2", "bco", "--no-depict", "--bridge-length", "4", "--config"])
        .arg(&config)
        .output()
        .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Ring of size 6 with 2 bridging atoms"));
}

#[test]
fn cli_empty_result_skips_depiction() {
    let dir = tempdir().unwrap();
    let output = mbr()
        .current_dir(dir.path())
        .args(["CCCC", "butane"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), "Found 0 bridging rings\n");
    assert!(!dir.path().join("butane.svg").exists());
}

#[test]
fn cli_rejects_bad_input() {
    let output = mbr().args(["C1CC", "broken"]).output().unwrap();
    assert!(!output.status.success());

    let output = mbr()
        .args(["C1CC1", "x", "--min-ring-size", "9", "--no-depict"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("min_ring_size (9) exceeds max_ring_size (8)"));
}
