use std::{path::PathBuf, process::Command};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_satmosaic")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "satmosaic.exe"
            } else {
                "satmosaic"
            });
            p
        })
}

#[test]
fn sentinel_without_coordinates_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("out.png");

    let output = Command::new(exe())
        .args(["sentinel", "--zoom-level", "2", "--days", "1", "--out"])
        .arg(&out_path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid coordinate"), "{stderr}");
    assert!(!out_path.exists());
}

#[test]
fn sdo_rejects_unknown_color_mode() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("sun.jpg");

    let output = Command::new(exe())
        .args(["sdo", "--color-mode", "0193", "--out"])
        .arg(&out_path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid parameter"), "{stderr}");
    assert!(!out_path.exists());
}

#[test]
fn sentinel_rejects_config_with_bad_zoom() {
    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("mosaic.json");
    std::fs::write(&cfg_path, r#"{"latitude": 1.0, "longitude": 2.0, "zoom_level": 9}"#).unwrap();

    let output = Command::new(exe())
        .args(["sentinel", "--config"])
        .arg(&cfg_path)
        .arg("--out")
        .arg(dir.path().join("out.png"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("zoom_level"), "{stderr}");
}

#[test]
fn percentile_without_stretch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();

    let output = Command::new(exe())
        .args([
            "sentinel",
            "-a",
            "1.0",
            "-b",
            "2.0",
            "--percentile",
            "1.0",
            "--correction",
            "gray-world",
            "--out",
        ])
        .arg(dir.path().join("out.png"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--percentile"), "{stderr}");
}
