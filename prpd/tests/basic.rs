use std::process::Command;

#[test]
fn init_then_show_round_trips_definition() {
    let exe = env!("CARGO_BIN_EXE_prpd");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("chart.toml");

    let status = Command::new(exe)
        .arg("init")
        .arg(&path)
        .status()
        .expect("run prpd init");
    assert!(status.success());
    assert!(path.exists());

    let output = Command::new(exe)
        .arg("show")
        .arg(&path)
        .output()
        .expect("run prpd show");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[PRPD][INFO]"));
    assert!(stdout.contains("200 points"));
}

#[test]
fn show_reports_invalid_definition() {
    let exe = env!("CARGO_BIN_EXE_prpd");
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"name": "broken", "phase_axis": {"phase_min": 0.0, "phase_max": 360.0, "point_count": 0}}"#).expect("write");

    let output = Command::new(exe)
        .arg("show")
        .arg(&path)
        .output()
        .expect("run prpd show");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[PRPD][ERROR]"));
}

#[test]
fn simulate_exports_render_batches() {
    let exe = env!("CARGO_BIN_EXE_prpd");
    let dir = tempfile::tempdir().expect("tempdir");
    let export = dir.path().join("batches.json");

    let output = Command::new(exe)
        .args(["simulate", "--cycles", "120", "--seed", "5", "--export"])
        .arg(&export)
        .output()
        .expect("run prpd simulate");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("120 cycles produced, 120 accepted"));
    assert!(stdout.contains("100 of 100 cycles retained"));

    let data = std::fs::read(&export).expect("export written");
    let chart: serde_json::Value = serde_json::from_slice(&data).expect("valid json");
    assert_eq!(chart["cycles"], 100);
    let batches = chart["batches"].as_array().expect("batches array");
    assert!(!batches.is_empty());
    let hits: u64 = batches
        .iter()
        .map(|b| {
            b["frequency"].as_u64().unwrap() * b["transforms"].as_array().unwrap().len() as u64
        })
        .sum();
    assert_eq!(hits, 100 * 200);
}

#[test]
fn seeded_exports_are_byte_identical() {
    let exe = env!("CARGO_BIN_EXE_prpd");
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    for path in [&first, &second] {
        let status = Command::new(exe)
            .args(["simulate", "--cycles", "60", "--seed", "21", "--export"])
            .arg(path)
            .status()
            .expect("run prpd simulate");
        assert!(status.success());
    }
    let first = std::fs::read(&first).expect("first export");
    let second = std::fs::read(&second).expect("second export");
    assert_eq!(first, second);
}
