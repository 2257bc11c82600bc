use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "breath-garden"])
        .status()
        .expect("failed to invoke cargo check for the breath-garden binary");

    assert!(status.success(), "cargo check --bin breath-garden should succeed");
}

#[test]
fn short_run_prints_a_json_summary() {
    let output = Command::new(env!("CARGO_BIN_EXE_breath-garden"))
        .args(["--species", "generic-flower", "--ticks", "240", "--seed", "7", "--json"])
        .output()
        .expect("failed to run the breath-garden binary");

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(summary["ticks"], 240);
    assert!(summary["stems"].as_u64().unwrap_or(0) > 0);
}

#[test]
fn missing_config_file_is_reported() {
    let output = Command::new(env!("CARGO_BIN_EXE_breath-garden"))
        .args(["--config", "does-not-exist.toml", "--ticks", "1"])
        .output()
        .expect("failed to run the breath-garden binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does-not-exist.toml"));
}

#[test]
fn non_finite_noise_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_breath-garden"))
        .args(["--noise", "inf", "--ticks", "1"])
        .output()
        .expect("failed to run the breath-garden binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("noise"));
}
