use std::{fs, process::Command};

use serde_json::Value;

fn run_headless(args: &[&str]) -> Value {
    let output = Command::new(env!("CARGO_BIN_EXE_meadow"))
        .arg("--headless")
        .args(args)
        .output()
        .expect("failed to launch meadow binary");

    assert!(
        output.status.success(),
        "meadow exited with {:?}: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should hold the frame as JSON")
}

fn ops(frame: &Value) -> Vec<String> {
    frame["commands"]
        .as_array()
        .expect("commands array")
        .iter()
        .map(|command| command["op"].as_str().expect("op tag").to_owned())
        .collect()
}

#[test]
fn headless_frame_draws_one_glyph_per_agent() {
    let frame = run_headless(&[
        "--width", "1000", "--height", "500", "--pixel-ratio", "2", "--agents", "5", "--seed",
        "7",
    ]);

    assert_eq!(frame["buffer_size"], serde_json::json!([2000, 1000]));
    assert_eq!(frame["display_size"], serde_json::json!([1000.0, 500.0]));
    assert_eq!(frame["glyphs"], 5);
    assert_eq!(
        ops(&frame).iter().filter(|op| *op == "set_fill_color").count(),
        1
    );
}

#[test]
fn seeded_runs_are_reproducible() {
    let args = ["--agents", "8", "--seed", "42", "--glyph", "square"];

    assert_eq!(run_headless(&args), run_headless(&args));
}

#[test]
fn missing_engine_fails_without_printing_a_frame() {
    let output = Command::new(env!("CARGO_BIN_EXE_meadow"))
        .args(["--headless", "--no-engine", "--width", "800", "--height", "600"])
        .output()
        .expect("failed to launch meadow binary");

    assert!(!output.status.success(), "an unavailable engine must fail the run");
    assert!(
        output.stdout.is_empty(),
        "no partial frame may be printed: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("simulation engine is unavailable"),
        "the error should name the missing engine"
    );
}

#[test]
fn config_file_supplies_settings() {
    let path = std::env::temp_dir().join(format!("meadow-headless-{}.toml", std::process::id()));
    fs::write(
        &path,
        r#"
        version = 1

        [viewport]
        width = 400.0
        height = 300.0

        [glyph]
        kind = "square"

        [world]
        agents = 2
        seed = 3
        "#,
    )
    .expect("failed to write temporary config");

    let frame = run_headless(&["--config", path.to_str().expect("utf-8 temp path")]);
    let _ = fs::remove_file(&path);

    assert_eq!(frame["buffer_size"], serde_json::json!([400, 300]));
    assert_eq!(frame["glyphs"], 2);
    let line_tos = ops(&frame).iter().filter(|op| *op == "line_to").count();
    assert_eq!(line_tos, 2 * 3, "squares trace three edges after the first vertex");
}

#[test]
fn unsupported_config_version_fails() {
    let path = std::env::temp_dir().join(format!("meadow-bad-{}.toml", std::process::id()));
    fs::write(&path, "version = 9\n").expect("failed to write temporary config");

    let output = Command::new(env!("CARGO_BIN_EXE_meadow"))
        .args(["--headless", "--config", path.to_str().expect("utf-8 temp path")])
        .output()
        .expect("failed to launch meadow binary");
    let _ = fs::remove_file(&path);

    assert!(!output.status.success(), "version 9 must be rejected");
}
