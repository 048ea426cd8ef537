use std::process::{Command, Output};

fn sciloop(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sciloop"))
        .args(args)
        .output()
        .expect("sciloop binary should run")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    let text = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(text.trim()).expect("stdout should be one JSON object")
}

#[test]
fn encode_emits_frame_json() {
    let output = sciloop(&["--format", "json", "encode", "0x123456"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["word"], "0x123456");
    assert_eq!(json["payload"][0], "0x12");
    assert_eq!(json["payload"][1], "0x34");
    assert_eq!(json["payload"][2], "0x56");
    assert_eq!(json["check_byte"], "0x13");
}

#[test]
fn check_strict_accepts_matching_byte() {
    let output = sciloop(&["--format", "json", "check", "0x123456", "0x13", "--strict"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_json(&output)["valid"], true);
}

#[test]
fn check_strict_rejects_wrong_byte() {
    let output = sciloop(&["--format", "json", "check", "0x123456", "0x14", "--strict"]);
    assert_eq!(output.status.code(), Some(60));
    assert_eq!(stdout_json(&output)["valid"], false);
}

#[test]
fn check_fielded_policy_accepts_any_nonzero_byte() {
    // The compatibility policy only tests nonzero-ness, so a wrong but
    // nonzero byte passes.
    let output = sciloop(&["--format", "json", "check", "0x123456", "0x14"]);
    assert_eq!(output.status.code(), Some(0));

    let json = stdout_json(&output);
    assert_eq!(json["valid"], true);
    assert_eq!(json["policy"], "fielded");
}

#[test]
fn check_fielded_policy_rejects_zero_byte() {
    let output = sciloop(&["--format", "json", "check", "0x123456", "0"]);
    assert_eq!(output.status.code(), Some(60));
}

#[test]
fn run_reports_blocked_bench_scenario() {
    // Default seed against the default sensor word: both chunks of the
    // first frame mismatch and the link blocks on cycle 4.
    let output = sciloop(&["--format", "json", "run", "--cycles", "1000"]);
    assert!(output.status.success());

    let json = stdout_json(&output);
    assert_eq!(json["cycles"], 4);
    assert_eq!(json["stalled_at"], 4);
    assert_eq!(json["stats"]["transmit_events"], 1);
    assert_eq!(json["stats"]["receive_events"], 2);
    assert_eq!(json["stats"]["mismatches"], 2);
    assert_eq!(json["final_phase"], "transmitting");
}

#[test]
fn run_rejects_impossible_fifo_depth() {
    let output = sciloop(&["run", "--fifo-depth", "0"]);
    assert_eq!(output.status.code(), Some(64));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid FIFO depth"));
}

#[test]
fn run_rejects_oversized_samples() {
    let output = sciloop(&["run", "--hi", "0x1000"]);
    assert_eq!(output.status.code(), Some(64));
}
