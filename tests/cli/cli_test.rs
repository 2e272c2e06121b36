//! CLI contract tests.

use assert_cmd::Command;
use serde_json::Value;

fn advisor() -> Command {
    let mut cmd = match Command::cargo_bin("laptop-advisor") {
        Ok(cmd) => cmd,
        Err(err) => panic!("binary should build: {err}"),
    };
    cmd.env("LAPTOP_ADVISOR_CONFIG", "/nonexistent/laptop-advisor.toml")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("command should run");
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout should be UTF-8")
}

#[test]
fn search_text_of_empty_record() {
    let out = stdout_of(advisor().args(["search-text", ""]));
    assert_eq!(out, "laptop recommendations\n");
}

#[test]
fn search_text_reads_stdin() {
    let out = stdout_of(
        advisor()
            .args(["search-text", "-"])
            .write_stdin(r#"{"purpose": ["study"], "price_range": "Rs 40000 - Rs 45000"}"#),
    );
    assert_eq!(
        out,
        "study laptop within budget Rs 40000 - Rs 45000 best laptop recommendations\n"
    );
}

#[test]
fn missing_lists_unset_fields_in_order() {
    let out = stdout_of(advisor().args([
        "missing",
        r#"{"purpose": ["gaming"], "ram": "unspecified", "display": "IPS"}"#,
    ]));
    assert_eq!(out, "processor\nstorage\ngraphics\nprice_range\n");
}

#[test]
fn merge_prints_outcome_json() {
    let out = stdout_of(advisor().args(["merge", "--record", "garbage", "--patch", r#"{"ram": "16GB"}"#]));
    let value: Value = serde_json::from_str(&out).expect("merge output should be JSON");
    assert_eq!(value["search_text"], "16GB RAM best laptop recommendations");
    let record: Value = serde_json::from_str(value["preferences_json"].as_str().unwrap_or_default())
        .expect("preferences_json should be JSON");
    assert_eq!(record["ram"], "16GB");
    assert_eq!(record["purpose"], Value::Null);
}

#[test]
fn merge_rejects_invalid_patch() {
    advisor()
        .args(["merge", "--patch", r#"{"ram": 16}"#])
        .assert()
        .failure();
}

#[test]
fn tools_and_agents_print_json() {
    let tools: Value =
        serde_json::from_str(&stdout_of(advisor().arg("tools"))).expect("tools should be JSON");
    assert_eq!(tools.as_array().map(Vec::len), Some(2));

    let agents: Value =
        serde_json::from_str(&stdout_of(advisor().arg("agents"))).expect("agents should be JSON");
    assert_eq!(agents[0]["name"], "root_agent");
    assert_eq!(agents[0]["model"], "gemini-2.5-flash");
}

#[test]
fn session_applies_each_line_and_hands_off_when_complete() {
    let input = concat!(
        r#"{"purpose": ["coding"], "processor": "unspecified", "ram": "16GB"}"#,
        "\n",
        "not a patch\n",
        "\n",
        r#"{"storage": "512GB SSD", "graphics": "integrated", "display": "14 inch", "price_range": "unspecified"}"#,
        "\n",
    );
    let output = advisor()
        .arg("session")
        .write_stdin(input)
        .output()
        .expect("command should run");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).expect("stdout should be UTF-8");
    let lines: Vec<Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be JSON"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["missing_fields"].as_array().map(Vec::len), Some(4));
    assert_eq!(lines[1]["missing_fields"], serde_json::json!([]));
    assert_eq!(
        lines[1]["search_text"],
        "coding laptop 16GB RAM 512GB SSD storage integrated graphics 14 inch display \
         best laptop recommendations"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Laptop search text: coding laptop 16GB RAM"));
}
