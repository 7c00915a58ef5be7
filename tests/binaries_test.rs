use std::process::Command;

#[test]
fn test_validateissn_prints_error_to_stdout_and_stops() {
    let output = Command::new(env!("CARGO_BIN_EXE_validateissn"))
        .args(["12345679", "123", "0003-200X"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run validateissn");

    assert!(!output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "1234-5679\ttrue\ncannot normalize: 123\n"
    );
    assert!(output.stderr.is_empty());
}

#[test]
fn test_validateissn_demo_list() {
    let output = Command::new(env!("CARGO_BIN_EXE_validateissn"))
        .output()
        .expect("failed to run validateissn");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "2347-6710\ttrue\n0378-5955\ttrue\n0003-200X\ttrue\n0003-5661\ttrue\n0003-5660\tfalse\n"
    );
}

#[test]
fn test_mapping_diagnostics_go_to_stderr_even_when_logging_is_off() {
    let dir = tempfile::tempdir().unwrap();
    let dump = dir.path().join("data.ndj");
    std::fs::write(
        &dump,
        concat!(
            "{\"@graph\": [\n",
            r#"{"@graph":[{"@id":"resource/ISSN/0003-200X#KeyTitle"},{"@id":"resource/ISSN-L/0003-200X"}]}"#,
            "\n",
        ),
    )
    .unwrap();

    for rust_log in ["off", "error"] {
        let output = Command::new(env!("CARGO_BIN_EXE_issn-issnl-mapping"))
            .arg(&dump)
            .env("RUST_LOG", rust_log)
            .env("NO_COLOR", "1")
            .output()
            .expect("failed to run issn-issnl-mapping");

        assert!(output.status.success());
        assert_eq!(
            String::from_utf8(output.stdout).unwrap(),
            "0003-200X\t0003-200X\n"
        );
        let stderr = String::from_utf8(output.stderr).unwrap();
        assert!(stderr.contains("line 1:"), "RUST_LOG={}: {}", rust_log, stderr);
    }
}
