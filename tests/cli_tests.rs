use std::process::Command;

/// Test that a headless run completes and prints the final report
#[test]
fn test_headless_run_completes() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "--ticks",
            "10",
            "--seed",
            "7",
            "--log-file",
            "target/cli_run.log",
        ])
        .output()
        .expect("Failed to execute simulation");

    assert!(
        output.status.success(),
        "Simulation failed to run headless. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Simulation complete"),
        "Simulation did not complete properly. stdout: {}",
        stdout
    );
}

/// Test that the final report carries the run statistics
#[test]
fn test_report_contains_statistics() {
    let output = Command::new("cargo")
        .args([
            "run",
            "--",
            "--ticks",
            "10",
            "--seed",
            "7",
            "--log-file",
            "target/cli_stats.log",
        ])
        .output()
        .expect("Failed to execute simulation");

    assert!(output.status.success(), "Simulation failed to run");

    let stdout = String::from_utf8_lossy(&output.stdout);
    for needle in [
        "Ticks run:",
        "Vehicles generated:",
        "Vehicles released:",
        "Phase changes:",
        "Average wait:",
    ] {
        assert!(
            stdout.contains(needle),
            "Missing '{}' in report. stdout: {}",
            needle,
            stdout
        );
    }
}
