use std::{fs, path::Path, process::Command};

use assert_cmd::prelude::*;
use indoc::indoc;

const LOOKUP: &str = indoc! {"
    dstport,protocol,tag
    80,tcp,web
    68,udp,sv_P2
"};

const FLOW_LOG: &str = indoc! {"
    2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 80 49153 6 25 20000 1620140761 1620140821 ACCEPT OK
    2 123456789012 eni-4d3c2b1a 192.168.1.100 203.0.113.101 68 49154 17 15 12000 1620140761 1620140821 ACCEPT OK
    2 123456789012 eni-5e6f7g8h 192.168.1.101 198.51.100.3 25 49155 6 10 8000 1620140761 1620140821 REJECT OK
"};

fn flowtag() -> Command {
    Command::cargo_bin("flowtag").unwrap()
}

fn write(path: &Path, contents: &str) {
    fs::write(path, contents).unwrap();
}

#[test]
fn tags_a_flow_log_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let lookup = dir.path().join("lookup.csv");
    let logs = dir.path().join("logs.txt");
    let output = dir.path().join("output.csv");
    write(&lookup, LOOKUP);
    write(&logs, FLOW_LOG);

    flowtag()
        .arg("--lookup")
        .arg(&lookup)
        .arg("--flow-log")
        .arg(&logs)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    similar_asserts::assert_eq!(
        indoc! {"
            Tag,Count
            web,1
            sv_P2,1
            Untagged,1

            Port,Protocol,Count
            80,tcp,1
            68,udp,1
            25,tcp,1
        "},
        fs::read_to_string(&output).unwrap()
    );
}

#[test]
fn untagged_is_zero_when_every_record_matches() {
    let dir = tempfile::tempdir().unwrap();
    let lookup = dir.path().join("lookup.csv");
    let logs = dir.path().join("logs.txt");
    let output = dir.path().join("output.csv");
    write(&lookup, "dstport,protocol,tag\n80,tcp,web\n");
    write(
        &logs,
        "2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 80 49153 6 25 20000 1620140761 1620140821 ACCEPT OK\n",
    );

    flowtag()
        .current_dir(dir.path())
        .assert()
        .success();

    similar_asserts::assert_eq!(
        indoc! {"
            Tag,Count
            web,1
            Untagged,0

            Port,Protocol,Count
            80,tcp,1
        "},
        fs::read_to_string(&output).unwrap()
    );
}

#[test]
fn malformed_input_is_skipped_not_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output.csv");
    write(
        &dir.path().join("lookup.csv"),
        "dstport,protocol,tag\n80,tcp\n80,tcp,web\n",
    );
    write(
        &dir.path().join("logs.txt"),
        "2 123456789012 eni-0a1b2c3d 10.0.1.201\n2 123456789012 eni-0a1b2c3d 10.0.1.201 198.51.100.2 80 49153 6 25 20000 1620140761 1620140821 ACCEPT OK\n",
    );

    flowtag().current_dir(dir.path()).assert().success();

    similar_asserts::assert_eq!(
        indoc! {"
            Tag,Count
            web,1
            Untagged,0

            Port,Protocol,Count
            80,tcp,1
        "},
        fs::read_to_string(&output).unwrap()
    );
}

#[test]
fn a_missing_lookup_table_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("logs.txt"), FLOW_LOG);

    flowtag()
        .current_dir(dir.path())
        .assert()
        .failure()
        .code(exitcode::NOINPUT);

    assert!(!dir.path().join("output.csv").exists());
}

#[test]
fn a_lookup_table_with_no_usable_rows_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("lookup.csv"), "dstport,protocol,tag\n");
    write(&dir.path().join("logs.txt"), FLOW_LOG);

    flowtag()
        .current_dir(dir.path())
        .assert()
        .failure()
        .code(exitcode::DATAERR);

    assert!(!dir.path().join("output.csv").exists());
}

#[test]
fn a_missing_flow_log_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    write(&dir.path().join("lookup.csv"), LOOKUP);

    flowtag()
        .current_dir(dir.path())
        .assert()
        .failure()
        .code(exitcode::NOINPUT);

    assert!(!dir.path().join("output.csv").exists());
}
