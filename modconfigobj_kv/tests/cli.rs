use std::io::Write;
use std::process::{Command, Output};
use tempfile::{Builder, NamedTempFile, TempDir};

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(".ini").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_modconfigobj-kv"))
        .args(args)
        .env_remove("MODCFG_LOGGING_USE_STRUCTURED")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn prints_dotted_key_value_lines() {
    let file = config_file("[db]\nhost = localhost\n[[pool]]\nsize=4\n# done\n");
    let output = run(&[file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "db.host=localhost\ndb.pool.size=4\n");
}

#[test]
fn bad_token_exits_with_status_two() {
    let file = config_file("[a]\nk=v\n=broken\n");
    let output = run(&[file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    // Lines before the bad token are still printed
    assert_eq!(stdout(&output), "a.k=v\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("bad token at 8").count(), 1);
}

#[test]
fn missing_file_exits_with_status_one() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.ini");
    let output = run(&[missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(stderr.matches("File not found").count(), 1);
}

#[cfg(unix)]
#[test]
fn opens_non_utf8_file_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join(OsStr::from_bytes(b"app-\xfe.ini"));
    std::fs::write(&path, "[s]\nk = v\n").unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_modconfigobj-kv"))
        .arg(&path)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "s.k=v\n");
}

#[test]
fn missing_argument_exits_with_status_one() {
    let output = run(&[]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn token_dump_mode() {
    let file = config_file("# c\nk = v\n");
    let output = run(&["--tokens", file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        stdout(&output),
        "token Comment at 0: \"# c\"\n\
         token Key at 4: \"k \"\n\
         token Value at 8: \"v\"\n\
         token EOF at 10: \"\"\n"
    );
}

#[test]
fn json_dump_reports_error_tokens_with_status_two() {
    let file = config_file("[open\n");
    let output = run(&["--json", "--quiet", file.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    let lines: Vec<serde_json::Value> = stdout(&output)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["kind"], "Error");
    assert_eq!(lines[0]["text"], "[open\n");
    assert_eq!(lines[1]["kind"], "EndOfStream");
}
