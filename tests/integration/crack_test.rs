use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;
use zip::unstable::write::FileOptionsExt;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn get_binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_zipsweep"))
}

fn write_archive(dir: &Path, password: &str) -> PathBuf {
    let path = dir.join("emergency_storage_key.zip");
    let mut zip = ZipWriter::new(File::create(&path).unwrap());
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .with_deprecated_encryption(password.as_bytes());
    zip.start_file("password.txt", options).unwrap();
    zip.write_all(b"Mars base 7").unwrap();
    zip.finish().unwrap();
    path
}

fn run(args: &[&str], archive: &Path) -> Output {
    Command::new(get_binary_path())
        .arg(archive)
        .args(args)
        .output()
        .expect("Failed to execute zipsweep")
}

fn describe(output: &Output) -> String {
    format!(
        "status: {:?}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn test_recovers_password_and_writes_entry() {
    let dir = TempDir::new().unwrap();
    let archive = write_archive(dir.path(), "k9z");
    let out = dir.path().join("out");

    let output = run(
        &["--length", "3", "-j", "4", "--output-dir", out.to_str().unwrap()],
        &archive,
    );

    assert_eq!(output.status.code(), Some(0), "{}", describe(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("The password is: k9z"),
        "Should report the password\n{}",
        describe(&output)
    );
    assert!(stdout.contains("Found by worker"), "Should name the worker");
    assert!(
        stdout.contains("Decrypted entry written to"),
        "Should report the extracted file"
    );
    assert_eq!(fs::read(out.join("password.txt")).unwrap(), b"Mars base 7");
}

#[test]
fn test_no_extract_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    let archive = write_archive(dir.path(), "7b");
    let out = dir.path().join("out");

    let output = run(
        &["--length", "2", "--no-extract", "--output-dir", out.to_str().unwrap()],
        &archive,
    );

    assert_eq!(output.status.code(), Some(0), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("The password is: 7b"));
    assert!(!out.exists());
}

#[test]
fn test_custom_charset() {
    let dir = TempDir::new().unwrap();
    let archive = write_archive(dir.path(), "CAB");

    let output = run(&["--charset", "ABC", "--length", "3", "--no-extract"], &archive);

    assert_eq!(output.status.code(), Some(0), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("The password is: CAB"));
}

#[test]
fn test_reports_not_found() {
    let dir = TempDir::new().unwrap();
    // Uppercase letters are not in the default charset
    let archive = write_archive(dir.path(), "Qx");

    let output = run(&["--length", "2", "-j", "3", "--no-extract"], &archive);

    assert_eq!(output.status.code(), Some(1), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Password not found: all 1296 candidates tried."));
}

#[test]
fn test_missing_archive() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.zip");

    let output = run(&["--length", "3"], &missing);

    assert_eq!(output.status.code(), Some(2), "{}", describe(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error: archive"), "{}", describe(&output));
    assert!(stdout.contains("does not exist"), "{}", describe(&output));
}

#[test]
fn test_not_a_zip() {
    let dir = TempDir::new().unwrap();
    let bogus = dir.path().join("bogus.zip");
    fs::write(&bogus, "hello").unwrap();

    let output = run(&["--length", "3"], &bogus);

    assert_eq!(output.status.code(), Some(2), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("not a valid zip archive"));
}

#[test]
fn test_empty_archive() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty.zip");
    ZipWriter::new(File::create(&empty).unwrap()).finish().unwrap();

    let output = run(&["--length", "3"], &empty);

    assert_eq!(output.status.code(), Some(2), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("archive contains no entries"));
}

#[test]
fn test_invalid_charset() {
    let dir = TempDir::new().unwrap();
    let archive = write_archive(dir.path(), "ab");

    let output = run(&["--charset", "abca"], &archive);

    assert_eq!(output.status.code(), Some(3), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate symbol 'a'"));
}

#[test]
fn test_zero_length_rejected() {
    let dir = TempDir::new().unwrap();
    let archive = write_archive(dir.path(), "ab");

    let output = run(&["--length", "0"], &archive);

    assert_eq!(output.status.code(), Some(3), "{}", describe(&output));
}

#[test]
fn test_timeout_aborts_search() {
    let dir = TempDir::new().unwrap();
    let archive = write_archive(dir.path(), "zzzzzz9");

    let output = run(
        &["--length", "7", "-j", "2", "--timeout", "1", "--grace-period-ms", "500", "--no-extract"],
        &archive,
    );

    assert_eq!(output.status.code(), Some(130), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Search aborted (timed out)"));
}
