//! Test harness for the HUML decoder against fixture files.
//!
//! Every `test/huml/*.huml` document must decode to the JSON in the matching
//! `test/json/*.json` file and survive an encode/decode round trip. Every
//! `test/nay/*.nay` document must fail with the message in the matching
//! `.error` file.

use std::fs;
use std::path::{Path, PathBuf};

use libhuml::{decode, stringify, EncodeOptions, Value};

/// Compare two Values, treating NaN as equal to NaN
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Float(a), Value::Float(b)) if a.is_nan() && b.is_nan() => true,
        (Value::List(a), Value::List(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| values_equal(x, y))
        }
        (Value::Dict(a), Value::Dict(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|bv| values_equal(v, bv)))
        }
        _ => a == b,
    }
}

/// Root test directory.
fn test_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("test")
}

/// All files under test/<subdir>/ with the given extension, sorted.
fn fixture_files(subdir: &str, ext: &str) -> Vec<PathBuf> {
    let pattern = test_root().join(subdir).join(format!("*.{}", ext));
    let mut files: Vec<PathBuf> = glob::glob(&pattern.to_string_lossy())
        .unwrap()
        .flatten()
        .collect();
    files.sort();
    files
}

/// Read the sibling fixture `test/<subdir>/<stem>.<ext>`.
fn read_companion(path: &Path, subdir: &str, ext: &str) -> Option<String> {
    let stem = path.file_stem().unwrap().to_string_lossy();
    let companion = test_root().join(subdir).join(format!("{}.{}", stem, ext));
    fs::read_to_string(companion).ok()
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap().to_string_lossy().to_string()
}

/// Run a single .huml test file (expected to succeed).
fn run_huml_test(path: &Path) -> Result<(), String> {
    let filename = file_name(path);
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", filename, e))?;

    let value =
        decode(&content).map_err(|e| format!("{}: Unexpected parse error: {}", filename, e))?;

    let expected = read_companion(path, "json", "json")
        .ok_or_else(|| format!("{}: missing expected JSON", filename))?;
    let expected: serde_json::Value = serde_json::from_str(&expected)
        .map_err(|e| format!("{}: bad expected JSON: {}", filename, e))?;
    let actual = serde_json::to_value(&value)
        .map_err(|e| format!("{}: cannot convert to JSON: {}", filename, e))?;
    if actual != expected {
        return Err(format!(
            "{}: Output mismatch\n    expected: {}\n    actual:   {}",
            filename, expected, actual
        ));
    }

    let encoded = stringify(&value, &EncodeOptions::new());
    let redecoded = decode(&encoded)
        .map_err(|e| format!("{}: encoded output does not decode: {}\n{}", filename, e, encoded))?;
    if !values_equal(&value, &redecoded) {
        return Err(format!(
            "{}: Round trip mismatch\n    before: {:?}\n    after:  {:?}",
            filename, value, redecoded
        ));
    }
    if stringify(&redecoded, &EncodeOptions::new()) != encoded {
        return Err(format!("{}: encoding is not idempotent", filename));
    }

    println!("  {} => {}", filename, actual);
    Ok(())
}

/// Run a single .nay test file (expected to fail with specific error).
fn run_nay_test(path: &Path) -> Result<(), String> {
    let filename = file_name(path);
    let content =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", filename, e))?;

    match decode(&content) {
        Ok(value) => Err(format!(
            "{}: Expected parse error, but got success: {:?}",
            filename, value
        )),
        Err(e) => {
            let actual_error = e.to_string();
            match read_expected_error(path) {
                Some(expected) if actual_error == expected => {
                    println!("  {} => error (as expected)", filename);
                    Ok(())
                }
                Some(expected) => Err(format!(
                    "{}: Error mismatch\n    expected: {}\n    actual:   {}",
                    filename, expected, actual_error
                )),
                None => Err(format!("{}: missing .error file", filename)),
            }
        }
    }
}

fn read_expected_error(path: &Path) -> Option<String> {
    read_companion(path, "nay", "error").map(|s| s.trim().to_string())
}

fn run_all(files: &[PathBuf], run: fn(&Path) -> Result<(), String>) -> Vec<String> {
    let mut errors = Vec::new();
    for file in files {
        if let Err(e) = run(file) {
            errors.push(e);
        }
    }

    println!(
        "\nResults: {} passed, {} failed",
        files.len() - errors.len(),
        errors.len()
    );
    for error in &errors {
        println!("  - {}", error);
    }
    errors
}

#[test]
fn test_all_huml_fixtures() {
    let files = fixture_files("huml", "huml");
    assert!(!files.is_empty(), "no .huml fixtures found");

    println!("\nRunning {} .huml test files:", files.len());
    let errors = run_all(&files, run_huml_test);
    assert!(errors.is_empty(), "{} .huml tests failed", errors.len());
}

#[test]
fn test_all_nay_fixtures() {
    let files = fixture_files("nay", "nay");
    assert!(!files.is_empty(), "no .nay fixtures found");

    println!("\nRunning {} .nay test files:", files.len());
    let errors = run_all(&files, run_nay_test);
    assert!(errors.is_empty(), "{} .nay tests failed", errors.len());
}

#[test]
fn test_version_header_round_trip() {
    for file in fixture_files("huml", "huml") {
        let value = decode(&fs::read_to_string(&file).unwrap()).unwrap();
        let with_header = stringify(&value, &EncodeOptions::new().with_version(true));
        assert!(with_header.starts_with("%HUML v0.1.0\n\n"));
        let redecoded = decode(&with_header).unwrap();
        assert!(values_equal(&value, &redecoded), "{}", file_name(&file));
    }
}
