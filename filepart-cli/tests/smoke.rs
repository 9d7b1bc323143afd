use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::process::Command;

fn write_random(path: &std::path::Path, bytes: usize, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let data: Vec<u8> = (0..bytes).map(|_| rng.gen()).collect();
    std::fs::write(path, data).unwrap();
}

#[test]
fn split_verify_reassemble_happy_path() {
    let td = assert_fs::TempDir::new().unwrap();
    let input = td.child("demo.bin");
    write_random(input.path(), 200 * 1024, 1);

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["split", "demo.bin", "--chunk-size", "64K", "--output", "parts"])
        .assert()
        .success()
        .stdout(predicate::str::contains("demo.bin_manifest.json"));

    // 200 KiB in 64 KiB chunks: 4 chunk records + 1 manifest
    let entries = std::fs::read_dir(td.child("parts").path()).unwrap().count();
    assert_eq!(entries, 5);

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["verify", "parts/demo.bin_manifest.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK"));

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["reassemble", "parts/demo.bin_manifest.json", "--output", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("reassembled_demo.bin"));

    let original = std::fs::read(input.path()).unwrap();
    let rebuilt = std::fs::read(td.child("out").child("reassembled_demo.bin").path()).unwrap();
    assert_eq!(original, rebuilt);
}

#[test]
fn corrupted_chunk_record_is_refused() {
    let td = assert_fs::TempDir::new().unwrap();
    write_random(td.child("demo.bin").path(), 200 * 1024, 2);

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["split", "demo.bin", "--chunk-size", "64K", "--output", "parts"])
        .assert()
        .success();

    // Flip the first payload nibble of chunk 2; the record stays valid
    // JSON and valid hex.
    let chunk_path = td.child("parts").child("demo.bin_02_04.json");
    let mut record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(chunk_path.path()).unwrap()).unwrap();
    let data = record["chunk_data"].as_str().unwrap().to_string();
    let flipped = if data.starts_with('0') {
        format!("1{}", &data[1..])
    } else {
        format!("0{}", &data[1..])
    };
    record["chunk_data"] = serde_json::Value::String(flipped);
    std::fs::write(chunk_path.path(), serde_json::to_string_pretty(&record).unwrap()).unwrap();

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["verify", "parts/demo.bin_manifest.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BAD"));

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["reassemble", "parts/demo.bin_manifest.json", "--output", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("checksum mismatch in chunk 2"));

    assert!(!td.child("out").child("reassembled_demo.bin").path().exists());
}

#[test]
fn missing_chunk_record_is_refused() {
    let td = assert_fs::TempDir::new().unwrap();
    write_random(td.child("demo.bin").path(), 64 * 1024, 3);

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["split", "demo.bin", "--chunk-size", "16K", "--output", "parts"])
        .assert()
        .success();

    std::fs::remove_file(td.child("parts").child("demo.bin_03_04.json").path()).unwrap();

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["reassemble", "parts/demo.bin_manifest.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot load chunk 3"));
}

#[test]
fn empty_file_round_trips() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("empty.bin").touch().unwrap();

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["split", "empty.bin", "--output", "parts"])
        .assert()
        .success();

    // One zero-length chunk plus the manifest
    let entries = std::fs::read_dir(td.child("parts").path()).unwrap().count();
    assert_eq!(entries, 2);

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["reassemble", "parts/empty.bin_manifest.json", "--output", "out"])
        .assert()
        .success();

    let rebuilt = std::fs::read(td.child("out").child("reassembled_empty.bin").path()).unwrap();
    assert!(rebuilt.is_empty());
}

#[test]
fn zero_chunk_size_is_rejected() {
    let td = assert_fs::TempDir::new().unwrap();
    write_random(td.child("demo.bin").path(), 1024, 4);

    Command::cargo_bin("filepart")
        .unwrap()
        .current_dir(td.path())
        .args(["split", "demo.bin", "--chunk-size", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1 byte"));
}
