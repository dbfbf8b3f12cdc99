extern crate assert_cmd;
extern crate predicates;
extern crate tempfile;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn renders_a_small_image_to_disk() {
    let dir = tempfile::tempdir().unwrap();
    let outfile = dir.path().join("tiny.png");

    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-o", outfile.to_str().unwrap(), "-s", "32x32", "-i", "64"])
        .assert()
        .success();

    let written = std::fs::metadata(&outfile).unwrap();
    assert!(written.len() > 0);
}

#[test]
fn renders_an_off_center_zoom() {
    let dir = tempfile::tempdir().unwrap();
    let outfile = dir.path().join("zoom.png");

    Command::cargo_bin("mandel")
        .unwrap()
        .args(&[
            "-o",
            outfile.to_str().unwrap(),
            "-s",
            "24x16",
            "-u",
            "-0.75,0.25",
            "-r",
            "-0.25,-0.25",
            "-i",
            "128",
        ])
        .assert()
        .success();

    assert!(outfile.exists());
}

#[test]
fn rejects_an_unparseable_size() {
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-o", "out.png", "-s", "banana"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size"));
}

#[test]
fn rejects_a_zero_iteration_limit() {
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-o", "out.png", "-i", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Iteration count must be between"));
}

#[test]
fn rejects_a_malformed_corner() {
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-o", "out.png", "-u", "2.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse upper left corner"));
}
