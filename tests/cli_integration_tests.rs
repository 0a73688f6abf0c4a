//! Integration tests for the `csscompress` binary.

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn csscompress() -> Command {
  Command::cargo_bin("csscompress").unwrap()
}

#[test]
fn a_missing_directory_is_the_only_fatal_error() {
  csscompress()
    .arg("no/such/directory")
    .assert()
    .failure()
    .stderr(predicate::str::contains("is not a directory"));
}

#[test]
fn css_files_get_minified_siblings() {
  let dir = assert_fs::TempDir::new().unwrap();
  dir.child("style.css").write_str("div {\n  color: red;\n}\n").unwrap();

  csscompress().arg(dir.path()).assert().success();

  dir.child("style.min.css").assert("div{color:red}");
  dir.close().unwrap();
}

#[test]
fn already_minified_files_are_skipped() {
  let dir = assert_fs::TempDir::new().unwrap();
  dir.child("style.min.css").write_str("div{color:red}").unwrap();

  csscompress().arg(dir.path()).assert().success();

  dir.child("style.min.min.css").assert(predicate::path::missing());
  dir.close().unwrap();
}

#[test]
fn parse_failures_are_logged_and_do_not_abort_the_run() {
  let dir = assert_fs::TempDir::new().unwrap();
  dir.child("bad.css").write_str("div{content:\"unterminated").unwrap();
  dir.child("good.css").write_str("a { x: 1; }").unwrap();

  csscompress().env("RUST_LOG", "error").arg(dir.path()).assert().success();

  dir.child("good.min.css").assert("a{x:1}");
  dir.child("bad.min.css").assert(predicate::path::missing());
  dir.close().unwrap();
}

#[test]
fn browser_compliant_mode_recovers_instead_of_failing() {
  let dir = assert_fs::TempDir::new().unwrap();
  dir
    .child("messy.css")
    .write_str(".a { color red; margin: 0; }")
    .unwrap();

  csscompress().arg("--browser-compliant").arg(dir.path()).assert().success();

  dir.child("messy.min.css").assert(".a{margin:0}");
  dir.close().unwrap();
}

#[test]
fn subdirectories_need_the_recursive_flag() {
  let dir = assert_fs::TempDir::new().unwrap();
  dir.child("sub/nested.css").write_str("a { x: 1; }").unwrap();

  csscompress().arg(dir.path()).assert().success();
  dir.child("sub/nested.min.css").assert(predicate::path::missing());

  csscompress().arg("--recursive").arg(dir.path()).assert().success();
  dir.child("sub/nested.min.css").assert("a{x:1}");
  dir.close().unwrap();
}

#[test]
fn header_and_suffix_are_configurable() {
  let dir = assert_fs::TempDir::new().unwrap();
  dir.child("style.css").write_str("a { x: 1; }").unwrap();

  csscompress()
    .arg("--suffix")
    .arg("packed")
    .arg("--header")
    .arg("built")
    .arg(dir.path())
    .assert()
    .success();

  dir.child("style.packed.css").assert("/* built */a{x:1}");
  dir.close().unwrap();
}
