#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the copy deployment strategy.
//!
//! These tests exercise the full pipeline — wildcard expansion, destination
//! disambiguation, directory creation, placement — against real temporary
//! source and destination trees.

mod common;

use common::{DeployFixture, assert_kind};
use mapdeploy::error::DeployError;
use mapdeploy::operations::FileKind;
use mapdeploy::strategy::{CopyPlacement, Deployer, NoMatchPolicy};

fn copy_deployer(fixture: &DeployFixture) -> Deployer {
    fixture.deployer(Box::new(CopyPlacement))
}

// ---------------------------------------------------------------------------
// Literal specifications
// ---------------------------------------------------------------------------

/// A literal file mapped to a literal, non-existing name lands under that
/// exact name, and the source file is untouched.
#[test]
fn literal_file_to_literal_name() {
    let fixture = DeployFixture::new();
    fixture.touch_source("local.xml");

    copy_deployer(&fixture).create("local.xml", "local2.xml").unwrap();

    assert_kind(&fixture.dest("local2.xml"), FileKind::File);
    assert_eq!(
        std::fs::read(fixture.dest("local2.xml")).unwrap(),
        b"local.xml",
        "copy must be byte-for-byte"
    );
    assert!(fixture.source("local.xml").exists());
}

/// A source directory mapped to a non-existing name is reproduced under
/// that name with its contents.
#[test]
fn directory_to_new_name() {
    let fixture = DeployFixture::new();
    fixture.mkdir_source("hello");
    fixture.touch_source("hello/local.xml");

    copy_deployer(&fixture).create("hello", "hello2").unwrap();

    assert_kind(&fixture.dest("hello2"), FileKind::Directory);
    assert_kind(&fixture.dest("hello2/local.xml"), FileKind::File);
}

/// A file mapped into a destination that already exists as a directory is
/// placed inside it under its own basename; the directory survives.
#[test]
fn file_into_existing_directory() {
    let fixture = DeployFixture::new();
    fixture.touch_source("sourcedir/test.xml");
    fixture.mkdir_dest("targetdir");

    copy_deployer(&fixture)
        .create("sourcedir/test.xml", "targetdir")
        .unwrap();

    assert_kind(&fixture.dest("targetdir"), FileKind::Directory);
    assert_kind(&fixture.dest("targetdir/test.xml"), FileKind::File);
}

/// With no trailing separator and no existing directory, the destination
/// specification is the literal target name.
#[test]
fn file_to_missing_destination_is_literal() {
    let fixture = DeployFixture::new();
    fixture.touch_source("sourcedir/test.xml");

    copy_deployer(&fixture)
        .create("sourcedir/test.xml", "targetdir")
        .unwrap();

    assert_kind(&fixture.dest_dir, FileKind::Directory);
    assert_kind(&fixture.dest("targetdir"), FileKind::File);
}

/// A literal destination nested under directories that do not exist yet
/// gets its parents created.
#[test]
fn literal_destination_creates_missing_parents() {
    let fixture = DeployFixture::new();
    fixture.touch_source("local.xml");

    copy_deployer(&fixture)
        .create("local.xml", "app/etc/local.xml")
        .unwrap();

    assert_kind(&fixture.dest("app/etc"), FileKind::Directory);
    assert_kind(&fixture.dest("app/etc/local.xml"), FileKind::File);
}

// ---------------------------------------------------------------------------
// Trailing separator
// ---------------------------------------------------------------------------

/// A trailing separator forces directory semantics when the directory
/// already exists.
#[test]
fn trailing_separator_into_existing_directory() {
    let fixture = DeployFixture::new();
    fixture.touch_source("sourcedir/test.xml");
    fixture.mkdir_dest("targetdir");

    copy_deployer(&fixture)
        .create("sourcedir/test.xml", "targetdir/")
        .unwrap();

    assert_kind(&fixture.dest("targetdir/test.xml"), FileKind::File);
}

/// A trailing separator forces directory semantics even when the directory
/// does not exist yet: the engine creates it rather than a file of that
/// name.
#[test]
fn trailing_separator_creates_missing_directory() {
    let fixture = DeployFixture::new();
    fixture.touch_source("sourcedir/test.xml");

    copy_deployer(&fixture)
        .create("sourcedir/test.xml", "targetdir/")
        .unwrap();

    assert_kind(&fixture.dest("targetdir"), FileKind::Directory);
    assert_kind(&fixture.dest("targetdir/test.xml"), FileKind::File);
}

// ---------------------------------------------------------------------------
// Wildcard expansion
// ---------------------------------------------------------------------------

/// A multi-match wildcard forces the destination into directory semantics
/// even though the directory does not exist yet.
#[test]
fn wildcard_multi_match_creates_destination_directory() {
    let fixture = DeployFixture::new();
    fixture.touch_source("sourcedir/test1.xml");
    fixture.touch_source("sourcedir/test2.xml");

    copy_deployer(&fixture).create("sourcedir/*", "targetdir").unwrap();

    assert_kind(&fixture.dest("targetdir"), FileKind::Directory);
    assert_kind(&fixture.dest("targetdir/test1.xml"), FileKind::File);
    assert_kind(&fixture.dest("targetdir/test2.xml"), FileKind::File);
}

/// A multi-match wildcard into an existing directory places every match
/// inside it.
#[test]
fn wildcard_multi_match_into_existing_directory() {
    let fixture = DeployFixture::new();
    fixture.touch_source("sourcedir/test1.xml");
    fixture.touch_source("sourcedir/test2.xml");
    fixture.mkdir_dest("targetdir");

    copy_deployer(&fixture).create("sourcedir/*", "targetdir").unwrap();

    assert_kind(&fixture.dest("targetdir"), FileKind::Directory);
    assert_kind(&fixture.dest("targetdir/test1.xml"), FileKind::File);
    assert_kind(&fixture.dest("targetdir/test2.xml"), FileKind::File);
}

/// Directory entries matched by a wildcard are reproduced as full subtrees.
#[test]
fn wildcard_match_includes_directories() {
    let fixture = DeployFixture::new();
    fixture.touch_source("sourcedir/test.xml");
    fixture.mkdir_source("sourcedir/sub");
    fixture.touch_source("sourcedir/sub/inner.xml");

    copy_deployer(&fixture).create("sourcedir/*", "targetdir").unwrap();

    assert_kind(&fixture.dest("targetdir/test.xml"), FileKind::File);
    assert_kind(&fixture.dest("targetdir/sub"), FileKind::Directory);
    assert_kind(&fixture.dest("targetdir/sub/inner.xml"), FileKind::File);
}

/// A wildcard that matches nothing is a silent no-op under the default
/// policy: no destination work happens at all.
#[test]
fn zero_match_wildcard_is_a_noop() {
    let fixture = DeployFixture::new();
    fixture.mkdir_source("sourcedir");

    copy_deployer(&fixture).create("sourcedir/*", "targetdir").unwrap();

    assert!(!fixture.dest("targetdir").exists());
}

/// The strict policy turns a zero-match wildcard into a failure.
#[test]
fn zero_match_wildcard_errors_under_strict_policy() {
    let fixture = DeployFixture::new();
    fixture.mkdir_source("sourcedir");

    let deployer = copy_deployer(&fixture).with_no_match_policy(NoMatchPolicy::Error);
    let err = deployer.create("sourcedir/*", "targetdir").unwrap_err();

    assert!(matches!(err, DeployError::SourceNotFound { .. }));
}

// ---------------------------------------------------------------------------
// Failure propagation
// ---------------------------------------------------------------------------

/// A literal source that does not exist surfaces as `SourceNotFound`.
#[test]
fn missing_literal_source_fails() {
    let fixture = DeployFixture::new();

    let err = copy_deployer(&fixture)
        .create("nonexistent.xml", "dest.xml")
        .unwrap_err();

    assert!(matches!(err, DeployError::SourceNotFound { .. }));
    assert!(err.to_string().contains("nonexistent.xml"));
}

/// A failure on one wildcard match aborts the remaining matches but leaves
/// matches placed before it in place — there is no rollback.
#[test]
fn wildcard_failure_keeps_earlier_placements() {
    let fixture = DeployFixture::new();
    fixture.touch_source("sourcedir/test1.xml");
    fixture.touch_source("sourcedir/test2.xml");
    // test2.xml's slot is occupied by a directory, which a file copy
    // cannot replace.  Matches are enumerated in alphabetical order, so
    // test1.xml is placed first.
    fixture.mkdir_dest("targetdir/test2.xml");

    let err = copy_deployer(&fixture)
        .create("sourcedir/*", "targetdir")
        .unwrap_err();

    assert!(matches!(err, DeployError::PlacementFailed { .. }));
    assert_kind(&fixture.dest("targetdir/test1.xml"), FileKind::File);
}

/// A destination whose required directory collides with an existing file
/// surfaces as `DirectoryCreationFailed`.
#[test]
fn directory_collision_fails_directory_creation() {
    let fixture = DeployFixture::new();
    fixture.touch_source("sourcedir/test.xml");
    std::fs::write(fixture.dest("targetdir"), b"occupied").unwrap();

    let err = copy_deployer(&fixture)
        .create("sourcedir/test.xml", "targetdir/")
        .unwrap_err();

    assert!(matches!(err, DeployError::DirectoryCreationFailed { .. }));
}

// ---------------------------------------------------------------------------
// Batch deployment
// ---------------------------------------------------------------------------

/// `deploy` processes every stored mapping in insertion order.
#[test]
fn deploy_processes_all_mappings() {
    let fixture = DeployFixture::new();
    fixture.touch_source("local.xml");
    fixture.mkdir_source("hello");
    fixture.touch_source("hello/inner.xml");

    let mut deployer = copy_deployer(&fixture);
    deployer.add_mapping("local.xml", "etc/local.xml");
    deployer.add_mapping("hello", "hello2");
    deployer.deploy().unwrap();

    assert_kind(&fixture.dest("etc/local.xml"), FileKind::File);
    assert_kind(&fixture.dest("hello2/inner.xml"), FileKind::File);
}

/// When two mappings target the same destination, the later mapping wins.
#[test]
fn later_mapping_wins_on_conflict() {
    let fixture = DeployFixture::new();
    fixture.touch_source("first/config.xml");
    fixture.touch_source("second/config.xml");

    let mut deployer = copy_deployer(&fixture);
    deployer.add_mapping("first/config.xml", "config.xml");
    deployer.add_mapping("second/config.xml", "config.xml");
    deployer.deploy().unwrap();

    assert_eq!(
        std::fs::read(fixture.dest("config.xml")).unwrap(),
        b"second/config.xml"
    );
}

/// `deploy` halts on the first failing mapping; earlier mappings stay
/// deployed.
#[test]
fn deploy_halts_on_first_failure() {
    let fixture = DeployFixture::new();
    fixture.touch_source("local.xml");

    let mut deployer = copy_deployer(&fixture);
    deployer.add_mapping("local.xml", "local.xml");
    deployer.add_mapping("missing.xml", "missing.xml");
    deployer.add_mapping("local.xml", "never-reached.xml");

    let err = deployer.deploy().unwrap_err();

    assert!(matches!(err, DeployError::SourceNotFound { .. }));
    assert_kind(&fixture.dest("local.xml"), FileKind::File);
    assert!(!fixture.dest("never-reached.xml").exists());
}
