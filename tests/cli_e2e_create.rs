//! End-to-end tests for the `create` command.
//!
//! These tests invoke the actual CLI binary against local skeleton
//! repositories and a private config file, so they never touch the
//! network or the user's real configuration.

mod common;

use common::prelude::*;

fn skelly() -> Command {
    Command::cargo_bin("skelly").unwrap()
}

fn basic_fixture() -> SkeletonRepoFixture {
    let fixture = SkeletonRepoFixture::new();
    fixture
        .values("base", "language: rust\n")
        .file("base", "README.md.skel", "# {{project.name}}\nby {{project.owner}}\n")
        .file("base", "src/main.rs", "fn main() {}\n");
    fixture
}

#[test]
fn test_create_project_from_local_skeleton() {
    let fixture = basic_fixture();
    let temp = TempDir::new().unwrap();
    let config = common::write_config(temp.path(), "octocat", &[("default", &fixture.locator())]);
    let target = temp.path().join("myproject");

    skelly()
        .env("SKELLY_CONFIG", &config)
        .env("SKELLY_CACHE", temp.path().join("cache"))
        .args(["create", "myproject", "base"])
        .arg("--dir")
        .arg(&target)
        .arg("--color")
        .arg("never")
        .assert()
        .success()
        .stdout(predicate::str::contains("create README.md"))
        .stdout(predicate::str::contains("create src/main.rs"))
        .stdout(predicate::str::contains("Project myproject created in"));

    assert_eq!(
        std::fs::read_to_string(target.join("README.md")).unwrap(),
        "# myproject\nby octocat\n"
    );
    assert!(target.join("src/main.rs").exists());
}

#[test]
fn test_create_dry_run_writes_nothing() {
    let fixture = basic_fixture();
    let temp = TempDir::new().unwrap();
    let config = common::write_config(temp.path(), "octocat", &[("default", &fixture.locator())]);
    let target = temp.path().join("myproject");

    skelly()
        .env("SKELLY_CONFIG", &config)
        .env("SKELLY_CACHE", temp.path().join("cache"))
        .args(["create", "myproject", "base", "--dry-run"])
        .arg("--dir")
        .arg(&target)
        .arg("--color")
        .arg("never")
        .assert()
        .success()
        .stdout(predicate::str::contains("create README.md"))
        .stdout(predicate::str::contains("no files were written"));

    assert!(!target.exists());
}

#[test]
fn test_create_refuses_existing_directory_without_force() {
    let fixture = basic_fixture();
    let temp = TempDir::new().unwrap();
    let config = common::write_config(temp.path(), "octocat", &[("default", &fixture.locator())]);
    let target = temp.path().join("myproject");
    std::fs::create_dir_all(&target).unwrap();

    skelly()
        .env("SKELLY_CONFIG", &config)
        .env("SKELLY_CACHE", temp.path().join("cache"))
        .args(["create", "myproject", "base"])
        .arg("--dir")
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_create_skips_existing_files_and_suggests_overwrite() {
    let fixture = basic_fixture();
    let temp = TempDir::new().unwrap();
    let config = common::write_config(temp.path(), "octocat", &[("default", &fixture.locator())]);
    let target = temp.path().join("myproject");
    std::fs::create_dir_all(&target).unwrap();
    std::fs::write(target.join("README.md"), "mine\n").unwrap();

    skelly()
        .env("SKELLY_CONFIG", &config)
        .env("SKELLY_CACHE", temp.path().join("cache"))
        .args(["create", "myproject", "base", "--force"])
        .arg("--dir")
        .arg(&target)
        .arg("--color")
        .arg("never")
        .assert()
        .success()
        .stdout(predicate::str::contains("skip (exists) README.md"))
        .stdout(predicate::str::contains("use --overwrite or --overwrite-file"));

    // The existing file is untouched.
    assert_eq!(
        std::fs::read_to_string(target.join("README.md")).unwrap(),
        "mine\n"
    );
}

#[test]
fn test_create_overwrite_flag_replaces_existing_files() {
    let fixture = basic_fixture();
    let temp = TempDir::new().unwrap();
    let config = common::write_config(temp.path(), "octocat", &[("default", &fixture.locator())]);
    let target = temp.path().join("myproject");
    std::fs::create_dir_all(&target).unwrap();
    std::fs::write(target.join("README.md"), "mine\n").unwrap();

    skelly()
        .env("SKELLY_CONFIG", &config)
        .env("SKELLY_CACHE", temp.path().join("cache"))
        .args(["create", "myproject", "base", "--force", "--overwrite"])
        .arg("--dir")
        .arg(&target)
        .arg("--color")
        .arg("never")
        .assert()
        .success()
        .stdout(predicate::str::contains("overwrite README.md"));

    assert_eq!(
        std::fs::read_to_string(target.join("README.md")).unwrap(),
        "# myproject\nby octocat\n"
    );
}

#[test]
fn test_create_skip_file_flag() {
    let fixture = basic_fixture();
    let temp = TempDir::new().unwrap();
    let config = common::write_config(temp.path(), "octocat", &[("default", &fixture.locator())]);
    let target = temp.path().join("myproject");

    skelly()
        .env("SKELLY_CONFIG", &config)
        .env("SKELLY_CACHE", temp.path().join("cache"))
        .args(["create", "myproject", "base", "--skip-file", "README.md"])
        .arg("--dir")
        .arg(&target)
        .arg("--color")
        .arg("never")
        .assert()
        .success()
        .stdout(predicate::str::contains("skip README.md"));

    assert!(!target.join("README.md").exists());
    assert!(target.join("src/main.rs").exists());
}

#[test]
fn test_create_set_values_override_skeleton_values() {
    let fixture = SkeletonRepoFixture::new();
    fixture
        .values("base", "greeting: hello\n")
        .file("base", "greeting.txt.skel", "{{values.greeting}}\n");

    let temp = TempDir::new().unwrap();
    let config = common::write_config(temp.path(), "octocat", &[("default", &fixture.locator())]);
    let target = temp.path().join("myproject");

    skelly()
        .env("SKELLY_CONFIG", &config)
        .env("SKELLY_CACHE", temp.path().join("cache"))
        .args(["create", "myproject", "base", "--set", "greeting=howdy"])
        .arg("--dir")
        .arg(&target)
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(target.join("greeting.txt")).unwrap(),
        "howdy\n"
    );
}

#[test]
fn test_create_composes_skeletons_in_order() {
    let fixture = SkeletonRepoFixture::new();
    fixture
        .file("base", "README.md", "base\n")
        .file("base", "base.txt", "b\n")
        .file("addon", "README.md", "addon\n");

    let temp = TempDir::new().unwrap();
    let config = common::write_config(temp.path(), "octocat", &[("default", &fixture.locator())]);
    let target = temp.path().join("myproject");

    skelly()
        .env("SKELLY_CONFIG", &config)
        .env("SKELLY_CACHE", temp.path().join("cache"))
        .args(["create", "myproject", "base", "addon"])
        .arg("--dir")
        .arg(&target)
        .assert()
        .success();

    assert_eq!(
        std::fs::read_to_string(target.join("README.md")).unwrap(),
        "addon\n"
    );
    assert!(target.join("base.txt").exists());
}

#[test]
fn test_create_unknown_skeleton_fails() {
    let fixture = basic_fixture();
    let temp = TempDir::new().unwrap();
    let config = common::write_config(temp.path(), "octocat", &[("default", &fixture.locator())]);

    skelly()
        .env("SKELLY_CONFIG", &config)
        .env("SKELLY_CACHE", temp.path().join("cache"))
        .args(["create", "myproject", "nope"])
        .arg("--dir")
        .arg(temp.path().join("myproject"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_create_init_git_initializes_repository() {
    let fixture = basic_fixture();
    let temp = TempDir::new().unwrap();
    let config = common::write_config(temp.path(), "octocat", &[("default", &fixture.locator())]);
    let target = temp.path().join("myproject");

    skelly()
        .env("SKELLY_CONFIG", &config)
        .env("SKELLY_CACHE", temp.path().join("cache"))
        .args(["create", "myproject", "base", "--init-git"])
        .arg("--dir")
        .arg(&target)
        .assert()
        .success();

    assert!(target.join(".git").exists());
}
