// file: tests/cli_test.rs
// version: 1.0.0
// guid: 4b9e0d73-a186-4f25-bc3d-08e5f7a2c614

//! End-to-end tests of the command line interface

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("maven-steps").unwrap();
    cmd.current_dir(dir.path()).arg("--no-telemetry");
    for var in [
        "PIPER_url",
        "PIPER_repository",
        "PIPER_version",
        "PIPER_m2Path",
        "PIPER_pomPath",
        "PIPER_globalSettingsFile",
        "PIPER_projectSettingsFile",
        "PIPER_user",
        "PIPER_password",
        "PIPER_additionalClassifiers",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_commands() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("execute"))
        .stdout(predicate::str::contains("install-artifacts"))
        .stdout(predicate::str::contains("nexus-upload"));
}

#[test]
fn test_nexus_upload_requires_url_and_repository() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .arg("nexus-upload")
        .assert()
        .failure()
        .stderr(predicate::str::contains("mandatory"))
        .stderr(predicate::str::contains("url, repository"));
}

#[test]
fn test_nexus_upload_reads_pipeline_config() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join(".pipeline")).unwrap();
    std::fs::write(
        dir.path().join(".pipeline/config.yml"),
        "steps:\n  nexusUpload:\n    url: nexus.example.com\n    repository: releases\n    version: nexus4\n",
    )
    .unwrap();

    cmd(&dir)
        .arg("nexus-upload")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported Nexus version 'nexus4'"));
}

#[test]
fn test_flags_override_pipeline_config() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("custom.yml"),
        "steps:\n  nexusUpload:\n    url: nexus.example.com\n    repository: releases\n    version: nexus4\n",
    )
    .unwrap();

    // version fixed by the flag, so the next failure is the missing pom
    cmd(&dir)
        .args(["--config", "custom.yml", "nexus-upload", "--version", "nexus3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("pom.xml not found"));
}

#[test]
fn test_test_module_excludes() {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("unit-tests")).unwrap();
    std::fs::write(dir.path().join("unit-tests/pom.xml"), "<project/>").unwrap();

    cmd(&dir)
        .arg("test-module-excludes")
        .assert()
        .success()
        .stdout("-pl !unit-tests\n");
}

#[test]
fn test_dry_run_execute_logs_command_line() {
    let dir = TempDir::new().unwrap();
    cmd(&dir)
        .args([
            "--dry-run",
            "execute",
            "--goals",
            "clean,install",
            "--define",
            "-DskipTests",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "mvn -DskipTests -Dorg.slf4j.simpleLogger.log.org.apache.maven.cli.transfer.Slf4jMavenTransferListener=warn --batch-mode clean install",
        ));
}

#[test]
fn test_dry_run_install_artifacts() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();

    cmd(&dir)
        .args(["--dry-run", "install-artifacts"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Installing maven artifacts from module: pom.xml"))
        .stderr(predicate::str::contains("install:install-file"));
}

#[test]
fn test_dry_run_nexus_upload_logs_deploy() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pom.xml"), "<project/>").unwrap();

    cmd(&dir)
        .args([
            "--dry-run",
            "nexus-upload",
            "--url",
            "nexus.local",
            "--repository",
            "releases",
            "--user",
            "u",
            "--password",
            "p",
        ])
        .assert()
        .success()
        .stderr(predicate::str::contains("deploy:deploy-file"))
        .stderr(predicate::str::contains(
            "-Durl=http://nexus.local/repository/releases/",
        ));

    assert!(!dir.path().join(".pipeline/nexusUploadSettings.xml").exists());
}
