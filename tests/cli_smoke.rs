//! CLI smoke tests for the packager binary.
//!
//! These run the real binary and check exit codes and user-facing messages.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn packager() -> Command {
    cargo_bin_cmd!("sdl_runtime_packager")
}

// =============================================================================
// Help & Arguments
// =============================================================================

#[test]
fn help_lists_subcommands() {
    packager()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("compile"))
        .stdout(predicate::str::contains("publish"));
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    packager().assert().failure();
}

#[test]
fn zero_timeout_is_rejected() {
    let dir = TempDir::new().unwrap();
    packager()
        .current_dir(dir.path())
        .args(["--timeout", "0", "compile"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout"));
}

// =============================================================================
// Configuration errors
// =============================================================================

#[test]
fn publish_names_missing_feed_fields() {
    let dir = TempDir::new().unwrap();
    packager()
        .current_dir(dir.path())
        .env_remove("SMOKE_FEED_URL")
        .env_remove("SMOKE_FEED_API_KEY")
        .args(["publish", "smoke"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("url, apiKey"));

    // Nothing was consolidated before the feed check failed.
    assert!(!dir.path().join("artifacts").exists());
}

#[test]
fn publish_reads_feed_url_from_settings_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("packaging.json"),
        r#"{ "feeds": { "smoke": { "url": "http://127.0.0.1:9/" } } }"#,
    )
    .unwrap();

    packager()
        .current_dir(dir.path())
        .env_remove("SMOKE_FEED_API_KEY")
        .args(["--config", "packaging.json", "publish", "smoke"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("apiKey"))
        .stderr(predicate::str::contains("url,").not());
}

#[test]
fn publish_without_artifacts_fails() {
    let dir = TempDir::new().unwrap();
    packager()
        .current_dir(dir.path())
        .env("SMOKE_FEED_URL", "http://127.0.0.1:9/")
        .env("SMOKE_FEED_API_KEY", "secret")
        .args(["publish", "smoke"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nothing to publish"));
}

#[test]
fn missing_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    packager()
        .current_dir(dir.path())
        .args(["--config", "absent.json", "compile"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("absent.json"));
}

#[test]
fn explicit_dependency_file_must_exist() {
    let dir = TempDir::new().unwrap();
    packager()
        .current_dir(dir.path())
        .args(["--dependencies", "deps.json", "compile"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("deps.json"));
}

#[test]
fn compile_without_sources_fails() {
    let dir = TempDir::new().unwrap();
    packager()
        .current_dir(dir.path())
        .args(["compile", "--source-dir", "missing-SDL"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("source directory does not exist"));
}

// =============================================================================
// End to end with a stand-in cmake
// =============================================================================

#[cfg(target_os = "linux")]
mod fake_cmake {
    use super::*;
    use async_zip::base::read::seek::ZipFileReader;
    use futures_lite::io::AsyncReadExt as _;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tokio::io::BufReader;
    use tokio_util::compat::TokioAsyncReadCompatExt;

    /// Prints the SDL revision line on configure and drops a library into
    /// `<build>/<config>` on `--build`.
    const SCRIPT: &str = r#"#!/bin/sh
if [ "$1" = "--build" ]; then
  mkdir -p "$2/$4"
  printf 'fake sdl library' > "$2/$4/libSDL2-2.0.so"
  exit 0
fi
echo "-- Configuring SDL"
echo "-- Revision: SDL-release-2.28.0-0-gdeadbeef"
echo "-- Revision: SDL-release-9.9.9-0-gdeadbeef"
exit ${FAKE_CMAKE_EXIT:-0}
"#;

    fn install(bin: &Path) -> String {
        std::fs::create_dir_all(bin).unwrap();
        let cmake = bin.join("cmake");
        std::fs::write(&cmake, SCRIPT).unwrap();
        std::fs::set_permissions(&cmake, std::fs::Permissions::from_mode(0o755)).unwrap();

        let path = std::env::var("PATH").unwrap_or_default();
        format!("{}:{path}", bin.display())
    }

    /// Contents of the named entry in a zip.
    async fn read_entry(archive: &Path, name: &str) -> String {
        let file = tokio::fs::File::open(archive).await.unwrap();
        let mut zip = ZipFileReader::new(BufReader::new(file).compat())
            .await
            .unwrap();
        let index = zip
            .file()
            .entries()
            .iter()
            .position(|e| e.filename().as_str().unwrap() == name)
            .unwrap();
        let mut text = String::new();
        zip.reader_without_entry(index)
            .await
            .unwrap()
            .read_to_string(&mut text)
            .await
            .unwrap();
        text
    }

    #[tokio::test]
    async fn compile_packages_the_built_library() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("SDL")).unwrap();
        let path = install(&dir.path().join("bin"));

        packager()
            .current_dir(dir.path())
            .env("PATH", path)
            .arg("compile")
            .assert()
            .success()
            .stdout(predicate::str::contains("> cmake -S \"SDL\" -B \"build\""))
            .stdout(predicate::str::contains("Revision: SDL-release-2.28.0"));

        let artifacts = std::fs::read_dir(dir.path().join("artifacts"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        assert_eq!(artifacts.len(), 1);
        assert!(artifacts[0].starts_with("artifact-linux-"));
        assert!(artifacts[0].ends_with(".zip"));

        // The later conflicting revision line is ignored.
        let marker = read_entry(&dir.path().join("artifacts").join(&artifacts[0]), "version.txt").await;
        assert_eq!(marker, "2.28.0");
    }

    #[test]
    fn failed_configure_exits_non_zero_without_artifact() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("SDL")).unwrap();
        let path = install(&dir.path().join("bin"));

        packager()
            .current_dir(dir.path())
            .env("PATH", path)
            .env("FAKE_CMAKE_EXIT", "2")
            .arg("compile")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("configure step failed with exit code 2"));

        assert!(!dir.path().join("artifacts").exists());
    }
}
