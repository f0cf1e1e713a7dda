//! Merges every per-platform artifact into one output tree.

use super::COPY_BUFFER_SIZE;
use crate::pipeline::{BuildVersion, Context, Error, ErrorExt, Result};
use async_zip::base::read::seek::ZipFileReader;
use futures_lite::io::AsyncReadExt as _;
use std::path::{Component, Path, PathBuf};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio_util::compat::TokioAsyncReadCompatExt;

/// File name pattern for artifact archives.
pub const ARTIFACT_PATTERN: &str = "artifact-*.zip";

/// Output of [`consolidate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Consolidation {
    pub output_dir: PathBuf,
    /// Number of archives expanded.
    pub count: usize,
}

/// Lists `artifact-*.zip` files in `artifacts_dir`, sorted by path.
pub fn discover_artifacts(artifacts_dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = artifacts_dir
        .to_str()
        .with_context(|| format!("artifacts directory is not valid UTF-8: {}", artifacts_dir.display()))?;
    let pattern = format!("{}/{ARTIFACT_PATTERN}", glob::Pattern::escape(dir));

    let mut artifacts = glob::glob(&pattern)?
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                log::warn!("skipping unreadable artifact candidate: {e}");
                None
            }
        })
        .collect::<Vec<_>>();
    artifacts.sort();
    Ok(artifacts)
}

/// Expands every artifact in `artifacts_dir` into `output_dir`.
///
/// `output_dir` is recreated empty, then archives are expanded in sorted
/// order. Entries with the same relative path overwrite each other (last
/// writer wins), so each platform must contribute disjoint runtime paths.
/// The shared version marker ends up holding the last archive's version.
///
/// # Errors
///
/// - [`Error::NoArtifacts`] before `output_dir` is touched when nothing
///   matches
/// - [`Error::UnsafeOutputDirectory`] before anything is deleted when
///   `output_dir` is, or contains, `artifacts_dir` or the working directory
/// - [`Error::UnsafeArchiveEntry`] for entries escaping `output_dir`
pub async fn consolidate(artifacts_dir: &Path, output_dir: &Path) -> Result<Consolidation> {
    let artifacts = discover_artifacts(artifacts_dir)?;
    if artifacts.is_empty() {
        return Err(Error::NoArtifacts {
            dir: artifacts_dir.to_path_buf(),
            pattern: ARTIFACT_PATTERN.to_string(),
        });
    }

    ensure_clearable(output_dir, artifacts_dir).await?;
    match tokio::fs::remove_dir_all(output_dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e).fs_context("clearing consolidation directory", output_dir),
    }
    tokio::fs::create_dir_all(output_dir)
        .await
        .fs_context("creating consolidation directory", output_dir)?;

    for archive in &artifacts {
        log::info!("expanding {}", archive.display());
        expand_archive(archive, output_dir).await?;
    }

    Ok(Consolidation {
        output_dir: output_dir.to_path_buf(),
        count: artifacts.len(),
    })
}

/// Refuses an `output_dir` whose removal would take `artifacts_dir` or the
/// working directory with it.
async fn ensure_clearable(output_dir: &Path, artifacts_dir: &Path) -> Result<()> {
    let output = match tokio::fs::canonicalize(output_dir).await {
        Ok(path) => path,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).fs_context("resolving consolidation directory", output_dir),
    };
    let artifacts = tokio::fs::canonicalize(artifacts_dir)
        .await
        .fs_context("resolving artifacts directory", artifacts_dir)?;
    let working = std::env::current_dir()
        .and_then(std::fs::canonicalize)
        .fs_context("resolving working directory", ".")?;

    let reason = if artifacts.starts_with(&output) {
        format!("it contains the artifacts directory {}", artifacts.display())
    } else if working.starts_with(&output) {
        format!("it contains the working directory {}", working.display())
    } else {
        return Ok(());
    };
    Err(Error::UnsafeOutputDirectory {
        output: output_dir.to_path_buf(),
        reason,
    })
}

/// Reads and parses the version marker at the root of the consolidated tree.
pub async fn read_version_marker(output_dir: &Path, version_file: &str) -> Result<BuildVersion> {
    let path = output_dir.join(version_file);
    let text = tokio::fs::read_to_string(&path)
        .await
        .fs_context("reading version marker", &path)?;
    text.trim().parse()
}

async fn expand_archive(archive: &Path, output_dir: &Path) -> Result<()> {
    let file = tokio::fs::File::open(archive)
        .await
        .fs_context("opening artifact", archive)?;
    let mut zip = ZipFileReader::new(BufReader::new(file).compat()).await?;

    let names = zip
        .file()
        .entries()
        .iter()
        .map(|entry| entry.filename().as_str().map(str::to_string))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
    for (index, name) in names.iter().enumerate() {
        let relative = safe_relative_path(name).ok_or_else(|| Error::UnsafeArchiveEntry {
            archive: archive.to_path_buf(),
            entry: name.clone(),
        })?;
        let target = output_dir.join(&relative);

        if name.ends_with('/') {
            tokio::fs::create_dir_all(&target)
                .await
                .fs_context("creating directory from archive", &target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating directory from archive", parent)?;
        }

        let mut reader = zip.reader_without_entry(index).await?;
        let mut output = tokio::fs::File::create(&target)
            .await
            .fs_context("creating extracted file", &target)?;
        loop {
            let n = reader
                .read(&mut buffer)
                .await
                .fs_context("reading archive entry", archive)?;
            if n == 0 {
                break;
            }
            output
                .write_all(&buffer[..n])
                .await
                .fs_context("writing extracted file", &target)?;
        }
        output
            .flush()
            .await
            .fs_context("flushing extracted file", &target)?;
        log::debug!("extracted {name}");
    }

    Ok(())
}

/// Relative path for an entry name, or `None` if it is absolute or climbs
/// out with `..`.
fn safe_relative_path(name: &str) -> Option<PathBuf> {
    let path = Path::new(name.trim_end_matches('/'));
    let mut relative = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    (!relative.as_os_str().is_empty()).then_some(relative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_paths_are_kept() {
        assert_eq!(
            safe_relative_path("runtimes/linux-x64/libSDL2.so"),
            Some(PathBuf::from("runtimes/linux-x64/libSDL2.so"))
        );
        assert_eq!(safe_relative_path("./version.txt"), Some(PathBuf::from("version.txt")));
        assert_eq!(safe_relative_path("runtimes/"), Some(PathBuf::from("runtimes")));
    }

    #[test]
    fn escaping_paths_are_rejected() {
        assert_eq!(safe_relative_path("../evil"), None);
        assert_eq!(safe_relative_path("runtimes/../../evil"), None);
        assert_eq!(safe_relative_path("/etc/passwd"), None);
        assert_eq!(safe_relative_path(""), None);
    }
}
