//! Writes a platform's artifact archive.

use super::{calculate_sha256, writer::ArchiveWriter};
use crate::pipeline::{BuildVersion, Error, ErrorExt, Platform, Result, Settings};
use std::path::{Path, PathBuf};

/// A finished artifact archive.
#[derive(Clone, Debug)]
pub struct PackagedArtifact {
    pub path: PathBuf,
    pub runtime_identifier: String,
    /// Archive size in bytes.
    pub size: u64,
    /// Hex SHA-256 of the archive.
    pub checksum: String,
}

/// Archive path of the packaged library: `runtimes/{rid}/{name}`.
pub fn library_entry_name(platform: &Platform, library_name: &str) -> String {
    format!(
        "runtimes/{}/{}",
        platform.runtime_identifier(),
        platform.packaged_library_name(library_name)
    )
}

/// Packages `library_path` and `version` into `artifact-{rid}.zip`.
///
/// A previous archive at the same path is deleted first, so re-running for
/// the same runtime replaces rather than appends. The library is renamed to
/// its packaged name (any ABI suffix from the build tree is dropped).
///
/// # Errors
///
/// [`Error::LibraryNotFound`] if `library_path` is not a file.
pub async fn package_artifact(
    library_path: &Path,
    version: &BuildVersion,
    platform: &Platform,
    settings: &Settings,
) -> Result<PackagedArtifact> {
    let is_file = tokio::fs::metadata(library_path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(Error::LibraryNotFound(library_path.to_path_buf()));
    }

    let runtime_identifier = platform.runtime_identifier();
    let archive_path = settings.artifact_path(&runtime_identifier);
    let entry_name = library_entry_name(platform, settings.library_name());
    log::info!(
        "packaging {} as {entry_name} into {}",
        library_path.display(),
        archive_path.display()
    );

    let mut archive = ArchiveWriter::create(&archive_path).await?;
    archive
        .add_bytes(settings.version_file(), version.to_string().as_bytes())
        .await?;
    let copied = archive.add_file(&entry_name, library_path).await?;
    let archive_path = archive.finish().await?;
    log::debug!("copied {copied} bytes of {}", library_path.display());

    let size = tokio::fs::metadata(&archive_path)
        .await
        .fs_context("reading artifact metadata", &archive_path)?
        .len();
    let checksum = calculate_sha256(&archive_path).await?;
    log::info!("artifact {} ({size} bytes, sha256 {checksum})", archive_path.display());

    Ok(PackagedArtifact {
        path: archive_path,
        runtime_identifier,
        size,
        checksum,
    })
}
