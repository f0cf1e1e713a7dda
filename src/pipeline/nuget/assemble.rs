//! `.nupkg` assembly from the consolidated runtime tree.

use super::template::{CONTENT_TYPES, NUSPEC_TEMPLATE, README};
use crate::pipeline::{
    BuildVersion, Error, ErrorExt, PackageMetadata, Result, Settings, archive::writer::ArchiveWriter,
};
use handlebars::Handlebars;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// `<id>.<version>.nupkg`
pub fn package_file_name(package: &PackageMetadata, version: &BuildVersion) -> String {
    format!("{}.{version}.nupkg", package.id)
}

/// Renders the `.nuspec` manifest for `version`.
pub fn render_nuspec(package: &PackageMetadata, version: &BuildVersion) -> Result<String> {
    let handlebars = Handlebars::new();

    let mut data = BTreeMap::new();
    data.insert("id", package.id.clone());
    data.insert("version", version.to_string());
    data.insert("authors", package.authors.clone());
    data.insert("description", package.description.clone());
    data.insert("repository", package.repository.clone());

    Ok(handlebars.render_template(NUSPEC_TEMPLATE, &data)?)
}

/// Wraps `<consolidated>/runtimes` plus metadata into a `.nupkg`.
///
/// Written to `<packages_dir>/<id>.<version>.nupkg`, replacing any previous
/// file. Runtime files are added in sorted order so repeated assemblies of
/// the same tree list entries identically.
pub async fn assemble_package(
    consolidated_dir: &Path,
    version: &BuildVersion,
    settings: &Settings,
) -> Result<PathBuf> {
    let package = settings.package();
    let package_path = settings
        .packages_dir()
        .join(package_file_name(package, version));
    let runtimes_dir = consolidated_dir.join("runtimes");
    let runtime_files = collect_files(&runtimes_dir).await?;

    log::info!(
        "assembling {} with {} runtime file(s)",
        package_path.display(),
        runtime_files.len()
    );

    let mut archive = ArchiveWriter::create(&package_path).await?;
    archive
        .add_bytes(&format!("{}.nuspec", package.id), render_nuspec(package, version)?.as_bytes())
        .await?;
    archive.add_bytes("[Content_Types].xml", CONTENT_TYPES.as_bytes()).await?;
    archive.add_bytes("README.md", README.as_bytes()).await?;

    for file in &runtime_files {
        let relative = file
            .strip_prefix(consolidated_dir)
            .map_err(|e| Error::GenericError(e.to_string()))?;
        let entry_name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        archive.add_file(&entry_name, file).await?;
    }

    archive.finish().await
}

/// Regular files under `dir`, sorted. Missing `dir` yields an empty list.
async fn collect_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !tokio::fs::try_exists(dir)
        .await
        .fs_context("checking runtimes directory", dir)?
    {
        log::warn!("no runtimes directory at {}", dir.display());
        return Ok(Vec::new());
    }

    let dir = dir.to_path_buf();
    tokio::task::spawn_blocking(move || {
        let mut files = Vec::new();
        for entry in walkdir::WalkDir::new(&dir).follow_links(false) {
            let entry = entry?;
            if entry.file_type().is_file() {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok::<_, Error>(files)
    })
    .await?
}
