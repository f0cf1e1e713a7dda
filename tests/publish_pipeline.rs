//! Publish side of the pipeline: consolidate, assemble, push.

use async_zip::base::read::seek::ZipFileReader;
use futures_lite::io::AsyncReadExt as _;
use sdl_runtime_packager::cli::OutputManager;
use sdl_runtime_packager::pipeline::{
    BuildVersion, Error, FeedConfig, NuGetFeed, PackageFeed, Pipeline, Platform, ProcessRunner,
    Result, Settings, SettingsBuilder, archive,
    platform::{Arch, Os},
};
use std::{
    cell::RefCell,
    path::{Path, PathBuf},
};
use tempfile::TempDir;
use tokio::io::BufReader;
use tokio_util::compat::TokioAsyncReadCompatExt;

/// Records pushes instead of talking to a server.
struct RecordingFeed {
    accept: bool,
    pushed: RefCell<Vec<PathBuf>>,
}

impl RecordingFeed {
    fn new(accept: bool) -> Self {
        Self {
            accept,
            pushed: RefCell::new(Vec::new()),
        }
    }
}

impl PackageFeed for RecordingFeed {
    fn name(&self) -> &str {
        "recording"
    }

    async fn push(&self, package: &Path) -> Result<bool> {
        self.pushed.borrow_mut().push(package.to_path_buf());
        Ok(self.accept)
    }
}

fn settings(root: &Path) -> Settings {
    SettingsBuilder::new()
        .artifacts_dir(root.join("artifacts"))
        .consolidated_dir(root.join("work/consolidated"))
        .packages_dir(root.join("work/packages"))
        .build()
}

fn runner() -> ProcessRunner {
    ProcessRunner::new(
        Platform::new(Os::Linux, Arch::X64),
        OutputManager::new(false, true),
        None,
    )
}

async fn stage_artifacts(root: &Path, settings: &Settings, version: &str) {
    let version: BuildVersion = version.parse().unwrap();
    for (platform, name) in [
        (Platform::new(Os::Linux, Arch::X64), "libSDL2-2.0.so"),
        (Platform::new(Os::Windows, Arch::X64), "SDL2.dll"),
        (Platform::new(Os::MacOs, Arch::Arm64), "libSDL2-2.0.0.dylib"),
    ] {
        let library = root.join(name);
        std::fs::write(&library, format!("{platform} library bytes")).unwrap();
        archive::package_artifact(&library, &version, &platform, settings)
            .await
            .unwrap();
    }
}

/// Entry name → contents of every file in a zip.
async fn read_zip(path: &Path) -> Vec<(String, Vec<u8>)> {
    let file = tokio::fs::File::open(path).await.unwrap();
    let mut zip = ZipFileReader::new(BufReader::new(file).compat())
        .await
        .unwrap();
    let names = zip
        .file()
        .entries()
        .iter()
        .map(|e| e.filename().as_str().unwrap().to_string())
        .collect::<Vec<_>>();

    let mut entries = Vec::new();
    for (index, name) in names.into_iter().enumerate() {
        let mut reader = zip.reader_without_entry(index).await.unwrap();
        let mut data = Vec::new();
        reader.read_to_end(&mut data).await.unwrap();
        entries.push((name, data));
    }
    entries
}

#[tokio::test]
async fn publish_assembles_and_pushes_the_package() {
    let root = TempDir::new().unwrap();
    let settings = settings(root.path());
    stage_artifacts(root.path(), &settings, "2.28.0").await;

    let runner = runner();
    let feed = RecordingFeed::new(true);
    let report = Pipeline::new(&settings, &runner)
        .publish(&feed)
        .await
        .unwrap()
        .expect("package accepted");

    assert_eq!(report.archives, 3);
    assert_eq!(
        report.package_path,
        root.path().join("work/packages/SDL2.Native.2.28.0.nupkg")
    );
    assert_eq!(*feed.pushed.borrow(), vec![report.package_path.clone()]);

    let entries = read_zip(&report.package_path).await;
    let names = entries.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>();
    assert_eq!(
        names,
        vec![
            "SDL2.Native.nuspec",
            "[Content_Types].xml",
            "README.md",
            "runtimes/linux-x64/libSDL2.so",
            "runtimes/osx-arm64/libSDL2.dylib",
            "runtimes/win-x64/SDL2.dll",
        ]
    );

    let nuspec = String::from_utf8(entries[0].1.clone()).unwrap();
    assert!(nuspec.contains("<version>2.28.0</version>"));

    let (_, dll) = entries
        .iter()
        .find(|(n, _)| n == "runtimes/win-x64/SDL2.dll")
        .unwrap();
    assert_eq!(dll.as_slice(), b"win-x64 library bytes");
}

#[tokio::test]
async fn rejected_push_is_an_unsuccessful_run() {
    let root = TempDir::new().unwrap();
    let settings = settings(root.path());
    stage_artifacts(root.path(), &settings, "2.26.5").await;

    let runner = runner();
    let feed = RecordingFeed::new(false);
    let report = Pipeline::new(&settings, &runner).publish(&feed).await.unwrap();

    assert!(report.is_none());
    assert_eq!(feed.pushed.borrow().len(), 1);
}

#[tokio::test]
async fn publish_without_artifacts_never_pushes() {
    let root = TempDir::new().unwrap();
    let settings = settings(root.path());
    std::fs::create_dir_all(settings.artifacts_dir()).unwrap();

    let runner = runner();
    let feed = RecordingFeed::new(true);
    let err = Pipeline::new(&settings, &runner)
        .publish(&feed)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoArtifacts { .. }));
    assert!(feed.pushed.borrow().is_empty());
}

#[tokio::test]
async fn unreachable_feed_is_a_transport_error() {
    let root = TempDir::new().unwrap();
    let package = root.path().join("SDL2.Native.2.28.0.nupkg");
    std::fs::write(&package, b"not really a package").unwrap();

    let feed = FeedConfig {
        url: Some("http://127.0.0.1:9/api/v2/package".into()),
        api_key: Some("secret".into()),
    }
    .validate("local")
    .unwrap();

    let err = NuGetFeed::new(feed).push(&package).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
