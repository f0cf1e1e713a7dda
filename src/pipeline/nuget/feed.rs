//! Package feed push.

use crate::pipeline::{ErrorExt, Result, ValidatedFeed};
use reqwest::{
    Body, Client,
    multipart::{Form, Part},
};
use std::path::Path;
use tokio_util::io::ReaderStream;

/// Header carrying the feed API key.
const API_KEY_HEADER: &str = "X-NuGet-ApiKey";

/// Destination for an assembled package.
///
/// `Ok(false)` means the feed answered and refused the package. `Err` covers
/// local I/O and transport failures.
#[allow(async_fn_in_trait)]
pub trait PackageFeed {
    fn name(&self) -> &str;

    async fn push(&self, package: &Path) -> Result<bool>;
}

/// NuGet V2 push endpoint (`PUT` with a multipart `package` part).
#[derive(Debug, Clone)]
pub struct NuGetFeed {
    feed: ValidatedFeed,
    client: Client,
}

impl NuGetFeed {
    pub fn new(feed: ValidatedFeed) -> Self {
        Self {
            feed,
            client: Client::new(),
        }
    }
}

impl PackageFeed for NuGetFeed {
    fn name(&self) -> &str {
        &self.feed.name
    }

    async fn push(&self, package: &Path) -> Result<bool> {
        let file = tokio::fs::File::open(package)
            .await
            .fs_context("opening package for upload", package)?;
        let length = file
            .metadata()
            .await
            .fs_context("reading package metadata", package)?
            .len();
        let file_name = package
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "package.nupkg".to_string());

        // Streamed from disk; the package is never held in memory whole.
        let part = Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), length)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let form = Form::new().part("package", part);

        log::info!("pushing {} ({length} bytes) to {}", package.display(), self.feed.url);
        let response = self
            .client
            .put(&self.feed.url)
            .header(API_KEY_HEADER, &self.feed.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            log::info!("feed `{}` accepted the package ({status})", self.feed.name);
            return Ok(true);
        }

        let body = response.text().await.unwrap_or_default();
        log::error!(
            "feed `{}` rejected the package: {status} {}",
            self.feed.name,
            body.trim()
        );
        Ok(false)
    }
}
