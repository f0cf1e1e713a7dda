//! Streaming zip writer over a tokio file.

use super::COPY_BUFFER_SIZE;
use crate::pipeline::{ErrorExt, Result};
use async_zip::{Compression, ZipEntryBuilder, base::write::ZipFileWriter};
use futures_lite::io::AsyncWriteExt as _;
use std::path::{Path, PathBuf};
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncWriteExt},
};
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

/// Zip archive under construction.
///
/// Created fresh (any existing file at the path is removed first), filled
/// entry by entry, and flushed to disk by [`ArchiveWriter::finish`].
pub(crate) struct ArchiveWriter {
    path: PathBuf,
    zip: ZipFileWriter<Compat<File>>,
}

impl ArchiveWriter {
    pub async fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .fs_context("creating archive directory", parent)?;
        }
        match tokio::fs::remove_file(path).await {
            Ok(()) => log::debug!("removed previous archive {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e).fs_context("removing previous archive", path),
        }

        let file = File::create(path)
            .await
            .fs_context("creating archive", path)?;
        Ok(Self {
            path: path.to_path_buf(),
            zip: ZipFileWriter::new(file.compat_write()),
        })
    }

    /// Adds an in-memory entry (small metadata files only).
    pub async fn add_bytes(&mut self, name: &str, data: &[u8]) -> Result<()> {
        let entry = ZipEntryBuilder::new(name.to_string().into(), Compression::Deflate);
        self.zip.write_entry_whole(entry, data).await?;
        Ok(())
    }

    /// Streams `source` into an entry named `name`. Returns bytes copied.
    pub async fn add_file(&mut self, name: &str, source: &Path) -> Result<u64> {
        let mut input = File::open(source)
            .await
            .fs_context("opening file to archive", source)?;
        let entry = ZipEntryBuilder::new(name.to_string().into(), Compression::Deflate);
        let mut output = self.zip.write_entry_stream(entry).await?;

        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        let mut copied = 0u64;
        loop {
            let n = input
                .read(&mut buffer)
                .await
                .fs_context("reading file to archive", source)?;
            if n == 0 {
                break;
            }
            output
                .write_all(&buffer[..n])
                .await
                .fs_context("writing archive entry", &self.path)?;
            copied += n as u64;
        }

        output.close().await?;
        Ok(copied)
    }

    /// Writes the central directory and flushes the file.
    pub async fn finish(self) -> Result<PathBuf> {
        let mut file = self.zip.close().await?.into_inner();
        file.flush()
            .await
            .fs_context("flushing archive", &self.path)?;
        Ok(self.path)
    }
}
