//! Gzipped result writer.

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::Result;
use gzp::{deflate::Gzip, par::compress::{ParCompress, ParCompressBuilder}, ZWriter};
use located_error::LocatedError;

mod error;
pub use error::WriteError;

/// Field separator of every result file.
pub const SEPARATOR: &str = " ";

/// A gzip-compressed line writer. The underlying stream is block-compressed
/// in parallel; `finish()` must run before the file is complete on disk.
pub struct GzWriter {
    source: BufWriter<ParCompress<Gzip>>,
}

impl GzWriter {
    /// Open `path` for writing, creating parent directories as needed.
    pub fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|source| WriteError::CreateParentDirectory{path: path.to_path_buf(), source})
                    .loc("While preparing the output directory")?;
            }
        }
        let file = File::create(path)
            .map_err(|source| WriteError::Create{path: path.to_path_buf(), source})
            .with_loc(|| format!("While creating '{}'", path.display()))?;
        let gz: ParCompress<Gzip> = ParCompressBuilder::new().from_writer(file);
        Ok(Self { source: BufWriter::new(gz) })
    }

    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.source.write_all(line.as_bytes()).map_err(WriteError::Io)
            .loc("While writing a result line")?;
        self.source.write_all(b"\n").map_err(WriteError::Io)
            .loc("While writing a result line")?;
        Ok(())
    }

    /// Write one line per item of `iter`.
    pub fn write_iter<T, I>(&mut self, iter: T) -> Result<()>
    where
        T: IntoIterator<Item = I>,
        I: std::fmt::Display,
    {
        for item in iter {
            self.write_line(&format!("{item}"))?;
        }
        Ok(())
    }

    /// Flush and close the gzip stream.
    pub fn finish(self) -> Result<()> {
        let mut gz = self.source.into_inner()
            .map_err(|e| WriteError::Io(e.into_error()))
            .loc("While flushing the result writer")?;
        gz.finish().map_err(WriteError::Finish)
            .loc("While finalizing the gzip stream")?;
        Ok(())
    }
}

/// `<prefix>_<suffix>.txt.gz`.
pub fn output_path(prefix: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}_{}.txt.gz", prefix.display(), suffix))
}
