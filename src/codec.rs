//! Record stream encoding shared by intermediate and output files.
//!
//! A file is a sequence of JSON-encoded [`KeyValue`] objects. Writers put one
//! object per line; readers accept any whitespace between objects. There is
//! no header and no record count, the stream simply ends.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use serde_json::de::IoRead;
use serde_json::StreamDeserializer;

use crate::error::{ReduceError, Result};
use crate::KeyValue;

/// Streams [`KeyValue`] records out of a reader until clean end of stream.
///
/// A record that is cut short or malformed is reported as
/// [`ReduceError::CorruptRecord`] instead of being treated as the end of the
/// stream, so a truncated file can never silently lose its tail.
pub struct RecordReader<R: Read> {
    path: PathBuf,
    stream: StreamDeserializer<'static, IoRead<R>, KeyValue>,
    records: usize,
    failed: bool,
}

impl RecordReader<BufReader<File>> {
    /// Opens `path` for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ReduceError::OpenIntermediate {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, BufReader::new(file)))
    }
}

impl<R: Read> RecordReader<R> {
    /// Wraps `reader`. `path` is only used to label errors.
    pub fn new(path: impl Into<PathBuf>, reader: R) -> Self {
        Self {
            path: path.into(),
            stream: serde_json::Deserializer::from_reader(reader).into_iter::<KeyValue>(),
            records: 0,
            failed: false,
        }
    }

    /// Number of records decoded so far.
    pub fn records(&self) -> usize {
        self.records
    }

    fn classify(&self, err: serde_json::Error) -> ReduceError {
        if err.is_io() {
            ReduceError::ReadIntermediate {
                path: self.path.clone(),
                record: self.records,
                source: io::Error::from(err),
            }
        } else {
            ReduceError::CorruptRecord {
                path: self.path.clone(),
                record: self.records,
                source: err,
            }
        }
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.stream.next()? {
            Ok(kv) => {
                self.records += 1;
                Some(Ok(kv))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(self.classify(err)))
            }
        }
    }
}

/// Buffered writer producing one JSON [`KeyValue`] per line.
pub struct RecordWriter<W: Write> {
    inner: BufWriter<W>,
    records: usize,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BufWriter::new(writer),
            records: 0,
        }
    }

    pub fn write(&mut self, kv: &KeyValue) -> io::Result<()> {
        serde_json::to_writer(&mut self.inner, kv)?;
        self.inner.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn records(&self) -> usize {
        self.records
    }

    /// Flushes buffered records and hands back the underlying writer.
    pub fn finish(self) -> io::Result<W> {
        self.inner.into_inner().map_err(|e| e.into_error())
    }
}

/// Writes `records` to a fresh file at `path`.
///
/// The reduce task never calls this; it exists for producing intermediate
/// files in tools and tests.
pub fn write_records<'a>(
    path: impl AsRef<Path>,
    records: impl IntoIterator<Item = &'a KeyValue>,
) -> io::Result<usize> {
    let mut writer = RecordWriter::new(File::create(path)?);
    for kv in records {
        writer.write(kv)?;
    }
    let count = writer.records();
    writer.finish()?.sync_all()?;
    Ok(count)
}
