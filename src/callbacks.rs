//! Implementation of different callback functions.
use crate::core::Checkpoint;
use crate::error::Result;
use num_traits::Float;
use serde::Serialize;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Trait for implementing callbacks for a sequence of integration runs.
pub trait Callback<T> {
    /// This method is called after each successfully finished run and may report information
    /// about it.
    fn print(&self, chkpts: &[Checkpoint<T>]) -> Result<()>;
}

/// A callback function that does nothing
pub struct SinkCallback {}

impl<T> Callback<T> for SinkCallback {
    fn print(&self, _: &[Checkpoint<T>]) -> Result<()> {
        Ok(())
    }
}

/// A callback function that prints the result of each individual run together with the change
/// with respect to the previous run.
pub struct SimpleCallback {}

impl<T> Callback<T> for SimpleCallback
where
    T: Display + Float,
{
    fn print(&self, chkpts: &[Checkpoint<T>]) -> Result<()> {
        let run = chkpts.len();

        // Make sure that there is at least one checkpoint
        // otherwise do nothing.
        if let Some(chkpt) = chkpts.last() {
            println!("run {} finished.", run - 1);
            print!(
                "this run: n={} N={} E={}",
                chkpt.steps(),
                chkpt.calls(),
                chkpt.estimate()
            );

            if let Some(previous) = chkpts.len().checked_sub(2).map(|i| &chkpts[i]) {
                print!(" (change {})", chkpt.estimate() - previous.estimate());
            }

            println!();
        }

        Ok(())
    }
}

/// A callback that writes all checkpoints as JSON to a file, replacing its contents after every
/// run.
pub struct FileWriterCallback {
    path: PathBuf,
}

impl FileWriterCallback {
    /// Write the checkpoints to the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl<T> Callback<T> for FileWriterCallback
where
    T: Serialize,
{
    fn print(&self, chkpts: &[Checkpoint<T>]) -> Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer(&mut writer, chkpts)?;
        writer.flush()?;
        Ok(())
    }
}
