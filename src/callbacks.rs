//! Implementation of different callback functions.
use crate::core::Estimate;
use crate::error::Result;
use serde::Serialize;
use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Trait for implementing callbacks that report finished integrations.
pub trait Callback<T> {
    /// This method is called after each successfully finished integration and may print or store
    /// information about it.
    fn report(&self, estimate: &Estimate<T>) -> Result<()>;
}

/// A callback function that does nothing
pub struct SinkCallback {}

impl<T> Callback<T> for SinkCallback {
    fn report(&self, _: &Estimate<T>) -> Result<()> {
        Ok(())
    }
}

/// A callback function that prints the result of each integration together with its timing
pub struct SimpleCallback {}

impl<T> Callback<T> for SimpleCallback
where
    T: Copy + Display,
{
    fn report(&self, estimate: &Estimate<T>) -> Result<()> {
        let estimators = estimate.estimators();

        println!(
            "{:?}/{:?} finished: N={} cells={} E={}",
            estimate.config().strategy(),
            estimate.config().expansion(),
            estimators.calls(),
            estimators.cells(),
            estimate.value()
        );
        println!("time [\u{b5}s]: {}", estimate.elapsed().as_micros());

        if estimators.non_finite_calls() != 0 {
            println!(
                "warning: {} non-finite integrand values",
                estimators.non_finite_calls()
            );
        }

        Ok(())
    }
}

/// Writes every estimate it receives into a file, as a JSON array.
///
/// The file is rewritten after each integration, so it always contains all estimates reported
/// so far and can be read back as a `Vec<Estimate<T>>`.
pub struct FileWriterCallback {
    path: PathBuf,
    estimates: Mutex<Vec<serde_json::Value>>,
}

impl FileWriterCallback {
    /// Creates a callback writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            estimates: Mutex::new(Vec::new()),
        }
    }

    /// Returns the path of the file that is written.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> Callback<T> for FileWriterCallback
where
    T: Serialize,
{
    fn report(&self, estimate: &Estimate<T>) -> Result<()> {
        let value = serde_json::to_value(estimate)?;
        // recover the estimates if another report panicked
        let mut estimates = self
            .estimates
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        estimates.push(value);

        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &*estimates)?;
        writer.flush()?;

        Ok(())
    }
}
