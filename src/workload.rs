//! Workloads are files of `{"Write": ...}` records, one per line, the same thing the store ingests.
//!
//! We only care about what's in them: which label values exist for which keys, and what the
//! metrics look like on average. That's enough to write queries that actually match something.
use crate::error::{Error, ErrorKind};
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug, Deserialize)]
pub enum WorkloadEntry {
    Write(WriteRecord),
}

/// Records carry a name and a timestamp too, we ignore them.
#[derive(Debug, Deserialize)]
pub struct WriteRecord {
    pub labels: HashMap<String, String>,
    pub variables: HashMap<String, f64>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Metadata {
    /// Label key to every value seen for it.
    pub labels: BTreeMap<String, BTreeSet<String>>,
    /// Variable name to its mean.
    pub metrics: BTreeMap<String, f64>,
}

#[derive(Default)]
struct MetadataBuilder {
    labels: BTreeMap<String, BTreeSet<String>>,
    /// Running mean and sample count. Summing first would overflow on large values.
    means: BTreeMap<String, (f64, usize)>,
}

impl MetadataBuilder {
    fn add(&mut self, record: WriteRecord) {
        for (key, value) in record.labels {
            self.labels.entry(key).or_default().insert(value);
        }

        for (variable, value) in record.variables {
            let (mean, count) = self.means.entry(variable).or_insert((0.0, 0));
            *count += 1;
            *mean += (value - *mean) / *count as f64;
        }
    }

    fn finish(self) -> Metadata {
        let metrics = self
            .means
            .into_iter()
            .map(|(variable, (mean, _))| (variable, mean))
            .collect();

        Metadata {
            labels: self.labels,
            metrics,
        }
    }
}

impl Metadata {
    pub fn from_path(path: &Path) -> Result<Metadata, Error> {
        info!("Reading workload from file: {:?}", path);

        let metadata = Self::from_reader(BufReader::new(File::open(path)?))?;
        if metadata.is_empty() {
            warn!("No labels or metrics found in {:?}", path);
        }

        Ok(metadata)
    }

    /// Blank lines are skipped, anything else must be a write record.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Metadata, Error> {
        let mut builder = MetadataBuilder::default();
        let mut records = 0;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let entry = serde_json::from_str::<WorkloadEntry>(&line).map_err(|source| {
                ErrorKind::LineError {
                    line: index + 1,
                    source,
                }
            })?;
            let WorkloadEntry::Write(record) = entry;

            builder.add(record);
            records += 1;
        }

        let metadata = builder.finish();
        debug!(
            "Read {records} records: {} label keys, {} metrics",
            metadata.labels.len(),
            metadata.metrics.len()
        );

        Ok(metadata)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.metrics.is_empty()
    }

    /// Two JSON lines: labels, then metric means.
    pub fn render(&self) -> Result<String, Error> {
        Ok(format!(
            "{}\n{}",
            serde_json::to_string(&self.labels)?,
            serde_json::to_string(&self.metrics)?
        ))
    }
}
