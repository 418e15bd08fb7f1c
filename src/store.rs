use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::engine::report::RunSummary;

pub const DATA_DIR: &str = "data";

/// Append-only sink for end-of-run records.
pub trait SummaryStore {
    fn append(&mut self, target: &str, records: &[RunSummary]) -> Result<()>;
}

/// One CSV file per target: `date,segment,average_price`, never rewritten.
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, target: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", target.replace(' ', "_")))
    }
}

impl SummaryStore for CsvStore {
    fn append(&mut self, target: &str, records: &[RunSummary]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path_for(target);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut buf = String::new();
        for r in records {
            buf.push_str(&format!(
                "{},{},{}\n",
                r.date.format("%Y-%m-%d"),
                r.segment,
                r.average_price
            ));
        }
        file.write_all(buf.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

pub fn data_dir(arg: Option<&Path>) -> PathBuf {
    arg.map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DATA_DIR))
}
