//! JSON artifact writer
//!
//! The artifact is a pretty-printed JSON array of page records:
//!
//! ```json
//! [
//!   {
//!     "page": "https://en.wikipedia.org/wiki/A",
//!     "links": ["https://en.wikipedia.org/wiki/B"]
//!   }
//! ]
//! ```

use crate::crawler::PageRecord;
use crate::output::traits::{OutputHandler, OutputResult};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes page records to a JSON file, replacing any previous content
#[derive(Debug, Clone)]
pub struct JsonOutputHandler {
    path: PathBuf,
}

impl JsonOutputHandler {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl OutputHandler for JsonOutputHandler {
    fn write(&self, records: &[PageRecord]) -> OutputResult<()> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, records)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

/// Reads a previously written artifact back into page records
pub fn load_artifact(path: &Path) -> OutputResult<Vec<PageRecord>> {
    let file = File::open(path)?;
    let records = serde_json::from_reader(BufReader::new(file))?;
    Ok(records)
}
