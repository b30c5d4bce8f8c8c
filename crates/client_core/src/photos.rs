use std::path::PathBuf;

use shared::error::Notice;
use tracing::info;

/// Collects selected photo files. There is no upload transport yet; preparing
/// only reports what would be sent and clears the selection.
#[derive(Debug, Default)]
pub struct PhotoUpload {
    selected: Vec<PathBuf>,
}

impl PhotoUpload {
    pub fn select<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        self.selected = files.into_iter().collect();
    }

    pub fn selected(&self) -> &[PathBuf] {
        &self.selected
    }

    pub fn prepare(&mut self) -> Notice {
        if self.selected.is_empty() {
            return Notice::info("Please select photos to upload.");
        }
        let count = self.selected.len();
        info!(count, "photos: upload prepared, no transport configured");
        self.selected.clear();
        Notice::info(format!("Ready to upload {count} photo(s)."))
    }
}
