//! File processor: validates configuration paths and opens them as buffered readers

mod processor;

use std::path::Path;

pub use processor::{FileMetadata, FileProcessor, FileProcessorError, SourceFile};

/// Open a file with preferences taken from the environment
pub fn open_source<P: AsRef<Path>>(file_path: P) -> Result<SourceFile, FileProcessorError> {
    create_processor().open(file_path)
}

/// Create a file processor with default settings
pub fn create_processor() -> FileProcessor {
    FileProcessor::new()
}
