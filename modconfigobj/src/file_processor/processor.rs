use crate::config::compile_time::file_processing::{MAX_FILE_SIZE, READ_BUFFER_SIZE};
use crate::config::runtime::FileProcessorPreferences;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, thiserror::Error)]
pub enum FileProcessorError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid file extension: {extension:?} (allowed: {allowed})")]
    InvalidExtension {
        extension: Option<String>,
        allowed: String,
    },

    #[error("File too large: {size} bytes (max: {max_size})")]
    FileTooLarge { size: u64, max_size: u64 },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error reading file: {message}")]
    IoError { message: String },

    #[error("Invalid file path: {path}")]
    InvalidPath { path: String },
}

impl FileProcessorError {
    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            FileProcessorError::FileNotFound { .. } => codes::file_processing::FILE_NOT_FOUND,
            FileProcessorError::InvalidExtension { .. } => {
                codes::file_processing::INVALID_EXTENSION
            }
            FileProcessorError::FileTooLarge { .. } => codes::file_processing::FILE_TOO_LARGE,
            FileProcessorError::PermissionDenied { .. } => {
                codes::file_processing::PERMISSION_DENIED
            }
            FileProcessorError::IoError { .. } => codes::file_processing::IO_ERROR,
            FileProcessorError::InvalidPath { .. } => codes::file_processing::INVALID_PATH,
        }
    }

    pub fn requires_halt(&self) -> bool {
        codes::requires_halt(self.error_code().as_str())
    }

    fn from_io(path: &Path, err: &io::Error, action: &str) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FileProcessorError::FileNotFound {
                path: path.display().to_string(),
            },
            io::ErrorKind::PermissionDenied => FileProcessorError::PermissionDenied {
                path: path.display().to_string(),
            },
            _ => FileProcessorError::IoError {
                message: format!("Failed to {} '{}': {}", action, path.display(), err),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub path: PathBuf,
    pub size: u64,
    pub extension: Option<String>,
    pub modified: Option<std::time::SystemTime>,
}

impl FileMetadata {
    pub fn human_readable_size(&self) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
        let mut size = self.size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", self.size, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }
}

/// An opened configuration file, ready to be streamed through the lexer
#[derive(Debug)]
pub struct SourceFile {
    pub metadata: FileMetadata,
    pub reader: BufReader<File>,
}

pub struct FileProcessor {
    pub require_known_extension: bool,
    pub allowed_extensions: Vec<String>,
    pub enable_performance_logging: bool,
}

impl FileProcessor {
    pub fn new() -> Self {
        Self::from_preferences(&FileProcessorPreferences::default())
    }

    pub fn from_preferences(prefs: &FileProcessorPreferences) -> Self {
        Self {
            require_known_extension: prefs.require_known_extension,
            allowed_extensions: prefs.allowed_extensions.clone(),
            enable_performance_logging: prefs.enable_performance_logging,
        }
    }

    pub fn with_known_extension_required(mut self, required: bool) -> Self {
        self.require_known_extension = required;
        self
    }

    pub fn with_performance_logging(mut self, enabled: bool) -> Self {
        self.enable_performance_logging = enabled;
        self
    }

    pub fn max_file_size() -> u64 {
        MAX_FILE_SIZE
    }

    /// Validate `file_path` and open it for streaming
    pub fn open<P: AsRef<Path>>(&self, file_path: P) -> Result<SourceFile, FileProcessorError> {
        let file_path = file_path.as_ref();
        log_debug!("Opening configuration file", "file" => file_path.display());

        self.validate_path(file_path)?;
        let metadata = self.get_metadata(file_path)?;
        self.validate_file(&metadata)?;

        let file = File::open(file_path).map_err(|e| {
            let error = FileProcessorError::from_io(file_path, &e, "open");
            log_error!(error.error_code(), "Failed to open file",
                "file" => file_path.display(),
                "io_error" => e);
            error
        })?;

        if self.enable_performance_logging {
            log_success!(codes::success::FILE_PROCESSING_SUCCESS, "File opened",
                "file" => file_path.display(),
                "size_bytes" => metadata.size,
                "size_human" => metadata.human_readable_size(),
                "buffer_bytes" => READ_BUFFER_SIZE);
        }

        Ok(SourceFile {
            metadata,
            reader: BufReader::with_capacity(READ_BUFFER_SIZE, file),
        })
    }

    fn validate_path(&self, path: &Path) -> Result<(), FileProcessorError> {
        if path.as_os_str().is_empty() {
            let error = FileProcessorError::InvalidPath {
                path: String::new(),
            };
            log_error!(error.error_code(), "Empty file path provided");
            return Err(error);
        }

        if !path.exists() {
            let error = FileProcessorError::FileNotFound {
                path: path.display().to_string(),
            };
            log_error!(error.error_code(), "File not found", "path" => path.display());
            return Err(error);
        }

        if !path.is_file() {
            let error = FileProcessorError::InvalidPath {
                path: path.display().to_string(),
            };
            log_error!(error.error_code(), "Path is not a file", "path" => path.display());
            return Err(error);
        }

        Ok(())
    }

    fn get_metadata(&self, path: &Path) -> Result<FileMetadata, FileProcessorError> {
        let metadata = fs::metadata(path).map_err(|e| {
            let error = FileProcessorError::from_io(path, &e, "read metadata for");
            log_error!(error.error_code(), "Failed to read file metadata",
                "path" => path.display(),
                "io_error" => e);
            error
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        Ok(FileMetadata {
            path: path.to_path_buf(),
            size: metadata.len(),
            extension,
            modified: metadata.modified().ok(),
        })
    }

    fn validate_file(&self, metadata: &FileMetadata) -> Result<(), FileProcessorError> {
        if metadata.size > MAX_FILE_SIZE {
            let error = FileProcessorError::FileTooLarge {
                size: metadata.size,
                max_size: MAX_FILE_SIZE,
            };
            log_error!(error.error_code(), "File exceeds compile-time maximum size limit",
                "file" => metadata.path.display(),
                "size_bytes" => metadata.size,
                "limit_bytes" => MAX_FILE_SIZE);
            return Err(error);
        }

        if self.require_known_extension {
            let known = metadata
                .extension
                .as_ref()
                .map(|ext| self.allowed_extensions.iter().any(|a| a == ext))
                .unwrap_or(false);

            if !known {
                let error = FileProcessorError::InvalidExtension {
                    extension: metadata.extension.clone(),
                    allowed: self.allowed_extensions.join(","),
                };
                log_error!(error.error_code(), "File extension not allowed",
                    "file" => metadata.path.display(),
                    "extension" => metadata.extension.as_deref().unwrap_or("none"));
                return Err(error);
            }
        }

        Ok(())
    }
}

impl Default for FileProcessor {
    fn default() -> Self {
        Self::new()
    }
}
