//! Error codes and their classification metadata
//!
//! Single source of truth for every code the tokenizer, file processor and
//! command-line consumer log, together with their behavioral metadata.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for an error code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// File processing error codes
pub mod file_processing {
    use super::Code;

    pub const FILE_NOT_FOUND: Code = Code::new("E005");
    pub const INVALID_EXTENSION: Code = Code::new("E006");
    pub const FILE_TOO_LARGE: Code = Code::new("E007");
    pub const PERMISSION_DENIED: Code = Code::new("E009");
    pub const IO_ERROR: Code = Code::new("E011");
    pub const INVALID_PATH: Code = Code::new("E012");
}

/// Source reading and cursor codes
pub mod source {
    use super::Code;

    pub const READ_FAILURE: Code = Code::new("E015");
    pub const INVALID_UTF8: Code = Code::new("E016");
    pub const PUSHBACK_WITHOUT_READ: Code = Code::new("E017");
}

/// Lexical analysis codes
pub mod lexical {
    use super::Code;

    /// Non-fatal: an Error token was produced and scanning resumed
    pub const MALFORMED_TOKEN: Code = Code::new("E020");
    pub const LEXEME_TOO_LARGE: Code = Code::new("E024");
    pub const STREAM_EXHAUSTED: Code = Code::new("E029");
}

/// Key/value reconstruction codes (command-line consumer)
pub mod kv {
    use super::Code;

    pub const BAD_TOKEN: Code = Code::new("E040");
    pub const UNEXPECTED_TOKEN: Code = Code::new("E041");
    pub const ORPHAN_SECTION: Code = Code::new("E042");
    pub const SECTION_TOO_DEEP: Code = Code::new("E043");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const FILE_PROCESSING_SUCCESS: Code = Code::new("I006");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const KV_EXPORT_COMPLETE: Code = Code::new("I040");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

/// Error metadata registry using OnceLock for thread safety
static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

/// Initialize and get the error registry
fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System errors
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal system error",
                "File a bug report with the input that triggered it",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "System initialization failed",
                "Check MODCFG_* environment variables",
            ),
            // File processing errors
            ErrorMetadata::new(
                "E005",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Configuration file not found",
                "Verify the file path is correct",
            ),
            ErrorMetadata::new(
                "E006",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "File extension is not in the allowed list",
                "Rename the file or adjust MODCFG_ALLOWED_EXTENSIONS",
            ),
            ErrorMetadata::new(
                "E007",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "File exceeds the compile-time size limit",
                "Split the file or rebuild with a larger max_file_size",
            ),
            ErrorMetadata::new(
                "E009",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "Permission denied while opening file",
                "Check file permissions",
            ),
            ErrorMetadata::new(
                "E011",
                "FileProcessing",
                Severity::High,
                false,
                true,
                "I/O error while opening file",
                "Check the filesystem and retry",
            ),
            ErrorMetadata::new(
                "E012",
                "FileProcessing",
                Severity::Medium,
                false,
                true,
                "Path is empty or not a regular file",
                "Pass the path of a regular file",
            ),
            // Source errors
            ErrorMetadata::new(
                "E015",
                "Source",
                Severity::Critical,
                false,
                true,
                "Underlying character source failed",
                "Check the input stream; scanning cannot continue",
            ),
            ErrorMetadata::new(
                "E016",
                "Source",
                Severity::High,
                false,
                true,
                "Input is not valid UTF-8",
                "Re-encode the file as UTF-8",
            ),
            ErrorMetadata::new(
                "E017",
                "Source",
                Severity::Critical,
                false,
                true,
                "Rune pushback requested without a preceding read",
                "File a bug report; this is a tokenizer defect",
            ),
            // Lexical errors
            ErrorMetadata::new(
                "E020",
                "Lexical",
                Severity::Medium,
                true,
                false,
                "Malformed token; scanning resumed at the next line",
                "Fix the reported line",
            ),
            ErrorMetadata::new(
                "E024",
                "Lexical",
                Severity::High,
                false,
                true,
                "Single lexeme exceeds the compile-time size limit",
                "Look for an unterminated triple-quoted value",
            ),
            ErrorMetadata::new(
                "E029",
                "Lexical",
                Severity::Critical,
                false,
                true,
                "Token requested after the stream ended",
                "Stop pulling once EndOfStream is returned",
            ),
            // Key/value consumer errors
            ErrorMetadata::new(
                "E040",
                "KeyValue",
                Severity::High,
                false,
                true,
                "Lexical error token in input",
                "Fix the configuration file at the reported offset",
            ),
            ErrorMetadata::new(
                "E041",
                "KeyValue",
                Severity::High,
                false,
                true,
                "Key was not followed by a value",
                "Fix the configuration file at the reported offset",
            ),
            ErrorMetadata::new(
                "E042",
                "KeyValue",
                Severity::High,
                false,
                true,
                "Nested section has no parent section",
                "Declare the parent section first",
            ),
            ErrorMetadata::new(
                "E043",
                "KeyValue",
                Severity::High,
                false,
                true,
                "Section nesting exceeds the compile-time limit",
                "Flatten the section hierarchy",
            ),
        ];

        entries.into_iter().map(|meta| (meta.code, meta)).collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get complete metadata for error code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get error severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Low)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires halting processing
pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for error code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for error code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get error category from error code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
