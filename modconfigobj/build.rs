// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    file_processing: FileProcessingLimits,
    lexical: LexicalLimits,
    kv: KvLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct FileProcessingLimits {
    max_file_size: u64,
    read_buffer_size: usize,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_lexeme_bytes: usize,
    pending_token_capacity: usize,
}

#[derive(serde::Deserialize)]
struct KvLimits {
    max_section_depth: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=MODCFG_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=MODCFG_CONFIG_DIR");

    let profile = env::var("MODCFG_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("MODCFG_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the modconfigobj directory
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_FILE_SIZE: u64 = 1_000_000_000;
    const ABSOLUTE_MAX_LEXEME_BYTES: usize = 2_000_000_000;

    if config.file_processing.max_file_size > ABSOLUTE_MAX_FILE_SIZE {
        panic!("LIMITS: max_file_size exceeds absolute maximum");
    }

    if config.file_processing.read_buffer_size == 0 {
        panic!("LIMITS: read_buffer_size must be non-zero");
    }

    if config.lexical.max_lexeme_bytes == 0
        || config.lexical.max_lexeme_bytes > ABSOLUTE_MAX_LEXEME_BYTES
    {
        panic!("LIMITS: max_lexeme_bytes must be within 1..={}", ABSOLUTE_MAX_LEXEME_BYTES);
    }

    // Any lexeme of an accepted file must fit
    if (config.lexical.max_lexeme_bytes as u64) <= config.file_processing.max_file_size {
        panic!("LIMITS: max_lexeme_bytes must exceed max_file_size");
    }

    // A single step emits at most two tokens (e.g. Error then EndOfStream)
    if config.lexical.pending_token_capacity < 2 {
        panic!("LIMITS: pending_token_capacity must be at least 2");
    }

    if config.kv.max_section_depth == 0 {
        panic!("LIMITS: max_section_depth must be non-zero");
    }

    if config.logging.max_log_message_length < 64 {
        panic!("LIMITS: max_log_message_length too small (min: 64)");
    }

    if profile == "production" && config.file_processing.max_file_size > 100_000_000 {
        panic!("PRODUCTION: max_file_size too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod file_processing {{
        pub const MAX_FILE_SIZE: u64 = {};
        pub const READ_BUFFER_SIZE: usize = {};
    }}

    pub mod lexical {{
        pub const MAX_LEXEME_BYTES: usize = {};
        pub const PENDING_TOKEN_CAPACITY: usize = {};
    }}

    pub mod kv {{
        pub const MAX_SECTION_DEPTH: usize = {};
    }}

    pub mod logging {{
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.file_processing.max_file_size,
        config.file_processing.read_buffer_size,
        config.lexical.max_lexeme_bytes,
        config.lexical.pending_token_capacity,
        config.kv.max_section_depth,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
