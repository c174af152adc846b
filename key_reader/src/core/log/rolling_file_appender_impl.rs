// Copyright (c) 2024-2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic as _;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Create a (never rolling) file appender at `path_str`. A bare file name is created in
/// the current directory.
///
/// # Errors
///
/// Returns an error if:
/// - The path has no file name
/// - Insufficient permissions to create the file or directory
pub fn try_create(path_str: &str) -> miette::Result<RollingFileAppender> {
    let path = PathBuf::from(&path_str);

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!(
            "Can't access file name {}. It might not exist, or don't have required permissions.",
            path.display()
        )
    })?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(parent)
        .into_diagnostic()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_create_in_temp_dir() {
        let dir = std::env::temp_dir().join(format!(
            "r3bl_key_reader_appender_{}",
            std::process::id()
        ));
        let file_path = dir.join("key_reader.log");

        let appender = try_create(file_path.to_str().unwrap());
        assert!(appender.is_ok());
        assert!(file_path.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_no_file_name() {
        assert!(try_create("/").is_err());
        assert!(try_create("").is_err());
    }
}
