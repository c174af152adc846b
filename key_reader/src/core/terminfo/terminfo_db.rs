// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

// cspell:words terminfo ncurses

//! Locating and parsing compiled terminfo entries.
//!
//! # File format
//!
//! All integers are little endian.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────────────┐
//! │ header: 6 x i16                                                        │
//! │   magic (0o432 = 16-bit numbers, 0o1036 = 32-bit numbers)             │
//! │   names size, bool count, number count, string count, string table size│
//! ├────────────────────────────────────────────────────────────────────────┤
//! │ names: "xterm-256color|xterm with 256 colors\0"                       │
//! │ booleans: 1 byte each                                                  │
//! │ (1 byte pad if names + booleans is odd)                                │
//! │ numbers: 2 or 4 bytes each                                             │
//! │ string offsets: i16 each, -1 = absent, -2 = cancelled                  │
//! │ string table: NUL terminated strings                                   │
//! ├────────────────────────────────────────────────────────────────────────┤
//! │ extended capabilities (ignored)                                        │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```

use std::{ffi::OsString,
          fs,
          path::{Path, PathBuf}};

pub const MAGIC_LEGACY: i16 = 0o432;
pub const MAGIC_EXTENDED_NUMBERS: i16 = 0o1036;

const HEADER_SIZE: usize = 12;

/// Used in place of an empty `$TERMINFO_DIRS` entry, and always searched last.
pub const DEFAULT_TERMINFO_DIRS: [&str; 4] = [
    "/etc/terminfo",
    "/lib/terminfo",
    "/usr/share/terminfo",
    "/usr/lib/terminfo",
];

/// Terminfo problems are never fatal; the caller falls back to a built-in table.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TerminfoError {
    #[error("$TERM is not set")]
    #[diagnostic(code(r3bl_key_reader::terminfo::term_not_set))]
    TermNotSet,

    #[error("No terminfo entry found for {term:?}")]
    #[diagnostic(
        code(r3bl_key_reader::terminfo::not_found),
        help("Set $TERMINFO or $TERMINFO_DIRS to the directory that holds compiled entries")
    )]
    NotFound { term: String },

    #[error("Failed to read terminfo entry {path:?}")]
    #[diagnostic(code(r3bl_key_reader::terminfo::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Bad terminfo magic number {0:#o}")]
    #[diagnostic(code(r3bl_key_reader::terminfo::bad_magic))]
    BadMagic(i16),

    #[error("Terminfo entry is malformed: {0}")]
    #[diagnostic(code(r3bl_key_reader::terminfo::malformed))]
    Malformed(&'static str),
}

/// The parts of a compiled entry this program uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminfoEntry {
    /// Primary name first, then aliases (and the description, last).
    pub names: Vec<String>,
    /// Indexed by string capability number. `None` for absent or cancelled.
    pub strings: Vec<Option<Vec<u8>>>,
}

impl TerminfoEntry {
    #[must_use]
    pub fn string_capability(&self, index: usize) -> Option<&[u8]> {
        self.strings.get(index)?.as_deref()
    }
}

/// Cursor over the entry's bytes that fails (instead of panicking) on truncation.
struct ByteReader<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteReader<'a> {
    fn take(&mut self, len: usize, section: &'static str) -> Result<&'a [u8], TerminfoError> {
        if len > self.bytes.len() {
            return Err(TerminfoError::Malformed(section));
        }
        let (head, tail) = self.bytes.split_at(len);
        self.bytes = tail;
        Ok(head)
    }

    fn read_i16(&mut self, section: &'static str) -> Result<i16, TerminfoError> {
        let bytes = self.take(2, section)?;
        Ok(i16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn read_count(&mut self, section: &'static str) -> Result<usize, TerminfoError> {
        let value = self.read_i16(section)?;
        usize::try_from(value).map_err(|_| TerminfoError::Malformed(section))
    }
}

/// Parse a compiled terminfo entry (legacy or extended number format).
///
/// # Errors
///
/// Returns [`TerminfoError::BadMagic`] for other formats and
/// [`TerminfoError::Malformed`] when a section is truncated or has a negative size.
pub fn parse_terminfo(bytes: &[u8]) -> Result<TerminfoEntry, TerminfoError> {
    if bytes.len() < HEADER_SIZE {
        return Err(TerminfoError::Malformed("header"));
    }
    let mut reader = ByteReader { bytes };

    let magic = reader.read_i16("header")?;
    let number_size = match magic {
        MAGIC_LEGACY => 2,
        MAGIC_EXTENDED_NUMBERS => 4,
        other => return Err(TerminfoError::BadMagic(other)),
    };
    let names_size = reader.read_count("header")?;
    let bool_count = reader.read_count("header")?;
    let number_count = reader.read_count("header")?;
    let string_count = reader.read_count("header")?;
    let string_table_size = reader.read_count("header")?;

    let names = reader.take(names_size, "names")?;
    let names = names.split(|it| *it == 0).next().unwrap_or_default();
    let names = String::from_utf8_lossy(names)
        .split('|')
        .map(str::to_owned)
        .collect();

    reader.take(bool_count, "booleans")?;
    if !(names_size + bool_count).is_multiple_of(2) {
        reader.take(1, "booleans")?;
    }

    reader.take(number_count * number_size, "numbers")?;

    let mut offsets = Vec::with_capacity(string_count);
    for _ in 0..string_count {
        offsets.push(reader.read_i16("string offsets")?);
    }

    let string_table = reader.take(string_table_size, "string table")?;

    let strings = offsets
        .into_iter()
        .map(|offset| {
            // Negative offsets are absent (-1) or cancelled (-2) capabilities.
            let start = usize::try_from(offset).ok()?;
            let rest = string_table.get(start..)?;
            let end = rest.iter().position(|it| *it == 0).unwrap_or(rest.len());
            Some(rest[..end].to_vec())
        })
        .collect();

    Ok(TerminfoEntry { names, strings })
}

/// Directories to search for compiled entries, in order.
///
/// `env` looks up an environment variable; it's a parameter so that tests don't have to
/// mutate the process environment.
pub fn terminfo_search_dirs(env: impl Fn(&str) -> Option<OsString>) -> Vec<PathBuf> {
    let mut acc = Vec::new();

    if let Some(dir) = env("TERMINFO").filter(|it| !it.is_empty()) {
        acc.push(PathBuf::from(dir));
    }

    if let Some(home) = env("HOME").filter(|it| !it.is_empty()) {
        acc.push(Path::new(&home).join(".terminfo"));
    }

    if let Some(dirs) = env("TERMINFO_DIRS") {
        for dir in dirs.to_string_lossy().split(':') {
            if dir.is_empty() {
                acc.extend(DEFAULT_TERMINFO_DIRS.iter().map(PathBuf::from));
            } else {
                acc.push(PathBuf::from(dir));
            }
        }
    }

    acc.extend(DEFAULT_TERMINFO_DIRS.iter().map(PathBuf::from));

    acc
}

/// Both layouts are in use: `x/xterm` and (macOS) `78/xterm`.
#[must_use]
pub fn entry_paths_in(dir: &Path, term: &str) -> Vec<PathBuf> {
    let Some(first) = term.bytes().next() else {
        return vec![];
    };
    let letter_dir = dir.join(&term[..term.chars().next().map_or(1, char::len_utf8)]);
    let hex_dir = dir.join(format!("{first:02x}"));
    vec![letter_dir.join(term), hex_dir.join(term)]
}

/// Find and parse the entry for `term`.
///
/// # Errors
///
/// Returns [`TerminfoError::NotFound`] if no directory has the entry, or the error from
/// reading or parsing the first file found.
pub fn load_terminfo(term: &str, dirs: &[PathBuf]) -> Result<TerminfoEntry, TerminfoError> {
    if term.is_empty() || term.contains('/') {
        return Err(TerminfoError::NotFound {
            term: term.to_owned(),
        });
    }

    let path = dirs
        .iter()
        .flat_map(|dir| entry_paths_in(dir, term))
        .find(|path| path.is_file())
        .ok_or_else(|| TerminfoError::NotFound {
            term: term.to_owned(),
        })?;

    tracing::debug!(message = "terminfo: loading entry", path = ?path);

    let bytes = fs::read(&path).map_err(|source| TerminfoError::Io {
        path: path.clone(),
        source,
    })?;

    parse_terminfo(&bytes)
}


#[cfg(test)]
mod tests {
    use super::{test_fixtures::build_entry, *};
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(MAGIC_LEGACY, 3 ; "legacy, no padding")]
    #[test_case(MAGIC_LEGACY, 4 ; "legacy, padded")]
    #[test_case(MAGIC_EXTENDED_NUMBERS, 3 ; "extended numbers")]
    fn test_parse_both_formats(magic: i16, bool_count: usize) {
        let bytes = build_entry(magic, "xterm-test|test terminal", bool_count, 5, &[
            (61, b"\x1bOB"),
            (87, b"\x1bOA"),
        ]);

        let entry = parse_terminfo(&bytes).unwrap();
        assert_eq!(entry.names, vec!["xterm-test", "test terminal"]);
        assert_eq!(entry.strings.len(), 88);
        assert_eq!(entry.string_capability(87), Some(&b"\x1bOA"[..]));
        assert_eq!(entry.string_capability(61), Some(&b"\x1bOB"[..]));
        assert_eq!(entry.string_capability(60), None);
        assert_eq!(entry.string_capability(1000), None);
    }

    #[test]
    fn test_cancelled_string_is_skipped() {
        let mut bytes = build_entry(MAGIC_LEGACY, "t", 0, 0, &[(0, b"x"), (1, b"y")]);
        // Overwrite offset #1 with -2 (cancelled).
        let offset_pos = HEADER_SIZE + 2 + 2;
        bytes[offset_pos..offset_pos + 2].copy_from_slice(&(-2_i16).to_le_bytes());

        let entry = parse_terminfo(&bytes).unwrap();
        assert_eq!(entry.string_capability(0), Some(&b"x"[..]));
        assert_eq!(entry.string_capability(1), None);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = build_entry(MAGIC_LEGACY, "t", 0, 0, &[]);
        bytes[0] = 0x42;
        assert!(matches!(
            parse_terminfo(&bytes),
            Err(TerminfoError::BadMagic(_))
        ));
    }

    #[test]
    fn test_truncated() {
        let bytes = build_entry(MAGIC_LEGACY, "xterm", 2, 2, &[(5, b"\x1b[A")]);
        for len in [0, 5, HEADER_SIZE, bytes.len() - 1] {
            assert!(
                matches!(parse_terminfo(&bytes[..len]), Err(TerminfoError::Malformed(_))),
                "len {len}"
            );
        }
    }

    #[test]
    fn test_search_dirs() {
        let env = |key: &str| -> Option<OsString> {
            match key {
                "TERMINFO" => Some("/custom".into()),
                "HOME" => Some("/home/me".into()),
                "TERMINFO_DIRS" => Some("/a::/b".into()),
                _ => None,
            }
        };
        let dirs = terminfo_search_dirs(env);
        let expected: Vec<PathBuf> = [
            "/custom",
            "/home/me/.terminfo",
            "/a",
            "/etc/terminfo",
            "/lib/terminfo",
            "/usr/share/terminfo",
            "/usr/lib/terminfo",
            "/b",
            "/etc/terminfo",
            "/lib/terminfo",
            "/usr/share/terminfo",
            "/usr/lib/terminfo",
        ]
        .iter()
        .map(PathBuf::from)
        .collect();
        assert_eq!(dirs, expected);
    }

    #[test]
    fn test_search_dirs_empty_env() {
        let dirs = terminfo_search_dirs(|_| None);
        assert_eq!(dirs.len(), DEFAULT_TERMINFO_DIRS.len());
    }

    #[test]
    fn test_entry_paths() {
        assert_eq!(entry_paths_in(Path::new("/usr/share/terminfo"), "xterm"), vec![
            PathBuf::from("/usr/share/terminfo/x/xterm"),
            PathBuf::from("/usr/share/terminfo/78/xterm"),
        ]);
        assert!(entry_paths_in(Path::new("/"), "").is_empty());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = std::env::temp_dir().join(format!(
            "r3bl_key_reader_terminfo_{}",
            std::process::id()
        ));
        let hex_dir = dir.join("6b");
        fs::create_dir_all(&hex_dir).unwrap();
        fs::write(
            hex_dir.join("kr-test"),
            build_entry(MAGIC_LEGACY, "kr-test", 0, 0, &[(66, b"\x1bOP")]),
        )
        .unwrap();

        let entry = load_terminfo("kr-test", std::slice::from_ref(&dir)).unwrap();
        assert_eq!(entry.string_capability(66), Some(&b"\x1bOP"[..]));

        assert!(matches!(
            load_terminfo("kr-missing", std::slice::from_ref(&dir)),
            Err(TerminfoError::NotFound { .. })
        ));
        assert!(matches!(
            load_terminfo("../kr-test", std::slice::from_ref(&dir)),
            Err(TerminfoError::NotFound { .. })
        ));

        fs::remove_dir_all(&dir).unwrap();
    }
}
