// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{BUILTIN_XTERM_KEYS, KEY_CAPABILITIES, TerminfoEntry, TerminfoError, load_terminfo,
            terminfo_search_dirs};
use crate::InlineString;
use std::collections::{HashMap, hash_map::Entry};

/// Maps a raw byte sequence to the name of the key capability that produces it.
pub trait CapabilityLookup {
    fn name_for(&self, sequence: &[u8]) -> Option<&str>;
}

/// Where a [`CapabilityTable`] came from, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilitySource {
    Terminfo { term: String },
    BuiltinXterm,
}

#[derive(Debug, Clone)]
pub struct CapabilityTable {
    names_by_sequence: HashMap<Vec<u8>, InlineString>,
    source: CapabilitySource,
}

impl CapabilityLookup for CapabilityTable {
    fn name_for(&self, sequence: &[u8]) -> Option<&str> {
        self.names_by_sequence.get(sequence).map(InlineString::as_str)
    }
}

impl CapabilityTable {
    /// Build a table from `(sequence, name)` pairs. Empty sequences are skipped, and the
    /// first name wins when a sequence repeats.
    #[must_use]
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a [u8], &'a str)>,
        source: CapabilitySource,
    ) -> Self {
        let mut names_by_sequence = HashMap::new();
        for (sequence, name) in pairs {
            if sequence.is_empty() {
                continue;
            }
            if let Entry::Vacant(entry) = names_by_sequence.entry(sequence.to_vec()) {
                entry.insert(InlineString::from(name));
            }
        }
        Self {
            names_by_sequence,
            source,
        }
    }

    #[must_use]
    pub fn from_terminfo_entry(entry: &TerminfoEntry, term: &str) -> Self {
        Self::from_pairs(
            KEY_CAPABILITIES.iter().filter_map(|(index, name)| {
                entry.string_capability(*index).map(|sequence| (sequence, *name))
            }),
            CapabilitySource::Terminfo {
                term: term.to_owned(),
            },
        )
    }

    #[must_use]
    pub fn builtin_xterm() -> Self {
        Self::from_pairs(
            BUILTIN_XTERM_KEYS.iter().copied(),
            CapabilitySource::BuiltinXterm,
        )
    }

    /// Load the table for `term` from the terminfo database.
    ///
    /// # Errors
    ///
    /// Returns a [`TerminfoError`] if `term` is missing, or its entry can't be found or
    /// parsed.
    pub fn try_load(term: Option<&str>) -> Result<Self, TerminfoError> {
        let term = term.filter(|it| !it.is_empty()).ok_or(TerminfoError::TermNotSet)?;
        let dirs = terminfo_search_dirs(|key| std::env::var_os(key));
        let entry = load_terminfo(term, &dirs)?;
        Ok(Self::from_terminfo_entry(&entry, term))
    }

    /// Load the table for `$TERM`, falling back to [`Self::builtin_xterm`].
    #[must_use]
    pub fn load_from_env() -> Self {
        let term = std::env::var("TERM").ok();
        match Self::try_load(term.as_deref()) {
            Ok(it) => {
                tracing::debug!(
                    message = "terminfo: loaded key capabilities",
                    source = ?it.source,
                    count = it.len()
                );
                it
            }
            Err(error) => {
                tracing::warn!(
                    message = "terminfo: using built-in xterm key capabilities",
                    error = ?error
                );
                Self::builtin_xterm()
            }
        }
    }

    #[must_use]
    pub fn source(&self) -> &CapabilitySource { &self.source }

    #[must_use]
    pub fn len(&self) -> usize { self.names_by_sequence.len() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.names_by_sequence.is_empty() }
}
