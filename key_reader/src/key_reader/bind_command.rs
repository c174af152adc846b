// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::{SymbolForm, char_to_symbol};
use crate::CharAccumulator;
use std::io::{self, Write};

pub const BIND_COMMAND_ACTION: &str = "'do something'";

/// Collects the characters of one burst of input, to suggest a single `bind` command for
/// all of them.
#[derive(Debug, Clone, Default)]
pub struct BindCommandAccumulator {
    pending: CharAccumulator,
}

impl BindCommandAccumulator {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    pub fn push(&mut self, ch: char) { self.pending.push(ch); }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.pending.is_empty() }

    #[must_use]
    pub fn len(&self) -> usize { self.pending.len() }

    /// `bind <sequence> 'do something'\n`, or `None` if nothing is pending.
    #[must_use]
    pub fn format(&self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let mut acc = String::from("bind ");
        for ch in &self.pending {
            acc.push_str(&char_to_symbol(*ch, SymbolForm::BindFriendly));
        }
        acc.push(' ');
        acc.push_str(BIND_COMMAND_ACTION);
        acc.push('\n');
        Some(acc)
    }

    /// Write the pending command (if any) to `out` and clear it.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails. The pending characters are cleared
    /// regardless.
    pub fn flush(&mut self, out: &mut impl Write) -> io::Result<()> {
        let command = self.format();
        self.pending.clear();
        match command {
            Some(command) => {
                out.write_all(command.as_bytes())?;
                out.flush()
            }
            None => Ok(()),
        }
    }
}

/// `bind -k <name> 'do something'\n`.
#[must_use]
pub fn format_key_name_bind_command(name: &str) -> String {
    format!("bind -k {name} {BIND_COMMAND_ACTION}\n")
}
