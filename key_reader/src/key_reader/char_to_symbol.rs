// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Render a decoded character in one of two textual forms.
//!
//! | char     | [`SymbolForm::Human`]   | [`SymbolForm::BindFriendly`] |
//! | :------- | :---------------------- | :--------------------------- |
//! | `0x01`   | `\cA`                   | `\cA`                        |
//! | `0x0A`   | `\cJ  (or \n)`          | `\n`                         |
//! | `0x1B`   | `\c[  (or \e)`          | `\e`                         |
//! | `' '`    | `\x20  (aka "space")`   | `\x20`                       |
//! | `0x7F`   | `\x7F  (aka "del")`     | `\x7F`                       |
//! | `'a'`    | `a`                     | `a`                          |
//! | `'$'`    | `$`                     | `\$`                         |
//! | `'é'`    | `\u00E9`                | `\u00E9`                     |
//! | `'😀'`   | `\U01F600`              | `\U01F600`                   |

use crate::InlineString;
use std::fmt::Write as _;

/// Characters that have to be escaped with a backslash in the key sequence argument of a
/// `bind` command.
pub const BIND_METACHARACTERS: &str = "[]()<>{}*\\?$#;&|'\"";

/// Escape names for the control characters that have one, indexed by code point.
const CTRL_SYMBOLIC_NAMES: [Option<&str>; 32] = {
    let mut acc = [None; 32];
    acc[0x07] = Some("\\a");
    acc[0x08] = Some("\\b");
    acc[0x09] = Some("\\t");
    acc[0x0A] = Some("\\n");
    acc[0x0B] = Some("\\v");
    acc[0x0C] = Some("\\f");
    acc[0x0D] = Some("\\r");
    acc[0x1B] = Some("\\e");
    acc
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolForm {
    /// For a person reading the diagnostic output: includes parenthetical names.
    Human,
    /// Can be pasted into the key sequence argument of a `bind` command.
    BindFriendly,
}

#[must_use]
pub fn needs_escape(ch: char) -> bool { BIND_METACHARACTERS.contains(ch) }

/// Every `char` has a rendering; there is no error case.
#[must_use]
pub fn char_to_symbol(ch: char, form: SymbolForm) -> InlineString {
    let mut acc = InlineString::new();
    let code_point = u32::from(ch);

    // Writing to an `InlineString` can't fail.
    let _unused = match code_point {
        0x00..=0x1F => ctrl_to_symbol(&mut acc, code_point, form),
        0x20 => annotated_hex_to_symbol(&mut acc, code_point, "space", form),
        0x7F => annotated_hex_to_symbol(&mut acc, code_point, "del", form),
        0x21..=0x7E => {
            if form == SymbolForm::BindFriendly && needs_escape(ch) {
                acc.push('\\');
            }
            acc.push(ch);
            Ok(())
        }
        0x80..=0xFFFF => write!(acc, "\\u{code_point:04X}"),
        _ => write!(acc, "\\U{code_point:06X}"),
    };

    acc
}

fn ctrl_to_symbol(acc: &mut InlineString, code_point: u32, form: SymbolForm) -> std::fmt::Result {
    let letter = char::from_u32(code_point + 0x40).unwrap_or('?');
    let name = usize::try_from(code_point)
        .ok()
        .and_then(|index| CTRL_SYMBOLIC_NAMES.get(index).copied().flatten());

    match (name, form) {
        (Some(name), SymbolForm::BindFriendly) => write!(acc, "{name}"),
        (Some(name), SymbolForm::Human) => write!(acc, "\\c{letter}  (or {name})"),
        (None, _) => write!(acc, "\\c{letter}"),
    }
}

fn annotated_hex_to_symbol(
    acc: &mut InlineString,
    code_point: u32,
    aka: &str,
    form: SymbolForm,
) -> std::fmt::Result {
    match form {
        SymbolForm::BindFriendly => write!(acc, "\\x{code_point:X}"),
        SymbolForm::Human => write!(acc, "\\x{code_point:X}  (aka \"{aka}\")"),
    }
}
