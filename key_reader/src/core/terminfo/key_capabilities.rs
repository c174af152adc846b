// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Key string capabilities of the compiled terminfo format, by their index in the string
//! section, paired with the short name used in `bind -k <name>`.
//!
//! The short name is the capability's long name without the `key_` prefix, eg:
//! `key_npage` (`knp`) is `npage`. Table order matters: when two capabilities have the
//! same byte sequence, the one listed first wins.

/// `(string capability index, short name)`.
pub const KEY_CAPABILITIES: &[(usize, &str)] = &[
    (139, "a1"),
    (140, "a3"),
    (141, "b2"),
    (142, "c1"),
    (143, "c3"),
    (55, "backspace"),
    (158, "beg"),
    (148, "btab"),
    (159, "cancel"),
    (56, "catab"),
    (57, "clear"),
    (160, "close"),
    (161, "command"),
    (162, "copy"),
    (163, "create"),
    (58, "ctab"),
    (59, "dc"),
    (60, "dl"),
    (61, "down"),
    (62, "eic"),
    (164, "end"),
    (165, "enter"),
    (63, "eol"),
    (64, "eos"),
    (166, "exit"),
    (65, "f0"),
    (66, "f1"),
    (67, "f10"),
    (216, "f11"),
    (217, "f12"),
    (218, "f13"),
    (219, "f14"),
    (220, "f15"),
    (221, "f16"),
    (222, "f17"),
    (223, "f18"),
    (224, "f19"),
    (68, "f2"),
    (225, "f20"),
    (69, "f3"),
    (70, "f4"),
    (71, "f5"),
    (72, "f6"),
    (73, "f7"),
    (74, "f8"),
    (75, "f9"),
    (167, "find"),
    (168, "help"),
    (76, "home"),
    (77, "ic"),
    (78, "il"),
    (79, "left"),
    (80, "ll"),
    (169, "mark"),
    (170, "message"),
    (171, "move"),
    (172, "next"),
    (81, "npage"),
    (173, "open"),
    (174, "options"),
    (82, "ppage"),
    (175, "previous"),
    (176, "print"),
    (177, "redo"),
    (178, "reference"),
    (179, "refresh"),
    (180, "replace"),
    (181, "restart"),
    (182, "resume"),
    (83, "right"),
    (183, "save"),
    (186, "sbeg"),
    (187, "scancel"),
    (188, "scommand"),
    (189, "scopy"),
    (190, "screate"),
    (191, "sdc"),
    (192, "sdl"),
    (193, "select"),
    (194, "send"),
    (195, "seol"),
    (196, "sexit"),
    (84, "sf"),
    (197, "sfind"),
    (198, "shelp"),
    (199, "shome"),
    (200, "sic"),
    (201, "sleft"),
    (202, "smessage"),
    (203, "smove"),
    (204, "snext"),
    (205, "soptions"),
    (206, "sprevious"),
    (207, "sprint"),
    (85, "sr"),
    (208, "sredo"),
    (209, "sreplace"),
    (210, "sright"),
    (211, "srsume"),
    (212, "ssave"),
    (213, "ssuspend"),
    (86, "stab"),
    (214, "sundo"),
    (184, "suspend"),
    (185, "undo"),
    (87, "up"),
];

/// Used when no terminfo entry can be loaded. Matches what `xterm-256color` reports.
pub const BUILTIN_XTERM_KEYS: &[(&[u8], &str)] = &[
    (b"\x7f", "backspace"),
    (b"\x1b[Z", "btab"),
    (b"\x1b[3~", "dc"),
    (b"\x1bOB", "down"),
    (b"\x1bOF", "end"),
    (b"\x1bOM", "enter"),
    (b"\x1bOP", "f1"),
    (b"\x1b[21~", "f10"),
    (b"\x1b[23~", "f11"),
    (b"\x1b[24~", "f12"),
    (b"\x1bOQ", "f2"),
    (b"\x1bOR", "f3"),
    (b"\x1bOS", "f4"),
    (b"\x1b[15~", "f5"),
    (b"\x1b[17~", "f6"),
    (b"\x1b[18~", "f7"),
    (b"\x1b[19~", "f8"),
    (b"\x1b[20~", "f9"),
    (b"\x1bOH", "home"),
    (b"\x1b[2~", "ic"),
    (b"\x1bOD", "left"),
    (b"\x1b[6~", "npage"),
    (b"\x1b[5~", "ppage"),
    (b"\x1bOC", "right"),
    (b"\x1b[3;2~", "sdc"),
    (b"\x1b[1;2F", "send"),
    (b"\x1b[1;2B", "sf"),
    (b"\x1b[1;2H", "shome"),
    (b"\x1b[1;2D", "sleft"),
    (b"\x1b[1;2A", "sr"),
    (b"\x1b[1;2C", "sright"),
    (b"\x1bOA", "up"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_indices_and_names_are_unique() {
        let indices: HashSet<usize> = KEY_CAPABILITIES.iter().map(|(it, _)| *it).collect();
        let names: HashSet<&str> = KEY_CAPABILITIES.iter().map(|(_, it)| *it).collect();
        assert_eq!(indices.len(), KEY_CAPABILITIES.len());
        assert_eq!(names.len(), KEY_CAPABILITIES.len());
    }

    #[test]
    fn test_builtin_names_are_known_capabilities() {
        let names: HashSet<&str> = KEY_CAPABILITIES.iter().map(|(_, it)| *it).collect();
        for (_, name) in BUILTIN_XTERM_KEYS {
            assert!(names.contains(name), "{name}");
        }
    }
}
