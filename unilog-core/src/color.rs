//! ANSI escape sequences, addressable by their symbolic names.

pub const RESET: &str = "\x1b[0m";
pub const BRIGHT: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const UNDERSCORE: &str = "\x1b[4m";
pub const BLINK: &str = "\x1b[5m";
pub const REVERSE: &str = "\x1b[7m";
pub const HIDDEN: &str = "\x1b[8m";
/// Bright red foreground. Kept as-is so existing log files stay byte-compatible.
pub const BOLD: &str = "\x1b[91m";

pub const FGBLACK: &str = "\x1b[30m";
pub const FGRED: &str = "\x1b[31m";
pub const FGGREEN: &str = "\x1b[32m";
pub const FGYELLOW: &str = "\x1b[33m";
pub const FGBLUE: &str = "\x1b[34m";
pub const FGMAGENTA: &str = "\x1b[35m";
pub const FGCYAN: &str = "\x1b[36m";
pub const FGWHITE: &str = "\x1b[37m";

pub const BGBLACK: &str = "\x1b[40m";
pub const BGRED: &str = "\x1b[41m";
pub const BGGREEN: &str = "\x1b[42m";
pub const BGYELLOW: &str = "\x1b[43m";
pub const BGBLUE: &str = "\x1b[44m";
pub const BGMAGENTA: &str = "\x1b[45m";
pub const BGCYAN: &str = "\x1b[46m";
pub const BGWHITE: &str = "\x1b[47m";

/// Every color code, in declaration order.
pub const COLOR_TABLE: [(&str, &str); 24] = [
    ("RESET", RESET),
    ("BRIGHT", BRIGHT),
    ("DIM", DIM),
    ("UNDERSCORE", UNDERSCORE),
    ("BLINK", BLINK),
    ("REVERSE", REVERSE),
    ("HIDDEN", HIDDEN),
    ("BOLD", BOLD),
    ("FGBLACK", FGBLACK),
    ("FGRED", FGRED),
    ("FGGREEN", FGGREEN),
    ("FGYELLOW", FGYELLOW),
    ("FGBLUE", FGBLUE),
    ("FGMAGENTA", FGMAGENTA),
    ("FGCYAN", FGCYAN),
    ("FGWHITE", FGWHITE),
    ("BGBLACK", BGBLACK),
    ("BGRED", BGRED),
    ("BGGREEN", BGGREEN),
    ("BGYELLOW", BGYELLOW),
    ("BGBLUE", BGBLUE),
    ("BGMAGENTA", BGMAGENTA),
    ("BGCYAN", BGCYAN),
    ("BGWHITE", BGWHITE),
];

/// Looks up a color code by name, e.g. `color("FGRED")`.
pub fn color(name: &str) -> Option<&'static str> {
    COLOR_TABLE
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, code)| *code)
}
