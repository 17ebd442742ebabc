//! Console formatting for status messages.
//!
//! Messages are prefixed and, when the stream is a terminal, coloured with
//! owo-colors. Write errors are returned to the caller.

use owo_colors::{AnsiColors, OwoColorize};
use std::io::{self, Write};

/// The kinds of message the CLI prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Info,
    Success,
    Warn,
    Error,
}

impl MessageKind {
    fn color(self) -> AnsiColors {
        match self {
            MessageKind::Info => AnsiColors::Cyan,
            MessageKind::Success => AnsiColors::Green,
            MessageKind::Warn => AnsiColors::Yellow,
            MessageKind::Error => AnsiColors::BrightRed,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            MessageKind::Info => "",
            MessageKind::Success => "✅ ",
            MessageKind::Warn => "WARN: ",
            MessageKind::Error => "ERROR: ",
        }
    }
}

/// Writes one message line, coloured if `supports_color`.
pub fn print_message<W: Write>(
    writer: &mut W,
    kind: MessageKind,
    msg: &str,
    supports_color: bool,
) -> io::Result<()> {
    let line = format!("{}{}", kind.prefix(), msg);
    if supports_color {
        writeln!(writer, "{}", line.color(kind.color()))
    } else {
        writeln!(writer, "{}", line)
    }
}

pub fn print_info_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Info, msg, supports_color)
}

pub fn print_success_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Success, msg, supports_color)
}

pub fn print_warn_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Warn, msg, supports_color)
}

pub fn print_error_message<W: Write>(writer: &mut W, msg: &str, supports_color: bool) -> io::Result<()> {
    print_message(writer, MessageKind::Error, msg, supports_color)
}
