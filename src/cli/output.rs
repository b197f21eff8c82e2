use colored::Colorize;
use std::fmt;

/// Message categories used by the CLI output helpers.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Section,
}

fn label(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Info => "INFO",
        MessageKind::Success => "OK",
        MessageKind::Warning => "WARNING",
        MessageKind::Error => "ERROR",
        MessageKind::Section => "",
    }
}

pub(crate) fn render(kind: MessageKind, message: impl fmt::Display) -> String {
    let text = message.to_string();
    if kind == MessageKind::Section {
        return format!("=== {} ===", text.trim()).bold().to_string();
    }
    let line = format!("{}: {}", label(kind), text);
    match kind {
        MessageKind::Success => line.bright_green().to_string(),
        MessageKind::Warning => line.bright_yellow().to_string(),
        MessageKind::Error => line.bright_red().to_string(),
        _ => line,
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    match kind {
        MessageKind::Section => println!("\n{}", render(kind, message)),
        MessageKind::Error => eprintln!("{}", render(kind, message)),
        _ => println!("{}", render(kind, message)),
    }
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Colours a signed amount: red below zero.
pub fn signed_amount(text: String, value: f64) -> String {
    if value < 0.0 {
        text.red().to_string()
    } else {
        text.blue().to_string()
    }
}
