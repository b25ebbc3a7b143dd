//! Console output behind the `info!`, `success!`, `warning!` and `error!`
//! macros. Each line carries a local timestamp and a colored marker; warnings
//! and errors go to stderr.

use std::fmt;

use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn marker(&self) -> colored::ColoredString {
        match self {
            Level::Info => "o".blue().bold(),
            Level::Success => "✓".green().bold(),
            Level::Warning => "!".yellow().bold(),
            Level::Error => "!".red().bold(),
        }
    }
}

pub fn format_line(level: Level, timestamp: &str, args: fmt::Arguments<'_>) -> String {
    format!("{} [{}] {}", timestamp.dimmed(), level.marker(), args)
}

pub fn emit(level: Level, args: fmt::Arguments<'_>) {
    let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
    let line = format_line(level, &timestamp, args);
    match level {
        Level::Info | Level::Success => println!("{}", line),
        Level::Warning | Level::Error => eprintln!("{}", line),
    }
}
