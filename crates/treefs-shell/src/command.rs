//! Shell command parsing and execution.

use std::io::{self, Write};

use thiserror::Error;
use treefs_core::{Namespace, NodeKind, VfsError};

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mkdir(String),
    Touch(String),
    Write { path: String, text: String },
    Post { path: String, text: String },
    Cat { path: String, size: Option<usize>, offset: u64 },
    Ls { path: String, all: bool },
    Stat(String),
    Rm(String),
    Rmdir(String),
    Tree(String),
    Clear,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command}: missing {what}")]
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },

    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Vfs(#[from] VfsError),

    #[error("output: {0}")]
    Io(#[from] io::Error),
}

/// Parse one line. Blank lines and `#` comments yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = split_word(line);
    let command = match word {
        "mkdir" => Command::Mkdir(path_arg("mkdir", rest)?),
        "touch" | "create" => Command::Touch(path_arg("touch", rest)?),
        "write" => {
            let (path, text) = path_and_text("write", rest)?;
            Command::Write { path, text }
        }
        "post" => {
            let (path, text) = path_and_text("post", rest)?;
            Command::Post { path, text }
        }
        "cat" | "read" => {
            let mut args = rest.split_whitespace();
            let path = args
                .next()
                .ok_or(ParseError::MissingArgument { command: "cat", what: "path" })?
                .to_string();
            let size = args.next().map(parse_number::<usize>).transpose()?;
            let offset = args.next().map(parse_number::<u64>).transpose()?.unwrap_or(0);
            Command::Cat { path, size, offset }
        }
        "ls" => {
            let mut all = false;
            let mut path = None;
            for arg in rest.split_whitespace() {
                match arg {
                    "-a" => all = true,
                    other => path = Some(other.to_string()),
                }
            }
            Command::Ls {
                path: path.unwrap_or_else(|| String::from("/")),
                all,
            }
        }
        "stat" => Command::Stat(path_arg("stat", rest)?),
        "rm" | "unlink" => Command::Rm(path_arg("rm", rest)?),
        "rmdir" => Command::Rmdir(path_arg("rmdir", rest)?),
        "tree" => Command::Tree(optional_path(rest)),
        "clear" => Command::Clear,
        other => return Err(ParseError::UnknownCommand(other.to_string())),
    };
    Ok(Some(command))
}

fn split_word(s: &str) -> (&str, &str) {
    match s.find(char::is_whitespace) {
        Some(end) => (&s[..end], s[end..].trim_start()),
        None => (s, ""),
    }
}

fn path_arg(command: &'static str, rest: &str) -> Result<String, ParseError> {
    rest.split_whitespace()
        .next()
        .map(String::from)
        .ok_or(ParseError::MissingArgument { command, what: "path" })
}

fn optional_path(rest: &str) -> String {
    rest.split_whitespace()
        .next()
        .map(String::from)
        .unwrap_or_else(|| String::from("/"))
}

/// Path, then everything after the single separator following it as text,
/// with `\n`, `\t` and `\\` unescaped.
fn path_and_text(command: &'static str, rest: &str) -> Result<(String, String), ParseError> {
    let (path, text) = match rest.find(char::is_whitespace) {
        Some(end) => {
            let separator = rest[end..].chars().next().map_or(0, char::len_utf8);
            (&rest[..end], &rest[end + separator..])
        }
        None => (rest, ""),
    };
    if path.is_empty() {
        return Err(ParseError::MissingArgument { command, what: "path" });
    }
    Ok((path.to_string(), unescape(text)))
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn parse_number<T: std::str::FromStr>(s: &str) -> Result<T, ParseError> {
    s.parse().map_err(|_| ParseError::InvalidNumber(s.to_string()))
}

/// Run `command` against `ns`, writing any output to `out`.
pub fn execute(ns: &mut Namespace, command: &Command, out: &mut impl Write) -> Result<(), ShellError> {
    match command {
        Command::Mkdir(path) => {
            ns.make_directory(path)?;
        }
        Command::Touch(path) => {
            ns.create_file(path)?;
        }
        Command::Write { path, text } => {
            let written = ns.write(path, text.as_bytes(), 0)?;
            tracing::debug!(%path, written, "shell write");
        }
        Command::Post { path, text } => {
            ns.post(path, text.as_bytes())?;
        }
        Command::Cat { path, size, offset } => {
            let data = match size {
                Some(size) => ns.read(path, *size, *offset)?,
                None => ns.read(path, usize::MAX, *offset)?,
            };
            out.write_all(&data)?;
            if !data.ends_with(b"\n") && !data.is_empty() {
                writeln!(out)?;
            }
        }
        Command::Ls { path, all } => {
            for entry in ns.list_entries(path)? {
                if !all && (entry.name == "." || entry.name == "..") {
                    continue;
                }
                let suffix = if entry.kind.is_dir() { "/" } else { "" };
                writeln!(out, "{}{}", entry.name, suffix)?;
            }
        }
        Command::Stat(path) => {
            let attr = ns.stat(path)?;
            writeln!(
                out,
                "{} kind={} size={} mode={:o} nlink={} ino={}",
                path,
                attr.kind,
                attr.size,
                attr.mode(),
                attr.nlink,
                attr.ino
            )?;
        }
        Command::Rm(path) => ns.unlink(path)?,
        Command::Rmdir(path) => ns.remove_directory(path)?,
        Command::Tree(path) => {
            ns.stat(path)?;
            writeln!(out, "{path}")?;
            print_tree(ns, path, 1, out)?;
        }
        Command::Clear => {
            let released = ns.clear();
            writeln!(out, "released {released} nodes")?;
        }
    }
    Ok(())
}

fn print_tree(ns: &Namespace, path: &str, depth: usize, out: &mut impl Write) -> Result<(), ShellError> {
    let entries = match ns.list_entries(path) {
        Ok(entries) => entries,
        Err(VfsError::NotADirectory(_)) => return Ok(()),
        Err(e) => return Err(e.into()),
    };
    let base = path.trim_end_matches('/');
    for entry in entries.iter().skip(2) {
        let indent = "  ".repeat(depth);
        let child = format!("{base}/{}", entry.name);
        match entry.kind {
            NodeKind::Directory => {
                writeln!(out, "{indent}{}/", entry.name)?;
                print_tree(ns, &child, depth + 1, out)?;
            }
            NodeKind::File => {
                let size = ns.stat(&child)?.size;
                writeln!(out, "{indent}{} ({size} bytes)", entry.name)?;
            }
        }
    }
    Ok(())
}
