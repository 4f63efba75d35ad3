//! Revision file discovery and parsing.
//!
//! Reads the `revision` and `down_revision` assignments out of alembic
//! revision scripts without executing them. Supported value forms:
//! `None`, a quoted string, and a tuple or list of quoted strings, possibly
//! spread over several lines. Type annotations (`revision: str = "..."`) are
//! accepted. Lines inside triple-quoted strings are ignored.

use crate::PreflightError;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One revision script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: String,
    /// Parent revisions; empty for a base revision, several for a merge
    pub down_revisions: Vec<String>,
    pub path: PathBuf,
}

/// Load every revision script under `<migrations>/versions`, sorted by file name.
pub fn load_revisions(migrations_path: &Path) -> Result<Vec<Revision>, PreflightError> {
    let versions = migrations_path.join("versions");
    if !versions.is_dir() {
        return Err(PreflightError::VersionsNotFound {
            path: migrations_path.to_path_buf(),
        });
    }

    let entries = fs::read_dir(&versions).map_err(|e| PreflightError::Io {
        context: format!("reading {}", versions.display()),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| PreflightError::Io {
            context: format!("reading {}", versions.display()),
            source: e,
        })?;
        let path = entry.path();
        if is_revision_script(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut revisions = Vec::new();
    for path in files {
        let source = fs::read_to_string(&path).map_err(|e| PreflightError::Io {
            context: format!("reading {}", path.display()),
            source: e,
        })?;
        match parse_revision(&source, &path)? {
            Some(revision) => revisions.push(revision),
            None => debug!(path = %path.display(), "no revision assignment, ignored"),
        }
    }

    Ok(revisions)
}

fn is_revision_script(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    path.is_file() && name.ends_with(".py") && !name.starts_with('.') && name != "__init__.py"
}

/// Parse one revision script.
///
/// Returns `Ok(None)` when the file has no top-level `revision` assignment.
pub fn parse_revision(source: &str, path: &Path) -> Result<Option<Revision>, PreflightError> {
    let mut id = None;
    let mut down_revisions = Vec::new();
    let mut open_string: Option<&str> = None;
    let mut lines = source.lines();

    while let Some(line) = lines.next() {
        if let Some(delimiter) = open_string {
            if line.matches(delimiter).count() % 2 == 1 {
                open_string = None;
            }
            continue;
        }
        if let Some(delimiter) = opened_string(line) {
            open_string = Some(delimiter);
            continue;
        }

        // Only top-level assignments count
        if line.starts_with(char::is_whitespace) {
            continue;
        }
        let Some((lhs, rhs)) = line.split_once('=') else {
            continue;
        };
        if rhs.starts_with('=') {
            continue;
        }
        let name = lhs.split(':').next().unwrap_or_default().trim();

        match name {
            "revision" => {
                let value = continued_value(rhs, &mut lines);
                let mut values = parse_value(&value).map_err(|message| parse_error(path, message))?;
                if values.len() != 1 {
                    return Err(parse_error(path, "revision must be a single string".to_string()));
                }
                id = values.pop();
            }
            "down_revision" => {
                let value = continued_value(rhs, &mut lines);
                down_revisions = parse_value(&value).map_err(|message| parse_error(path, message))?;
            }
            _ => {}
        }
    }

    Ok(id.map(|id| Revision {
        id,
        down_revisions,
        path: path.to_path_buf(),
    }))
}

/// Triple-quote delimiter left open at the end of `line`, if any.
fn opened_string(line: &str) -> Option<&'static str> {
    let (_, delimiter) = ["\"\"\"", "'''"]
        .into_iter()
        .filter_map(|d| line.find(d).map(|pos| (pos, d)))
        .min_by_key(|(pos, _)| *pos)?;
    (line.matches(delimiter).count() % 2 == 1).then_some(delimiter)
}

/// Join a bracketed value spread over several lines into one line.
///
/// Trailing comments on continuation lines are dropped.
fn continued_value<'a>(rhs: &str, lines: &mut impl Iterator<Item = &'a str>) -> String {
    let mut value = rhs.trim().to_string();
    if !(value.starts_with('(') || value.starts_with('[')) || value.contains([')', ']']) {
        return value;
    }
    for line in lines.by_ref() {
        let code = line.split('#').next().unwrap_or_default().trim();
        value.push(' ');
        value.push_str(code);
        if code.contains([')', ']']) {
            break;
        }
    }
    value
}

fn parse_error(path: &Path, message: String) -> PreflightError {
    PreflightError::RevisionParse {
        path: path.to_path_buf(),
        message,
    }
}

fn parse_value(raw: &str) -> Result<Vec<String>, String> {
    let value = raw.trim();

    if value == "None" || value.starts_with("None ") || value.starts_with("None#") {
        return Ok(Vec::new());
    }

    if value.starts_with('\'') || value.starts_with('"') {
        let (s, _) = take_quoted(value)?;
        return Ok(vec![s]);
    }

    if let Some(inner) = value.strip_prefix('(').or_else(|| value.strip_prefix('[')) {
        let close = inner
            .find([')', ']'])
            .ok_or_else(|| format!("unterminated sequence: {}", value))?;
        let mut items = Vec::new();
        for item in inner[..close].split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let (s, _) = take_quoted(item)?;
            items.push(s);
        }
        return Ok(items);
    }

    Err(format!("unsupported value: {}", value))
}

/// Split a leading quoted string off `value`.
fn take_quoted(value: &str) -> Result<(String, &str), String> {
    let mut chars = value.chars();
    let quote = chars
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| format!("expected a quoted string: {}", value))?;
    let body = &value[1..];
    let end = body
        .find(quote)
        .ok_or_else(|| format!("unterminated string: {}", value))?;
    Ok((body[..end].to_string(), &body[end + 1..]))
}
