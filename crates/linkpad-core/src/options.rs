//! Session options and the `set` directive parser.
//!
//! Options are written as space-separated directives, the way a `:set` line
//! reads in a modal editor:
//!
//! | Syntax          | Effect                           |
//! |-----------------|----------------------------------|
//! | `name`          | Enable a boolean / query numeric |
//! | `noname`        | Disable a boolean                |
//! | `name!`         | Toggle a boolean                 |
//! | `name?`         | Query the current value          |
//! | `name=N`        | Assign a numeric value           |
//!
//! | Option          | Abbrev | Type    | Default | Minimum |
//! |-----------------|--------|---------|---------|---------|
//! | `chunkcapacity` | `cc`   | integer | 64      | 1       |
//! | `tabstop`       | `ts`   | integer | 4       | 1       |
//! | `expandtab`     | `et`   | bool    | true    |         |
//!
//! `chunkcapacity` only affects buffers created after it is set; chunks
//! never change capacity once allocated.

use crate::error::{Error, Result};

/// Chunk capacity used when none is configured.
pub const DEFAULT_CHUNK_CAPACITY: usize = 64;

/// Columns per tab stop used when none is configured.
pub const DEFAULT_TABSTOP: usize = 4;

/// One parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    On(String),
    Off(String),
    Toggle(String),
    Query(String),
    Assign(String, String),
}

/// Current option values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Byte capacity of every chunk in a newly created buffer.
    pub chunk_capacity: usize,
    /// Width of a tab stop when `expandtab` is on.
    pub tabstop: usize,
    /// Insert spaces instead of a literal `\t` for the Tab key.
    pub expandtab: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            chunk_capacity: DEFAULT_CHUNK_CAPACITY,
            tabstop: DEFAULT_TABSTOP,
            expandtab: true,
        }
    }
}

impl Options {
    /// Parse `args` and apply every directive in order.
    ///
    /// Query results are discarded; use [`Options::apply`] to read them.
    ///
    /// # Errors
    ///
    /// Stops at the first directive that fails and returns
    /// [`Error::InvalidOption`]. Earlier directives stay applied.
    pub fn apply_all(&mut self, args: &str) -> Result<()> {
        for directive in parse_set(args) {
            self.apply(&directive)?;
        }
        Ok(())
    }

    /// Apply one directive. A query returns the formatted value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOption`] for an unknown name, a boolean
    /// operation on a numeric option (or the reverse), a value that does
    /// not parse, or a value below the option's minimum.
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>> {
        match directive {
            SetDirective::On(name) => *self.flag(name)? = true,
            SetDirective::Off(name) => *self.flag(name)? = false,
            SetDirective::Toggle(name) => {
                let flag = self.flag(name)?;
                *flag = !*flag;
            }
            SetDirective::Query(name) => return self.query(name).map(Some),
            SetDirective::Assign(name, value) => {
                let parsed = parse_count(name, value)?;
                *self.number(name)? = parsed;
            }
        }
        Ok(None)
    }

    fn query(&mut self, name: &str) -> Result<String> {
        if is_bool_option(name) {
            let value = *self.flag(name)?;
            return Ok(format_bool(canonical_name(name), value));
        }
        let value = *self.number(name)?;
        Ok(format!("{}={value}", canonical_name(name)))
    }

    fn flag(&mut self, name: &str) -> Result<&mut bool> {
        match name {
            "expandtab" | "et" => Ok(&mut self.expandtab),
            _ if is_numeric_option(name) => Err(invalid(name, "not a boolean option")),
            _ => Err(invalid(name, "unknown option")),
        }
    }

    fn number(&mut self, name: &str) -> Result<&mut usize> {
        match name {
            "chunkcapacity" | "cc" => Ok(&mut self.chunk_capacity),
            "tabstop" | "ts" => Ok(&mut self.tabstop),
            _ if is_bool_option(name) => Err(invalid(name, "not a numeric option")),
            _ => Err(invalid(name, "unknown option")),
        }
    }
}

fn invalid(name: &str, reason: impl Into<String>) -> Error {
    Error::InvalidOption {
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Both numeric options share the same domain: a positive integer.
fn parse_count(name: &str, value: &str) -> Result<usize> {
    let n: usize = value
        .parse()
        .map_err(|_| invalid(name, format!("`{value}` is not a number")))?;
    if n == 0 {
        return Err(invalid(name, "must be at least 1"));
    }
    Ok(n)
}

fn canonical_name(name: &str) -> &str {
    match name {
        "cc" => "chunkcapacity",
        "ts" => "tabstop",
        "et" => "expandtab",
        other => other,
    }
}

/// Returns `true` if `name` is a boolean option (full name or abbreviation).
#[must_use]
pub fn is_bool_option(name: &str) -> bool {
    matches!(name, "expandtab" | "et")
}

/// Returns `true` if `name` is a numeric option (full name or abbreviation).
#[must_use]
pub fn is_numeric_option(name: &str) -> bool {
    matches!(name, "chunkcapacity" | "cc" | "tabstop" | "ts")
}

/// Returns `true` if `name` is any known option.
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    is_bool_option(name) || is_numeric_option(name)
}

/// Split a directive line on whitespace and parse each argument.
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    args.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    if let Some(name) = arg.strip_suffix('?') {
        return SetDirective::Query(name.to_string());
    }
    if let Some(name) = arg.strip_suffix('!') {
        return SetDirective::Toggle(name.to_string());
    }
    // `no` is only a prefix when what follows is a boolean name.
    if let Some(name) = arg.strip_prefix("no") {
        if is_bool_option(name) {
            return SetDirective::Off(name.to_string());
        }
    }
    if is_numeric_option(arg) {
        return SetDirective::Query(arg.to_string());
    }
    SetDirective::On(arg.to_string())
}

/// `"name"` when true, `"noname"` when false.
#[must_use]
pub fn format_bool(name: &str, value: bool) -> String {
    if value {
        name.to_string()
    } else {
        format!("no{name}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
