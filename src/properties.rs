//! # Property Lookup
//!
//! The build driver answers "what is the value of property X?" through the
//! `PropertySource` trait. Several sources are stacked into a
//! `LayeredProperties`, and the first layer that defines a key wins.
//!
//! ## Layers (highest precedence first)
//!
//! 1.  **Command line**: `-P KEY=VALUE` arguments. `-P KEY` alone sets an
//!     empty value.
//! 2.  **Environment**: variables named `ORG_GRADLE_PROJECT_<KEY>`.
//! 3.  **User properties file**: `$GRADLE_USER_HOME/gradle.properties`.
//! 4.  **Project properties file**: `gradle.properties` next to the policy.
//!
//! Missing properties files are treated as empty layers. Files follow the
//! `java.util.Properties.load` format: `#` and `!` comments, `=`, `:` or
//! whitespace separators, backslash line continuations and escapes. Only
//! whitespace before a value is stripped, so `otel.stable=true ` yields
//! `"true "`. The signal check itself never trims.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::defaults::ENV_PROPERTY_PREFIX;
use crate::error::{Error, Result};
use crate::signal::ConfigSignal;

/// Something that can answer property lookups.
pub trait PropertySource {
    /// Short description used in log messages (e.g. "command line").
    fn describe(&self) -> String;

    /// The value of `key`, if this source defines it.
    fn find_property(&self, key: &str) -> Option<String>;
}

/// Properties given as `-P` arguments.
#[derive(Debug, Clone, Default)]
pub struct CommandLineProperties {
    values: BTreeMap<String, String>,
}

impl CommandLineProperties {
    /// Parse `KEY=VALUE` arguments. Later arguments override earlier ones.
    pub fn parse<I, S>(arguments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut values = BTreeMap::new();
        for argument in arguments {
            let argument = argument.as_ref();
            let (key, value) = argument.split_once('=').unwrap_or((argument, ""));
            if key.is_empty() {
                return Err(Error::PropertyArgument {
                    argument: argument.to_string(),
                });
            }
            values.insert(key.to_string(), value.to_string());
        }
        Ok(Self { values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertySource for CommandLineProperties {
    fn describe(&self) -> String {
        "command line".to_string()
    }

    fn find_property(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Properties supplied as `ORG_GRADLE_PROJECT_<KEY>` environment variables.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentProperties {
    values: BTreeMap<String, String>,
}

impl EnvironmentProperties {
    /// Snapshot the current process environment.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars_os())
    }

    /// Build from an explicit set of variables. Non-UTF-8 entries are skipped.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let values = vars
            .into_iter()
            .filter_map(|(name, value)| {
                let name = name.into_string().ok()?;
                let key = name.strip_prefix(ENV_PROPERTY_PREFIX)?;
                if key.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.into_string().ok()?))
            })
            .collect();
        Self { values }
    }
}

impl PropertySource for EnvironmentProperties {
    fn describe(&self) -> String {
        "environment".to_string()
    }

    fn find_property(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Properties read from a Java-style `.properties` file.
#[derive(Debug, Clone)]
pub struct PropertiesFile {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PropertiesFile {
    /// Load `path`, treating a missing file as empty.
    pub fn load_if_exists(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("Properties file {} not found, skipping", path.display());
            return Ok(Self {
                path: path.to_path_buf(),
                values: BTreeMap::new(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| Error::PropertiesFile {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(path, &content)
    }

    /// Parse properties text. `path` is only used for messages.
    pub fn parse(path: impl AsRef<Path>, content: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut values = BTreeMap::new();

        for (line_number, line) in logical_lines(content) {
            let (key, value) = split_key_value(&line);
            let unescape_error = |message: String| Error::PropertiesFile {
                path: path.clone(),
                message: format!("line {}: {}", line_number, message),
            };
            let key = unescape(key).map_err(unescape_error)?;
            let value = unescape(value).map_err(unescape_error)?;
            values.insert(key, value);
        }

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PropertySource for PropertiesFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn find_property(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// A stack of property sources searched in order.
#[derive(Default)]
pub struct LayeredProperties {
    layers: Vec<Box<dyn PropertySource>>,
}

impl LayeredProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer below all existing ones.
    pub fn with_layer(mut self, layer: impl PropertySource + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    /// Find `key` together with the description of the layer that supplied it.
    pub fn lookup(&self, key: &str) -> Option<(String, String)> {
        self.layers
            .iter()
            .find_map(|layer| layer.find_property(key).map(|value| (value, layer.describe())))
    }

    /// Read the signal property once.
    pub fn signal(&self, key: &str) -> ConfigSignal {
        match self.lookup(key) {
            Some((value, layer)) => {
                debug!("Property '{}' = {:?} (from {})", key, value, layer);
                ConfigSignal::present(value)
            }
            None => {
                debug!("Property '{}' is not set", key);
                ConfigSignal::absent()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl PropertySource for LayeredProperties {
    fn describe(&self) -> String {
        let names: Vec<String> = self.layers.iter().map(|layer| layer.describe()).collect();
        names.join(" > ")
    }

    fn find_property(&self, key: &str) -> Option<String> {
        self.lookup(key).map(|(value, _)| value)
    }
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

/// Join natural lines into logical ones, dropping blanks and comments.
///
/// Each logical line is paired with the 1-based number of its first
/// natural line.
fn logical_lines(content: &str) -> Vec<(usize, String)> {
    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();
    let mut pending: Option<(usize, String)> = None;

    for (index, natural) in normalized.split('\n').enumerate() {
        let trimmed = natural.trim_start_matches(is_blank);
        if pending.is_none() && (trimmed.is_empty() || trimmed.starts_with(['#', '!'])) {
            continue;
        }

        let trailing_backslashes = trimmed.chars().rev().take_while(|&c| c == '\\').count();
        let continues = trailing_backslashes % 2 == 1;
        let body = if continues {
            &trimmed[..trimmed.len() - 1]
        } else {
            trimmed
        };

        let (_, line) = pending.get_or_insert_with(|| (index + 1, String::new()));
        line.push_str(body);

        if !continues {
            lines.extend(pending.take());
        }
    }

    lines.extend(pending);
    lines
}

/// Split a logical line at the first unescaped `=`, `:` or whitespace.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            key_end = i;
            break;
        }
    }

    let rest = line[key_end..].trim_start_matches(is_blank);
    let value = match rest.strip_prefix(['=', ':']) {
        Some(after_separator) => after_separator.trim_start_matches(is_blank),
        None => rest,
    };
    (&line[..key_end], value)
}

/// Resolve backslash escapes in a key or value.
fn unescape(raw: &str) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let unit = read_hex_unit(&mut chars)?;
                let mut units = vec![unit];
                if (0xD800..0xDC00).contains(&unit) && chars.peek() == Some(&'\\') {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if lookahead.next() == Some('u') {
                        chars = lookahead;
                        units.push(read_hex_unit(&mut chars)?);
                    }
                }
                for decoded in char::decode_utf16(units) {
                    out.push(decoded.map_err(|e| format!("invalid \\u escape: {}", e))?);
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_hex_unit(chars: &mut impl Iterator<Item = char>) -> std::result::Result<u16, String> {
    let digits: String = chars.take(4).collect();
    if digits.chars().count() != 4 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("malformed \\uXXXX escape: \\u{}", digits));
    }
    u16::from_str_radix(&digits, 16).map_err(|e| e.to_string())
}
