use std::fmt;

use crate::error::{Error, Result};

/// Scheme registered when no configuration overrides it.
pub const DEFAULT_SCHEME: &str = "andrejlauncher";

/// A validated URI scheme name, e.g. `andrejlauncher`.
///
/// RFC 3986: a letter followed by letters, digits, `+`, `-` or `.`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheme(String);

impl Scheme {
    pub fn new(name: &str) -> Result<Self> {
        let mut chars = name.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if !valid {
            return Err(Error::ConfigParseError(format!(
                "invalid URI scheme name: '{name}'"
            )));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Root key of the handler, relative to the classes root.
    pub fn key_path(&self) -> String {
        self.0.clone()
    }

    /// Key holding the command template.
    pub fn command_key_path(&self) -> String {
        format!(r"{}\shell\open\command", self.0)
    }

    /// Default value identifying the protocol to the shell.
    pub fn protocol_label(&self) -> String {
        format!("URL:{} Protocol", self.0)
    }

    /// `scheme://` prefix shared by every handled URI.
    pub fn uri_prefix(&self) -> String {
        format!("{}://", self.0)
    }
}

impl Default for Scheme {
    fn default() -> Self {
        Self(DEFAULT_SCHEME.to_string())
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
