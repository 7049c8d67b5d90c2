//! CLI argument definitions for andrejlauncher.
//!
//! There are no flags: no argument registers the scheme, a first argument is
//! the URI to dispatch and anything after it is ignored. Every argument is
//! taken literally, including `--` and values that are not valid UTF-8.

use std::ffi::OsString;
use std::iter;

use clap::Parser;

const BIN_NAME: &str = "andrejlauncher";

#[derive(Parser)]
#[command(name = "andrejlauncher")]
#[command(about = "Local URI scheme launcher")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    /// URI passed by the shell on scheme activation
    #[arg(allow_hyphen_values = true)]
    pub uri: Option<OsString>,

    /// Extra arguments, ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    pub rest: Vec<OsString>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Mode {
    Register,
    Dispatch(String),
}

impl Args {
    /// Parse a full argument list (binary name first).
    ///
    /// An end-of-options marker is inserted ahead of the user's arguments so
    /// clap never interprets any of them, a leading `--` included.
    pub fn parse_literal<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut args = args.into_iter().map(Into::into);
        let bin = args.next().unwrap_or_else(|| OsString::from(BIN_NAME));
        Self::parse_from(
            iter::once(bin)
                .chain(iter::once(OsString::from("--")))
                .chain(args),
        )
    }

    pub fn mode(self) -> Mode {
        match self.uri {
            Some(uri) => Mode::Dispatch(uri.to_string_lossy().into_owned()),
            None => Mode::Register,
        }
    }
}
