//! Handler command construction and path resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{LauncherConfig, Scheme};
use crate::error::{Error, Result};

/// Placeholder the shell replaces with the activated URI.
pub const URI_PLACEHOLDER: &str = "%1";

/// Command line the shell runs on scheme activation:
/// `"<executable>" ["<entry point>"] "%1"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate(String);

fn quote(path: &Path) -> String {
    format!("\"{}\"", path.display())
}

impl CommandTemplate {
    pub fn new(executable: &Path, entry_point: Option<&Path>) -> Self {
        let mut command = quote(executable);
        if let Some(entry) = entry_point {
            command.push(' ');
            command.push_str(&quote(entry));
        }
        command.push_str(&format!(" \"{URI_PLACEHOLDER}\""));
        Self(command)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything the registrar writes, resolved up front.
#[derive(Debug, Clone)]
pub struct RegistrationPlan {
    pub scheme: Scheme,
    pub command: CommandTemplate,
    pub force_refresh: bool,
}

impl RegistrationPlan {
    pub fn new(scheme: Scheme, command: CommandTemplate, force_refresh: bool) -> Self {
        Self {
            scheme,
            command,
            force_refresh,
        }
    }

    /// Plan for the running executable and the configured entry point.
    pub fn current(config: &LauncherConfig) -> Result<Self> {
        let executable = current_executable()?;
        let entry_point = config
            .entry_point
            .as_deref()
            .map(absolute_path)
            .transpose()?;
        Ok(Self::new(
            config.scheme.clone(),
            CommandTemplate::new(&executable, entry_point.as_deref()),
            config.force_refresh,
        ))
    }
}

/// Absolute path of the running executable.
pub fn current_executable() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| {
        Error::PathResolution(format!("failed to get current executable path: {e}"))
    })?;
    absolute_path(&exe)
}

/// Canonical absolute form of `path`, which must exist.
pub fn absolute_path(path: &Path) -> Result<PathBuf> {
    let canonical = path
        .canonicalize()
        .map_err(|e| Error::PathResolution(format!("{}: {e}", path.display())))?;
    Ok(strip_verbatim_prefix(canonical))
}

/// `canonicalize` yields `\\?\C:\...` on Windows, which the shell does not
/// accept in handler commands.
fn strip_verbatim_prefix(path: PathBuf) -> PathBuf {
    let text = path.to_string_lossy();
    match text.strip_prefix(r"\\?\") {
        Some(rest) if !rest.starts_with("UNC\\") => PathBuf::from(rest),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_without_entry_point() {
        let template = CommandTemplate::new(Path::new(r"C:\Tools\andrejlauncher.exe"), None);
        assert_eq!(
            template.as_str(),
            r#""C:\Tools\andrejlauncher.exe" "%1""#
        );
    }

    #[test]
    fn test_template_with_entry_point() {
        let template = CommandTemplate::new(
            Path::new(r"C:\Python312\python.exe"),
            Some(Path::new(r"C:\Scripts\andrejlauncher.py")),
        );
        assert_eq!(
            template.as_str(),
            r#""C:\Python312\python.exe" "C:\Scripts\andrejlauncher.py" "%1""#
        );
    }

    #[test]
    fn test_template_quotes_paths_with_spaces() {
        let template = CommandTemplate::new(Path::new(r"C:\Program Files\Launcher\l.exe"), None);
        assert!(template.as_str().starts_with(r#""C:\Program Files\Launcher\l.exe""#));
    }

    #[test]
    fn test_strip_verbatim_prefix() {
        assert_eq!(
            strip_verbatim_prefix(PathBuf::from(r"\\?\C:\Tools\a.exe")),
            PathBuf::from(r"C:\Tools\a.exe")
        );
        assert_eq!(
            strip_verbatim_prefix(PathBuf::from(r"\\?\UNC\server\share")),
            PathBuf::from(r"\\?\UNC\server\share")
        );
        assert_eq!(
            strip_verbatim_prefix(PathBuf::from("/usr/bin/launcher")),
            PathBuf::from("/usr/bin/launcher")
        );
    }

    #[test]
    fn test_current_executable_is_absolute() {
        let exe = current_executable().unwrap();
        assert!(exe.is_absolute());
    }

    #[test]
    fn test_absolute_path_missing_file() {
        let err = absolute_path(Path::new("definitely/not/here.py")).unwrap_err();
        assert!(matches!(err, Error::PathResolution(_)));
    }
}
