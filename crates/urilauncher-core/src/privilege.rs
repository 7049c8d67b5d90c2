//! Process elevation checks.
//!
//! A probe that fails is treated as "not elevated": registration is refused
//! rather than attempted blind.

use tracing::warn;

use crate::error::Result;

/// Trait for asking whether the current process runs elevated.
pub trait PrivilegeProbe {
    fn is_elevated(&self) -> Result<bool>;
}

/// Fail-safe wrapper: probe errors count as not elevated.
pub fn check_elevated(probe: &dyn PrivilegeProbe) -> bool {
    match probe.is_elevated() {
        Ok(elevated) => elevated,
        Err(e) => {
            warn!("Could not check for administrator privileges: {e}");
            false
        }
    }
}

/// Probe with a predetermined answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedProbe {
    Elevated,
    NotElevated,
    /// The probe itself fails.
    Failing,
}

impl PrivilegeProbe for FixedProbe {
    fn is_elevated(&self) -> Result<bool> {
        match self {
            FixedProbe::Elevated => Ok(true),
            FixedProbe::NotElevated => Ok(false),
            FixedProbe::Failing => {
                Err(std::io::Error::other("privilege probe unavailable").into())
            }
        }
    }
}

/// Reads `TokenElevation` from the current process token.
#[cfg(target_os = "windows")]
#[derive(Debug, Default, Clone, Copy)]
pub struct TokenElevationProbe;

#[cfg(target_os = "windows")]
impl PrivilegeProbe for TokenElevationProbe {
    fn is_elevated(&self) -> Result<bool> {
        use windows::Win32::Foundation::{CloseHandle, HANDLE};
        use windows::Win32::Security::{
            GetTokenInformation, TOKEN_ELEVATION, TOKEN_QUERY, TokenElevation,
        };
        use windows::Win32::System::Threading::{GetCurrentProcess, OpenProcessToken};

        let mut token = HANDLE::default();
        // SAFETY: GetCurrentProcess returns a pseudo handle; OpenProcessToken writes a
        // real token handle to `token` on success.
        unsafe { OpenProcessToken(GetCurrentProcess(), TOKEN_QUERY, &mut token) }
            .map_err(|e| std::io::Error::other(format!("OpenProcessToken failed: {e}")))?;

        let mut elevation = TOKEN_ELEVATION::default();
        let mut returned: u32 = 0;
        // SAFETY: `elevation` is a TOKEN_ELEVATION-sized buffer matching the class.
        let result = unsafe {
            GetTokenInformation(
                token,
                TokenElevation,
                Some((&mut elevation as *mut TOKEN_ELEVATION).cast()),
                std::mem::size_of::<TOKEN_ELEVATION>() as u32,
                &mut returned,
            )
        };
        // SAFETY: `token` was opened above and is closed exactly once.
        unsafe {
            let _ = CloseHandle(token);
        }
        result.map_err(|e| std::io::Error::other(format!("GetTokenInformation failed: {e}")))?;

        Ok(elevation.TokenIsElevated != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_elevated() {
        assert!(check_elevated(&FixedProbe::Elevated));
        assert!(!check_elevated(&FixedProbe::NotElevated));
    }

    #[test]
    fn test_probe_failure_is_not_elevated() {
        assert!(FixedProbe::Failing.is_elevated().is_err());
        assert!(!check_elevated(&FixedProbe::Failing));
    }
}
