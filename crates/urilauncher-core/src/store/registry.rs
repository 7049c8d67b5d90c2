//! `ConfigStore` backed by the Windows registry.

use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

use windows::Win32::Foundation::{
    ERROR_FILE_NOT_FOUND, ERROR_NO_MORE_ITEMS, ERROR_UNSUPPORTED_TYPE,
};
use windows::Win32::System::Registry::{
    HKEY, HKEY_CLASSES_ROOT, KEY_READ, KEY_WRITE, REG_OPTION_NON_VOLATILE, REG_SAM_FLAGS, REG_SZ,
    REG_VALUE_TYPE, RRF_NOEXPAND, RRF_RT_ANY, RRF_RT_REG_SZ, RegCloseKey, RegCreateKeyExW,
    RegDeleteKeyW, RegEnumKeyExW, RegEnumValueW, RegGetValueW, RegOpenKeyExW, RegSetValueExW,
};
use windows::core::{HSTRING, PCWSTR, PWSTR};

use super::{ConfigStore, StoredValue};
use crate::error::{Error, Result};

/// Longest key or value name the registry allows, plus the terminator.
const MAX_NAME_LEN: usize = 16384;

/// Registry hive the store operates under.
pub struct WindowsRegistry {
    root: HKEY,
}

impl WindowsRegistry {
    /// `HKEY_CLASSES_ROOT`, the machine-wide view used for URI handlers.
    pub fn classes_root() -> Self {
        Self {
            root: HKEY_CLASSES_ROOT,
        }
    }

    fn open_key(&self, path: &str, access: REG_SAM_FLAGS) -> Result<Option<OwnedKey>> {
        let subkey = HSTRING::from(path);
        let mut key = HKEY::default();
        // SAFETY: RegOpenKeyExW opens an existing key and writes the handle to `key`.
        let status = unsafe { RegOpenKeyExW(self.root, &subkey, 0, access, &mut key) };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(None);
        }
        status.ok().map_err(|e| Error::registry(path, e))?;
        Ok(Some(OwnedKey(key)))
    }

    fn open_existing(&self, path: &str, access: REG_SAM_FLAGS) -> Result<OwnedKey> {
        self.open_key(path, access)?
            .ok_or_else(|| Error::registry(path, "key does not exist"))
    }

    /// Read a value of any type as its type code and unexpanded bytes.
    fn get_raw(&self, path: &str, name: &str) -> Result<Option<(u32, Vec<u8>)>> {
        let subkey = HSTRING::from(path);
        let name_wide = to_wide(name);
        let name_ptr = PCWSTR::from_raw(name_wide.as_ptr());
        let flags = RRF_RT_ANY | RRF_NOEXPAND;

        let mut kind = REG_VALUE_TYPE::default();
        let mut size: u32 = 0;
        // SAFETY: RegGetValueW with null buffer queries the type and required size.
        let status = unsafe {
            RegGetValueW(
                self.root,
                &subkey,
                name_ptr,
                flags,
                Some(&mut kind),
                None,
                Some(&mut size),
            )
        };
        if status == ERROR_FILE_NOT_FOUND {
            return Ok(None);
        }
        status.ok().map_err(|e| Error::registry(path, e))?;

        let mut buffer = vec![0u8; size as usize];
        // SAFETY: RegGetValueW reads at most `size` bytes into `buffer`.
        unsafe {
            RegGetValueW(
                self.root,
                &subkey,
                name_ptr,
                flags,
                Some(&mut kind),
                Some(buffer.as_mut_ptr().cast()),
                Some(&mut size),
            )
            .ok()
            .map_err(|e| Error::registry(path, e))?;
        }
        buffer.truncate(size as usize);
        Ok(Some((kind.0, buffer)))
    }
}

/// Registry handle closed on drop.
struct OwnedKey(HKEY);

impl Drop for OwnedKey {
    fn drop(&mut self) {
        // SAFETY: RegCloseKey closes a handle obtained from RegOpenKeyExW/RegCreateKeyExW.
        unsafe {
            let _ = RegCloseKey(self.0);
        }
    }
}

fn to_wide(value: &str) -> Vec<u16> {
    OsStr::new(value)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

fn from_wide(buffer: &[u16]) -> String {
    let end = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..end])
}

impl ConfigStore for WindowsRegistry {
    fn key_exists(&self, path: &str) -> Result<bool> {
        Ok(self.open_key(path, KEY_READ)?.is_some())
    }

    fn create_key(&mut self, path: &str) -> Result<()> {
        let subkey = HSTRING::from(path);
        let mut key = HKEY::default();
        // SAFETY: RegCreateKeyExW creates or opens a registry key.
        unsafe {
            RegCreateKeyExW(
                self.root,
                &subkey,
                0,
                None,
                REG_OPTION_NON_VOLATILE,
                KEY_WRITE,
                None,
                &mut key,
                None,
            )
            .ok()
            .map_err(|e| Error::registry(path, e))?;
        }
        drop(OwnedKey(key));
        Ok(())
    }

    fn set_value(&mut self, path: &str, name: Option<&str>, value: &str) -> Result<()> {
        let key = self.open_existing(path, KEY_WRITE)?;
        let data = to_wide(value);
        // Kept alive until after the call; PCWSTR::null() writes the default value.
        let name_wide = name.map(to_wide);
        let name_ptr = name_wide
            .as_ref()
            .map_or(PCWSTR::null(), |n| PCWSTR::from_raw(n.as_ptr()));
        // SAFETY: RegSetValueExW writes a REG_SZ value. `name_wide` and `data` outlive the call.
        unsafe {
            RegSetValueExW(
                key.0,
                name_ptr,
                0,
                REG_SZ,
                Some(std::slice::from_raw_parts(
                    data.as_ptr().cast::<u8>(),
                    data.len() * 2,
                )),
            )
            .ok()
            .map_err(|e| Error::registry(path, e))?;
        }
        Ok(())
    }

    fn set_stored_value(
        &mut self,
        path: &str,
        name: Option<&str>,
        value: &StoredValue,
    ) -> Result<()> {
        let (kind, data) = match value {
            StoredValue::String(text) => return self.set_value(path, name, text),
            StoredValue::Raw { kind, data } => (REG_VALUE_TYPE(*kind), data),
        };
        let key = self.open_existing(path, KEY_WRITE)?;
        let name_wide = name.map(to_wide);
        let name_ptr = name_wide
            .as_ref()
            .map_or(PCWSTR::null(), |n| PCWSTR::from_raw(n.as_ptr()));
        // SAFETY: RegSetValueExW copies `data` as-is under the given type.
        unsafe {
            RegSetValueExW(key.0, name_ptr, 0, kind, Some(data.as_slice()))
                .ok()
                .map_err(|e| Error::registry(path, e))
        }
    }

    fn get_value(&self, path: &str, name: Option<&str>) -> Result<Option<String>> {
        let subkey = HSTRING::from(path);
        let name_wide = name.map(to_wide);
        let name_ptr = name_wide
            .as_ref()
            .map_or(PCWSTR::null(), |n| PCWSTR::from_raw(n.as_ptr()));

        // First call to get the required buffer size
        let mut size: u32 = 0;
        // SAFETY: RegGetValueW with null buffer queries the required size.
        let status = unsafe {
            RegGetValueW(
                self.root,
                &subkey,
                name_ptr,
                RRF_RT_REG_SZ,
                None,
                None,
                Some(&mut size),
            )
        };
        // Missing key, missing value and non-string value all read as unset
        if status == ERROR_FILE_NOT_FOUND || status == ERROR_UNSUPPORTED_TYPE {
            return Ok(None);
        }
        status.ok().map_err(|e| Error::registry(path, e))?;

        let mut buffer = vec![0u16; (size as usize).div_ceil(2)];
        // SAFETY: RegGetValueW reads the value into `buffer`, which holds `size` bytes.
        unsafe {
            RegGetValueW(
                self.root,
                &subkey,
                name_ptr,
                RRF_RT_REG_SZ,
                None,
                Some(buffer.as_mut_ptr().cast()),
                Some(&mut size),
            )
            .ok()
            .map_err(|e| Error::registry(path, e))?;
        }
        Ok(Some(from_wide(&buffer)))
    }

    fn values(&self, path: &str) -> Result<Vec<(String, StoredValue)>> {
        let key = self.open_existing(path, KEY_READ)?;
        let mut entries = Vec::new();
        let mut index = 0;
        loop {
            let mut buffer = vec![0u16; MAX_NAME_LEN];
            let mut len = buffer.len() as u32;
            let mut value_type: u32 = 0;
            // SAFETY: RegEnumValueW writes at most `len` UTF-16 units into `buffer`.
            let status = unsafe {
                RegEnumValueW(
                    key.0,
                    index,
                    PWSTR(buffer.as_mut_ptr()),
                    &mut len,
                    None,
                    Some(&mut value_type),
                    None,
                    None,
                )
            };
            if status == ERROR_NO_MORE_ITEMS {
                break;
            }
            status.ok().map_err(|e| Error::registry(path, e))?;
            entries.push((String::from_utf16_lossy(&buffer[..len as usize]), value_type));
            index += 1;
        }

        let mut values = Vec::with_capacity(entries.len());
        for (name, value_type) in entries {
            let value = if value_type == REG_SZ.0 {
                let lookup = if name.is_empty() { None } else { Some(name.as_str()) };
                self.get_value(path, lookup)?.map(StoredValue::String)
            } else {
                self.get_raw(path, &name)?
                    .map(|(kind, data)| StoredValue::Raw { kind, data })
            };
            if let Some(value) = value {
                values.push((name, value));
            }
        }
        Ok(values)
    }

    fn subkeys(&self, path: &str) -> Result<Vec<String>> {
        let key = self.open_existing(path, KEY_READ)?;
        let mut names = Vec::new();
        let mut index = 0;
        loop {
            let mut buffer = vec![0u16; MAX_NAME_LEN];
            let mut len = buffer.len() as u32;
            // SAFETY: RegEnumKeyExW writes at most `len` UTF-16 units into `buffer`.
            let status = unsafe {
                RegEnumKeyExW(
                    key.0,
                    index,
                    PWSTR(buffer.as_mut_ptr()),
                    &mut len,
                    None,
                    PWSTR::null(),
                    None,
                    None,
                )
            };
            if status == ERROR_NO_MORE_ITEMS {
                break;
            }
            status.ok().map_err(|e| Error::registry(path, e))?;
            names.push(String::from_utf16_lossy(&buffer[..len as usize]));
            index += 1;
        }
        Ok(names)
    }

    fn delete_key(&mut self, path: &str) -> Result<()> {
        let subkey = HSTRING::from(path);
        // SAFETY: RegDeleteKeyW removes a key without subkeys.
        unsafe {
            RegDeleteKeyW(self.root, &subkey)
                .ok()
                .map_err(|e| Error::registry(path, e))
        }
    }
}
