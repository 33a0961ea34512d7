use crate::error::{PackageError, Result};
use crate::package::PackageSpec;

const MAX_APP_ID_LEN: usize = 255;

/// Ensure `app_id` is safe as a single path segment under `usr/palm/...` and as
/// the control `Package` field: no separators, no traversal, no whitespace.
pub fn validate_app_id(app_id: &str) -> Result<()> {
    let fail = |reason| Err(PackageError::InvalidAppId { app_id: app_id.to_string(), reason });
    if app_id.is_empty() {
        return fail("empty");
    }
    if app_id.len() > MAX_APP_ID_LEN {
        return fail("longer than 255 bytes");
    }
    if !app_id.bytes().all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'+' | b'_'))
    {
        return fail("only ASCII letters, digits, '.', '-', '+' and '_' are allowed");
    }
    if app_id.starts_with('.') || app_id.starts_with('-') {
        return fail("must not start with '.' or '-'");
    }
    if app_id.contains("..") {
        return fail("parent traversal not allowed");
    }
    Ok(())
}

/// A control field value must be a single non-empty line.
pub fn validate_control_value(key: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PackageError::InvalidControlValue { key, reason: "empty" });
    }
    if value.contains(['\n', '\r']) {
        return Err(PackageError::InvalidControlValue { key, reason: "contains a line break" });
    }
    Ok(())
}

/// Check everything the manifest builder writes into paths or the control file.
pub fn validate_spec(spec: &PackageSpec) -> Result<()> {
    validate_app_id(&spec.app_id)?;
    validate_control_value("Version", &spec.version)?;
    // version is also part of the delivered file name
    if spec.version.contains(|c: char| c.is_whitespace() || c == '/' || c == '\\') {
        return Err(PackageError::InvalidControlValue {
            key: "Version",
            reason: "contains whitespace or a path separator",
        });
    }
    validate_control_value("Maintainer", &spec.maintainer)?;
    validate_control_value("webOS-Packager-Version", &spec.packager_version)?;
    Ok(())
}
