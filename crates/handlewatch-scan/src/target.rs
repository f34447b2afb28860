//! Turning user input into scan targets.
//!
//! Accepts bare handles and `@handle`. Profile URLs are rejected.

use handlewatch_core::error::{HandlewatchError, Result};

/// Normalize one handle: trim, drop a single leading `@`.
pub fn resolve_handle(input: &str) -> Result<String> {
    let trimmed = input.trim();
    let handle = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();

    if handle.is_empty() {
        return Err(HandlewatchError::InvalidTarget(format!(
            "{input:?} contains no handle"
        )));
    }
    if handle.to_ascii_lowercase().starts_with("http") && handle.contains(':') {
        return Err(HandlewatchError::InvalidTarget(format!(
            "{input:?} looks like a URL; pass the bare handle"
        )));
    }
    if handle.contains('/') {
        return Err(HandlewatchError::InvalidTarget(format!(
            "{input:?} contains '/'; pass the bare handle"
        )));
    }

    Ok(handle.to_string())
}

/// Resolve every input, keeping first-seen order and dropping repeats.
///
/// Handles compare case-insensitively; the first spelling wins.
pub fn resolve_handles<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<String>> {
    let mut handles: Vec<String> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let handle = resolve_handle(input.as_ref())?;
        if !handles.iter().any(|h| h.eq_ignore_ascii_case(&handle)) {
            handles.push(handle);
        }
    }
    Ok(handles)
}
