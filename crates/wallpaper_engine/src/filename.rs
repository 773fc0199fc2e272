/// Windows-safe file name for a provider item id, optionally with an extension.
///
/// Provider ids are normally already safe (`t3_abc123`); anything else is
/// patched rather than rejected so the download still lands somewhere stable.
pub fn image_file_name(name: &str, extension: Option<&str>) -> String {
    let stem = sanitize_name(name);
    match extension {
        Some(ext) if !ext.is_empty() => format!("{stem}.{ext}"),
        _ => stem,
    }
}

/// Preferred file extension for an image content type, if known.
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let essence = content_type.split(';').next()?.trim().to_ascii_lowercase();
    let subtype = essence.split('/').nth(1)?.to_string();
    let candidates = mime_guess::get_mime_extensions_str(&essence)?;
    candidates
        .iter()
        .copied()
        .find(|ext| *ext == subtype)
        .or_else(|| candidates.iter().copied().find(|ext| *ext == "jpg"))
        .or_else(|| candidates.first().copied())
}

fn sanitize_name(input: &str) -> String {
    let mut cleaned: String = input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    // A leading dot would hide the file from directory sweeps.
    cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        cleaned = "unnamed".to_string();
    }
    if cleaned.len() > 120 {
        let mut end = 120;
        while !cleaned.is_char_boundary(end) {
            end -= 1;
        }
        cleaned.truncate(end);
    }
    if is_reserved_windows_name(&cleaned) {
        cleaned.push('_');
    }
    cleaned
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
