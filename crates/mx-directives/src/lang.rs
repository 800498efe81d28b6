//! Language detection for embedded code samples.

/// Code-fence language for a sample path, from its extension.
///
/// Unknown extensions produce a bare fence with no language.
pub(crate) fn from_path(path: &str) -> Option<&'static str> {
    let ext = path.rsplit('.').next()?;
    match ext {
        "tsx" => Some("tsx"),
        "ts" => Some("typescript"),
        "jsx" => Some("jsx"),
        "js" => Some("javascript"),
        "json" => Some("json"),
        "py" => Some("python"),
        "sh" => Some("bash"),
        "kt" => Some("kotlin"),
        "dart" => Some("dart"),
        "swift" => Some("swift"),
        "sql" => Some("sql"),
        _ => None,
    }
}
