use std::collections::HashSet;

/// Returns `name` if it is free, otherwise the first free `stem_N.ext`.
pub fn unique_filename(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    let (stem, ext) = match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    };

    (1..)
        .map(|n| format!("{stem}_{n}{ext}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}
