const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
const STEP: f64 = 1024.0;

/// Formats a byte count for display, e.g. `1536` -> `"1.5 KB"`.
///
/// The value is rounded to `decimals` places and trailing zeros are dropped.
/// Sizes beyond the gigabyte range are still expressed in GB.
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exponent < UNITS.len() - 1 {
        scaled /= 1024;
        exponent += 1;
    }
    let value = bytes as f64 / STEP.powi(exponent as i32);

    let rounded = format!("{value:.decimals$}");
    let trimmed = if rounded.contains('.') {
        rounded.trim_end_matches('0').trim_end_matches('.')
    } else {
        rounded.as_str()
    };

    format!("{trimmed} {}", UNITS[exponent])
}
