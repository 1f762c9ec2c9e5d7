#![no_main]
use libfuzzer_sys::fuzz_target;

/// Fuzz the lockfile parsing entry point.
///
/// Feeds arbitrary UTF-8 strings to `parse_lockfile_str`, exercising the JSON
/// layer, section walking, and per-entry variant classification. Parsing must
/// reject malformed input with an error, never a panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = pipfile_diff::parse_lockfile_str(s);
    }
});
