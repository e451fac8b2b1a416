// Go literal and identifier helpers

/// Prefixed to every source-level name. Never valid in a Python identifier, so
/// mangled names cannot clash with Go keywords or compiler-generated names.
pub const IDENT_MARKER: char = 'µ';

/// Returns `value` as a valid Go string literal
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            '\n' => out.push_str("\\n"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            ' '..='~' => out.push(c),
            c if c.is_ascii() => out.push_str(&format!("\\x{:02x}", u32::from(c))),
            c if u32::from(c) <= 0xffff => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push_str(&format!("\\U{:08x}", u32::from(c))),
        }
    }
    out.push('"');
    out
}

/// Returns a Go identifier for the given Python variable name
pub fn mangle_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + IDENT_MARKER.len_utf8());
    out.push(IDENT_MARKER);
    out.push_str(name);
    out
}
