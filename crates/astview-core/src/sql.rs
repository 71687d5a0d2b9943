//! MySQL string-literal escaping.
//!
//! The defining query of every per-host view embeds the raw hostname as a
//! string literal. Hostnames are operator-controlled in principle (container
//! names, DHCP), so the literal is escaped rather than interpolated as-is.
//! The escape table matches the one the mysql2 client library applies, so
//! ordinary hostnames produce byte-identical SQL.

/// Escapes `raw` for use inside a single-quoted MySQL string literal.
#[must_use]
pub fn escape_string_literal(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\0' => out.push_str("\\0"),
            '\x08' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out
}

/// Wraps `raw` in single quotes, escaped.
#[must_use]
pub fn quote_literal(raw: &str) -> String {
    format!("'{}'", escape_string_literal(raw))
}
