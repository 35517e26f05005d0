//! Maintainer address normalization.
//!
//! A maintainer entry is accepted only if parsing it into a display name
//! and an address, then formatting that pair back in RFC 2822 style,
//! reproduces the entry byte for byte.

/// Characters that force a display name to be quoted.
const SPECIALS: &[char] = &['(', ')', '<', '>', '@', ',', ':', ';', '.', '"', '[', ']', '\\'];

/// Split an entry into `(display name, address)`.
///
/// `Name <addr>` and `"Quoted Name" <addr>` yield both parts; anything
/// without a trailing angle-bracketed address is treated as a bare
/// address. Whitespace and `(comment)` runs are dropped from the address
/// in both forms. Runs of whitespace inside a display name collapse to
/// one space.
pub fn parse_address(entry: &str) -> (String, String) {
    let entry = entry.trim();
    if entry.ends_with('>') {
        if let Some(open) = entry.rfind('<') {
            let name = collapse_whitespace(&entry[..open]);
            let address = addr_spec(&entry[open + 1..entry.len() - 1]);
            return (unquote(&name), address);
        }
    }
    (String::new(), addr_spec(entry))
}

/// Format `(display name, address)` back into a single string.
pub fn format_address(name: &str, address: &str) -> String {
    if name.is_empty() {
        return address.to_string();
    }
    if name.contains(SPECIALS) {
        let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
        format!("\"{escaped}\" <{address}>")
    } else {
        format!("{name} <{address}>")
    }
}

/// Round-trip an entry. `Ok` when it is already canonical, otherwise the
/// canonical form in `Err`.
pub fn canonicalize(entry: &str) -> Result<(), String> {
    let (name, address) = parse_address(entry);
    let formatted = format_address(&name, &address);
    if formatted == entry {
        Ok(())
    } else {
        Err(formatted)
    }
}

/// An address with comments and whitespace removed.
fn addr_spec(raw: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth > 0 || c.is_whitespace() => {}
            _ => out.push(c),
        }
    }
    out
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn unquote(name: &str) -> String {
    match name
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\\\"", "\"").replace("\\\\", "\\"),
        None => name.to_string(),
    }
}
