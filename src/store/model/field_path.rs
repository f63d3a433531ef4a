/// Renders a top-level field name as a field path segment.
///
/// Names made of letters, digits and `_` (not starting with a digit) are
/// emitted bare; anything else is wrapped in backticks with `` ` `` and `\`
/// escaped, so a key such as `"a.b"` names one field instead of a nested one.
pub fn canonical_field_name(name: &str) -> String {
    if is_simple_name(name) {
        return name.to_string();
    }
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('`');
    for ch in name.chars() {
        if ch == '`' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('`');
    quoted
}

fn is_simple_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
}
