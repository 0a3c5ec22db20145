//! URL slugs derived from display names.

/// Build a URL slug from a name.
///
/// Lower-cases the name, turns each run of whitespace into a single `-`, then
/// drops every character outside `[a-z0-9-]`. Punctuation is removed rather
/// than replaced, so `"Art & Prints"` becomes `"art--prints"`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_space = false;
    for ch in name.to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('-');
            }
            in_space = true;
            continue;
        }
        in_space = false;
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            out.push(ch);
        }
    }
    out
}
