pub mod zsh;

pub use zsh::ZshGenerator;

/// Wrap `s` in single quotes, splicing embedded quotes as `'\''`.
///
/// Valid in every POSIX-style shell, zsh included.
pub fn single_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' {
            out.push_str("'\\''");
        } else {
            out.push(c);
        }
    }
    out.push('\'');
    out
}

/// Backslash-escape `specials` (and backslash itself, first) in `s`.
pub fn backslash_escape(s: &str, specials: &[char]) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '\\' || specials.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_quote_splices_quotes() {
        assert_eq!(single_quote("plain"), "'plain'");
        assert_eq!(single_quote("it's"), r"'it'\''s'");
        assert_eq!(single_quote(""), "''");
    }

    #[test]
    fn backslash_escape_does_not_double_escape() {
        assert_eq!(backslash_escape(r"a\[b]", &['[', ']']), r"a\\\[b\]");
        assert_eq!(backslash_escape("x:y", &[':']), r"x\:y");
    }
}
