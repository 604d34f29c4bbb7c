//! Lexical helpers shared by the framework parsers.
//!
//! The parsers are line-oriented: test files are overwhelmingly
//! one-statement-per-line, and a line-oriented scan keeps provenance spans
//! trivially correct. These helpers do the character-level work: quoted
//! string extraction, brace balancing that ignores string contents, and
//! matching-parenthesis scans.

/// Extract the first quoted string argument from `s`, returning the string
/// contents (without quotes) and the byte offset just past the closing
/// quote. Handles `'`, `"` and backtick quotes with backslash escapes.
pub fn string_arg(s: &str) -> Option<(String, usize)> {
    let bytes = s.as_bytes();
    let open = bytes
        .iter()
        .position(|&b| b == b'\'' || b == b'"' || b == b'`')?;
    let quote = bytes[open];
    let mut value = String::new();
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => {
                value.push(bytes[i + 1] as char);
                i += 2;
            }
            b if b == quote => return Some((value, i + 1)),
            _ => {
                // Multi-byte chars are copied via the str slice below.
                let ch_start = i;
                let mut ch_end = i + 1;
                while ch_end < bytes.len() && !s.is_char_boundary(ch_end) {
                    ch_end += 1;
                }
                value.push_str(&s[ch_start..ch_end]);
                i = ch_end;
            }
        }
    }
    None
}

/// Net brace delta (`{` minus `}`) of a line, ignoring braces inside
/// quoted strings and line comments.
pub fn brace_delta(line: &str) -> i32 {
    let mut delta = 0i32;
    let mut quote: Option<u8> = None;
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => break,
                b'{' => delta += 1,
                b'}' => delta -= 1,
                _ => {}
            },
        }
        i += 1;
    }
    delta
}

/// Find the index of the `)` matching the `(` at `open`, ignoring
/// parentheses inside quoted strings.
pub fn matching_paren(s: &str, open: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut i = open;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Split a call argument list on top-level commas (commas inside nested
/// parens, brackets, or strings do not split).
pub fn split_args(args: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0i32;
    let mut quote: Option<u8> = None;
    let mut start = 0;
    let bytes = args.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'\'' | b'"' | b'`' => quote = Some(b),
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => depth -= 1,
                b',' if depth == 0 => {
                    out.push(args[start..i].trim().to_string());
                    start = i + 1;
                }
                _ => {}
            },
        }
        i += 1;
    }
    let last = args[start..].trim();
    if !last.is_empty() {
        out.push(last.to_string());
    }
    out
}

/// Leading-whitespace prefix of a line.
pub fn indent_of(line: &str) -> &str {
    let end = line
        .find(|c: char| !c.is_whitespace())
        .unwrap_or(line.len());
    &line[..end]
}

/// Whether a trimmed line closes a block opened by a suite/case/hook, e.g.
/// `});`, `})`, or a bare `}`.
pub fn is_block_closer(trimmed: &str) -> bool {
    matches!(trimmed, "});" | "})" | "}")
}

/// Strip a quoted string literal down to its contents if the whole trimmed
/// argument is one literal; otherwise return the argument unchanged.
pub fn unquote(arg: &str) -> String {
    let arg = arg.trim();
    let bytes = arg.as_bytes();
    if bytes.len() >= 2 {
        let q = bytes[0];
        if (q == b'\'' || q == b'"' || q == b'`') && bytes[bytes.len() - 1] == q {
            return arg[1..arg.len() - 1].to_string();
        }
    }
    arg.to_string()
}

/// Quote a string with single quotes, escaping embedded single quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "\\'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_arg_basic() {
        let (value, rest) = string_arg("describe('adds numbers', () => {").unwrap();
        assert_eq!(value, "adds numbers");
        assert_eq!(&"describe('adds numbers', () => {"[rest..rest + 1], ",");
    }

    #[test]
    fn test_string_arg_escaped_quote() {
        let (value, _) = string_arg(r"it('it\'s fine', () => {").unwrap();
        assert_eq!(value, "it's fine");
    }

    #[test]
    fn test_brace_delta_ignores_strings_and_comments() {
        assert_eq!(brace_delta("describe('x', () => {"), 1);
        assert_eq!(brace_delta("});"), -1);
        assert_eq!(brace_delta("const s = '{{{';"), 0);
        assert_eq!(brace_delta("foo(); // {"), 0);
        assert_eq!(brace_delta("if (x) { y(); }"), 0);
    }

    #[test]
    fn test_matching_paren() {
        let s = "expect(foo(1, 2)).toBe(3);";
        let close = matching_paren(s, 6).unwrap();
        assert_eq!(&s[6..=close], "(foo(1, 2))");
    }

    #[test]
    fn test_split_args_nested() {
        let args = split_args("'GET', { url: '/api', body: [1, 2] }, done");
        assert_eq!(args.len(), 3);
        assert_eq!(args[0], "'GET'");
        assert_eq!(args[2], "done");
    }

    #[test]
    fn test_unquote_and_quote() {
        assert_eq!(unquote("'hello'"), "hello");
        assert_eq!(unquote("\"hi\""), "hi");
        assert_eq!(unquote("notQuoted"), "notQuoted");
        assert_eq!(quote("a'b"), "'a\\'b'");
    }
}
