use std::fmt;

use regex::Regex;

use crate::registry::UrlMapping;

/// A URL pattern that could not be compiled into a matcher.
///
/// Raised at load time from
/// [`ServletRegistry::add_mapping`](crate::registry::ServletRegistry::add_mapping);
/// a pattern that compiles can never fail at request time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    /// The offending URL pattern as written in the descriptor.
    pub pattern: String,
    /// Why the pattern was rejected.
    pub reason: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid URL pattern '{}': {}", self.pattern, self.reason)
    }
}

impl std::error::Error for PatternError {}

/// No mapping pattern matched the requested path.
///
/// Raised at request time and converted by the dispatch worker into the
/// canonical "not found" response; it never propagates further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServletNotFound {
    /// The path that failed to match any mapping.
    pub path: String,
}

impl fmt::Display for ServletNotFound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "can't find a servlet for requested path '{}'", self.path)
    }
}

impl std::error::Error for ServletNotFound {}

/// Compile a shell-glob URL pattern into an anchored regex.
///
/// `*` becomes `.*` (it deliberately crosses `/` — segment separators are
/// ordinary characters), `?` becomes `.`, character classes are carried
/// over with `[!` rewritten to `[^`, and every other character is escaped
/// as a literal.
///
/// # Errors
///
/// Returns [`PatternError`] when a character class is malformed (for
/// example an inverted range like `[z-a]`).
pub fn compile_pattern(pattern: &str) -> Result<Regex, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut re = String::with_capacity(pattern.len() + 8);
    re.push('^');

    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => {
                re.push_str(".*");
                i += 1;
            }
            '?' => {
                re.push('.');
                i += 1;
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut re, &chars[i + 1..end]);
                    i = end + 1;
                }
                // No closing bracket: the '[' is an ordinary character.
                None => {
                    re.push_str(r"\[");
                    i += 1;
                }
            },
            c => {
                push_literal(&mut re, c);
                i += 1;
            }
        }
    }

    re.push('$');
    Regex::new(&re).map_err(|err| PatternError {
        pattern: pattern.to_string(),
        reason: err.to_string(),
    })
}

/// Find the index of the `]` closing the class opened at `open`.
///
/// A `]` directly after the opening bracket (or after the negation marker)
/// is part of the class, per shell-glob rules.
fn class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut i = open + 1;
    if matches!(chars.get(i), Some('!' | '^')) {
        i += 1;
    }
    if matches!(chars.get(i), Some(']')) {
        i += 1;
    }
    while i < chars.len() {
        if chars[i] == ']' {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn push_class(re: &mut String, body: &[char]) {
    re.push('[');
    let mut rest = body;
    if matches!(rest.first(), Some('!' | '^')) {
        re.push('^');
        rest = &rest[1..];
    }
    for &c in rest {
        match c {
            // '[' and ']' are literal in a glob class but special to the
            // regex engine; '-' stays bare so ranges keep working.
            '\\' => re.push_str(r"\\"),
            '[' => re.push_str(r"\["),
            ']' => re.push_str(r"\]"),
            _ => re.push(c),
        }
    }
    re.push(']');
}

fn push_literal(re: &mut String, c: char) {
    match c {
        '.' | '^' | '$' | '*' | '+' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\' => {
            re.push('\\');
            re.push(c);
        }
        _ => re.push(c),
    }
}

/// Scan the ordered mapping list and return the first mapping whose
/// pattern matches `path`.
///
/// The result depends only on the mapping order and the pattern semantics,
/// which keeps routing reproducible across deployments of the same
/// descriptor.
///
/// # Errors
///
/// Returns [`ServletNotFound`] carrying the requested path when no pattern
/// matches.
pub fn locate<'m>(mappings: &'m [UrlMapping], path: &str) -> Result<&'m UrlMapping, ServletNotFound> {
    mappings
        .iter()
        .find(|mapping| mapping.matches(path))
        .ok_or_else(|| ServletNotFound {
            path: path.to_string(),
        })
}
