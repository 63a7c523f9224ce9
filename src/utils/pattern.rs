use glob::{MatchOptions, Pattern};
use std::iter::Peekable;
use std::path::Path;
use std::str::CharIndices;

use crate::error::PatternSyntaxError;

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Shell-style glob matched against a file's base name only.
///
/// Accepts `*`, `?`, `[set]`, `[^set]` / `[!set]` and `\` escapes, inside
/// classes too. Runs of `*` collapse to one, so `**` never recurses.
#[derive(Debug, Clone)]
pub struct BaseNameMatcher {
    pattern: Pattern,
}

impl BaseNameMatcher {
    pub fn new(source: &str) -> Result<Self, PatternSyntaxError> {
        let translated = translate(source)?;
        let pattern = Pattern::new(&translated).map_err(|e| PatternSyntaxError {
            pattern: source.to_string(),
            pos: e.pos,
            message: e.msg,
        })?;

        Ok(Self { pattern })
    }

    /// Match the last component of `path`; directories above it are ignored
    pub fn matches_path(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => self.matches_name(&name.to_string_lossy()),
            None => self.matches_name(&path.to_string_lossy()),
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.pattern.matches_with(name, OPTIONS)
    }
}

type Chars<'a> = Peekable<CharIndices<'a>>;

/// One member of a bracket expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassItem {
    Char(char),
    Range(char, char),
}

/// Rewrite shell glob syntax into what the `glob` crate parses.
fn translate(source: &str) -> Result<String, PatternSyntaxError> {
    let mut out = String::with_capacity(source.len() + 4);
    let mut chars = source.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '*' => {
                while matches!(chars.peek(), Some((_, '*'))) {
                    chars.next();
                }
                out.push('*');
            }
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push_str(&Pattern::escape(&escaped.to_string())),
                None => return Err(syntax_error(source, pos, TRAILING_ESCAPE)),
            },
            '[' => {
                let (negated, items) = parse_class(&mut chars, source, pos)?;
                out.push_str(&emit_class(negated, &items));
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

const TRAILING_ESCAPE: &str = "trailing escape character";

/// Parse the members of a class whose `[` sat at `open`. A `]` right after
/// the opening bracket is a member, not the end.
fn parse_class(
    chars: &mut Chars<'_>,
    source: &str,
    open: usize,
) -> Result<(bool, Vec<ClassItem>), PatternSyntaxError> {
    let negated = matches!(chars.peek(), Some((_, '^' | '!')));
    if negated {
        chars.next();
    }

    let mut items = Vec::new();
    loop {
        let (pos, c) = chars
            .next()
            .ok_or_else(|| syntax_error(source, open, "unterminated character class"))?;
        if c == ']' && !items.is_empty() {
            return Ok((negated, items));
        }
        let lo = class_char(chars, source, pos, c)?;

        // `-` right before the closing `]` is a plain member
        let mut ahead = chars.clone();
        let is_range = matches!(ahead.next(), Some((_, '-')))
            && !matches!(ahead.peek(), Some((_, ']')) | None);
        if !is_range {
            items.push(ClassItem::Char(lo));
            continue;
        }

        chars.next();
        let (pos, c) = chars
            .next()
            .ok_or_else(|| syntax_error(source, open, "unterminated character class"))?;
        let hi = class_char(chars, source, pos, c)?;
        items.push(ClassItem::Range(lo, hi));
    }
}

fn class_char(
    chars: &mut Chars<'_>,
    source: &str,
    pos: usize,
    c: char,
) -> Result<char, PatternSyntaxError> {
    if c != '\\' {
        return Ok(c);
    }
    chars
        .next()
        .map(|(_, escaped)| escaped)
        .ok_or_else(|| syntax_error(source, pos, TRAILING_ESCAPE))
}

/// Characters the `glob` crate gives a meaning inside brackets
fn is_class_special(c: char) -> bool {
    matches!(c, ']' | '-' | '!')
}

/// Split a range so neither endpoint is special; the endpoints peeled off
/// become single members.
fn push_range(lo: char, hi: char, singles: &mut Vec<char>, ranges: &mut Vec<(char, char)>) {
    if lo > hi {
        // an inverted range matches nothing; keep it only if it is harmless
        if !is_class_special(lo) && !is_class_special(hi) {
            ranges.push((lo, hi));
        }
    } else if lo == hi {
        singles.push(lo);
    } else if is_class_special(lo) {
        singles.push(lo);
        push_range(char::from(lo as u8 + 1), hi, singles, ranges);
    } else if is_class_special(hi) {
        singles.push(hi);
        push_range(lo, char::from(hi as u8 - 1), singles, ranges);
    } else {
        ranges.push((lo, hi));
    }
}

/// Lay out class members so `glob` reads every one literally: `]` first,
/// `-` last, and `!` never where it would read as negation.
fn emit_class(negated: bool, items: &[ClassItem]) -> String {
    let mut singles = Vec::new();
    let mut ranges = Vec::new();
    for item in items {
        match *item {
            ClassItem::Char(c) => singles.push(c),
            ClassItem::Range(lo, hi) => push_range(lo, hi, &mut singles, &mut ranges),
        }
    }

    let mut body = String::new();
    if singles.contains(&']') {
        body.push(']');
    }
    for (lo, hi) in &ranges {
        body.push(*lo);
        body.push('-');
        body.push(*hi);
    }
    for c in singles.iter().filter(|c| !is_class_special(**c)) {
        body.push(*c);
    }
    if singles.contains(&'!') {
        body.push('!');
    }
    if singles.contains(&'-') {
        body.push('-');
    }

    if !negated && body.starts_with('!') {
        // only `!` and maybe `-` are left
        if body.len() == 1 {
            return body;
        }
        body = format!("{}!", &body[1..]);
    }

    match (negated, body.is_empty()) {
        (true, true) => "?".to_string(),
        (false, true) => "[!\u{0}-\u{10FFFF}]".to_string(),
        (true, false) => format!("[!{}]", body),
        (false, false) => format!("[{}]", body),
    }
}

fn syntax_error(source: &str, pos: usize, message: &'static str) -> PatternSyntaxError {
    PatternSyntaxError {
        pattern: source.to_string(),
        pos,
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(pattern: &str) -> BaseNameMatcher {
        BaseNameMatcher::new(pattern).unwrap()
    }

    #[test]
    fn test_star_and_question() {
        let m = matcher("*.txt");
        assert!(m.matches_name("a.txt"));
        assert!(m.matches_name(".txt"));
        assert!(!m.matches_name("a.txt.bak"));

        let m = matcher("file?.rs");
        assert!(m.matches_name("file1.rs"));
        assert!(!m.matches_name("file12.rs"));
    }

    #[test]
    fn test_leading_dot_needs_no_literal() {
        assert!(matcher("*rc").matches_name(".bashrc"));
    }

    #[test]
    fn test_character_classes() {
        let m = matcher("[ab]*.md");
        assert!(m.matches_name("alpha.md"));
        assert!(m.matches_name("beta.md"));
        assert!(!m.matches_name("gamma.md"));

        let negated = matcher("[^ab]*.md");
        assert!(negated.matches_name("gamma.md"));
        assert!(!negated.matches_name("alpha.md"));

        let bang = matcher("[!ab]*.md");
        assert!(bang.matches_name("gamma.md"));

        let range = matcher("log[0-9].txt");
        assert!(range.matches_name("log7.txt"));
        assert!(!range.matches_name("logx.txt"));
    }

    #[test]
    fn test_escape_outside_class() {
        let m = matcher(r"what\?.txt");
        assert!(m.matches_name("what?.txt"));
        assert!(!m.matches_name("whatx.txt"));

        assert!(matcher(r"\*").matches_name("*"));
        assert!(!matcher(r"\*").matches_name("a"));
    }

    #[test]
    fn test_escaped_bracket_inside_class() {
        let m = matcher(r"[a\]]");
        assert!(m.matches_name("]"));
        assert!(m.matches_name("a"));
        assert!(!m.matches_name("a]"));

        let negated = matcher(r"[^\]]");
        assert!(negated.matches_name("x"));
        assert!(!negated.matches_name("]"));
    }

    #[test]
    fn test_escaped_dash_inside_class() {
        let m = matcher(r"[a\-z]");
        assert!(m.matches_name("a"));
        assert!(m.matches_name("-"));
        assert!(m.matches_name("z"));
        assert!(!m.matches_name("b"));

        let trailing = matcher("[ab-]");
        assert!(trailing.matches_name("-"));
        assert!(!trailing.matches_name("c"));
    }

    #[test]
    fn test_range_with_special_endpoint() {
        let m = matcher(r"[\!-#]x");
        assert!(m.matches_name("!x"));
        assert!(m.matches_name("\"x"));
        assert!(m.matches_name("#x"));
        assert!(!m.matches_name("$x"));

        let bang = matcher(r"[\!]");
        assert!(bang.matches_name("!"));
        assert!(!bang.matches_name("a"));
    }

    #[test]
    fn test_leading_bracket_is_a_member() {
        let m = matcher("[]a].txt");
        assert!(m.matches_name("].txt"));
        assert!(m.matches_name("a.txt"));
    }

    #[test]
    fn test_double_star_is_plain_star() {
        let m = matcher("**.txt");
        assert!(m.matches_name("notes.txt"));
        assert!(!m.matches_name("notes.md"));
    }

    #[test]
    fn test_matches_base_name_only() {
        let m = matcher("*.txt");
        assert!(m.matches_path(Path::new("deep/nested.d/dir/a.txt")));
        assert!(!m.matches_path(Path::new("dir.txt/a.md")));

        let exact = matcher("a.txt");
        assert!(exact.matches_path(Path::new("some/dir/a.txt")));
    }

    #[test]
    fn test_malformed_patterns() {
        let err = BaseNameMatcher::new("[abc").unwrap_err();
        assert_eq!(err.pattern, "[abc");
        assert_eq!(err.message, "unterminated character class");
        assert_eq!(err.pos, 0);

        assert!(BaseNameMatcher::new(r"[a\").is_err());

        let err = BaseNameMatcher::new(r"abc\").unwrap_err();
        assert_eq!(err.message, "trailing escape character");
        assert_eq!(err.pos, 3);
    }
}
