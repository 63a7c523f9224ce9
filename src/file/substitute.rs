/// Literal byte-string replacement applied to one line at a time.
///
/// Lines are raw bytes so files need not be valid UTF-8. An empty `from`
/// matches at every character boundary, so replacing it inserts `to` before
/// each character and once at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    from: Vec<u8>,
    to: Vec<u8>,
}

impl Substitution {
    pub fn new(from: impl Into<Vec<u8>>, to: impl Into<Vec<u8>>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn contained_in(&self, line: &[u8]) -> bool {
        self.from.is_empty() || find(line, &self.from).is_some()
    }

    /// Replace every non-overlapping occurrence, scanning left to right.
    /// Appends the result to `out` and returns the number of replacements.
    pub fn replace_all(&self, line: &[u8], out: &mut Vec<u8>) -> usize {
        self.replace_n(line, usize::MAX, out)
    }

    /// Replace only the leftmost occurrence
    pub fn replace_first(&self, line: &[u8], out: &mut Vec<u8>) -> usize {
        self.replace_n(line, 1, out)
    }

    fn replace_n(&self, line: &[u8], limit: usize, out: &mut Vec<u8>) -> usize {
        if self.from.is_empty() {
            return self.insert_at_boundaries(line, limit, out);
        }

        let mut count = 0;
        let mut rest = line;
        while count < limit {
            match find(rest, &self.from) {
                Some(idx) => {
                    out.extend_from_slice(&rest[..idx]);
                    out.extend_from_slice(&self.to);
                    rest = &rest[idx + self.from.len()..];
                    count += 1;
                }
                None => break,
            }
        }
        out.extend_from_slice(rest);
        count
    }

    fn insert_at_boundaries(&self, line: &[u8], limit: usize, out: &mut Vec<u8>) -> usize {
        let mut count = 0;
        let mut pos = 0;
        while count < limit {
            out.extend_from_slice(&self.to);
            count += 1;
            if pos == line.len() {
                break;
            }
            let width = char_width(&line[pos..]);
            out.extend_from_slice(&line[pos..pos + width]);
            pos += width;
        }
        out.extend_from_slice(&line[pos..]);
        count
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Byte length of the UTF-8 character at the start of `bytes`; an invalid
/// sequence counts as a single byte.
fn char_width(bytes: &[u8]) -> usize {
    let width = match bytes[0] {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 1,
    };
    if width == 1 || width > bytes.len() || std::str::from_utf8(&bytes[..width]).is_err() {
        1
    } else {
        width
    }
}
