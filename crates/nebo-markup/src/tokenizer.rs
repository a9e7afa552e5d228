//! Tokenizer for `<tag>` style markup.
//!
//! Produces text runs, opening tags and closing tags. Anything between `<`
//! and `>` that is not a well-formed tag is returned as text, so tokenizing
//! never fails.

use std::borrow::Cow;

/// A tag as written in the source, split into name and arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TagToken<'a> {
    /// The full source text of the tag, including the angle brackets.
    pub raw: &'a str,
    /// Lowercased tag name (`#` included for hex colors).
    pub name: String,
    /// Arguments after the name, unquoted.
    pub args: Vec<String>,
    /// Whether the tag was written `<!name>`.
    pub negated: bool,
}

/// Token types produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Plain text content, with `\<` escapes already resolved.
    Text(Cow<'a, str>),
    /// Opening tag: `<name:args>`
    Open(TagToken<'a>),
    /// Closing tag: `</name>`
    Close(TagToken<'a>),
}

pub(crate) struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Checks if a string is a valid tag name.
    ///
    /// Names start with a letter, underscore or `#` and continue with
    /// letters, digits, underscores or hyphens. Case is ignored.
    pub fn is_valid_tag_name(s: &str) -> bool {
        let mut chars = s.chars();
        let Some(first) = chars.next() else {
            return false;
        };

        if !first.is_ascii_alphabetic() && first != '_' && first != '#' {
            return false;
        }

        chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }

    /// Finds the `>` ending a tag that starts at `start` (the `<`), skipping
    /// over quoted arguments. Returns the byte offset of the `>`.
    fn find_tag_end(&self, start: usize) -> Option<usize> {
        let bytes = self.input.as_bytes();
        let mut quote: Option<u8> = None;
        let mut i = start + 1;
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
                    b'\'' | b'"' => quote = Some(b),
                    b'>' => return Some(i),
                    // A new tag start before the end means this one is text.
                    b'<' => return None,
                    _ => {}
                },
            }
            i += 1;
        }
        None
    }

    /// Splits tag content on `:` outside quotes, unquoting each part.
    fn split_args(content: &str) -> Vec<String> {
        let mut parts = Vec::new();
        let mut current = String::new();
        let mut quote: Option<char> = None;
        let mut chars = content.chars();

        while let Some(c) = chars.next() {
            match quote {
                Some(q) => {
                    if c == '\\' {
                        match chars.next() {
                            Some(next) if next == q || next == '\\' => current.push(next),
                            Some(next) => {
                                current.push('\\');
                                current.push(next);
                            }
                            None => current.push('\\'),
                        }
                    } else if c == q {
                        quote = None;
                    } else {
                        current.push(c);
                    }
                }
                None => match c {
                    '\'' | '"' if current.is_empty() => quote = Some(c),
                    ':' => parts.push(std::mem::take(&mut current)),
                    _ => current.push(c),
                },
            }
        }
        parts.push(current);
        parts
    }

    fn parse_tag(raw: &'a str) -> Option<Token<'a>> {
        let content = &raw[1..raw.len() - 1];
        let (closing, content) = match content.strip_prefix('/') {
            Some(rest) => (true, rest),
            None => (false, content),
        };
        let (negated, content) = match content.strip_prefix('!') {
            Some(rest) if !closing => (true, rest),
            _ => (false, content),
        };

        let mut parts = Self::split_args(content).into_iter();
        let name = parts.next()?;
        if !Self::is_valid_tag_name(&name) {
            return None;
        }

        let tag = TagToken {
            raw,
            name: name.to_ascii_lowercase(),
            args: parts.collect(),
            negated,
        };
        Some(if closing {
            Token::Close(tag)
        } else {
            Token::Open(tag)
        })
    }

    /// Reads text up to the next unescaped `<`, resolving `\<` escapes.
    fn read_text(&mut self) -> Cow<'a, str> {
        let rest = &self.input[self.pos..];
        let bytes = rest.as_bytes();
        let mut owned: Option<String> = None;
        let mut segment_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'<' => break,
                b'\\' if bytes.get(i + 1) == Some(&b'<') => {
                    let buf = owned.get_or_insert_with(String::new);
                    buf.push_str(&rest[segment_start..i]);
                    buf.push('<');
                    i += 2;
                    segment_start = i;
                }
                _ => i += 1,
            }
        }

        self.pos += i;
        match owned {
            Some(mut buf) => {
                buf.push_str(&rest[segment_start..i]);
                Cow::Owned(buf)
            }
            None => Cow::Borrowed(&rest[..i]),
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.input.len() {
            return None;
        }

        if self.input.as_bytes()[self.pos] == b'<' {
            if let Some(end) = self.find_tag_end(self.pos) {
                let raw = &self.input[self.pos..=end];
                if let Some(token) = Self::parse_tag(raw) {
                    self.pos = end + 1;
                    return Some(token);
                }
            }
            // Not a tag: emit the `<` as text and continue after it.
            self.pos += 1;
            return Some(Token::Text(Cow::Borrowed("<")));
        }

        Some(Token::Text(self.read_text()))
    }
}
