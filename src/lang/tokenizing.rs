use crate::lang::source_buffer::SourceLocation;
use std::fmt::{self, Display, Formatter};

/// A token is a simple unit of the language.  Each token records the 1 based line it was found on
/// and the 0 based character offsets of its first character and of the character just past its
/// last one.  The offsets are what the diagnostics use to point back into the offending line.
///
/// Tokens are immutable once created.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    /// The 1 based line number the token was found on.
    pub line: usize,

    /// The 0 based character offset of the token's first character within its line.
    pub start: usize,

    /// The 0 based character offset just past the token's last character.
    pub end: usize,

    /// The raw text of the token.  String literals keep their surrounding quotes and block
    /// headers keep their leading colon.
    pub text: String,
}

/// Make sure that the tokens are nicely printable for debugging purposes.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl Token {
    /// Get the token's location in the original source text.
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.start + 1)
    }

    /// Check if the token declares a new callable block.
    pub fn is_block_header(&self) -> bool {
        self.text.starts_with(':')
    }

    /// The declared block name of a header token.  Everything past the colon, trimmed.
    pub fn header_name(&self) -> &str {
        self.text[1..].trim()
    }
}

/// A list of tokens found in the source code.
pub type TokenList = Vec<Token>;

/// Replace every parenthesized comment with spaces.  Comments are non-greedy, the first closing
/// parenthesis ends the comment, and they may span multiple lines.  New lines inside a comment
/// are kept so that the line and column positions of everything that follows stay valid for the
/// diagnostics.  An unterminated comment is left in place untouched.
pub fn strip_comments(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut result = String::with_capacity(source.len());
    let mut index = 0;

    while index < chars.len() {
        if chars[index] == '(' {
            if let Some(length) = chars[index..].iter().position(|next| *next == ')') {
                for offset in 0..=length {
                    match chars[index + offset] {
                        '\n' => result.push('\n'),
                        _ => result.push(' '),
                    }
                }

                index += length + 1;
                continue;
            }
        }

        result.push(chars[index]);
        index += 1;
    }

    result
}

/// Scan one line of source text into tokens.  Three syntactic classes are matched, in priority
/// order: a block header, (a colon followed by the block's name,) a double quoted string literal,
/// and finally a maximal run of non-whitespace characters.
///
/// A string literal may contain any character except an unescaped closing quote.  If the closing
/// quote is missing the opening quote falls back to the word rule, and the syntax checker will
/// report the broken literal.
fn scan_line(line_number: usize, text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut index = 0;

    // Pull a maximal run of non-whitespace characters starting at the given offset.
    let scan_word = |start: usize| -> (usize, String) {
        let mut end = start;
        let mut word = String::new();

        while end < chars.len() && !chars[end].is_whitespace() {
            word.push(chars[end]);
            end += 1;
        }

        (end, word)
    };

    while index < chars.len() {
        if chars[index].is_whitespace() {
            index += 1;
            continue;
        }

        let start = index;
        let text: String;

        if chars[index] == ':' {
            // A block header covers the colon and the name word that follows it.
            index += 1;

            while index < chars.len() && chars[index].is_whitespace() {
                index += 1;
            }

            let (end, _) = scan_word(index);

            index = end;
            text = chars[start..index].iter().collect();
        } else if chars[index] == '"' {
            // Try for a complete string literal first.
            let mut end = index + 1;
            let mut value = String::from("\"");
            let mut closed = false;

            while end < chars.len() {
                if chars[end] == '\\' && end + 1 < chars.len() && chars[end + 1] == '"' {
                    value.push('"');
                    end += 2;
                    continue;
                }

                if chars[end] == '"' {
                    closed = true;
                    break;
                }

                value.push(chars[end]);
                end += 1;
            }

            if closed {
                value.push('"');
                index = end + 1;
                text = value;
            } else {
                // No closing quote on this line, fall back to the word rule.
                let (end, word) = scan_word(start);

                index = end;
                text = word;
            }
        } else {
            let (end, word) = scan_word(start);

            index = end;
            text = word;
        }

        tokens.push(Token {
            line: line_number,
            start,
            end: index,
            text,
        });
    }

    tokens
}

/// Scan source text into per-line token groups.  Blank lines produce empty groups.
///
/// The first line of the text is numbered `first_line`, and the tokens on that first line have
/// their offsets shifted by `first_column`.  This lets the compiler hand over a slice of the
/// original source while keeping every token's position valid against the full text.
pub fn scan_lines(source: &str, first_line: usize, first_column: usize) -> Vec<Vec<Token>> {
    let mut groups = Vec::new();

    for (index, line) in source.lines().enumerate() {
        let mut tokens = scan_line(first_line + index, line);

        if index == 0 && first_column > 0 {
            for token in tokens.iter_mut() {
                token.start += first_column;
                token.end += first_column;
            }
        }

        groups.push(tokens);
    }

    groups
}

/// Flatten the per-line token groups into one linear token stream for the downstream stages.
pub fn flatten(groups: Vec<Vec<Token>>) -> TokenList {
    groups.into_iter().flatten().collect()
}

/// Scan source text and flatten the result into one linear token stream.  Comments are expected
/// to have been stripped already.
pub fn tokenize(source: &str, first_line: usize, first_column: usize) -> TokenList {
    flatten(scan_lines(source, first_line, first_column))
}
