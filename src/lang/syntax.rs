use crate::{
    lang::{
        source_buffer::SourceLines,
        tokenizing::{Token, TokenList},
    },
    runtime::error::{self, CompileDiagnostic, ScriptError},
};

/// The inline label printed next to the caret when the offending token sits far enough into its
/// line for the label to fit.
pub const ERROR_LABEL: &str = "The Error is Here";

/// Render the caret line that points at a token's first character.  The caret is aligned under
/// the given 0 based character offset.  When there is room to its left the label is right
/// aligned so that it ends just before the caret.
pub fn pointer_line(start: usize) -> String {
    if start > ERROR_LABEL.len() {
        format!(
            "{}{} ^",
            " ".repeat(start - ERROR_LABEL.len() - 1),
            ERROR_LABEL
        )
    } else {
        format!("{}^", " ".repeat(start))
    }
}

/// Build a positioned compile diagnostic for the given token, reproducing the offending source
/// line with the caret pointer underneath it.
pub fn diagnostic(message: &str, token: &Token, lines: &SourceLines) -> ScriptError {
    ScriptError::Compile(CompileDiagnostic::new(
        message.to_string(),
        Some(token.location()),
        lines.line(token.line).map(|line| line.to_string()),
        Some(pointer_line(token.start)),
    ))
}

/// Walk the flattened token stream enforcing the two stream-shape rules, failing fast with a
/// positioned diagnostic on the first violation:
///
/// 1. No token may appear before a block header has been seen.
/// 2. A token beginning with a quote character must also end with one.  This catches string
///    literals that were broken apart by the scanner's word-boundary fallback.
pub fn check(tokens: &TokenList, lines: &SourceLines) -> error::Result<()> {
    let mut block_seen = false;

    for token in tokens {
        if token.is_block_header() {
            block_seen = true;
            continue;
        }

        if !block_seen {
            return Err(diagnostic(
                "Code found before any block declaration.",
                token,
                lines,
            ));
        }

        if token.text.starts_with('"')
            && (token.text.chars().count() < 2 || !token.text.ends_with('"'))
        {
            return Err(diagnostic("Unterminated string literal.", token, lines));
        }
    }

    Ok(())
}
