use crate::{
    lang::{
        code::{Callable, Instruction, Program},
        control_flow, source_buffer,
        source_buffer::SourceLines,
        syntax,
        tokenizing::{self, Token},
    },
    runtime::error::{self, CompileDiagnostic, ScriptError},
};

/// Build a positioned diagnostic for a problem found in the variable header, pointing at the
/// first character of the offending line.
fn header_diagnostic(message: &str, line_number: usize, lines: &SourceLines) -> ScriptError {
    let source_line = lines.line(line_number).map(|line| line.to_string());

    let start = source_line
        .as_deref()
        .and_then(|line| line.find(|next: char| !next.is_whitespace()))
        .unwrap_or(0);

    ScriptError::Compile(CompileDiagnostic::new(
        message.to_string(),
        Some(source_buffer::SourceLocation::new(line_number, start + 1)),
        source_line,
        Some(syntax::pointer_line(start)),
    ))
}

/// Parse the variable header that precedes the first block declaration.  Each non-empty line
/// declares one variable as a pair of words, the kind followed by the name.  A kind of `lvar`
/// declares the variable local to every block, anything else declares it global.
fn parse_variable_header(
    header: &str,
    lines: &SourceLines,
) -> error::Result<(Vec<String>, Vec<String>)> {
    let mut local_variables = Vec::new();
    let mut global_variables = Vec::new();

    for (index, line) in header.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let words: Vec<&str> = line.split_whitespace().collect();

        if words.len() != 2 {
            return Err(header_diagnostic(
                "Malformed variable declaration.",
                index + 1,
                lines,
            ));
        }

        let name = words[1].to_string();

        match words[0] {
            "lvar" => local_variables.push(name),
            _ => global_variables.push(name),
        }
    }

    Ok((local_variables, global_variables))
}

/// Classify one non-structural token into its payload instruction.
fn classify(token: &Token) -> Instruction {
    if let Ok(value) = token.text.parse::<f64>() {
        return Instruction::Number(value);
    }

    if token.text.len() >= 2 && token.text.starts_with('"') && token.text.ends_with('"') {
        return Instruction::Text(token.text[1..token.text.len() - 1].to_string());
    }

    Instruction::Word(token.text.clone())
}

/// Group the token stream into named blocks, resolve each block's control flow, and publish the
/// results into a program.
///
/// A block header implicitly closes the block before it, so a missing `;` only ever swallows
/// the end of the final block.  An open block left at the end of the stream is published as is.
fn build_blocks(
    tokens: &[Token],
    lines: &SourceLines,
    local_variables: &[String],
    global_variables: &[String],
) -> error::Result<Program> {
    let mut program = Program::new();
    let mut current: Option<(String, Vec<Instruction>)> = None;

    let publish = |program: &mut Program, name: String, payload: Vec<Instruction>| {
        let payload = control_flow::resolve_block(&name, payload)?;

        program.insert(Callable::new(
            name,
            payload,
            local_variables.to_vec(),
            global_variables.to_vec(),
        ));

        error::Result::Ok(())
    };

    for token in tokens {
        if token.is_block_header() {
            if let Some((name, payload)) = current.take() {
                publish(&mut program, name, payload)?;
            }

            let name = token.header_name();

            if name.is_empty() {
                return Err(syntax::diagnostic(
                    "Block declaration is missing a name.",
                    token,
                    lines,
                ));
            }

            if program.contains(name) {
                return Err(syntax::diagnostic(
                    &format!("A block named '{}' has already been declared.", name),
                    token,
                    lines,
                ));
            }

            current = Some((name.to_string(), Vec::new()));
            continue;
        }

        if token.text == ";" {
            match current.take() {
                Some((name, payload)) => publish(&mut program, name, payload)?,

                None => {
                    return Err(syntax::diagnostic(
                        "Block terminator found outside of a block.",
                        token,
                        lines,
                    ));
                }
            }

            continue;
        }

        match current.as_mut() {
            Some((_, payload)) => payload.push(classify(token)),

            // Code before the first header is rejected by the syntax check, but a stray token
            // can still follow a terminated block.
            None => {
                return Err(syntax::diagnostic(
                    "Code found outside of a block.",
                    token,
                    lines,
                ));
            }
        }
    }

    if let Some((name, payload)) = current.take() {
        if !payload.is_empty() {
            publish(&mut program, name, payload)?;
        }
    }

    Ok(program)
}

/// Compile source text into a program of callable blocks.
///
/// The text is split at the first colon.  Everything before it is the variable header, and
/// everything from the colon on is block code.  The block code is tokenized with its original
/// line and column positions so that every diagnostic points back into the full source text.
pub fn compile(source: &str) -> error::Result<Program> {
    let stripped = tokenizing::strip_comments(source);
    let lines = SourceLines::new(&stripped);

    let (header, body, first_line, first_column) = match stripped.find(':') {
        Some(position) => {
            let header = &stripped[..position];
            let first_line = header.matches('\n').count() + 1;

            let line_start = header.rfind('\n').map(|index| index + 1).unwrap_or(0);
            let first_column = stripped[line_start..position].chars().count();

            (header, &stripped[position..], first_line, first_column)
        }

        // No block declaration at all.  Tokenize everything and let the syntax check report the
        // first stray token.
        None => ("", stripped.as_str(), 1, 0),
    };

    let (local_variables, global_variables) = parse_variable_header(header, &lines)?;

    let tokens = tokenizing::tokenize(body, first_line, first_column);

    syntax::check(&tokens, &lines)?;

    build_blocks(&tokens, &lines, &local_variables, &global_variables)
}
