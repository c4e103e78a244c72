use crate::{
    lang::code::Instruction,
    runtime::error::{self, CompileDiagnostic, ScriptError},
};

/// A fully matched `if`/`else`/`then` group, recorded by original payload index.
struct IfMatch {
    if_index: usize,
    else_index: Option<usize>,
    then_index: usize,
}

/// A `while` and the free `then` it was matched with.
struct WhileMatch {
    while_index: usize,
    then_index: usize,
}

fn resolve_error(name: &str, message: &str) -> ScriptError {
    ScriptError::Compile(CompileDiagnostic::bare(format!(
        "In block '{}': {}",
        name, message
    )))
}

/// Match up the control-flow markers in a block's payload.
///
/// `if`/`else`/`then` groups nest, so they are matched with a simple open-group stack.  An
/// `else` fills the innermost open group, and a `then` closes it.  A `then` with no open group
/// is free, available to terminate a `while`.  Each `while` claims the nearest free `then` that
/// follows it.  A free `then` that no `while` claims is left alone and executes as a no-op.
fn match_markers(
    name: &str,
    payload: &[Instruction],
) -> error::Result<(Vec<IfMatch>, Vec<WhileMatch>)> {
    let mut open: Vec<(usize, Option<usize>)> = Vec::new();
    let mut if_matches = Vec::new();
    let mut free_thens: Vec<(usize, bool)> = Vec::new();
    let mut while_indices = Vec::new();

    for (index, instruction) in payload.iter().enumerate() {
        if instruction.is_word("if") {
            open.push((index, None));
        } else if instruction.is_word("else") {
            match open.last_mut() {
                Some((_, slot @ None)) => *slot = Some(index),

                Some((_, Some(_))) => {
                    return Err(resolve_error(name, "Duplicate 'else' in an 'if' block."));
                }

                None => {
                    return Err(resolve_error(name, "'else' without a matching 'if'."));
                }
            }
        } else if instruction.is_word("then") {
            match open.pop() {
                Some((if_index, else_index)) => if_matches.push(IfMatch {
                    if_index,
                    else_index,
                    then_index: index,
                }),

                None => free_thens.push((index, false)),
            }
        } else if instruction.is_word("while") {
            while_indices.push(index);
        }
    }

    if !open.is_empty() {
        return Err(resolve_error(name, "'if' without a matching 'then'."));
    }

    // Each while exits forward to the nearest unclaimed free then after it.
    let mut while_matches = Vec::new();

    for while_index in while_indices {
        let claim = free_thens
            .iter_mut()
            .find(|(then_index, claimed)| *then_index > while_index && !*claimed);

        match claim {
            Some((then_index, claimed)) => {
                *claimed = true;

                while_matches.push(WhileMatch {
                    while_index,
                    then_index: *then_index,
                });
            }

            None => {
                return Err(resolve_error(name, "'while' without a matching 'then'."));
            }
        }
    }

    Ok((if_matches, while_matches))
}

/// Resolve the control-flow markers of a block's payload into explicit relative jumps.
///
/// Every `if`, `else`, and `while` gets a numeric literal inserted just before it holding the
/// relative distance its operation will jump by at run time.  An `if` jumps past its false
/// branch when the condition is false, an `else` becomes an unconditional `jump` past the rest
/// of the group, a `while` jumps past the loop when its condition is true, and every matched
/// `then` becomes a `nop` landing pad.
///
/// All distances are final once this pass completes.  Nothing re-scans the payload at run time.
pub fn resolve_block(name: &str, payload: Vec<Instruction>) -> error::Result<Vec<Instruction>> {
    let (if_matches, while_matches) = match_markers(name, &payload)?;

    // Rebuild the payload with the jump distance placeholders inserted, keeping a map from
    // original index to the marker's new position.
    let mut resolved = Vec::with_capacity(payload.len() + if_matches.len() * 2);
    let mut new_index = vec![0usize; payload.len()];

    for (index, instruction) in payload.into_iter().enumerate() {
        let is_marker_needing_distance = instruction.is_word("if")
            || instruction.is_word("else")
            || instruction.is_word("while");

        if is_marker_needing_distance {
            resolved.push(Instruction::Number(0.0));
        }

        new_index[index] = resolved.len();

        if instruction.is_word("else") {
            resolved.push(Instruction::Word("jump".to_string()));
        } else {
            resolved.push(instruction);
        }
    }

    // Matched thens become landing pads.  Unclaimed free thens keep their word, which is
    // registered as a no-op.
    for if_match in &if_matches {
        resolved[new_index[if_match.then_index]] = Instruction::Word("nop".to_string());
    }

    for while_match in &while_matches {
        resolved[new_index[while_match.then_index]] = Instruction::Word("nop".to_string());
    }

    // Patch the distance placeholders now that every marker's final position is known.
    for if_match in &if_matches {
        let if_position = new_index[if_match.if_index];
        let past_then = new_index[if_match.then_index] + 1;

        let false_target = match if_match.else_index {
            Some(else_index) => new_index[else_index] + 1,
            None => past_then,
        };

        resolved[if_position - 1] = Instruction::Number((false_target - if_position) as f64);

        if let Some(else_index) = if_match.else_index {
            let jump_position = new_index[else_index];

            resolved[jump_position - 1] = Instruction::Number((past_then - jump_position) as f64);
        }
    }

    for while_match in &while_matches {
        let while_position = new_index[while_match.while_index];
        let past_then = new_index[while_match.then_index] + 1;

        resolved[while_position - 1] = Instruction::Number((past_then - while_position) as f64);
    }

    Ok(resolved)
}
