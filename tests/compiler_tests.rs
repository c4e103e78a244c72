use muf::lang::code::Instruction;
use muf::lang::compiler;
use muf::lang::source_buffer::SourceLocation;
use muf::lang::syntax;
use muf::lang::tokenizing;
use muf::runtime::error::ScriptError;
use test_case::test_case;

fn number(value: f64) -> Instruction {
    Instruction::Number(value)
}

fn word(name: &str) -> Instruction {
    Instruction::Word(name.to_string())
}

fn compile_payload(source: &str) -> Vec<Instruction> {
    let program = compiler::compile(source).expect("The source should compile.");

    program
        .get("main")
        .expect("The program should contain a main block.")
        .payload
        .clone()
}

fn compile_error(source: &str) -> String {
    match compiler::compile(source) {
        Ok(_) => panic!("The source should have failed to compile."),
        Err(error) => error.to_string(),
    }
}

#[test]
fn comments_are_stripped_without_moving_later_tokens() {
    let stripped = tokenizing::strip_comments("a ( note ) b");
    let tokens = tokenizing::tokenize(&stripped, 1, 0);

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].text, "a");
    assert_eq!(tokens[0].start, 0);
    assert_eq!(tokens[1].text, "b");
    assert_eq!(tokens[1].start, 11);
}

#[test]
fn multi_line_comments_keep_line_positions() {
    let stripped = tokenizing::strip_comments("( one\ntwo ) x");
    let tokens = tokenizing::tokenize(&stripped, 1, 0);

    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text, "x");
    assert_eq!(tokens[0].line, 2);
    assert_eq!(tokens[0].start, 6);
}

#[test]
fn unterminated_comments_are_left_in_place() {
    assert_eq!(tokenizing::strip_comments("( still open"), "( still open");
}

#[test]
fn block_headers_scan_as_one_token() {
    let tokens = tokenizing::tokenize(": main 1 ;", 1, 0);

    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].text, ": main");
    assert!(tokens[0].is_block_header());
    assert_eq!(tokens[0].header_name(), "main");
    assert_eq!(tokens[1].text, "1");
    assert_eq!(tokens[2].text, ";");
}

#[test]
fn string_literals_keep_spaces_and_unescape_quotes() {
    let payload = compile_payload(r#": main "a \" b" print ;"#);

    assert_eq!(payload[0], Instruction::Text("a \" b".to_string()));
    assert_eq!(payload[1], word("print"));
}

#[test_case(2, "  ^"; "short prefix")]
#[test_case(0, "^"; "line start")]
#[test_case(20, "  The Error is Here ^"; "labeled pointer")]
fn pointer_lines_align_with_the_token(start: usize, expected: &str) {
    assert_eq!(syntax::pointer_line(start), expected);
}

#[test]
fn unterminated_strings_are_positioned_diagnostics() {
    let error = compiler::compile("var x : main \"bad ;");

    match error {
        Err(ScriptError::Compile(diagnostic)) => {
            assert_eq!(diagnostic.message, "Unterminated string literal.");
            assert_eq!(diagnostic.location, Some(SourceLocation::new(1, 14)));
            assert_eq!(diagnostic.source_line.as_deref(), Some("var x : main \"bad ;"));

            let expected_pointer = format!("{}^", " ".repeat(13));

            assert_eq!(diagnostic.pointer.as_deref(), Some(expected_pointer.as_str()));
        }

        other => panic!("Expected a compile diagnostic, got {:?}.", other),
    }
}

#[test_case("1 2 +", "Code found before any block declaration."; "no block at all")]
#[test_case(": main 1 ; 5", "Code found outside of a block."; "code after the last block")]
#[test_case(": main 1 ; ;", "Block terminator found outside of a block."; "stray terminator")]
#[test_case(":", "Block declaration is missing a name."; "nameless block")]
#[test_case("var\n: main 1 ;", "Malformed variable declaration."; "declaration missing a name")]
#[test_case("lvar a b\n: main 1 ;", "Malformed variable declaration."; "declaration with extras")]
fn structural_errors_are_reported(source: &str, expected: &str) {
    assert!(compile_error(source).contains(expected));
}

#[test]
fn variable_headers_split_into_scopes() {
    let program = compiler::compile("var count\nlvar temp\n: main 1 ;").unwrap();
    let main = program.get("main").unwrap();

    assert_eq!(main.global_variables, vec!["count".to_string()]);
    assert_eq!(main.local_variables, vec!["temp".to_string()]);
}

#[test]
fn simple_blocks_compile_to_flat_payloads() {
    let payload = compile_payload(": main 2 3 + print ;");

    assert_eq!(
        payload,
        vec![number(2.0), number(3.0), word("+"), word("print")]
    );
}

#[test]
fn an_unterminated_final_block_is_still_published() {
    let payload = compile_payload(": main 1 2");

    assert_eq!(payload, vec![number(1.0), number(2.0)]);
}

#[test]
fn a_new_header_closes_the_previous_block() {
    let program = compiler::compile(": first 1 : second 2 ;").unwrap();

    assert_eq!(program.get("first").unwrap().payload, vec![number(1.0)]);
    assert_eq!(program.get("second").unwrap().payload, vec![number(2.0)]);
}

#[test]
fn duplicate_block_names_fail_to_compile() {
    assert!(compile_error(": main 1 ; : main 2 ;").contains("already been declared"));
}

#[test]
fn an_if_resolves_to_a_skip_over_the_true_branch() {
    let payload = compile_payload(": main 0 if 1 then 2 ;");

    assert_eq!(
        payload,
        vec![
            number(0.0),
            number(3.0),
            word("if"),
            number(1.0),
            word("nop"),
            number(2.0),
        ]
    );
}

#[test]
fn an_if_else_resolves_both_jump_distances() {
    let payload = compile_payload(": main 1 if 2 else 3 then ;");

    assert_eq!(
        payload,
        vec![
            number(1.0),
            number(4.0),
            word("if"),
            number(2.0),
            number(3.0),
            word("jump"),
            number(3.0),
            word("nop"),
        ]
    );
}

#[test]
fn a_while_resolves_to_an_exit_past_its_then() {
    let payload = compile_payload(": main begin 1 while repeat then ;");

    assert_eq!(
        payload,
        vec![
            word("begin"),
            number(1.0),
            number(3.0),
            word("while"),
            word("repeat"),
            word("nop"),
        ]
    );
}

#[test_case(": main 1 if 2 ;", "'if' without a matching 'then'"; "unterminated if")]
#[test_case(": main else ;", "'else' without a matching 'if'"; "orphan else")]
#[test_case(": main 1 if else else then ;", "Duplicate 'else'"; "double else")]
#[test_case(": main begin 1 while repeat ;", "'while' without a matching 'then'"; "orphan while")]
fn control_flow_errors_are_reported(source: &str, expected: &str) {
    assert!(compile_error(source).contains(expected));
}

#[test]
fn disassembly_lists_one_instruction_per_line() {
    let program = compiler::compile(": main 2 \"hi\" + print ;").unwrap();
    let listing = program.get("main").unwrap().disassemble();

    assert_eq!(listing, "   0: 2\n   1: \"hi\"\n   2: +\n   3: print\n");
}
