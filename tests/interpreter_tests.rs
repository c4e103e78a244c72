use muf::add_native_word;
use muf::lang::compiler;
use muf::runtime::data_structures::value::Value;
use muf::runtime::error::{self, Fault, ScriptError};
use muf::runtime::interpreter::muf_interpreter::MufInterpreter;
use muf::runtime::interpreter::{Interpreter, InterpreterStack, WordManagement};
use test_case::test_case;

/// Compile the source, run its main block to completion, and return the final operand stack.
fn run(source: &str) -> error::Result<Vec<Value>> {
    let program = compiler::compile(source)?;
    let mut interpreter = MufInterpreter::new();

    interpreter.register_program(&program);
    interpreter.call("main")?;

    Ok(interpreter.stack().clone())
}

fn run_ok(source: &str) -> Vec<Value> {
    run(source).expect("The script should run cleanly.")
}

fn numbers(values: &[f64]) -> Vec<Value> {
    values.iter().map(|value| Value::Number(*value)).collect()
}

#[test_case(": main 2 3 + ;", &[5.0]; "addition")]
#[test_case(": main 5 2 - ;", &[3.0]; "subtraction")]
#[test_case(": main 3 4 * ;", &[12.0]; "multiplication")]
#[test_case(": main 13 5 % ;", &[3.0]; "modulo")]
#[test_case(": main 7 2 / ;", &[3.0]; "division truncates")]
#[test_case(": main -7 2 / ;", &[-3.0]; "division truncates towards zero")]
#[test_case(": main \"4\" 2 + ;", &[6.0]; "numeric strings coerce")]
fn arithmetic_operations(source: &str, expected: &[f64]) {
    assert_eq!(run_ok(source), numbers(expected));
}

#[test_case(": main 1 2 swap ;", &[2.0, 1.0]; "swap")]
#[test_case(": main 5 dup ;", &[5.0, 5.0]; "dup")]
#[test_case(": main 1 2 pop ;", &[1.0]; "pop")]
#[test_case(": main 1 2 over ;", &[1.0, 2.0, 1.0]; "over")]
#[test_case(": main 1 2 3 rot ;", &[2.0, 3.0, 1.0]; "rot")]
fn stack_shuffling_operations(source: &str, expected: &[f64]) {
    assert_eq!(run_ok(source), numbers(expected));
}

#[test_case(": main 1 2 < ;", true; "less than")]
#[test_case(": main 2 2 <= ;", true; "less or equal")]
#[test_case(": main 3 2 > ;", true; "greater than")]
#[test_case(": main 1 2 >= ;", false; "greater or equal")]
#[test_case(": main \"a\" \"a\" = ;", true; "string equality")]
#[test_case(": main \"a\" \"b\" = ;", false; "string inequality")]
#[test_case(": main 0 1 = ;", false; "numeric inequality")]
#[test_case(": main 1 0 > not ;", false; "not inverts")]
fn comparison_operations(source: &str, expected: bool) {
    assert_eq!(run_ok(source), vec![Value::Bool(expected)]);
}

#[test]
fn an_if_takes_the_true_branch() {
    let stack = run_ok(": main 10 5 > if \"big\" else \"small\" then ;");

    assert_eq!(stack, vec![Value::Text("big".to_string())]);
}

#[test]
fn an_if_takes_the_false_branch() {
    let stack = run_ok(": main 2 5 > if \"big\" else \"small\" then ;");

    assert_eq!(stack, vec![Value::Text("small".to_string())]);
}

#[test]
fn an_if_without_an_else_skips_its_body() {
    assert_eq!(run_ok(": main 0 if 1 then 2 ;"), numbers(&[2.0]));
}

#[test]
fn nested_ifs_resolve_independently() {
    assert_eq!(run_ok(": main 1 if 1 if 10 then then ;"), numbers(&[10.0]));
}

#[test]
fn a_begin_until_loop_runs_until_its_condition_holds() {
    assert_eq!(run_ok(": main 0 begin 1 + dup 5 >= until ;"), numbers(&[5.0]));
}

#[test]
fn a_begin_while_repeat_loop_exits_past_its_then() {
    let stack = run_ok(": main 0 begin dup 5 >= while 1 + repeat then 99 ;");

    assert_eq!(stack, numbers(&[5.0, 99.0]));
}

#[test]
fn runaway_executions_are_cut_off_at_the_ceiling() {
    let program = compiler::compile(": main begin 0 until ;").unwrap();
    let mut interpreter = MufInterpreter::new();

    interpreter.register_program(&program);
    interpreter.set_command_maximum(50);

    let error = interpreter.call("main").unwrap_err();

    assert_eq!(error.fault(), Some(&Fault::RunawayExecution(50)));
    assert_eq!(interpreter.command_count(), 50);
}

#[test]
fn strcat_coerces_both_operands_to_text() {
    let stack = run_ok(": main \"count: \" 12 strcat ;");

    assert_eq!(stack, vec![Value::Text("count: 12".to_string())]);
}

#[test]
fn global_variables_survive_in_the_global_scope() {
    let program = compiler::compile("var x\n: main 5 \"x\" ! \"x\" @ ;").unwrap();
    let mut interpreter = MufInterpreter::new();

    interpreter.register_program(&program);
    interpreter.call("main").unwrap();

    assert_eq!(interpreter.stack(), &numbers(&[5.0]));
    assert_eq!(
        interpreter.global_variables().get("x"),
        Some(&Value::Number(5.0))
    );
}

#[test]
fn local_variables_stay_out_of_the_global_scope() {
    let program = compiler::compile("lvar t\n: main 7 \"t\" ! \"t\" @ ;").unwrap();
    let mut interpreter = MufInterpreter::new();

    interpreter.register_program(&program);
    interpreter.call("main").unwrap();

    assert_eq!(interpreter.stack(), &numbers(&[7.0]));
    assert!(interpreter.global_variables().get("t").is_none());
}

#[test]
fn a_declared_local_shadows_globals_even_before_it_is_set() {
    let error = run("lvar t\n: main \"t\" @ ;").unwrap_err();

    assert_eq!(error.fault(), Some(&Fault::UnknownVariable("t".to_string())));
}

#[test_case(": main bogus ;", Fault::UnknownOperation("bogus".to_string()); "unknown operation")]
#[test_case(": main \"q\" @ ;", Fault::UnknownVariable("q".to_string()); "unknown variable")]
#[test_case(": main 1 0 / ;", Fault::DivideByZero; "divide by zero")]
#[test_case(": main 1 0 % ;", Fault::DivideByZero; "modulo by zero")]
#[test_case(": main + ;", Fault::StackUnderflow; "stack underflow")]
#[test_case(": main 1 until ;", Fault::LoopStackUnderflow; "loop exit outside a loop")]
#[test_case(": main return ;", Fault::CallStackUnderflow; "return without a caller")]
#[test_case(": main \"gone\" call ;", Fault::UnknownCallable("gone".to_string()); "call of a missing block")]
#[test_case(": main \"x\" 1 + ;", Fault::NotANumber("x".to_string()); "text that is not numeric")]
fn faults_surface_as_fatal_errors(source: &str, expected: Fault) {
    assert_eq!(run(source).unwrap_err().fault(), Some(&expected));
}

#[test]
fn calls_run_the_named_block_and_resume_after() {
    let stack = run_ok(": main 25 \"helper\" call ;\n: helper 2 * ;");

    assert_eq!(stack, numbers(&[50.0]));
}

#[test]
fn an_explicit_return_skips_the_rest_of_the_callee() {
    let stack = run_ok(": main \"helper\" call 1 ;\n: helper return 99 ;");

    assert_eq!(stack, numbers(&[1.0]));
}

#[test]
fn exit_stops_the_execution_immediately() {
    assert_eq!(run_ok(": main 1 exit 2 ;"), numbers(&[1.0]));
}

#[test]
fn print_pops_the_value_it_prints() {
    assert!(run_ok(": main 5 print ;").is_empty());
}

#[test]
fn the_end_to_end_examples_leave_a_clean_stack() {
    assert!(run_ok(": main 2 3 + print ;").is_empty());
    assert!(run_ok(": main 5 3 > if \"big\" else \"small\" then print ;").is_empty());
}

#[test]
fn the_stack_dump_leaves_the_stack_alone() {
    assert_eq!(run_ok(": main 1 2 _stack ;"), numbers(&[1.0, 2.0]));
}

#[test]
fn random_pushes_a_whole_32_bit_number() {
    let stack = run_ok(": main random ;");

    assert_eq!(stack.len(), 1);

    match &stack[0] {
        Value::Number(value) => {
            assert!(*value >= 0.0);
            assert!(*value < 4294967296.0);
            assert_eq!(value.fract(), 0.0);
        }

        other => panic!("Expected a number, got {:?}.", other),
    }
}

#[test]
fn a_cycle_quota_pauses_and_resumes_the_execution() {
    let program = compiler::compile(": main 1 2 3 4 5 ;").unwrap();
    let mut interpreter = MufInterpreter::new();

    interpreter.register_program(&program);
    interpreter.set_cycle_ops(Some(2));

    assert!(!interpreter.call("main").unwrap());
    assert_eq!(interpreter.stack(), &numbers(&[1.0, 2.0]));

    assert!(!interpreter.update().unwrap());
    assert!(interpreter.update().unwrap());
    assert_eq!(interpreter.stack(), &numbers(&[1.0, 2.0, 3.0, 4.0, 5.0]));
}

fn word_double(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop_as_int()?;

    interpreter.push(Value::Number((value * 2) as f64));
    Ok(())
}

#[test]
fn native_words_can_be_added_by_the_host() {
    let program = compiler::compile(": main 21 double ;").unwrap();
    let mut interpreter = MufInterpreter::new();

    add_native_word!(interpreter, "double", word_double, "Double the top value.");

    interpreter.register_program(&program);
    interpreter.call("main").unwrap();

    assert_eq!(interpreter.stack(), &numbers(&[42.0]));
}

#[test]
fn calling_an_unknown_block_is_a_host_error() {
    let mut interpreter = MufInterpreter::new();

    match interpreter.call("missing") {
        Err(ScriptError::Type(message)) => assert!(message.contains("missing")),
        other => panic!("Expected a host error, got {:?}.", other),
    }
}

#[test]
fn fatal_reports_carry_the_full_execution_context() {
    let program = compiler::compile(": main 1 0 / ;").unwrap();
    let mut interpreter = MufInterpreter::new();

    interpreter.register_program(&program);

    match interpreter.call("main").unwrap_err() {
        ScriptError::Fatal(report) => {
            assert_eq!(report.fault, Fault::DivideByZero);
            assert_eq!(report.callable_name, "main");
            assert_eq!(report.pointer, "2 (/)");
            assert!(!report.snapshots.is_empty());
            assert!(report.disassembly.contains("Callable 'main'"));
        }

        other => panic!("Expected a fatal report, got {:?}.", other),
    }
}
