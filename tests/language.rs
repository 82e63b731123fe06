use std::{cell::RefCell, fs, rc::Rc};

use sprig::{
    error::ErrorKind,
    evaluate_source,
    interpreter::{
        output::{OutputEvent, OutputKind},
        session::{Session, SessionConfig},
        value::core::Value,
    },
};
use walkdir::WalkDir;

#[test]
fn script_corpus_matches_expectations() {
    let mut count = 0;

    for entry in
        WalkDir::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/scripts")).sort_by_file_name()
                                                                          .into_iter()
                                                                          .filter_map(Result::ok)
                                                                          .filter(|e| {
                                                                              e.path()
                                                                               .extension()
                                                                               .is_some_and(|ext| ext == "sprig")
                                                                          })
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        count += 1;
        let (mut session, events) = recording_session(false);
        let _ = session.submit(&source);

        let actual: Vec<String> = events.borrow().iter().map(|e| e.text.clone()).collect();
        assert_eq!(actual, expectations(&source), "Unexpected output from {path:?}");
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

/// Collects the text after every `// expect: ` marker, in order.
fn expectations(source: &str) -> Vec<String> {
    source.lines()
          .filter_map(|line| line.split_once("// expect: "))
          .map(|(_, expected)| expected.trim_end().to_string())
          .collect()
}

fn recording_session(echo: bool) -> (Session, Rc<RefCell<Vec<OutputEvent>>>) {
    let session = Session::with_config(SessionConfig { echo_results: echo,
                                                       ..SessionConfig::default() });
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    session.register(move |event: &OutputEvent| sink.borrow_mut().push(event.clone()));
    (session, events)
}

fn assert_output(src: &str, expected: &[&str]) {
    match evaluate_source(src, true) {
        Ok(output) => assert_eq!(output, expected, "Unexpected output from script:\n{src}"),
        Err(e) => panic!("Script failed: {e}\n{src}"),
    }
}

fn assert_failure(src: &str, kind: ErrorKind) {
    match evaluate_source(src, true) {
        Ok(output) => panic!("Script succeeded with {output:?} but was expected to fail"),
        Err(e) => assert_eq!(e.kind(), kind, "Unexpected error: {e}"),
    }
}

#[test]
fn arithmetic_precedence() {
    assert_output("2 + 3 * 4", &["14"]);
    assert_output("(2 + 3) * 4", &["20"]);
    assert_output("10 - 4 - 3", &["3"]);
    assert_output("7 % 4 + -2", &["1"]);
    assert_output("1 / 4", &["0.25"]);
}

#[test]
fn declared_values_render_back() {
    assert_output("let n = 42; n", &["42"]);
    assert_output("let s = \"hello\"; s", &["hello"]);
    assert_output("let b = true; b", &["true"]);
    assert_output("let z; z", &["nil"]);
}

#[test]
fn block_scoping_shadows_and_restores() {
    assert_output("let x = 1; { let x = 2; print x } x", &["2", "1"]);
    assert_output("let x = 1; { x = 2 } x", &["2"]);
}

#[test]
fn division_by_zero_leaves_environment_unchanged() {
    let (mut session, events) = recording_session(true);
    session.submit("let x = 5").unwrap();

    let error = session.submit("x = 1 / 0").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Runtime);
    assert_eq!(session.globals().get("x"), Some(Value::Number(5.0)));

    let events = events.borrow();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, OutputKind::Error(ErrorKind::Runtime));
    assert_eq!(events[0].text, "Runtime error on line 1, column 7: Division by zero.");
}

#[test]
fn state_persists_across_submissions() {
    let (mut session, events) = recording_session(true);
    session.submit("let x = 1").unwrap();
    session.submit("x + 1").unwrap();
    session.submit("fun twice(n) { return n * 2 }").unwrap();
    session.submit("twice(x + 1)").unwrap();

    let texts: Vec<String> = events.borrow().iter().map(|e| e.text.clone()).collect();
    assert_eq!(texts, vec!["2", "4"]);
}

#[test]
fn every_listener_receives_each_event_once_in_order() {
    let session_log = Rc::new(RefCell::new(Vec::new()));
    let mut session = Session::new();
    for name in ["first", "second"] {
        let log = Rc::clone(&session_log);
        session.register(move |event: &OutputEvent| {
                   log.borrow_mut().push(format!("{name}:{}", event.text));
               });
    }

    session.submit("print 7").unwrap();

    assert_eq!(*session_log.borrow(), vec!["first:7", "second:7"]);
}

#[test]
fn parse_error_leaves_environment_as_it_was() {
    let (mut session, events) = recording_session(true);
    session.submit("let kept = 1").unwrap();

    assert_eq!(session.submit("let lost = 2; 1 +").unwrap_err().kind(), ErrorKind::Parse);
    assert_eq!(session.globals().get("lost"), None);
    assert!(events.borrow()[0].is_error());

    session.submit("kept").unwrap();
    assert_eq!(events.borrow()[1].text, "1");
}

#[test]
fn runtime_error_keeps_earlier_statements() {
    let (mut session, events) = recording_session(true);

    let error = session.submit("let y = 1; y + \"a\"").unwrap_err();
    assert_eq!(error.to_string(),
               "Runtime error on line 1, column 14: Type error: operands of '+' must be two \
                numbers or two strings, found number and string.");

    session.submit("y").unwrap();
    assert_eq!(events.borrow().last().map(|e| e.text.clone()), Some("1".to_string()));
}

#[test]
fn closures_capture_their_declaring_environment() {
    let src = "fun make_counter() {
                   let count = 0
                   fun counter() { count = count + 1; return count }
                   return counter
               }
               let a = make_counter()
               let b = make_counter()
               a(); a()
               print a()
               print b()";
    assert_output(src, &["1", "2", "3", "1"]);
}

#[test]
fn closures_see_later_assignments_to_captured_variables() {
    assert_output("let x = 1; fun get() { return x } x = 2; get()", &["2", "2"]);
}

#[test]
fn redeclaration_rebinds_the_name_but_not_existing_values() {
    assert_output("fun f() { return 1 } let old = f; fun f() { return 2 } old(); f()",
                  &["1", "2"]);
}

#[test]
fn recursion() {
    assert_output("fun fib(n) { if n < 2 return n; return fib(n - 1) + fib(n - 2) } fib(15)",
                  &["610"]);
}

#[test]
fn return_unwinds_nested_loops() {
    let src = "fun find(target) {
                   let i = 0
                   while true {
                       let j = 0
                       while j < 10 {
                           if i * 10 + j == target { return str(i) + \":\" + str(j) }
                           j = j + 1
                       }
                       i = i + 1
                   }
               }
               find(42)";
    assert_output(src, &["4:2"]);
}

#[test]
fn break_and_continue_only_affect_the_innermost_loop() {
    let src = "let i = 0
               while i < 3 {
                   i = i + 1
                   if i == 2 continue
                   let j = 0
                   while true { j = j + 1; if j == 2 break }
                   print str(i) + \"/\" + str(j)
               }";
    assert_output(src, &["1/2", "3/2"]);
}

#[test]
fn logical_operators_short_circuit() {
    assert_output("nil or \"default\"", &["default"]);
    assert_output("0 and \"zero is truthy\"", &["zero is truthy"]);
    assert_output("false and undefined_name", &["false"]);
    assert_output("true or undefined_name", &["true"]);
    assert_output("!nil == true", &["true"]);
}

#[test]
fn equality_and_comparison() {
    assert_output("1 == 1; \"a\" == \"a\"; 1 == \"1\"; nil == false", &["true", "true", "false", "false"]);
    assert_output("\"abc\" < \"abd\"; 2 >= 2; 3 != 3", &["true", "true", "false"]);
    assert_output("fun f() {} f == f; clock == clock", &["true", "true"]);
}

#[test]
fn builtin_functions() {
    assert_output("len(\"hello\")", &["5"]);
    assert_output("num(\"12.5\") + 1", &["13.5"]);
    assert_output("type(1); type(\"\"); type(nil); type(len)", &["number", "string", "nil", "function"]);
    assert_output("sqrt(16); floor(2.7); abs(-3)", &["4", "2", "3"]);
    assert_output("str(1) + str(true)", &["1true"]);
    assert_output("clock() > 0", &["true"]);
    assert_output("print len", &["<builtin fn len>"]);
}

#[test]
fn functions_render_with_their_name() {
    assert_output("fun greet(name) { print \"hi \" + name } greet; greet(\"bob\")",
                  &["<fn greet>", "hi bob", "nil"]);
}

#[test]
fn multi_line_strings_and_comments() {
    assert_output("// a comment\nprint \"two\nlines\" /* inline */", &["two\nlines"]);
}

#[test]
fn lex_errors() {
    assert_failure("let x = 1 $ 2", ErrorKind::Lex);
    assert_failure("print \"never closed", ErrorKind::Lex);
}

#[test]
fn parse_errors() {
    assert_failure("1 +", ErrorKind::Parse);
    assert_failure("let = 3", ErrorKind::Parse);
    assert_failure("1 = 2", ErrorKind::Parse);
    assert_failure("{ print 1", ErrorKind::Parse);
    assert_failure("return 1", ErrorKind::Parse);
    assert_failure("break", ErrorKind::Parse);
    assert_failure("fun f(a, a) {}", ErrorKind::Parse);
    assert_failure("print (1", ErrorKind::Parse);
}

#[test]
fn runtime_errors() {
    assert_failure("undefined_name", ErrorKind::Runtime);
    assert_failure("nope = 1", ErrorKind::Runtime);
    assert_failure("\"text\"()", ErrorKind::Runtime);
    assert_failure("fun f(a) {} f(1, 2)", ErrorKind::Runtime);
    assert_failure("-\"text\"", ErrorKind::Runtime);
    assert_failure("5 % 0", ErrorKind::Runtime);
    assert_failure("1 < \"2\"", ErrorKind::Runtime);
    assert_failure("len(3)", ErrorKind::Runtime);
    assert_failure("num(\"abc\")", ErrorKind::Runtime);
}

#[test]
fn runaway_recursion_is_a_runtime_error() {
    let mut session = Session::with_config(SessionConfig { echo_results:   true,
                                                           max_call_depth: 24, });
    let error = session.submit("fun forever(n) { return forever(n + 1) } forever(0)").unwrap_err();
    assert_eq!(error.kind(), ErrorKind::Runtime);
    assert!(error.to_string().contains("Maximum call depth of 24 exceeded"), "{error}");

    session.submit("forever").unwrap();
}

#[test]
fn recursion_up_to_the_default_call_depth() {
    let countdown = "fun down(n) { if n > 0 { let m = n - 1; return down(m) } return 0 }";
    assert_output(&format!("{countdown} down(199)"), &["0"]);

    let mut session = Session::new();
    session.submit(countdown).unwrap();
    let error = session.submit("down(200)").unwrap_err();
    assert!(error.to_string().contains("Maximum call depth of 200 exceeded"), "{error}");
}

#[test]
fn deep_recursion_runs_on_small_threads() {
    let handle = std::thread::Builder::new().stack_size(512 * 1024)
                                            .spawn(|| {
                                                evaluate_source("fun sum(n) { if n == 0 return 0; \
                                                                 return n + sum(n - 1) } sum(199)",
                                                                true)
                                            })
                                            .unwrap();
    assert_eq!(handle.join().unwrap(), Ok(vec!["19900".to_string()]));
}

#[test]
fn deeply_nested_input_fails_without_ending_the_session() {
    let (mut session, events) = recording_session(true);

    let parens = format!("print {}1{}", "(".repeat(20_000), ")".repeat(20_000));
    assert_eq!(session.submit(&parens).unwrap_err().kind(), ErrorKind::Parse);
    let negations = format!("print {}1", "-".repeat(100_000));
    assert_eq!(session.submit(&negations).unwrap_err().kind(), ErrorKind::Parse);
    let blocks = format!("{}print 1{}", "{".repeat(20_000), "}".repeat(20_000));
    assert_eq!(session.submit(&blocks).unwrap_err().kind(), ErrorKind::Parse);

    session.submit("1 + 1").unwrap();
    let events = events.borrow();
    assert!(events[0].text.contains("Nesting is deeper than"), "{}", events[0].text);
    assert_eq!(events.last().map(|e| e.text.as_str()), Some("2"));
}

#[test]
fn moderately_nested_input_runs() {
    assert_output(&format!("print {}7{}", "(".repeat(400), ")".repeat(400)), &["7"]);
    assert_output(&format!("print {}1", "-".repeat(400)), &["1"]);
    assert_output(&format!("{}print 3{}", "{".repeat(400), "}".repeat(400)), &["3"]);
}

#[test]
fn bare_return_does_not_swallow_the_next_line() {
    assert_output("fun f() {\n  return\n  x = 1\n}\nlet x = 0; f(); x", &["nil", "0"]);
}

#[test]
fn reset_starts_over() {
    let (mut session, events) = recording_session(true);
    session.submit("let a = 1").unwrap();
    session.reset();

    assert!(session.submit("a").is_err());
    session.submit("type(abs)").unwrap();
    assert_eq!(events.borrow().last().map(|e| e.text.clone()), Some("function".to_string()));
}
