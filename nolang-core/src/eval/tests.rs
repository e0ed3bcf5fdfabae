use crate::{
    environment::prelude::{Value, ValueType, FALSE, NOL, TRUE},
    eval::prelude::{Interpreter, RuntimeError, RuntimeErrorType},
    lexer::prelude::scan,
    parser::prelude::parse,
};

fn run(input: &str) -> Result<Interpreter, RuntimeError> {
    let mut interpreter = Interpreter::new();
    run_with(&mut interpreter, input)?;
    Ok(interpreter)
}

fn run_with(interpreter: &mut Interpreter, input: &str) -> Result<(), RuntimeError> {
    let tokens = scan(input, "test.nol").unwrap();
    let program = parse(tokens, "test.nol").unwrap();
    interpreter.explore(&program)
}

fn lookup(interpreter: &Interpreter, name: &str) -> Value {
    let value = interpreter.environment.borrow().get(name);
    value.unwrap_or_else(|| panic!("{name} is not defined"))
}

/// Runs `input` and returns whatever it left in `r`.
fn result_of(input: &str) -> Value {
    lookup(&run(input).unwrap(), "r")
}

fn error_of(input: &str) -> RuntimeErrorType {
    match run(input) {
        Ok(_) => panic!("expected a runtime error from {input:?}"),
        Err(error) => error.error,
    }
}

#[test]
fn test_integer_arithmetic() {
    assert_eq!(result_of("no r = 1 + 1\n"), Value::Integer { value: 2 });
    assert_eq!(result_of("no r = 2 * 3 - 1\n"), Value::Integer { value: 5 });
    assert_eq!(result_of("no r = 7 % 3\n"), Value::Integer { value: 1 });
    assert_eq!(result_of("no r = -7 % 3\n"), Value::Integer { value: -1 });
}

#[test]
fn test_float_arithmetic() {
    assert_eq!(result_of("no r = 1 + 1.0\n"), Value::Float { value: 2.0 });
    assert_eq!(result_of("no r = 0.5 * 4\n"), Value::Float { value: 2.0 });

    // Division always yields a float, even between integers.
    assert_eq!(result_of("no r = 7 / 2\n"), Value::Float { value: 3.5 });
    assert_eq!(result_of("no r = 4 / 2\n"), Value::Float { value: 2.0 });
}

#[test]
fn test_divide_by_zero() {
    assert_eq!(error_of("no r = 1 / 0\n"), RuntimeErrorType::DivideByZero);
    assert_eq!(error_of("no r = 1 / 0.0\n"), RuntimeErrorType::DivideByZero);
    assert_eq!(error_of("no r = 7 % 0\n"), RuntimeErrorType::DivideByZero);
}

#[test]
fn test_power() {
    // `**` associates to the right and binds tighter than sign.
    assert_eq!(result_of("no r = 2 ** 3 ** 2\n"), Value::Integer { value: 512 });
    assert_eq!(result_of("no r = -2 ** 2\n"), Value::Integer { value: -4 });

    // A negative exponent leaves the integers.
    assert_eq!(result_of("no r = 2 ** -3\n"), Value::Float { value: 0.125 });
    assert_eq!(result_of("no r = 2.0 ** 2\n"), Value::Float { value: 4.0 });

    // So does a result too large for one.
    assert!(matches!(
        result_of("no r = 2 ** 64\n"),
        Value::Float { .. }
    ));
}

#[test]
fn test_arithmetic_overflow_degrades_to_float() {
    assert_eq!(
        result_of("no r = 9223372036854775807 + 1\n"),
        Value::Float {
            value: i64::MAX as f64 + 1.0
        }
    );
    assert_eq!(
        result_of("no r = 9223372036854775807 * 2\n"),
        Value::Float {
            value: i64::MAX as f64 * 2.0
        }
    );
    assert_eq!(
        result_of("no r = -9223372036854775807 - 2\n"),
        Value::Float {
            value: -(i64::MAX as f64) - 2.0
        }
    );
    assert_eq!(
        result_of("no r = --9223372036854775807 - 1\n"),
        Value::Integer { value: i64::MAX - 1 }
    );
}

#[test]
fn test_extreme_integer_edges() {
    // The smallest integer negates into a float, one past the largest.
    assert_eq!(
        result_of("no r = -(-9223372036854775807 - 1)\n"),
        Value::Float {
            value: i64::MAX as f64 + 1.0
        }
    );

    // Its remainder by -1 is zero, not an overflow.
    assert_eq!(
        result_of("no r = (-9223372036854775807 - 1) % -1\n"),
        Value::Integer { value: 0 }
    );
}

#[test]
fn test_string_concatenation() {
    let concat = |input: &str, expected: &str| {
        assert_eq!(
            result_of(input),
            Value::String {
                value: expected.to_string()
            }
        );
    };

    concat("no r = \"no\" + \"lang\"\n", "nolang");
    concat("no r = \"a\" + 1\n", "a1");
    concat("no r = 1 + \"a\"\n", "1a");
    concat("no r = \"a\" + 2.0\n", "a2.0");
    concat("no r = \"a\" + True\n", "aTrue");
    concat("no r = \"a\" + nol\n", "anol");
}

#[test]
fn test_ordering() {
    assert_eq!(result_of("no r = 1 < 2\n"), TRUE);
    assert_eq!(result_of("no r = 2 <= 2\n"), TRUE);
    assert_eq!(result_of("no r = 3 > 4\n"), FALSE);
    assert_eq!(result_of("no r = 1 < 1.5\n"), TRUE);
    assert_eq!(result_of("no r = \"a\" < \"b\"\n"), TRUE);
    assert_eq!(result_of("no r = \"ab\" >= \"ab\"\n"), TRUE);
}

#[test]
fn test_ordering_rejects_mixed_and_unordered() {
    assert_eq!(
        error_of("no r = 1 < \"a\"\n"),
        RuntimeErrorType::IncompatibleTypes {
            operator: "<".to_string(),
            left: Value::Integer { value: 1 },
            right: Value::String {
                value: "a".to_string()
            },
        }
    );

    assert_eq!(
        error_of("no r = nol < 1\n"),
        RuntimeErrorType::InvalidOperand {
            operator: "<".to_string(),
            operand: NOL,
        }
    );

    assert_eq!(
        error_of("no r = 1 > True\n"),
        RuntimeErrorType::InvalidOperand {
            operator: ">".to_string(),
            operand: TRUE,
        }
    );
}

#[test]
fn test_equality() {
    assert_eq!(result_of("no r = 1 == 1.0\n"), TRUE);
    assert_eq!(result_of("no r = 1 != 2\n"), TRUE);
    assert_eq!(result_of("no r = nol == nol\n"), TRUE);

    // Values of different kinds never coerce for equality.
    assert_eq!(result_of("no r = True == 1\n"), FALSE);
    assert_eq!(result_of("no r = \"1\" == 1\n"), FALSE);
}

#[test]
fn test_function_identity() {
    let source = "greg f()
    return 1
greg g()
    return 1
no same = f == f
no different = f == g
";

    let interpreter = run(source).unwrap();
    assert_eq!(lookup(&interpreter, "same"), TRUE);
    assert_eq!(lookup(&interpreter, "different"), FALSE);
}

#[test]
fn test_truthiness() {
    // The empty string counts as true; only nol, False and the zero
    // numbers are false.
    let branch_taken = |condition: &str| {
        let source = format!("no r = 0\nif {condition}\n    r = 1\n");
        result_of(&source) == Value::Integer { value: 1 }
    };

    assert!(branch_taken("\"\""));
    assert!(branch_taken("\"x\""));
    assert!(branch_taken("1"));
    assert!(branch_taken("0.5"));
    assert!(branch_taken("True"));

    assert!(!branch_taken("nol"));
    assert!(!branch_taken("False"));
    assert!(!branch_taken("0"));
    assert!(!branch_taken("0.0"));
}

#[test]
fn test_unary_operators() {
    assert_eq!(result_of("no r = not 0\n"), TRUE);
    assert_eq!(result_of("no r = not \"x\"\n"), FALSE);
    assert_eq!(result_of("no r = -2.5\n"), Value::Float { value: -2.5 });
    assert_eq!(result_of("no r = +3\n"), Value::Integer { value: 3 });

    assert_eq!(
        error_of("no r = -\"a\"\n"),
        RuntimeErrorType::InvalidOperand {
            operator: "-".to_string(),
            operand: Value::String {
                value: "a".to_string()
            },
        }
    );
}

#[test]
fn test_short_circuit() {
    // The right operand must not run when the left decides.
    assert_eq!(result_of("no r = False and 1 / 0\n"), FALSE);
    assert_eq!(result_of("no r = True or 1 / 0\n"), TRUE);

    // Both connectives yield a boolean, not an operand.
    assert_eq!(result_of("no r = 1 and 2\n"), TRUE);
    assert_eq!(result_of("no r = 0 or nol\n"), FALSE);
}

#[test]
fn test_assignment_yields_its_value() {
    let source = "no x = 1
no y = 2
no r = x = y = 7
";

    let interpreter = run(source).unwrap();
    assert_eq!(lookup(&interpreter, "r"), Value::Integer { value: 7 });
    assert_eq!(lookup(&interpreter, "x"), Value::Integer { value: 7 });
    assert_eq!(lookup(&interpreter, "y"), Value::Integer { value: 7 });
}

#[test]
fn test_undefined_variable() {
    assert_eq!(
        error_of("no r = ghost\n"),
        RuntimeErrorType::UndefinedVariable {
            name: "ghost".to_string()
        }
    );

    // Assignment never creates a binding.
    assert_eq!(
        error_of("ghost = 1\n"),
        RuntimeErrorType::UndefinedVariable {
            name: "ghost".to_string()
        }
    );
}

#[test]
fn test_variable_redefinition() {
    assert_eq!(
        error_of("no x = 1\nno x = 2\n"),
        RuntimeErrorType::VariableRedefinition {
            name: "x".to_string()
        }
    );

    // The built-in functions occupy the global frame.
    assert_eq!(
        error_of("no time = 1\n"),
        RuntimeErrorType::VariableRedefinition {
            name: "time".to_string()
        }
    );
}

#[test]
fn test_scopes() {
    // A block shadow is discarded when the block ends.
    let source = "no x = 1
if True
    no x = 2
no r = x
";
    assert_eq!(result_of(source), Value::Integer { value: 1 });

    // Plain assignment reaches outward instead.
    let source = "no x = 1
if True
    x = 2
no r = x
";
    assert_eq!(result_of(source), Value::Integer { value: 2 });
}

#[test]
fn test_if_erm_hermph() {
    let source = "no r = 0
if False
    r = 1
erm 2
    r = 2
erm True
    r = 3
hermph
    r = 4
";

    // The first truthy arm wins; `2` coerces like any condition.
    assert_eq!(result_of(source), Value::Integer { value: 2 });

    let source = "no r = 0
if False
    r = 1
erm False
    r = 2
hermph
    r = 4
";
    assert_eq!(result_of(source), Value::Integer { value: 4 });

    let source = "no r = 0
if False
    r = 1
erm False
    r = 2
";
    assert_eq!(result_of(source), Value::Integer { value: 0 });
}

#[test]
fn test_while_loop() {
    let source = "no i = 0
no r = 0
while i < 5
    r = r + i
    i = i + 1
";

    assert_eq!(result_of(source), Value::Integer { value: 10 });
}

#[test]
fn test_while_hermph() {
    // The hermph arm runs once, after the condition turns false.
    let source = "no r = 0
while r < 3
    r = r + 1
hermph
    r = r + 10
";
    assert_eq!(result_of(source), Value::Integer { value: 13 });

    // Even when the body never ran at all.
    let source = "no r = 0
while False
    r = r + 1
hermph
    r = r + 10
";
    assert_eq!(result_of(source), Value::Integer { value: 10 });
}

#[test]
fn test_return_skips_loop_hermph() {
    let source = "greg find()
    while True
        return 1
    hermph
        return 2
no r = find()
";

    assert_eq!(result_of(source), Value::Integer { value: 1 });
}

#[test]
fn test_functions() {
    let source = "greg add(a, b)
    return a + b
no r = add(1, 2)
";
    assert_eq!(result_of(source), Value::Integer { value: 3 });

    // Falling off the end returns nol.
    let source = "greg noop()
    no x = 1
no r = noop()
";
    assert_eq!(result_of(source), NOL);

    // A bare return does too, and nothing past it runs.
    let source = "no touched = 0
greg early()
    return
    touched = 1
no r = early()
";
    let interpreter = run(source).unwrap();
    assert_eq!(lookup(&interpreter, "r"), NOL);
    assert_eq!(lookup(&interpreter, "touched"), Value::Integer { value: 0 });
}

#[test]
fn test_closures() {
    let source = "greg outer(n)
    greg inner()
        return n + 1
    return inner
no f = outer(41)
no r = f()
";

    assert_eq!(result_of(source), Value::Integer { value: 42 });
}

#[test]
fn test_closures_share_state() {
    let source = "greg counter()
    no n = 0
    greg bump()
        n = n + 1
        return n
    return bump
no f = counter()
no a = f()
no r = f()
";

    let interpreter = run(source).unwrap();
    assert_eq!(lookup(&interpreter, "a"), Value::Integer { value: 1 });
    assert_eq!(lookup(&interpreter, "r"), Value::Integer { value: 2 });
}

#[test]
fn test_recursion() {
    let source = "greg fib(n)
    if n < 2
        return n
    return fib(n - 1) + fib(n - 2)
no r = fib(10)
";

    assert_eq!(result_of(source), Value::Integer { value: 55 });
}

#[test]
fn test_wrong_arity_leaves_body_unexecuted() {
    let source = "no flag = 0
greg f(a, b)
    flag = 1
    return a
no r = f(1)
";

    let mut interpreter = Interpreter::new();
    let error = run_with(&mut interpreter, source).unwrap_err();

    assert_eq!(
        error.error,
        RuntimeErrorType::WrongArity {
            callee: "<greg f>".to_string(),
            expected: 2,
            given: 1,
        }
    );
    assert_eq!(lookup(&interpreter, "flag"), Value::Integer { value: 0 });
}

#[test]
fn test_duplicate_parameter() {
    let source = "greg f(a, a)
    return a
no r = f(1, 2)
";

    assert_eq!(
        error_of(source),
        RuntimeErrorType::VariableRedefinition {
            name: "a".to_string()
        }
    );
}

#[test]
fn test_not_callable() {
    assert_eq!(
        error_of("no r = 1(2)\n"),
        RuntimeErrorType::NotCallable {
            value: Value::Integer { value: 1 }
        }
    );

    assert_eq!(
        error_of("no x = \"f\"\nno r = x()\n"),
        RuntimeErrorType::NotCallable {
            value: Value::String {
                value: "f".to_string()
            }
        }
    );
}

#[test]
fn test_conversions() {
    assert_eq!(result_of("no r = int(\"42\")\n"), Value::Integer { value: 42 });
    assert_eq!(result_of("no r = int(\" 7 \")\n"), Value::Integer { value: 7 });
    assert_eq!(result_of("no r = int(3.9)\n"), Value::Integer { value: 3 });
    assert_eq!(result_of("no r = int(-3.9)\n"), Value::Integer { value: -3 });
    assert_eq!(result_of("no r = int(True)\n"), Value::Integer { value: 1 });
    assert_eq!(result_of("no r = int(False)\n"), Value::Integer { value: 0 });
    assert_eq!(result_of("no r = int(5)\n"), Value::Integer { value: 5 });

    assert_eq!(result_of("no r = float(1)\n"), Value::Float { value: 1.0 });
    assert_eq!(result_of("no r = float(\"2.5\")\n"), Value::Float { value: 2.5 });
    assert_eq!(result_of("no r = float(0.5)\n"), Value::Float { value: 0.5 });
}

#[test]
fn test_conversion_errors() {
    assert_eq!(
        error_of("no r = int(\"brouhaha\")\n"),
        RuntimeErrorType::InvalidConversion {
            value: Value::String {
                value: "brouhaha".to_string()
            },
            target: ValueType::Integer,
        }
    );

    assert_eq!(
        error_of("no r = int(nol)\n"),
        RuntimeErrorType::InvalidConversion {
            value: NOL,
            target: ValueType::Integer,
        }
    );

    assert_eq!(
        error_of("no r = float(\"\")\n"),
        RuntimeErrorType::InvalidConversion {
            value: Value::String {
                value: String::new()
            },
            target: ValueType::Float,
        }
    );
}

#[test]
fn test_rounding() {
    assert_eq!(result_of("no r = roundup(4.2)\n"), Value::Integer { value: 5 });
    assert_eq!(result_of("no r = roundup(-4.2)\n"), Value::Integer { value: -4 });
    assert_eq!(result_of("no r = rounddown(4.7)\n"), Value::Integer { value: 4 });
    assert_eq!(result_of("no r = rounddown(-4.7)\n"), Value::Integer { value: -5 });

    // Integers pass through untouched.
    assert_eq!(result_of("no r = roundup(3)\n"), Value::Integer { value: 3 });
    assert_eq!(result_of("no r = rounddown(3)\n"), Value::Integer { value: 3 });
}

#[test]
fn test_time_and_random() {
    assert!(matches!(
        result_of("no r = time()\n"),
        Value::Integer { value } if value > 0
    ));

    assert!(matches!(
        result_of("no r = random()\n"),
        Value::Float { value } if (0.0..1.0).contains(&value)
    ));

    // Built-ins are ordinary values.
    assert!(matches!(
        result_of("no clock = time\nno r = clock()\n"),
        Value::Integer { value } if value > 0
    ));
}

#[test]
fn test_nolout_yields_nol() {
    assert_eq!(result_of("no r = nolout(1)\n"), NOL);
}

#[test]
fn test_error_stops_execution() {
    let source = "no r = 0
no x = nol + 1
r = 5
";

    let mut interpreter = Interpreter::new();
    run_with(&mut interpreter, source).unwrap_err();

    assert_eq!(lookup(&interpreter, "r"), Value::Integer { value: 0 });
}

#[test]
fn test_state_persists_across_runs() {
    let mut interpreter = Interpreter::new();
    run_with(&mut interpreter, "no x = 1\n").unwrap();
    run_with(&mut interpreter, "x = x + 1\n").unwrap();

    assert_eq!(lookup(&interpreter, "x"), Value::Integer { value: 2 });
}

#[test]
fn test_error_location() {
    let mut interpreter = Interpreter::new();
    let error = run_with(&mut interpreter, "no x = 1\nno r = x + nol\n").unwrap_err();

    assert_eq!(error.line, 2);
    assert_eq!(error.unit, "test.nol");
    assert_eq!(
        error.to_string(),
        "Invalid operand nol (nol) for operator '+' 'test.nol':2"
    );
}
