use crate::{
    lexer::prelude::scan,
    parser::prelude::{parse, ParseError, ParseErrorType, Program, Statement},
};

fn parse_source(input: &str) -> Result<Program, Vec<ParseError>> {
    let tokens = scan(input, "test.nol").unwrap();
    parse(tokens, "test.nol")
}

fn statements(input: &str) -> Vec<Statement> {
    parse_source(input).unwrap().statements
}

fn errors(input: &str) -> Vec<ParseErrorType> {
    parse_source(input)
        .unwrap_err()
        .into_iter()
        .map(|error| error.error)
        .collect()
}

fn expr_display(input: &str) -> String {
    let statements = statements(input);
    assert_eq!(statements.len(), 1);
    statements[0].to_string()
}

#[test]
fn test_declarations() {
    let program = parse_source("no x\nno y = 1 + 2\n").unwrap();

    assert_eq!(program.statements.len(), 2);
    assert_eq!(program.to_string(), "no x\nno y = (1 + 2)");
}

#[test]
fn test_function_declaration() {
    let statements = statements("greg add(a, b)\n    return a + b\n");
    assert_eq!(statements.len(), 1);

    let Statement::Fun(declaration) = &statements[0] else {
        panic!("expected a function declaration, got {:?}", statements[0]);
    };

    assert_eq!(declaration.name.lexeme, "add");
    assert_eq!(declaration.params.len(), 2);
    assert_eq!(declaration.params[0].lexeme, "a");
    assert_eq!(declaration.params[1].lexeme, "b");
    assert_eq!(declaration.body.statements.len(), 1);

    let Statement::Return(return_statement) = &declaration.body.statements[0] else {
        panic!("expected a return statement");
    };
    assert!(return_statement.value.is_some());
}

#[test]
fn test_return_without_value() {
    let statements = statements("greg noop()\n    return\n");

    let Statement::Fun(declaration) = &statements[0] else {
        panic!("expected a function declaration");
    };
    let Statement::Return(return_statement) = &declaration.body.statements[0] else {
        panic!("expected a return statement");
    };

    assert!(return_statement.value.is_none());
}

#[test]
fn test_if_statement() {
    let input = "if a\n    1\nerm b\n    2\nerm c\n    3\nhermph\n    4\n";
    let statements = statements(input);
    assert_eq!(statements.len(), 1);

    let Statement::If(statement) = &statements[0] else {
        panic!("expected an if statement, got {:?}", statements[0]);
    };

    assert_eq!(statement.condition.to_string(), "a");
    assert_eq!(statement.consequence.statements.len(), 1);
    assert_eq!(statement.erm_branches.len(), 2);
    assert_eq!(statement.erm_branches[1].0.to_string(), "c");
    assert!(statement.alternative.is_some());
}

#[test]
fn test_while_statement() {
    let input = "while i < 10\n    i = i + 1\nhermph\n    done = True\n";
    let statements = statements(input);

    let Statement::While(statement) = &statements[0] else {
        panic!("expected a while statement, got {:?}", statements[0]);
    };

    assert_eq!(statement.condition.to_string(), "(i < 10)");
    assert_eq!(statement.body.statements.len(), 1);
    assert!(statement.alternative.is_some());
}

#[test]
fn test_nested_blocks() {
    let input = "while a\n    if b\n        1\n    2\n";
    let statements = statements(input);

    let Statement::While(statement) = &statements[0] else {
        panic!("expected a while statement");
    };

    assert_eq!(statement.body.statements.len(), 2);
    assert!(matches!(statement.body.statements[0], Statement::If(_)));
}

#[test]
fn test_operator_precedence() {
    assert_eq!(expr_display("1 + 2 * 3\n"), "(1 + (2 * 3))");
    assert_eq!(expr_display("1 * 2 + 3\n"), "((1 * 2) + 3)");
    assert_eq!(expr_display("(1 + 2) * 3\n"), "((1 + 2) * 3)");
    assert_eq!(expr_display("1 < 2 == 3 < 4\n"), "((1 < 2) == (3 < 4))");
    assert_eq!(expr_display("not a and b\n"), "((not a) and b)");
    assert_eq!(expr_display("a or b and c\n"), "(a or (b and c))");
    assert_eq!(expr_display("-x % 2\n"), "((-x) % 2)");
}

#[test]
fn test_exponent_binds_right() {
    assert_eq!(expr_display("2 ** 3 ** 2\n"), "(2 ** (3 ** 2))");
    assert_eq!(expr_display("-2 ** 2\n"), "(-(2 ** 2))");
    assert_eq!(expr_display("2 ** -3\n"), "(2 ** (-3))");
}

#[test]
fn test_equality_accepts_not_on_the_right() {
    assert_eq!(expr_display("a == not b\n"), "(a == (not b))");
    assert_eq!(expr_display("a != not b\n"), "(a != (not b))");
}

#[test]
fn test_assignment_chains_right() {
    assert_eq!(expr_display("a = b = 1\n"), "a = b = 1");

    let statements = statements("a = b = 1\n");
    let Statement::Expr(statement) = &statements[0] else {
        panic!("expected an expression statement");
    };
    let crate::parser::prelude::Expression::Assign(assignment) = &statement.expression else {
        panic!("expected an assignment");
    };

    assert_eq!(assignment.name.lexeme, "a");
    assert!(matches!(
        assignment.value,
        crate::parser::prelude::Expression::Assign(_)
    ));
}

#[test]
fn test_call_expressions() {
    assert_eq!(expr_display("f(1, x + 1)\n"), "f(1, (x + 1))");
    assert_eq!(expr_display("f(1)(2)\n"), "f(1)(2)");
    assert_eq!(expr_display("nolin(\"? \")\n"), "nolin(\"? \")");
}

#[test]
fn test_invalid_assignment_target() {
    assert_eq!(
        errors("1 = 2\n"),
        vec![ParseErrorType::InvalidAssignmentTarget {
            target: "1".to_string()
        }]
    );
    assert_eq!(
        errors("f() = 3\n"),
        vec![ParseErrorType::InvalidAssignmentTarget {
            target: "f()".to_string()
        }]
    );
}

#[test]
fn test_return_outside_function() {
    assert_eq!(errors("return 1\n"), vec![ParseErrorType::ReturnOutsideFunction]);
}

#[test]
fn test_statement_recovery() {
    // The defective first line is reported once and the parser picks
    // back up at the second.
    let errors = errors("no = 5\nno x = 1\n");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ParseErrorType::UnexpectedToken { .. }));

    assert!(parse_source("no x = 1\n").is_ok());
}

#[test]
fn test_recovery_reports_every_defective_statement() {
    let errors = errors("no = 1\nno = 2\nno ok = 3\n");
    assert_eq!(errors.len(), 2);
}

#[test]
fn test_unexpected_eof() {
    assert_eq!(errors("if x\n"), vec![ParseErrorType::UnexpectedEof]);
}

#[test]
fn test_unclosed_paren() {
    let errors = errors("(1 + 2\n");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ParseErrorType::UnexpectedToken { .. }));
}

#[test]
fn test_too_many_arguments() {
    let args = (0..256).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
    let input = format!("f({args})\n");

    assert_eq!(errors(&input), vec![ParseErrorType::TooManyArguments]);
}

#[test]
fn test_too_many_parameters() {
    let params = (0..256)
        .map(|i| format!("p{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let input = format!("greg f({params})\n    return\n");

    assert_eq!(errors(&input), vec![ParseErrorType::TooManyParameters]);
}

#[test]
fn test_keywords_are_not_identifiers() {
    let errors = errors("no if = 1\n");
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], ParseErrorType::UnexpectedToken { .. }));
}

#[test]
fn test_error_location() {
    let tokens = scan("no = 5\n", "test.nol").unwrap();
    let error = parse(tokens, "test.nol").unwrap_err().remove(0);

    assert_eq!(error.line, 1);
    assert_eq!(error.unit, "test.nol");
    assert_eq!(error.span.start, 3);
    assert_eq!(error.span.end, 4);
}
