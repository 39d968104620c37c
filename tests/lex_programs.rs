extern crate rstorm;
use rstorm::{lex_source, Lexeme, OperatorKind, Trace, TypeTable, TypedName};

// Log needs to be initialized once in the async mess that is cargo test
use std::sync::Once;
static LOGGER_INIT: Once = Once::new();

fn ensure_log_init() {
    LOGGER_INIT.call_once(|| env_logger::builder().is_test(true).init());
}

fn lex_program(source: &str) -> rstorm::Ir {
    ensure_log_init();
    match lex_source(source, &TypeTable::builtin(), Trace::off()) {
        Ok(ir) => ir,
        Err(e) => {
            println!("{}", e);
            panic!("test program failed to lex");
        }
    }
}

#[test]
fn whole_program() {
    let ir = lex_program(
        "int g ;
extern putd ;

int main ( int argc )
{
    int i = 0 ;
    while i < 3 ;
        i += 1 ;
        putd ( i ) ;
    endwhile
    return i ;
}
endfun
",
    );
    use Lexeme::*;
    let var = |name: &str| Variable(name.to_string());
    assert_eq!(
        ir.lexemes,
        vec![
            VariableDeclaration(rstorm::VariableDeclaration {
                name: "g".to_string(),
                type_id: 0,
            }),
            Extern("putd".to_string()),
            FunctionDeclaration(0),
            BlockBegin,
            // int i = 0 ; reopens as a plain assignment statement
            StatementBegin,
            var("i"),
            Assign,
            Integer(0),
            StatementEnd,
            While,
            StatementBegin,
            var("i"),
            Operator(rstorm::Operator::new(OperatorKind::Less)),
            Integer(3),
            StatementEnd,
            StatementBegin,
            var("i"),
            AddAssign,
            Integer(1),
            StatementEnd,
            StatementBegin,
            FunctionCall("putd".to_string()),
            OpenBracket,
            var("i"),
            CloseBracket,
            StatementEnd,
            Endwhile,
            Return,
            StatementBegin,
            var("i"),
            StatementEnd,
            BlockEnd,
            FunctionEnd,
            Eof,
        ]
    );
    let main = ir.function(0);
    assert_eq!(main.name, "main");
    assert_eq!(main.return_type, 0);
    assert_eq!(main.parameters, vec![TypedName { name: "argc".to_string(), type_id: 0 }]);
    assert_eq!(main.locals, vec![TypedName { name: "i".to_string(), type_id: 0 }]);
}

#[test]
fn precedence_is_attached_flat() {
    let ir = lex_program("a = 1 + 2 * 3 ;");
    use Lexeme::*;
    assert_eq!(
        ir.lexemes,
        vec![
            StatementBegin,
            Variable("a".to_string()),
            Assign,
            Integer(1),
            Operator(rstorm::Operator::new(OperatorKind::Add)),
            Integer(2),
            Operator(rstorm::Operator::new(OperatorKind::Mul)),
            Integer(3),
            StatementEnd,
            Eof,
        ]
    );
    // the sequence stays flat; only the precedences encode binding
    let precedences: Vec<u32> = ir
        .lexemes
        .iter()
        .filter_map(|l| match l {
            Operator(op) => Some(op.precedence),
            _ => None,
        })
        .collect();
    assert_eq!(precedences, vec![1000, 2000]);
}

#[test]
fn trace_never_alters_the_output() {
    ensure_log_init();
    let source = "int f ( int x )
int y = x + 1 ;
return y ;
endfun
";
    let types = TypeTable::builtin();
    let silent = lex_source(source, &types, Trace::off()).expect("silent run failed");
    let mut buffer = Vec::new();
    let traced = lex_source(source, &types, Trace::to(&mut buffer)).expect("traced run failed");
    assert_eq!(silent, traced);
    let trace = String::from_utf8(buffer).unwrap();
    assert!(!trace.is_empty());
    for line in trace.lines() {
        assert!(line.starts_with("lex: "), "unexpected trace line: {}", line);
    }
}

#[test]
fn one_diagnostic_with_the_offending_line() {
    ensure_log_init();
    let err = lex_source("int a ;\nint b = 1 ;\n", &TypeTable::builtin(), Trace::off())
        .expect_err("global initializer lexed without error");
    assert_eq!(format!("{}", err), "[ERROR] line 2: expected `;`");
}

#[test]
fn bad_parameter_type_diagnostic() {
    ensure_log_init();
    let err = lex_source("int foo ( float x ) endfun\n", &TypeTable::builtin(), Trace::off())
        .expect_err("unknown parameter type lexed without error");
    assert_eq!(
        format!("{}", err),
        "[ERROR] invalid type `float` for parameter `x` of function `foo`"
    );
}

#[test]
fn wider_type_tables_shift_ids() {
    ensure_log_init();
    let types = TypeTable::from_names(&["int", "char"]);
    let ir = lex_source("char c ;\n", &types, Trace::off()).expect("char global failed to lex");
    assert_eq!(
        ir.lexemes[0],
        Lexeme::VariableDeclaration(rstorm::VariableDeclaration {
            name: "c".to_string(),
            type_id: 1,
        })
    );
}
