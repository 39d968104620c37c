// The lex pass: one forward walk over the token stream with bounded
// lookahead and no backtracking. The same cursor serves compound-operator
// merging, statement boundary insertion, and declaration parsing into
// function/variable records.

use crate::intermediates::lexeme::{
    FnId, FunctionDeclaration, Ir, Lexeme, Operator, OperatorKind, TypedName, VariableDeclaration,
};
use crate::intermediates::token::{Token, TokenKind};
use crate::trace::Trace;
use crate::types::{TypeId, TypeTable};

#[derive(PartialEq, Debug)]
pub enum LexError {
    /// A function parameter whose type is not in the type table
    BadParameterType { type_name: String, parameter: String, function: String },
    /// A global declaration not terminated by `;`
    ExpectedSemicolon { line: usize },
    /// A name position (after `&`, in a declaration, after `extern`) held
    /// something that is not an identifier
    ExpectedIdentifier { line: usize },
    /// A bare `!`; only `!=` means anything in this language
    UnsupportedSyntax { line: usize },
    /// The stream ran out without an end marker
    UnexpectedEof(&'static str),
}
impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use LexError::*;
        match self {
            BadParameterType { type_name, parameter, function } => write!(
                f,
                "[ERROR] invalid type `{}` for parameter `{}` of function `{}`",
                type_name, parameter, function
            ),
            ExpectedSemicolon { line } => write!(f, "[ERROR] line {}: expected `;`", line),
            ExpectedIdentifier { line } => {
                write!(f, "[ERROR] line {}: expected an identifier", line)
            }
            UnsupportedSyntax { line } => {
                write!(f, "[ERROR] line {}: `!` is only meaningful in `!=`", line)
            }
            UnexpectedEof(parsing) => {
                write!(f, "[ERROR] unexpected end of tokens parsing {}", parsing)
            }
        }
    }
}
// All relevant details in Display and Debug
impl std::error::Error for LexError {}

type Result<T> = std::result::Result<T, LexError>;

/// Forward cursor over the token stream. All lookahead goes through
/// [Cursor::peek]/[Cursor::kind] with an explicit offset, bounds-checked;
/// running off the end means the stream lost its end marker.
#[derive(Clone, Copy)]
struct Cursor<'t> {
    tokens: &'t [Token],
    at: usize,
}
impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Cursor { tokens, at: 0 }
    }
    fn peek(&self, ahead: usize, parsing: &'static str) -> Result<&'t Token> {
        self.tokens.get(self.at + ahead).ok_or(LexError::UnexpectedEof(parsing))
    }
    /// Lookahead by kind only, for the merge/shape checks
    fn kind(&self, ahead: usize) -> Option<&'t TokenKind> {
        self.tokens.get(self.at + ahead).map(|token| &token.kind)
    }
    fn advance(&mut self, count: usize) {
        self.at += count;
    }
    fn next(&mut self, parsing: &'static str) -> Result<&'t Token> {
        let token = self.peek(0, parsing)?;
        self.advance(1);
        Ok(token)
    }
}

struct Lexer<'t, 'w> {
    cursor: Cursor<'t>,
    types: &'t TypeTable,
    lexemes: Vec<Lexeme>,
    functions: Vec<FunctionDeclaration>,
    in_statement: bool,
    current_function: Option<FnId>,
    trace: Trace<'w>,
}

/// Classify `tokens` into the lexeme IR. The stream must end in exactly one
/// end marker; nothing after it is read. On error the whole pass is
/// abandoned: no partial output, no resumption.
pub fn lex(tokens: &[Token], types: &TypeTable, trace: Trace) -> Result<Ir> {
    Lexer {
        cursor: Cursor::new(tokens),
        types,
        lexemes: Vec::new(),
        functions: Vec::new(),
        in_statement: false,
        current_function: None,
        trace,
    }
    .run()
}

impl<'t, 'w> Lexer<'t, 'w> {
    fn run(mut self) -> Result<Ir> {
        loop {
            let token = self.cursor.next("token stream")?;
            match &token.kind {
                TokenKind::Eof => {
                    self.trace.line(format_args!("lex: token eof"));
                    self.lexemes.push(Lexeme::Eof);
                    return Ok(Ir { lexemes: self.lexemes, functions: self.functions });
                }
                TokenKind::Integer(value) => {
                    self.enter_statement();
                    self.trace.line(format_args!("lex: integer {}", value));
                    self.lexemes.push(Lexeme::Integer(*value));
                }
                TokenKind::OpenBrace => {
                    self.trace.line(format_args!("lex: block begin"));
                    self.lexemes.push(Lexeme::BlockBegin);
                }
                TokenKind::CloseBrace => {
                    self.trace.line(format_args!("lex: block end"));
                    self.lexemes.push(Lexeme::BlockEnd);
                }
                TokenKind::OpenBracket => {
                    self.enter_statement();
                    self.trace.line(format_args!("lex: open bracket"));
                    self.lexemes.push(Lexeme::OpenBracket);
                }
                TokenKind::CloseBracket => {
                    self.trace.line(format_args!("lex: close bracket"));
                    self.lexemes.push(Lexeme::CloseBracket);
                }
                TokenKind::Semicolon => {
                    if !self.in_statement {
                        self.trace.line(format_args!("lex: empty statement"));
                        self.lexemes.push(Lexeme::EmptyStatement);
                    } else {
                        self.in_statement = false;
                        self.trace.line(format_args!("lex: statement end"));
                        self.lexemes.push(Lexeme::StatementEnd);
                    }
                }
                TokenKind::Add => {
                    if self.cursor.kind(0) == Some(&TokenKind::Equal) {
                        self.cursor.advance(1);
                        self.trace.line(format_args!("lex: add and assign"));
                        self.lexemes.push(Lexeme::AddAssign);
                    } else {
                        self.trace.line(format_args!("lex: add"));
                        self.push_operator(OperatorKind::Add);
                    }
                }
                TokenKind::Sub => {
                    if self.cursor.kind(0) == Some(&TokenKind::Equal) {
                        self.cursor.advance(1);
                        self.trace.line(format_args!("lex: sub and assign"));
                        self.lexemes.push(Lexeme::SubAssign);
                    } else {
                        self.trace.line(format_args!("lex: sub"));
                        self.push_operator(OperatorKind::Sub);
                    }
                }
                TokenKind::Mul => {
                    self.trace.line(format_args!("lex: mul"));
                    self.push_operator(OperatorKind::Mul);
                }
                TokenKind::Div => {
                    self.trace.line(format_args!("lex: div"));
                    self.push_operator(OperatorKind::Div);
                }
                TokenKind::Modulo => {
                    self.trace.line(format_args!("lex: modulo"));
                    self.push_operator(OperatorKind::Modulo);
                }
                TokenKind::Comma => {
                    self.trace.line(format_args!("lex: comma"));
                    self.lexemes.push(Lexeme::Comma);
                }
                TokenKind::Equal => {
                    if self.cursor.kind(0) == Some(&TokenKind::Equal) {
                        self.cursor.advance(1);
                        self.trace.line(format_args!("lex: isequal"));
                        self.push_operator(OperatorKind::Equal);
                    } else {
                        self.trace.line(format_args!("lex: assign"));
                        self.lexemes.push(Lexeme::Assign);
                    }
                }
                TokenKind::Exclamation => {
                    if self.cursor.kind(0) == Some(&TokenKind::Equal) {
                        self.cursor.advance(1);
                        self.trace.line(format_args!("lex: isnotequal"));
                        self.push_operator(OperatorKind::NotEqual);
                    } else {
                        return Err(LexError::UnsupportedSyntax { line: token.line });
                    }
                }
                TokenKind::GreaterThan => {
                    if self.cursor.kind(0) == Some(&TokenKind::Equal) {
                        self.cursor.advance(1);
                        self.trace.line(format_args!("lex: isgreaterorequal"));
                        self.push_operator(OperatorKind::GreaterEqual);
                    } else {
                        self.trace.line(format_args!("lex: isgreater"));
                        self.push_operator(OperatorKind::Greater);
                    }
                }
                TokenKind::LessThan => {
                    if self.cursor.kind(0) == Some(&TokenKind::Equal) {
                        self.cursor.advance(1);
                        self.trace.line(format_args!("lex: islessorequal"));
                        self.push_operator(OperatorKind::LessEqual);
                    } else {
                        self.trace.line(format_args!("lex: isless"));
                        self.push_operator(OperatorKind::Less);
                    }
                }
                TokenKind::AddressOf => {
                    self.enter_statement();
                    let name = self.identifier_text("address-of target")?;
                    self.trace.line(format_args!("lex: address of {}", name));
                    self.lexemes.push(Lexeme::AddressOf(name));
                }
                TokenKind::Identifier(name) => self.identifier(name)?,
            }
        }
    }

    /// A statement opens at its first content lexeme; the begin marker goes
    /// immediately before it
    fn enter_statement(&mut self) {
        if !self.in_statement {
            self.in_statement = true;
            self.trace.line(format_args!("lex: statement begin"));
            self.lexemes.push(Lexeme::StatementBegin);
        }
    }

    fn push_operator(&mut self, kind: OperatorKind) {
        self.lexemes.push(Lexeme::Operator(Operator::new(kind)));
    }

    /// Consume the next token, which must be an identifier, and take its text
    fn identifier_text(&mut self, parsing: &'static str) -> Result<String> {
        let token = self.cursor.next(parsing)?;
        match &token.kind {
            TokenKind::Identifier(name) => Ok(name.clone()),
            _ => Err(LexError::ExpectedIdentifier { line: token.line }),
        }
    }

    /// An identifier is, in priority order: a type name opening a
    /// declaration, a reserved word, or a plain usage
    fn identifier(&mut self, name: &str) -> Result<()> {
        if let Some(type_id) = self.types.id_of(name) {
            return self.declaration(type_id);
        }
        match name {
            "endfun" => {
                self.current_function = None;
                self.trace.line(format_args!("lex: function end"));
                self.lexemes.push(Lexeme::FunctionEnd);
            }
            "return" => {
                self.trace.line(format_args!("lex: return"));
                self.lexemes.push(Lexeme::Return);
            }
            "if" => {
                self.trace.line(format_args!("lex: if"));
                self.lexemes.push(Lexeme::If);
            }
            "else" => {
                self.trace.line(format_args!("lex: else"));
                self.lexemes.push(Lexeme::Else);
            }
            "endif" => {
                self.trace.line(format_args!("lex: endif"));
                self.lexemes.push(Lexeme::Endif);
            }
            "break" => {
                self.trace.line(format_args!("lex: break"));
                self.lexemes.push(Lexeme::Break);
            }
            "while" => {
                self.trace.line(format_args!("lex: while"));
                self.lexemes.push(Lexeme::While);
            }
            "endwhile" => {
                self.trace.line(format_args!("lex: endwhile"));
                self.lexemes.push(Lexeme::Endwhile);
            }
            "magic_break" => {
                self.trace.line(format_args!("lex: magic_break"));
                self.lexemes.push(Lexeme::MagicBreak);
            }
            "extern" => {
                self.trace.line(format_args!("lex: extern"));
                let external = self.identifier_text("extern declaration")?;
                // the terminator after the external name is swallowed too
                self.cursor.next("extern declaration")?;
                self.lexemes.push(Lexeme::Extern(external));
            }
            _ => {
                // a plain usage
                self.enter_statement();
                if self.cursor.kind(0) == Some(&TokenKind::OpenBracket) {
                    self.trace.line(format_args!("lex: function call: {}", name));
                    self.lexemes.push(Lexeme::FunctionCall(name.to_string()));
                } else {
                    self.trace.line(format_args!("lex: variable: {}", name));
                    self.lexemes.push(Lexeme::Variable(name.to_string()));
                }
            }
        }
        Ok(())
    }

    /// The type name is consumed; decide the declaration's shape. Pointer
    /// markers are counted only to find the open bracket of a function
    /// declaration and are then discarded.
    fn declaration(&mut self, type_id: TypeId) -> Result<()> {
        let mut stars = 0;
        while self.cursor.kind(stars) == Some(&TokenKind::Mul) {
            stars += 1;
        }
        if self.cursor.kind(stars + 1) == Some(&TokenKind::OpenBracket) {
            self.function_declaration(type_id, stars)
        } else if let Some(function) = self.current_function {
            self.local_variable(type_id, function)
        } else {
            self.global_variable(type_id)
        }
    }

    fn function_declaration(&mut self, return_type: TypeId, stars: usize) -> Result<()> {
        self.cursor.advance(stars);
        let name = self.identifier_text("function name")?;
        // the open bracket that selected this shape
        self.cursor.advance(1);
        self.trace.line(format_args!(
            "lex: function declaration: name = {}, type = {}",
            name,
            self.types.name_of(return_type)
        ));
        self.trace.line(format_args!("lex: arguments:"));
        let mut parameters = Vec::new();
        loop {
            let token = self.cursor.peek(0, "function parameters")?;
            match &token.kind {
                TokenKind::CloseBracket => {
                    self.cursor.advance(1);
                    break;
                }
                TokenKind::Comma => {
                    self.cursor.advance(1);
                    continue;
                }
                _ => (),
            }
            let type_token = self.cursor.next("parameter type")?;
            let type_name = match &type_token.kind {
                TokenKind::Identifier(text) => text.clone(),
                other => other.to_string(),
            };
            let param_type = match self.types.id_of(&type_name) {
                Some(id) => id,
                None => {
                    return Err(LexError::BadParameterType {
                        type_name,
                        parameter: self.peek_name(),
                        function: name.clone(),
                    })
                }
            };
            let param_name = self.identifier_text("parameter name")?;
            self.trace.line(format_args!(
                "lex: argument declaration: name = {}, type = {}",
                param_name,
                self.types.name_of(param_type)
            ));
            parameters.push(TypedName { name: param_name, type_id: param_type });
        }
        self.trace.line(format_args!("lex: end of declaration, arg count = {}", parameters.len()));
        let id = self.functions.len();
        self.functions.push(FunctionDeclaration {
            name,
            return_type,
            parameters,
            locals: Vec::new(),
        });
        self.lexemes.push(Lexeme::FunctionDeclaration(id));
        self.current_function = Some(id);
        Ok(())
    }

    /// The would-be name at the cursor, for diagnostics only
    fn peek_name(&self) -> String {
        match self.cursor.kind(0) {
            Some(TokenKind::Identifier(name)) => name.clone(),
            _ => String::from("?"),
        }
    }

    fn local_variable(&mut self, type_id: TypeId, function: FnId) -> Result<()> {
        let name_token = self.cursor.peek(0, "local declaration")?;
        let name = match &name_token.kind {
            TokenKind::Identifier(name) => name.clone(),
            _ => return Err(LexError::ExpectedIdentifier { line: name_token.line }),
        };
        self.trace.line(format_args!(
            "lex: local variable declaration: name = {}, type = {}",
            name,
            self.types.name_of(type_id)
        ));
        self.functions[function].locals.push(TypedName { name, type_id });
        if self.cursor.kind(1) == Some(&TokenKind::Semicolon) {
            // bare declaration: nothing reaches the output, skip `name ;`
            self.cursor.advance(2);
        } else {
            // an initializer follows: reopen as a statement so the
            // assignment is lexed normally, starting from the name
            self.in_statement = true;
            self.trace.line(format_args!("lex: statement begin"));
            self.lexemes.push(Lexeme::StatementBegin);
        }
        Ok(())
    }

    fn global_variable(&mut self, type_id: TypeId) -> Result<()> {
        let name = self.identifier_text("global declaration")?;
        self.trace.line(format_args!(
            "lex: global variable declaration: name = {}, type = {}",
            name,
            self.types.name_of(type_id)
        ));
        let terminator = self.cursor.next("global declaration")?;
        if terminator.kind != TokenKind::Semicolon {
            return Err(LexError::ExpectedSemicolon { line: terminator.line });
        }
        self.lexemes.push(Lexeme::VariableDeclaration(VariableDeclaration { name, type_id }));
        Ok(())
    }
}
