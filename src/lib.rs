// the front-end stops at the lexeme IR; codegen picks it up from there

#[macro_use]
extern crate log;

mod intermediates;
mod passes;
mod trace;
mod types;

pub use crate::intermediates::lexeme::{
    FnId, FunctionDeclaration, Ir, Lexeme, Operator, OperatorKind, TypedName, VariableDeclaration,
};
pub use crate::intermediates::token::{Token, TokenKind};
pub use crate::passes::{lex, tokenize, LexError, TokenizeError};
pub use crate::trace::Trace;
pub use crate::types::{TypeId, TypeTable};

/// Everything that can go wrong between source text and the lexeme IR,
/// from either pass
#[derive(Debug)]
pub enum CompileError {
    Tokenize(TokenizeError),
    Lex(LexError),
}
impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CompileError::Tokenize(err) => write!(f, "{}", err),
            CompileError::Lex(err) => write!(f, "{}", err),
        }
    }
}
// All relevant details in Display and Debug
impl std::error::Error for CompileError {}
impl From<TokenizeError> for CompileError {
    fn from(err: TokenizeError) -> Self {
        CompileError::Tokenize(err)
    }
}
impl From<LexError> for CompileError {
    fn from(err: LexError) -> Self {
        CompileError::Lex(err)
    }
}

/// Run both passes over `source`: tokenize into the flat token stream, then
/// lex that into the lexeme IR. `types` is the closed table of recognized
/// type names and `trace` receives one line per classification decision
/// (pass [Trace::off] to drop them).
pub fn lex_source(source: &str, types: &TypeTable, trace: Trace) -> Result<Ir, CompileError> {
    let tokens = tokenize(source)?;
    let ir = lex(&tokens, types, trace)?;
    debug!(
        "front: {} tokens -> {} lexemes, {} functions",
        tokens.len(),
        ir.lexemes.len(),
        ir.functions.len()
    );
    Ok(ir)
}
