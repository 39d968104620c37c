//! The data passed between passes: flat [token::Token]s going into the lex
//! pass, classified [lexeme::Lexeme]s coming out.

pub mod lexeme;
pub mod token;
