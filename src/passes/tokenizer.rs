// Character-level pass: chops source text into the flat token stream.
// Compound operators like == and += are NOT formed here, that's the lex
// pass's job; this pass only knows characters.

use crate::intermediates::token::{Token, TokenKind};

// Rules: A-Z, a-z, underscore
fn is_id_1st(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

// continuation also allows 0-9
fn is_id(c: char) -> bool {
    is_id_1st(c) || c.is_ascii_digit()
}

#[derive(PartialEq, Debug)]
pub enum TokenizeError {
    UnknownCharacter { character: char, line: usize },
    IntegerOverflow { line: usize },
}
impl std::fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use TokenizeError::*;
        match self {
            UnknownCharacter { character, line } => {
                write!(f, "[ERROR] line {}: unknown character `{}`", line, character)
            }
            IntegerOverflow { line } => {
                write!(f, "[ERROR] line {}: integer literal out of range", line)
            }
        }
    }
}
// All relevant details in Display and Debug
impl std::error::Error for TokenizeError {}

struct Tokenizer {
    rchars: Vec<char>,
    line: usize,
    tokens: Vec<Token>,
}

impl Tokenizer {
    fn new(source: &str) -> Tokenizer {
        Tokenizer { rchars: source.chars().rev().collect(), line: 1, tokens: Vec::new() }
    }
    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.line));
    }
}

/// Tokenize the whole source. The returned stream always ends in exactly
/// one [TokenKind::Eof].
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizeError> {
    use TokenKind::*;
    let mut tokenizer = Tokenizer::new(source);
    while let Some(c) = tokenizer.rchars.pop() {
        match c {
            ' ' | '\t' | '\r' => (),
            '\n' => tokenizer.line += 1,
            '{' => tokenizer.push(OpenBrace),
            '}' => tokenizer.push(CloseBrace),
            '(' => tokenizer.push(OpenBracket),
            ')' => tokenizer.push(CloseBracket),
            ';' => tokenizer.push(Semicolon),
            '+' => tokenizer.push(Add),
            '-' => tokenizer.push(Sub),
            '*' => tokenizer.push(Mul),
            '/' => tokenizer.push(Div),
            '%' => tokenizer.push(Modulo),
            ',' => tokenizer.push(Comma),
            '=' => tokenizer.push(Equal),
            '!' => tokenizer.push(Exclamation),
            '>' => tokenizer.push(GreaterThan),
            '<' => tokenizer.push(LessThan),
            '&' => tokenizer.push(AddressOf),
            '0'..='9' => {
                let mut string = c.to_string();
                while let Some('0'..='9') = tokenizer.rchars.last() {
                    string.push(tokenizer.rchars.pop().unwrap());
                }
                match string.parse() {
                    Ok(number) => tokenizer.push(Integer(number)),
                    Err(_) => return Err(TokenizeError::IntegerOverflow { line: tokenizer.line }),
                }
            }
            c if is_id_1st(c) => {
                let mut text = c.to_string();
                loop {
                    match tokenizer.rchars.last() {
                        Some(&x) if is_id(x) => {
                            text.push(x);
                            tokenizer.rchars.pop();
                        }
                        _ => break,
                    }
                }
                tokenizer.push(Identifier(text));
            }
            c => return Err(TokenizeError::UnknownCharacter { character: c, line: tokenizer.line }),
        }
    }
    tokenizer.push(Eof);
    debug!("tokenize: {} tokens", tokenizer.tokens.len());
    Ok(tokenizer.tokens)
}
