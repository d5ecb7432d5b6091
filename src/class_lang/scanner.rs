// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Hand-written scanner of the class language.

use classlr_core::lexer::{CaretCol, CaretLine, Payload, Pos, PosSpan, SourceError, Token, TokenSource};
use classlr_core::{TokenId, INVALID_TOKEN};
use super::t::*;

/// Scanner over a source text. It implements [TokenSource], so it can be given directly
/// to the parser.
///
/// Characters that can't start a token, unterminated strings or comments, and numbers that
/// don't fit are returned as [INVALID_TOKEN] with the offending text in the payload.
pub struct Scanner<'a> {
    text: &'a str,
    offset: usize,
    line: CaretLine,
    col: CaretCol,
    last: Pos,
}

impl<'a> Scanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Scanner { text, offset: 0, line: 1, col: 1, last: Pos(1, 1) }
    }

    /// Scans the whole text. The end-of-input token isn't included.
    pub fn tokens(text: &'a str) -> Vec<Token> {
        let mut scanner = Scanner::new(text);
        std::iter::from_fn(|| Some(scanner.scan()).filter(|t| !t.is_end())).collect()
    }

    fn pos(&self) -> Pos {
        Pos(self.line, self.col)
    }

    fn peek(&self) -> Option<char> {
        self.text[self.offset..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.text[self.offset..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        self.last = self.pos();
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn bump_while<F: Fn(char) -> bool>(&mut self, f: F) {
        while self.peek().is_some_and(&f) {
            self.bump();
        }
    }

    /// Skips the white spaces and the comments. An unterminated block comment is returned as
    /// an invalid token.
    fn skip_blanks(&mut self) -> Option<Token> {
        loop {
            match (self.peek(), self.peek_nth(1)) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => self.bump_while(|c| c != '\n'),
                (Some('/'), Some('*')) => {
                    let (start, first) = (self.offset, self.pos());
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.eat('/') => break,
                            Some(_) => {}
                            None => {
                                let text = self.text[start..].to_string();
                                return Some(Token::new(INVALID_TOKEN, Payload::Invalid(text), PosSpan::new(first, self.last)));
                            }
                        }
                    }
                }
                _ => return None,
            }
        }
    }

    pub fn scan(&mut self) -> Token {
        if let Some(token) = self.skip_blanks() {
            return token;
        }
        let (start, first) = (self.offset, self.pos());
        let Some(c) = self.bump() else {
            return Token::end(PosSpan::at(first));
        };
        let (id, payload) = match c {
            'a'..='z' | 'A'..='Z' | '_' => self.word(start),
            '0'..='9' => self.number(start),
            '"' => self.string(start),
            _ => {
                let id = match c {
                    '=' => if self.eat('=') { EQ } else { EQUALS },
                    ':' => if self.eat('=') { ASSIGN } else if self.eat(':') { SCOPE } else { COLON },
                    '<' => if self.eat('=') { LE } else if self.eat('>') { NE } else { LT },
                    '>' => if self.eat('=') { GE } else { GT },
                    '+' => PLUS,
                    '-' => MINUS,
                    '*' => MULT,
                    '/' => DIV,
                    '(' => LPAREN,
                    ')' => RPAREN,
                    '{' => LBRACE,
                    '}' => RBRACE,
                    '[' => LBRACKET,
                    ']' => RBRACKET,
                    ';' => SEMI,
                    ',' => COMMA,
                    '.' => DOT,
                    _ => INVALID_TOKEN,
                };
                if id == INVALID_TOKEN { (id, Payload::Invalid(c.to_string())) } else { (id, Payload::None) }
            }
        };
        Token::new(id, payload, PosSpan::new(first, self.last))
    }

    fn word(&mut self, start: usize) -> (TokenId, Payload) {
        self.bump_while(|c| c.is_ascii_alphanumeric() || c == '_');
        let word = &self.text[start..self.offset];
        let id = match word {
            "if" => IF,
            "else" => ELSE,
            "while" => WHILE,
            "then" => THEN,
            "read" => READ,
            "write" => WRITE,
            "return" => RETURN,
            "integer" => INTEGER_KW,
            "float" => FLOAT_KW,
            "void" => VOID,
            "and" => AND,
            "or" => OR,
            "not" => NOT,
            "class" => CLASS,
            "func" => FUNC,
            "implement" => IMPLEMENT,
            "isa" => ISA,
            "private" => PRIVATE,
            "public" => PUBLIC,
            "local" => LOCAL,
            "attribute" => ATTRIBUTE,
            _ => return (ID, Payload::Ident(word.to_string())),
        };
        (id, Payload::None)
    }

    /// `[0-9]+ ('.' [0-9]+)? ([eE] [+-]? [0-9]+)?`
    fn number(&mut self, start: usize) -> (TokenId, Payload) {
        let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        self.bump_while(|c| c.is_ascii_digit());
        let mut is_float = false;
        if self.peek() == Some('.') && is_digit(self.peek_nth(1)) {
            is_float = true;
            self.bump();
            self.bump_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = matches!(self.peek_nth(1), Some('+' | '-'));
            if is_digit(self.peek_nth(if sign { 2 } else { 1 })) {
                is_float = true;
                self.bump();
                if sign {
                    self.bump();
                }
                self.bump_while(|c| c.is_ascii_digit());
            }
        }
        let text = &self.text[start..self.offset];
        let value = if is_float {
            text.parse::<f64>().ok().filter(|x| x.is_finite()).map(|x| (FLOAT, Payload::Float(x)))
        } else {
            text.parse::<i64>().ok().map(|n| (INT, Payload::Int(n)))
        };
        value.unwrap_or_else(|| (INVALID_TOKEN, Payload::Invalid(text.to_string())))
    }

    /// String literal with the escape codes `\n`, `\t`, `\"` and `\\`; other escapes are kept as they are.
    /// A string can't span several lines.
    fn string(&mut self, start: usize) -> (TokenId, Payload) {
        let mut value = String::new();
        loop {
            match self.peek() {
                None | Some('\n') => break,
                Some('"') => {
                    self.bump();
                    return (STRING, Payload::Str(value));
                }
                Some('\\') => {
                    self.bump();
                    match self.peek() {
                        Some('n') => value.push('\n'),
                        Some('t') => value.push('\t'),
                        Some(c @ ('"' | '\\')) => value.push(c),
                        Some('\n') | None => break,
                        Some(c) => {
                            value.push('\\');
                            value.push(c);
                        }
                    }
                    self.bump();
                }
                Some(c) => {
                    value.push(c);
                    self.bump();
                }
            }
        }
        (INVALID_TOKEN, Payload::Invalid(self.text[start..self.offset].to_string()))
    }
}

impl TokenSource for Scanner<'_> {
    fn next_token(&mut self) -> Result<Token, SourceError> {
        Ok(self.scan())
    }
}
