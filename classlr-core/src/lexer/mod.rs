// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.


use std::fmt::{Display, Formatter};
use crate::{TokenId, END_TOKEN};

// ---------------------------------------------------------------------------------------------
// Positions

pub type CaretLine = u64;
pub type CaretCol = u64;

/// Line and column of a character in the source, both starting at 1.
#[derive(Clone, Copy, Default, PartialEq, PartialOrd, Eq, Ord, Debug)]
pub struct Pos(pub CaretLine, pub CaretCol);

impl Pos {
    pub fn line(&self) -> CaretLine {
        self.0
    }

    pub fn col(&self) -> CaretCol {
        self.1
    }
}

impl Display for Pos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, col {}", self.0, self.1)
    }
}

/// `PosSpan` defines a text selection where `first` and `last` are the [position](Pos) of the first and last character.
/// When `first` > `last`, no text is selected.
#[derive(Clone, PartialEq, Debug)]
pub struct PosSpan {
    pub first: Pos,
    pub last: Pos,
}

impl PosSpan {
    #[inline(always)]
    pub fn new(first: Pos, last: Pos) -> Self {
        PosSpan { first, last }
    }

    #[inline(always)]
    pub fn empty() -> Self {
        PosSpan { first: Pos(1, 1), last: Pos(0, 0) }
    }

    /// Span of a single position, typically used for the end of input.
    #[inline(always)]
    pub fn at(pos: Pos) -> Self {
        PosSpan { first: pos, last: pos }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }

    pub fn first(&self) -> Option<Pos> {
        if self.is_empty() { None } else { Some(self.first) }
    }
}

impl Default for PosSpan {
    fn default() -> Self {
        PosSpan::empty()
    }
}

impl Display for PosSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            write!(f, "<empty>")
        } else {
            let (first, last) = (&self.first, &self.last);
            if first == last {
                write!(f, "{}:{}", first.0, first.1)
            } else if first.0 == last.0 {
                write!(f, "{}:{}-{}", first.0, first.1, last.1)
            } else {
                write!(f, "{}:{}-{}:{}", first.0, first.1, last.0, last.1)
            }
        }
    }
}

// ---------------------------------------------------------------------------------------------
// Tokens

/// Value carried by a terminal. Keywords and punctuation carry no value.
#[derive(Clone, PartialEq, Debug, Default)]
pub enum Payload {
    #[default]
    None,
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    /// Text that couldn't be recognized by the lexer
    Invalid(String),
}

impl Display for Payload {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Payload::None => Ok(()),
            Payload::Ident(s) | Payload::Invalid(s) => write!(f, "{s}"),
            Payload::Int(i) => write!(f, "{i}"),
            Payload::Float(x) => write!(f, "{x}"),
            Payload::Str(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token {
    pub id: TokenId,
    pub payload: Payload,
    pub span: PosSpan,
}

impl Token {
    pub fn new(id: TokenId, payload: Payload, span: PosSpan) -> Self {
        Token { id, payload, span }
    }

    /// Token without payload and without position, mostly useful to feed hand-made sequences.
    pub fn bare(id: TokenId) -> Self {
        Token { id, payload: Payload::None, span: PosSpan::empty() }
    }

    pub fn end(span: PosSpan) -> Self {
        Token { id: END_TOKEN, payload: Payload::None, span }
    }

    pub fn is_end(&self) -> bool {
        self.id == END_TOKEN
    }
}

// ---------------------------------------------------------------------------------------------
// Token source

/// Raised by a token source to stop the parsing. The parser releases its stacks and returns
/// [ParserError::Aborted](crate::parser::ParserError::Aborted).
#[derive(Clone, PartialEq, Debug, thiserror::Error)]
#[error("token source aborted: {0}")]
pub struct SourceError(pub String);

/// Pull interface between the parser and the lexer.
///
/// Once the input is exhausted, the source must keep returning the end-of-input token.
pub trait TokenSource {
    fn next_token(&mut self) -> Result<Token, SourceError>;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    fn next_token(&mut self) -> Result<Token, SourceError> {
        (**self).next_token()
    }
}

/// Adapts an iterator of tokens into a [TokenSource]. When the iterator is exhausted, the adapter
/// returns the end-of-input token, positioned after the last token.
pub struct TokenIter<I> {
    iter: I,
    last: Pos,
}

impl<I: Iterator<Item = Token>> TokenIter<I> {
    pub fn new<T: IntoIterator<IntoIter = I>>(tokens: T) -> Self {
        TokenIter { iter: tokens.into_iter(), last: Pos::default() }
    }
}

impl<I: Iterator<Item = Token>> TokenSource for TokenIter<I> {
    fn next_token(&mut self) -> Result<Token, SourceError> {
        match self.iter.next() {
            Some(token) => {
                if !token.span.is_empty() {
                    self.last = token.span.last;
                }
                Ok(token)
            }
            None => Ok(Token::end(if self.last == Pos::default() { PosSpan::empty() } else { PosSpan::at(self.last) })),
        }
    }
}
