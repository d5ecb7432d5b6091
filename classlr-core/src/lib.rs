// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

pub mod fixed_sym_table;
pub mod log;
pub mod lexer;
pub mod parser;
pub mod table;

// package name & version
pub const CORE_PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const CORE_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// ID of a terminal (token category produced by the lexer)
pub type TokenId = u16;
/// ID of a nonterminal
pub type VarId = u16;
/// ID of a production. Productions are numbered in the order they're declared in the grammar.
pub type ProdId = u16;
/// ID of an automaton state
pub type StateId = u32;

/// End of input. Every token source ends with this terminal.
pub const END_TOKEN: TokenId = 0;
/// Special terminal shifted by the error recovery.
pub const ERROR_TOKEN: TokenId = 1;
/// Terminal produced by a token source when it meets malformed input.
pub const INVALID_TOKEN: TokenId = 2;

pub trait CollectJoin {
    fn join(&mut self, separator: &str) -> String
        where Self: Iterator,
              <Self as Iterator>::Item: ToString
    {
        self.map(|x| x.to_string()).collect::<Vec<_>>().join(separator)
    }

    fn to_vec(self) -> Vec<<Self as Iterator>::Item>
        where Self: Iterator + Sized
    {
        self.collect::<Vec<_>>()
    }
}

impl<I: Iterator> CollectJoin for I {}
