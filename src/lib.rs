// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

mod macros;
pub mod build;
pub mod symbol_table;
pub mod grammar;
pub mod lalr;
pub mod class_lang;

pub use classlr_core::{CollectJoin, ProdId, StateId, TokenId, VarId};
pub use classlr_core::{fixed_sym_table, lexer, log, parser, table};

// package name & version
pub const CLASSLR_PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const CLASSLR_PKG_VERSION: &str = env!("CARGO_PKG_VERSION");
