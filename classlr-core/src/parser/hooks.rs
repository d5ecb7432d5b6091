// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use crate::fixed_sym_table::SymInfoTable;
use crate::lexer::{Payload, Token};
use crate::log::{BufLog, Logger};
use crate::table::ParseTables;
use crate::ProdId;

/// Callbacks used by the parser to build semantic values.
///
/// The parser never looks into the values: it only moves them between the lookahead,
/// its value stack and these hooks. Every value produced by [shift](SemanticHooks::shift),
/// [reduce](SemanticHooks::reduce) or [placeholder](SemanticHooks::placeholder) is eventually
/// either given back as a child of a reduction, released, or returned as the result of the parse.
pub trait SemanticHooks {
    type Value;

    /// Converts a shifted terminal into a value.
    fn shift(&mut self, token: Token) -> Self::Value;

    /// Builds the value of the left-hand nonterminal of `prod` from the values of its
    /// right-hand symbols, oldest first.
    fn reduce(&mut self, prod: ProdId, children: Vec<Self::Value>) -> Self::Value;

    /// Value of the error terminal shifted by the recovery, also used at the bottom of the stack.
    fn placeholder(&mut self) -> Self::Value;

    /// Releases a value that won't be used, when the stack is unwound by a recovery or
    /// at the end of the parse.
    fn release(&mut self, _value: Self::Value) {}

    /// Receives the input tokens skipped during a recovery.
    fn discard(&mut self, _token: Token) {}

    /// Gets access to the hooks' log, where the parser reports syntax errors and notes.
    fn get_mut_log(&mut self) -> &mut impl Logger;
}

// ---------------------------------------------------------------------------------------------

/// Hooks that only count what the parser does.
#[derive(Debug, Default)]
pub struct NoopHooks {
    pub log: BufLog,
    pub num_shift: usize,
    pub num_reduce: usize,
    pub num_release: usize,
    pub num_discard: usize,
}

impl NoopHooks {
    pub fn new() -> Self {
        NoopHooks::default()
    }
}

impl SemanticHooks for NoopHooks {
    type Value = ();

    fn shift(&mut self, _token: Token) {
        self.num_shift += 1;
    }

    fn reduce(&mut self, _prod: ProdId, _children: Vec<()>) {
        self.num_reduce += 1;
    }

    fn placeholder(&mut self) {}

    fn release(&mut self, _value: ()) {
        self.num_release += 1;
    }

    fn discard(&mut self, _token: Token) {
        self.num_discard += 1;
    }

    fn get_mut_log(&mut self) -> &mut impl Logger {
        &mut self.log
    }
}

// ---------------------------------------------------------------------------------------------

/// Concrete parse tree.
#[derive(Clone, PartialEq, Debug)]
pub enum ParseNode {
    Leaf(Token),
    Node { prod: ProdId, children: Vec<ParseNode> },
    /// Error terminal inserted by the recovery
    Error,
}

impl ParseNode {
    /// Renders the tree as an s-expression, using the names of the symbol table.
    ///
    /// Chains of single-child nodes are collapsed into their last node, so `expr -> postfix -> primary -> ID`
    /// is shown as the identifier.
    pub fn to_sexpr(&self, tables: &ParseTables) -> String {
        let sym_table = tables.get_symbol_table();
        match self {
            ParseNode::Leaf(token) => match &token.payload {
                Payload::None => sym_table.get_t_str(token.id),
                payload => payload.to_string(),
            },
            ParseNode::Node { children, .. } if children.len() == 1 => children[0].to_sexpr(tables),
            ParseNode::Node { prod, children } => {
                let name = sym_table.get_nt_name(tables.prod(*prod).lhs);
                let mut s = format!("({name}");
                for child in children {
                    s.push(' ');
                    s.push_str(&child.to_sexpr(tables));
                }
                s.push(')');
                s
            }
            ParseNode::Error => "error".to_string(),
        }
    }

    /// Number of error placeholders in the tree.
    pub fn count_errors(&self) -> usize {
        match self {
            ParseNode::Leaf(_) => 0,
            ParseNode::Node { children, .. } => children.iter().map(|c| c.count_errors()).sum(),
            ParseNode::Error => 1,
        }
    }
}

/// Hooks that build a [ParseNode] tree.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    pub log: BufLog,
    pub num_release: usize,
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder::default()
    }
}

impl SemanticHooks for TreeBuilder {
    type Value = ParseNode;

    fn shift(&mut self, token: Token) -> ParseNode {
        ParseNode::Leaf(token)
    }

    fn reduce(&mut self, prod: ProdId, children: Vec<ParseNode>) -> ParseNode {
        ParseNode::Node { prod, children }
    }

    fn placeholder(&mut self) -> ParseNode {
        ParseNode::Error
    }

    fn release(&mut self, _value: ParseNode) {
        self.num_release += 1;
    }

    fn get_mut_log(&mut self) -> &mut impl Logger {
        &mut self.log
    }
}
