// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::fmt::{Display, Formatter};
use crate::fixed_sym_table::{FixedSymTable, SymInfoTable};
use crate::lexer::{Payload, Pos, SourceError, Token, TokenSource};
use crate::log::Logger;
use crate::table::{Action, ParseTables, ProdInfo};
use crate::{CollectJoin, ProdId, StateId, TokenId, VarId, END_TOKEN};

mod hooks;
mod recovery;
mod stack;
pub(crate) mod tests;

pub use hooks::{NoopHooks, ParseNode, SemanticHooks, TreeBuilder};
pub use recovery::{RecoveryStatus, RECOVERY_SHIFTS};
pub use stack::ParseStack;
use recovery::Recovery;

// ---------------------------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Debug, Hash)]
pub enum Symbol {
    T(TokenId),         // terminal
    NT(VarId),          // nonterminal
}

impl Symbol {
    /// Converts the symbol to string, using the symbol table if available, and
    /// surrounding it with quotes if it's a fixed terminal.
    pub fn to_str_quote<T: SymInfoTable>(&self, symbol_table: Option<&T>) -> String {
        symbol_table.map(|t| t.get_name_quote(self)).unwrap_or(self.to_string())
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::T(id) => write!(f, ":{id}"),
            Symbol::NT(id) => write!(f, "{id}"),
        }
    }
}

// ---------------------------------------------------------------------------------------------

/// Fatal conditions that stop a parse. Syntax errors aren't part of it: they're recovered,
/// counted in [ParseOutcome::error_count], and reported in the hooks' log.
#[derive(Clone, PartialEq, Debug, thiserror::Error)]
pub enum ParserError {
    #[error("parser stack exhausted (limit of {limit} entries)")]
    StackExhausted { limit: usize },
    #[error(transparent)]
    Aborted(#[from] SourceError),
    #[error("no transition from state {state} on nonterminal {var}")]
    MissingGoto { state: StateId, var: VarId },
}

/// Result of a parse that ran to its end.
#[derive(Clone, PartialEq, Debug)]
pub struct ParseOutcome<V> {
    /// The automaton reached the accept state, possibly after recovering from errors.
    pub accepted: bool,
    /// Number of syntax errors reported
    pub error_count: u32,
    /// Value of the start symbol, when accepted
    pub value: Option<V>,
}

impl<V> ParseOutcome<V> {
    /// The input was accepted without any error.
    pub fn is_success(&self) -> bool {
        self.accepted && self.error_count == 0
    }
}

#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Initial capacity of the parser stacks
    pub initial_depth: usize,
    /// Maximum depth of the parser stacks
    pub max_depth: usize,
    /// Stops the parse when more errors than this have been reported
    pub max_errors: Option<u32>,
}

impl ParserConfig {
    pub const INITIAL_DEPTH: usize = 200;
    pub const MAX_DEPTH: usize = 10_000;

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_errors(mut self, max_errors: u32) -> Self {
        self.max_errors = Some(max_errors);
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig { initial_depth: Self::INITIAL_DEPTH, max_depth: Self::MAX_DEPTH, max_errors: None }
    }
}

// ---------------------------------------------------------------------------------------------

/// Mutable part of a parse, besides the stacks.
#[derive(Debug, Default)]
pub(crate) struct ParseContext {
    lookahead: Option<Token>,
    status: RecoveryStatus,
    error_count: u32,
    /// Note of the last resynchronization, logged once the parse has gone past it
    resync_note: Option<String>,
}

impl ParseContext {
    /// Returns the lookahead terminal, pulling a new token from the source if there's none.
    fn peek<S: TokenSource>(&mut self, source: &mut S) -> Result<TokenId, ParserError> {
        match &self.lookahead {
            Some(token) => Ok(token.id),
            None => {
                let token = source.next_token()?;
                let id = token.id;
                self.lookahead = Some(token);
                Ok(id)
            }
        }
    }

    fn flush_resync_note<L: Logger>(&mut self, log: &mut L) {
        if let Some(note) = self.resync_note.take() {
            log.add_note(note);
        }
    }
}

enum Flow<V> {
    Accept(Option<V>),
    GiveUp,
}

/// LR parser driven by [ParseTables].
///
/// The tables are only read, so any number of parsers can share them, and each call to
/// [parse](Parser::parse) uses its own stacks.
pub struct Parser<'a> {
    tables: &'a ParseTables,
    config: ParserConfig,
}

impl<'a> Parser<'a> {
    pub const INITIAL_STATE: StateId = 0;

    pub fn new(tables: &'a ParseTables) -> Self {
        Parser { tables, config: ParserConfig::default() }
    }

    pub fn with_config(tables: &'a ParseTables, config: ParserConfig) -> Self {
        Parser { tables, config }
    }

    pub fn get_symbol_table(&self) -> &FixedSymTable {
        self.tables.get_symbol_table()
    }

    /// Parses the tokens of `source`, calling `hooks` on each shift and reduction.
    ///
    /// Syntax errors are reported in the hooks' log and recovered when possible. The outcome
    /// tells whether the input was accepted and how many errors were found; an input that
    /// couldn't be recovered is not accepted. Stack exhaustion, abort requests from the source
    /// and inconsistent tables end the parse with an error.
    ///
    /// Whatever the outcome, all the values left on the stack are released through the hooks.
    pub fn parse<S, H>(&self, mut source: S, hooks: &mut H) -> Result<ParseOutcome<H::Value>, ParserError>
    where
        S: TokenSource,
        H: SemanticHooks,
    {
        let mut stack = ParseStack::new(self.config.initial_depth, self.config.max_depth);
        let mut ctx = ParseContext::default();
        let bottom = hooks.placeholder();
        stack.push(Self::INITIAL_STATE, bottom);
        let result = self.drive(&mut source, hooks, &mut stack, &mut ctx);
        stack.release_all(hooks);
        if let Some(token) = ctx.lookahead.take() {
            hooks.discard(token);
        }
        match result? {
            Flow::Accept(value) => Ok(ParseOutcome { accepted: true, error_count: ctx.error_count, value }),
            Flow::GiveUp => Ok(ParseOutcome { accepted: false, error_count: ctx.error_count, value: None }),
        }
    }

    fn drive<S, H>(&self, source: &mut S, hooks: &mut H, stack: &mut ParseStack<H::Value>, ctx: &mut ParseContext)
        -> Result<Flow<H::Value>, ParserError>
    where
        S: TokenSource,
        H: SemanticHooks,
    {
        const VERBOSE: bool = false;
        loop {
            let id = ctx.peek(source)?;
            let state = stack.top_state();
            let action = self.tables.action(state, id);
            if VERBOSE {
                println!("{:?} <- {} : {action}", stack.states(), self.get_symbol_table().get_t_name(id));
            }
            match action {
                Action::Shift(next) => {
                    stack.reserve_one()?;
                    if let Some(token) = ctx.lookahead.take() {
                        let value = hooks.shift(token);
                        stack.push(next, value);
                        ctx.status.on_real_shift();
                        if ctx.status.reports_errors() {
                            ctx.flush_resync_note(hooks.get_mut_log());
                        }
                    }
                }
                Action::Reduce(prod) => self.reduce(prod, hooks, stack)?,
                Action::Accept => {
                    ctx.flush_resync_note(hooks.get_mut_log());
                    let value = stack.pop().map(|(_, v)| v);
                    return Ok(Flow::Accept(value));
                }
                Action::Error => {
                    if self.recover(source, hooks, stack, ctx)? == Recovery::GiveUp {
                        return Ok(Flow::GiveUp);
                    }
                }
            }
        }
    }

    fn reduce<H: SemanticHooks>(&self, prod: ProdId, hooks: &mut H, stack: &mut ParseStack<H::Value>) -> Result<(), ParserError> {
        let ProdInfo { lhs, len } = self.tables.prod(prod);
        if len == 0 {
            stack.reserve_one()?;
        }
        let children = stack.pop_values(len as usize);
        let state = stack.top_state();
        let value = hooks.reduce(prod, children);
        match self.tables.goto(state, lhs) {
            Some(next) => {
                stack.push(next, value);
                Ok(())
            }
            None => {
                hooks.release(value);
                Err(ParserError::MissingGoto { state, var: lhs })
            }
        }
    }

    /// Text of a token in diagnostics: its value if it has one, otherwise its representation.
    pub(crate) fn token_text(&self, token: &Token) -> String {
        match &token.payload {
            Payload::None => self.get_symbol_table().get_t_str(token.id),
            payload => payload.to_string(),
        }
    }

    pub(crate) fn error_message(&self, state: StateId, token: &Token) -> String {
        let sym_table = self.get_symbol_table();
        let expected = self.tables.expected_tokens(state).into_iter()
            .map(|t| if t == END_TOKEN { "<EOF>".to_string() } else { format!("'{}'", sym_table.get_t_str(t)) })
            .join(", ");
        let found = if token.is_end() { "end of stream".to_string() } else { format!("input '{}'", self.token_text(token)) };
        format!("syntax error: found {found} instead of {expected}{}",
                if let Some(Pos(line, col)) = token.span.first() { format!(", line {line}, col {col}") } else { String::new() })
    }
}
