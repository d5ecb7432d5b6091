// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use crate::fixed_sym_table::SymInfoTable;
use crate::lexer::{Pos, TokenSource};
use crate::log::Logger;
use crate::parser::{ParseContext, ParseStack, Parser, ParserError, SemanticHooks};
use crate::table::Action;
use crate::{END_TOKEN, ERROR_TOKEN};

/// Number of real tokens that must be shifted after a resynchronization before new errors are reported.
pub const RECOVERY_SHIFTS: u8 = 3;

/// Error-recovery state of a parse.
///
/// ```text
/// Normal --(error)--> Recovering(3) --(shift)--> Recovering(2) --(shift)--> Recovering(1) --(shift)--> Normal
///                      ^     |                         |                         |
///                      +-----+-------(error)-----------+-------------------------+
/// ```
/// Only errors met in `Normal` are reported and counted.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub enum RecoveryStatus {
    #[default]
    Normal,
    /// Number of real tokens left to shift before going back to `Normal`
    Recovering(u8),
}

impl RecoveryStatus {
    pub fn reports_errors(&self) -> bool {
        matches!(self, RecoveryStatus::Normal)
    }

    /// The error terminal has been shifted, but no real token since then.
    pub fn is_fresh(&self) -> bool {
        *self == RecoveryStatus::Recovering(RECOVERY_SHIFTS)
    }

    pub fn on_error_shift(&mut self) {
        *self = RecoveryStatus::Recovering(RECOVERY_SHIFTS);
    }

    pub fn on_real_shift(&mut self) {
        *self = match *self {
            RecoveryStatus::Recovering(n) if n > 1 => RecoveryStatus::Recovering(n - 1),
            _ => RecoveryStatus::Normal,
        }
    }
}

/// Result of an error recovery.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Recovery {
    /// The parser can resume with the current lookahead.
    Resync,
    /// No resynchronization is possible; the parse stops.
    GiveUp,
}

fn pos_str(pos: Option<Pos>) -> String {
    if let Some(Pos(line, col)) = pos { format!(", line {line}, col {col}") } else { String::new() }
}

impl Parser<'_> {
    /// Panic-mode recovery, entered when the lookahead has no action in the top state.
    ///
    /// Pops the stack down to a state that shifts the error terminal, shifts it, then skips the
    /// input tokens until one can be parsed from there. The resynchronization is only reported
    /// once enough tokens have been shifted after it, or when the input is accepted.
    pub(crate) fn recover<S, H>(&self, source: &mut S, hooks: &mut H, stack: &mut ParseStack<H::Value>, ctx: &mut ParseContext)
        -> Result<Recovery, ParserError>
    where
        S: TokenSource,
        H: SemanticHooks,
    {
        const VERBOSE: bool = false;
        let sym_table = self.tables.get_symbol_table();
        // the last resynchronization didn't hold
        ctx.resync_note = None;
        let Some(token) = ctx.lookahead.take() else {
            return Ok(Recovery::GiveUp);
        };
        if ctx.status.reports_errors() {
            ctx.error_count += 1;
            let msg = self.error_message(stack.top_state(), &token);
            if VERBOSE { println!("{msg}"); }
            hooks.get_mut_log().add_error(msg);
            if let Some(max) = self.config.max_errors {
                if ctx.error_count > max {
                    hooks.get_mut_log().add_note(format!("too many errors ({}), giving up", ctx.error_count));
                    hooks.discard(token);
                    return Ok(Recovery::GiveUp);
                }
            }
            ctx.lookahead = Some(token);
        } else if ctx.status.is_fresh() {
            // the synchronizing token led nowhere: drop it, or we'd loop on it
            if token.is_end() {
                hooks.get_mut_log().add_error(format!("irrecoverable error, reached end of stream{}", pos_str(token.span.first())));
                hooks.discard(token);
                return Ok(Recovery::GiveUp);
            }
            if VERBOSE { println!("(recovering) skipping token {}", sym_table.get_t_str(token.id)); }
            hooks.discard(token);
        } else {
            ctx.lookahead = Some(token);
        }

        // pops the states that can't shift the error terminal
        let error_state = loop {
            let Some(state) = stack.top() else {
                hooks.get_mut_log().add_error("irrecoverable error, no rule can handle it");
                return Ok(Recovery::GiveUp);
            };
            if let Action::Shift(next) = self.tables.action(state, ERROR_TOKEN) {
                break next;
            }
            if VERBOSE { println!("(recovering) popping state {state}"); }
            if let Some((_, value)) = stack.pop() {
                hooks.release(value);
            }
        };
        stack.reserve_one()?;
        let value = hooks.placeholder();
        stack.push(error_state, value);
        ctx.status.on_error_shift();

        // skips the tokens that can't follow
        loop {
            let id = ctx.peek(source)?;
            if !self.tables.action(error_state, id).is_error() {
                break;
            }
            if id == END_TOKEN {
                let pos = ctx.lookahead.as_ref().and_then(|t| t.span.first());
                hooks.get_mut_log().add_error(format!("irrecoverable error, reached end of stream{}", pos_str(pos)));
                return Ok(Recovery::GiveUp);
            }
            if let Some(skipped) = ctx.lookahead.take() {
                if VERBOSE { println!("(recovering) skipping token {}", sym_table.get_t_str(skipped.id)); }
                hooks.discard(skipped);
            }
        }
        if let Some(sync) = &ctx.lookahead {
            let msg = format!("resynchronized on '{}'{}", self.token_text(sync), pos_str(sync.span.first()));
            if VERBOSE { println!("(recovering) {msg}"); }
            ctx.resync_note = Some(msg);
        }
        Ok(Recovery::Resync)
    }
}
