// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::fmt::{Display, Formatter};
use iter_index::IndexerIterator;
use crate::fixed_sym_table::{FixedSymTable, SymInfoTable};
use crate::{ProdId, StateId, TokenId, VarId, ERROR_TOKEN};

/// Parser action for a (state, terminal) pair.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Debug)]
pub enum Action {
    Shift(StateId),
    Reduce(ProdId),
    Accept,
    #[default]
    Error,
}

impl Action {
    pub fn is_error(&self) -> bool {
        matches!(self, Action::Error)
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Shift(s) => write!(f, "s{s}"),
            Action::Reduce(p) => write!(f, "r{p}"),
            Action::Accept => write!(f, "acc"),
            Action::Error => write!(f, "."),
        }
    }
}

/// What the parser needs to know about a production to reduce it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ProdInfo {
    pub lhs: VarId,
    pub len: u16,
}

/// Action and goto tables of an LR automaton.
///
/// The tables are immutable once built. They're shared by reference between any number
/// of parser instances, including across threads.
#[derive(Clone, Debug)]
pub struct ParseTables {
    num_t: usize,
    num_nt: usize,
    actions: Vec<Action>,           // [state * num_t + token]
    gotos: Vec<Option<StateId>>,    // [state * num_nt + var]
    prods: Vec<ProdInfo>,
    symbol_table: FixedSymTable,
}

impl ParseTables {
    /// Creates the tables from the dense action and goto matrices.
    ///
    /// `actions` must hold `num_states * num_t` entries and `gotos` `num_states * num_nt` entries,
    /// where `num_t` and `num_nt` are given by the symbol table.
    ///
    /// # Panics
    ///
    /// Panics if the symbol table has no terminal, or if the sizes of `actions` and `gotos` don't
    /// match the same number of states.
    pub fn new(actions: Vec<Action>, gotos: Vec<Option<StateId>>, prods: Vec<ProdInfo>, symbol_table: FixedSymTable) -> Self {
        let num_t = symbol_table.get_num_t();
        let num_nt = symbol_table.get_num_nt();
        assert!(num_t > 0 && actions.len() % num_t == 0, "action table doesn't match the number of terminals");
        assert_eq!(actions.len() / num_t * num_nt, gotos.len(), "goto table doesn't match the action table");
        ParseTables { num_t, num_nt, actions, gotos, prods, symbol_table }
    }

    pub fn num_states(&self) -> usize {
        self.actions.len() / self.num_t
    }

    pub fn num_t(&self) -> usize {
        self.num_t
    }

    pub fn num_nt(&self) -> usize {
        self.num_nt
    }

    /// Action for `token` in `state`. Unknown tokens have no action.
    #[inline]
    pub fn action(&self, state: StateId, token: TokenId) -> Action {
        if (token as usize) < self.num_t {
            self.actions[state as usize * self.num_t + token as usize]
        } else {
            Action::Error
        }
    }

    #[inline]
    pub fn goto(&self, state: StateId, var: VarId) -> Option<StateId> {
        self.gotos[state as usize * self.num_nt + var as usize]
    }

    pub fn prod(&self, prod: ProdId) -> ProdInfo {
        self.prods[prod as usize]
    }

    pub fn num_prods(&self) -> usize {
        self.prods.len()
    }

    /// Is there a shift on the error terminal in `state`?
    pub fn shifts_error(&self, state: StateId) -> bool {
        matches!(self.action(state, ERROR_TOKEN), Action::Shift(_))
    }

    /// Terminals which have an action in `state`, except the error terminal.
    pub fn expected_tokens(&self, state: StateId) -> Vec<TokenId> {
        let row = &self.actions[state as usize * self.num_t..(state as usize + 1) * self.num_t];
        row.iter().index::<TokenId>()
            .filter_map(|(t, a)| if !a.is_error() && t != ERROR_TOKEN { Some(t) } else { None })
            .collect()
    }

    pub fn get_symbol_table(&self) -> &FixedSymTable {
        &self.symbol_table
    }

    /// Textual representation of the action table, one state per line.
    pub fn action_table_str(&self) -> String {
        let names = (0..self.num_t as TokenId).map(|t| self.symbol_table.get_t_name(t)).collect::<Vec<_>>();
        (0..self.num_states() as StateId).map(|s| {
            let cells = (0..self.num_t as TokenId)
                .filter_map(|t| {
                    let a = self.action(s, t);
                    if a.is_error() { None } else { Some(format!("{}:{a}", names[t as usize])) }
                })
                .collect::<Vec<_>>();
            format!("{s:4}: {}", cells.join(" "))
        }).collect::<Vec<_>>().join("\n")
    }
}
