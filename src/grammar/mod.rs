// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

mod tests;

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use iter_index::IndexerIterator;
use classlr_core::fixed_sym_table::SymInfoTable;
use classlr_core::log::{BufLog, LogReader, LogStatus, Logger};
use crate::build::{BuildErrorSource, HasBuildErrorSource};
use crate::symbol_table::SymbolTable;
use crate::CollectJoin;

pub use classlr_core::parser::Symbol;
pub use classlr_core::{ProdId, TokenId, VarId};

// ---------------------------------------------------------------------------------------------

/// Associativity of an operator. It decides shift/reduce conflicts between operators of
/// the same precedence level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Assoc {
    /// `a - b - c` is `(a - b) - c`: reduce
    Left,
    /// `a = b = c` is `a = (b = c)`: shift
    Right,
    /// `a < b < c` is an error
    NonAssoc,
}

/// Precedence of a terminal; a higher level binds tighter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Precedence {
    pub level: u16,
    pub assoc: Assoc,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Production {
    pub lhs: VarId,
    pub rhs: Vec<Symbol>,
    /// Terminal whose precedence is used for the production, instead of the last terminal
    pub prec: Option<TokenId>,
}

impl Production {
    pub fn new(lhs: VarId, rhs: Vec<Symbol>) -> Self {
        Production { lhs, rhs, prec: None }
    }

    pub fn to_str<T: SymInfoTable>(&self, symbol_table: &T) -> String {
        let rhs = if self.rhs.is_empty() {
            "ε".to_string()
        } else {
            self.rhs.iter().map(|s| s.to_str_quote(Some(symbol_table))).join(" ")
        };
        format!("{} -> {rhs}", symbol_table.get_nt_name(self.lhs))
    }
}

// ---------------------------------------------------------------------------------------------

/// FIRST sets of the nonterminals of a grammar.
#[derive(Clone, Debug)]
pub struct FirstSets {
    pub nullable: Vec<bool>,
    pub first: Vec<BTreeSet<TokenId>>,
}

impl FirstSets {
    /// Terminals that can begin `symbols`, and whether `symbols` can derive ε.
    pub fn of_seq(&self, symbols: &[Symbol]) -> (BTreeSet<TokenId>, bool) {
        let mut result = BTreeSet::new();
        for symbol in symbols {
            match symbol {
                Symbol::T(t) => {
                    result.insert(*t);
                    return (result, false);
                }
                Symbol::NT(v) => {
                    result.extend(&self.first[*v as usize]);
                    if !self.nullable[*v as usize] {
                        return (result, false);
                    }
                }
            }
        }
        (result, true)
    }
}

// ---------------------------------------------------------------------------------------------

/// Context-free grammar with operator precedence, as expected by the LALR builder.
///
/// Production 0 is the augmented production `$accept -> start`, where `$accept` is a nonterminal
/// added to the symbol table when the grammar is created. The other productions are numbered
/// in the order they're added.
///
/// Precedence levels are declared from the loosest to the tightest, each call to
/// [add_precedence](Grammar::add_precedence) creating a new level. The precedence of a production
/// is the one of its explicit precedence terminal if it has one, otherwise the one of its last
/// terminal.
#[derive(Clone, Debug)]
pub struct Grammar {
    symbol_table: SymbolTable,
    prods: Vec<Production>,
    start: Option<VarId>,
    accept: VarId,
    prec: Vec<Option<Precedence>>,
    num_levels: u16,
    expected_sr: usize,
    expected_rr: usize,
    checked: bool,
    log: BufLog,
}

impl HasBuildErrorSource for Grammar {
    const SOURCE: BuildErrorSource = BuildErrorSource::Grammar;
}

impl LogReader for Grammar {
    type Item = BufLog;

    fn get_log(&self) -> &Self::Item {
        &self.log
    }

    fn give_log(self) -> Self::Item {
        self.log
    }
}

impl Grammar {
    pub fn new(mut symbol_table: SymbolTable) -> Self {
        let accept = symbol_table.add_nonterminal("$accept");
        let num_t = symbol_table.get_num_t();
        Grammar {
            symbol_table,
            prods: vec![Production::new(accept, vec![])],
            start: None,
            accept,
            prec: vec![None; num_t],
            num_levels: 0,
            expected_sr: 0,
            expected_rr: 0,
            checked: false,
            log: BufLog::new(),
        }
    }

    pub fn get_symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    pub fn num_t(&self) -> usize {
        self.symbol_table.get_num_t()
    }

    pub fn num_nt(&self) -> usize {
        self.symbol_table.get_num_nt()
    }

    pub fn set_start(&mut self, start: VarId) {
        self.start = Some(start);
        self.prods[0].rhs = vec![Symbol::NT(start)];
    }

    pub fn get_start(&self) -> Option<VarId> {
        self.start
    }

    /// Nonterminal of the augmented production 0.
    pub fn get_accept_var(&self) -> VarId {
        self.accept
    }

    pub fn add_prod(&mut self, lhs: VarId, rhs: Vec<Symbol>) -> ProdId {
        let id = self.prods.len();
        assert!(id < ProdId::MAX as usize);
        self.prods.push(Production::new(lhs, rhs));
        id as ProdId
    }

    /// Adds a production which takes the precedence of `prec` (like `%prec` in yacc).
    pub fn add_prod_prec(&mut self, lhs: VarId, rhs: Vec<Symbol>, prec: TokenId) -> ProdId {
        let id = self.add_prod(lhs, rhs);
        self.prods[id as usize].prec = Some(prec);
        id
    }

    pub fn get_prods(&self) -> &[Production] {
        &self.prods
    }

    pub fn get_prod(&self, prod: ProdId) -> &Production {
        &self.prods[prod as usize]
    }

    pub fn num_prods(&self) -> usize {
        self.prods.len()
    }

    pub fn prod_to_str(&self, prod: ProdId) -> String {
        self.prods[prod as usize].to_str(&self.symbol_table)
    }

    /// Declares a new precedence level, binding tighter than the previous ones.
    pub fn add_precedence(&mut self, assoc: Assoc, tokens: &[TokenId]) {
        self.num_levels += 1;
        let level = self.num_levels;
        for &t in tokens {
            match self.prec.get_mut(t as usize) {
                Some(p @ None) => *p = Some(Precedence { level, assoc }),
                Some(Some(_)) => self.log.add_error(format!("precedence of '{}' declared twice", self.symbol_table.get_t_name(t))),
                None => self.log.add_error(format!("precedence declared for unknown terminal {t}")),
            }
        }
    }

    /// Sets the number of shift/reduce and reduce/reduce conflicts that are expected to be resolved
    /// by default. The automaton isn't built if the actual numbers differ.
    pub fn set_expected_conflicts(&mut self, sr: usize, rr: usize) {
        self.expected_sr = sr;
        self.expected_rr = rr;
    }

    pub fn get_expected_conflicts(&self) -> (usize, usize) {
        (self.expected_sr, self.expected_rr)
    }

    pub fn token_precedence(&self, token: TokenId) -> Option<Precedence> {
        self.prec.get(token as usize).copied().flatten()
    }

    pub fn prod_precedence(&self, prod: ProdId) -> Option<Precedence> {
        let p = &self.prods[prod as usize];
        match p.prec {
            Some(t) => self.token_precedence(t),
            None => p.rhs.iter().rev()
                .find_map(|s| if let Symbol::T(t) = s { self.token_precedence(*t) } else { None }),
        }
    }

    /// Productions of each nonterminal, in declaration order.
    pub fn prods_by_var(&self) -> Vec<Vec<ProdId>> {
        let mut by_var = vec![Vec::new(); self.num_nt()];
        for (p, prod) in self.prods.iter().index::<ProdId>() {
            if let Some(list) = by_var.get_mut(prod.lhs as usize) {
                list.push(p);
            }
        }
        by_var
    }

    pub fn calc_nullable(&self) -> Vec<bool> {
        let mut nullable = vec![false; self.num_nt()];
        let mut change = true;
        while change {
            change = false;
            for prod in &self.prods {
                if !nullable[prod.lhs as usize] && prod.rhs.iter().all(|s| matches!(s, Symbol::NT(v) if nullable[*v as usize])) {
                    nullable[prod.lhs as usize] = true;
                    change = true;
                }
            }
        }
        nullable
    }

    pub fn calc_first(&self) -> FirstSets {
        let nullable = self.calc_nullable();
        let mut first = FirstSets { nullable, first: vec![BTreeSet::new(); self.num_nt()] };
        let mut change = true;
        while change {
            change = false;
            for prod in &self.prods {
                let (set, _) = first.of_seq(&prod.rhs);
                let target = &mut first.first[prod.lhs as usize];
                let before = target.len();
                target.extend(set);
                change |= target.len() != before;
            }
        }
        first
    }

    /// Verifies the grammar and reports the problems in the log.
    ///
    /// Errors: missing start symbol, undefined symbols, nonterminals without production.
    /// Warnings: unreachable nonterminals.
    ///
    /// The grammar is only checked once; later calls have no effect.
    pub fn check(&mut self) {
        if std::mem::replace(&mut self.checked, true) {
            return;
        }
        let (num_t, num_nt) = (self.num_t(), self.num_nt());
        let Some(start) = self.start else {
            self.log.add_error("start symbol not set");
            return;
        };
        let mut has_prods = vec![false; num_nt];
        for (p, prod) in self.prods.iter().index::<ProdId>() {
            if prod.lhs as usize >= num_nt {
                self.log.add_error(format!("production {p} has an undefined left-hand nonterminal {}", prod.lhs));
                continue;
            }
            has_prods[prod.lhs as usize] = true;
            for symbol in &prod.rhs {
                let defined = match symbol {
                    Symbol::T(t) => (*t as usize) < num_t,
                    Symbol::NT(v) => (*v as usize) < num_nt,
                };
                if !defined {
                    self.log.add_error(format!("production {p} uses an undefined symbol {symbol}"));
                }
            }
            if let Some(t) = prod.prec {
                if self.token_precedence(t).is_none() {
                    self.log.add_error(format!("production {p} takes the precedence of '{}', which has none",
                                               self.symbol_table.get_t_name(t)));
                }
            }
        }
        if self.log.num_errors() > 0 {
            return;
        }
        for (v, ok) in has_prods.iter().index::<VarId>() {
            if !ok {
                self.log.add_error(format!("nonterminal '{}' has no production", self.symbol_table.get_nt_name(v)));
            }
        }
        let mut reachable = vec![false; num_nt];
        let mut stack = vec![self.accept, start];
        while let Some(v) = stack.pop() {
            if !std::mem::replace(&mut reachable[v as usize], true) {
                for prod in self.prods.iter().filter(|p| p.lhs == v) {
                    stack.extend(prod.rhs.iter().filter_map(|s| if let Symbol::NT(n) = s { Some(*n) } else { None }));
                }
            }
        }
        for (v, ok) in reachable.iter().index::<VarId>() {
            if !ok {
                self.log.add_warning(format!("nonterminal '{}' is unreachable", self.symbol_table.get_nt_name(v)));
            }
        }
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (p, prod) in self.prods.iter().index::<ProdId>() {
            writeln!(f, "{p:3}: {}", prod.to_str(&self.symbol_table))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------------------------
// Macros

pub mod macros {
    /// Generates a `Symbol` instance.
    ///
    /// # Examples
    /// ```
    /// # use classlr::sym;
    /// # use classlr::grammar::{Symbol, TokenId, VarId};
    /// assert_eq!(sym!(t 2), Symbol::T(2 as TokenId));
    /// assert_eq!(sym!(nt 3), Symbol::NT(3 as VarId));
    /// ```
    #[macro_export]
    macro_rules! sym {
        (t $id:expr) => { $crate::grammar::Symbol::T($id as $crate::grammar::TokenId) };
        (nt $id:expr) => { $crate::grammar::Symbol::NT($id as $crate::grammar::VarId) };
    }

    /// Generates the right-hand side of a production. Each symbol is either
    /// - a terminal: `t` {id}
    /// - a nonterminal: `nt` {id}
    ///
    /// An empty list is the ε production.
    ///
    /// # Example
    /// ```
    /// # use classlr::{symbols, sym};
    /// # use classlr::grammar::Symbol;
    /// assert_eq!(symbols![nt 1, t 5, nt 1], vec![sym!(nt 1), sym!(t 5), sym!(nt 1)]);
    /// assert_eq!(symbols![] as Vec<Symbol>, Vec::<Symbol>::new());
    /// ```
    #[macro_export]
    macro_rules! symbols {
        () => { std::vec![] };
        ($($a:ident $b:expr),+ $(,)?) => { std::vec![$($crate::sym!($a $b)),+] };
    }
}
