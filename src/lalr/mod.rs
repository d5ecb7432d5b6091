// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! LALR(1) automaton builder.
//!
//! The LR(0) item sets are built first, then the LALR(1) lookaheads of their kernel items are
//! computed by the spontaneous generation / propagation method, and finally the action and
//! goto tables are filled. Conflicts are resolved with the operator precedence, or by the default
//! policy: shift over reduce, and the earliest production between two reductions.

mod tests;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};
use iter_index::IndexerIterator;
use classlr_core::fixed_sym_table::SymInfoTable;
use classlr_core::log::{BufLog, LogReader, LogStatus, Logger};
use classlr_core::table::{Action, ParseTables, ProdInfo};
use classlr_core::END_TOKEN;
use crate::build::{BuildError, BuildErrorSource, BuildFrom, HasBuildErrorSource, TryBuildFrom};
use crate::grammar::{Assoc, FirstSets, Grammar, ProdId, Symbol, TokenId, VarId};
use crate::{CollectJoin, StateId};

/// Lookahead standing for "any", used to detect the propagated lookaheads.
const DUMMY_LA: TokenId = TokenId::MAX;

type ItemLookaheads = BTreeMap<Item, BTreeSet<TokenId>>;

/// LR(0) item: a production with a dot position in its right-hand side.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Item {
    pub prod: ProdId,
    pub dot: u16,
}

impl Item {
    pub fn new(prod: ProdId, dot: u16) -> Self {
        Item { prod, dot }
    }

    fn advance(&self) -> Item {
        Item { prod: self.prod, dot: self.dot + 1 }
    }

    pub fn to_str(&self, grammar: &Grammar) -> String {
        let prod = grammar.get_prod(self.prod);
        let table = grammar.get_symbol_table();
        let mut rhs = prod.rhs.iter().map(|s| s.to_str_quote(Some(table))).to_vec();
        rhs.insert(self.dot as usize, "•".to_string());
        format!("{} -> {}", table.get_nt_name(prod.lhs), rhs.join(" "))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl Display for ConflictKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictKind::ShiftReduce => write!(f, "shift/reduce"),
            ConflictKind::ReduceReduce => write!(f, "reduce/reduce"),
        }
    }
}

/// Conflict resolved by the default policy.
#[derive(Clone, PartialEq, Debug)]
pub struct Conflict {
    pub state: StateId,
    pub token: TokenId,
    pub kind: ConflictKind,
    /// Competing reductions; for a shift/reduce conflict, the reduction that lost against the shift
    pub prods: Vec<ProdId>,
    pub chosen: Action,
}

impl Conflict {
    pub fn to_str(&self, grammar: &Grammar) -> String {
        let table = grammar.get_symbol_table();
        let prods = self.prods.iter().map(|&p| format!("[{}]", grammar.prod_to_str(p))).join(" and ");
        let rivals = match self.kind {
            ConflictKind::ShiftReduce => format!("shift and reduce {prods}"),
            ConflictKind::ReduceReduce => format!("reduce {prods}"),
        };
        format!("state {}, on {}: {} conflict between {rivals}, chose {}",
                self.state, table.get_name_quote(&Symbol::T(self.token)), self.kind, self.chosen)
    }
}

// ---------------------------------------------------------------------------------------------

/// Canonical LR(0) collection and lookahead computation.
struct LalrBuilder<'a> {
    grammar: &'a Grammar,
    by_var: Vec<Vec<ProdId>>,
    first: FirstSets,
    kernels: Vec<Vec<Item>>,
    transitions: Vec<BTreeMap<Symbol, StateId>>,
}

impl<'a> LalrBuilder<'a> {
    const VERBOSE: bool = false;

    fn new(grammar: &'a Grammar) -> Self {
        LalrBuilder {
            grammar,
            by_var: grammar.prods_by_var(),
            first: grammar.calc_first(),
            kernels: Vec::new(),
            transitions: Vec::new(),
        }
    }

    fn next_symbol(&self, item: &Item) -> Option<Symbol> {
        self.grammar.get_prod(item.prod).rhs.get(item.dot as usize).copied()
    }

    fn closure0(&self, kernel: &[Item]) -> BTreeSet<Item> {
        let mut items = kernel.iter().copied().collect::<BTreeSet<_>>();
        let mut stack = kernel.to_vec();
        while let Some(item) = stack.pop() {
            if let Some(Symbol::NT(var)) = self.next_symbol(&item) {
                for &prod in &self.by_var[var as usize] {
                    let new_item = Item::new(prod, 0);
                    if items.insert(new_item) {
                        stack.push(new_item);
                    }
                }
            }
        }
        items
    }

    /// LR(1) closure: `[A -> α • B β, a]` adds `[B -> • γ, b]` for each `b` in FIRST(β a).
    fn closure1(&self, seed: ItemLookaheads) -> ItemLookaheads {
        let mut items = seed;
        let mut stack = items.keys().copied().collect::<Vec<_>>();
        while let Some(item) = stack.pop() {
            let rhs = &self.grammar.get_prod(item.prod).rhs;
            let Some(Symbol::NT(var)) = rhs.get(item.dot as usize) else {
                continue;
            };
            let (mut lookaheads, nullable) = self.first.of_seq(&rhs[item.dot as usize + 1..]);
            if nullable {
                if let Some(la) = items.get(&item) {
                    lookaheads.extend(la);
                }
            }
            for &prod in &self.by_var[*var as usize] {
                let new_item = Item::new(prod, 0);
                let is_new = !items.contains_key(&new_item);
                let entry = items.entry(new_item).or_default();
                let before = entry.len();
                entry.extend(&lookaheads);
                if is_new || entry.len() != before {
                    stack.push(new_item);
                }
            }
        }
        items
    }

    /// Builds the LR(0) states. A state is identified by its kernel, sorted, so the numbering
    /// only depends on the order of the productions.
    fn build_lr0(&mut self) {
        let mut index = BTreeMap::<Vec<Item>, StateId>::new();
        let kernel0 = vec![Item::new(0, 0)];
        index.insert(kernel0.clone(), 0);
        self.kernels.push(kernel0);
        let mut state = 0;
        while state < self.kernels.len() {
            let mut targets = BTreeMap::<Symbol, BTreeSet<Item>>::new();
            for item in self.closure0(&self.kernels[state]) {
                if let Some(symbol) = self.next_symbol(&item) {
                    targets.entry(symbol).or_default().insert(item.advance());
                }
            }
            let mut transitions = BTreeMap::new();
            for (symbol, kernel) in targets {
                let kernel = kernel.into_iter().collect::<Vec<_>>();
                let target = match index.get(&kernel) {
                    Some(&target) => target,
                    None => {
                        let target = self.kernels.len() as StateId;
                        index.insert(kernel.clone(), target);
                        self.kernels.push(kernel);
                        target
                    }
                };
                transitions.insert(symbol, target);
            }
            self.transitions.push(transitions);
            state += 1;
        }
        if Self::VERBOSE { println!("LR(0): {} states", self.kernels.len()); }
    }

    /// Computes the lookaheads of each kernel item, in the same layout as `kernels`.
    fn calc_lookaheads(&self) -> Vec<Vec<BTreeSet<TokenId>>> {
        let mut lookaheads = self.kernels.iter().map(|k| vec![BTreeSet::new(); k.len()]).to_vec();
        let mut links = self.kernels.iter().map(|k| vec![Vec::<(usize, usize)>::new(); k.len()]).to_vec();
        lookaheads[0][0].insert(END_TOKEN);
        for (state, kernel) in self.kernels.iter().enumerate() {
            for (k, item) in kernel.iter().enumerate() {
                let closure = self.closure1(BTreeMap::from([(*item, BTreeSet::from([DUMMY_LA]))]));
                for (citem, tokens) in closure {
                    let Some(symbol) = self.next_symbol(&citem) else {
                        continue;
                    };
                    let Some(&target) = self.transitions[state].get(&symbol) else {
                        continue;
                    };
                    let target = target as usize;
                    let Ok(j) = self.kernels[target].binary_search(&citem.advance()) else {
                        continue;
                    };
                    for token in tokens {
                        if token == DUMMY_LA {
                            links[state][k].push((target, j));
                        } else {
                            lookaheads[target][j].insert(token);
                        }
                    }
                }
            }
        }
        let mut change = true;
        let mut passes = 0;
        while change {
            change = false;
            passes += 1;
            for (state, item_links) in links.iter().enumerate() {
                for (k, targets) in item_links.iter().enumerate() {
                    for &(target, j) in targets {
                        if (target, j) == (state, k) || lookaheads[state][k].is_subset(&lookaheads[target][j]) {
                            continue;
                        }
                        let source = lookaheads[state][k].clone();
                        lookaheads[target][j].extend(source);
                        change = true;
                    }
                }
            }
        }
        if Self::VERBOSE { println!("lookaheads propagated in {passes} passes"); }
        lookaheads
    }
}

// ---------------------------------------------------------------------------------------------

/// LALR(1) automaton of a grammar, with its parsing tables.
#[derive(Clone, Debug)]
pub struct Automaton {
    grammar: Grammar,
    tables: ParseTables,
    kernels: Vec<Vec<Item>>,
    conflicts: Vec<Conflict>,
    num_resolved: usize,
    log: BufLog,
}

impl HasBuildErrorSource for Automaton {
    const SOURCE: BuildErrorSource = BuildErrorSource::Automaton;
}

impl LogReader for Automaton {
    type Item = BufLog;

    fn get_log(&self) -> &Self::Item {
        &self.log
    }

    fn give_log(self) -> Self::Item {
        self.log
    }
}

impl BuildFrom<Grammar> for Automaton {
    /// Builds the automaton of a grammar. The problems are reported in the log, including
    /// the grammar check and the unexpected conflicts.
    fn build_from(mut grammar: Grammar) -> Self {
        grammar.check();
        let mut log = grammar.get_log().clone();
        let symbol_table = grammar.get_symbol_table().clone().to_fixed_sym_table();
        if log.num_errors() > 0 {
            let tables = ParseTables::new(vec![], vec![], vec![], symbol_table);
            return Automaton { grammar, tables, kernels: vec![], conflicts: vec![], num_resolved: 0, log };
        }
        let mut builder = LalrBuilder::new(&grammar);
        builder.build_lr0();
        let lookaheads = builder.calc_lookaheads();
        let mut table_builder = TableBuilder::new(&grammar);
        for (state, kernel) in builder.kernels.iter().index::<StateId>() {
            let seed = kernel.iter().copied().zip(lookaheads[state as usize].iter().cloned()).collect();
            let items = builder.closure1(seed);
            table_builder.add_state(state, &items, &builder.transitions[state as usize], &mut log);
        }
        let (actions, gotos, conflicts, num_resolved) = table_builder.finish();
        let kernels = builder.kernels;
        let prods = grammar.get_prods().iter().map(|p| ProdInfo { lhs: p.lhs, len: p.rhs.len() as u16 }).to_vec();
        let tables = ParseTables::new(actions, gotos, prods, symbol_table);
        let mut automaton = Automaton { grammar, tables, kernels, conflicts, num_resolved, log };
        automaton.check_conflicts();
        automaton
    }
}

impl Automaton {
    /// Checks the grammar and builds its automaton.
    pub fn build(mut grammar: Grammar) -> Result<Automaton, BuildError> {
        grammar.check();
        Automaton::try_build_from(grammar)
    }

    pub fn get_grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn get_tables(&self) -> &ParseTables {
        &self.tables
    }

    pub fn num_states(&self) -> usize {
        self.kernels.len()
    }

    pub fn get_kernel(&self, state: StateId) -> &[Item] {
        &self.kernels[state as usize]
    }

    /// Conflicts resolved by the default policy, which are counted against the expected numbers.
    pub fn get_conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    /// Number of conflicts resolved with the precedence and associativity of the operators.
    pub fn num_resolved(&self) -> usize {
        self.num_resolved
    }

    /// Counts the default-resolved conflicts: (shift/reduce, reduce/reduce).
    pub fn count_conflicts(&self) -> (usize, usize) {
        let sr = self.conflicts.iter().filter(|c| c.kind == ConflictKind::ShiftReduce).count();
        (sr, self.conflicts.len() - sr)
    }

    fn check_conflicts(&mut self) {
        let (sr, rr) = self.count_conflicts();
        let (expected_sr, expected_rr) = self.grammar.get_expected_conflicts();
        if (sr, rr) == (expected_sr, expected_rr) {
            for conflict in &self.conflicts {
                self.log.add_note(conflict.to_str(&self.grammar));
            }
        } else {
            if sr != expected_sr {
                self.log.add_error(format!("{sr} shift/reduce conflict(s) instead of {expected_sr}"));
            }
            if rr != expected_rr {
                self.log.add_error(format!("{rr} reduce/reduce conflict(s) instead of {expected_rr}"));
            }
            for conflict in &self.conflicts {
                self.log.add_error(conflict.to_str(&self.grammar));
            }
        }
    }

    /// Lists the kernel items and the actions of each state.
    pub fn states_str(&self) -> String {
        let table = self.tables.get_symbol_table();
        let mut result = String::new();
        for (state, kernel) in self.kernels.iter().index::<StateId>() {
            result.push_str(&format!("state {state}:\n"));
            for item in kernel {
                result.push_str(&format!("    {}\n", item.to_str(&self.grammar)));
            }
            let actions = (0..self.tables.num_t() as TokenId)
                .filter_map(|t| {
                    let action = self.tables.action(state, t);
                    (!action.is_error()).then(|| format!("{}:{action}", table.get_t_name(t)))
                })
                .join(" ");
            if !actions.is_empty() {
                result.push_str(&format!("  - {actions}\n"));
            }
            let gotos = (0..self.tables.num_nt() as VarId)
                .filter_map(|v| self.tables.goto(state, v).map(|target| format!("{}:{target}", table.get_nt_name(v))))
                .join(" ");
            if !gotos.is_empty() {
                result.push_str(&format!("  - goto {gotos}\n"));
            }
        }
        result
    }
}

// ---------------------------------------------------------------------------------------------

/// Fills the action and goto tables, one state after the other.
struct TableBuilder<'a> {
    grammar: &'a Grammar,
    num_t: usize,
    num_nt: usize,
    actions: Vec<Action>,
    gotos: Vec<Option<StateId>>,
    conflicts: Vec<Conflict>,
    num_resolved: usize,
}

impl<'a> TableBuilder<'a> {
    fn new(grammar: &'a Grammar) -> Self {
        TableBuilder {
            grammar,
            num_t: grammar.num_t(),
            num_nt: grammar.num_nt(),
            actions: Vec::new(),
            gotos: Vec::new(),
            conflicts: Vec::new(),
            num_resolved: 0,
        }
    }

    fn reduce_action(prod: ProdId) -> Action {
        if prod == 0 { Action::Accept } else { Action::Reduce(prod) }
    }

    fn add_state(&mut self, state: StateId, items: &ItemLookaheads, transitions: &BTreeMap<Symbol, StateId>, log: &mut BufLog) {
        let mut shifts = vec![None; self.num_t];
        let mut reduces = vec![Vec::<ProdId>::new(); self.num_t];
        let mut gotos = vec![None; self.num_nt];
        for (symbol, &target) in transitions {
            match symbol {
                Symbol::T(t) => shifts[*t as usize] = Some(target),
                Symbol::NT(v) => gotos[*v as usize] = Some(target),
            }
        }
        // items are sorted by production, so the reductions of each token are too
        for (item, lookaheads) in items {
            if item.dot as usize == self.grammar.get_prod(item.prod).rhs.len() {
                for &t in lookaheads {
                    reduces[t as usize].push(item.prod);
                }
            }
        }
        let default_reduce = self.default_reduce(&shifts, &reduces);
        for (token, (shift, reduces)) in shifts.into_iter().zip(reduces).index::<TokenId>() {
            let action = match self.resolve(state, token, shift, &reduces, log) {
                Action::Error => default_reduce.map(Action::Reduce).unwrap_or_default(),
                action => action,
            };
            self.actions.push(action);
        }
        self.gotos.extend(gotos);
    }

    /// Production of a consistent state: a state without shift that can only reduce by one production.
    /// It reduces on any lookahead, so syntax errors are detected in the next state that shifts.
    /// The accepting state is never consistent.
    fn default_reduce(&self, shifts: &[Option<StateId>], reduces: &[Vec<ProdId>]) -> Option<ProdId> {
        if shifts.iter().any(|s| s.is_some()) {
            return None;
        }
        let prods = reduces.iter().flatten().copied().collect::<BTreeSet<_>>();
        match prods.first() {
            Some(&prod) if prods.len() == 1 && prod != 0 => Some(prod),
            _ => None,
        }
    }

    fn resolve(&mut self, state: StateId, token: TokenId, shift: Option<StateId>, reduces: &[ProdId], log: &mut BufLog) -> Action {
        let Some(&prod) = reduces.first() else {
            return shift.map(Action::Shift).unwrap_or_default();
        };
        let reduce = Self::reduce_action(prod);
        if reduces.len() > 1 {
            self.conflicts.push(Conflict { state, token, kind: ConflictKind::ReduceReduce, prods: reduces.to_vec(), chosen: reduce });
        }
        let Some(target) = shift else {
            return reduce;
        };
        let shift = Action::Shift(target);
        match (self.grammar.token_precedence(token), self.grammar.prod_precedence(prod)) {
            (Some(token_prec), Some(prod_prec)) => {
                let action = if token_prec.level > prod_prec.level {
                    shift
                } else if token_prec.level < prod_prec.level {
                    reduce
                } else {
                    match token_prec.assoc {
                        Assoc::Left => reduce,
                        Assoc::Right => shift,
                        Assoc::NonAssoc => Action::Error,
                    }
                };
                self.num_resolved += 1;
                log.add_note(format!("state {state}, on {}: shift/reduce conflict with [{}] resolved by precedence as {action}",
                                     self.grammar.get_symbol_table().get_name_quote(&Symbol::T(token)),
                                     self.grammar.prod_to_str(prod)));
                action
            }
            _ => {
                self.conflicts.push(Conflict { state, token, kind: ConflictKind::ShiftReduce, prods: vec![prod], chosen: shift });
                shift
            }
        }
    }

    fn finish(self) -> (Vec<Action>, Vec<Option<StateId>>, Vec<Conflict>, usize) {
        (self.actions, self.gotos, self.conflicts, self.num_resolved)
    }
}
