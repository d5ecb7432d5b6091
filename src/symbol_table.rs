// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use std::collections::HashMap;
use classlr_core::fixed_sym_table::{FixedSymTable, SymInfoTable};
use classlr_core::{TokenId, VarId, END_TOKEN, ERROR_TOKEN, INVALID_TOKEN};

/// Stores the names of the terminal and nonterminal symbols when building a grammar.
///
/// Terminals have two parts to their name:
/// - the identifier used in the grammar
/// - the source string they represent, if it's fixed
///
/// For example:
/// ```ignore
/// t[21] = ("PLUS".to_string(), Some("+".to_string()));
/// t[47] = ("ID".to_string(), None);
/// ```
///
/// A new table already holds the reserved terminals: the end of input ([END_TOKEN]),
/// the error terminal used by the recovery ([ERROR_TOKEN]), and the terminal used
/// by lexers for malformed input ([INVALID_TOKEN]).
///
/// Identifiers must be unique within the terminals and within the nonterminals.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    t: Vec<(String, Option<String>)>,   // terminal identifiers and optional representation
    t_names: HashMap<String, TokenId>,
    nt: Vec<String>,                    // nt to nonterminal identifier
    nt_names: HashMap<String, VarId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = SymbolTable { t: Vec::new(), t_names: HashMap::new(), nt: Vec::new(), nt_names: HashMap::new() };
        assert_eq!(table.add_terminal("$end", Some("end of file")), END_TOKEN);
        assert_eq!(table.add_terminal("error", None), ERROR_TOKEN);
        assert_eq!(table.add_terminal("INVALID", None), INVALID_TOKEN);
        table
    }

    pub fn to_fixed_sym_table(self) -> FixedSymTable {
        FixedSymTable::new(self.t, self.nt)
    }

    // -------------------------------------------------------------------------

    /// Adds a terminal, with its source string if it's fixed, and returns its ID.
    pub fn add_terminal<T: Into<String>>(&mut self, name: T, literal: Option<T>) -> TokenId {
        let token = self.t.len();
        assert!(token < TokenId::MAX as usize);
        let name = name.into();
        assert!(!self.t_names.contains_key(&name), "terminal '{name}' already defined");
        self.t_names.insert(name.clone(), token as TokenId);
        self.t.push((name, literal.map(|n| n.into())));
        token as TokenId
    }

    pub fn extend_terminals<I: IntoIterator<Item=(T, Option<T>)>, T: Into<String>>(&mut self, terminals: I) {
        for (s, maybe) in terminals {
            self.add_terminal(s, maybe);
        }
    }

    pub fn get_terminals(&self) -> impl Iterator<Item = &(String, Option<String>)> {
        self.t.iter()
    }

    pub fn get_num_t(&self) -> usize {
        self.t.len()
    }

    pub fn find_terminal(&self, name: &str) -> Option<TokenId> {
        self.t_names.get(name).copied()
    }

    // -------------------------------------------------------------------------

    pub fn add_nonterminal<T: Into<String>>(&mut self, name: T) -> VarId {
        let var = self.nt.len();
        assert!(var < VarId::MAX as usize);
        let name = name.into();
        assert!(!self.nt_names.contains_key(&name), "nonterminal '{name}' already defined");
        self.nt_names.insert(name.clone(), var as VarId);
        self.nt.push(name);
        var as VarId
    }

    pub fn extend_nonterminals<I: IntoIterator<Item=T>, T: Into<String>>(&mut self, nonterminals: I) {
        for s in nonterminals {
            self.add_nonterminal(s);
        }
    }

    pub fn get_nonterminals(&self) -> impl Iterator<Item = &String> {
        self.nt.iter()
    }

    pub fn get_num_nt(&self) -> usize {
        self.nt.len()
    }

    pub fn find_nonterminal(&self, name: &str) -> Option<VarId> {
        self.nt_names.get(name).copied()
    }
}

impl SymInfoTable for SymbolTable {
    fn is_token_data(&self, token: TokenId) -> bool {
        self.t.get(token as usize).map(|t| t.1.is_none()).unwrap_or(false)
    }

    fn get_t_str(&self, token: TokenId) -> String {
        match self.t.get(token as usize) {
            Some((name, literal)) => literal.as_ref().unwrap_or(name).clone(),
            None => format!("T({token}?)"),
        }
    }

    fn get_t_name(&self, token: TokenId) -> String {
        match self.t.get(token as usize) {
            Some((name, _)) => name.clone(),
            None => format!("T({token}?)"),
        }
    }

    fn get_nt_name(&self, var: VarId) -> String {
        match self.nt.get(var as usize) {
            Some(name) => name.clone(),
            None => format!("NT({var}?)"),
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}
