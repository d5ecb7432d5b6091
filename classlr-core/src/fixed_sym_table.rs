// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

use crate::parser::Symbol;
use crate::{TokenId, VarId, END_TOKEN, ERROR_TOKEN, INVALID_TOKEN};

/// Stores the names of the terminal and nonterminal symbols used by a parser.
///
/// Terminals have two parts to their name:
/// - the identifier used in the grammar
/// - the source string they represent, if it's fixed (keywords, punctuation)
///
/// For example, if `PLUS` is token 19 and `ID` is token 48,
/// ```ignore
/// t[19] = ("PLUS".to_string(), Some("+".to_string()));
/// t[48] = ("ID".to_string(), None);
/// ```
///
/// The first three terminals are always the reserved end-of-input, error and
/// invalid-token terminals.
#[derive(Clone, Debug)]
pub struct FixedSymTable {
    t: Vec<(String, Option<String>)>,   // terminal identifiers and optional representation
    nt: Vec<String>,                    // nt to nonterminal identifier
}

impl FixedSymTable {
    pub fn new(t: Vec<(String, Option<String>)>, nt: Vec<String>) -> Self {
        FixedSymTable { t, nt }
    }

    // -------------------------------------------------------------------------

    pub fn get_terminals(&self) -> impl Iterator<Item = &(String, Option<String>)> {
        self.t.iter()
    }

    pub fn get_num_t(&self) -> usize {
        self.t.len()
    }

    // -------------------------------------------------------------------------

    pub fn get_nonterminals(&self) -> impl Iterator<Item = &String> {
        self.nt.iter()
    }

    pub fn get_num_nt(&self) -> usize {
        self.nt.len()
    }

    /// Finds a nonterminal from its identifier.
    pub fn find_nt(&self, name: &str) -> Option<VarId> {
        self.nt.iter().position(|n| n == name).map(|v| v as VarId)
    }
}

pub trait SymInfoTable {
    /// Does `token` carry variable content (identifier, literal value)?
    fn is_token_data(&self, token: TokenId) -> bool;

    /// Source string of the terminal if it's fixed, otherwise its identifier.
    fn get_t_str(&self, token: TokenId) -> String;

    fn get_t_name(&self, token: TokenId) -> String;

    fn get_nt_name(&self, var: VarId) -> String;

    /// Gets the symbol's name: the nonterminal or terminal identifier.
    fn get_name(&self, symbol: &Symbol) -> String {
        match symbol {
            Symbol::T(token) => self.get_t_name(*token),
            Symbol::NT(var) => self.get_nt_name(*var),
        }
    }

    /// Gets the symbol's representation: the nonterminal identifier, or the terminal
    /// string value if it exists.
    fn get_str(&self, symbol: &Symbol) -> String {
        match symbol {
            Symbol::T(token) => self.get_t_str(*token),
            Symbol::NT(var) => self.get_nt_name(*var),
        }
    }

    /// Same as [get_str](SymInfoTable::get_str), but fixed terminals are between quotes.
    fn get_name_quote(&self, symbol: &Symbol) -> String {
        match symbol {
            Symbol::T(token) if !self.is_token_data(*token) => format!("{:?}", self.get_t_str(*token)),
            _ => self.get_str(symbol),
        }
    }
}

impl SymInfoTable for FixedSymTable {
    fn is_token_data(&self, token: TokenId) -> bool {
        self.t.get(token as usize).map(|t| t.1.is_none()).unwrap_or(false)
    }

    fn get_t_str(&self, token: TokenId) -> String {
        match token {
            END_TOKEN => "end of file".to_string(),
            ERROR_TOKEN => "error".to_string(),
            INVALID_TOKEN => "invalid token".to_string(),
            _ if (token as usize) < self.t.len() => {
                let (name, literal) = &self.t[token as usize];
                literal.as_ref().unwrap_or(name).clone()
            }
            _ => format!("T({token}?)")
        }
    }

    fn get_t_name(&self, token: TokenId) -> String {
        if token as usize >= self.t.len() {
            format!("T({token}?)")
        } else {
            self.t[token as usize].0.clone()
        }
    }

    fn get_nt_name(&self, var: VarId) -> String {
        if var as usize >= self.nt.len() { return format!("NT({var}?)") }
        self.nt[var as usize].clone()
    }
}
