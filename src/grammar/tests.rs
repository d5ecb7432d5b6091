// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

#![cfg(test)]

use super::*;
use classlr_core::END_TOKEN;
use crate::{btreeset, symbols};

const PLUS: TokenId = 3;
const STAR: TokenId = 4;
const LPAR: TokenId = 5;
const RPAR: TokenId = 6;
const NUM: TokenId = 7;

const E: VarId = 0;
const T: VarId = 1;
const OPT: VarId = 2;

/// ```text
/// e   -> e + t | t opt
/// t   -> Num | ( e )
/// opt -> * | ε
/// ```
fn build_grammar() -> Grammar {
    let mut symbol_table = SymbolTable::new();
    symbol_table.extend_terminals([("PLUS", Some("+")), ("STAR", Some("*")), ("LPAR", Some("(")), ("RPAR", Some(")")), ("NUM", None)]);
    symbol_table.extend_nonterminals(["e", "t", "opt"]);
    let mut g = Grammar::new(symbol_table);
    g.set_start(E);
    g.add_prod(E, symbols![nt E, t PLUS, nt T]);
    g.add_prod(E, symbols![nt T, nt OPT]);
    g.add_prod(T, symbols![t NUM]);
    g.add_prod(T, symbols![t LPAR, nt E, t RPAR]);
    g.add_prod(OPT, symbols![t STAR]);
    g.add_prod(OPT, symbols![]);
    g
}

#[test]
fn grammar_augmented() {
    let g = build_grammar();
    assert_eq!(g.get_accept_var(), 3);
    assert_eq!(g.num_nt(), 4);
    assert_eq!(g.get_prod(0).lhs, 3);
    assert_eq!(g.get_prod(0).rhs, symbols![nt E]);
    assert_eq!(g.num_prods(), 7);
    assert_eq!(g.prod_to_str(0), "$accept -> e");
    assert_eq!(g.prod_to_str(1), "e -> e \"+\" t");
    assert_eq!(g.prod_to_str(3), "t -> NUM");
    assert_eq!(g.prod_to_str(6), "opt -> ε");
    assert_eq!(g.prods_by_var(), vec![vec![1, 2], vec![3, 4], vec![5, 6], vec![0]]);
}

#[test]
fn grammar_first() {
    let g = build_grammar();
    assert_eq!(g.calc_nullable(), vec![false, false, true, false]);
    let first = g.calc_first();
    assert_eq!(first.first[E as usize], btreeset![NUM, LPAR]);
    assert_eq!(first.first[T as usize], btreeset![NUM, LPAR]);
    assert_eq!(first.first[OPT as usize], btreeset![STAR]);
    assert_eq!(first.of_seq(&symbols![nt OPT, t RPAR]), (btreeset![STAR, RPAR], false));
    assert_eq!(first.of_seq(&symbols![nt OPT]), (btreeset![STAR], true));
    assert_eq!(first.of_seq(&[]), (btreeset![], true));
}

#[test]
fn grammar_precedence() {
    let mut g = build_grammar();
    g.add_precedence(Assoc::Left, &[PLUS]);
    g.add_precedence(Assoc::Left, &[STAR]);
    assert_eq!(g.token_precedence(PLUS), Some(Precedence { level: 1, assoc: Assoc::Left }));
    assert_eq!(g.token_precedence(STAR), Some(Precedence { level: 2, assoc: Assoc::Left }));
    assert_eq!(g.token_precedence(NUM), None);
    // last terminal with a precedence
    assert_eq!(g.prod_precedence(1).map(|p| p.level), Some(1));
    assert_eq!(g.prod_precedence(3), None);
    // explicit precedence
    let p = g.add_prod_prec(T, symbols![t PLUS, nt T], STAR);
    assert_eq!(g.prod_precedence(p).map(|p| p.level), Some(2));
    g.add_precedence(Assoc::Right, &[PLUS]);
    assert_eq!(g.get_log().num_errors(), 1);
}

#[test]
fn grammar_check_ok() {
    let mut g = build_grammar();
    g.check();
    assert!(g.get_log().is_empty(), "{}", g.get_log());
}

#[test]
fn grammar_check_errors() {
    let mut g = build_grammar();
    g.add_prod(E, symbols![t 99]);
    g.check();
    assert_eq!(g.get_log().num_errors(), 1);
    assert!(g.get_log().get_errors().next().unwrap().contains("undefined symbol"));

    let mut symbol_table = SymbolTable::new();
    symbol_table.extend_nonterminals(["a", "b", "c"]);
    let mut g = Grammar::new(symbol_table.clone());
    g.add_prod(0, symbols![nt 1]);
    g.check();
    assert_eq!(g.get_log().get_errors().collect::<Vec<_>>(), vec!["start symbol not set"]);

    let mut g = Grammar::new(symbol_table);
    g.set_start(0);
    g.add_prod(0, symbols![nt 1]);
    g.add_prod(2, symbols![t END_TOKEN]);
    g.check();
    assert_eq!(g.get_log().get_errors().collect::<Vec<_>>(), vec!["nonterminal 'b' has no production"]);
    assert_eq!(g.get_log().get_warnings().collect::<Vec<_>>(), vec!["nonterminal 'c' is unreachable"]);
}

#[test]
fn grammar_display() {
    let g = build_grammar();
    let text = g.to_string();
    assert!(text.starts_with("  0: $accept -> e\n  1: e -> e \"+\" t\n"), "{text}");
}
