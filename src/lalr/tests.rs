// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

#![cfg(test)]

use super::*;
use classlr_core::lexer::{Payload, PosSpan, Token, TokenIter};
use classlr_core::parser::{ParseNode, Parser, TreeBuilder};
use classlr_core::ERROR_TOKEN;
use crate::symbol_table::SymbolTable;
use crate::symbols;

// terminals shared by the test grammars
const NUM: TokenId = 3;
const PLUS: TokenId = 4;
const STAR: TokenId = 5;
const POW: TokenId = 6;
const LT: TokenId = 7;
const IF: TokenId = 8;
const ELSE: TokenId = 9;
const X: TokenId = 10;

fn symbol_table(nonterminals: &[&str]) -> SymbolTable {
    let mut symbol_table = SymbolTable::new();
    symbol_table.extend_terminals([
        ("NUM", None), ("PLUS", Some("+")), ("STAR", Some("*")), ("POW", Some("^")), ("LT", Some("<")),
        ("IF", Some("if")), ("ELSE", Some("else")), ("X", Some("x"))
    ]);
    symbol_table.extend_nonterminals(nonterminals.iter().copied());
    symbol_table
}

/// Converts the text to tokens; words are separated by spaces.
fn tokens(text: &str) -> Vec<Token> {
    text.split_whitespace().map(|word| {
        let id = match word {
            "+" => PLUS,
            "*" => STAR,
            "^" => POW,
            "<" => LT,
            "if" => IF,
            "else" => ELSE,
            "x" => X,
            _ => return Token::new(NUM, Payload::Int(word.parse().unwrap()), PosSpan::empty()),
        };
        Token::bare(id)
    }).collect()
}

fn parse_tree(automaton: &Automaton, text: &str) -> Option<String> {
    let tables = automaton.get_tables();
    let mut hooks = TreeBuilder::new();
    let outcome = Parser::new(tables).parse(TokenIter::new(tokens(text)), &mut hooks).unwrap();
    if outcome.is_success() {
        outcome.value.map(|tree| tree.to_sexpr(tables))
    } else {
        None
    }
}

/// ```text
/// e -> e + e | e * e | e ^ e | e < e | NUM
/// ```
fn expr_grammar() -> Grammar {
    const E: VarId = 0;
    let mut g = Grammar::new(symbol_table(&["e"]));
    g.set_start(E);
    g.add_prod(E, symbols![nt E, t PLUS, nt E]);
    g.add_prod(E, symbols![nt E, t STAR, nt E]);
    g.add_prod(E, symbols![nt E, t POW, nt E]);
    g.add_prod(E, symbols![nt E, t LT, nt E]);
    g.add_prod(E, symbols![t NUM]);
    g.add_precedence(Assoc::NonAssoc, &[LT]);
    g.add_precedence(Assoc::Left, &[PLUS]);
    g.add_precedence(Assoc::Left, &[STAR]);
    g.add_precedence(Assoc::Right, &[POW]);
    g
}

/// ```text
/// s -> if s | if s else s | x
/// ```
fn if_grammar() -> Grammar {
    const S: VarId = 0;
    let mut g = Grammar::new(symbol_table(&["s"]));
    g.set_start(S);
    g.add_prod(S, symbols![t IF, nt S]);
    g.add_prod(S, symbols![t IF, nt S, t ELSE, nt S]);
    g.add_prod(S, symbols![t X]);
    g
}

#[test]
fn lalr_precedence() {
    let automaton = Automaton::build(expr_grammar()).unwrap_or_else(|e| panic!("{e}"));
    assert!(automaton.get_conflicts().is_empty());
    assert_eq!(automaton.num_resolved(), 16);
    assert_eq!(automaton.get_log().num_notes(), 16);
    let tests = vec![
        ("1 + 2 * 3", Some("(e 1 + (e 2 * 3))")),
        ("1 * 2 + 3", Some("(e (e 1 * 2) + 3)")),
        ("1 + 2 + 3", Some("(e (e 1 + 2) + 3)")),
        ("1 ^ 2 ^ 3", Some("(e 1 ^ (e 2 ^ 3))")),
        ("1 * 2 ^ 3", Some("(e 1 * (e 2 ^ 3))")),
        ("1 + 2 < 3", Some("(e (e 1 + 2) < 3)")),
        ("1 < 2", Some("(e 1 < 2)")),
        ("1 < 2 < 3", None),
        ("1 +", None),
    ];
    for (text, expected) in tests {
        assert_eq!(parse_tree(&automaton, text).as_deref(), expected, "text: {text}");
    }
}

#[test]
fn lalr_nonassoc() {
    let automaton = Automaton::build(expr_grammar()).unwrap();
    let tables = automaton.get_tables();
    // after 'e < e', '<' is an error while the other operators reduce or shift
    let state = (0..tables.num_states() as StateId)
        .find(|&s| automaton.get_kernel(s).iter().any(|item| item.prod == 4 && item.dot == 3))
        .unwrap();
    assert_eq!(tables.action(state, LT), Action::Error);
    assert_eq!(tables.action(state, END_TOKEN), Action::Reduce(4));
    assert!(matches!(tables.action(state, PLUS), Action::Shift(_)));
}

#[test]
fn lalr_prefer_shift() {
    let mut g = if_grammar();
    g.set_expected_conflicts(1, 0);
    let automaton = Automaton::build(g).unwrap_or_else(|e| panic!("{e}"));
    let conflicts = automaton.get_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::ShiftReduce);
    assert_eq!(conflicts[0].token, ELSE);
    assert_eq!(conflicts[0].prods, vec![1]);
    assert!(matches!(conflicts[0].chosen, Action::Shift(_)));
    assert_eq!(automaton.count_conflicts(), (1, 0));
    assert_eq!(automaton.get_log().num_notes(), 1);
    // else attaches to the nearest if
    assert_eq!(parse_tree(&automaton, "if if x else x").as_deref(), Some("(s if (s if x else x))"));
    assert_eq!(parse_tree(&automaton, "if x else if x").as_deref(), Some("(s if x else (s if x))"));
}

#[test]
fn lalr_default_reduction() {
    let mut g = if_grammar();
    g.set_expected_conflicts(1, 0);
    let automaton = Automaton::build(g).unwrap_or_else(|e| panic!("{e}"));
    let tables = automaton.get_tables();
    let find_state = |prod: ProdId, dot: usize| (0..tables.num_states() as StateId)
        .find(|&s| automaton.get_kernel(s).iter().any(|item| item.prod == prod && item.dot as usize == dot))
        .unwrap();
    // 's -> x' can only reduce, whatever the lookahead
    let state = find_state(3, 1);
    for token in [END_TOKEN, ELSE, IF, X, NUM] {
        assert_eq!(tables.action(state, token), Action::Reduce(3), "token {token}");
    }
    // a state that shifts keeps its errors
    let state = find_state(1, 2);
    assert!(matches!(tables.action(state, ELSE), Action::Shift(_)));
    assert_eq!(tables.action(state, IF), Action::Error);
    // so does the accepting state
    let Some(state) = tables.goto(0, 0) else { panic!("no goto on the start symbol") };
    assert_eq!(tables.action(state, END_TOKEN), Action::Accept);
    assert_eq!(tables.action(state, X), Action::Error);
    assert_eq!(parse_tree(&automaton, "x x"), None);
}

#[test]
fn lalr_unexpected_conflict() {
    let result = Automaton::build(if_grammar());
    let Err(error) = result else { panic!("conflict not detected") };
    assert_eq!(error.get_source(), BuildErrorSource::Automaton);
    let errors = error.get_log().get_errors().cloned().collect::<Vec<_>>();
    assert_eq!(errors.len(), 2, "{errors:?}");
    assert_eq!(errors[0], "1 shift/reduce conflict(s) instead of 0");
    assert!(errors[1].contains("on \"else\": shift/reduce conflict between shift and reduce [s -> \"if\" s]"), "{}", errors[1]);
}

#[test]
fn lalr_reduce_reduce() {
    // s -> a | b, a -> x, b -> x
    const S: VarId = 0;
    const A: VarId = 1;
    const B: VarId = 2;
    let build = |expected_rr: usize| {
        let mut g = Grammar::new(symbol_table(&["s", "a", "b"]));
        g.set_start(S);
        g.add_prod(S, symbols![nt A]);
        g.add_prod(S, symbols![nt B]);
        g.add_prod(A, symbols![t X]);
        g.add_prod(B, symbols![t X]);
        g.set_expected_conflicts(0, expected_rr);
        Automaton::build(g)
    };
    let error = build(0).unwrap_err();
    assert!(error.get_log().get_errors().any(|e| e.contains("reduce [a -> \"x\"] and [b -> \"x\"]")), "{error}");

    let automaton = build(1).unwrap_or_else(|e| panic!("{e}"));
    let conflicts = automaton.get_conflicts();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].kind, ConflictKind::ReduceReduce);
    assert_eq!(conflicts[0].token, END_TOKEN);
    assert_eq!(conflicts[0].prods, vec![3, 4]);
    assert_eq!(conflicts[0].chosen, Action::Reduce(3));

    let tables = automaton.get_tables();
    let mut hooks = TreeBuilder::new();
    let outcome = Parser::new(tables).parse(TokenIter::new(tokens("x")), &mut hooks).unwrap();
    let Some(ParseNode::Node { prod, children }) = outcome.value else { panic!("no tree") };
    assert_eq!(prod, 1);
    assert!(matches!(children.as_slice(), [ParseNode::Node { prod: 3, .. }]));
}

#[test]
fn lalr_error_token() {
    // s -> s x | x | error x
    const S: VarId = 0;
    let mut g = Grammar::new(symbol_table(&["s"]));
    g.set_start(S);
    g.add_prod(S, symbols![nt S, t X]);
    g.add_prod(S, symbols![t X]);
    g.add_prod(S, symbols![t ERROR_TOKEN, t X]);
    let automaton = Automaton::build(g).unwrap();
    let tables = automaton.get_tables();
    assert!(tables.shifts_error(0));
    assert_eq!(tables.expected_tokens(0), vec![X]);
    let mut hooks = TreeBuilder::new();
    let outcome = Parser::new(tables).parse(TokenIter::new(tokens("1 x x")), &mut hooks).unwrap();
    assert!(outcome.accepted);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.value.map(|tree| tree.count_errors()), Some(1));
}

#[test]
fn lalr_accept() {
    let automaton = Automaton::build(expr_grammar()).unwrap();
    let tables = automaton.get_tables();
    let Some(state) = tables.goto(0, 0) else { panic!("no goto on the start symbol") };
    assert_eq!(tables.action(state, END_TOKEN), Action::Accept);
    assert_eq!(tables.num_prods(), 6);
    assert_eq!(tables.prod(1), ProdInfo { lhs: 0, len: 3 });
}

#[test]
fn lalr_deterministic() {
    let a1 = Automaton::build(expr_grammar()).unwrap();
    let a2 = Automaton::build(expr_grammar()).unwrap();
    assert_eq!(a1.num_states(), a2.num_states());
    assert_eq!(a1.get_tables().action_table_str(), a2.get_tables().action_table_str());
    assert_eq!(a1.states_str(), a2.states_str());
    assert_eq!(a1.get_kernel(0), &[Item::new(0, 0)]);
    let states = a1.states_str();
    assert!(states.starts_with("state 0:\n    $accept -> • e\n  - NUM:s"), "{states}");
}

#[test]
fn lalr_grammar_errors() {
    const S: VarId = 0;
    let mut g = Grammar::new(symbol_table(&["s", "t"]));
    g.set_start(S);
    g.add_prod(S, symbols![nt 1]);
    let error = Automaton::build(g).unwrap_err();
    assert_eq!(error.get_source(), BuildErrorSource::Grammar);
    assert_eq!(error.get_log().get_errors().next().map(|s| s.as_str()), Some("nonterminal 't' has no production"));

    // the unchecked grammar is checked by the automaton
    let mut g = Grammar::new(symbol_table(&["s"]));
    g.add_prod(S, symbols![t X]);
    let error = Automaton::try_build_from(g).unwrap_err();
    assert_eq!(error.get_source(), BuildErrorSource::Automaton);
    assert!(error.to_string().contains("start symbol not set"), "{error}");
}
