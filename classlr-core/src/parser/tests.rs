// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

#![cfg(test)]

//! Tables written by hand for this grammar, numbered as an LALR(1) builder would:
//!
//! ```text
//! 0: $accept -> list
//! 1: list    -> list stmt
//! 2: list    -> stmt
//! 3: stmt    -> expr SEMI
//! 4: stmt    -> error SEMI
//! 5: expr    -> expr PLUS NUM
//! 6: expr    -> NUM
//! ```

use proptest::prelude::*;
use super::*;
use crate::lexer::{PosSpan, TokenIter};
use crate::log::{BufLog, LogStatus, Logger};
use crate::{ERROR_TOKEN, INVALID_TOKEN};

const END: TokenId = END_TOKEN;
const ERR: TokenId = ERROR_TOKEN;
const NUM: TokenId = 3;
const PLUS: TokenId = 4;
const SEMI: TokenId = 5;

const LIST: VarId = 0;
const STMT: VarId = 1;
const EXPR: VarId = 2;
const ACCEPT: VarId = 3;

pub(crate) fn sum_tables() -> ParseTables {
    const NUM_T: usize = 6;
    const NUM_NT: usize = 4;
    const NUM_STATES: usize = 11;
    let symbol_table = FixedSymTable::new(
        vec![
            ("$end".to_string(), Some("end of file".to_string())),
            ("error".to_string(), Some("error".to_string())),
            ("INVALID".to_string(), None),
            ("NUM".to_string(), None),
            ("PLUS".to_string(), Some("+".to_string())),
            ("SEMI".to_string(), Some(";".to_string())),
        ],
        vec!["list".to_string(), "stmt".to_string(), "expr".to_string(), "$accept".to_string()]);
    let mut actions = vec![Action::Error; NUM_STATES * NUM_T];
    let mut set = |state: usize, t: TokenId, action: Action| actions[state * NUM_T + t as usize] = action;
    set(0, NUM, Action::Shift(5));
    set(0, ERR, Action::Shift(4));
    set(1, END, Action::Accept);
    set(1, NUM, Action::Shift(5));
    set(1, ERR, Action::Shift(4));
    for t in [END, NUM, ERR] {
        set(2, t, Action::Reduce(2));
        set(6, t, Action::Reduce(1));
        set(7, t, Action::Reduce(3));
        set(9, t, Action::Reduce(4));
    }
    set(3, SEMI, Action::Shift(7));
    set(3, PLUS, Action::Shift(8));
    set(4, SEMI, Action::Shift(9));
    for t in [SEMI, PLUS] {
        set(5, t, Action::Reduce(6));
        set(10, t, Action::Reduce(5));
    }
    set(8, NUM, Action::Shift(10));
    let mut gotos = vec![None; NUM_STATES * NUM_NT];
    for (state, var, next) in [(0, LIST, 1), (0, STMT, 2), (0, EXPR, 3), (1, STMT, 6), (1, EXPR, 3)] {
        gotos[state * NUM_NT + var as usize] = Some(next);
    }
    let prods = [(ACCEPT, 1), (LIST, 2), (LIST, 1), (STMT, 2), (STMT, 2), (EXPR, 3), (EXPR, 1)]
        .into_iter().map(|(lhs, len)| ProdInfo { lhs, len }).collect();
    ParseTables::new(actions, gotos, prods, symbol_table)
}

/// Splits `text` on spaces: numbers, `+`, `;`, anything else is an invalid token.
fn lex(text: &str) -> Vec<Token> {
    let mut col = 1;
    let mut tokens = vec![];
    for word in text.split(' ') {
        if !word.is_empty() {
            let span = PosSpan::new(Pos(1, col), Pos(1, col + word.len() as u64 - 1));
            let token = match word {
                "+" => Token::new(PLUS, Payload::None, span),
                ";" => Token::new(SEMI, Payload::None, span),
                _ => match word.parse::<i64>() {
                    Ok(n) => Token::new(NUM, Payload::Int(n), span),
                    Err(_) => Token::new(INVALID_TOKEN, Payload::Invalid(word.to_string()), span),
                }
            };
            tokens.push(token);
        }
        col += word.len() as u64 + 1;
    }
    tokens
}

/// Checks that every value created by the hooks is consumed once.
#[derive(Debug, Default)]
struct BalanceHooks {
    log: BufLog,
    created: usize,
    consumed: usize,
}

impl SemanticHooks for BalanceHooks {
    type Value = usize;

    fn shift(&mut self, _token: Token) -> usize {
        self.created += 1;
        self.created
    }

    fn reduce(&mut self, _prod: ProdId, children: Vec<usize>) -> usize {
        self.consumed += children.len();
        self.created += 1;
        self.created
    }

    fn placeholder(&mut self) -> usize {
        self.created += 1;
        self.created
    }

    fn release(&mut self, _value: usize) {
        self.consumed += 1;
    }

    fn get_mut_log(&mut self) -> &mut impl Logger {
        &mut self.log
    }
}

impl BalanceHooks {
    fn is_balanced<V>(&self, outcome: Option<&ParseOutcome<V>>) -> bool {
        let returned = outcome.map(|o| o.value.is_some() as usize).unwrap_or(0);
        self.created == self.consumed + returned
    }
}

struct AbortAfter {
    tokens: std::vec::IntoIter<Token>,
}

impl TokenSource for AbortAfter {
    fn next_token(&mut self) -> Result<Token, SourceError> {
        self.tokens.next().ok_or_else(|| SourceError("stop requested".to_string()))
    }
}

// ---------------------------------------------------------------------------------------------

#[test]
fn parser_valid() {
    let tables = sum_tables();
    let parser = Parser::new(&tables);
    let mut hooks = TreeBuilder::new();
    let outcome = parser.parse(TokenIter::new(lex("1 + 2 ; 3 ;")), &mut hooks).expect("no fatal error");
    assert!(outcome.is_success());
    let tree = outcome.value.expect("accepted input has a value");
    assert_eq!(tree.to_sexpr(&tables), "(list (stmt (expr 1 + 2) ;) (stmt 3 ;))");
    assert!(hooks.log.is_empty());
    assert_eq!(hooks.num_release, 1);
}

#[test]
fn parser_recover() {
    let tables = sum_tables();
    let parser = Parser::new(&tables);
    let mut hooks = TreeBuilder::new();
    let outcome = parser.parse(TokenIter::new(lex("1 + + 2 ; 3 ;")), &mut hooks).expect("no fatal error");
    assert!(outcome.accepted);
    assert_eq!(outcome.error_count, 1);
    assert!(!outcome.is_success());
    let tree = outcome.value.expect("accepted input has a value");
    assert_eq!(tree.to_sexpr(&tables), "(list (stmt error ;) (stmt 3 ;))");
    assert_eq!(tree.count_errors(), 1);
    assert_eq!(hooks.log.get_errors().cloned().collect::<Vec<_>>(),
               vec!["syntax error: found input '+' instead of 'NUM', line 1, col 5".to_string()]);
    assert_eq!(hooks.log.get_notes().cloned().collect::<Vec<_>>(),
               vec!["resynchronized on ';', line 1, col 9".to_string()]);
    // '+' and 'expr' popped, then the bottom placeholder
    assert_eq!(hooks.num_release, 3);
}

#[test]
fn parser_error_burst() {
    let tables = sum_tables();
    let parser = Parser::new(&tables);
    let mut hooks = NoopHooks::new();
    let outcome = parser.parse(TokenIter::new(lex("1 + ; + ; 4 ;")), &mut hooks).expect("no fatal error");
    assert!(outcome.accepted);
    assert_eq!(outcome.error_count, 1, "second fault in the same burst must not be counted");
    assert_eq!(hooks.log.num_errors(), 1);
    // only the resynchronization that held is reported
    assert_eq!(hooks.log.get_notes().cloned().collect::<Vec<_>>(),
               vec!["resynchronized on ';', line 1, col 9".to_string()]);
    assert_eq!(hooks.num_discard, 1);
}

#[test]
fn parser_resync_failed() {
    let tables = sum_tables();
    let parser = Parser::new(&tables);
    let mut hooks = BalanceHooks::default();
    let outcome = parser.parse(TokenIter::new(lex("1 + ; 2")), &mut hooks).expect("no fatal error");
    assert!(!outcome.accepted);
    assert_eq!(outcome.error_count, 1);
    let errors = hooks.log.get_errors().cloned().collect::<Vec<_>>();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0], "syntax error: found input ';' instead of 'NUM', line 1, col 5");
    assert!(errors[1].starts_with("irrecoverable error, reached end of stream"), "{}", errors[1]);
    assert_eq!(hooks.log.num_notes(), 0);
    assert!(hooks.is_balanced(Some(&outcome)));
}

#[test]
fn parser_separate_errors() {
    let tables = sum_tables();
    let parser = Parser::new(&tables);
    let mut hooks = NoopHooks::new();
    let outcome = parser.parse(TokenIter::new(lex("; 1 ; 2 ; 3 ; 4 4 ;")), &mut hooks).expect("no fatal error");
    assert!(outcome.accepted);
    assert_eq!(outcome.error_count, 2);
    let errors = hooks.log.get_errors().cloned().collect::<Vec<_>>();
    assert_eq!(errors, vec![
        "syntax error: found input ';' instead of 'NUM', line 1, col 1".to_string(),
        "syntax error: found input '4' instead of '+', ';', line 1, col 17".to_string(),
    ]);
}

#[test]
fn parser_invalid_token() {
    let tables = sum_tables();
    let parser = Parser::new(&tables);
    let mut hooks = NoopHooks::new();
    let outcome = parser.parse(TokenIter::new(lex("1 @ ; 2 ;")), &mut hooks).expect("no fatal error");
    assert!(outcome.accepted);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(hooks.log.get_errors().next().map(|s| s.as_str()),
               Some("syntax error: found input '@' instead of '+', ';', line 1, col 3"));
}

#[test]
fn parser_irrecoverable() {
    let tables = sum_tables();
    let parser = Parser::new(&tables);
    let mut hooks = BalanceHooks::default();
    let outcome = parser.parse(TokenIter::new(lex("1 +")), &mut hooks).expect("no fatal error");
    assert!(!outcome.accepted);
    assert_eq!(outcome.error_count, 1);
    assert_eq!(outcome.value, None);
    assert_eq!(hooks.log.get_errors().cloned().collect::<Vec<_>>(), vec![
        "syntax error: found end of stream instead of 'NUM', line 1, col 3".to_string(),
        "irrecoverable error, reached end of stream, line 1, col 3".to_string(),
    ]);
    assert!(hooks.is_balanced(Some(&outcome)));
}

#[test]
fn parser_max_errors() {
    let tables = sum_tables();
    let parser = Parser::with_config(&tables, ParserConfig::default().with_max_errors(1));
    let mut hooks = BalanceHooks::default();
    let outcome = parser.parse(TokenIter::new(lex("; 1 ; 2 ; 3 ; 4 4 ;")), &mut hooks).expect("no fatal error");
    assert!(!outcome.accepted);
    assert_eq!(outcome.error_count, 2);
    assert_eq!(hooks.log.get_notes().last().map(|s| s.as_str()), Some("too many errors (2), giving up"));
    assert!(hooks.is_balanced(Some(&outcome)));
}

#[test]
fn parser_stack_exhausted() {
    let tables = sum_tables();
    let config = ParserConfig { initial_depth: 1, max_depth: 2, max_errors: None };
    let parser = Parser::with_config(&tables, config);
    let mut hooks = BalanceHooks::default();
    let result = parser.parse(TokenIter::new(lex("1 + 2 ;")), &mut hooks);
    assert_eq!(result, Err(ParserError::StackExhausted { limit: 2 }));
    assert!(hooks.is_balanced::<usize>(None));
    // the same input fits in a deeper stack
    let parser = Parser::with_config(&tables, ParserConfig { initial_depth: 1, max_depth: 4, max_errors: None });
    let outcome = parser.parse(TokenIter::new(lex("1 + 2 ;")), &mut NoopHooks::new()).expect("no fatal error");
    assert!(outcome.is_success());
}

#[test]
fn parser_abort() {
    let tables = sum_tables();
    let parser = Parser::new(&tables);
    let mut hooks = BalanceHooks::default();
    let source = AbortAfter { tokens: lex("1 + 2").into_iter() };
    let result = parser.parse(source, &mut hooks);
    assert_eq!(result, Err(ParserError::Aborted(SourceError("stop requested".to_string()))));
    assert!(hooks.is_balanced::<usize>(None));
}

#[test]
fn parser_reentrant() {
    let tables = sum_tables();
    let parser = Parser::new(&tables);
    let run = || {
        let mut hooks = TreeBuilder::new();
        let outcome = parser.parse(TokenIter::new(lex("1 + + 2 ; 3 ;")), &mut hooks).expect("no fatal error");
        (outcome, hooks.log.to_string())
    };
    let first = run();
    let second = run();
    assert_eq!(first, second);
    std::thread::scope(|s| {
        let handles = (0..4).map(|_| s.spawn(|| {
            let parser = Parser::new(&tables);
            let mut hooks = NoopHooks::new();
            parser.parse(TokenIter::new(lex("1 + 2 ; 3 ;")), &mut hooks).map(|o| o.is_success())
        })).collect::<Vec<_>>();
        for h in handles {
            assert_eq!(h.join().expect("no panic"), Ok(true));
        }
    });
}

#[test]
fn tables_expected_tokens() {
    let tables = sum_tables();
    assert_eq!(tables.num_states(), 11);
    assert_eq!(tables.expected_tokens(0), vec![NUM]);
    assert_eq!(tables.expected_tokens(1), vec![END, NUM]);
    assert_eq!(tables.expected_tokens(3), vec![PLUS, SEMI]);
    assert!(tables.shifts_error(1) && !tables.shifts_error(3));
    assert_eq!(tables.action(3, 99), Action::Error);
    let text = tables.action_table_str();
    assert!(text.lines().next().is_some_and(|l| l.contains("NUM:s5") && l.contains("error:s4")), "{text}");
}

#[test]
#[should_panic(expected = "goto table doesn't match the action table")]
fn tables_size_mismatch() {
    let tables = sum_tables();
    let symbol_table = tables.get_symbol_table().clone();
    // one state of actions, but the gotos of only 3 nonterminals
    ParseTables::new(vec![Action::Error; 6], vec![None; 3], vec![], symbol_table);
}

proptest! {
    #[test]
    fn parser_releases_every_value(words in proptest::collection::vec(prop_oneof![Just("1"), Just("+"), Just(";"), Just("@")], 0..40)) {
        let tables = sum_tables();
        let parser = Parser::new(&tables);
        let mut hooks = BalanceHooks::default();
        let outcome = parser.parse(TokenIter::new(lex(&words.join(" "))), &mut hooks);
        prop_assert!(outcome.is_ok());
        let outcome = outcome.unwrap();
        prop_assert!(hooks.is_balanced(Some(&outcome)));
        prop_assert!(hooks.log.num_errors() as u32 >= outcome.error_count);
        if outcome.accepted && outcome.error_count == 0 {
            prop_assert!(hooks.log.has_no_errors());
        }
    }
}
