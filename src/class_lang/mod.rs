// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Grammar of the class language, its scanner and a symbol collector.
//!
//! A source file is either a list of class declarations or a script of statements:
//!
//! ```text
//! class Point isa Shape implement Printable {
//!     public:
//!     float x;
//!     func dist(Point p): float { return x - p.x; }
//! }
//! ```

pub mod scanner;
pub mod symbols;

use std::sync::OnceLock;
use classlr_core::parser::{ParseOutcome, Parser, ParserConfig, ParserError, SemanticHooks};
use classlr_core::table::ParseTables;
use crate::build::BuildError;
use crate::grammar::{Assoc, Grammar, ProdId, Symbol, VarId};
use crate::lalr::Automaton;
use crate::symbol_table::SymbolTable;
use crate::symbols;
use scanner::Scanner;

/// Terminals of the class language. The first three ids are the reserved terminals.
pub mod t {
    use crate::TokenId;

    pub const IF: TokenId = 3;
    pub const ELSE: TokenId = 4;
    pub const WHILE: TokenId = 5;
    pub const THEN: TokenId = 6;
    pub const READ: TokenId = 7;
    pub const WRITE: TokenId = 8;
    pub const RETURN: TokenId = 9;
    pub const INTEGER_KW: TokenId = 10;
    pub const FLOAT_KW: TokenId = 11;
    pub const VOID: TokenId = 12;
    pub const EQ: TokenId = 13;
    pub const ASSIGN: TokenId = 14;
    pub const EQUALS: TokenId = 15;
    pub const LE: TokenId = 16;
    pub const GE: TokenId = 17;
    pub const LT: TokenId = 18;
    pub const GT: TokenId = 19;
    pub const NE: TokenId = 20;
    pub const PLUS: TokenId = 21;
    pub const MINUS: TokenId = 22;
    pub const MULT: TokenId = 23;
    pub const DIV: TokenId = 24;
    pub const AND: TokenId = 25;
    pub const OR: TokenId = 26;
    pub const NOT: TokenId = 27;
    pub const LPAREN: TokenId = 28;
    pub const RPAREN: TokenId = 29;
    pub const LBRACE: TokenId = 30;
    pub const RBRACE: TokenId = 31;
    pub const LBRACKET: TokenId = 32;
    pub const RBRACKET: TokenId = 33;
    pub const SEMI: TokenId = 34;
    pub const COMMA: TokenId = 35;
    pub const DOT: TokenId = 36;
    pub const SCOPE: TokenId = 37;
    pub const COLON: TokenId = 38;
    pub const CLASS: TokenId = 39;
    pub const FUNC: TokenId = 40;
    pub const IMPLEMENT: TokenId = 41;
    pub const ISA: TokenId = 42;
    pub const PRIVATE: TokenId = 43;
    pub const PUBLIC: TokenId = 44;
    pub const LOCAL: TokenId = 45;
    pub const ATTRIBUTE: TokenId = 46;
    pub const ID: TokenId = 47;
    pub const INT: TokenId = 48;
    pub const FLOAT: TokenId = 49;
    pub const STRING: TokenId = 50;
    // precedence only, never produced by the scanner
    pub const UMINUS: TokenId = 51;
    pub const NO_ELSE: TokenId = 52;

    pub const NUM_T: usize = 53;
}

/// Nonterminals of the class language.
pub mod nt {
    use crate::VarId;

    pub const PROGRAM: VarId = 0;
    pub const CLASS_LIST: VarId = 1;
    pub const CLASS_DECL: VarId = 2;
    pub const INHERITANCE: VarId = 3;
    pub const ID_LIST: VarId = 4;
    pub const MEMBER_LIST: VarId = 5;
    pub const MEMBER: VarId = 6;
    pub const VISIBILITY: VarId = 7;
    pub const FIELD_DECL: VarId = 8;
    pub const ARRAY_DIMS: VarId = 9;
    pub const METHOD_DECL: VarId = 10;
    pub const PARAM_LIST: VarId = 11;
    pub const PARAMS: VarId = 12;
    pub const PARAM: VarId = 13;
    pub const TYPE: VarId = 14;
    pub const SCRIPT: VarId = 15;
    pub const STMT_LIST: VarId = 16;
    pub const STMT: VarId = 17;
    pub const EXPR_STMT: VarId = 18;
    pub const ASSIGN_STMT: VarId = 19;
    pub const DECL_STMT: VarId = 20;
    pub const IF_STMT: VarId = 21;
    pub const WHILE_STMT: VarId = 22;
    pub const IO_STMT: VarId = 23;
    pub const RETURN_STMT: VarId = 24;
    pub const BLOCK_STMT: VarId = 25;
    pub const EXPR: VarId = 26;
    pub const POSTFIX: VarId = 27;
    pub const PRIMARY: VarId = 28;
    pub const ARG_LIST: VarId = 29;
    pub const ARGS: VarId = 30;
    /// Augmented start symbol, added by the grammar
    pub const ACCEPT: VarId = 31;

    pub const NUM_NT: usize = 32;
}

static TERMINALS: [(&str, Option<&str>); t::NUM_T - 3] = [
    ("IF", Some("if")), ("ELSE", Some("else")), ("WHILE", Some("while")), ("THEN", Some("then")),
    ("READ", Some("read")), ("WRITE", Some("write")), ("RETURN", Some("return")),
    ("INTEGER_KW", Some("integer")), ("FLOAT_KW", Some("float")), ("VOID", Some("void")),
    ("EQ", Some("==")), ("ASSIGN", Some(":=")), ("EQUALS", Some("=")), ("LE", Some("<=")), ("GE", Some(">=")),
    ("LT", Some("<")), ("GT", Some(">")), ("NE", Some("<>")), ("PLUS", Some("+")), ("MINUS", Some("-")),
    ("MULT", Some("*")), ("DIV", Some("/")), ("AND", Some("and")), ("OR", Some("or")), ("NOT", Some("not")),
    ("LPAREN", Some("(")), ("RPAREN", Some(")")), ("LBRACE", Some("{")), ("RBRACE", Some("}")),
    ("LBRACKET", Some("[")), ("RBRACKET", Some("]")), ("SEMI", Some(";")), ("COMMA", Some(",")),
    ("DOT", Some(".")), ("SCOPE", Some("::")), ("COLON", Some(":")),
    ("CLASS", Some("class")), ("FUNC", Some("func")), ("IMPLEMENT", Some("implement")), ("ISA", Some("isa")),
    ("PRIVATE", Some("private")), ("PUBLIC", Some("public")), ("LOCAL", Some("local")), ("ATTRIBUTE", Some("attribute")),
    ("ID", None), ("INT", None), ("FLOAT", None), ("STRING", None),
    ("UMINUS", None), ("NO_ELSE", None),
];

static NONTERMINALS: [&str; nt::NUM_NT - 1] = [
    "program", "class_list", "class_decl", "inheritance", "id_list", "member_list", "member", "visibility",
    "field_decl", "array_dims", "method_decl", "param_list", "params", "param", "type", "script",
    "stmt_list", "stmt", "expr_stmt", "assign_stmt", "decl_stmt", "if_stmt", "while_stmt", "io_stmt",
    "return_stmt", "block_stmt", "expr", "postfix", "primary", "arg_list", "args",
];

// ---------------------------------------------------------------------------------------------

/// Productions of the class language; the discriminant is the production id.
#[repr(u16)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Rule {
    Accept,
    ProgramClasses, ProgramScript, ProgramEmpty,
    ClassListMore, ClassListOne, ClassListError, ClassListErrorFirst,
    ClassDecl, ClassDeclUnclosed, ClassDeclBadHeader, ClassDeclBadName,
    InheritNone, InheritIsa, InheritImplement, InheritBoth,
    IdListMore, IdListOne,
    MemberListMore, MemberListEmpty,
    MemberVisibility, MemberField, MemberMethod, MemberError,
    VisibilityPublic, VisibilityPrivate,
    Field, FieldAttribute,
    DimsInt, DimsId, DimsOpen, DimsEmpty,
    MethodTyped, MethodUntyped,
    ParamListSome, ParamListEmpty,
    ParamsMore, ParamsOne,
    Param,
    TypeInteger, TypeFloat, TypeVoid, TypeId,
    ScriptMore, ScriptOne, ScriptMoreError, ScriptError,
    StmtListMore, StmtListEmpty, StmtListError, StmtListErrorNoSemi,
    StmtExpr, StmtAssign, StmtDecl, StmtIf, StmtWhile, StmtIo, StmtReturn, StmtBlock,
    ExprStmt,
    AssignColon, AssignEquals,
    Decl, DeclInit, DeclLocal, DeclLocalInit,
    IfThenElse, IfThen, IfElse, If,
    While,
    Read, Write,
    ReturnValue, ReturnVoid,
    Block,
    Or, And, Not, Eq, Ne, Lt, Le, Gt, Ge, Add, Sub, Mul, Div, Neg, ExprPostfix,
    PostfixPrimary, Call, Index, Member, Scope,
    PrimaryId, PrimaryInt, PrimaryFloat, PrimaryString, PrimaryParen,
    ArgListSome, ArgListEmpty,
    ArgsMore, ArgsOne,
}

impl Rule {
    pub const ALL: [Rule; 105] = {
        use Rule::*;
        [
            Accept,
            ProgramClasses, ProgramScript, ProgramEmpty,
            ClassListMore, ClassListOne, ClassListError, ClassListErrorFirst,
            ClassDecl, ClassDeclUnclosed, ClassDeclBadHeader, ClassDeclBadName,
            InheritNone, InheritIsa, InheritImplement, InheritBoth,
            IdListMore, IdListOne,
            MemberListMore, MemberListEmpty,
            MemberVisibility, MemberField, MemberMethod, MemberError,
            VisibilityPublic, VisibilityPrivate,
            Field, FieldAttribute,
            DimsInt, DimsId, DimsOpen, DimsEmpty,
            MethodTyped, MethodUntyped,
            ParamListSome, ParamListEmpty,
            ParamsMore, ParamsOne,
            Param,
            TypeInteger, TypeFloat, TypeVoid, TypeId,
            ScriptMore, ScriptOne, ScriptMoreError, ScriptError,
            StmtListMore, StmtListEmpty, StmtListError, StmtListErrorNoSemi,
            StmtExpr, StmtAssign, StmtDecl, StmtIf, StmtWhile, StmtIo, StmtReturn, StmtBlock,
            ExprStmt,
            AssignColon, AssignEquals,
            Decl, DeclInit, DeclLocal, DeclLocalInit,
            IfThenElse, IfThen, IfElse, If,
            While,
            Read, Write,
            ReturnValue, ReturnVoid,
            Block,
            Or, And, Not, Eq, Ne, Lt, Le, Gt, Ge, Add, Sub, Mul, Div, Neg, ExprPostfix,
            PostfixPrimary, Call, Index, Member, Scope,
            PrimaryId, PrimaryInt, PrimaryFloat, PrimaryString, PrimaryParen,
            ArgListSome, ArgListEmpty,
            ArgsMore, ArgsOne,
        ]
    };

    pub fn from_prod(prod: ProdId) -> Option<Rule> {
        Rule::ALL.get(prod as usize).copied()
    }

    pub fn prod(self) -> ProdId {
        self as ProdId
    }
}

fn add(g: &mut Grammar, rule: Rule, lhs: VarId, rhs: Vec<Symbol>) {
    let prod = g.add_prod(lhs, rhs);
    debug_assert_eq!(prod, rule.prod(), "{rule:?}");
}

fn add_prec(g: &mut Grammar, rule: Rule, lhs: VarId, rhs: Vec<Symbol>, prec: crate::TokenId) {
    let prod = g.add_prod_prec(lhs, rhs, prec);
    debug_assert_eq!(prod, rule.prod(), "{rule:?}");
}

/// Creates the symbol table of the class language.
pub fn class_symbol_table() -> SymbolTable {
    let mut symbol_table = SymbolTable::new();
    symbol_table.extend_terminals(TERMINALS);
    symbol_table.extend_nonterminals(NONTERMINALS);
    symbol_table
}

/// Creates the grammar of the class language.
pub fn class_grammar() -> Grammar {
    use nt::*;
    use t::*;
    use Rule::*;

    let mut g = Grammar::new(class_symbol_table());
    debug_assert_eq!(g.get_accept_var(), nt::ACCEPT);
    g.set_start(PROGRAM);

    add(&mut g, ProgramClasses, PROGRAM, symbols![nt CLASS_LIST]);
    add(&mut g, ProgramScript, PROGRAM, symbols![nt SCRIPT]);
    add(&mut g, ProgramEmpty, PROGRAM, symbols![]);
    add(&mut g, ClassListMore, CLASS_LIST, symbols![nt CLASS_LIST, nt CLASS_DECL]);
    add(&mut g, ClassListOne, CLASS_LIST, symbols![nt CLASS_DECL]);
    add(&mut g, ClassListError, CLASS_LIST, symbols![nt CLASS_LIST, t classlr_core::ERROR_TOKEN]);
    add(&mut g, ClassListErrorFirst, CLASS_LIST, symbols![t classlr_core::ERROR_TOKEN, nt CLASS_DECL]);
    add(&mut g, ClassDecl, CLASS_DECL, symbols![t CLASS, t ID, nt INHERITANCE, t LBRACE, nt MEMBER_LIST, t RBRACE]);
    add(&mut g, ClassDeclUnclosed, CLASS_DECL, symbols![t CLASS, t ID, nt INHERITANCE, t LBRACE, nt MEMBER_LIST, t classlr_core::ERROR_TOKEN]);
    add(&mut g, ClassDeclBadHeader, CLASS_DECL, symbols![t CLASS, t ID, t classlr_core::ERROR_TOKEN, t LBRACE, nt MEMBER_LIST, t RBRACE]);
    add(&mut g, ClassDeclBadName, CLASS_DECL, symbols![t CLASS, t classlr_core::ERROR_TOKEN, t LBRACE, nt MEMBER_LIST, t RBRACE]);
    add(&mut g, InheritNone, INHERITANCE, symbols![]);
    add(&mut g, InheritIsa, INHERITANCE, symbols![t ISA, nt ID_LIST]);
    add(&mut g, InheritImplement, INHERITANCE, symbols![t IMPLEMENT, nt ID_LIST]);
    add(&mut g, InheritBoth, INHERITANCE, symbols![t ISA, nt ID_LIST, t IMPLEMENT, nt ID_LIST]);
    add(&mut g, IdListMore, ID_LIST, symbols![nt ID_LIST, t COMMA, t ID]);
    add(&mut g, IdListOne, ID_LIST, symbols![t ID]);
    add(&mut g, MemberListMore, MEMBER_LIST, symbols![nt MEMBER_LIST, nt MEMBER]);
    add(&mut g, MemberListEmpty, MEMBER_LIST, symbols![]);
    add(&mut g, MemberVisibility, MEMBER, symbols![nt VISIBILITY, t COLON]);
    add(&mut g, MemberField, MEMBER, symbols![nt FIELD_DECL]);
    add(&mut g, MemberMethod, MEMBER, symbols![nt METHOD_DECL]);
    add(&mut g, MemberError, MEMBER, symbols![t classlr_core::ERROR_TOKEN, t SEMI]);
    add(&mut g, VisibilityPublic, VISIBILITY, symbols![t PUBLIC]);
    add(&mut g, VisibilityPrivate, VISIBILITY, symbols![t PRIVATE]);
    add(&mut g, Field, FIELD_DECL, symbols![nt TYPE, t ID, nt ARRAY_DIMS, t SEMI]);
    add(&mut g, FieldAttribute, FIELD_DECL, symbols![t ATTRIBUTE, nt TYPE, t ID, nt ARRAY_DIMS, t SEMI]);
    add(&mut g, DimsInt, ARRAY_DIMS, symbols![nt ARRAY_DIMS, t LBRACKET, t INT, t RBRACKET]);
    add(&mut g, DimsId, ARRAY_DIMS, symbols![nt ARRAY_DIMS, t LBRACKET, t ID, t RBRACKET]);
    add(&mut g, DimsOpen, ARRAY_DIMS, symbols![nt ARRAY_DIMS, t LBRACKET, t RBRACKET]);
    add(&mut g, DimsEmpty, ARRAY_DIMS, symbols![]);
    add(&mut g, MethodTyped, METHOD_DECL, symbols![t FUNC, t ID, t LPAREN, nt PARAM_LIST, t RPAREN, t COLON, nt TYPE, t LBRACE, nt STMT_LIST, t RBRACE]);
    add(&mut g, MethodUntyped, METHOD_DECL, symbols![t FUNC, t ID, t LPAREN, nt PARAM_LIST, t RPAREN, t LBRACE, nt STMT_LIST, t RBRACE]);
    add(&mut g, ParamListSome, PARAM_LIST, symbols![nt PARAMS]);
    add(&mut g, ParamListEmpty, PARAM_LIST, symbols![]);
    add(&mut g, ParamsMore, PARAMS, symbols![nt PARAMS, t COMMA, nt PARAM]);
    add(&mut g, ParamsOne, PARAMS, symbols![nt PARAM]);
    add(&mut g, Param, PARAM, symbols![nt TYPE, t ID, nt ARRAY_DIMS]);
    add(&mut g, TypeInteger, TYPE, symbols![t INTEGER_KW]);
    add(&mut g, TypeFloat, TYPE, symbols![t FLOAT_KW]);
    add(&mut g, TypeVoid, TYPE, symbols![t VOID]);
    add(&mut g, TypeId, TYPE, symbols![t ID]);
    add(&mut g, ScriptMore, SCRIPT, symbols![nt SCRIPT, nt STMT]);
    add(&mut g, ScriptOne, SCRIPT, symbols![nt STMT]);
    add(&mut g, ScriptMoreError, SCRIPT, symbols![nt SCRIPT, t classlr_core::ERROR_TOKEN, t SEMI]);
    add(&mut g, ScriptError, SCRIPT, symbols![t classlr_core::ERROR_TOKEN, t SEMI]);
    add(&mut g, StmtListMore, STMT_LIST, symbols![nt STMT_LIST, nt STMT]);
    add(&mut g, StmtListEmpty, STMT_LIST, symbols![]);
    add(&mut g, StmtListError, STMT_LIST, symbols![nt STMT_LIST, t classlr_core::ERROR_TOKEN, t SEMI]);
    add(&mut g, StmtListErrorNoSemi, STMT_LIST, symbols![nt STMT_LIST, t classlr_core::ERROR_TOKEN]);
    add(&mut g, StmtExpr, STMT, symbols![nt EXPR_STMT]);
    add(&mut g, StmtAssign, STMT, symbols![nt ASSIGN_STMT]);
    add(&mut g, StmtDecl, STMT, symbols![nt DECL_STMT]);
    add(&mut g, StmtIf, STMT, symbols![nt IF_STMT]);
    add(&mut g, StmtWhile, STMT, symbols![nt WHILE_STMT]);
    add(&mut g, StmtIo, STMT, symbols![nt IO_STMT]);
    add(&mut g, StmtReturn, STMT, symbols![nt RETURN_STMT]);
    add(&mut g, StmtBlock, STMT, symbols![nt BLOCK_STMT]);
    add(&mut g, ExprStmt, EXPR_STMT, symbols![nt EXPR, t SEMI]);
    add(&mut g, AssignColon, ASSIGN_STMT, symbols![nt POSTFIX, t ASSIGN, nt EXPR, t SEMI]);
    add(&mut g, AssignEquals, ASSIGN_STMT, symbols![nt POSTFIX, t EQUALS, nt EXPR, t SEMI]);
    add(&mut g, Decl, DECL_STMT, symbols![nt TYPE, t ID, nt ARRAY_DIMS, t SEMI]);
    add(&mut g, DeclInit, DECL_STMT, symbols![nt TYPE, t ID, nt ARRAY_DIMS, t ASSIGN, nt EXPR, t SEMI]);
    add(&mut g, DeclLocal, DECL_STMT, symbols![t LOCAL, nt TYPE, t ID, nt ARRAY_DIMS, t SEMI]);
    add(&mut g, DeclLocalInit, DECL_STMT, symbols![t LOCAL, nt TYPE, t ID, nt ARRAY_DIMS, t ASSIGN, nt EXPR, t SEMI]);
    add(&mut g, IfThenElse, IF_STMT, symbols![t IF, t LPAREN, nt EXPR, t RPAREN, t THEN, nt STMT, t ELSE, nt STMT]);
    add_prec(&mut g, IfThen, IF_STMT, symbols![t IF, t LPAREN, nt EXPR, t RPAREN, t THEN, nt STMT], NO_ELSE);
    add(&mut g, IfElse, IF_STMT, symbols![t IF, t LPAREN, nt EXPR, t RPAREN, nt STMT, t ELSE, nt STMT]);
    add_prec(&mut g, If, IF_STMT, symbols![t IF, t LPAREN, nt EXPR, t RPAREN, nt STMT], NO_ELSE);
    add(&mut g, While, WHILE_STMT, symbols![t WHILE, t LPAREN, nt EXPR, t RPAREN, nt STMT]);
    add(&mut g, Read, IO_STMT, symbols![t READ, t LPAREN, nt POSTFIX, t RPAREN, t SEMI]);
    add(&mut g, Write, IO_STMT, symbols![t WRITE, t LPAREN, nt EXPR, t RPAREN, t SEMI]);
    add(&mut g, ReturnValue, RETURN_STMT, symbols![t RETURN, nt EXPR, t SEMI]);
    add(&mut g, ReturnVoid, RETURN_STMT, symbols![t RETURN, t SEMI]);
    add(&mut g, Block, BLOCK_STMT, symbols![t LBRACE, nt STMT_LIST, t RBRACE]);
    for (rule, op) in [(Or, OR), (And, AND)] {
        add(&mut g, rule, EXPR, symbols![nt EXPR, t op, nt EXPR]);
    }
    add(&mut g, Not, EXPR, symbols![t NOT, nt EXPR]);
    for (rule, op) in [(Eq, EQ), (Ne, NE), (Lt, LT), (Le, LE), (Gt, GT), (Ge, GE), (Add, PLUS), (Sub, MINUS), (Mul, MULT), (Div, DIV)] {
        add(&mut g, rule, EXPR, symbols![nt EXPR, t op, nt EXPR]);
    }
    add_prec(&mut g, Neg, EXPR, symbols![t MINUS, nt EXPR], UMINUS);
    add(&mut g, ExprPostfix, EXPR, symbols![nt POSTFIX]);
    add(&mut g, PostfixPrimary, POSTFIX, symbols![nt PRIMARY]);
    add(&mut g, Call, POSTFIX, symbols![nt POSTFIX, t LPAREN, nt ARG_LIST, t RPAREN]);
    add(&mut g, Index, POSTFIX, symbols![nt POSTFIX, t LBRACKET, nt EXPR, t RBRACKET]);
    add(&mut g, Member, POSTFIX, symbols![nt POSTFIX, t DOT, t ID]);
    add(&mut g, Scope, POSTFIX, symbols![nt POSTFIX, t SCOPE, t ID]);
    add(&mut g, PrimaryId, PRIMARY, symbols![t ID]);
    add(&mut g, PrimaryInt, PRIMARY, symbols![t INT]);
    add(&mut g, PrimaryFloat, PRIMARY, symbols![t FLOAT]);
    add(&mut g, PrimaryString, PRIMARY, symbols![t STRING]);
    add(&mut g, PrimaryParen, PRIMARY, symbols![t LPAREN, nt EXPR, t RPAREN]);
    add(&mut g, ArgListSome, ARG_LIST, symbols![nt ARGS]);
    add(&mut g, ArgListEmpty, ARG_LIST, symbols![]);
    add(&mut g, ArgsMore, ARGS, symbols![nt ARGS, t COMMA, nt EXPR]);
    add(&mut g, ArgsOne, ARGS, symbols![nt EXPR]);

    g.add_precedence(Assoc::NonAssoc, &[NO_ELSE]);
    g.add_precedence(Assoc::NonAssoc, &[ELSE]);
    g.add_precedence(Assoc::Left, &[OR]);
    g.add_precedence(Assoc::Left, &[AND]);
    g.add_precedence(Assoc::Right, &[NOT]);
    g.add_precedence(Assoc::Left, &[EQ, NE, LT, LE, GT, GE]);
    g.add_precedence(Assoc::Left, &[PLUS, MINUS]);
    g.add_precedence(Assoc::Left, &[MULT, DIV]);
    g.add_precedence(Assoc::Right, &[UMINUS]);
    g
}

// ---------------------------------------------------------------------------------------------

static AUTOMATON: OnceLock<Result<Automaton, BuildError>> = OnceLock::new();

/// Automaton of the class language, built on the first call.
pub fn automaton() -> Result<&'static Automaton, BuildError> {
    AUTOMATON.get_or_init(|| Automaton::build(class_grammar())).as_ref().map_err(|e| e.clone())
}

/// Parsing tables of the class language, built on the first call and shared afterwards.
pub fn tables() -> Result<&'static ParseTables, BuildError> {
    automaton().map(|a| a.get_tables())
}

#[derive(Debug, thiserror::Error)]
pub enum ClassLangError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Parse(#[from] ParserError),
}

/// Scans and parses a source text of the class language.
pub fn parse_source<H: SemanticHooks>(text: &str, hooks: &mut H, config: ParserConfig) -> Result<ParseOutcome<H::Value>, ClassLangError> {
    let tables = tables()?;
    let parser = Parser::with_config(tables, config);
    Ok(parser.parse(Scanner::new(text), hooks)?)
}
