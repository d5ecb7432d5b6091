// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Collects the declarations of a class-language source while it's parsed.

use std::fmt::{Display, Formatter};
use classlr_core::lexer::{Payload, Token};
use classlr_core::log::{BufLog, Logger};
use classlr_core::parser::SemanticHooks;
use crate::grammar::ProdId;
use crate::CollectJoin;
use super::Rule;

/// Semantic value of the symbol collector.
#[derive(Clone, PartialEq, Debug, Default)]
pub enum SymValue {
    #[default]
    None,
    Text(String),
    List(Vec<String>),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl Display for Visibility {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

/// Declared variable, parameter or field. The type includes the array dimensions.
#[derive(Clone, PartialEq, Debug)]
pub struct VarInfo {
    pub name: String,
    pub ty: String,
}

impl Display for VarInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.name, self.ty)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum MemberKind {
    Field(VarInfo),
    Method { name: String, params: Vec<VarInfo>, ret: String, locals: Vec<VarInfo> },
}

#[derive(Clone, PartialEq, Debug)]
pub struct MemberInfo {
    pub visibility: Visibility,
    pub kind: MemberKind,
}

#[derive(Clone, PartialEq, Debug)]
pub struct ClassInfo {
    pub name: String,
    pub parents: Vec<String>,
    pub members: Vec<MemberInfo>,
    /// The closing brace was missing and the declaration was recovered
    pub unclosed: bool,
}

// ---------------------------------------------------------------------------------------------

/// Hooks that record the classes, their members and the variables declared in a source.
///
/// Members and local variables are kept aside until the enclosing class or method is reduced.
/// The ones of a declaration dropped by the error recovery are discarded.
#[derive(Debug, Default)]
pub struct SymbolCollector {
    pub log: BufLog,
    pub classes: Vec<ClassInfo>,
    pub globals: Vec<VarInfo>,
    pub num_release: usize,
    visibility: Visibility,
    members: Vec<MemberInfo>,
    locals: Vec<VarInfo>,
    params: Vec<VarInfo>,
}

fn take_text(children: &mut [SymValue], index: usize) -> String {
    match children.get_mut(index).map(std::mem::take) {
        Some(SymValue::Text(s)) => s,
        _ => String::new(),
    }
}

fn take_list(children: &mut [SymValue], index: usize) -> Vec<String> {
    match children.get_mut(index).map(std::mem::take) {
        Some(SymValue::List(l)) => l,
        _ => Vec::new(),
    }
}

impl SymbolCollector {
    pub fn new() -> Self {
        SymbolCollector::default()
    }

    /// Records a variable from its `type ID array_dims` children, starting at `index`.
    fn var(children: &mut [SymValue], index: usize) -> VarInfo {
        let ty = take_text(children, index);
        let name = take_text(children, index + 1);
        let dims = take_list(children, index + 2);
        VarInfo { name, ty: format!("{ty}{}", dims.concat()) }
    }

    fn add_member(&mut self, kind: MemberKind) {
        self.members.push(MemberInfo { visibility: self.visibility, kind });
    }

    /// Renders the collected symbols, one declaration per line.
    pub fn dump(&self) -> String {
        let mut lines = Vec::new();
        for class in &self.classes {
            let parents = if class.parents.is_empty() { String::new() } else { format!(": {}", class.parents.join(", ")) };
            let unclosed = if class.unclosed { " (unclosed)" } else { "" };
            lines.push(format!("class {}{parents}{unclosed}", class.name));
            for member in &class.members {
                match &member.kind {
                    MemberKind::Field(var) => lines.push(format!("    {} field {var}", member.visibility)),
                    MemberKind::Method { name, params, ret, locals } => {
                        lines.push(format!("    {} method {name}({}): {ret}", member.visibility, params.iter().join(", ")));
                        lines.extend(locals.iter().map(|var| format!("        local {var}")));
                    }
                }
            }
        }
        lines.extend(self.globals.iter().map(|var| format!("global {var}")));
        lines.join("\n")
    }
}

impl SemanticHooks for SymbolCollector {
    type Value = SymValue;

    fn shift(&mut self, token: Token) -> SymValue {
        match token.payload {
            Payload::Ident(s) => SymValue::Text(s),
            Payload::Int(n) => SymValue::Text(n.to_string()),
            _ => SymValue::None,
        }
    }

    fn reduce(&mut self, prod: ProdId, mut children: Vec<SymValue>) -> SymValue {
        let Some(rule) = Rule::from_prod(prod) else {
            self.log.add_error(format!("unknown production {prod}"));
            return SymValue::None;
        };
        let c = children.as_mut_slice();
        match rule {
            Rule::IdListOne => SymValue::List(vec![take_text(c, 0)]),
            Rule::IdListMore => {
                let mut list = take_list(c, 0);
                list.push(take_text(c, 2));
                SymValue::List(list)
            }
            Rule::InheritNone => SymValue::List(vec![]),
            Rule::InheritIsa | Rule::InheritImplement => SymValue::List(take_list(c, 1)),
            Rule::InheritBoth => {
                let mut parents = take_list(c, 1);
                parents.extend(take_list(c, 3));
                SymValue::List(parents)
            }
            Rule::ClassDecl | Rule::ClassDeclUnclosed | Rule::ClassDeclBadHeader => {
                // a bad header has no inheritance list, `take_list` meets the error placeholder
                self.classes.push(ClassInfo {
                    name: take_text(c, 1),
                    parents: take_list(c, 2),
                    members: std::mem::take(&mut self.members),
                    unclosed: rule == Rule::ClassDeclUnclosed,
                });
                self.visibility = Visibility::default();
                self.locals.clear();
                self.params.clear();
                SymValue::None
            }
            Rule::ClassDeclBadName => {
                self.members.clear();
                self.visibility = Visibility::default();
                self.locals.clear();
                self.params.clear();
                SymValue::None
            }
            Rule::VisibilityPublic => {
                self.visibility = Visibility::Public;
                SymValue::None
            }
            Rule::VisibilityPrivate => {
                self.visibility = Visibility::Private;
                SymValue::None
            }
            Rule::MemberError => {
                self.locals.clear();
                self.params.clear();
                SymValue::None
            }
            Rule::Field => {
                let var = Self::var(c, 0);
                self.add_member(MemberKind::Field(var));
                SymValue::None
            }
            Rule::FieldAttribute => {
                let var = Self::var(c, 1);
                self.add_member(MemberKind::Field(var));
                SymValue::None
            }
            Rule::DimsEmpty => SymValue::List(vec![]),
            Rule::DimsInt | Rule::DimsId => {
                let mut dims = take_list(c, 0);
                dims.push(format!("[{}]", take_text(c, 2)));
                SymValue::List(dims)
            }
            Rule::DimsOpen => {
                let mut dims = take_list(c, 0);
                dims.push("[]".to_string());
                SymValue::List(dims)
            }
            Rule::Param => {
                let var = Self::var(c, 0);
                self.params.push(var);
                SymValue::None
            }
            Rule::MethodTyped | Rule::MethodUntyped => {
                let ret = if rule == Rule::MethodTyped { take_text(c, 6) } else { "void".to_string() };
                let kind = MemberKind::Method {
                    name: take_text(c, 1),
                    params: std::mem::take(&mut self.params),
                    ret,
                    locals: std::mem::take(&mut self.locals),
                };
                self.add_member(kind);
                SymValue::None
            }
            Rule::TypeInteger => SymValue::Text("integer".to_string()),
            Rule::TypeFloat => SymValue::Text("float".to_string()),
            Rule::TypeVoid => SymValue::Text("void".to_string()),
            Rule::TypeId => SymValue::Text(take_text(c, 0)),
            Rule::Decl | Rule::DeclInit => {
                let var = Self::var(c, 0);
                self.locals.push(var);
                SymValue::None
            }
            Rule::DeclLocal | Rule::DeclLocalInit => {
                let var = Self::var(c, 1);
                self.locals.push(var);
                SymValue::None
            }
            Rule::ProgramScript => {
                self.globals = std::mem::take(&mut self.locals);
                SymValue::None
            }
            _ => SymValue::None,
        }
    }

    fn placeholder(&mut self) -> SymValue {
        SymValue::None
    }

    fn release(&mut self, _value: SymValue) {
        self.num_release += 1;
    }

    fn get_mut_log(&mut self) -> &mut impl Logger {
        &mut self.log
    }
}
