// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

//! Command-line syntax checker of the class language.
//!
//! ```text
//! classlr [--max-depth N] [--tree] [--no-dump] FILE
//! ```
//!
//! Exit codes: 0 if the file was parsed without error, 1 for a usage or I/O error, 2 if syntax
//! errors were found, 3 if the parser stack was exhausted or the parser couldn't be built.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use clap::error::ErrorKind;
use clap::Parser as ClapParser;
use classlr::build::BuildError;
use classlr::class_lang::symbols::{SymValue, SymbolCollector};
use classlr::class_lang::{parse_source, tables, ClassLangError};
use classlr::lexer::Token;
use classlr::log::{LogStatus, Logger};
use classlr::parser::{ParseNode, ParserConfig, ParserError, SemanticHooks, TreeBuilder};
use classlr::ProdId;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Syntax checker for the class language.
#[derive(ClapParser, Debug)]
#[command(name = "classlr", version, about = "Syntax checker for the class language")]
pub struct Cli {
    /// Path to the source file
    pub file: PathBuf,

    /// Maximum depth of the parser stack
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Print the parse tree
    #[arg(long)]
    pub tree: bool,

    /// Don't print the symbol table
    #[arg(long)]
    pub no_dump: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ExeError {
    #[error("{0}")]
    Usage(String),
    #[error("cannot read '{path}': {source}")]
    Read { path: String, source: std::io::Error },
    #[error("output error: {0}")]
    Output(#[from] std::io::Error),
    #[error("{0} syntax error(s)")]
    Syntax(u32),
    #[error("irrecoverable syntax error")]
    Irrecoverable,
    #[error(transparent)]
    Parse(ParserError),
    #[error("cannot build the parser:\n{0}")]
    Build(BuildError),
}

impl ExeError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ExeError::Usage(_) | ExeError::Read { .. } | ExeError::Output(_) => 1,
            ExeError::Syntax(_) | ExeError::Irrecoverable => 2,
            ExeError::Parse(_) | ExeError::Build(_) => 3,
        }
    }
}

impl From<ClassLangError> for ExeError {
    fn from(e: ClassLangError) -> Self {
        match e {
            ClassLangError::Build(e) => ExeError::Build(e),
            ClassLangError::Parse(e) => ExeError::Parse(e),
        }
    }
}

// ---------------------------------------------------------------------------------------------

/// Collects the symbols and, optionally, builds the parse tree in the same pass.
struct CliHooks {
    tree: Option<TreeBuilder>,
    symbols: SymbolCollector,
}

impl SemanticHooks for CliHooks {
    type Value = (Option<ParseNode>, SymValue);

    fn shift(&mut self, token: Token) -> Self::Value {
        let node = self.tree.as_mut().map(|t| t.shift(token.clone()));
        (node, self.symbols.shift(token))
    }

    fn reduce(&mut self, prod: ProdId, children: Vec<Self::Value>) -> Self::Value {
        let (nodes, values): (Vec<_>, Vec<_>) = children.into_iter().unzip();
        let node = self.tree.as_mut().map(|t| t.reduce(prod, nodes.into_iter().flatten().collect()));
        (node, self.symbols.reduce(prod, values))
    }

    fn placeholder(&mut self) -> Self::Value {
        (self.tree.as_mut().map(|t| t.placeholder()), self.symbols.placeholder())
    }

    fn release(&mut self, (node, value): Self::Value) {
        if let (Some(tree), Some(node)) = (self.tree.as_mut(), node) {
            tree.release(node);
        }
        self.symbols.release(value);
    }

    fn discard(&mut self, token: Token) {
        self.symbols.discard(token);
    }

    fn get_mut_log(&mut self) -> &mut impl Logger {
        &mut self.symbols.log
    }
}

// ---------------------------------------------------------------------------------------------

/// Runs the command line `args`, where the first argument is the program name, and returns
/// the exit code.
pub fn run<I, T, O, E>(args: I, out: &mut O, err: &mut E) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    O: Write,
    E: Write,
{
    match execute(args, out, err) {
        Ok(()) => 0,
        Err(e) => {
            // syntax errors have already been reported
            if !matches!(e, ExeError::Syntax(_) | ExeError::Irrecoverable) {
                let _ = writeln!(err, "{e}");
            }
            e.exit_code()
        }
    }
}

fn execute<I, T, O, E>(args: I, out: &mut O, err: &mut E) -> Result<(), ExeError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    O: Write,
    E: Write,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(out, "{e}")?;
            return Ok(());
        }
        Err(e) => return Err(ExeError::Usage(e.to_string())),
    };
    let path = cli.file.display().to_string();
    let text = std::fs::read_to_string(&cli.file).map_err(|source| ExeError::Read { path: path.clone(), source })?;
    let mut config = ParserConfig::default();
    if let Some(max_depth) = cli.max_depth {
        config = config.with_max_depth(max_depth);
    }
    let mut hooks = CliHooks { tree: cli.tree.then(TreeBuilder::new), symbols: SymbolCollector::new() };

    writeln!(out, "classlr {VERSION}: parsing {path}")?;
    let result = parse_source(&text, &mut hooks, config);
    for msg in hooks.symbols.log.get_messages() {
        writeln!(err, "{msg}")?;
    }
    let result = match result {
        Ok(outcome) => {
            writeln!(out, "{}", if outcome.is_success() { "success" } else { "failure" })?;
            if let (Some((Some(node), _)), Ok(tables)) = (&outcome.value, tables()) {
                writeln!(out, "{}", node.to_sexpr(tables))?;
            }
            if !outcome.accepted {
                Err(ExeError::Irrecoverable)
            } else if outcome.error_count > 0 {
                Err(ExeError::Syntax(outcome.error_count))
            } else {
                Ok(())
            }
        }
        Err(e) => {
            writeln!(out, "failure")?;
            Err(e.into())
        }
    };
    if !cli.no_dump {
        let dump = hooks.symbols.dump();
        if !dump.is_empty() {
            writeln!(out, "{dump}")?;
        }
    }
    if hooks.symbols.log.num_errors() > 0 {
        writeln!(err, "{} error(s)", hooks.symbols.log.num_errors())?;
    }
    result
}
