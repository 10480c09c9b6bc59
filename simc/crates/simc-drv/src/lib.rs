//! simc-drv - the `simc` command-line driver
//!
//! Wires the lexer, parser, and generator together (§4.5): lex the main
//! file, discover and lex its imported modules into the same symbol table,
//! parse every module first so their function signatures are visible to
//! the main file, prune module functions nothing ever called, then
//! generate a `.c` file for main and a `.h` file per surviving module.
//!
//! This crate is a library on purpose: everything here returns a
//! `Result<_, DriverError>` instead of exiting, so `main.rs` is the only
//! place that ever terminates the process.

mod error;

pub use error::{DriverError, Result};

use std::path::{Path, PathBuf};

use simc_gen::Generator;
use simc_lex::Token;
use simc_par::{Op, OpCode, Parser};
use simc_util::{IndexMap, SymbolTable};
use tracing::{debug, info, instrument};

/// What the CLI's optional positional dump-mode argument selects (§6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpMode {
    Tokens,
    Opcodes,
    TableAfterLexing,
    TableAfterParsing,
}

impl DumpMode {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "token" => Some(Self::Tokens),
            "opcode" => Some(Self::Opcodes),
            "table_after_lexing" => Some(Self::TableAfterLexing),
            "table_after_parsing" => Some(Self::TableAfterParsing),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub source: PathBuf,
    pub dump_mode: Option<DumpMode>,
    pub verbose: bool,
}

impl Config {
    /// Validates the `.simc` extension requirement (§6) up front, before
    /// any file I/O.
    pub fn new(source: PathBuf, dump_mode: Option<DumpMode>, verbose: bool) -> Result<Self> {
        if source.extension().and_then(|e| e.to_str()) != Some("simc") {
            return Err(DriverError::BadExtension(source));
        }
        Ok(Self { source, dump_mode, verbose })
    }
}

/// §3's module registry: module name (the import's `<name>`, taken from
/// its source file's stem) to source path, token stream, and opcode
/// stream. `IndexMap` preserves insertion order so generated-function
/// order in each `.h` matches the order the main file first imported it
/// (§6), and keying by name rather than path collapses the same module
/// being imported more than once into a single entry.
struct ModuleRecord {
    path: PathBuf,
    tokens: Vec<Token>,
    ops: Vec<Op>,
}

/// Runs the full pipeline for `config` and returns the message the CLI
/// should print on success (§6) — a dump-mode text blob, or the
/// `C code generated at <path>!` line.
#[instrument(skip_all, fields(source = %config.source.display()))]
pub fn run(config: &Config) -> Result<String> {
    let module_dir = config.source.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    let mut symbols = SymbolTable::new();

    info!("lexing main file");
    let main_source = read_file(&config.source)?;
    let (main_tokens, module_paths) = simc_lex::lex_file(&main_source, &module_dir, &mut symbols)?;

    let mut modules: IndexMap<String, ModuleRecord> = IndexMap::new();
    for path in &module_paths {
        let name = module_name(path);
        if modules.contains_key(&name) {
            debug!(module = %name, "already imported, skipping duplicate import");
            continue;
        }
        debug!(module = %path.display(), "lexing module");
        let source = read_file(path)?;
        let (tokens, nested) = simc_lex::lex_file(&source, &module_dir, &mut symbols)?;
        if !nested.is_empty() {
            debug!(module = %path.display(), "transitive imports from a module are not followed");
        }
        modules.insert(name, ModuleRecord { path: path.clone(), tokens, ops: Vec::new() });
    }

    if config.dump_mode == Some(DumpMode::Tokens) {
        return Ok(dump_tokens(&main_tokens, &modules));
    }
    if config.dump_mode == Some(DumpMode::TableAfterLexing) {
        return Ok(dump_table(&symbols));
    }

    for record in modules.values_mut() {
        info!(module = %record.path.display(), "parsing module");
        let tokens = std::mem::take(&mut record.tokens);
        record.ops = Parser::new(tokens, &mut symbols).parse()?;
    }
    info!("parsing main file");
    let main_ops = Parser::new(main_tokens, &mut symbols).parse()?;

    if config.dump_mode == Some(DumpMode::Opcodes) {
        return Ok(dump_opcodes(&main_ops, &modules));
    }
    if config.dump_mode == Some(DumpMode::TableAfterParsing) {
        return Ok(dump_table(&symbols));
    }

    for record in modules.values_mut() {
        prune_unused_functions(record, &symbols);
    }

    info!("generating code");
    let output_path = config.source.with_extension("c");
    let main_c = Generator::new(&symbols).generate(&main_ops)?;
    write_file(&output_path, &main_c)?;

    for record in modules.values() {
        let header_path = record.path.with_extension("h");
        let header = Generator::new(&symbols).generate(&record.ops)?;
        write_file(&header_path, &header)?;
    }

    Ok(format!("C code generated at {}!", output_path.display()))
}

/// The `<name>` in `import <name>` is the file stem; used as the module
/// registry's key (§3).
fn module_name(path: &Path) -> String {
    path.file_stem().and_then(|s| s.to_str()).unwrap_or_default().to_string()
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| DriverError::Io { path: path.to_path_buf(), source })
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents).map_err(|source| DriverError::Io { path: path.to_path_buf(), source })
}

fn dump_tokens(main_tokens: &[Token], modules: &IndexMap<String, ModuleRecord>) -> String {
    let mut out = format!("{main_tokens:#?}");
    for record in modules.values() {
        out.push_str(&format!("\n-- {} --\n{:#?}", record.path.display(), record.tokens));
    }
    out
}

fn dump_opcodes(main_ops: &[Op], modules: &IndexMap<String, ModuleRecord>) -> String {
    let mut out = format!("{main_ops:#?}");
    for record in modules.values() {
        out.push_str(&format!("\n-- {} --\n{:#?}", record.path.display(), record.ops));
    }
    out
}

fn dump_table(symbols: &SymbolTable) -> String {
    symbols
        .iter()
        .map(|(id, entry)| format!("{}\t{:?}\t{:?}\t{:?}", id.0, entry.value, entry.datatype, entry.meta))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Drops every `func_decl ... scope_over` span from `record` whose
/// function's return type was never resolved to a concrete C type — i.e.
/// the function was never called (§4.5 phase 4). A function's call sites
/// widen its return type via the same `resolve_from` mechanism member
/// access uses, so "actually used" (§3's module-registry field) falls out
/// of the symbol table directly rather than needing a separate tracked
/// set of names.
fn prune_unused_functions(record: &mut ModuleRecord, symbols: &SymbolTable) {
    let mut kept = Vec::with_capacity(record.ops.len());
    let mut i = 0;
    while i < record.ops.len() {
        if let OpCode::FuncDecl { name, .. } = &record.ops[i].code {
            let unused = !symbols.get(*name).datatype.is_known();
            let scope_over = matching_scope_over(&record.ops, i + 1);
            if unused {
                i = scope_over + 1;
                continue;
            }
        }
        kept.push(record.ops[i].clone());
        i += 1;
    }
    record.ops = kept;
}

/// `ops[start]` must be the `ScopeBegin` immediately following a
/// `func_decl`; returns the index of the `ScopeOver` that closes it,
/// accounting for any control-flow bodies nested inside.
fn matching_scope_over(ops: &[Op], start: usize) -> usize {
    let mut depth = 0i32;
    let mut i = start;
    loop {
        match &ops[i].code {
            OpCode::ScopeBegin => depth += 1,
            OpCode::ScopeOver => {
                depth -= 1;
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
        i += 1;
    }
}
