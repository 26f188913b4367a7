//! The symbol pass. Walks the token lines once, binding every label
//! to the word address of the statement it annotates.
use std::collections::BTreeMap;

use super::ast::{line_width, LABEL_SUFFIX};
use super::lexer::TokenLine;

/// Label name to word address. Sorted so listings are stable.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SymbolTable {
    entries: BTreeMap<String, u32>,
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable::default()
    }

    /// Bind `label` to `address`. A label defined twice keeps the
    /// later address; the earlier one is returned.
    pub fn define(&mut self, label: &str, address: u32) -> Option<u32> {
        self.entries.insert(label.to_owned(), address)
    }

    pub fn resolve(&self, label: &str) -> Option<u32> {
        self.entries.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Result of the symbol pass.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SymbolPass {
    /// The input lines with leading label tokens removed. Lines that
    /// held nothing but a label are dropped.
    pub lines: Vec<TokenLine>,
    pub symbols: SymbolTable,
    /// Total number of words the program occupies.
    pub word_count: u32,
}

/// Run the symbol pass over tokenized source.
pub fn build(lines: Vec<TokenLine>) -> SymbolPass {
    let mut symbols = SymbolTable::new();
    let mut stripped = Vec::with_capacity(lines.len());
    let mut address: u32 = 0;

    for TokenLine { mut tokens, line } in lines {
        if let Some(label) = tokens.first().and_then(|t| t.strip_suffix(LABEL_SUFFIX)) {
            if let Some(previous) = symbols.define(label, address) {
                warn!("line {}: label `{}` redefined ({} -> {})", line, label, previous, address);
            } else {
                debug!("line {}: label `{}` = {}", line, label, address);
            }
            tokens.remove(0);
        }

        address += line_width(&tokens);

        if !tokens.is_empty() {
            stripped.push(TokenLine::new(tokens, line));
        }
    }

    info!("Symbol pass: {} label(s), {} word(s).", symbols.len(), address);

    SymbolPass {
        lines: stripped,
        symbols,
        word_count: address,
    }
}
