//! The Assembler module is in charge of taking a
//! Baby assembly file and producing a Vec<Word>.
//!
//! It does this in two passes over tokenized lines: the
//! symbol pass binds labels to word addresses, then the
//! encoder emits words, resolving labels through the table.

pub mod ast;
pub mod bits;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod symbols;

pub use self::bits::Word;
pub use self::error::AssembleError;
pub use self::lexer::TokenLine;
pub use self::symbols::SymbolTable;

/// A finished assembly run, keeping the intermediate tables around
/// for listings.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Assembly {
    /// Token lines with labels stripped, in source order.
    pub lines: Vec<TokenLine>,
    pub symbols: SymbolTable,
    pub words: Vec<Word>,
}

impl Assembly {
    pub fn from_source(source: &str) -> Result<Self, AssembleError> {
        let pass = symbols::build(lexer::tokenize(source));
        let words = encoder::Encoder::new(&pass.symbols).run(&pass.lines)?;

        debug_assert_eq!(words.len() as u32, pass.word_count);

        Ok(Assembly {
            lines: pass.lines,
            symbols: pass.symbols,
            words,
        })
    }

    /// Pairs every token line with the words it produced.
    pub fn listing(&self) -> Vec<(&TokenLine, &[Word])> {
        let mut out = Vec::with_capacity(self.lines.len());
        let mut next = 0;
        for line in &self.lines {
            let width = ast::line_width(&line.tokens) as usize;
            let end = (next + width).min(self.words.len());
            out.push((line, &self.words[next..end]));
            next = end;
        }
        out
    }
}

/// Assemble a source file into machine words.
pub fn assemble(source: &str) -> Result<Vec<Word>, AssembleError> {
    Assembly::from_source(source).map(|a| a.words)
}
