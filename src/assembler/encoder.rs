//! The Encoder takes the label-free token lines from the symbol pass
//! and turns them into machine words.
use std::convert::TryFrom;

use regex::Regex;

use super::ast::{line_width, Opcode, DATA_DIRECTIVE, LITERAL_MARKER};
use super::bits::{to_bits, Word, ADDRESS_BITS, OPCODE_BITS, OPCODE_SHIFT};
use super::error::AssembleError;
use super::lexer::TokenLine;
use super::symbols::SymbolTable;

pub struct Encoder<'a> {
    symbols: &'a SymbolTable,
    literal: Regex,
    words: Vec<Word>,
}

impl<'a> Encoder<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Encoder {
            symbols,
            literal: Regex::new(r"^-?[0-9]+$").expect("literal pattern is valid"),
            words: Vec::new(),
        }
    }

    /// Run the encoder, consuming itself and returning the program.
    /// Stops at the first error.
    pub fn run(mut self, lines: &[TokenLine]) -> Result<Vec<Word>, AssembleError> {
        for line in lines {
            let before = self.words.len();
            self.statement(line)?;

            debug!("line {}: {} => {} word(s)",
                line.line, line.tokens.join(" "), self.words.len() - before);
            debug_assert_eq!((self.words.len() - before) as u32, line_width(&line.tokens));
        }

        info!("Encoded {} word(s).", self.words.len());
        Ok(self.words)
    }

    /// Encodes a single token line, appending its words.
    fn statement(&mut self, line: &TokenLine) -> Result<(), AssembleError> {
        let mnemonic = match line.head() {
            Some(m) => m,
            None => return Ok(()),
        };

        if mnemonic == DATA_DIRECTIVE {
            expect_tokens(line, 2)?;
            let value = self.integer(&line.tokens[1], line.line)?;
            self.words.push(Word::literal(value));
            return Ok(());
        }

        // Everything but halt and move takes a single label operand.
        if mnemonic != "STP" && mnemonic != "MOV" {
            expect_tokens(line, 2)?;
        }

        let op = Opcode::try_from(mnemonic).map_err(|_| AssembleError::UnknownOpcode {
            line: line.line,
            mnemonic: mnemonic.to_owned(),
        })?;

        match op {
            // Halt takes no operand; anything after it is ignored.
            Opcode::STP => self.words.push(instruction(op, 0)),

            Opcode::MOV => {
                expect_tokens(line, 3)?;
                let (first, second) = (&line.tokens[1], &line.tokens[2]);

                let (label, immediate) = match (
                    first.strip_prefix(LITERAL_MARKER),
                    second.strip_prefix(LITERAL_MARKER),
                ) {
                    (Some(imm), None) => (second, imm),
                    (None, Some(imm)) => (first, imm),
                    _ => {
                        return Err(AssembleError::InvalidOperand {
                            line: line.line,
                            first: first.clone(),
                            second: second.clone(),
                        })
                    }
                };

                let address = self.address(label, line.line)?;
                let value = self.integer(immediate, line.line)?;
                self.words.push(instruction(op, address));
                self.words.push(Word::literal(value));
            }

            _ => {
                let address = self.address(&line.tokens[1], line.line)?;
                self.words.push(instruction(op, address));
            }
        }

        Ok(())
    }

    /// Resolves a label operand through the symbol table.
    fn address(&self, label: &str, line: usize) -> Result<u32, AssembleError> {
        let address = self.symbols.resolve(label).ok_or_else(|| AssembleError::UnknownLabel {
            line,
            label: label.to_owned(),
        })?;

        if address >= 1 << ADDRESS_BITS {
            warn!("line {}: address {} of `{}` does not fit in {} bits",
                line, address, label, ADDRESS_BITS);
        }
        Ok(address)
    }

    /// Parses a signed decimal literal.
    fn integer(&self, token: &str, line: usize) -> Result<i32, AssembleError> {
        let invalid = || AssembleError::InvalidLiteral {
            line,
            token: token.to_owned(),
        };

        if !self.literal.is_match(token) {
            return Err(invalid());
        }
        token.parse::<i32>().map_err(|_| invalid())
    }
}

/// Builds an instruction word. The halt opcode always gets a zero
/// address field.
fn instruction(op: Opcode, address: u32) -> Word {
    let address = if op == Opcode::STP { 0 } else { address };
    Word::default()
        .with_field(0, ADDRESS_BITS, &to_bits(address as i64, ADDRESS_BITS))
        .with_field(OPCODE_SHIFT, OPCODE_BITS, &to_bits(op.code() as i64, OPCODE_BITS))
}

fn expect_tokens(line: &TokenLine, expected: usize) -> Result<(), AssembleError> {
    if line.tokens.len() == expected {
        Ok(())
    } else {
        Err(AssembleError::MalformedLine {
            line: line.line,
            mnemonic: line.head().unwrap_or_default().to_owned(),
            expected,
            found: line.tokens.len(),
        })
    }
}
