//! This AST describes the statements of a Baby assembly file.
//!
//! Each line holds at most one statement and may be prefixed by a
//! label. Comments are prefixed with semicolons (;) and are
//! single-line only.
//!
//! Supported Instructions:
//!
//! ```nasm
//! JMP  L    ; 0  jump to the address held at L
//! JRP  L    ; 1  relative jump by the value held at L
//! LDN  L    ; 2  load the negated value at L
//! STO  L    ; 3  store the accumulator to L
//! SUB  L    ; 4  subtract the value at L
//! SUB_1 L   ; 5  alternate encoding of SUB
//! CMP  L    ; 6  skip the next instruction if the accumulator is negative
//! STP       ; 7  halt
//! ADD  L    ; 8
//! MTP  L    ; 9  multiply
//! DIV  L    ; 10
//! MOD  L    ; 11
//! SQR  L    ; 12 square
//! LDP  L    ; 13 load the positive value at L
//! MOV #n L  ; 14 move an immediate into L (the operands may be swapped)
//! AND  L    ; 15
//! OR   L    ; 16
//! NOT  L    ; 17
//! XOR  L    ; 18
//! ```
//!
//! `VAR n` is not an instruction; it reserves one word holding `n`.
//!
//! Example source file:
//!
//! ```nasm
//! START: LDN NUM   ; labels end with a colon
//!        MOV #-3 TMP
//!        STO NUM
//!        STP
//! NUM:   VAR 10
//! TMP:   VAR 0
//! ```

use std::convert::TryFrom;
use std::fmt;

/// The directive reserving a data word.
pub const DATA_DIRECTIVE: &str = "VAR";

/// Marks an operand as an immediate literal.
pub const LITERAL_MARKER: char = '#';

/// Ends a label declaration.
pub const LABEL_SUFFIX: char = ':';

#[allow(non_camel_case_types)]
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Opcode {
    JMP,
    JRP,
    LDN,
    STO,
    SUB,
    SUB_1,
    CMP,
    STP,
    ADD,
    MTP,
    DIV,
    MOD,
    SQR,
    LDP,
    MOV,
    AND,
    OR,
    NOT,
    XOR,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl TryFrom<&str> for Opcode {
    type Error = String;

    fn try_from(mnemonic: &str) -> Result<Self, Self::Error> {
        use Opcode::*;
        match mnemonic {
            "JMP"   => Ok(JMP),
            "JRP"   => Ok(JRP),
            "LDN"   => Ok(LDN),
            "STO"   => Ok(STO),
            "SUB"   => Ok(SUB),
            "SUB_1" => Ok(SUB_1),
            "CMP"   => Ok(CMP),
            "STP"   => Ok(STP),
            "ADD"   => Ok(ADD),
            "MTP"   => Ok(MTP),
            "DIV"   => Ok(DIV),
            "MOD"   => Ok(MOD),
            "SQR"   => Ok(SQR),
            "LDP"   => Ok(LDP),
            "MOV"   => Ok(MOV),
            "AND"   => Ok(AND),
            "OR"    => Ok(OR),
            "NOT"   => Ok(NOT),
            "XOR"   => Ok(XOR),
            _ => Err(format!("unknown mnemonic `{}`", mnemonic)),
        }
    }
}

impl Opcode {
    /// Returns the 5-bit code of the instruction.
    pub fn code(&self) -> u8 {
        use Opcode::*;
        match self {
            JMP   => 0,
            JRP   => 1,
            LDN   => 2,
            STO   => 3,
            SUB   => 4,
            SUB_1 => 5,
            CMP   => 6,
            STP   => 7,
            ADD   => 8,
            MTP   => 9,
            DIV   => 10,
            MOD   => 11,
            SQR   => 12,
            LDP   => 13,
            MOV   => 14,
            AND   => 15,
            OR    => 16,
            NOT   => 17,
            XOR   => 18,
        }
    }

    /// Number of words this instruction occupies. MOV carries its
    /// immediate in a trailing word.
    pub fn width(&self) -> u32 {
        match self {
            Opcode::MOV => 2,
            _ => 1,
        }
    }
}

/// Number of words a token line (labels already stripped) occupies.
///
/// Both the symbol pass and the encoder size lines through this
/// function. Lines whose head is not a known mnemonic are counted as
/// one word; the encoder rejects them before any address matters.
pub fn line_width(tokens: &[String]) -> u32 {
    match tokens.first().map(String::as_str) {
        None => 0,
        Some(DATA_DIRECTIVE) => 1,
        Some(head) => Opcode::try_from(head).map(|op| op.width()).unwrap_or(1),
    }
}
