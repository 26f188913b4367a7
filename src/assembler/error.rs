//! Errors raised while assembling. Every error is fatal: the first one
//! aborts the run and no words are returned. Messages leave the line
//! number out; callers read it with [`AssembleError::line`].

/// `line` is always the 1-based line number in the source file.
#[derive(thiserror::Error, Clone, PartialEq, Eq, Debug)]
pub enum AssembleError {
    #[error("`{mnemonic}` expects {expected} token(s), found {found}")]
    MalformedLine {
        line: usize,
        mnemonic: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid instruction `{mnemonic}`")]
    UnknownOpcode { line: usize, mnemonic: String },

    #[error("unknown label `{label}`")]
    UnknownLabel { line: usize, label: String },

    #[error("invalid operands `{first}`, `{second}`: exactly one must be a `#` literal")]
    InvalidOperand {
        line: usize,
        first: String,
        second: String,
    },

    #[error("invalid integer literal `{token}`")]
    InvalidLiteral { line: usize, token: String },
}

impl AssembleError {
    /// The source line the error was raised on.
    pub fn line(&self) -> usize {
        use AssembleError::*;
        match self {
            MalformedLine { line, .. }
            | UnknownOpcode { line, .. }
            | UnknownLabel { line, .. }
            | InvalidOperand { line, .. }
            | InvalidLiteral { line, .. } => *line,
        }
    }
}
