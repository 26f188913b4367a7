//! This lexer splits Baby assembly into token lines.
//!
//! Tokens are not classified here. A line is just the
//! whitespace-delimited words that survive comment stripping;
//! deciding what they mean is the job of the later passes.

/// One source line that survived comment stripping.
/// `line` is the 1-based line number in the source file.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TokenLine {
    pub tokens: Vec<String>,
    pub line: usize,
}

impl TokenLine {
    pub fn new(tokens: Vec<String>, line: usize) -> Self {
        TokenLine { tokens, line }
    }

    /// The first token on the line, if any.
    pub fn head(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }
}

/// Tokenize an entire source file, one entry per non-empty line.
/// Blank and comment-only lines produce nothing.
pub fn tokenize(source: &str) -> Vec<TokenLine> {
    let lines: Vec<TokenLine> = source
        .lines()
        .enumerate()
        .filter_map(|(index, line)| tokenize_line(line, index + 1))
        .collect();

    debug!("Tokenized {} instruction line(s).", lines.len());
    lines
}

fn tokenize_line(line: &str, line_num: usize) -> Option<TokenLine> {
    // Whole-line comment.
    if line.is_empty() || line.starts_with(';') {
        return None;
    }

    let code = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let tokens: Vec<String> = code.split_whitespace().map(str::to_owned).collect();
    if tokens.is_empty() {
        None
    } else {
        Some(TokenLine::new(tokens, line_num))
    }
}
