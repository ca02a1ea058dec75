//! Lexer (tokenizer) for the validated C++ subset
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! Scanning is line oriented: every physical line is matched independently
//! against an ordered list of rules, so no token spans a newline. A block
//! comment that is not closed on its own line is therefore not recognized as a
//! comment; its `/` and `*` come out as operators.
//!
//! Rule order (first match wins):
//!
//! ```text
//! whitespace → // comment → /* comment */ → #directive → 'char' → "string"
//! → float → integer → true/false → operator (longest first) → separator
//! → identifier/keyword → unknown
//! ```
//!
//! Comments and preprocessor lines are kept in the stream; the parser treats
//! them as trivia.

use super::ast::SourceLocation;
use std::fmt;

/// Reserved words; identifiers matching one of these become [`TokenKind::Keyword`]
pub const KEYWORDS: &[&str] = &[
    // Types
    "char", "int", "float", "double", "bool", "long", "short", "string",
    // Loops
    "for", "while", "do",
    // Control flow
    "return", "if", "else", "break", "switch", "case", "default",
];

/// Operators, longest first so that `++` is never split into two `+`
const MULTI_CHAR_OPERATORS: &[&str] = &[
    "--", "++", "==", "!=", "<=", ">=", "&&", "||", "<<", ">>", "->", "::",
];

const SINGLE_CHAR_OPERATORS: &str = "+-*/%=&|^~!<>?:.";

const SEPARATORS: &str = "(){}[];,";

/// Flavour of a literal token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Float,
    Char,
    String,
    Bool,
}

/// Token classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    Literal(LiteralKind),
    Operator,
    Separator,
    Comment,
    Preprocessor,
    Unknown,
}

impl TokenKind {
    /// Comments and preprocessor lines carry no grammar meaning
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Preprocessor)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Literal(_) => "LITERAL",
            TokenKind::Operator => "OPERATOR",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::Comment => "COMMENT",
            TokenKind::Preprocessor => "PREPROCESSOR",
            TokenKind::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// A classified lexeme with its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Token {
            kind,
            text: text.into(),
            location,
        }
    }

    /// True for a keyword, operator or separator spelled exactly `text`
    pub fn is(&self, text: &str) -> bool {
        matches!(
            self.kind,
            TokenKind::Keyword | TokenKind::Operator | TokenKind::Separator
        ) && self.text == text
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.kind, self.text)
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexical error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

/// Tokenize `source`, failing on the first character no rule accepts.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Line-oriented lexer
pub struct Lexer {
    lines: Vec<Vec<char>>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            lines: input.split('\n').map(|line| line.chars().collect()).collect(),
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        for (index, line) in self.lines.iter().enumerate() {
            let line_number = index + 1;
            let mut pos = 0;

            while pos < line.len() {
                let location = SourceLocation::new(line_number, pos + 1);
                let (kind, end) = Self::next_token(line, pos);

                if let Some(kind) = kind {
                    let text: String = line[pos..end].iter().collect();
                    if kind == TokenKind::Unknown {
                        return Err(LexError {
                            message: format!("Unknown token '{}'", text),
                            location,
                        });
                    }
                    tokens.push(Token::new(kind, text, location));
                }

                pos = end;
            }
        }

        Ok(tokens)
    }

    /// Match the rule list at `pos`; `None` kind means discarded whitespace.
    /// The returned end index is always past `pos`.
    fn next_token(line: &[char], pos: usize) -> (Option<TokenKind>, usize) {
        if let Some(end) = whitespace(line, pos) {
            return (None, end);
        }
        if let Some(end) = line_comment(line, pos).or_else(|| block_comment(line, pos)) {
            return (Some(TokenKind::Comment), end);
        }
        if let Some(end) = preprocessor(line, pos) {
            return (Some(TokenKind::Preprocessor), end);
        }
        if let Some(end) = quoted(line, pos, '\'', 1) {
            return (Some(TokenKind::Literal(LiteralKind::Char)), end);
        }
        if let Some(end) = quoted(line, pos, '"', 0) {
            return (Some(TokenKind::Literal(LiteralKind::String)), end);
        }
        if let Some(end) = float_literal(line, pos) {
            return (Some(TokenKind::Literal(LiteralKind::Float)), end);
        }
        if let Some(end) = integer_literal(line, pos) {
            return (Some(TokenKind::Literal(LiteralKind::Integer)), end);
        }
        if let Some(end) = bool_literal(line, pos) {
            return (Some(TokenKind::Literal(LiteralKind::Bool)), end);
        }
        if let Some(end) = operator(line, pos) {
            return (Some(TokenKind::Operator), end);
        }
        if SEPARATORS.contains(line[pos]) {
            return (Some(TokenKind::Separator), pos + 1);
        }
        if let Some(end) = identifier(line, pos) {
            let word: String = line[pos..end].iter().collect();
            let kind = if KEYWORDS.contains(&word.as_str()) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            return (Some(kind), end);
        }

        (Some(TokenKind::Unknown), pos + 1)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn starts_with(line: &[char], pos: usize, pattern: &str) -> bool {
    let mut i = pos;
    for expected in pattern.chars() {
        if line.get(i) != Some(&expected) {
            return false;
        }
        i += 1;
    }
    true
}

fn digits_end(line: &[char], pos: usize) -> usize {
    let mut end = pos;
    while end < line.len() && line[end].is_ascii_digit() {
        end += 1;
    }
    end
}

fn whitespace(line: &[char], pos: usize) -> Option<usize> {
    let mut end = pos;
    while end < line.len() && matches!(line[end], ' ' | '\t' | '\r' | '\x0c') {
        end += 1;
    }
    (end > pos).then_some(end)
}

fn line_comment(line: &[char], pos: usize) -> Option<usize> {
    starts_with(line, pos, "//").then_some(line.len())
}

/// `/* ... */` closed on the same line
fn block_comment(line: &[char], pos: usize) -> Option<usize> {
    if !starts_with(line, pos, "/*") {
        return None;
    }
    (pos + 2..line.len().saturating_sub(1))
        .find(|&i| line[i] == '*' && line[i + 1] == '/')
        .map(|i| i + 2)
}

/// `#` followed by a word, up to the end of the line
fn preprocessor(line: &[char], pos: usize) -> Option<usize> {
    (line[pos] == '#' && line.get(pos + 1).is_some_and(|&c| is_word_char(c))).then_some(line.len())
}

/// A `quote`-delimited run of plain characters and `\x` escapes with at
/// least `min_len` elements.
fn quoted(line: &[char], pos: usize, quote: char, min_len: usize) -> Option<usize> {
    if line[pos] != quote {
        return None;
    }
    let mut i = pos + 1;
    let mut count = 0;
    while i < line.len() {
        match line[i] {
            c if c == quote => {
                return (count >= min_len).then_some(i + 1);
            }
            '\\' => {
                if i + 1 >= line.len() {
                    return None;
                }
                i += 2;
            }
            _ => i += 1,
        }
        count += 1;
    }
    None
}

/// Optional `[eE][+-]?digits` suffix starting at `pos`
fn exponent(line: &[char], pos: usize) -> Option<usize> {
    if !matches!(line.get(pos), Some('e') | Some('E')) {
        return None;
    }
    let mut i = pos + 1;
    if matches!(line.get(i), Some('+') | Some('-')) {
        i += 1;
    }
    let end = digits_end(line, i);
    (end > i).then_some(end)
}

/// `1.5`, `1.`, `1.5e3`, `.5`, `.5e-2`, `1e9`
fn float_literal(line: &[char], pos: usize) -> Option<usize> {
    let int_end = digits_end(line, pos);

    if int_end > pos {
        if line.get(int_end) == Some(&'.') {
            let frac_end = digits_end(line, int_end + 1);
            return Some(exponent(line, frac_end).unwrap_or(frac_end));
        }
        return exponent(line, int_end);
    }

    if line[pos] == '.' {
        let frac_end = digits_end(line, pos + 1);
        if frac_end > pos + 1 {
            return Some(exponent(line, frac_end).unwrap_or(frac_end));
        }
    }

    None
}

/// Hex (`0x1F`) or decimal
fn integer_literal(line: &[char], pos: usize) -> Option<usize> {
    if line[pos] == '0' && matches!(line.get(pos + 1), Some('x') | Some('X')) {
        let mut end = pos + 2;
        while end < line.len() && line[end].is_ascii_hexdigit() {
            end += 1;
        }
        if end > pos + 2 {
            return Some(end);
        }
    }
    let end = digits_end(line, pos);
    (end > pos).then_some(end)
}

/// `true` / `false` as whole words
fn bool_literal(line: &[char], pos: usize) -> Option<usize> {
    if pos > 0 && is_word_char(line[pos - 1]) {
        return None;
    }
    ["true", "false"].iter().find_map(|word| {
        let end = pos + word.len();
        let bounded = line.get(end).map_or(true, |&c| !is_word_char(c));
        (starts_with(line, pos, word) && bounded).then_some(end)
    })
}

fn operator(line: &[char], pos: usize) -> Option<usize> {
    if let Some(op) = MULTI_CHAR_OPERATORS
        .iter()
        .find(|op| starts_with(line, pos, op))
    {
        return Some(pos + op.len());
    }
    SINGLE_CHAR_OPERATORS.contains(line[pos]).then_some(pos + 1)
}

fn identifier(line: &[char], pos: usize) -> Option<usize> {
    let first = line[pos];
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let mut end = pos + 1;
    while end < line.len() && is_word_char(line[end]) {
        end += 1;
    }
    Some(end)
}
