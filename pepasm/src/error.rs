use thiserror::Error;

use crate::code::Directive;
use crate::lex::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A malformed instance of a recognized token category.
    Lexical,
    /// A token that is not legal where it appears.
    Syntax,
    /// A well formed line that breaks a naming, range or mode rule.
    Semantic,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    #[error("Malformed {}.", .0.describe())]
    Malformed(Token),
    #[error("Syntax error.")]
    UnexpectedChar(char),

    #[error("Line must start with symbol definition, mnemonic, dot command, or comment.")]
    BadLineStart,
    #[error("Must have mnemonic or dot command after symbol definition.")]
    ExpectedOperation,
    #[error("Operand specifier expected after mnemonic.")]
    ExpectedOperand,
    #[error("{} requires {}.", .0, .0.expected_operand())]
    DirectiveOperand(Directive),
    #[error("Comment expected following instruction.")]
    ExpectedComment,
    #[error("Problem detected after comment.")]
    AfterComment,

    #[error("Invalid mnemonic.")]
    InvalidMnemonic,
    #[error("Invalid dot command.")]
    InvalidDotCommand,
    #[error("Symbol {0} cannot have more than eight characters.")]
    SymbolTooLong(String),
    #[error("Decimal constant is out of range ({min}..{max}).")]
    DecimalOutOfRange { min: i32, max: i32 },
    #[error("Decimal constant is out of byte range (-128..255).")]
    DecimalOutOfByteRange,
    #[error("Hex constant is out of range (0x0000..0xFFFF).")]
    HexOutOfRange,
    #[error("Hex constant is out of byte range (0x00..0xFF).")]
    HexOutOfByteRange,
    #[error("String operands must have length at most two.")]
    OperandStringTooLong,
    #[error("{} string operand must have length at most {}.", .0, .0.max_string_len())]
    DirectiveStringTooLong(Directive),
    #[error("Illegal addressing mode for this instruction.")]
    IllegalAddrMode,
    #[error("Addressing mode required for this instruction.")]
    AddrModeRequired,
    #[error(".EQUATE must have a symbol definition.")]
    EquateWithoutSymbol,
    #[error("Only a comment can follow .END.")]
    ContentAfterEnd,
    #[error("Missing .END sentinel.")]
    MissingEnd,
    #[error("Symbol {0} is used but not defined.")]
    UndefinedSymbol(String),
}

impl AsmError {
    pub fn kind(&self) -> ErrorKind {
        use AsmError::*;
        match self {
            Malformed(_) => ErrorKind::Lexical,
            UnexpectedChar(_)
            | BadLineStart
            | ExpectedOperation
            | ExpectedOperand
            | DirectiveOperand(_)
            | ExpectedComment
            | AfterComment => ErrorKind::Syntax,
            _ => ErrorKind::Semantic,
        }
    }
}

/// An error tagged with the 1-based number of the line that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {error}")]
pub struct LineError {
    pub line: u32,
    #[source]
    pub error: AsmError,
}

impl LineError {
    pub fn new(line: u32, error: AsmError) -> Self {
        Self { line, error }
    }
}
