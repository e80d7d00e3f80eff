use string_interner::DefaultSymbol;

use crate::mnemonic::{AddrMode, Mnemonic};
use crate::{Address, Interner};

#[cfg(test)]
mod test;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Dec(u16),
    Hex(u16),
    /// Raw lexeme, quotes included.
    Char(Box<str>),
    /// Raw lexeme, quotes included.
    Str(Box<str>),
    Symbol(DefaultSymbol),
}

impl Argument {
    /// The 16 bit value the operand stands for, if it can be known without
    /// the symbol table.
    pub fn value(&self) -> Option<u16> {
        match self {
            Argument::Dec(n) | Argument::Hex(n) => Some(*n),
            Argument::Char(raw) => unquote(raw).first().map(|&b| b.into()),
            Argument::Str(raw) => Some(string_value(raw)),
            Argument::Symbol(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    pub label: Option<DefaultSymbol>,
    pub comment: Option<Box<str>>,
    /// Location counter after this line was counted.
    pub address: Address,
    pub kind: CodeKind,
}

impl Code {
    pub fn label_name<'a>(&self, si: &'a Interner) -> Option<&'a str> {
        self.label.and_then(|sym| si.resolve(sym))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeKind {
    Unary {
        mnemonic: Mnemonic,
    },
    NonUnary {
        mnemonic: Mnemonic,
        arg: Argument,
        mode: AddrMode,
    },
    Dot(Directive, Argument),
    DotEnd,
    CommentOnly,
    Blank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Directive {
    Addrss,
    Ascii,
    Block,
    Burn,
    Byte,
    End,
    Equate,
    Word,
}

impl Directive {
    pub const ALL: [Directive; 8] = [
        Directive::Addrss,
        Directive::Ascii,
        Directive::Block,
        Directive::Burn,
        Directive::Byte,
        Directive::End,
        Directive::Equate,
        Directive::Word,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Directive::Addrss => "ADDRSS",
            Directive::Ascii => "ASCII",
            Directive::Block => "BLOCK",
            Directive::Burn => "BURN",
            Directive::Byte => "BYTE",
            Directive::End => "END",
            Directive::Equate => "EQUATE",
            Directive::Word => "WORD",
        }
    }

    /// Looks up a directive by name, without the leading `.`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(name))
    }

    pub(crate) fn expected_operand(self) -> &'static str {
        match self {
            Directive::Addrss => "a symbol argument",
            Directive::Ascii => "a string constant argument",
            Directive::Block => "a decimal or hex constant argument",
            Directive::Burn => "a hex constant argument",
            Directive::Byte | Directive::Word => "a char, dec, hex, or string constant argument",
            Directive::Equate => "a dec, hex, or string constant argument",
            Directive::End => "no argument",
        }
    }

    pub(crate) fn max_string_len(self) -> usize {
        match self {
            Directive::Byte => 1,
            Directive::Ascii => usize::MAX,
            _ => 2,
        }
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ".{}", self.name())
    }
}

fn strip_quotes(raw: &str) -> &str {
    let mut chars = raw.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}

/// Decodes the body of a quoted char or string lexeme into the bytes it
/// assembles to.
pub fn unquote(raw: &str) -> Vec<u8> {
    decode_escapes(strip_quotes(raw))
}

pub fn decode_escapes(body: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        let byte = match ch {
            '\\' => match chars.next() {
                Some('x' | 'X') => {
                    let hex: String = chars.by_ref().take(2).collect();
                    u8::from_str_radix(&hex, 16).unwrap_or(0)
                }
                Some('b') => 8,
                Some('f') => 12,
                Some('n') => 10,
                Some('r') => 13,
                Some('t') => 9,
                Some('v') => 11,
                Some(other) => latin1(other),
                None => latin1('\\'),
            },
            _ => latin1(ch),
        };
        bytes.push(byte);
    }
    bytes
}

fn latin1(ch: char) -> u8 {
    u8::try_from(ch).unwrap_or(0)
}

/// Number of bytes a quoted string lexeme assembles to.
pub fn byte_len(raw: &str) -> usize {
    unquote(raw).len()
}

/// Packs up to two string bytes big-endian into one word.
pub fn string_value(raw: &str) -> u16 {
    unquote(raw)
        .iter()
        .take(2)
        .fold(0, |acc, &b| (acc << 8) | u16::from(b))
}
