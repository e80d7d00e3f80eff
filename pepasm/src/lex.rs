use std::str::Chars;

use crate::error::AsmError;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    AddrMode,
    CharConst,
    Comment,
    DecConst,
    DotCommand,
    HexConst,
    Identifier,
    StringConst,
    SymbolDef,
    Empty,
}

impl Token {
    pub fn describe(self) -> &'static str {
        match self {
            Token::AddrMode => "addressing mode",
            Token::CharConst => "character constant",
            Token::Comment => "comment",
            Token::DecConst => "decimal constant",
            Token::DotCommand => "dot command",
            Token::HexConst => "hex constant",
            Token::Identifier | Token::SymbolDef => "identifier",
            Token::StringConst => "string constant",
            Token::Empty => "end of line",
        }
    }
}

/// A token together with the exact text it matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub token: Token,
    pub text: &'a str,
}

const EOF_CHAR: char = '\0';

/// Pulls tokens off the front of a single source line.
///
/// Every successful call consumes at least one character unless the line is
/// exhausted, in which case [`Token::Empty`] is returned for as long as the
/// caller keeps asking.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    chars: Chars<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(line: &'a str) -> Self {
        Self {
            chars: line.trim_end().chars(),
        }
    }

    /// The text that has not been tokenized yet.
    pub fn rest(&self) -> &'a str {
        self.chars.as_str()
    }

    pub fn next_token(&mut self) -> Result<Lexeme<'a>, AsmError> {
        self.chars = self.rest().trim_start().chars();
        let start = self.rest();
        let ch = self.first();
        let token = match ch {
            _ if self.is_eof() => Token::Empty,
            ',' => self.addr_mode()?,
            '\'' => self.char_const()?,
            ';' => self.comment(),
            '0'..='9' | '+' | '-' if !self.hex_prefix() => self.dec_const()?,
            '.' => self.dot_command()?,
            '0' => self.hex_const()?,
            _ if ch.is_ascii_alphabetic() || ch == '_' => self.identifier(),
            _ if ch.is_alphabetic() => return Err(AsmError::Malformed(Token::Identifier)),
            '"' => self.string_const()?,
            _ => return Err(AsmError::UnexpectedChar(ch)),
        };
        let len = start.len() - self.rest().len();
        Ok(Lexeme {
            token,
            text: &start[..len],
        })
    }

    fn first(&self) -> char {
        self.chars.clone().next().unwrap_or(EOF_CHAR)
    }
    fn second(&self) -> char {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().unwrap_or(EOF_CHAR)
    }
    fn bump(&mut self) -> Option<char> {
        self.chars.next()
    }
    fn is_eof(&self) -> bool {
        self.chars.as_str().is_empty()
    }
    fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> usize {
        let mut eaten = 0;
        while !self.is_eof() && predicate(self.first()) {
            self.bump();
            eaten += 1;
        }
        eaten
    }
    fn hex_prefix(&self) -> bool {
        self.first() == '0' && matches!(self.second(), 'x' | 'X')
    }

    fn addr_mode(&mut self) -> Result<Token, AsmError> {
        // Longer suffixes first so `sxf` is not cut short at `s`.
        const MODES: [&str; 8] = ["sxf", "sx", "sf", "i", "d", "x", "n", "s"];
        self.bump();
        self.eat_while(char::is_whitespace);
        let rest = self.rest();
        let mode = MODES
            .iter()
            .find(|m| {
                rest.get(..m.len())
                    .is_some_and(|head| head.eq_ignore_ascii_case(m))
            })
            .ok_or(AsmError::Malformed(Token::AddrMode))?;
        self.chars = rest[mode.len()..].chars();
        Ok(Token::AddrMode)
    }

    fn char_const(&mut self) -> Result<Token, AsmError> {
        let malformed = AsmError::Malformed(Token::CharConst);
        self.bump();
        if self.first() == '\'' || !self.quoted_char() {
            return Err(malformed);
        }
        match self.bump() {
            Some('\'') => Ok(Token::CharConst),
            _ => Err(malformed),
        }
    }

    fn string_const(&mut self) -> Result<Token, AsmError> {
        self.bump();
        while self.first() != '"' {
            if self.is_eof() || !self.quoted_char() {
                return Err(AsmError::Malformed(Token::StringConst));
            }
        }
        self.bump();
        Ok(Token::StringConst)
    }

    /// Consumes one raw character or one escape sequence.
    fn quoted_char(&mut self) -> bool {
        match self.bump() {
            Some('\\') => match self.bump() {
                Some('x' | 'X') => {
                    self.eat_while_max(2, |c| c.is_ascii_hexdigit()) == 2
                }
                Some('b' | 'f' | 'n' | 'r' | 't' | 'v' | '"' | '\'' | '\\') => true,
                _ => false,
            },
            Some(_) => true,
            None => false,
        }
    }

    fn eat_while_max(&mut self, max: usize, mut predicate: impl FnMut(char) -> bool) -> usize {
        let mut eaten = 0;
        self.eat_while(|c| {
            let take = eaten < max && predicate(c);
            eaten += usize::from(take);
            take
        })
    }

    fn comment(&mut self) -> Token {
        self.chars = "".chars();
        Token::Comment
    }

    fn dec_const(&mut self) -> Result<Token, AsmError> {
        if let '+' | '-' = self.first() {
            self.bump();
        }
        match self.eat_while(|c| c.is_ascii_digit()) {
            0 => Err(AsmError::Malformed(Token::DecConst)),
            _ => Ok(Token::DecConst),
        }
    }

    fn hex_const(&mut self) -> Result<Token, AsmError> {
        self.bump();
        self.bump();
        match self.eat_while(|c| c.is_ascii_hexdigit()) {
            0 => Err(AsmError::Malformed(Token::HexConst)),
            _ => Ok(Token::HexConst),
        }
    }

    fn dot_command(&mut self) -> Result<Token, AsmError> {
        self.bump();
        if !self.first().is_ascii_alphabetic() {
            return Err(AsmError::Malformed(Token::DotCommand));
        }
        self.eat_while(is_word);
        Ok(Token::DotCommand)
    }

    fn identifier(&mut self) -> Token {
        self.eat_while(is_word);
        if self.first() == ':' {
            self.bump();
            Token::SymbolDef
        } else {
            Token::Identifier
        }
    }
}

fn is_word(ch: char) -> bool {
    matches!(ch, 'a'..='z' | 'A'..='Z' | '_' | '0'..='9')
}
