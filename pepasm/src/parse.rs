use string_interner::DefaultSymbol;

use crate::code::{byte_len, string_value, Argument, Code, CodeKind, Directive};
use crate::error::AsmError;
use crate::lex::{Lexeme, Lexer, Token};
use crate::mnemonic::{AddrMode, Instruction, InstructionTable};
use crate::session::Session;
use crate::{Address, MAX_SYMBOL_LEN};


/// Result of one successfully processed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub code: Code,
    /// The line was `.END`.
    pub end: bool,
}

/// Runs one source line through the lexer and the line grammar.
///
/// `line` is the 1-based line number recorded with forward references. On
/// success the session's location counter has been advanced by the bytes the
/// line generates. On failure, symbol definitions made before the offending
/// token stay in the session.
pub fn process_line(
    session: &mut Session,
    table: &InstructionTable,
    src: &str,
    line: u32,
) -> Result<ParsedLine, AsmError> {
    LineParser {
        lexer: Lexer::new(src),
        session,
        table,
        line,
        label: None,
        comment: None,
        end: false,
    }
    .parse()
}

#[derive(Debug)]
enum State {
    Start,
    AfterLabel,
    Operand(Instruction),
    AddrMode(Instruction, Argument),
    Directive(Directive),
    Close(CodeKind),
    AfterComment(CodeKind),
    Finish(CodeKind),
}

struct LineParser<'a, 's> {
    lexer: Lexer<'a>,
    session: &'s mut Session,
    table: &'s InstructionTable,
    line: u32,
    label: Option<DefaultSymbol>,
    comment: Option<Box<str>>,
    end: bool,
}

impl<'a> LineParser<'a, '_> {
    fn parse(mut self) -> Result<ParsedLine, AsmError> {
        let mut state = State::Start;
        let kind = loop {
            let lexeme = self.lexer.next_token()?;
            tracing::trace!(line = self.line, ?state, ?lexeme, "step");
            state = match state {
                State::Start => self.start(lexeme)?,
                State::AfterLabel => self.after_label(lexeme)?,
                State::Operand(ins) => self.operand(ins, lexeme)?,
                State::AddrMode(ins, arg) => self.addr_mode(ins, arg, lexeme)?,
                State::Directive(dir) => self.directive(dir, lexeme)?,
                State::Close(kind) => self.close(kind, lexeme)?,
                State::AfterComment(kind) => match lexeme.token {
                    Token::Empty => State::Finish(kind),
                    _ => return Err(AsmError::AfterComment),
                },
                State::Finish(_) => unreachable!("loop exits on finish"),
            };
            if let State::Finish(kind) = state {
                break kind;
            }
        };
        Ok(ParsedLine {
            code: Code {
                label: self.label,
                comment: self.comment,
                address: self.session.location,
                kind,
            },
            end: self.end,
        })
    }

    fn start(&mut self, lx: Lexeme<'a>) -> Result<State, AsmError> {
        match lx.token {
            Token::Identifier | Token::DotCommand => self.operation(lx),
            Token::SymbolDef => {
                let name = lx.text.trim_end_matches(':');
                let sym = self.symbol(name)?;
                let location = self.session.location;
                if let Some(prev) = self.session.symbols.define(sym, location) {
                    tracing::warn!(name, prev, location, "symbol redefined");
                }
                tracing::debug!(name, location, "symbol defined");
                self.label = Some(sym);
                Ok(State::AfterLabel)
            }
            Token::Comment => {
                self.comment = Some(lx.text.into());
                Ok(State::AfterComment(CodeKind::CommentOnly))
            }
            Token::Empty => Ok(State::Finish(CodeKind::Blank)),
            _ => Err(AsmError::BadLineStart),
        }
    }

    fn after_label(&mut self, lx: Lexeme<'a>) -> Result<State, AsmError> {
        match lx.token {
            Token::Identifier | Token::DotCommand => self.operation(lx),
            _ => Err(AsmError::ExpectedOperation),
        }
    }

    /// A mnemonic or a dot command, the same after a label as without one.
    fn operation(&mut self, lx: Lexeme<'a>) -> Result<State, AsmError> {
        if lx.token == Token::DotCommand {
            let dir = Directive::from_name(&lx.text[1..]).ok_or(AsmError::InvalidDotCommand)?;
            self.end = dir == Directive::End;
            return Ok(State::Directive(dir));
        }
        let ins = self
            .table
            .lookup(lx.text)
            .ok_or(AsmError::InvalidMnemonic)?;
        if ins.unary {
            self.advance(1);
            Ok(State::Close(CodeKind::Unary {
                mnemonic: ins.mnemonic,
            }))
        } else {
            // opcode byte plus a two byte operand specifier
            self.advance(3);
            Ok(State::Operand(ins))
        }
    }

    fn operand(&mut self, ins: Instruction, lx: Lexeme<'a>) -> Result<State, AsmError> {
        let arg = match lx.token {
            Token::Identifier => self.reference(lx.text)?,
            Token::StringConst if byte_len(lx.text) > 2 => {
                return Err(AsmError::OperandStringTooLong)
            }
            Token::StringConst => Argument::Str(lx.text.into()),
            Token::HexConst => Argument::Hex(hex(lx.text)?),
            Token::DecConst => Argument::Dec(word(lx.text)?),
            Token::CharConst => Argument::Char(lx.text.into()),
            _ => return Err(AsmError::ExpectedOperand),
        };
        Ok(State::AddrMode(ins, arg))
    }

    fn addr_mode(
        &mut self,
        ins: Instruction,
        arg: Argument,
        lx: Lexeme<'a>,
    ) -> Result<State, AsmError> {
        let mode = match lx.token {
            Token::AddrMode => AddrMode::from_lexeme(lx.text)
                .filter(|mode| ins.modes.contains(*mode))
                .ok_or(AsmError::IllegalAddrMode)?,
            _ if ins.mode_required => return Err(AsmError::AddrModeRequired),
            _ => AddrMode::I,
        };
        let kind = CodeKind::NonUnary {
            mnemonic: ins.mnemonic,
            arg,
            mode,
        };
        if lx.token == Token::AddrMode {
            Ok(State::Close(kind))
        } else {
            // The token after a defaulted operand still has to close the line.
            self.close(kind, lx)
        }
    }

    fn directive(&mut self, dir: Directive, lx: Lexeme<'a>) -> Result<State, AsmError> {
        let wrong_operand = AsmError::DirectiveOperand(dir);
        let arg = match dir {
            Directive::Addrss => match lx.token {
                Token::Identifier => {
                    let arg = self.reference(lx.text)?;
                    self.advance(2);
                    arg
                }
                _ => return Err(wrong_operand),
            },
            Directive::Ascii => match lx.token {
                Token::StringConst => {
                    self.advance(byte_len(lx.text) as Address);
                    Argument::Str(lx.text.into())
                }
                _ => return Err(wrong_operand),
            },
            Directive::Block => {
                let (arg, n) = match lx.token {
                    Token::DecConst => {
                        let n = dec_in(lx.text, 0, 65535)?;
                        (Argument::Dec(n), n)
                    }
                    Token::HexConst => {
                        let n = hex(lx.text)?;
                        (Argument::Hex(n), n)
                    }
                    _ => return Err(wrong_operand),
                };
                self.advance(n.into());
                arg
            }
            Directive::Burn => match lx.token {
                Token::HexConst => {
                    let n = hex(lx.text)?;
                    self.session.burn(n);
                    Argument::Hex(n)
                }
                _ => return Err(wrong_operand),
            },
            Directive::Byte => {
                let arg = match lx.token {
                    Token::CharConst => Argument::Char(lx.text.into()),
                    Token::DecConst => Argument::Dec(byte(lx.text)?),
                    Token::HexConst => match hex(lx.text)? {
                        n @ 0..=0xFF => Argument::Hex(n),
                        _ => return Err(AsmError::HexOutOfByteRange),
                    },
                    Token::StringConst => self.short_string(dir, lx.text)?,
                    _ => return Err(wrong_operand),
                };
                self.advance(1);
                arg
            }
            Directive::End => {
                return match lx.token {
                    Token::Empty => Ok(State::Finish(CodeKind::DotEnd)),
                    Token::Comment => self.close(CodeKind::DotEnd, lx),
                    _ => Err(AsmError::ContentAfterEnd),
                }
            }
            Directive::Equate => {
                let label = self.label.ok_or(AsmError::EquateWithoutSymbol)?;
                let (arg, value) = match lx.token {
                    Token::DecConst => {
                        let n = word(lx.text)?;
                        (Argument::Dec(n), n)
                    }
                    Token::HexConst => {
                        let n = hex(lx.text)?;
                        (Argument::Hex(n), n)
                    }
                    Token::StringConst => {
                        let arg = self.short_string(dir, lx.text)?;
                        (arg, string_value(lx.text))
                    }
                    _ => return Err(wrong_operand),
                };
                tracing::debug!(name = self.session.resolve(label), value, "symbol equated");
                self.session.symbols.define(label, value.into());
                arg
            }
            Directive::Word => {
                let arg = match lx.token {
                    Token::CharConst => Argument::Char(lx.text.into()),
                    Token::DecConst => Argument::Dec(word(lx.text)?),
                    Token::HexConst => Argument::Hex(hex(lx.text)?),
                    Token::StringConst => self.short_string(dir, lx.text)?,
                    _ => return Err(wrong_operand),
                };
                self.advance(2);
                arg
            }
        };
        Ok(State::Close(CodeKind::Dot(dir, arg)))
    }

    fn close(&mut self, kind: CodeKind, lx: Lexeme<'a>) -> Result<State, AsmError> {
        match lx.token {
            Token::Empty => Ok(State::Finish(kind)),
            Token::Comment => {
                self.comment = Some(lx.text.into());
                Ok(State::AfterComment(kind))
            }
            _ => Err(AsmError::ExpectedComment),
        }
    }

    fn advance(&mut self, bytes: Address) {
        self.session.location += bytes;
    }

    fn symbol(&mut self, name: &str) -> Result<DefaultSymbol, AsmError> {
        if name.chars().count() > MAX_SYMBOL_LEN {
            return Err(AsmError::SymbolTooLong(name.to_owned()));
        }
        Ok(self.session.intern(name))
    }

    /// A symbol operand, logged in the forward reference ledger.
    fn reference(&mut self, name: &str) -> Result<Argument, AsmError> {
        let sym = self.symbol(name)?;
        self.session.reference(sym, self.line);
        Ok(Argument::Symbol(sym))
    }

    fn short_string(&self, dir: Directive, text: &str) -> Result<Argument, AsmError> {
        if byte_len(text) > dir.max_string_len() {
            return Err(AsmError::DirectiveStringTooLong(dir));
        }
        Ok(Argument::Str(text.into()))
    }
}

/// Parses a decimal lexeme and checks it against `min..=max`.
fn dec_in(text: &str, min: i32, max: i32) -> Result<u16, AsmError> {
    let out_of_range = AsmError::DecimalOutOfRange { min, max };
    let value: i64 = text.parse().map_err(|_| out_of_range.clone())?;
    if !(i64::from(min)..=i64::from(max)).contains(&value) {
        return Err(out_of_range);
    }
    // Negative values are stored as their two's complement.
    Ok(value.rem_euclid(65536) as u16)
}

fn word(text: &str) -> Result<u16, AsmError> {
    dec_in(text, -32768, 65535)
}

fn byte(text: &str) -> Result<u16, AsmError> {
    let value: i64 = text.parse().map_err(|_| AsmError::DecimalOutOfByteRange)?;
    if !(-128..=255).contains(&value) {
        return Err(AsmError::DecimalOutOfByteRange);
    }
    Ok(value.rem_euclid(256) as u16)
}

fn hex(text: &str) -> Result<u16, AsmError> {
    u16::from_str_radix(&text[2..], 16).map_err(|_| AsmError::HexOutOfRange)
}
