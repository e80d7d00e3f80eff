use string_interner::{DefaultBackend, StringInterner};

pub mod assemble;
pub mod code;
pub mod error;
pub mod lex;
pub mod mnemonic;
pub mod parse;
pub mod session;

/// Byte offset produced by the location counter.
pub type Address = u32;

pub type Interner = StringInterner<DefaultBackend>;

/// Longest symbol name accepted in a definition or a reference.
pub const MAX_SYMBOL_LEN: usize = 8;

pub use self::assemble::{AsmContext, Assembler, Program};
pub use self::code::{Argument, Code, CodeKind, Directive};
pub use self::error::{AsmError, ErrorKind, LineError};
pub use self::mnemonic::{AddrMode, AddrModes, Instruction, InstructionTable, Mnemonic};
pub use self::parse::{process_line, ParsedLine};
pub use self::session::{Burn, Reference, Session, SymbolTable};
