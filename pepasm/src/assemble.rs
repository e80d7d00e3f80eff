use crate::code::Code;
use crate::error::{AsmError, LineError};
use crate::mnemonic::InstructionTable;
use crate::parse::process_line;
use crate::session::Session;

#[cfg(test)]
mod test;

#[derive(Debug, Clone)]
pub struct AsmContext {
    /// Stop at the first failing line. default = `false`
    pub halt_on_error: bool,
    /// Report a source without `.END`. default = `true`
    pub require_end: bool,
}

impl Default for AsmContext {
    fn default() -> Self {
        Self {
            halt_on_error: false,
            require_end: true,
        }
    }
}

/// Output of the first pass.
#[derive(Debug, Default)]
pub struct Program {
    pub session: Session,
    pub codes: Vec<Code>,
    /// Line number of each entry in `codes`.
    pub lines: Vec<u32>,
    pub ended: bool,
}

impl Program {
    /// Every forward reference that the symbol table cannot satisfy.
    pub fn undefined_symbols(&self) -> Vec<LineError> {
        self.session
            .undefined_references()
            .map(|r| {
                let name = self.session.resolve(r.name).to_owned();
                LineError::new(r.line, AsmError::UndefinedSymbol(name))
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct Assembler<'a> {
    src: &'a str,
    table: &'a InstructionTable,
    ctx: AsmContext,
}

impl<'a> Assembler<'a> {
    pub fn new(src: &'a str, table: &'a InstructionTable, ctx: AsmContext) -> Self {
        Self { src, table, ctx }
    }

    /// Scans the source line by line up to and including `.END`.
    pub fn assemble(self) -> (Program, Vec<LineError>) {
        self.assemble_into(Session::new())
    }

    /// Like [`Assembler::assemble`], reusing an existing session after
    /// resetting it.
    pub fn assemble_into(self, mut session: Session) -> (Program, Vec<LineError>) {
        session.reset();
        let mut program = Program {
            session,
            ..Program::default()
        };
        let mut errors = Vec::new();
        let mut last = 0;
        for (line, src) in (1..).zip(self.src.lines()) {
            last = line;
            match process_line(&mut program.session, self.table, src, line) {
                Ok(parsed) => {
                    program.codes.push(parsed.code);
                    program.lines.push(line);
                    if parsed.end {
                        program.ended = true;
                        break;
                    }
                }
                Err(error) => {
                    tracing::debug!(line, %error, "line rejected");
                    errors.push(LineError::new(line, error));
                    if self.ctx.halt_on_error {
                        return (program, errors);
                    }
                }
            }
        }
        if self.ctx.require_end && !program.ended {
            errors.push(LineError::new(last + 1, AsmError::MissingEnd));
        }
        (program, errors)
    }
}
