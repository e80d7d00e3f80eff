use expect_test::{expect, Expect};

use super::{AsmContext, Assembler};
use crate::error::AsmError;
use crate::mnemonic::InstructionTable;
use crate::session::Session;

fn check(src: &str, ctx: AsmContext, expect: Expect) {
    let table = InstructionTable::pep8();
    let (program, errors) = Assembler::new(src, &table, ctx).assemble();
    let mut out = String::new();
    for (line, code) in program.lines.iter().zip(&program.codes) {
        out.push_str(&format!("{line} {:04X}\n", code.address));
    }
    for e in errors.iter().chain(&program.undefined_symbols()) {
        out.push_str(&format!("{e}\n"));
    }
    out.push_str(&format!("ended: {}\n", program.ended));
    expect.assert_eq(&out);
}

#[test]
fn stops_at_end() {
    check(
        "STOP\n.END\nthis is never scanned",
        AsmContext::default(),
        expect![[r#"
            1 0001
            2 0001
            ended: true
        "#]],
    );
}

#[test]
fn collects_every_error() {
    check(
        "LDA x,d\nFOO\n.BYTE 999\n.END",
        AsmContext::default(),
        expect![[r#"
            1 0003
            4 0003
            line 2: Invalid mnemonic.
            line 3: Decimal constant is out of byte range (-128..255).
            line 1: Symbol x is used but not defined.
            ended: true
        "#]],
    );
}

#[test]
fn halts_on_first_error() {
    let ctx = AsmContext {
        halt_on_error: true,
        ..AsmContext::default()
    };
    check(
        "FOO\n.BYTE 999\n.END",
        ctx,
        expect![[r#"
            line 1: Invalid mnemonic.
            ended: false
        "#]],
    );
}

#[test]
fn missing_end() {
    check(
        "STOP\n",
        AsmContext::default(),
        expect![[r#"
            1 0001
            line 2: Missing .END sentinel.
            ended: false
        "#]],
    );
    let ctx = AsmContext {
        require_end: false,
        ..AsmContext::default()
    };
    check(
        "STOP",
        ctx,
        expect![[r#"
            1 0001
            ended: false
        "#]],
    );
}

#[test]
fn session_is_reset_between_runs() {
    let table = InstructionTable::pep8();
    let mut session = Session::new();
    session.define("stale", 42);
    session.location = 100;
    let (program, errors) =
        Assembler::new("a: STOP\n.END", &table, AsmContext::default()).assemble_into(session);
    assert!(errors.is_empty());
    assert_eq!(program.session.lookup("stale"), None);
    assert_eq!(program.session.lookup("a"), Some(0));
    assert_eq!(program.session.location, 1);
}

#[test]
fn forward_reference_resolves_later() {
    let table = InstructionTable::pep8();
    let (program, errors) =
        Assembler::new("BR main\nmain: STOP\n.END", &table, AsmContext::default()).assemble();
    assert!(errors.is_empty());
    assert!(program.undefined_symbols().is_empty());
    let (program, _) = Assembler::new("BR nowhere\n.END", &table, AsmContext::default()).assemble();
    assert_eq!(
        program.undefined_symbols()[0].error,
        AsmError::UndefinedSymbol("nowhere".into())
    );
}
