use std::io::{stdin, Read};
use std::process::ExitCode;

use clap::Parser;
use pepasm::{AsmContext, Assembler, InstructionTable};
use tracing::Level;

#[derive(Debug, Parser)]
#[command(version, about = "First pass of the Pep/8 assembler")]
struct Args {
    /// Source file, stdin when omitted or `-`
    input: Option<String>,

    /// Stop at the first line that fails
    #[arg(long)]
    halt_on_error: bool,

    /// Do not require a trailing `.END`
    #[arg(long)]
    no_end: bool,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(short, long, default_value_t = Level::WARN)]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let src = match read_in(args.input.as_deref()) {
        Ok(src) => src,
        Err(e) => {
            tracing::error!("failed to read source: {e}");
            return ExitCode::FAILURE;
        }
    };

    let table = InstructionTable::pep8();
    let ctx = AsmContext {
        halt_on_error: args.halt_on_error,
        require_end: !args.no_end,
    };
    let (program, mut errors) = Assembler::new(&src, &table, ctx).assemble();
    errors.extend(program.undefined_symbols());
    tracing::info!(
        lines = program.codes.len(),
        bytes = program.session.location,
        "first pass done"
    );

    println!("Symbol    Value");
    for (name, value) in program.session.sorted_symbols() {
        println!("{name:<9} {value:04X}");
    }
    let burn = program.session.burn;
    if burn.count > 0 {
        println!(".BURN 0x{:04X} at {:04X}", burn.argument, burn.location);
    }

    if errors.is_empty() {
        return ExitCode::SUCCESS;
    }
    errors.sort_by_key(|e| e.line);
    let mut o = String::new();
    for err in &errors {
        o.push_str(&format!("\n{err}"));
    }
    eprintln!("unable to assemble:{o}");
    ExitCode::FAILURE
}

fn read_in(path: Option<&str>) -> std::io::Result<String> {
    match path {
        None | Some("-") => {
            let mut out = String::new();
            stdin().read_to_string(&mut out)?;
            Ok(out)
        }
        Some(path) => std::fs::read_to_string(path),
    }
}
