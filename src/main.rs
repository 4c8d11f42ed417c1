use std::{env, process};

use bup::driver::{parse_args, run, Action};

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP: &str = r#"
bup - compiles .bup sources to NASM x86-64 assembly

USAGE:
    bup [OPTIONS] <file.bup>...

OPTIONS:
    -a              Assemble each output and keep only the object file
    -f <format>     Object format for the assembler (default: elf64)
    -o <dir>        Write outputs to <dir> instead of next to each input
    -h, --help      Show this help
    -v, --version   Show version

ENVIRONMENT:
    BUP_ASSEMBLER   Assembler program (default: nasm)
    RUST_LOG        Log level, e.g. RUST_LOG=debug
"#;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match parse_args(&args) {
        Ok(Action::Help) => println!("{}", HELP),
        Ok(Action::Version) => println!("bup {}", VERSION),
        Ok(Action::Compile(options)) => {
            if !run(&options) {
                process::exit(1);
            }
        }
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Use --help for usage information.");
            process::exit(1);
        }
    }
}
