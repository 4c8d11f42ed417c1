#![allow(clippy::module_inception)]

use std::rc::Rc;

use log::debug;

use crate::{
    errors::errors::{Error, ErrorTip},
    parser::parser::Parser,
};

pub mod ast;
pub mod compiler;
pub mod driver;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod state;
pub mod symbols;

extern crate regex;

/// Line number and file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Compiles `source` and returns the generated assembly.
pub fn compile_source(source: &str, file: &str) -> Result<String, Error> {
    debug!("compiling {}", file);

    let mut parser = Parser::new(source.to_string(), Rc::new(file.to_string()), Vec::new());
    parser.parse()?;

    let output = parser.into_output();
    Ok(String::from_utf8_lossy(&output).into_owned())
}

/// Returns the text of the 1-based `line` of `source`, without its line ending.
pub fn get_line_at_position(source: &str, line: u32) -> Option<String> {
    let index = (line as usize).checked_sub(1)?;
    source
        .lines()
        .nth(index)
        .map(|text| text.trim_end_matches('\r').to_string())
}


pub fn display_error(error: &Error, source: &str) {
    /*
        Error: name (tip)
        -> main.bup
           |
        20 | zzz = 1;
           |
    */

    let position = error.get_position();
    let line_text = get_line_at_position(source, position.0).unwrap_or_default();

    let line_string = position.0.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("-> {}", position.1);
    eprintln!("{:>padding$}", "|");
    eprintln!("{} | {}", line_string, line_text.trim());
    eprintln!("{:>padding$}", "|");
}
