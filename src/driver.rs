//! Command-line options and the per-file compile loop.

use std::{
    env, fs,
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    process::Command,
    rc::Rc,
    time::Instant,
};

use log::{error, info};

use crate::{
    display_error,
    errors::errors::{Error, ErrorImpl},
    parser::parser::parse,
    Position,
};

/// Environment variable naming the assembler program.
pub const ASSEMBLER_ENV: &str = "BUP_ASSEMBLER";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub files: Vec<PathBuf>,
    /// Run the assembler on each output and keep only the object file
    pub assemble: bool,
    /// Object format passed to the assembler as `-f<format>`
    pub format: String,
    pub assembler: String,
    /// Directory for outputs, defaulting to each input's own directory
    pub output_dir: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            files: Vec::new(),
            assemble: false,
            format: String::from("elf64"),
            assembler: env::var(ASSEMBLER_ENV).unwrap_or_else(|_| String::from("nasm")),
            output_dir: None,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Help,
    Version,
    Compile(Options),
}

/// Parses the arguments following the program name.
pub fn parse_args(args: &[String]) -> Result<Action, String> {
    let mut options = Options::default();
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Action::Help),
            "-v" | "--version" => return Ok(Action::Version),
            "-a" => options.assemble = true,
            "-f" => {
                let format = args.next().ok_or("-f expects an object format")?;
                options.format = format.clone();
            }
            "-o" => {
                let dir = args.next().ok_or("-o expects a directory")?;
                options.output_dir = Some(PathBuf::from(dir));
            }
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("unknown option: {}", flag))
            }
            file => options.files.push(PathBuf::from(file)),
        }
    }

    if options.files.is_empty() {
        return Err(String::from("no input files"));
    }

    Ok(Action::Compile(options))
}

fn io_error(error: std::io::Error, position: Position) -> Error {
    Error::new(
        ErrorImpl::Io {
            message: error.to_string(),
        },
        position,
    )
}

/// Compiles one file and returns the path of what it produced.
///
/// The `.asm` output is written as statements are generated, so a failed
/// compilation leaves the text for everything before the error.
pub fn compile_file(path: &Path, options: &Options) -> Result<PathBuf, Error> {
    let start = Instant::now();
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let file = Rc::new(name);
    let position = Position(0, Rc::clone(&file));

    let source = fs::read_to_string(path).map_err(|error| io_error(error, position.clone()))?;

    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("out"));
    let dir = match &options.output_dir {
        Some(dir) => dir.clone(),
        None => path.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let asm_path = dir.join(format!("{}.asm", stem));

    let out = File::create(&asm_path).map_err(|error| io_error(error, position.clone()))?;
    parse(source, Rc::clone(&file), BufWriter::new(out))?;
    info!("compiled {} to {} in {:?}", file, asm_path.display(), start.elapsed());

    if !options.assemble {
        return Ok(asm_path);
    }

    let object_path = dir.join(format!("{}.o", stem));
    assemble(&asm_path, &object_path, options, position.clone())?;
    fs::remove_file(&asm_path).map_err(|error| io_error(error, position))?;

    Ok(object_path)
}

fn assemble(asm_path: &Path, object_path: &Path, options: &Options, position: Position) -> Result<(), Error> {
    info!(
        "running {} -f{} {}",
        options.assembler,
        options.format,
        asm_path.display()
    );

    let output = Command::new(&options.assembler)
        .arg(format!("-f{}", options.format))
        .arg(asm_path)
        .arg("-o")
        .arg(object_path)
        .output()
        .map_err(|error| io_error(error, position.clone()))?;

    if !output.status.success() {
        return Err(Error::new(
            ErrorImpl::AssemblerFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            },
            position,
        ));
    }

    Ok(())
}

/// Compiles every input in order, stopping at the first failure.
///
/// Returns `false` once a diagnostic has been reported.
pub fn run(options: &Options) -> bool {
    for path in &options.files {
        if let Err(err) = compile_file(path, options) {
            error!("compilation of {} failed", path.display());
            let source = fs::read_to_string(path).unwrap_or_default();
            display_error(&err, &source);
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let Ok(Action::Compile(options)) = parse_args(&args(&["-a", "-f", "macho64", "-o", "build", "main.bup"]))
        else {
            panic!("expected compile action");
        };

        assert!(options.assemble);
        assert_eq!(options.format, "macho64");
        assert_eq!(options.output_dir, Some(PathBuf::from("build")));
        assert_eq!(options.files, vec![PathBuf::from("main.bup")]);
    }

    #[test]
    fn test_parse_args_flags_and_errors() {
        assert_eq!(parse_args(&args(&["-h"])), Ok(Action::Help));
        assert_eq!(parse_args(&args(&["main.bup", "-v"])), Ok(Action::Version));
        assert!(parse_args(&args(&[])).is_err());
        assert!(parse_args(&args(&["-f"])).is_err());
        assert!(parse_args(&args(&["-x", "main.bup"])).is_err());
    }

    #[test]
    fn test_compile_file_writes_asm() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("main.bup");
        let mut file = fs::File::create(&input).unwrap();
        writeln!(file, "pub proc main -> u8 {{ return 7; }}").unwrap();

        let output = compile_file(&input, &Options::default()).unwrap();
        assert_eq!(output, dir.path().join("main.asm"));
        assert_eq!(
            fs::read_to_string(output).unwrap(),
            "[section .text]\n[global main]\nmain:\n\tmov al, 7\n\tret\n"
        );
    }

    #[test]
    fn test_failed_compile_keeps_partial_output() {
        let dir = tempdir().unwrap();
        let out_dir = tempdir().unwrap();
        let input = dir.path().join("broken.bup");
        fs::write(&input, "u32 a;\nproc f -> u8 {\n  zzz = 1;\n}\n").unwrap();

        let options = Options {
            output_dir: Some(out_dir.path().to_path_buf()),
            ..Options::default()
        };
        let error = compile_file(&input, &options).unwrap_err();
        assert_eq!(error.get_position().0, 3);
        assert_eq!(error.get_position().1.as_str(), "broken.bup");

        let partial = fs::read_to_string(out_dir.path().join("broken.asm")).unwrap();
        assert_eq!(partial, "[section .data]\na: dd 0\n[section .text]\nf:\n");
    }

    #[test]
    fn test_missing_input_is_io_error() {
        let dir = tempdir().unwrap();
        let error = compile_file(&dir.path().join("nope.bup"), &Options::default()).unwrap_err();
        assert!(matches!(error.get_impl(), ErrorImpl::Io { .. }));
    }

    #[test]
    fn test_missing_assembler_is_reported() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("main.bup");
        fs::write(&input, "u8 x;\n").unwrap();

        let options = Options {
            assemble: true,
            assembler: String::from("bup-no-such-assembler"),
            ..Options::default()
        };
        let error = compile_file(&input, &options).unwrap_err();
        assert!(matches!(error.get_impl(), ErrorImpl::Io { .. }));
        assert!(dir.path().join("main.asm").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_assemble_removes_asm() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("main.bup");
        fs::write(&input, "u8 x;\n").unwrap();

        let options = Options {
            assemble: true,
            assembler: String::from("true"),
            ..Options::default()
        };
        let output = compile_file(&input, &options).unwrap();
        assert_eq!(output, dir.path().join("main.o"));
        assert!(!dir.path().join("main.asm").exists());
    }
}
