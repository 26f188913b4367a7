
extern crate clap;
#[macro_use] extern crate log;
extern crate fern;
extern crate chrono;
extern crate regex;
extern crate term_grid;

pub mod assembler;

use clap::{Arg, ArgMatches, App};
use term_grid::{Grid, GridOptions, Direction, Filling, Cell};

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use assembler::{AssembleError, Assembly, Word};

const DEFAULT_OUTPUT: &str = "machine_code.txt";

fn main() {
    let args = process_arguments();
    initialize_logging(args.occurrences_of("verbose"));

    debug!("Arguments:\n\tVerbosity: {}\n\tOutfile: {}\n\tInfile: {}",
        match args.occurrences_of("verbose") {
            0 => log::LevelFilter::Error.to_string(),
            1 => log::LevelFilter::Warn.to_string(),
            2 => log::LevelFilter::Info.to_string(),
            3 | _ => log::LevelFilter::Debug.to_string(),
        },
        args.value_of("output").unwrap_or(DEFAULT_OUTPUT),
        args.value_of("INPUT").unwrap()
    );

    let ipath = Path::new(args.value_of("INPUT").unwrap());
    let opath = Path::new(args.value_of("output").unwrap_or(DEFAULT_OUTPUT));

    match run(ipath, opath, args.is_present("print-debug")) {
        Err(err) => {
            error!("fatal: {}", err);
            std::process::exit(1);
        },
        Ok(count) => info!("Wrote {} word(s) to `{}`.", count, opath.display()),
    }
}

#[derive(thiserror::Error, Debug)]
enum RunError {
    #[error("unable to read input file `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("{}:{}: {source}", path.display(), source.line())]
    Assemble { path: PathBuf, source: AssembleError },

    #[error("unable to write to output file `{}`: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Assemble `input` and write the words to `output`, returning the
/// number of words written. The output file is only created once
/// assembly has fully succeeded.
fn run(input: &Path, output: &Path, print_debug: bool) -> Result<usize, RunError> {
    let source = fs::read_to_string(input).map_err(|source| RunError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let assembly = Assembly::from_source(&source).map_err(|source| RunError::Assemble {
        path: input.to_path_buf(),
        source,
    })?;

    if print_debug {
        print_listing(&assembly);
    }

    write_words(output, &assembly.words).map_err(|source| RunError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(assembly.words.len())
}

fn write_words(path: &Path, words: &[Word]) -> io::Result<()> {
    let mut ofile = BufWriter::new(File::create(path)?);
    for word in words {
        writeln!(ofile, "{}", word)?;
    }
    ofile.flush()
}

fn print_listing(assembly: &Assembly) {
    println!("Symbol table:");
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });
    for (label, address) in assembly.symbols.iter() {
        grid.add(Cell::from(format!("{}:", label)));
        grid.add(Cell::from(format!("{}", address)));
    }
    println!("{}", grid.fit_into_columns(2));

    println!("Listing:");
    let mut grid = Grid::new(GridOptions {
        filling:     Filling::Spaces(1),
        direction:   Direction::LeftToRight,
    });
    let mut address = 0;
    for (line, words) in assembly.listing() {
        for (idx, word) in words.iter().enumerate() {
            grid.add(Cell::from(format!("{:02}:", address)));
            grid.add(Cell::from(if idx == 0 {
                format!("{:>4} | {}", line.line, line.tokens.join(" "))
            } else {
                String::new()
            }));
            grid.add(Cell::from("=>".to_string()));
            grid.add(Cell::from(format!("{}", word)));
            address += 1;
        }
    }
    println!("{}", grid.fit_into_columns(4));
}

fn process_arguments() -> ArgMatches<'static> {
    App::new(option_env!("CARGO_PKG_NAME").unwrap_or("babyasm"))
        .version(option_env!("CARGO_PKG_VERSION").unwrap_or("unknown"))
        .author(option_env!("CARGO_PKG_AUTHORS").unwrap_or(""))
        .about(option_env!("CARGO_PKG_DESCRIPTION").unwrap_or(""))
        .arg(Arg::with_name("INPUT")
            .help("Sets the input file to use")
            .required(true)
            .multiple(false)
            .index(1))
        .arg(Arg::with_name("verbose")
            .short("v")
            .multiple(true)
            .takes_value(false)
            .help("Sets the level of verbosity"))
        .arg(Arg::with_name("output")
            .short("o")
            .takes_value(true)
            .help("write output to an outfile (default: machine_code.txt)"))
        .arg(Arg::with_name("print-debug")
            .short("d")
            .alias("show")
            .alias("s")
            .takes_value(false)
            .help("prints the symbol table and listing alongside the assembly to STDOUT"))
        .get_matches()
}

fn initialize_logging(verbosity: u64) {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(match verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 | _ => log::LevelFilter::Debug,
        })
        .chain(std::io::stdout())
        .apply().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_file(dir: &Path, text: &str) -> PathBuf {
        let path = dir.join("prog.asm");
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn test_run_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = source_file(dir.path(), "A: VAR 1\nB: VAR 2\nMOV A B\n");
        let output = dir.path().join("out.txt");

        let err = run(&input, &output, false).unwrap_err();
        assert!(matches!(
            err,
            RunError::Assemble { source: AssembleError::InvalidOperand { line: 3, .. }, .. }
        ));
        assert!(err.to_string().contains("prog.asm:3: invalid operands `A`, `B`"));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.txt");

        let err = run(&dir.path().join("absent.asm"), &output, false).unwrap_err();
        assert!(matches!(err, RunError::Read { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_run_writes_one_line_per_word() {
        let dir = tempfile::tempdir().unwrap();
        let input = source_file(dir.path(), "A: VAR 10\nLDN A\nMOV #-3 A\nSTP\n");
        let output = dir.path().join("out.txt");

        assert_eq!(run(&input, &output, false).unwrap(), 5);

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.ends_with('\n'));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        for line in &lines {
            assert_eq!(line.len(), 32);
            assert!(line.chars().all(|c| c == '0' || c == '1'));
        }
        assert_eq!(lines[0], format!("0101{}", "0".repeat(28)));
        assert_eq!(lines[4], "00000000000001110000000000000000");
    }
}
