//! Command line orchestration: load both files, report accuracy, classify one console vector.

use std::ffi::OsString;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use log::{debug, error};

use crate::dataset::{parse_features, Dataset};
use crate::error::{KnnError, Result};
use crate::evaluate::accuracy;
use crate::knn::classify;

pub const USAGE: &str = "\
Usage: knn <k> <train_file> <test_file>

Arguments:
  k              Number of neighbours consulted per classification
  train_file     Comma-separated training records, label last
  test_file      Comma-separated test records, label last

Options:
  -h, --help     Print help

Set RUST_LOG=debug for diagnostics on stderr.";

pub const PROMPT: &str = "Enter a new feature vector separated by commas: ";

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    /// Number of neighbours
    pub k: usize,

    /// Training set
    pub train_file: PathBuf,

    /// Test set
    pub test_file: PathBuf,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Usage,
    Run(Args),
}

impl Args {
    /// Parses the arguments after the program name.
    ///
    /// `-h`/`--help` or anything but exactly three positionals yields [`Command::Usage`].
    /// A `k` that is not an integer is a [`KnnError::Format`]; a negative one an
    /// [`KnnError::InvalidArgument`].
    pub fn parse(raw: Vec<OsString>) -> Result<Command> {
        let mut pargs = pico_args::Arguments::from_vec(raw);
        if pargs.contains(["-h", "--help"]) {
            return Ok(Command::Usage);
        }

        let free = pargs.finish();
        let [k, train_file, test_file] = match <[OsString; 3]>::try_from(free) {
            Ok(positionals) => positionals,
            Err(_) => return Ok(Command::Usage),
        };

        let k_token = k.to_string_lossy();
        let k: i64 = k_token.trim().parse().map_err(|_| KnnError::format(k_token.to_string()))?;
        let k = usize::try_from(k)
            .map_err(|_| KnnError::InvalidArgument(format!("k must be a positive integer, got {k}")))?;

        Ok(Command::Run(Args {
            k,
            train_file: train_file.into(),
            test_file: test_file.into(),
        }))
    }
}

fn stdout_error(err: std::io::Error) -> KnnError {
    KnnError::io("<stdout>", err)
}

/// Runs the whole interaction: accuracy on the test file, then one classification of a
/// vector read from `input`.
pub fn run<R: BufRead, W: Write>(args: &Args, mut input: R, output: &mut W) -> Result<()> {
    let train = Dataset::load(&args.train_file)?;
    let test = Dataset::load(&args.test_file)?;
    debug!("train: {} records, test: {} records, k={}", train.len(), test.len(), args.k);

    let acc = accuracy(train.points(), test.points(), args.k)?;
    writeln!(output, "The accuracy is: {acc}%").map_err(stdout_error)?;

    write!(output, "{PROMPT}").map_err(stdout_error)?;
    output.flush().map_err(stdout_error)?;

    let mut line = String::new();
    input.read_line(&mut line).map_err(|e| KnnError::io("<stdin>", e))?;
    let query = parse_features(&line)?;

    let label = classify(train.points(), &query, args.k)?;
    writeln!(output, "The class of the feature vector is: {label}").map_err(stdout_error)?;
    Ok(())
}

/// The single line shown to the user for an error.
pub fn report(err: &KnnError) -> String {
    match err {
        KnnError::Format { .. } => format!("Please enter numeric values correctly. ({err})"),
        KnnError::Io { .. } => format!("Error reading file: {err}"),
        KnnError::DimensionMismatch { .. } | KnnError::InvalidArgument(_) => {
            format!("An error occurred: {err}")
        }
    }
}

/// Parses `raw` arguments, runs, and reports. Returns the process exit code.
pub fn main_with<R: BufRead, W: Write>(raw: Vec<OsString>, input: R, output: &mut W) -> i32 {
    let outcome = Args::parse(raw).and_then(|command| match command {
        Command::Usage => writeln!(&mut *output, "{USAGE}").map_err(stdout_error),
        Command::Run(args) => run(&args, input, &mut *output),
    });

    match outcome {
        Ok(()) => 0,
        Err(err) => {
            error!("{err:?}");
            if let Err(write_err) = writeln!(output, "{}", report(&err)) {
                error!("could not write error message: {write_err}");
            }
            err.exit_code()
        }
    }
}
