//! Command line tool: accuracy of k-NN on a test file, then one interactive classification

use std::io;
use std::process;

use knn_vote::driver;

fn main() {
    pretty_env_logger::init();

    let args = std::env::args_os().skip(1).collect();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    let code = driver::main_with(args, stdin.lock(), &mut stdout);
    process::exit(code);
}
