use std::io;
use std::process::ExitCode;

use calc::cli;

fn main() -> ExitCode {
    calc::logging::init();

    let argv = cli::args();
    let exit = cli::run(&argv, &mut io::stdout().lock(), &mut io::stderr().lock());
    ExitCode::from(exit.code())
}
