extern crate rstorm;
use rstorm::{lex_source, Trace, TypeTable};

use docopt::Docopt;

const USAGE: &str = "
rstorm front-end: lex a source file into the lexeme stream.

Usage:
  rstorm <source> [--trace]
  rstorm (-h | --help)

Options:
  -h --help    Show this screen.
  --trace      Write the classification trace to stderr.
";

fn main() {
    env_logger::init();
    let args = Docopt::new(USAGE).and_then(|d| d.parse()).unwrap_or_else(|e| e.exit());
    let script_filename = args.get_str("<source>");
    let script_string =
        std::fs::read_to_string(script_filename).expect("could not load given file");
    let types = TypeTable::builtin();
    let mut stderr = std::io::stderr();
    let trace = if args.get_bool("--trace") { Trace::to(&mut stderr) } else { Trace::off() };
    match lex_source(&script_string, &types, trace) {
        Ok(ir) => print!("{}", ir),
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
