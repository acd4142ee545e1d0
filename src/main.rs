use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context};
use clap::{crate_version, App, Arg};
use kaleidoscope::{lexer, ASTNode, ParseError, Parser, Sink};

/// Prints each node to stdout and each error to stderr as soon as it arrives.
struct Printer;

impl Sink for Printer {
    fn handle_node(&mut self, node: ASTNode) {
        println!("{}", node);
    }

    fn handle_error(&mut self, error: ParseError) {
        eprintln!("error: {}", error);
    }
}

fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();

    let matches = App::new("kaleidoscope")
        .version(crate_version!())
        .about("parses kaleidoscope source and prints its syntax tree")
        .arg(
            Arg::with_name("INPUT")
                .help("source file to parse, standard input when omitted")
                .index(1),
        )
        .arg(
            Arg::with_name("tokens")
                .short("t")
                .long("tokens")
                .help("print the token stream before parsing"),
        )
        .get_matches();

    let (source, source_name) = match matches.value_of("INPUT") {
        Some(path) => (
            fs::read(path).with_context(|| format!("failed to read {}", path))?,
            path.to_string(),
        ),
        None => {
            let mut source = Vec::new();
            io::stdin()
                .read_to_end(&mut source)
                .context("failed to read standard input")?;
            (source, "stdin".to_string())
        }
    };

    let tokens = lexer::tokenize_bytes(&source, &source_name)?;
    if matches.is_present("tokens") {
        println!("Tokens: {}", lexer::render(&tokens));
    }

    let errors = kaleidoscope::run(&Parser::default(), &tokens, &mut Printer);
    if errors > 0 {
        bail!("{} statement(s) failed to parse", errors);
    }

    Ok(())
}
