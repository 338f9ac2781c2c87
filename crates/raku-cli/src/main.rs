use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use raku_lexer::{Scanner, TokenKind};
use raku_printer::PrintOptions;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "raku")]
#[command(about = "Raku — data definition and scripting language tools")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a .raku file and print its tree
    Parse {
        /// Input .raku file
        path: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Sexpr)]
        format: Format,
    },

    /// Check a .raku file for errors without printing anything
    Check {
        /// Input .raku file
        path: String,
    },

    /// Print the token stream of a .raku file
    Tokens {
        /// Input .raku file
        path: String,

        /// Include whitespace and escaped newlines
        #[arg(long)]
        all: bool,
    },

    /// Reformat a .raku file into canonical layout
    Fmt {
        /// Input .raku file
        path: String,

        /// Spaces per block level
        #[arg(long, default_value_t = PrintOptions::default().indent)]
        indent: usize,

        /// Rewrite the file in place instead of printing
        #[arg(long)]
        write: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Sexpr,
    Json,
    Source,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Parse { path, format } => cmd_parse(&path, format),
        Command::Check { path } => cmd_check(&path),
        Command::Tokens { path, all } => cmd_tokens(&path, all),
        Command::Fmt {
            path,
            indent,
            write,
        } => cmd_fmt(&path, indent, write),
    }
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "raku=warn,raku_parser=warn",
        1 => "raku=info,raku_parser=info",
        2 => "raku=debug,raku_parser=debug",
        _ => "raku=trace,raku_parser=trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

fn read_source(path: &str) -> String {
    let p = Path::new(path);
    if !p.exists() {
        fail(format!("file not found: {path}"));
    }
    debug!(path, "reading source");
    match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => fail(format!("reading {path}: {e}")),
    }
}

fn parse_source(path: &str) -> raku_parser::Tree {
    let source = read_source(path);
    match raku_parser::Parser::parse(&source) {
        Ok(tree) => tree,
        Err(e) => fail(format!("{path}: {e}")),
    }
}

fn cmd_parse(path: &str, format: Format) {
    let tree = parse_source(path);

    let output = match format {
        Format::Sexpr => raku_printer::sexpr::render(&tree),
        Format::Json => match serde_json::to_string_pretty(&raku_printer::to_json(&tree)) {
            Ok(json) => json + "\n",
            Err(e) => fail(e),
        },
        Format::Source => match raku_printer::source::render(&tree, &PrintOptions::default()) {
            Ok(source) => source,
            Err(e) => fail(e),
        },
    };
    print!("{output}");
}

fn cmd_check(path: &str) {
    let tree = parse_source(path);
    let statements = tree.program().map_or(0, |p| tree.children(p).len());
    info!(path, statements, "check passed");
    eprintln!("OK: {path}");
}

fn cmd_tokens(path: &str, all: bool) {
    let source = read_source(path);
    let mut scanner = Scanner::new(&source);
    let skip: &[TokenKind] = if all {
        &[]
    } else {
        &[TokenKind::Whitespace, TokenKind::EscapedNewline]
    };

    loop {
        let token = scanner.lex_skip(skip);
        let position = format!("{}:{}", token.span.line, token.span.column);
        match &token.value {
            Some(value) => println!("{position:>8}  {:<10} {value:?}", token.kind.name()),
            None => println!("{position:>8}  {}", token.kind.name()),
        }
        match token.kind {
            TokenKind::Eof => break,
            TokenKind::Fail => std::process::exit(1),
            _ => {}
        }
    }
}

fn cmd_fmt(path: &str, indent: usize, write: bool) {
    let tree = parse_source(path);
    let output = match raku_printer::source::render(&tree, &PrintOptions { indent }) {
        Ok(output) => output,
        Err(e) => fail(e),
    };

    if write {
        if let Err(e) = std::fs::write(path, &output) {
            fail(format!("writing {path}: {e}"));
        }
        eprintln!("Formatted: {path}");
    } else {
        print!("{output}");
    }
}
