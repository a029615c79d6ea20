// Lup: command-line front end for checking Lup scripts

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::style::Stylize;
use tracing_subscriber::EnvFilter;

use lup::observer::Observer;
use lup::parser::Token;
use lup::render::{RenderStyle, Renderer};
use lup::CompilerError;

/// Lex, parse and type check a Lup script
#[derive(Parser, Debug)]
#[command(name = "lup", version, about)]
struct Cli {
    /// Source file to check
    path: PathBuf,

    /// Print every token as it is produced
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree
    #[arg(long)]
    ast: bool,

    /// Use the verbose tagged rendering for --ast
    #[arg(long)]
    verbose: bool,

    /// Print the scope tree built by the type checker
    #[arg(long)]
    scopes: bool,
}

/// Prints tokens as the lexer emits them
struct TokenDump {
    enabled: bool,
}

impl Observer for TokenDump {
    fn token(&mut self, token: &Token) {
        if self.enabled {
            println!(
                "{:>4}:{:<4} {}",
                token.position.line, token.position.column, token
            );
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lup=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let source = match fs::read_to_string(&cli.path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!(
                "{} could not read '{}': {}",
                "error:".red().bold(),
                cli.path.display(),
                e
            );
            return ExitCode::FAILURE;
        }
    };

    let mut dump = TokenDump {
        enabled: cli.tokens,
    };
    let analysis = match lup::compile_with(&source, &mut dump) {
        Ok(analysis) => analysis,
        Err(err) => {
            report(&cli.path, &source, &err);
            return ExitCode::FAILURE;
        }
    };

    if cli.ast {
        let style = if cli.verbose {
            RenderStyle::Verbose
        } else {
            RenderStyle::Compact
        };
        println!("{}", Renderer::new(style).program(&analysis.program));
    }

    if cli.scopes {
        print!("{}", analysis.scopes);
    }

    eprintln!(
        "{} {} ({} statements)",
        "ok:".green().bold(),
        cli.path.display(),
        analysis.program.len()
    );
    ExitCode::SUCCESS
}

/// Print a diagnostic with the offending source line and a caret under the
/// reported column
fn report(path: &std::path::Path, source: &str, err: &CompilerError) {
    let label = if err.is_internal() {
        "internal error:"
    } else {
        "error:"
    };
    eprintln!("{} {}", label.red().bold(), err);

    let line_no = err.position.line;
    if let Some(line) = source.lines().nth(line_no.saturating_sub(1)) {
        let gutter = format!("{} |", line_no);
        eprintln!(" {} {}:{}:{}", "-->".blue(), path.display(), line_no, err.position.column);
        eprintln!(" {} {}", gutter.clone().blue(), line);
        eprintln!(
            " {}{} {}",
            " ".repeat(gutter.len() - 1),
            "|".blue(),
            format!("{}^", " ".repeat(err.position.column)).red().bold()
        );
    }
}
