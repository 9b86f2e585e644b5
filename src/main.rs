//! Textplate CLI
//!
//! Usage:
//!   textplate [OPTIONS] [TEMPLATE]...
//!
//! Options:
//!   -s, --set <NAME=VALUE>   Assign an input (repeatable)
//!   -c, --config <FILE>      Node configuration (TOML format)
//!   -l, --language <LANG>    Language for error messages
//!   --inputs                 List generated inputs instead of rendering
//!   -g, --grammar            Show placeholder grammar reference
//!   -h, --help               Print help

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::sync::Once;

use clap::Parser;
use tracing::debug;

use textplate::{Catalog, NodeConfig, PlaceholderNode, ValidationError};

static TRACING_INIT: Once = Once::new();

#[derive(Parser)]
#[command(name = "textplate")]
#[command(about = "Render text templates with typed placeholders")]
struct Cli {
    /// Templates to render (one per stdin line if none are given)
    templates: Vec<String>,

    /// Assign an input by its display name
    #[arg(short = 's', long = "set", value_name = "NAME=VALUE")]
    assignments: Vec<String>,

    /// Node configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Group separator for numbers (may be empty)
    #[arg(long, allow_hyphen_values = true)]
    group: Option<String>,

    /// Decimal separator for numbers and mapping values
    #[arg(long, allow_hyphen_values = true)]
    decimal: Option<String>,

    /// Language for error messages
    #[arg(short, long)]
    language: Option<String>,

    /// Additional message catalog (TOML format)
    #[arg(long)]
    messages: Option<PathBuf>,

    /// List generated inputs instead of rendering
    #[arg(long)]
    inputs: bool,

    /// Show placeholder grammar reference
    #[arg(short, long)]
    grammar: bool,

    /// Accept templates without placeholders
    #[arg(long)]
    allow_plain: bool,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if cli.grammar {
        print_grammar();
        return;
    }

    if cli.templates.is_empty() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => match NodeConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => NodeConfig::default(),
    };
    if let Some(group) = cli.group {
        config.number_format.group_separator = group;
    }
    if let Some(decimal) = cli.decimal {
        config.number_format.decimal_separator = decimal;
    }
    if let Some(language) = cli.language {
        config.language = language;
    }
    if cli.allow_plain {
        config.require_placeholders = false;
    }

    // Load messages
    let mut catalog = Catalog::default();
    if let Some(path) = &cli.messages {
        match Catalog::from_file(path) {
            Ok(custom) => catalog.merge(custom),
            Err(e) => {
                eprintln!("Error loading messages '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
    }

    // Read templates
    let templates = if cli.templates.is_empty() {
        match io::stdin().lock().lines().collect::<Result<Vec<_>, _>>() {
            Ok(lines) => lines,
            Err(e) => {
                eprintln!("Error reading from stdin: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        cli.templates
    };
    debug!(templates = templates.len(), "templates read");

    let mut node = PlaceholderNode::new(config);
    if let Err(e) = node.set_templates(templates.iter().cloned()) {
        fail(&e, &templates, &catalog, &node.config().language);
    }

    for assignment in &cli.assignments {
        let Some((name, raw)) = assignment.split_once('=') else {
            eprintln!("Error: expected NAME=VALUE, got '{}'", assignment);
            std::process::exit(1);
        };
        if let Err(e) = node.set_input(name.trim(), raw) {
            fail(&e, &templates, &catalog, &node.config().language);
        }
    }

    if cli.inputs {
        for (handle, name) in node.input_names() {
            println!("{}\t{}\t{}", handle.kind, handle.index, name);
        }
        return;
    }

    match node.render_all() {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Install a log subscriber when `RUST_LOG` is set
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

/// Print the localized message and, for template errors, a source report
fn fail(err: &ValidationError, templates: &[String], catalog: &Catalog, language: &str) -> ! {
    eprintln!("Error: {}", err.to_result(catalog, language).message);
    if let Some(index) = err.template() {
        if let Some(source) = templates.get(index) {
            eprint!("{}", err.format(source, &format!("template {}", index + 1)));
        }
    }
    std::process::exit(1);
}

fn print_intro() {
    println!(
        r#"Textplate - Render text templates with typed placeholders

USAGE:
    textplate [OPTIONS] [TEMPLATE]...
    echo '<template>' | textplate

OPTIONS:
    -s, --set NAME=VALUE   Assign an input (repeatable)
    -c, --config FILE      Node configuration (TOML file)
    --group SEP            Group separator (default ".")
    --decimal SEP          Decimal separator (default ",")
    -l, --language LANG    Language for error messages (en, de)
    --messages FILE        Additional message catalog (TOML file)
    --inputs               List generated inputs
    --allow-plain          Accept templates without placeholders
    -g, --grammar          Show placeholder grammar reference
    -h, --help             Print help

QUICK START:
    textplate '{{n:I}} {{n:I|0|item|items}}' --set n=1

Run --grammar for the placeholder syntax."#
    );
}

fn print_grammar() {
    println!(
        r#"TEXTPLATE PLACEHOLDER GRAMMAR
=============================

PLACEHOLDERS
------------
{{NAME:FORMAT|MAPPING|...}}   Declare a variable
{{:FORMAT}}                  Declare with a generated name (e.g. "Integer 1")
{{NAME}}                     Reuse an earlier variable with its format
{{NAME:FORMAT}}              Reuse with a different format of the same type

Names start with a letter and may not contain ':', '{{' or '}}'.
A '{{' without a matching '}}' is plain text.

TYPES
-----
B                Boolean, renders 0 / 1
BNY              Boolean with one character for off / on
B|off|on         Boolean with texts for off / on
I                Integer
F[n] N[n]        Number, fixed / grouped with n decimals (default 2)
P[n]             Number as percent
G[n]             Number, shortest or n significant digits
S                Text

NUMERIC MAPPINGS (I, F, N, P, G)
--------------------------------
|a|b|c           Implicit: 0 -> a, 1 -> b, 2 -> c (integers only)
|5=five          Exact value
|0..10=low       Inclusive range
|>0..<10=inner   Exclusive bounds
|..0=negative    Open lower bound
|100..=large     Open upper bound

Implicit and explicit mappings cannot be mixed. The first matching
mapping wins; without a match the formatted value is shown.

TEXT MAPPINGS (S)
-----------------
|old=new         Replace every 'old' with 'new', applied in order

VALUES
------
Unassigned inputs render as '?'.
Booleans accept true, false, 1, 0."#
    );
}
