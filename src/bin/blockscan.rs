//! Command-line interface for blockscan
//! Reads a text file and prints what the scanners find in it.
//!
//! Usage:
//!   blockscan tokenize `<path>`                                   - Tokenize every line
//!   blockscan extract `<path>` [--style TOKEN[:INDEX]]...          - Collect labeled values
//!   blockscan nested `<path>` --definition TOKEN --attr TOKEN...   - Group attributes by definition
//!   blockscan outline `<path>` [--strict]                          - Print the block tree
//!   blockscan strip `<path>` --start RE --enter RE --exit RE       - Drop matching blocks
//!
//! Global options: --config `<file>`, --format treeviz|json|yaml, -v (repeatable).

use std::path::{Path, PathBuf};

use blockscan::blockscan::config::{Loader, ScanConfig};
use blockscan::blockscan::extraction::{extract_many, extract_nested, NestedMode};
use blockscan::blockscan::formats::{
    render_nested, render_token_values, render_tokens, render_tree, FormatError, OutputFormat,
};
use blockscan::blockscan::lexing::TokenStyle;
use blockscan::blockscan::parsing::{parse_blocks, parse_blocks_strict, strip_blocks, Section};
use blockscan::blockscan::tree::Tree;
use blockscan::blockscan::ParseError;
use clap::{Arg, ArgAction, ArgMatches, Command};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, info};

/// `TOKEN` or `TOKEN:INDEX`
static STYLE_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([^:]+)(?::(\d+))?$").unwrap());

#[derive(Debug, Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("invalid style '{0}' (expected TOKEN or TOKEN:INDEX)")]
    Style(String),
}

fn main() {
    let matches = cli().get_matches();
    init_logging(matches.get_count("verbose"));

    match run(&matches) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn cli() -> Command {
    let path = || {
        Arg::new("path")
            .help("Path to the file to scan")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .index(1)
    };

    Command::new("blockscan")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tokenize lines, extract labeled values and outline nested blocks")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(clap::value_parser!(PathBuf))
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .global(true)
                .help("Output format: treeviz, json or yaml"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Log more (-v debug, -vv trace)"),
        )
        .subcommand(
            Command::new("tokenize")
                .about("Split every line into tokens")
                .arg(path()),
        )
        .subcommand(
            Command::new("extract")
                .about("Collect the values of labeled lines")
                .arg(path())
                .arg(
                    Arg::new("style")
                        .long("style")
                        .short('s')
                        .action(ArgAction::Append)
                        .help("Token to look for, optionally with the value index (TOKEN:INDEX)"),
                ),
        )
        .subcommand(
            Command::new("nested")
                .about("Group attribute values under the definition they follow")
                .arg(path())
                .arg(
                    Arg::new("definition")
                        .long("definition")
                        .short('d')
                        .required(true)
                        .help("Token that starts a definition"),
                )
                .arg(
                    Arg::new("attr")
                        .long("attr")
                        .short('a')
                        .required(true)
                        .action(ArgAction::Append)
                        .help("Attribute token collected under the current definition"),
                )
                .arg(
                    Arg::new("by-first-attribute")
                        .long("by-first-attribute")
                        .action(ArgAction::SetTrue)
                        .help("Key groups by the value of the first attribute instead"),
                ),
        )
        .subcommand(
            Command::new("outline")
                .about("Print the tree of key blocks")
                .arg(path())
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .action(ArgAction::SetTrue)
                        .help("Fail on unbalanced blocks"),
                ),
        )
        .subcommand(
            Command::new("strip")
                .about("Print the file without the blocks starting at matching lines")
                .arg(path())
                .arg(
                    Arg::new("start")
                        .long("start")
                        .required(true)
                        .help("Pattern of the lines that start a dropped block"),
                )
                .arg(
                    Arg::new("enter")
                        .long("enter")
                        .required(true)
                        .help("Pattern counted as one level deeper"),
                )
                .arg(
                    Arg::new("exit")
                        .long("exit")
                        .required(true)
                        .help("Pattern counted as one level shallower"),
                ),
        )
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_str())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(matches: &ArgMatches) -> Result<String, CliError> {
    let config = load_config(matches)?;
    let format = config.output.format;

    match matches.subcommand() {
        Some(("tokenize", sub)) => handle_tokenize(sub, &config, format),
        Some(("extract", sub)) => handle_extract(sub, &config, format),
        Some(("nested", sub)) => handle_nested(sub, format),
        Some(("outline", sub)) => handle_outline(sub, &config, format),
        Some(("strip", sub)) => handle_strip(sub),
        _ => unreachable!(),
    }
}

fn load_config(matches: &ArgMatches) -> Result<ScanConfig, CliError> {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<PathBuf>("config") {
        debug!(path = %path.display(), "layering config file");
        loader = loader.with_file(path);
    }
    if let Some(format) = matches.get_one::<String>("format") {
        let format: OutputFormat = format.parse()?;
        loader = loader.set_override("output.format", format.name())?;
    }
    Ok(loader.build()?)
}

fn read_lines(path: &Path) -> Result<Vec<String>, CliError> {
    let source = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    info!(path = %path.display(), lines = lines.len(), "read input");
    Ok(lines)
}

fn path_arg(matches: &ArgMatches) -> &Path {
    matches
        .get_one::<PathBuf>("path")
        .map(PathBuf::as_path)
        .expect("path is a required argument")
}

fn handle_tokenize(
    matches: &ArgMatches,
    config: &ScanConfig,
    format: OutputFormat,
) -> Result<String, CliError> {
    let tokenizer = config.tokenizer.tokenizer();
    let tokens = read_lines(path_arg(matches))?
        .iter()
        .map(|line| tokenizer.tokenize(line))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(render_tokens(&tokens, format)?)
}

fn handle_extract(
    matches: &ArgMatches,
    config: &ScanConfig,
    format: OutputFormat,
) -> Result<String, CliError> {
    let styles = match matches.get_many::<String>("style") {
        Some(args) => args
            .map(|arg| parse_style(arg))
            .collect::<Result<Vec<_>, _>>()?,
        None => config.styles.clone(),
    };
    debug!(styles = styles.len(), "extracting");

    let lines = read_lines(path_arg(matches))?;
    let values = extract_many(&lines, &styles, config.tokenizer.preserve_case)?;
    Ok(render_token_values(&values, format)?)
}

fn parse_style(arg: &str) -> Result<TokenStyle, CliError> {
    let captures = STYLE_ARG
        .captures(arg)
        .ok_or_else(|| CliError::Style(arg.to_string()))?;
    let style = TokenStyle::new(&captures[1]);
    match captures.get(2) {
        Some(index) => {
            let index = index
                .as_str()
                .parse()
                .map_err(|_| CliError::Style(arg.to_string()))?;
            Ok(style.with_value_index(index))
        }
        None => Ok(style),
    }
}

fn handle_nested(matches: &ArgMatches, format: OutputFormat) -> Result<String, CliError> {
    let definition = matches
        .get_one::<String>("definition")
        .expect("definition is a required argument");
    let attributes: Vec<&String> = matches
        .get_many::<String>("attr")
        .map(|values| values.collect())
        .unwrap_or_default();
    let mode = if matches.get_flag("by-first-attribute") {
        NestedMode::ByFirstAttributeValue
    } else {
        NestedMode::ByDefinitionValue
    };

    let lines = read_lines(path_arg(matches))?;
    let values = extract_nested(&lines, definition, &attributes, mode)?;
    Ok(render_nested(&values, format)?)
}

fn handle_outline(
    matches: &ArgMatches,
    config: &ScanConfig,
    format: OutputFormat,
) -> Result<String, CliError> {
    let hooks = config.blocks.hooks()?;
    let lines = read_lines(path_arg(matches))?;
    let mut tree = Tree::new(Section::root(config.blocks.root.as_str()));

    let summary = if matches.get_flag("strict") {
        parse_blocks_strict(&lines, &mut tree, hooks)?
    } else {
        parse_blocks(&lines, &mut tree, hooks)
    };
    debug!(?summary, nodes = tree.node_count(), "outline done");

    let mut output = render_tree(&tree, format)?;
    if !output.ends_with('\n') {
        output.push('\n');
    }
    Ok(output)
}

fn handle_strip(matches: &ArgMatches) -> Result<String, CliError> {
    let pattern = |name: &str| -> Result<Regex, CliError> {
        let source = matches
            .get_one::<String>(name)
            .expect("pattern arguments are required");
        Ok(Regex::new(source)?)
    };
    let start = pattern("start")?;
    let enter = pattern("enter")?;
    let exit = pattern("exit")?;
    let net = |line: &str| enter.find_iter(line).count() as i32 - exit.find_iter(line).count() as i32;

    let lines = read_lines(path_arg(matches))?;
    let kept = strip_blocks(&lines, |line| start.is_match(line), net, net);

    let mut output = String::new();
    for line in kept {
        output.push_str(line);
        output.push('\n');
    }
    Ok(output)
}
