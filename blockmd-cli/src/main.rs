// Command-line interface for blockmd
//
// Converts between cloud-document block JSON and Markdown. The conversion itself lives in
// blockmd-babel; this binary reads the input, resolves formats and configuration, and writes
// the result. Nothing here talks to the document platform: fetched JSON comes in as a file or
// on stdin, and the JSON produced for uploads goes to stdout or a file.
//
// Converting:
//
// The source format is auto-detected from the input extension and can be overridden with
// --from. Reading from stdin ("-") always needs --from.
// Usage:
//  blockmd <input> --to <format> [--from <format>] [-o <file>] [--flat]  - Convert (default)
//  blockmd convert <input> --to <format> ...                              - Same as above
//  blockmd --list-formats                                                 - List formats
//
// Extra Parameters:
//
// --extra-<key> <value> overrides the `convert.<key>` configuration key for one run. Dashes
// become underscores and dots select nested tables.
// Example:
//  blockmd notes.md --to blocks --extra-default-title Inbox --extra-table.char-width 12

mod error;

use blockmd_babel::format::Format;
use blockmd_babel::{markdown_to_flat, BlocksFormat, FormatRegistry, MarkdownFormat, ScanOptions};
use blockmd_config::{BlockmdConfig, Loader};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use error::CliError;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

/// Input path meaning "read standard input".
const STDIN: &str = "-";

/// Configuration file picked up from the working directory when present.
const LOCAL_CONFIG: &str = "blockmd.toml";

/// `convert.*` keys that `--extra-*` may override.
const CONVERT_KEYS: &[&str] = &[
    "default_title",
    "table.min_column_width",
    "table.max_column_width",
    "table.char_width",
];

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
/// - `--extras-<key>` (alias for `--extra-<key>`)
///
/// Negative numbers after the key are values, not flags.
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        let key = arg
            .strip_prefix("--extra-")
            .or_else(|| arg.strip_prefix("--extras-"));

        if let Some(key) = key {
            let value = args.get(i + 1).filter(|next| !is_flag(next));
            match value {
                Some(value) => {
                    extra_params.insert(key.to_string(), value.clone());
                    i += 2;
                }
                None => {
                    extra_params.insert(key.to_string(), "true".to_string());
                    i += 1;
                }
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

/// A dash-prefixed argument that is not a number, such as `-o` or `--to`.
fn is_flag(arg: &str) -> bool {
    arg.starts_with('-') && arg.parse::<f64>().is_err()
}

fn build_cli() -> Command {
    Command::new("blockmd")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert cloud-document block trees to Markdown and back")
        .long_about(
            "blockmd converts between a cloud document's block JSON and Markdown.\n\n\
            Formats:\n  \
            - blocks:   platform block tree as JSON (.json)\n  \
            - markdown: Markdown (.md, .markdown)\n\n\
            Extra Parameters:\n  \
            Use --extra-<key> <value> to override a convert.<key> setting for one run.\n\n\
            Examples:\n  \
            blockmd doc.json --to markdown             # Render a fetched document\n  \
            blockmd notes.md --to blocks -o tree.json  # Build a block tree for upload\n  \
            blockmd notes.md --to blocks --flat        # Unlinked blocks for appending\n  \
            cat doc.json | blockmd - --from blocks --to markdown",
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
        .arg(
            Arg::new("list-formats")
                .long("list-formats")
                .help("List available formats")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to a blockmd.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert between document formats (default command)")
                .long_about(
                    "Convert documents between block JSON and Markdown.\n\n\
                    The source format is auto-detected from the file extension.\n\
                    Output goes to stdout by default, or use -o to specify a file.\n\n\
                    Examples:\n  \
                    blockmd convert doc.json --to markdown\n  \
                    blockmd convert notes.md --to blocks -o tree.json\n  \
                    blockmd doc.json --to markdown   # 'convert' is optional",
                )
                .arg(
                    Arg::new("input")
                        .help("Input file path, or - for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Source format (auto-detected from file extension if not specified)")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .help("Target format (required)")
                        .required(true)
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("flat")
                        .long("flat")
                        .help("Emit unlinked blocks for appending (markdown to blocks only)")
                        .action(ArgAction::SetTrue),
                ),
        )
}

/// Parse arguments, treating a leading input path as an implicit `convert`.
fn parse_args(cli: Command, args: &[String]) -> Result<ArgMatches, clap::Error> {
    match cli.clone().try_get_matches_from(args) {
        Ok(matches) => Ok(matches),
        Err(err) => {
            let implicit_convert = args.get(1).is_some_and(|first| {
                (first == STDIN || !first.starts_with('-'))
                    && first != "convert"
                    && first != "help"
            });
            if !implicit_convert {
                return Err(err);
            }
            let mut injected = vec![args[0].clone(), "convert".to_string()];
            injected.extend_from_slice(&args[1..]);
            cli.try_get_matches_from(&injected)
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (cleaned_args, extra_params) = parse_extra_args(&args);

    let matches = parse_args(build_cli(), &cleaned_args).unwrap_or_else(|err| err.exit());

    let config_path = matches.get_one::<String>("config").map(String::as_str);
    let config = load_cli_config(config_path, &extra_params).unwrap_or_else(|err| {
        eprintln!("Error: {err}");
        std::process::exit(1);
    });
    init_logging(&config.log.level);

    if let Err(err) = run(&matches, &config) {
        tracing::debug!(error = ?err, "command failed");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so converted output on stdout stays clean. `RUST_LOG` wins over the config.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(matches: &ArgMatches, config: &BlockmdConfig) -> Result<(), CliError> {
    let options = ScanOptions::from(&config.convert);
    let registry = FormatRegistry::with_markdown(MarkdownFormat::new(options.clone()));

    if matches.get_flag("list-formats") {
        print!("{}", list_formats(&registry));
        return Ok(());
    }

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            let input = sub_matches
                .get_one::<String>("input")
                .map(String::as_str)
                .unwrap_or(STDIN);
            let to = sub_matches
                .get_one::<String>("to")
                .map(String::as_str)
                .unwrap_or_default();
            let from = match sub_matches.get_one::<String>("from") {
                Some(from) => from.clone(),
                None => detect_source_format(&registry, input)?,
            };
            let output = sub_matches.get_one::<String>("output").map(String::as_str);

            let converted = if sub_matches.get_flag("flat") {
                convert_flat(&registry, input, &from, to, &options)?
            } else {
                convert(&registry, input, &from, to)?
            };
            write_output(output, &converted)
        }
        _ => Err(CliError::Validation(
            "unknown subcommand, use --help for usage information".to_string(),
        )),
    }
}

fn detect_source_format(registry: &FormatRegistry, input: &str) -> Result<String, CliError> {
    if input == STDIN {
        return Err(CliError::Validation(
            "reading from stdin requires --from".to_string(),
        ));
    }
    registry
        .detect_format_from_filename(input)
        .ok_or_else(|| CliError::UndetectedFormat(input.to_string()))
}

/// Handle the convert command
fn convert(registry: &FormatRegistry, input: &str, from: &str, to: &str) -> Result<String, CliError> {
    // Validate formats before touching the input.
    registry.get(from)?;
    registry.get(to)?;

    let source = read_input(input)?;
    tracing::info!(input, from, to, bytes = source.len(), "converting");
    Ok(registry.convert(&source, from, to)?)
}

/// Markdown into unlinked blocks, for appending under an existing document.
fn convert_flat(
    registry: &FormatRegistry,
    input: &str,
    from: &str,
    to: &str,
    options: &ScanOptions,
) -> Result<String, CliError> {
    registry.get(from)?;
    registry.get(to)?;
    if from != "markdown" || to != "blocks" {
        return Err(CliError::Validation(format!(
            "--flat only converts markdown to blocks, not {from} to {to}"
        )));
    }

    let source = read_input(input)?;
    let flat = markdown_to_flat(&source, options);
    tracing::info!(input, blocks = flat.blocks.len(), "converting to flat blocks");
    Ok(BlocksFormat::default().serialize_flat(&flat)?)
}

fn read_input(input: &str) -> Result<String, CliError> {
    if input == STDIN {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .map_err(|source| CliError::Read {
                path: "<stdin>".to_string(),
                source,
            })?;
        return Ok(source);
    }
    fs::read_to_string(input).map_err(|source| CliError::Read {
        path: input.to_string(),
        source,
    })
}

fn write_output(output: Option<&str>, text: &str) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(path, text).map_err(|source| CliError::Write {
            path: path.to_string(),
            source,
        }),
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn list_formats(registry: &FormatRegistry) -> String {
    let mut out = String::from("Available formats:\n");
    for (name, description) in registry.describe_formats() {
        let extensions = registry
            .get(&name)
            .map(|format| format.file_extensions().join(", "))
            .unwrap_or_default();
        out.push_str(&format!("  {name:<10}{description} [{extensions}]\n"));
    }
    out
}

/// Configuration key for an `--extra-<key>` name.
fn config_key(extra: &str) -> Result<String, CliError> {
    let key = extra.replace('-', "_");
    if !CONVERT_KEYS.contains(&key.as_str()) {
        return Err(CliError::Validation(format!(
            "unknown parameter --extra-{extra} (known: {})",
            CONVERT_KEYS.join(", ")
        )));
    }
    Ok(format!("convert.{key}"))
}

fn load_cli_config(
    explicit_path: Option<&str>,
    extra_params: &HashMap<String, String>,
) -> Result<BlockmdConfig, CliError> {
    let mut loader = Loader::new().with_optional_file(LOCAL_CONFIG);
    if let Some(path) = explicit_path {
        loader = loader.with_file(path);
    }
    for (extra, value) in extra_params {
        loader = loader.set_override(&config_key(extra)?, value.as_str())?;
    }
    Ok(loader.build()?)
}
