use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use rextest_core::{
    ClipboardError, ClipboardSink, FlagSet, Highlight, Inputs, MatchViewState, PatternSpec,
    ViewMode, ViewState, compute_match_state, copy_view, inspect,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, ExitCode, Stdio};
use tracing::debug;
use tracing::level_filters::LevelFilter;

const LOG_LEVEL_ENV_VAR: &str = "REXTEST_LOG";

/// Exit code for patterns or flags that fail to compile
const EXIT_COMPILE: u8 = 1;
/// Exit code for unreadable input
const EXIT_IO: u8 = 2;

#[derive(Parser)]
#[command(name = "rextest")]
#[command(about = "Rextest - try regex patterns and replacements against text")]
#[command(version)]
struct Cli {
    /// When to use colored output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, global = true)]
    color: ColorChoice,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[derive(Args)]
struct SubjectArgs {
    /// The text to search
    #[arg(short, long, conflicts_with = "file")]
    text: Option<String>,
    /// Read the text to search from a file
    #[arg(long)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every match of a pattern in the text (stdin when no text is given)
    Match {
        /// The regex pattern
        pattern: String,
        /// Flags such as "gi"
        #[arg(short, long, default_value = "g")]
        flags: String,
        #[command(flatten)]
        subject: SubjectArgs,
        /// Show capture groups
        #[arg(short, long)]
        verbose: bool,
        /// Copy the matched texts to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Replace matches of a pattern using a `$` template
    Replace {
        /// The regex pattern
        pattern: String,
        /// The replacement template (`$1`, `$<name>`, `$&`, ...)
        template: String,
        /// Flags such as "gi"
        #[arg(short, long, default_value = "g")]
        flags: String,
        #[command(flatten)]
        subject: SubjectArgs,
        /// Copy the output to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Show how a pattern is compiled
    Inspect {
        /// The regex pattern
        pattern: String,
        /// Flags such as "gi"
        #[arg(short, long, default_value = "")]
        flags: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match cli.color {
        ColorChoice::Auto => colored::control::unset_override(),
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Never => colored::control::set_override(false),
    }

    let result = match cli.command {
        Commands::Match {
            pattern,
            flags,
            subject,
            verbose,
            copy,
        } => cmd_match(&pattern, &flags, &subject, verbose, copy),
        Commands::Replace {
            pattern,
            template,
            flags,
            subject,
            copy,
        } => cmd_replace(&pattern, &template, &flags, &subject, copy),
        Commands::Inspect { pattern, flags } => cmd_inspect(&pattern, &flags),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::from(EXIT_IO)
        }
    }
}

fn init_logging() {
    let level = match std::env::var(LOG_LEVEL_ENV_VAR) {
        Ok(s) => s.parse().unwrap_or(LevelFilter::WARN),
        Err(_) => LevelFilter::WARN,
    };
    let builder = tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_writer(io::stderr)
        .with_max_level(level);

    if let Err(e) = builder.try_init() {
        eprintln!("unable to install a tracing subscriber: {}", e);
    }
}

/// Print a compile failure and return the matching exit code
fn compile_failed(message: &str) -> ExitCode {
    eprintln!("{} {}", "Error:".red().bold(), message);
    ExitCode::from(EXIT_COMPILE)
}

fn read_subject(args: &SubjectArgs) -> Result<String> {
    if let Some(text) = &args.text {
        return Ok(text.clone());
    }
    match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => io::read_to_string(io::stdin()).context("failed to read text from stdin"),
    }
}

/// Compose inputs and run the pipeline; `Err` carries the exit code of a
/// compile failure that has already been reported
fn run_pipeline(
    pattern: &str,
    flags: &str,
    subject: String,
    template: String,
    mode: ViewMode,
) -> std::result::Result<ViewState, ExitCode> {
    let flags: FlagSet = flags
        .parse()
        .map_err(|e: rextest_core::FlagError| compile_failed(&e.to_string()))?;
    let inputs = Inputs {
        spec: PatternSpec::new(pattern, flags),
        subject,
        template,
        mode,
    };
    match compute_match_state(&inputs) {
        ViewState::Error(failure) => {
            if let Some(position) = failure.position {
                eprintln!("  {}", pattern);
                eprintln!("  {}{}", " ".repeat(position), "^".red().bold());
            }
            Err(compile_failed(&failure.message))
        }
        state => Ok(state),
    }
}

fn cmd_match(
    pattern: &str,
    flags: &str,
    subject: &SubjectArgs,
    verbose: bool,
    copy: bool,
) -> Result<ExitCode> {
    let text = read_subject(subject)?;
    let state = match run_pipeline(pattern, flags, text, String::new(), ViewMode::Match) {
        Ok(state) => state,
        Err(code) => return Ok(code),
    };

    match &state {
        ViewState::Match(view) => print_matches(view, verbose),
        ViewState::Idle => println!("{}", "Empty pattern, nothing to match".yellow()),
        _ => {}
    }

    if copy {
        copy_to_clipboard(&state);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_matches(view: &MatchViewState, verbose: bool) {
    let mut highlighted = String::new();
    for segment in &view.segments {
        let text = match segment.kind {
            Highlight::Matched => segment.text.black().on_yellow().to_string(),
            Highlight::Plain => segment.text.clone(),
        };
        highlighted.push_str(&text);
    }
    println!("{}", highlighted);
    println!();

    if view.is_empty() {
        println!("{}", "✗ No match".red());
        return;
    }

    println!(
        "{} {}",
        "Found".bold(),
        format!("{} match(es)", view.matches.len()).green()
    );
    for (i, m) in view.matches.matches.iter().enumerate() {
        println!(
            "  [{}] {}..{} = {}",
            i + 1,
            m.start,
            m.end,
            format!("{:?}", m.text).green()
        );
        if verbose {
            for group in view.matches.groups_for(i) {
                let label = match &group.name {
                    Some(name) => format!("group {} <{}>", group.index, name),
                    None => format!("group {}", group.index),
                };
                println!(
                    "      {}: {}..{} = {}",
                    label.cyan(),
                    group.start,
                    group.end,
                    format!("{:?}", group.text).green()
                );
            }
        }
    }
}

fn cmd_replace(
    pattern: &str,
    template: &str,
    flags: &str,
    subject: &SubjectArgs,
    copy: bool,
) -> Result<ExitCode> {
    let text = read_subject(subject)?;
    let state = match run_pipeline(
        pattern,
        flags,
        text.clone(),
        template.to_string(),
        ViewMode::Replace,
    ) {
        Ok(state) => state,
        Err(code) => return Ok(code),
    };

    match &state {
        ViewState::Replace(view) => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(view.output.as_bytes())
                .and_then(|_| stdout.flush())
                .context("failed to write output")?;
            if view.is_unchanged() {
                eprintln!("{}", "No match; text unchanged".yellow());
            } else {
                debug!(replaced = view.replaced, "replacement written");
            }
        }
        ViewState::Idle => {
            print!("{}", text);
            eprintln!("{}", "Empty pattern; text unchanged".yellow());
        }
        _ => {}
    }

    if copy {
        copy_to_clipboard(&state);
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_inspect(pattern: &str, flags: &str) -> Result<ExitCode> {
    let flags: FlagSet = match flags.parse() {
        Ok(flags) => flags,
        Err(e) => return Ok(compile_failed(&e.to_string())),
    };
    match inspect(pattern, flags) {
        Ok(report) => {
            println!("{}", "Pattern Report".bold());
            println!("{}", "==============".bold());
            println!("{}", report);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(compile_failed(&e.to_string())),
    }
}

/// Best effort: a failed copy is reported and otherwise ignored
fn copy_to_clipboard(state: &ViewState) {
    match copy_view(state, &mut SystemClipboard) {
        Ok(bytes) => eprintln!("{}", format!("Copied {} bytes to the clipboard", bytes).green()),
        Err(e) => eprintln!("{} {}", "Warning:".yellow().bold(), e),
    }
}

/// Clipboard commands tried in order
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard", "-i"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

/// The platform clipboard, reached through its command line tools
struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn write_text(&mut self, text: &str) -> std::result::Result<(), ClipboardError> {
        for &(program, args) in CLIPBOARD_COMMANDS {
            let spawned = Command::new(program)
                .args(args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();
            let mut child = match spawned {
                Ok(child) => child,
                Err(e) => {
                    debug!(program, error = %e, "clipboard command unavailable");
                    continue;
                }
            };

            // stdin is closed when the handle drops, before waiting
            let written = match child.stdin.take() {
                Some(mut stdin) => stdin.write_all(text.as_bytes()),
                None => Err(io::Error::other("clipboard command has no stdin")),
            };
            let status = child
                .wait()
                .map_err(|e| ClipboardError::Write(e.to_string()))?;
            written.map_err(|e| ClipboardError::Write(e.to_string()))?;
            if !status.success() {
                return Err(ClipboardError::Write(format!(
                    "{} exited with {}",
                    program, status
                )));
            }
            return Ok(());
        }
        Err(ClipboardError::Unavailable(
            "no clipboard command found".to_string(),
        ))
    }
}
