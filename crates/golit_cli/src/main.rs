//! golit: Scan Go source and check literal fixtures.
//!
//! Usage:
//!   golit scan FILE [--comments] [--semicolons] [--json]
//!   golit lit LITERAL
//!   golit check [PATH...] [--config golit.json] [--json] [--fail-fast]
//!
//! Exit status is 0 on success, 1 when the input has errors or fixtures
//! fail, and 2 when the tool itself could not run.

mod logging;

use clap::{Parser as ClapParser, Subcommand};
use golit_core::text::{LineMap, TextSpan};
use golit_diagnostics::{to_report, Diagnostic, DiagnosticCollection};
use golit_fixture::{run_all, CaseOutcome, HarnessConfig, RunReport};
use golit_scanner::{literal, tokenize, ScanMode, Scanner, TokenInfo, TokenKind};
use miette::{IntoDiagnostic, WrapErr};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;

#[derive(ClapParser, Debug)]
#[command(name = "golit", version, about = "golit - Go literal scanner and fixture checker")]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tokens and diagnostics of a Go source file.
    Scan {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Include comments as tokens.
        #[arg(long)]
        comments: bool,

        /// Insert automatic semicolons at line ends.
        #[arg(long)]
        semicolons: bool,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Scan a single literal and print its decoded value.
    Lit {
        #[arg(value_name = "LITERAL", allow_hyphen_values = true)]
        literal: String,
    },

    /// Run literal fixture files.
    Check {
        /// Fixture files or directories (default: from golit.json).
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Path to golit.json.
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Print the report as JSON.
        #[arg(long)]
        json: bool,

        /// Stop at the first failing case.
        #[arg(long = "fail-fast")]
        fail_fast: bool,
    },
}

const EXIT_OK: i32 = 0;
const EXIT_FAILED: i32 = 1;
const EXIT_ERROR: i32 = 2;

// ANSI color codes
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = Cli::parse();
    logging::init(logging::Verbosity::from_flags(cli.verbose, cli.quiet));

    let result = match cli.command {
        Command::Scan {
            ref file,
            comments,
            semicolons,
            json,
        } => {
            let mode = ScanMode {
                keep_comments: comments,
                insert_semicolons: semicolons,
            };
            run_scan(file, mode, json)
        }
        Command::Lit { ref literal } => Ok(run_lit(literal)),
        Command::Check {
            ref paths,
            ref config,
            json,
            fail_fast,
        } => run_check(paths, config.as_deref(), json, fail_fast),
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(report) => {
            eprintln!("{:?}", report);
            EXIT_ERROR
        }
    };
    process::exit(exit_code);
}

// ============================================================================
// scan
// ============================================================================

/// Scan a whole source text, decoding literal values so that overflow and
/// infinite floats are reported too.
fn scan_source(source: &str, name: &str, mode: ScanMode) -> (Vec<TokenInfo>, DiagnosticCollection) {
    let mut scanner = Scanner::with_mode(source, mode);
    scanner.set_file_name(name);
    let mut tokens = Vec::new();
    let mut value_diagnostics = DiagnosticCollection::new();
    while scanner.scan() != TokenKind::EndOfFile {
        let token = scanner.token_info();
        if token.kind.is_literal() && !token.is_invalid() {
            let span = TextSpan::from_bounds(token.pos, token.end);
            literal::decode_checked(token.kind, &token.text, span, &mut value_diagnostics);
        }
        tokens.push(token);
    }

    let mut diagnostics = scanner.take_diagnostics();
    value_diagnostics.set_file(name);
    diagnostics.extend(value_diagnostics);
    diagnostics.sort();
    diagnostics.resolve_positions(&LineMap::new(source));
    (tokens, diagnostics)
}

fn run_scan(file: &Path, mode: ScanMode, json: bool) -> miette::Result<i32> {
    let source = std::fs::read_to_string(file)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {}", file.display()))?;
    let name = file.display().to_string();
    let (tokens, diagnostics) = scan_source(&source, &name, mode);
    tracing::info!(tokens = tokens.len(), diagnostics = diagnostics.len(), "scanned {}", name);

    let line_map = LineMap::new(&source);
    if json {
        println!("{}", scan_json(&tokens, &diagnostics, &line_map));
    } else {
        for token in &tokens {
            println!("{}", format_token(token, &line_map));
        }
        print_diagnostics(&diagnostics, &name, &source);
    }

    Ok(if diagnostics.has_errors() { EXIT_FAILED } else { EXIT_OK })
}

/// `line:col kind text`, with control characters escaped so that each token
/// stays on one line.
fn format_token(token: &TokenInfo, line_map: &LineMap) -> String {
    let position = line_map.position(token.pos);
    let mut text = String::with_capacity(token.text.len());
    for ch in token.text.chars() {
        if ch.is_control() {
            text.extend(ch.escape_default());
        } else {
            text.push(ch);
        }
    }
    format!("{:<8} {:<8} {}", position.to_string(), token.kind.name(), text)
}

fn scan_json(tokens: &[TokenInfo], diagnostics: &DiagnosticCollection, line_map: &LineMap) -> String {
    let tokens: Vec<serde_json::Value> = tokens
        .iter()
        .map(|token| {
            let position = line_map.position(token.pos);
            serde_json::json!({
                "kind": token.kind.name(),
                "text": token.text,
                "line": position.line,
                "column": position.column,
                "invalid": token.is_invalid(),
            })
        })
        .collect();
    let diagnostics: Vec<serde_json::Value> = diagnostics.diagnostics().iter().map(diagnostic_json).collect();
    serde_json::json!({ "tokens": tokens, "diagnostics": diagnostics }).to_string()
}

fn diagnostic_json(diag: &Diagnostic) -> serde_json::Value {
    serde_json::json!({
        "code": diag.code_string(),
        "severity": diag.category.to_string(),
        "message": diag.message_text,
        "line": diag.position.map(|p| p.line),
        "column": diag.position.map(|p| p.column),
    })
}

fn print_diagnostics(diagnostics: &DiagnosticCollection, name: &str, source: &str) {
    for diag in diagnostics.diagnostics() {
        if diag.span.is_some() {
            eprintln!("{:?}", to_report(diag, name, source));
        } else {
            eprintln!("{}", diag);
        }
    }
}

// ============================================================================
// lit
// ============================================================================

fn run_lit(text: &str) -> i32 {
    let (tokens, mut diagnostics) = tokenize(text);
    let token = match tokens.as_slice() {
        [token] if token.kind.is_literal() => Some(token),
        _ => None,
    };

    let value = match token {
        Some(token) if !diagnostics.has_errors() => {
            let span = TextSpan::from_bounds(token.pos, token.end);
            literal::decode_checked(token.kind, &token.text, span, &mut diagnostics)
        }
        _ => None,
    };
    print_diagnostics(&diagnostics, "<literal>", text);

    match (token, value) {
        (Some(token), Some(value)) => {
            println!("{} {}", token.kind.name(), value);
            EXIT_OK
        }
        (Some(token), None) if !diagnostics.has_errors() => {
            print_error(&format!("could not decode {} literal {}", token.kind.name(), token.text));
            EXIT_FAILED
        }
        (None, _) if !diagnostics.has_errors() => {
            let kinds: Vec<&str> = tokens.iter().map(|t| t.kind.name()).collect();
            print_error(&format!("not a single literal (scanned: {})", kinds.join(" ")));
            EXIT_FAILED
        }
        _ => EXIT_FAILED,
    }
}

// ============================================================================
// check
// ============================================================================

fn run_check(paths: &[PathBuf], config_path: Option<&Path>, json: bool, fail_fast: bool) -> miette::Result<i32> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let (mut config, mut root) = match config_path {
        Some(path) => {
            let config = HarnessConfig::load(path).into_diagnostic()?;
            let root = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.clone());
            (config, root)
        }
        None => (HarnessConfig::discover(&cwd).into_diagnostic()?, cwd.clone()),
    };
    // Paths on the command line are relative to the working directory.
    if !paths.is_empty() {
        config.fixtures = Some(paths.to_vec());
        root = cwd;
    }
    if fail_fast {
        config.fail_fast = Some(true);
    }

    let report = run_all(&config, &root)
        .into_diagnostic()
        .wrap_err("could not run fixtures")?;

    if json {
        println!("{}", report.to_json().into_diagnostic()?);
    } else {
        print_report(&report);
    }
    Ok(if report.is_success() { EXIT_OK } else { EXIT_FAILED })
}

fn print_report(report: &RunReport) {
    let color = use_color();
    for (file, case) in report.failures() {
        if let CaseOutcome::Fail { reason, .. } = &case.outcome {
            let location = format!("{}:{}", file.path.display(), case.line);
            if color {
                println!(
                    "{}{}FAIL{} {}{}{} {} {}(expected {}){}: {}",
                    BOLD, RED, RESET, CYAN, location, RESET, case.literal, GRAY, case.expected, RESET, reason
                );
            } else {
                println!("FAIL {} {} (expected {}): {}", location, case.literal, case.expected, reason);
            }
        }
    }

    let summary = format!(
        "{} passed, {} failed, {} total in {} file(s)",
        report.passed(),
        report.failed(),
        report.total(),
        report.files.len()
    );
    if !color {
        println!("{}", summary);
    } else if report.is_success() {
        println!("{}{}{}{}", BOLD, GREEN, summary, RESET);
    } else {
        println!("{}{}{}{}", BOLD, RED, summary, RESET);
    }
}

fn print_error(msg: &str) {
    if use_color() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_subcommands() {
        let cli = Cli::parse_from(["golit", "-vv", "scan", "main.go", "--semicolons", "--json"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Scan {
                file,
                comments,
                semicolons,
                json,
            } => {
                assert_eq!(file, PathBuf::from("main.go"));
                assert!(!comments);
                assert!(semicolons);
                assert!(json);
            }
            other => panic!("unexpected command {:?}", other),
        }

        let cli = Cli::parse_from(["golit", "check", "a.lit", "dir", "--fail-fast", "-q"]);
        assert!(cli.quiet);
        match cli.command {
            Command::Check { paths, fail_fast, .. } => {
                assert_eq!(paths, vec![PathBuf::from("a.lit"), PathBuf::from("dir")]);
                assert!(fail_fast);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_lit_accepts_leading_minus() {
        let cli = Cli::parse_from(["golit", "lit", "-1"]);
        assert!(matches!(cli.command, Command::Lit { ref literal } if literal == "-1"));
    }

    #[test]
    fn test_scan_source_reports_value_problems() {
        let source = "x := 1e999\ny := 0x1_0000_0000_0000_0000_0000_0000_0000_0000\nz := 4__2\n";
        let (tokens, diagnostics) = scan_source(source, "v.go", ScanMode::SOURCE);
        assert_eq!(tokens.len(), 12);
        assert_eq!(diagnostics.codes(), vec![1041, 1040, 1001]);
        let lines: Vec<u32> = diagnostics.diagnostics().iter().filter_map(|d| d.position).map(|p| p.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
        assert!(diagnostics.diagnostics().iter().all(|d| d.file.as_deref() == Some("v.go")));
    }

    #[test]
    fn test_format_token() {
        let source = "s := \"a\\tb\"\n";
        let (tokens, _) = golit_scanner::tokenize_with_mode(source, ScanMode::SOURCE);
        let line_map = LineMap::new(source);
        assert_eq!(format_token(&tokens[1], &line_map), "1:3      operator :=");
        assert_eq!(format_token(&tokens[2], &line_map), "1:6      string   \"a\\tb\"");
        assert_eq!(format_token(&tokens[3], &line_map), "1:12     operator \\n");
    }

    #[test]
    fn test_scan_json_shape() {
        let source = "'\\k'";
        let (tokens, diagnostics) = scan_source(source, "k.go", ScanMode::default());
        let json: serde_json::Value = serde_json::from_str(&scan_json(&tokens, &diagnostics, &LineMap::new(source))).unwrap();
        assert_eq!(json["tokens"][0]["kind"], "char");
        assert_eq!(json["tokens"][0]["invalid"], true);
        assert_eq!(json["diagnostics"][0]["code"], "GL1010");
        assert_eq!(json["diagnostics"][0]["column"], 2);
    }

    #[test]
    fn test_lit_exit_codes() {
        assert_eq!(run_lit("0x_1F"), EXIT_OK);
        assert_eq!(run_lit("'\\400'"), EXIT_FAILED);
        assert_eq!(run_lit("a + b"), EXIT_FAILED);
        // Out of range floats decode to inf with a warning.
        assert_eq!(run_lit("0x1p99999999999999999999"), EXIT_OK);
    }

    #[test]
    fn test_check_with_explicit_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("golit.json"), r#"{ "fixtures": ["cases.lit"] }"#).unwrap();
        std::fs::write(dir.path().join("cases.lit"), "42_ // ERROR GL1001\n0x1p-2 // OK float\n").unwrap();
        let code = run_check(&[], Some(&dir.path().join("golit.json")), true, false).unwrap();
        assert_eq!(code, EXIT_OK);

        std::fs::write(dir.path().join("cases.lit"), "42 // ERROR\n").unwrap();
        let code = run_check(&[], Some(&dir.path().join("golit.json")), true, false).unwrap();
        assert_eq!(code, EXIT_FAILED);

        assert!(run_check(&[], Some(&dir.path().join("missing.json")), true, false).is_err());
    }
}
