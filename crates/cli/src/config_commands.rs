use std::path::Path;

use {
    anyhow::{Result, bail},
    clap::Subcommand,
};

use courier_config::{
    Diagnostic,
    validate::{self, Severity},
};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Validate the message defaults and report problems.
    Check {
        /// Also print informational notes.
        #[arg(long)]
        verbose: bool,
    },
    /// Print the effective configuration as JSON.
    Show,
}

pub fn handle_config(action: ConfigAction, path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Check { verbose } => check(path, verbose),
        ConfigAction::Show => show(path),
    }
}

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let color = match diagnostic.severity {
        Severity::Error => RED,
        Severity::Warning => YELLOW,
        Severity::Info => CYAN,
    };
    let location = if diagnostic.path.is_empty() {
        String::new()
    } else {
        format!("{}: ", diagnostic.path)
    };
    format!(
        "  {BOLD}{color}{}{RESET} {location}{}",
        diagnostic.severity, diagnostic.message
    )
}

fn check(path: Option<&Path>, verbose: bool) -> Result<()> {
    let result = validate::validate(path);
    match &result.config_path {
        Some(path) => eprintln!("Checking {}\n", path.display()),
        None => eprintln!("No config file found; checking defaults.\n"),
    }

    let lines: Vec<String> = result
        .diagnostics
        .iter()
        .filter(|d| verbose || d.severity != Severity::Info)
        .map(format_diagnostic)
        .collect();
    for line in &lines {
        eprintln!("{line}");
    }
    if !lines.is_empty() {
        eprintln!();
    }

    let errors = result.count(Severity::Error);
    let warnings = result.count(Severity::Warning);
    if errors == 0 && warnings == 0 {
        eprintln!("No issues found.");
    } else {
        eprintln!("{errors} error(s), {warnings} warning(s)");
    }
    if result.has_errors() {
        bail!("configuration has {errors} error(s)");
    }
    Ok(())
}

fn show(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(path) => courier_config::load_config(path)?,
        None => courier_config::discover_and_load(),
    };
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
