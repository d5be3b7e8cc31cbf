//! Command-line parsing

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use studylens_infra::LogFormat;

#[derive(Debug, Parser)]
#[command(name = "studylens")]
#[command(about = "StudyLens - textbook page recognition and tutoring")]
#[command(version)]
pub struct Cli {
    /// Config file (default: environment, then probed files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Session id for events (default: generated)
    #[arg(long, global = true)]
    pub session: Option<String>,

    /// Deadline for the whole command, in seconds
    #[arg(long = "timeout", global = true)]
    pub timeout_secs: Option<u64>,

    /// Process log format: pretty | json
    #[arg(long, global = true, default_value = "pretty")]
    pub log_format: LogFormat,

    /// Print the session's events as JSON after the command
    #[arg(long = "events", global = true)]
    pub show_events: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Renew the credential and probe recognition
    AuthCheck,
    /// Recognize a page and explain it
    Analyze {
        image: PathBuf,
        /// Replaces the default explanation instruction
        #[arg(long)]
        instruction: Option<String>,
    },
    /// Answer a question about the material
    Ask { content: PathBuf, question: String },
    /// Generate practical examples
    Examples { content: PathBuf, topic: String },
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("studylens").chain(args.iter().copied()))
    }

    #[test]
    fn help_is_handled_by_the_parser() {
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn global_options_precede_command() {
        let cli = parse(&[
            "--session",
            "s1",
            "--timeout",
            "20",
            "--log-format",
            "json",
            "--events",
            "ask",
            "notes.txt",
            "Why is the sky blue?",
        ])
        .unwrap();

        assert_eq!(cli.session.as_deref(), Some("s1"));
        assert_eq!(cli.timeout_secs, Some(20));
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.show_events);
        assert_eq!(
            cli.command,
            Commands::Ask { content: "notes.txt".into(), question: "Why is the sky blue?".into() }
        );
    }

    #[test]
    fn defaults_apply_without_options() {
        let cli = parse(&["auth-check"]).unwrap();

        assert_eq!(cli.command, Commands::AuthCheck);
        assert_eq!(cli.config, None);
        assert_eq!(cli.timeout_secs, None);
        assert_eq!(cli.log_format, LogFormat::Pretty);
        assert!(!cli.show_events);
    }

    #[test]
    fn analyze_accepts_optional_instruction() {
        let plain = parse(&["analyze", "page.png"]).unwrap();
        assert_eq!(
            plain.command,
            Commands::Analyze { image: "page.png".into(), instruction: None }
        );

        let custom = parse(&["analyze", "page.png", "--instruction", "Summarize"]).unwrap();
        assert_eq!(
            custom.command,
            Commands::Analyze { image: "page.png".into(), instruction: Some("Summarize".into()) }
        );
    }

    #[test]
    fn malformed_invocations_are_errors() {
        assert!(parse(&["--timeout", "soon", "auth-check"]).is_err());
        assert!(parse(&["--log-format", "xml", "auth-check"]).is_err());
        assert!(parse(&["--verbose", "auth-check"]).is_err());
        assert!(parse(&["examples", "notes.txt"]).is_err());
        assert!(parse(&["auth-check", "extra"]).is_err());
        assert!(parse(&["translate"]).is_err());
    }
}
