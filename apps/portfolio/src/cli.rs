use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "portfolio",
    about = "Static portfolio renderer with a Gemini-backed chat assistant",
    version,
    long_about = None,
)]
pub struct Cli {
    /// Portfolio content JSON (defaults to PORTFOLIO_CONTENT, then the built-in content)
    #[arg(long, global = true, value_name = "PATH")]
    pub content: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the portfolio page to DIR/index.html
    Render {
        /// Output directory, created if missing
        #[arg(long, short = 'o', default_value = "dist")]
        out: PathBuf,

        /// Render every section already revealed, without the reveal script
        #[arg(long = "static")]
        reveal_all: bool,
    },

    /// Chat with the portfolio assistant in the terminal
    Chat {
        /// Write the transcript as HTML to FILE when the session ends
        #[arg(long, value_name = "FILE")]
        export: Option<PathBuf>,
    },

    /// Print the system instruction sent with every chat request
    Prompt,

    /// Print a JSON coverage report for the portfolio content
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_defaults() {
        let cli = Cli::try_parse_from(["portfolio", "render"]).unwrap();
        match cli.command {
            Commands::Render { out, reveal_all } => {
                assert_eq!(out, PathBuf::from("dist"));
                assert!(!reveal_all);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.content.is_none());
    }

    #[test]
    fn test_global_content_after_subcommand() {
        let cli = Cli::try_parse_from([
            "portfolio",
            "render",
            "--static",
            "--out",
            "site",
            "--content",
            "me.json",
        ])
        .unwrap();
        assert_eq!(cli.content, Some(PathBuf::from("me.json")));
        assert!(matches!(cli.command, Commands::Render { reveal_all: true, .. }));
    }

    #[test]
    fn test_chat_export_flag() {
        let cli = Cli::try_parse_from(["portfolio", "chat", "--export", "t.html"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Chat { export: Some(ref p) } if p == &PathBuf::from("t.html")
        ));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["portfolio"]).is_err());
    }

    #[test]
    fn test_command_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
