use clap::Parser;
use std::path::PathBuf;

pub mod dispatcher;
pub mod editor;
pub mod handlers;
pub mod repl;
pub mod session;
pub mod signals;

/// Builds the color-aware help string at runtime.
fn build_help_string() -> &'static str {
    // Replaces the semantic tags of the help template (`<title>`, `<cmd>`, ...)
    // with ANSI styles, or with nothing when colors are off.

    let use_colors = colored::control::SHOULD_COLORIZE.should_colorize();

    let template = t!("cli.help.template");

    let title = if use_colors { "\x1b[1;33m" } else { "" }; // Bold Yellow
    let hl = if use_colors { "\x1b[1;36m" } else { "" }; // Bold Cyan
    let cmd = if use_colors { "\x1b[36m" } else { "" }; // Cyan
    let group = if use_colors { "\x1b[1;32m" } else { "" }; // Bold Green
    let err = if use_colors { "\x1b[91m" } else { "" }; // Bright Red (destructive)
    let dim = if use_colors { "\x1b[2m" } else { "" };
    let reset = if use_colors { "\x1b[0m" } else { "" };

    let formatted_string = template
        .replace("<title>", title)
        .replace("</title>", reset)
        .replace("<hl>", hl)
        .replace("</hl>", reset)
        .replace("<cmd>", cmd)
        .replace("</cmd>", reset)
        .replace("<group>", group)
        .replace("</group>", reset)
        .replace("<err>", err)
        .replace("</err>", reset)
        .replace("<dim>", dim)
        .replace("</dim>", reset);

    Box::leak(formatted_string.into_boxed_str())
}

/// scriptdeck: write, store and safely run bash scripts.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    help_template = { build_help_string() },
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// Directory holding saved scripts. Overrides the config file.
    #[arg(long, value_name = "DIR")]
    pub script_dir: Option<String>,

    /// Default timeout in seconds for runs. Overrides the config file.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Answer yes to every confirmation.
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Use this config file instead of the one in the config directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// A command and its arguments. Without one, the interactive session starts.
    #[arg(allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Cli {
    /// Applies the command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut crate::models::AppConfig) {
        if let Some(dir) = &self.script_dir {
            config.script_dir = dir.clone();
        }
        if let Some(timeout) = self.timeout {
            config.default_timeout_secs = timeout;
        }
        if self.no_color {
            config.highlight = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppConfig;

    #[test]
    fn test_flags_before_command_are_global() {
        // --- Setup & Execute ---
        let cli = Cli::try_parse_from([
            "scriptdeck",
            "--timeout",
            "5",
            "--no-color",
            "execute",
            "deploy",
            "--timeout",
            "9",
        ])
        .unwrap();

        // --- Assert ---
        assert_eq!(cli.timeout, Some(5));
        assert!(cli.no_color);
        assert_eq!(cli.args, vec!["execute", "deploy", "--timeout", "9"]);
    }

    #[test]
    fn test_overrides_replace_config_values() {
        let cli = Cli::try_parse_from(["scriptdeck", "--script-dir", "/srv/s", "--timeout", "7"]).unwrap();
        let mut config = AppConfig::default();

        cli.apply_overrides(&mut config);

        assert_eq!(config.script_dir, "/srv/s");
        assert_eq!(config.default_timeout_secs, 7);
        assert!(config.highlight);
        assert!(cli.args.is_empty());
    }
}
