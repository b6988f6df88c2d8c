//! CLI argument parsing with clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Drive the mouse from the keyboard.
///
/// Press the toggle hotkey to label clickable-looking screen regions with
/// two-letter codes, then type a code to move the cursor there and click.
#[derive(Debug, Parser)]
#[command(name = "vimouse", version)]
pub struct Cli {
    /// Config file [default: $VIMOUSE_CONFIG, then <config dir>/vimouse/config.json]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the hotkey listener (requires the `desktop` build feature)
    #[command(after_help = "\
Default hotkeys:
  Alt+\\        Show or hide the label overlay
  Alt+K        Scroll up
  Alt+J        Scroll down
  Alt+Q        Quit

Overlay events are written to stdout as JSON lines for the label painter:
  {\"event\":\"shown\",\"activation\":1,\"labels\":[{\"code\":\"qw\",\"x\":96,\"y\":90}]}
  {\"event\":\"hidden\",\"activation\":1}")]
    Run,

    /// Run region detection on an image file and print the result as JSON
    #[command(after_help = "\
Examples:
  vimouse detect --image screen.png             # Regions as [{x, y}]
  vimouse detect --image screen.png --labels    # Codes as [{code, x, y}]")]
    Detect(DetectArgs),

    /// Print the generated two-letter codes in assignment order
    Labels(LabelsArgs),

    /// Print the effective configuration as JSON
    Config,
}

#[derive(Debug, clap::Args)]
pub struct DetectArgs {
    /// PNG or JPEG screenshot
    #[arg(long)]
    pub image: PathBuf,

    /// Bind codes to the regions and print the label map
    #[arg(long)]
    pub labels: bool,
}

#[derive(Debug, clap::Args)]
pub struct LabelsArgs {
    /// Number of regions to generate codes for
    #[arg(short = 'n', long, default_value_t = 60)]
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_detect_with_global_config() {
        let cli = Cli::parse_from([
            "vimouse", "detect", "--image", "shot.png", "--labels", "--config", "c.json",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("c.json")));
        let Commands::Detect(args) = cli.command else {
            panic!("expected detect");
        };
        assert_eq!(args.image, PathBuf::from("shot.png"));
        assert!(args.labels);
    }

    #[test]
    fn labels_count_defaults() {
        let cli = Cli::parse_from(["vimouse", "labels"]);
        let Commands::Labels(args) = cli.command else {
            panic!("expected labels");
        };
        assert_eq!(args.count, 60);
    }

    #[test]
    fn detect_requires_image() {
        assert!(Cli::try_parse_from(["vimouse", "detect"]).is_err());
    }
}
