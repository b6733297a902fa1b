//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};

use clap::{ArgAction, ColorChoice, Parser, ValueHint};
use magic_react_common_config::{env::vars, ConfigLoader, ScaffoldConfig};
use magic_react_common_log::LogConfig;

use crate::error::CliError;
use crate::output::color::ColorMode;
use crate::pipeline::ScaffoldOptions;

/// magic-react - scaffold a React project from a route specification
///
/// Creates the project, installs its routing dependencies and generates one
/// layout per top-level route plus one view per nested route.
#[derive(Debug, Parser)]
#[command(
    name = "magic-react",
    author,
    version,
    about,
    long_about = None,
    arg_required_else_help = true,
    help_template = "\
{before-help}{name} {version}
{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
    /// Name of the project directory to create
    #[arg(value_name = "PROJECT_NAME")]
    pub project_name: String,

    /// Route specification (JSON, or YAML by extension)
    #[arg(value_name = "ROUTES_FILE", value_hint = ValueHint::FilePath)]
    pub routes_file: PathBuf,

    /// Use an existing project directory instead of creating one
    #[arg(long)]
    pub skip_creation: bool,

    /// Do not commit the generated files
    #[arg(long)]
    pub no_commit: bool,

    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase verbosity level"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(
        short,
        long,
        conflicts_with = "verbose",
        help = "Suppress non-error output"
    )]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        env = vars::MAGIC_REACT_CONFIG,
        value_hint = ValueHint::FilePath,
        help = "Path to configuration file"
    )]
    pub config: Option<PathBuf>,

    /// When to use colors
    #[arg(
        long,
        default_value = "auto",
        value_enum,
        help = "When to use terminal colors"
    )]
    pub color: ColorChoice,
}

impl Cli {
    /// Load configuration from the explicit file or `.magic-react/config.yaml`
    /// under `workdir`, after loading `.env` files from the same directory.
    pub fn load_config(&self, workdir: &Path) -> Result<ScaffoldConfig, CliError> {
        magic_react_common_config::load_dotenv(workdir)?;
        let loader = ConfigLoader::new(workdir).with_file(self.config.clone());
        Ok(loader.load()?)
    }

    /// Logging configuration: environment first, flags on top.
    pub fn log_config(&self) -> LogConfig {
        LogConfig::from_env()
            .with_verbosity(self.verbose, self.quiet)
            .with_ansi(self.color_mode().stderr_enabled())
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color.into()
    }

    /// Options for one scaffolding run rooted at `workdir`.
    pub fn scaffold_options(&self, workdir: PathBuf) -> ScaffoldOptions {
        ScaffoldOptions {
            project_name: self.project_name.clone(),
            routes_file: self.routes_file.clone(),
            skip_creation: self.skip_creation,
            no_commit: self.no_commit,
            workdir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_positional_arguments_and_flags() {
        let cli = Cli::try_parse_from([
            "magic-react",
            "shop",
            "routes.json",
            "--skip-creation",
            "--no-commit",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.project_name, "shop");
        assert_eq!(cli.routes_file, PathBuf::from("routes.json"));
        assert!(cli.skip_creation);
        assert!(cli.no_commit);
        assert_eq!(cli.verbose, 2);

        let options = cli.scaffold_options(PathBuf::from("/work"));
        assert_eq!(options.project_dir(), PathBuf::from("/work/shop"));
    }

    #[test]
    fn test_both_positionals_are_required() {
        assert!(Cli::try_parse_from(["magic-react", "shop"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["magic-react", "shop", "r.json", "-q", "-v"]).is_err());
    }
}
