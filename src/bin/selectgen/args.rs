use clap::{Parser, Subcommand};
use select_gen::config::GeneratorConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Config file to use instead of ~/.config/select-gen/config.json
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Defaults to printing the sample statements.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prints sample select statements, one per line.
    Sample {
        /// How many statements to print. Defaults to the config value, 1 unless changed.
        #[arg(short, long)]
        count: Option<usize>,
    },
    /// Prints the label values and metric means found in a workload file.
    Metadata { workload: PathBuf },
    /// Prints random select statements using the labels and metrics of a workload file.
    Generate(GenerateParams),
    /// Rewrites select statements into disjunctive normal form.
    ///
    /// Reads one statement per line, from stdin if no file is given.
    Dnf { input: Option<PathBuf> },
}

#[derive(clap::Args, Debug)]
pub struct GenerateParams {
    /// Workload file with one {"Write": ...} record per line
    pub workload: PathBuf,
    /// Number of statements
    #[arg(short, long)]
    count: Option<usize>,
    /// Height of each condition tree
    #[arg(long)]
    height: Option<usize>,
    /// Seed for the random number generator
    #[arg(short, long)]
    seed: Option<u64>,
}

impl GenerateParams {
    /// Flags win over the config file.
    pub fn apply(&self, settings: GeneratorConfig) -> GeneratorConfig {
        GeneratorConfig {
            count: self.count.unwrap_or(settings.count),
            max_height: self.height.unwrap_or(settings.max_height),
            seed: self.seed.unwrap_or(settings.seed),
            ..settings
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_is_allowed() {
        let args = Args::try_parse_from(["selectgen"]).unwrap();

        assert!(args.command.is_none());
        assert!(args.config.is_none());
    }

    #[test]
    fn generate_flags_override_config() {
        let args = Args::try_parse_from([
            "selectgen",
            "generate",
            "workload.txt",
            "--count",
            "7",
            "--seed",
            "3",
        ])
        .unwrap();

        let Some(Command::Generate(params)) = args.command else {
            panic!("expected the generate command");
        };
        let settings = params.apply(GeneratorConfig::default());

        assert_eq!(settings.count, 7);
        assert_eq!(settings.seed, 3);
        assert_eq!(settings.max_height, 3);
    }
}
