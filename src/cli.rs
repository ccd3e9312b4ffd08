use clap::Parser;
use std::path::PathBuf;

/// Transform deployment models into infrastructure-as-code artifacts
#[derive(Parser, Debug)]
#[command(name = "topology-transform")]
#[command(version)]
#[command(
    about = "Transform technology-neutral deployment models into infrastructure-as-code artifacts",
    long_about = None
)]
pub struct Args {
    /// Path to the deployment model (YAML)
    #[arg(short, long, value_name = "FILE", required_unless_present = "list_targets")]
    pub model: Option<PathBuf>,

    /// Target to generate; can be specified multiple times: -t heat -t kubernetes
    #[arg(short, long = "target", value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Output directory; each target writes into its own subdirectory
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Directory that artifact paths in the model are relative to
    /// (defaults to the model's directory)
    #[arg(short, long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Path to a config file (defaults to topology-transform.config.yml next to the model)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verify that the tools each target needs are installed
    #[arg(long)]
    pub verify_tools: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    pub verbose: bool,

    /// List the available targets and exit
    #[arg(long)]
    pub list_targets: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_targets() {
        let args = Args::try_parse_from([
            "topology-transform",
            "-m",
            "shop.yml",
            "-t",
            "heat",
            "--target",
            "kubernetes",
            "-o",
            "out",
        ])
        .unwrap();
        assert_eq!(args.model, Some(PathBuf::from("shop.yml")));
        assert_eq!(args.targets, vec!["heat", "kubernetes"]);
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert!(!args.verify_tools);
        assert!(!args.verbose);
    }

    #[test]
    fn test_model_required() {
        let result = Args::try_parse_from(["topology-transform", "-t", "heat"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_list_targets_without_model() {
        let args = Args::try_parse_from(["topology-transform", "--list-targets"]).unwrap();
        assert!(args.list_targets);
        assert!(args.model.is_none());
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from([
            "topology-transform",
            "--model",
            "m.yml",
            "--verify-tools",
            "-v",
            "-s",
            "scripts",
            "-c",
            "custom.yml",
        ])
        .unwrap();
        assert!(args.verify_tools);
        assert!(args.verbose);
        assert_eq!(args.source, Some(PathBuf::from("scripts")));
        assert_eq!(args.config, Some(PathBuf::from("custom.yml")));
    }
}
