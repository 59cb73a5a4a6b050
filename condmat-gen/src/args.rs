use clap::{Parser, Subcommand, ValueEnum};
use condmat::config::GeneratorConfig;
use condmat::fixtures::{FloatFormat, Layout};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    #[arg(
        short('c'),
        long,
        value_name = "PATH",
        help = "JSON generator config; flags override its values",
        global = true
    )]
    pub config: Option<PathBuf>,
    #[arg(short('s'), long, help = "seed for a reproducible run", global = true)]
    pub seed: Option<u64>,
    #[arg(
        long,
        value_name = "N",
        help = "give up on a width after N rejected samples",
        conflicts_with = "unbounded",
        global = true
    )]
    pub max_attempts: Option<usize>,
    #[arg(long, help = "resample until a pair is accepted", action = clap::ArgAction::SetTrue, global = true)]
    pub unbounded: bool,
    #[arg(short('o'), long, value_name = "DIR", default_value = ".", global = true)]
    pub output_dir: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// One width, read from stdin unless given: m_1.dat, m_2.dat, matmul.dat
    Single {
        #[arg(short('w'), long)]
        width: Option<usize>,
        #[arg(short('t'), long, help = "condition number threshold [default: 1e9]")]
        threshold: Option<f64>,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Every configured width with a geometric threshold schedule
    Multi {
        #[arg(long, value_delimiter = ',', help = "[default: 100,1000,5000,10000]")]
        widths: Option<Vec<usize>>,
        #[arg(long, help = "threshold of the first width [default: 1e7]")]
        base_threshold: Option<f64>,
        #[arg(long, help = "threshold factor between widths [default: 50]")]
        growth: Option<f64>,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Re-reads a fixture set and checks the product and transposes
    Verify {
        #[arg(short('w'), long)]
        width: usize,
        #[arg(long, value_enum, default_value = "single")]
        layout: LayoutArg,
        #[arg(long, default_value_t = 1e-6)]
        tolerance: f64,
    },
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum FormatArg {
    Scientific,
    Fixed,
}

impl From<FormatArg> for FloatFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Scientific => FloatFormat::Scientific,
            FormatArg::Fixed => FloatFormat::Fixed,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LayoutArg {
    Single,
    PerWidth,
}

impl From<LayoutArg> for Layout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Single => Layout::Single,
            LayoutArg::PerWidth => Layout::PerWidth,
        }
    }
}

impl Args {
    /// Defaults, then the config file, then flags.
    pub fn load_config(&self) -> condmat::Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_json_file(path)?,
            None => GeneratorConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if self.unbounded {
            config.max_attempts = None;
        } else if let Some(max) = self.max_attempts {
            config.max_attempts = Some(max);
        }
        match &self.command {
            Command::Single { threshold, .. } => {
                if let Some(threshold) = threshold {
                    config.single_threshold = *threshold;
                }
            }
            Command::Multi {
                widths,
                base_threshold,
                growth,
                ..
            } => {
                if let Some(widths) = widths {
                    config.widths = widths.clone();
                }
                if let Some(base) = base_threshold {
                    config.base_threshold = *base;
                }
                if let Some(growth) = growth {
                    config.threshold_growth = *growth;
                }
            }
            Command::Verify { .. } => {}
        }
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "condmat-gen",
            "--seed",
            "5",
            "--max-attempts",
            "20",
            "multi",
            "--widths",
            "3,4",
            "--growth",
            "10",
        ]);
        let config = args.load_config().unwrap();
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.max_attempts, Some(20));
        assert_eq!(config.widths, vec![3, 4]);
        assert_eq!(config.threshold_growth, 10.0);
        assert_eq!(config.base_threshold, 1.0e7);
    }

    #[test]
    fn test_unbounded() {
        let args = Args::parse_from(["condmat-gen", "single", "--unbounded", "-w", "3"]);
        assert_eq!(args.load_config().unwrap().max_attempts, None);
        assert!(matches!(args.command, Command::Single { width: Some(3), .. }));
    }
}
