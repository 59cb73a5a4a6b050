mod args;

use args::{Args, Command};
use clap::Parser;
use condmat::config::GeneratorConfig;
use condmat::driver::{self, SizeOutcome};
use condmat::fixtures::{FixtureSet, FixtureWriter, Layout};
use condmat::generator::PairGenerator;
use std::error::Error;
use std::io::BufRead;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::builder()
        .format_timestamp_micros()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    let config = args.load_config()?;
    log::debug!("config: {:?}", config);

    match args.command {
        Command::Single { width, format, .. } => {
            let width = match width {
                Some(width) => width,
                None => read_width()?,
            };
            let mut writer = FixtureWriter::new(&args.output_dir, Layout::Single);
            if let Some(format) = format {
                writer = writer.with_format(format.into());
            }
            run_single(&config, width, &writer)
        }
        Command::Multi { format, .. } => {
            let mut writer = FixtureWriter::new(&args.output_dir, Layout::PerWidth);
            if let Some(format) = format {
                writer = writer.with_format(format.into());
            }
            run_multi(&config, &writer)
        }
        Command::Verify {
            width,
            layout,
            tolerance,
        } => {
            let set = FixtureSet::load(&args.output_dir, layout.into(), width)?;
            let report = driver::verify(&set, tolerance);
            log::info!("{:?}", report);
            if report.is_ok() {
                log::info!("fixtures of width {width} are consistent");
                Ok(())
            } else {
                Err(format!("fixtures of width {width} failed verification: {report:?}").into())
            }
        }
    }
}

fn read_width() -> Result<usize, Box<dyn Error>> {
    parse_width(std::io::stdin().lock())
}

/// Reads the matrix width from the first line of `reader`.
fn parse_width<R: BufRead>(mut reader: R) -> Result<usize, Box<dyn Error>> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let line = line.trim();
    line.parse()
        .map_err(|err| format!("invalid matrix width {line:?}: {err}").into())
}

fn run_single(config: &GeneratorConfig, width: usize, writer: &FixtureWriter) -> Result<(), Box<dyn Error>> {
    let mut generator = PairGenerator::from_config(config)?;
    let files = driver::generate_single(&mut generator, width, config.single_threshold, writer)?;
    log::info!("wrote {} files to {}", files.len(), writer.dir().display());
    Ok(())
}

fn run_multi(config: &GeneratorConfig, writer: &FixtureWriter) -> Result<(), Box<dyn Error>> {
    let mut generator = PairGenerator::from_config(config)?;
    let steps = config.schedule().steps(&config.widths);
    let reports = driver::generate_multi(&mut generator, &steps, writer)?;
    let mut skipped = 0;
    for report in &reports {
        match &report.outcome {
            SizeOutcome::Written {
                condition, attempts, ..
            } => log::info!(
                "width {}: condition number {:e} < {:e} after {} attempt(s)",
                report.step.width,
                condition,
                report.step.threshold,
                attempts
            ),
            SizeOutcome::Skipped(err) => {
                skipped += 1;
                log::warn!("width {}: no fixtures written ({err})", report.step.width);
            }
        }
    }
    if skipped > 0 {
        log::warn!("{skipped} of {} widths were skipped", reports.len());
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::parse_width;

    #[test]
    fn test_parse_width() {
        assert_eq!(parse_width("42\n".as_bytes()).unwrap(), 42);
        assert_eq!(parse_width(" 7 \r\n".as_bytes()).unwrap(), 7);
        assert_eq!(parse_width("3\n100\n".as_bytes()).unwrap(), 3);
    }

    #[test]
    fn test_parse_width_rejects_garbage() {
        for input in ["", "\n", "abc\n", "-3\n", "2.5\n"] {
            let err = parse_width(input.as_bytes()).unwrap_err();
            assert!(err.to_string().starts_with("invalid matrix width"), "{input:?}: {err}");
        }
    }
}
