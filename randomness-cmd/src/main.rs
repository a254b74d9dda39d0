use anyhow::Context;
use clap::Parser;
use randomness_cmd::cmd_args::CmdArgs;
use randomness_cmd::csv::CsvFile;
use randomness_cmd::report::format_report;
use randomness_cmd::samples::parse_samples;
use randomness_cmd::toml_config::TomlConfig;
use randomness_cmd::valid_arg::{Dataset, ValidatedConfig};
use randomness_lib::aggregation::Verdict;
use randomness_lib::battery::Battery;
use std::fs;
use std::process::ExitCode;

/// Main function.
///
/// On success: prints the test results to stdout, exit code SUCCESS if no test failed on any
/// dataset, else FAILURE.
/// On error: prints the error to stderr, exit code FAILURE.
///
/// This program takes some arguments and an optional config file, use `--help`.
fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let CmdArgs {
        config_file,
        regular_args,
    } = CmdArgs::parse();

    // parse configuration
    let config = if let Some(config_file) = config_file {
        let toml = fs::read_to_string(&config_file)
            .with_context(|| format!("Failed to read config file \"{}\"", config_file.display()))?;

        let toml_config: TomlConfig =
            toml::from_str(&toml).context("Failed to parse the config file")?;
        ValidatedConfig::try_from_toml(toml_config, regular_args)
    } else {
        ValidatedConfig::try_from_cmd_args(regular_args)
    }
    .map_err(|err| anyhow::anyhow!(err))?;
    log::debug!("validated config: {config:?}");

    if let Some(threads) = config.threads {
        randomness_lib::set_max_threads(threads.get())
            .context("Failed to set up the thread pool")?;
    }

    let battery = Battery::with_tests(config.tests_to_run.select(), config.test_arguments);

    let mut csv_file = config
        .output_path
        .as_deref()
        .map(CsvFile::new)
        .transpose()
        .context("Failed to create the output file")?;

    // if all tests passed on all datasets
    let mut passed = true;
    for dataset in &config.datasets {
        if !test_dataset(dataset, &config, &battery, csv_file.as_mut())? {
            passed = false;
        }
    }

    println!("Finished testing.");

    if passed {
        println!("Summary: no test failed");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("Summary: one or more tests failed / did not pass");
        Ok(ExitCode::FAILURE)
    }
}

/// Read the samples of a dataset, run the battery on them and report the results.
///
/// Returns false if any test failed or returned an error on the dataset, skipped tests do not
/// count as failed.
fn test_dataset(
    dataset: &Dataset,
    config: &ValidatedConfig,
    battery: &Battery,
    csv_file: Option<&mut CsvFile>,
) -> anyhow::Result<bool> {
    println!(
        "Reading dataset \"{}\": \"{}\"",
        dataset.name,
        dataset.file.display()
    );

    let text = fs::read_to_string(&dataset.file).with_context(|| {
        format!("Failed to read dataset file \"{}\"", dataset.file.display())
    })?;
    let samples = parse_samples(&text, config.window)
        .with_context(|| format!("Dataset \"{}\" contains an invalid sample", dataset.name))?;

    let report = battery
        .run(&dataset.name, &samples)
        .with_context(|| format!("Failed to test dataset \"{}\"", dataset.name))?;
    let aggregates = report
        .aggregate()
        .with_context(|| format!("Failed to aggregate the results of \"{}\"", dataset.name))?;

    println!();
    for line in format_report(&report, &aggregates, dataset.period, config.console_output) {
        println!("{line}");
    }
    println!();

    if let Some(csv_file) = csv_file {
        csv_file
            .write_dataset(&report, &aggregates)
            .context("Failed to write the results")?;
    }

    Ok(report.errors.is_empty()
        && aggregates
            .values()
            .all(|aggregate| aggregate.verdict() != Verdict::Fail))
}
