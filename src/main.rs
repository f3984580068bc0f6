use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches};
use tracing_subscriber::EnvFilter;
use uritemplate::{config, UriTemplate};

fn cli() -> clap::Command {
    clap::Command::new("uritemplate")
        .about("Expand RFC 6570 URI templates")
        .arg(
            Arg::new("templates")
                .value_name("TEMPLATE")
                .help("URI templates to expand")
                .required(true)
                .num_args(1..),
        )
        .arg(
            Arg::new("data")
                .short('d')
                .long("data")
                .value_name("FILE")
                .help("YAML or JSON file with variable values"),
        )
        .arg(
            Arg::new("set")
                .short('s')
                .long("set")
                .value_name("NAME=VALUE")
                .help("Set a string variable, overriding --data")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("list_vars")
                .short('l')
                .long("list-vars")
                .help("Print the variable names of each template instead of expanding it")
                .action(ArgAction::SetTrue),
        )
}

fn load_data(matches: &ArgMatches) -> Result<serde_json::Value> {
    let data = matches
        .get_one::<String>("data")
        .map(|path| config::load_data_file(Path::new(path)))
        .transpose()?;

    let overrides = matches
        .get_many::<String>("set")
        .unwrap_or_default()
        .map(|assignment| config::parse_assignment(assignment))
        .collect::<Result<Vec<_>>>()?;

    config::apply_overrides(data, &overrides)
}

fn run(matches: &ArgMatches) -> Result<bool> {
    let templates: Vec<UriTemplate> = matches
        .get_many::<String>("templates")
        .unwrap_or_default()
        .map(|t| UriTemplate::new(t.as_str()))
        .collect();

    if matches.get_flag("list_vars") {
        for template in &templates {
            println!("{}", template.variables().join(" "));
        }
        return Ok(true);
    }

    let data = load_data(matches)?;
    let mut all_ok = true;
    for template in &templates {
        match template.expand(&data) {
            Ok(uri) => println!("{}", uri),
            Err(err) => {
                tracing::error!("{}", err);
                println!("{}", err.output());
                all_ok = false;
            }
        }
    }
    Ok(all_ok)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
