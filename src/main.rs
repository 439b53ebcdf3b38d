use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{crate_version, App as Cli, Arg, ArgMatches};
use log::*;
use portal_listings::app::{App, ListKind, RunOptions};
use portal_listings::config::Config;
use portal_listings::logger::CustomLogger;
use portal_listings::state::SortOrder;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Cli::new("portal-listings")
        .version(crate_version!())
        .about("Filter, sort and render portal announcement and download lists")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("DIR")
                .help("Directory holding config.yml")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("list")
                .short("l")
                .long("list")
                .value_name("LIST")
                .possible_values(&ListKind::NAMES)
                .default_value("announcements")
                .help("List to render"),
        )
        .arg(
            Arg::with_name("initial")
                .long("initial")
                .value_name("FILE")
                .help("JSON file with the items of the initial page")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("page-url")
                .long("page-url")
                .value_name("URL")
                .help("URL of the list page, including its query")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("now")
                .long("now")
                .value_name("RFC3339")
                .help("Time the page was rendered at")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("search")
                .short("s")
                .long("search")
                .value_name("TEXT")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("category")
                .long("category")
                .value_name("CODE")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("unit")
                .long("unit")
                .value_name("UNIT")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("sort")
                .long("sort")
                .value_name("ORDER")
                .possible_values(&["newest", "oldest", "title-asc", "title-desc"])
                .takes_value(true),
        )
        .arg(
            Arg::with_name("units")
                .long("units")
                .value_name("UNITS")
                .help("Comma separated options of the unit select")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("write-config")
                .long("write-config")
                .help("Write the effective configuration to config.yml"),
        )
        .get_matches();

    let mut config = Config::new();
    config.load(matches.value_of("config"))?;

    let logger = CustomLogger::new(config.level_filter());
    logger.set_log_callback(Box::new(|line| eprintln!("{}", line)));
    logger.init()?;

    if matches.is_present("write-config") {
        config.save()?;
        info!("Wrote configuration to {:?}", config.file_path());
    }

    let options = run_options(&matches)?;
    let output = App::start(&config, options).await?;
    for rejected in &output.rejected {
        warn!("{}", rejected);
    }
    if let Some(url) = &output.url {
        info!("Page URL: {}", url);
    }
    println!("{}", output.html);
    Ok(())
}

fn run_options(matches: &ArgMatches) -> Result<RunOptions> {
    let list = matches.value_of("list").unwrap_or("announcements").parse()?;
    let now = match matches.value_of("now") {
        Some(now) => Some(
            DateTime::parse_from_rfc3339(now)
                .with_context(|| format!("Invalid --now '{}'", now))?
                .with_timezone(&Utc),
        ),
        None => None,
    };
    let sort = match matches.value_of("sort") {
        Some(sort) => Some(sort.parse::<SortOrder>()?),
        None => None,
    };
    let units = matches
        .value_of("units")
        .map(|units| {
            units
                .split(',')
                .map(str::trim)
                .filter(|unit| !unit.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(RunOptions {
        initial: matches.value_of("initial").map(Into::into),
        page_url: matches.value_of("page-url").map(str::to_string),
        now,
        search: matches.value_of("search").map(str::to_string),
        category: matches.value_of("category").map(str::to_string),
        unit: matches.value_of("unit").map(str::to_string),
        sort,
        units,
        ..RunOptions::new(list)
    })
}
