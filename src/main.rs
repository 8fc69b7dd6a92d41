extern crate clap;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate serde_json;
extern crate slack_channels;

use clap::{Parser, ValueEnum};
use serde_json::Value;
use slack_channels::report::{decode_channels, format_channel, select_method, ApiMethod};
use slack_channels::settings::{load_settings, save_settings};
use std::error::Error;
use std::fs;
use std::io::{self, Read};

#[derive(Debug, Parser)]
#[command(name = "slack-channels", about = "Validate saved Slack channel API responses")]
struct Cli {
    /// Saved channels.info or channels.list response, "-" for stdin.
    #[arg(default_value = "-")]
    path: String,
    /// API method that produced the response.
    #[arg(long, default_value = "auto")]
    method: MethodArg,
    /// Ignore fields the representations do not declare, for this run only.
    #[arg(long)]
    lenient: bool,
    /// Write the settings file's current values back, without command line overrides.
    #[arg(long)]
    save_settings: bool,
}

#[derive(Debug, Clone, ValueEnum)]
enum MethodArg {
    Auto,
    Info,
    List,
}

impl From<MethodArg> for Option<ApiMethod> {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Auto => None,
            MethodArg::Info => Some(ApiMethod::Info),
            MethodArg::List => Some(ApiMethod::List),
        }
    }
}

fn read_body(path: &str) -> io::Result<String> {
    if path == "-" {
        let mut body = String::new();
        io::stdin().read_to_string(&mut body)?;
        Ok(body)
    } else {
        fs::read_to_string(path)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    let stored = load_settings()?;

    env_logger::Builder::new()
        .parse_filters(&stored.log_filter)
        .parse_default_env()
        .init();

    if args.save_settings {
        save_settings()?;
        info!("Saved settings");
    }

    let settings = if args.lenient {
        stored.with_lenient_keys()
    } else {
        stored
    };

    let body = read_body(&args.path)?;
    let json: Value = serde_json::from_str(&body)?;
    let options = settings.resolve_options();

    let method = select_method(args.method.into(), &json);
    let report = decode_channels(&json, method, &options)?;
    if let Some(cursor) = &report.next_cursor {
        info!("More channels available, next cursor: {}", cursor);
    }

    debug!("Validated {} channel(s) from {}", report.channels.len(), args.path);
    for channel in &report.channels {
        println!("{}", format_channel(channel));
    }

    Ok(())
}
