//! msgwire client - send one message to a configured service.

use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use msgwire::config::Settings;
use msgwire::message::Message;
use msgwire::protocol::{KeyValuePairs, MessageType, Payload};
use msgwire::services::{self, ServiceRegistry};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const NAME: &str = env!("CARGO_BIN_NAME");

fn main() -> ExitCode {
    // Parse command line arguments (simple std::env approach)
    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("{} {}", NAME, VERSION);
        return ExitCode::SUCCESS;
    }

    let config_path = get_option(&args, "--config", "-c")
        .unwrap_or_else(|| "/etc/msgwire/msgwire.toml".to_string());

    let Some(service_name) = get_option(&args, "--service", "-s") else {
        eprintln!("Missing --service <NAME>");
        return ExitCode::FAILURE;
    };
    let Some(request_name) = get_option(&args, "--request", "-r") else {
        eprintln!("Missing --request <NAME>");
        return ExitCode::FAILURE;
    };

    let payload = match build_payload(&args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Load configuration
    let settings = match Settings::load(&config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging based on configuration
    if let Err(e) = init_logging(&settings) {
        eprintln!("Error initializing logging: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Configuration loaded from: {}", config_path);

    let registry = match ServiceRegistry::from_settings(&settings).and_then(services::install) {
        Ok(r) => r,
        Err(e) => {
            error!(error = %e, "Messaging initialization failed");
            return ExitCode::FAILURE;
        }
    };
    info!(services = ?registry.list(), "Messaging initialized");

    let mut message = Message::new(request_name, payload.message_type());
    message.set_payload(payload);

    if args.iter().any(|a| a == "--one-way") {
        if message.send(&service_name) {
            println!("sent");
            return ExitCode::SUCCESS;
        }
        eprintln!("error: unable to send message to service {}", service_name);
        return ExitCode::FAILURE;
    }

    let mut response = Message::empty();
    if !message.send_with_response(&service_name, &mut response) {
        eprintln!("error: unable to send message to service {}", service_name);
        return ExitCode::FAILURE;
    }

    print_response(&response);
    ExitCode::SUCCESS
}

/// Build the payload from `--text` or repeated `--kv key=value` arguments.
fn build_payload(args: &[String]) -> Result<Payload, String> {
    if let Some(text) = get_option(args, "--text", "-t") {
        return Ok(Payload::Text(text));
    }

    let mut kvp = KeyValuePairs::new();
    for (i, arg) in args.iter().enumerate() {
        let pair = if arg == "--kv" {
            args.get(i + 1).map(String::as_str)
        } else {
            arg.strip_prefix("--kv=")
        };
        let Some(pair) = pair else { continue };
        match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.is_empty() => kvp.insert(key, value),
            _ => return Err(format!("Invalid --kv '{}', expected key=value", pair)),
        }
    }

    if kvp.is_empty() {
        Ok(Payload::empty(MessageType::Text))
    } else {
        Ok(Payload::KeyValues(kvp))
    }
}

fn print_response(response: &Message) {
    match response.payload() {
        Payload::Text(text) => println!("response: '{}'", text),
        Payload::KeyValues(kvp) => {
            for (key, value) in kvp.iter() {
                println!("key='{}', value='{}'", key, value);
            }
        }
        Payload::Unknown => println!("response has no payload"),
    }
}

/// Print help message.
fn print_help() {
    println!(
        r#"{} {}
Send a message to a service listed in a msgwire configuration file.

USAGE:
    {} --service <NAME> --request <NAME> [OPTIONS]

OPTIONS:
    -c, --config <PATH>     Path to configuration file
                            [default: /etc/msgwire/msgwire.toml]
    -s, --service <NAME>    Service to send to
    -r, --request <NAME>    Request name
    -t, --text <TEXT>       Send a text payload
        --kv <KEY=VALUE>    Add a key/value payload pair (repeatable)
        --one-way           Do not wait for a response
    -h, --help              Print help information
    -V, --version           Print version information
"#,
        NAME, VERSION, NAME
    );
}

/// Get an option value given as `--long <v>`, `-s <v>` or `--long=<v>`.
fn get_option(args: &[String], long: &str, short: &str) -> Option<String> {
    let prefix = format!("{}=", long);
    for (i, arg) in args.iter().enumerate() {
        if (arg == long || arg == short) && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
        if let Some(value) = arg.strip_prefix(&prefix) {
            return Some(value.to_string());
        }
    }
    None
}

/// Initialize logging based on settings.
fn init_logging(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level));

    match settings.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
