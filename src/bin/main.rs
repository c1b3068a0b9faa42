use cl_log::{level::Level, write_options::WriteOptions, Logger};
use cl_sockaddr::{Ipv4Endpoint, ParseMode, SocketEndpoint, UnixEndpoint};
use log::{error, info};

const USAGE: &str = "usage: cl-sockaddr [--lenient] [--unix PATH]... ENDPOINT...";

enum Argument {
    Ipv4(String),
    Unix(String),
}

struct Options {
    mode: ParseMode,
    arguments: Vec<Argument>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options {
        mode: ParseMode::Strict,
        arguments: Vec::new(),
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--lenient" => options.mode = ParseMode::Lenient,
            "--unix" => {
                let path = args.next().ok_or("--unix requires a path")?;
                options.arguments.push(Argument::Unix(path));
            },
            "-h" | "--help" => return Err(USAGE.to_string()),
            _ => options.arguments.push(Argument::Ipv4(arg)),
        }
    }

    if options.arguments.is_empty() {
        return Err(USAGE.to_string());
    }

    Ok(options)
}

fn describe(argument: &Argument, mode: ParseMode) -> cl_sockaddr::Result<SocketEndpoint> {
    let endpoint: SocketEndpoint = match argument {
        Argument::Ipv4(text) => Ipv4Endpoint::parse_with(Some(text.as_str()), mode)?.into(),
        Argument::Unix(path) => UnixEndpoint::new(path)?.into(),
    };

    Ok(endpoint)
}

fn main() {

    let opt = Some(WriteOptions::EXPANDED);
    let err_opt = Some(WriteOptions::ALL);

    match Logger::builder()
        .with_stderr(Level::Error, err_opt)
        .with_stdout(Level::Warn, opt)
        .with_stdout(Level::Info, opt)
    .build() {
        Ok(_) => {},
        Err(err) => {
            eprintln!("Failed to initialize logger: {}", err);
            std::process::exit(1);
        }
    }

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    let mut failed = false;

    for argument in &options.arguments {
        let input = match argument {
            Argument::Ipv4(text) | Argument::Unix(text) => text,
        };

        match describe(argument, options.mode) {
            Ok(endpoint) => {
                info!("Parsed {:?} as {} endpoint", input, endpoint.family());
                println!(
                    "{:?} -> {} ({}, {} bytes, hash {:016x})",
                    input,
                    endpoint,
                    endpoint.family(),
                    endpoint.len(),
                    endpoint.hash_value()
                );
            },
            Err(err) => {
                error!("{:?}: {}", input, err);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
