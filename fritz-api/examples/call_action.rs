//! Call one action on a FRITZ!Box and print the result as JSON
//!
//! Usage:
//!
//! ```bash
//! # List services and their actions
//! FRITZ_PASSWORD=secret cargo run -p fritz-api --example call_action -- 192.168.178.1
//!
//! # Call an action, passing input arguments as Name=Value
//! FRITZ_PASSWORD=secret cargo run -p fritz-api --example call_action -- \
//!     192.168.178.1 Hosts GetGenericHostEntry NewIndex=0
//! ```
//!
//! Set `FRITZ_LOG_MODE=development` to see what the library does.

use std::collections::BTreeMap;
use std::process::ExitCode;

use fritz_api::{init_logging_from_env, Arguments, ConnectionConfig, FritzConnection};

fn main() -> ExitCode {
    if let Err(e) = init_logging_from_env() {
        eprintln!("{}", e);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(address) = args.first() else {
        eprintln!("usage: call_action <address> [<service> <action> [Name=Value ...]]");
        return ExitCode::FAILURE;
    };

    let fc = match FritzConnection::new(ConnectionConfig::new().address(address.as_str())) {
        Ok(fc) => fc,
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let output = match (args.get(1), args.get(2)) {
        (Some(service), Some(action)) => {
            let arguments: Arguments = args[3..]
                .iter()
                .filter_map(|pair| pair.split_once('='))
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();

            match fc.call_action(service, action, arguments) {
                Ok(response) => serde_json::to_string_pretty(&response),
                Err(e) => {
                    eprintln!("{}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        _ => {
            eprintln!("{}", fc);
            let services: BTreeMap<&str, Vec<&str>> = fc
                .services()
                .iter()
                .map(|(name, service)| (name.as_str(), service.actions().keys().map(String::as_str).collect()))
                .collect();
            serde_json::to_string_pretty(&services)
        }
    };

    match output {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize result: {}", e);
            ExitCode::FAILURE
        }
    }
}
