use anyhow::Context;
use clap::{ArgGroup, Parser, Subcommand};
use kmp_rs::messages::{GetRegisterRequest, GetSerialRequest, GetTypeRequest, KmpRequest, RegisterId};
use kmp_rs::payload::{warn_registers_unknowns, RegisterOutput};
use kmp_rs::{init_with_verbosity, ClientConfig, KmpDeviceHandle, KmpError};
use log::error;
use serde_json::json;

#[derive(Parser)]
#[command(name = "kmp-cli")]
#[command(about = "CLI tool for reading meters with the Kamstrup Meter Protocol (KMP)")]
struct Cli {
    /// Serial device, or socket://<host>:<port> for a TCP connection
    #[arg(short = 'd', long, env = "KMP_SERIAL_DEVICE", default_value = "/dev/ttyUSB0")]
    serial_device: String,

    /// Destination address ([decimal] or 0x[hex])
    #[arg(short = 'a', long, env = "KMP_DESTINATION_ADDRESS", default_value = "0x3F", value_parser = parse_dec_or_hex)]
    destination_address: u16,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Request the serial number of the meter and print it
    GetSerial,
    /// Request the meter type and software revision and print them
    GetType,
    /// Request register(s) of the meter and print the response
    #[command(group(ArgGroup::new("format").args(["text", "json"])))]
    GetRegister {
        /// Register ID ([decimal] or 0x[hex]); repeat for multiple registers (max 8)
        #[arg(
            long,
            env = "KMP_GET_REGISTERS",
            value_delimiter = ' ',
            default_value = "60",
            value_parser = parse_dec_or_hex
        )]
        register: Vec<u16>,
        /// Output format: text to stdout (default)
        #[arg(long)]
        text: bool,
        /// Output format: JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

fn parse_dec_or_hex(value: &str) -> Result<u16, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|e| format!("'{value}' is not a decimal or 0x-prefixed hex number: {e}"))
}

/// Sends one request; a timeout is logged and yields `None`.
async fn exchange<R: KmpRequest>(
    config: &ClientConfig,
    request: &R,
) -> anyhow::Result<Option<R::Response>> {
    let mut handle = KmpDeviceHandle::open(config)
        .await
        .with_context(|| format!("opening {}", config.serial_device))?;
    match handle.send_request(request).await {
        Ok(response) => Ok(Some(response)),
        Err(e @ KmpError::Timeout(_)) => {
            error!("{e}");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_with_verbosity(cli.verbose);

    let config = ClientConfig::new(cli.serial_device).with_destination_address(cli.destination_address);

    match cli.command {
        Commands::GetSerial => {
            if let Some(response) = exchange(&config, &GetSerialRequest).await? {
                println!("Meter serial is: {}", response.serial);
            }
        }
        Commands::GetType => {
            if let Some(response) = exchange(&config, &GetTypeRequest).await? {
                println!("Meter type: 0x{}", hex::encode_upper(response.meter_type));
                println!(
                    "Software revision: {}",
                    response.software_revision.as_deref().unwrap_or("unavailable")
                );
            }
        }
        Commands::GetRegister { register, json, .. } => {
            let request = GetRegisterRequest::new(register.into_iter().map(RegisterId));
            let Some(response) = exchange(&config, &request).await? else {
                return Ok(());
            };

            warn_registers_unknowns(response.registers.values());
            let outputs = response
                .registers
                .values()
                .map(RegisterOutput::from_register_data)
                .collect::<Result<Vec<_>, _>>()?;

            if json {
                println!("{}", json!({ "register_data": outputs }));
            } else {
                println!("GetRegister response(s):");
                for output in &outputs {
                    println!("{}", output.to_pretty_line());
                }
            }
        }
    }

    Ok(())
}
