use std::{fs, path::PathBuf};

use clap::Parser;
use prost::Message;
use prost_reflect::DynamicMessage;
use proto::DESCRIPTOR_POOL;

#[derive(Debug, Parser)]
pub struct Cli {
    /// Fully-qualified message name, e.g. serving.fixtures.ModelSpec
    #[arg(required = true)]
    pub message_name: String,
    /// Text format fixture file to check
    #[arg(required = true)]
    pub fixture_file: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let Cli {
        message_name,
        fixture_file: path,
    } = Cli::parse();

    let descriptor = DESCRIPTOR_POOL
        .get_message_by_name(&message_name)
        .ok_or_else(|| {
            let known = DESCRIPTOR_POOL
                .all_messages()
                .filter(|message| !message.is_map_entry())
                .map(|message| message.full_name().to_owned())
                .collect::<Vec<_>>();
            anyhow::anyhow!("Unknown message {:?}, expected one of {:?}", message_name, known)
        })?;

    let text = fs::read_to_string(&path)?;
    log::info!("Parsing {:?} as {}", &path, descriptor.full_name());
    let message = DynamicMessage::parse_text_format(descriptor, &text)
        .map_err(|err| anyhow::anyhow!("Failed to parse {:#?}: {}", &path, err))?;

    let encoded = message.encode_to_vec();
    log::debug!("Canonical encoding is {} bytes", encoded.len());
    println!("{}", message.to_text_format());
    println!(
        "{}",
        encoded
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>()
    );
    Ok(())
}
