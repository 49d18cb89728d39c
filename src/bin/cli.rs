//! sbtcell CLI
//!
//! Command-line interface for building content cells and message bodies.
//! Every cell is printed as a hex-encoded bag of cells.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use sbtcell::boc;
use sbtcell::content::{self, ContentDictionary};
use sbtcell::deploy::Deployment;
use sbtcell::protocol::{decode_message, encode_message, Command, Message, OpCode, OpCodeEntry};
use sbtcell::snake::SnakeEncoder;
use sbtcell::{Address, Cell, Config, Result, SbtError};
use tracing_subscriber::{fmt, EnvFilter};

/// sbtcell CLI
#[derive(Parser, Debug)]
#[command(name = "sbtcell-cli")]
#[command(about = "Encode content and messages for soulbound item/collection contracts")]
#[command(version)]
struct Args {
    /// Bytes per snake cell
    #[arg(long, default_value = "127")]
    chunk_size: usize,

    /// Workchain for address derivation
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    workchain: i8,

    /// Query id stamped on messages
    #[arg(short, long, default_value = "1")]
    query_id: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the dictionary key of a field name
    Key {
        /// The field name
        name: String,
    },

    /// Snake-encode a string
    Snake {
        /// The text to encode
        text: String,
    },

    /// Build an on-chain content cell
    Content {
        /// Field as name=value (repeatable)
        #[arg(short, long = "field", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// JSON object of string fields
        #[arg(long)]
        file: Option<PathBuf>,

        /// JSON diploma metadata record (all five fields required)
        #[arg(long, conflicts_with = "file")]
        metadata: Option<PathBuf>,
    },

    /// List the operation table
    Opcodes {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode a message body
    Message {
        /// Operation symbol or hex code
        op: String,

        /// Destination address (prove_ownership, request_owner)
        #[arg(long)]
        dest: Option<Address>,

        /// Forward payload as hex bag of cells (defaults to an empty cell)
        #[arg(long)]
        payload: Option<String>,

        /// Ask for the item content in the reply
        #[arg(long)]
        with_content: bool,

        /// New description (change_description)
        #[arg(long)]
        description: Option<String>,

        /// Owner address (mint, init_sbt)
        #[arg(long)]
        owner: Option<Address>,

        /// Authority address (mint, init_sbt)
        #[arg(long)]
        authority: Option<Address>,

        /// Content as hex bag of cells (mint, init_sbt)
        #[arg(long)]
        content: Option<String>,
    },

    /// Decode a message body from a hex bag of cells
    Decode {
        /// The hex bag of cells
        boc: String,
    },

    /// Derive the address of a code/data pair
    Address {
        /// Code as hex bag of cells
        #[arg(long)]
        code: String,

        /// Data as hex bag of cells
        #[arg(long)]
        data: String,
    },
}

fn parse_field(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected name=value, got '{}'", raw))
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sbtcell=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match Config::builder()
        .chunk_size(args.chunk_size)
        .workchain(args.workchain)
        .query_id(args.query_id)
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&config, args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(config: &Config, command: Commands) -> Result<()> {
    match command {
        Commands::Key { name } => {
            println!("{}", content::key_of(&name));
        }

        Commands::Snake { text } => {
            let cell = SnakeEncoder::from_config(config).encode(text.as_bytes())?;
            println!("{}", boc::to_hex(&cell));
        }

        Commands::Content { fields, file, metadata } => {
            let mut dict = ContentDictionary::new();
            if let Some(path) = metadata {
                dict = content::load_metadata(&path)?.to_dictionary()?;
            }
            if let Some(path) = file {
                for (name, value) in content::load_fields(&path)? {
                    dict.insert(&name, &value)?;
                }
            }
            for (name, value) in fields {
                dict.insert(&name, &value)?;
            }
            tracing::info!("Built content with {} fields", dict.len());
            println!("{}", boc::to_hex(&dict.to_cell()?));
        }

        Commands::Opcodes { json } => {
            let entries: Vec<OpCodeEntry> = OpCode::ALL.into_iter().map(OpCodeEntry::from).collect();
            if json {
                let text = serde_json::to_string_pretty(&entries)
                    .map_err(|e| SbtError::Serialization(e.to_string()))?;
                println!("{}", text);
            } else {
                for entry in entries {
                    println!("{:<20} {}", entry.symbol, entry.code);
                }
            }
        }

        Commands::Message {
            op,
            dest,
            payload,
            with_content,
            description,
            owner,
            authority,
            content,
        } => {
            let op: OpCode = op.parse()?;
            let command = match op {
                OpCode::Transfer => Command::Transfer,
                OpCode::GetStaticData => Command::GetStaticData,
                OpCode::Destroy => Command::Destroy,
                OpCode::Revoke => Command::Revoke,
                OpCode::TakeExcess => Command::TakeExcess,
                OpCode::Excesses => Command::Excesses,
                OpCode::ProveOwnership | OpCode::RequestOwner => {
                    let destination = required(dest, "--dest")?;
                    let forward_payload = Arc::new(optional_cell(payload.as_deref())?);
                    if op == OpCode::ProveOwnership {
                        Command::ProveOwnership {
                            destination,
                            forward_payload,
                            with_content,
                        }
                    } else {
                        Command::RequestOwner {
                            destination,
                            forward_payload,
                            with_content,
                        }
                    }
                }
                OpCode::ChangeDescription => Command::ChangeDescription {
                    description: required(description, "--description")?,
                },
                OpCode::Mint | OpCode::InitSbt => {
                    let owner = required(owner, "--owner")?;
                    let authority = required(authority, "--authority")?;
                    let content = Arc::new(optional_cell(content.as_deref())?);
                    if op == OpCode::Mint {
                        Command::Mint {
                            owner,
                            authority,
                            content,
                        }
                    } else {
                        Command::InitSbt {
                            owner,
                            authority,
                            content,
                        }
                    }
                }
                OpCode::ReportStaticData | OpCode::OwnershipProof | OpCode::OwnerInfo => {
                    return Err(SbtError::InvalidArgument(format!(
                        "{} is sent by contracts, not built from the CLI",
                        op.symbol()
                    )));
                }
            };
            let cell = encode_message(&Message::new(config.query_id, command))?;
            println!("{}", boc::to_hex(&cell));
        }

        Commands::Decode { boc: text } => {
            let message = decode_message(&boc::from_hex(&text)?)?;
            println!("op:       {}", message.op());
            println!("query_id: {}", message.query_id);
            println!("{:#?}", message.command);
        }

        Commands::Address { code, data } => {
            let code = Arc::new(boc::from_hex(&code)?);
            let data = boc::from_hex(&data)?;
            let deployment = Deployment::new(code, data, config.workchain)?;
            println!("{}", deployment.address);
        }
    }
    Ok(())
}

fn required<T>(value: Option<T>, flag: &str) -> Result<T> {
    value.ok_or_else(|| SbtError::InvalidArgument(format!("{} is required for this operation", flag)))
}

fn optional_cell(hex: Option<&str>) -> Result<Cell> {
    match hex {
        Some(text) => boc::from_hex(text),
        None => Ok(Cell::empty()),
    }
}
