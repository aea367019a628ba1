// SPDX-FileCopyrightText: Copyright (c) 2025-2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0

//! `nrtctl`: inspect, convert and publish NodeResourceTopology objects.

use std::collections::HashSet;
use std::fmt::Write as _;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use serde::Serialize;
use topology_api::codec::{self, json, Encoding, ProtoMessage};
use topology_api::v1alpha1::{ApiObject, NodeResourceTopology, Zone};
use topology_api::{crd, logging, validation, TopologyClient, TopologyConfig, ZoneIndex};

#[derive(Parser)]
#[clap(name = "nrtctl", version, about = "NodeResourceTopology tooling")]
struct Args {
    /// Field manager for server-side apply (overrides NRT_FIELD_MANAGER)
    #[clap(long, global = true)]
    field_manager: Option<String>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the CustomResourceDefinition, or install it into the cluster
    Crd {
        #[clap(long)]
        install: bool,

        /// Seconds to wait for the CRD to become established
        #[clap(long, default_value_t = 60)]
        timeout: u64,
    },

    /// Re-encode an object file (`-` for stdin)
    Convert {
        input: PathBuf,

        /// Input encoding; guessed from the payload when omitted
        #[clap(long)]
        from: Option<Encoding>,

        #[clap(long)]
        to: Encoding,

        /// Output file; stdout when omitted
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Check objects against the topology invariants
    Validate {
        #[clap(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Print the zone hierarchy of an object file
    Tree { input: PathBuf },

    /// Fetch one object from the cluster
    Get {
        node: String,

        #[clap(short, long)]
        output: Option<Encoding>,
    },

    /// List objects in the cluster
    List {
        /// Label selector, e.g. `rack=a1`
        #[clap(short = 'l', long)]
        selector: Option<String>,

        #[clap(short, long)]
        output: Option<Encoding>,
    },

    /// Server-side apply an object file to the cluster
    Apply {
        input: PathBuf,

        /// Do not take ownership of fields held by other managers
        #[clap(long)]
        no_force: bool,

        #[clap(long)]
        skip_validation: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();

    let mut config = TopologyConfig::from_env().context("Failed to load configuration")?;
    if let Some(field_manager) = args.field_manager {
        config.field_manager = field_manager;
    }

    match args.command {
        Command::Crd { install, timeout } => {
            if install {
                let client = TopologyClient::try_default(config).await?;
                let installed = client.install_crd(Duration::from_secs(timeout)).await?;
                println!(
                    "{} established",
                    installed.metadata.name.as_deref().unwrap_or_default()
                );
            } else {
                print!("{}", crd::crd_yaml()?);
            }
        }
        Command::Convert {
            input,
            from,
            to,
            output,
        } => {
            let object = read_object(&input, from)?;
            let bytes = codec::encode(&object, to)?;
            match output {
                Some(path) => std::fs::write(&path, bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?,
                None => std::io::stdout().write_all(&bytes)?,
            }
        }
        Command::Validate { inputs } => {
            let mut failed = 0;
            for input in &inputs {
                let object = read_object(input, None)?;
                match validation::validate(&object) {
                    Ok(()) => println!("{}: ok", input.display()),
                    Err(err) => {
                        failed += 1;
                        println!("{}: {} violation(s)", input.display(), err.violations.len());
                        for violation in &err.violations {
                            println!("  - {violation}");
                        }
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{failed} of {} object(s) failed validation", inputs.len());
            }
        }
        Command::Tree { input } => {
            let object = read_object(&input, None)?;
            print!("{}", render_tree(&object));
        }
        Command::Get { node, output } => {
            let client = TopologyClient::try_default(config).await?;
            let encoding = output.unwrap_or(client.config().encoding);
            let object = client.get(&node).await?;
            std::io::stdout().write_all(&render_output(&object, encoding)?)?;
        }
        Command::List { selector, output } => {
            let client = TopologyClient::try_default(config).await?;
            let list = client.list(selector.as_deref()).await?;
            match output {
                Some(encoding) => {
                    std::io::stdout().write_all(&render_output(&list, encoding)?)?;
                }
                None => {
                    for item in &list.items {
                        println!(
                            "{}\t{} zone(s)",
                            item.metadata.name.as_deref().unwrap_or_default(),
                            item.zones.len()
                        );
                    }
                }
            }
        }
        Command::Apply {
            input,
            no_force,
            skip_validation,
        } => {
            if no_force {
                config.force_apply = false;
            }
            if skip_validation {
                config.validate_before_apply = false;
            }
            let object = read_object(&input, None)?;
            let client = TopologyClient::try_default(config).await?;
            let applied = client.apply(&object).await?;
            println!(
                "{} applied (resourceVersion {})",
                applied.metadata.name.as_deref().unwrap_or_default(),
                applied.metadata.resource_version.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}

fn read_object(input: &Path, encoding: Option<Encoding>) -> Result<NodeResourceTopology> {
    let payload = if input.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?
    };

    let encoding = encoding.unwrap_or_else(|| Encoding::sniff(&payload));
    tracing::debug!(input = %input.display(), %encoding, "decoding object");
    codec::decode(&payload, encoding).with_context(|| format!("Failed to decode {}", input.display()))
}

/// Terminal output: JSON is pretty-printed and text ends with a newline.
fn render_output<T>(value: &T, encoding: Encoding) -> Result<Vec<u8>>
where
    T: Serialize + ProtoMessage + ApiObject,
{
    let mut bytes = match encoding {
        Encoding::Json => json::to_string_pretty(value)?.into_bytes(),
        _ => codec::encode(value, encoding)?,
    };
    if encoding.is_textual() && !bytes.ends_with(b"\n") {
        bytes.push(b'\n');
    }
    Ok(bytes)
}

/// Indented zone hierarchy; zones not reachable from a root are listed last.
fn render_tree(object: &NodeResourceTopology) -> String {
    let index = ZoneIndex::new(&object.zones);
    let mut out = String::new();
    let mut seen = HashSet::new();

    let _ = writeln!(
        out,
        "{}",
        object.metadata.name.as_deref().unwrap_or("<unnamed>")
    );
    for root in index.roots() {
        render_zone(&index, root, 1, &mut seen, &mut out);
    }

    let detached: Vec<&Zone> = object
        .zones
        .iter()
        .filter(|z| !seen.contains(z.name.as_str()))
        .collect();
    if !detached.is_empty() {
        let _ = writeln!(out, "detached:");
        for zone in detached {
            let _ = writeln!(
                out,
                "  {} ({}) parent={}",
                zone.name,
                zone.zone_type,
                zone.parent_name().unwrap_or_default()
            );
        }
    }
    out
}

fn render_zone<'a>(
    index: &ZoneIndex<'a>,
    zone: &'a Zone,
    depth: usize,
    seen: &mut HashSet<&'a str>,
    out: &mut String,
) {
    if !seen.insert(zone.name.as_str()) {
        return;
    }
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}{} ({})", zone.name, zone.zone_type);
    for resource in &zone.resources {
        let _ = writeln!(
            out,
            "{indent}  - {}: capacity={} allocatable={} available={}",
            resource.name, resource.capacity, resource.allocatable, resource.available
        );
    }
    for child in index.children_of(&zone.name) {
        render_zone(index, child, depth + 1, seen, out);
    }
}
