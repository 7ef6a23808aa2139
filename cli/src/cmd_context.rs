// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, path::PathBuf};

use calsync_core::{Batch, CalendarBackend, Interval, RemoteEvent, Synchronizer};
use clap::{ArgMatches, Command, ValueHint, arg, value_parser};
use jiff::Timestamp;
use serde::Serialize;
use tokio::fs;

use crate::cmd_apply::begin_or_empty;

/// How the context is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextFormat {
    /// One `[N] Title | START - END` line per event.
    Text,
    /// The snapshot with each event's reference, readable by `apply --context`.
    Json,
}

#[derive(Debug, Clone)]
pub struct CmdContext {
    pub format: ContextFormat,
    pub now: Option<Timestamp>,
    pub save: Option<PathBuf>,
}

impl CmdContext {
    pub const NAME: &str = "context";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Print upcoming events with the references actions may use")
            .arg(
                arg!(--format <FORMAT> "Output format")
                    .value_parser(["text", "json"])
                    .default_value("text"),
            )
            .arg(
                arg!(--now <NOW> "Start of the context window, RFC 3339")
                    .value_parser(value_parser!(Timestamp)),
            )
            .arg(
                arg!(--save <SNAPSHOT> "Also write the snapshot as JSON, for `apply --context`")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let format = match matches.get_one::<String>("format").map(String::as_str) {
            Some("json") => ContextFormat::Json,
            Some("text") | None => ContextFormat::Text,
            Some(other) => return Err(format!("Unknown format: {other}").into()),
        };
        let now = matches.get_one("now").copied();
        let save = matches.get_one("save").cloned();
        Ok(Self { format, now, save })
    }

    pub async fn run<B: CalendarBackend>(
        self,
        sync: &Synchronizer<B>,
    ) -> Result<(), Box<dyn Error>> {
        let now = self.now.unwrap_or_else(Timestamp::now);
        let batch = begin_or_empty(sync, now).await;
        if let Some(path) = &self.save {
            fs::write(path, snapshot_json(&batch)?)
                .await
                .map_err(|e| format!("Failed to write snapshot to {}: {}", path.display(), e))?;
            tracing::info!(
                path = %path.display(),
                events = batch.snapshot().len(),
                "saved snapshot"
            );
        }
        match self.format {
            ContextFormat::Text => {
                let text = batch.context().text();
                if !text.is_empty() {
                    println!("{text}");
                }
            }
            ContextFormat::Json => println!("{}", snapshot_json(&batch)?),
        }
        Ok(())
    }
}

/// The batch's snapshot with each event's reference.
///
/// Deserializes back into an `EventSnapshot` that numbers events the same way.
pub fn snapshot_json<B: CalendarBackend>(batch: &Batch<'_, B>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&ContextView::new(batch))
}

#[derive(Debug, Serialize)]
struct ContextView<'a> {
    window: Option<&'a Interval>,
    events: Vec<ContextEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ContextEntry<'a> {
    reference: u32,
    #[serde(flatten)]
    event: &'a RemoteEvent,
}

impl<'a> ContextView<'a> {
    fn new<B>(batch: &'a Batch<'_, B>) -> Self
    where
        B: CalendarBackend,
    {
        let ids = batch.context().ids();
        let events = batch
            .snapshot()
            .events()
            .iter()
            .filter_map(|event| {
                ids.reference_of(&event.id)
                    .map(|reference| ContextEntry { reference, event })
            })
            .collect();
        Self {
            window: batch.snapshot().window(),
            events,
        }
    }
}
