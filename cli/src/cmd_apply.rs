// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    error::Error,
    path::{Path, PathBuf},
};

use calsync_core::{ActionRequest, Batch, CalendarBackend, EventSnapshot, Synchronizer};
use clap::{ArgMatches, Command, ValueHint, arg, value_parser};
use jiff::Timestamp;
use tokio::fs;

#[derive(Debug, Clone)]
pub struct CmdApply {
    pub actions: PathBuf,
    pub context: Option<PathBuf>,
    pub now: Option<Timestamp>,
}

impl CmdApply {
    pub const NAME: &str = "apply";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Apply a JSON array of actions and print the batch result")
            .arg(
                arg!(<ACTIONS> "Path to the actions file")
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(--context <SNAPSHOT> "Snapshot the actions' references were made against")
                    .long_help(
                        "\
Snapshot the actions' references were made against, as written by `context --save` or \
`context --format json`. Required when any action carries an existing reference.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath),
            )
            .arg(
                arg!(--now <NOW> "Start of the context window, RFC 3339")
                    .value_parser(value_parser!(Timestamp))
                    .conflicts_with("context"),
            )
    }

    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let actions = matches
            .get_one::<PathBuf>("ACTIONS")
            .cloned()
            .ok_or("Actions file is required")?;
        let context = matches.get_one("context").cloned();
        let now = matches.get_one("now").copied();
        Ok(Self {
            actions,
            context,
            now,
        })
    }

    pub async fn run<B: CalendarBackend>(
        self,
        sync: &Synchronizer<B>,
    ) -> Result<(), Box<dyn Error>> {
        let actions = read_actions(&self.actions).await?;
        tracing::info!(count = actions.len(), path = %self.actions.display(), "loaded actions");

        let batch = match &self.context {
            Some(path) => sync.batch(read_snapshot(path).await?),
            None => {
                let referenced: Vec<_> = actions
                    .iter()
                    .enumerate()
                    .filter(|(_, a)| a.existing_reference.is_some())
                    .map(|(index, _)| index.to_string())
                    .collect();
                if !referenced.is_empty() {
                    return Err(format!(
                        "Actions {} carry references; pass --context with the snapshot they \
                         were made against",
                        referenced.join(", ")
                    )
                    .into());
                }
                begin_or_empty(sync, self.now.unwrap_or_else(Timestamp::now)).await
            }
        };
        let result = batch.apply(&actions).await;
        println!("{}", serde_json::to_string_pretty(&result)?);

        if result.auth_failed() {
            return Err("Authentication failed, re-authorize before the next batch".into());
        }
        if result.has_failures() {
            let failed = result.counts.failed;
            return Err(format!("{failed} of {} actions failed", result.total()).into());
        }
        Ok(())
    }
}

async fn read_actions(path: &Path) -> Result<Vec<ActionRequest>, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read actions file at {}: {}", path.display(), e))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("Invalid actions in {}: {}", path.display(), e).into())
}

async fn read_snapshot(path: &Path) -> Result<EventSnapshot, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|e| format!("Failed to read snapshot at {}: {}", path.display(), e))?;
    let snapshot: EventSnapshot = serde_json::from_str(&text)
        .map_err(|e| format!("Invalid snapshot in {}: {}", path.display(), e))?;
    tracing::info!(path = %path.display(), events = snapshot.len(), "loaded snapshot");
    Ok(snapshot)
}

/// Fetches the context, falling back to an empty snapshot when the remote is unreachable.
pub async fn begin_or_empty<B: CalendarBackend>(
    sync: &Synchronizer<B>,
    now: Timestamp,
) -> Batch<'_, B> {
    match sync.begin(now).await {
        Ok(batch) => batch,
        Err(e) => {
            tracing::warn!(error = %e, "could not fetch calendar context, continuing without it");
            sync.batch(EventSnapshot::empty())
        }
    }
}
