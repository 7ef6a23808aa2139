// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! calsync - reconcile decided calendar actions against a remote calendar

use std::process::ExitCode;

use calsync_cli::run;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}
