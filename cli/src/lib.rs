// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line surface of calsync.

mod cli;
mod cmd_apply;
mod cmd_context;
mod config;
#[cfg(test)]
mod testing;

pub use crate::cli::{Cli, Commands, run};
pub use crate::cmd_apply::CmdApply;
pub use crate::cmd_context::{CmdContext, ContextFormat};
pub use crate::config::{Config, parse_config};
