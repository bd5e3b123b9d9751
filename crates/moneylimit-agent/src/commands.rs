// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of inbound text.

use moneylimit_core::types::labels;
use moneylimit_core::UserId;

/// What an inbound text asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Begin,
    Today,
    Spent,
    ChangeAmount,
    Pay,
    Stats,
    Grant(Option<GrantArgs>),
    /// Anything else; its meaning depends on the dialogue state.
    Text(String),
}

/// Arguments of `/grant <user_id> <days>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrantArgs {
    pub user_id: UserId,
    pub days: u32,
}

/// Classify one inbound text.
pub fn parse(text: &str) -> Command {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix('/') {
        let mut parts = rest.split_whitespace();
        let name = parts.next().unwrap_or_default();
        // Commands in groups arrive as `/name@botname`.
        let name = name.split('@').next().unwrap_or_default();
        match name {
            "start" => return Command::Start,
            "stats" => return Command::Stats,
            "grant" => return Command::Grant(parse_grant(parts.collect())),
            _ => {}
        }
    }

    match trimmed {
        labels::BEGIN => Command::Begin,
        labels::TODAY => Command::Today,
        labels::SPENT => Command::Spent,
        labels::CHANGE_AMOUNT => Command::ChangeAmount,
        labels::PAY => Command::Pay,
        _ => Command::Text(trimmed.to_string()),
    }
}

fn parse_grant(args: Vec<&str>) -> Option<GrantArgs> {
    let [user_id, days] = args.as_slice() else {
        return None;
    };
    let user_id = user_id.parse::<i64>().ok().filter(|id| *id > 0)?;
    let days = days.parse::<u32>().ok().filter(|d| *d > 0)?;
    Some(GrantArgs {
        user_id: UserId(user_id),
        days,
    })
}
