use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};

use crate::config::{
    BoardTarget, FailurePolicy, InboxConfig, Limits, ListSelector, RunConfig, DEFAULT_INBOX_DIR,
    DEFAULT_MAX_IN_FLIGHT, DEFAULT_REQUEST_INTERVAL_MS,
};

fn required(key: &str) -> Result<String> {
    match env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        Ok(_) => {
            error!(key, "Environment variable is set but empty");
            Err(anyhow::anyhow!("{key} is set but empty"))
        }
        Err(e) => {
            error!(key, error = ?e, "Environment variable not set");
            Err(anyhow::anyhow!("{key} environment variable not set: {e}"))
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

/// Reads the run configuration from environment variables.
///
/// Expects the caller (normally `main`) to have loaded `.env` already.
/// Returns a fully merged [`RunConfig`] or an error naming the first
/// variable that was missing or malformed.
pub fn load_config() -> Result<RunConfig> {
    info!("Loading configuration from environment");

    let api_key = required("API_KEY")?;
    let api_token = required("API_TOKEN")?;
    let board_id = required("BOARD_ID")?;

    // A directly supplied list id wins: it needs no lookup call.
    let list = match optional("LIST_ID") {
        Some(id) => {
            info!(list_id = %id, "LIST_ID found in env, no name resolution needed");
            ListSelector::Id(id)
        }
        None => match optional("LIST_NAME") {
            Some(name) => {
                info!(list_name = %name, "LIST_NAME found in env, will resolve against the board");
                ListSelector::Name(name)
            }
            None => {
                error!("Neither LIST_ID nor LIST_NAME is set");
                anyhow::bail!("either LIST_ID or LIST_NAME must be set");
            }
        },
    };

    let root = optional("INBOX_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INBOX_DIR));

    let request_interval = match optional("REQUEST_INTERVAL_MS") {
        Some(raw) => match raw.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(e) => {
                error!(value = %raw, error = ?e, "REQUEST_INTERVAL_MS must be a whole number of milliseconds");
                anyhow::bail!("REQUEST_INTERVAL_MS must be an integer: {e}");
            }
        },
        None => Duration::from_millis(DEFAULT_REQUEST_INTERVAL_MS),
    };

    let max_in_flight = match optional("MAX_IN_FLIGHT") {
        Some(raw) => match raw.parse::<usize>() {
            Ok(0) => {
                error!("MAX_IN_FLIGHT must be at least 1");
                anyhow::bail!("MAX_IN_FLIGHT must be at least 1");
            }
            Ok(n) => n,
            Err(e) => {
                error!(value = %raw, error = ?e, "MAX_IN_FLIGHT must be an integer");
                anyhow::bail!("MAX_IN_FLIGHT must be an integer: {e}");
            }
        },
        None => DEFAULT_MAX_IN_FLIGHT,
    };

    let on_failure = match optional("ON_FAILURE") {
        Some(raw) => match raw.as_str() {
            "keep" => FailurePolicy::Keep,
            "delete" => FailurePolicy::Delete,
            other => {
                error!(value = %other, "Unsupported ON_FAILURE value");
                anyhow::bail!("Unsupported ON_FAILURE value: {other} (expected keep or delete)");
            }
        },
        None => FailurePolicy::Keep,
    };

    info!(
        board_id = %board_id,
        inbox = %root.display(),
        "Config loaded and merged successfully"
    );

    Ok(RunConfig {
        board: BoardTarget {
            api_key,
            api_token,
            board_id,
            list,
        },
        inbox: InboxConfig { root, on_failure },
        limits: Limits {
            request_interval,
            max_in_flight,
        },
    })
}
