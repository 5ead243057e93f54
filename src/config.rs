use std::path::PathBuf;
use std::time::Duration;

use tracing::info;

pub const DEFAULT_INBOX_DIR: &str = "files";
pub const DEFAULT_REQUEST_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Full configuration for one publishing run.
///
/// Built once by [`load_config`](crate::load_config::load_config) and passed
/// by reference afterwards; nothing mutates it for the lifetime of the
/// process.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub board: BoardTarget,
    pub inbox: InboxConfig,
    pub limits: Limits,
}

/// Where the cards go: credentials plus board and list coordinates.
#[derive(Debug, Clone)]
pub struct BoardTarget {
    pub api_key: String,
    pub api_token: String,
    pub board_id: String,
    pub list: ListSelector,
}

/// The target list, either known by id or still to be resolved by name.
#[derive(Debug, Clone)]
pub enum ListSelector {
    Id(String),
    Name(String),
}

#[derive(Debug, Clone)]
pub struct InboxConfig {
    pub root: PathBuf,
    pub on_failure: FailurePolicy,
}

/// What happens to a note whose card submission failed.
///
/// `Keep` leaves the file in place so a later run can pick it up again;
/// there is no idempotency key, so a rerun may file a duplicate card.
/// `Delete` drops the file and the submission with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Keep,
    Delete,
}

#[derive(Debug, Clone)]
pub struct Limits {
    /// Minimum spacing between card submissions, shared across all tasks.
    pub request_interval: Duration,
    /// Cap on concurrently running per-file tasks.
    pub max_in_flight: usize,
}

impl RunConfig {
    /// Logs a summary of the loaded configuration. Credentials stay out of
    /// the log stream.
    pub fn trace_loaded(&self) {
        info!(
            board_id = %self.board.board_id,
            list = ?self.board.list,
            inbox = %self.inbox.root.display(),
            on_failure = ?self.inbox.on_failure,
            request_interval_ms = self.limits.request_interval.as_millis() as u64,
            max_in_flight = self.limits.max_in_flight,
            "Loaded RunConfig"
        );
    }
}
