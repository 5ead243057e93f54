//! Coordinating module for the scan → throttle → submit pipeline.
//!
//! One run resolves the target list, scans the inbox once, then fans out
//! one task per scanned file. Fan-out is bounded by a semaphore sized from
//! the config, independent of the shared request throttle, so filesystem
//! and memory pressure stay bounded even when the network is the slow part.
//! The run drains every task before returning its report; per-file failures
//! are recorded, never retried.

use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use futures::future::join_all;
use thiserror::Error;
use tokio::sync::{watch, Semaphore};
use tracing::{debug, error, info, warn};

use crate::board::{BoardClient, BoardError, NewCard};
use crate::config::{FailurePolicy, ListSelector, RunConfig};
use crate::scan::collect_files;
use crate::throttle::Throttle;

/// Extension a note must carry to be picked up.
pub const NOTE_EXTENSION: &str = "txt";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("list {name:?} not found on board {board_id}")]
    ListNotFound { name: String, board_id: String },
    #[error("list lookup for board {board_id} failed: {source}")]
    ListLookup {
        board_id: String,
        #[source]
        source: BoardError,
    },
    #[error("failed to scan inbox {}: {}", .root.display(), .source)]
    Scan {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One successfully filed note.
#[derive(Debug)]
pub struct CardOutcome {
    pub file: PathBuf,
    pub card_id: String,
}

/// A note that could not be filed this run.
#[derive(Debug)]
pub struct FileFailure {
    pub file: PathBuf,
    pub reason: String,
}

/// What a publishing run did, for the caller to report.
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Notes with the recognised extension the run attempted, whether or
    /// not their submission was confirmed.
    pub eligible: usize,
    pub created: Vec<CardOutcome>,
    pub failed: Vec<FileFailure>,
    /// Notes skipped because shutdown was requested before submission.
    pub cancelled: usize,
}

/// Resolves the configured list to an identifier, looking it up by name if
/// no id was supplied. Matching is exact and case-sensitive, first match
/// wins. Runs exactly once, before any file task spawns.
pub async fn resolve_list<C: BoardClient>(
    client: &C,
    board_id: &str,
    selector: &ListSelector,
) -> Result<String, PublishError> {
    match selector {
        ListSelector::Id(id) => Ok(id.clone()),
        ListSelector::Name(name) => {
            info!(board_id, list_name = %name, "Resolving list id by name");
            let lists = client.lists(board_id).await.map_err(|e| {
                error!(board_id, error = ?e, "List lookup failed");
                PublishError::ListLookup {
                    board_id: board_id.to_string(),
                    source: e,
                }
            })?;
            match lists.into_iter().find(|l| l.name == *name) {
                Some(list) => {
                    info!(list_id = %list.id, list_name = %name, "Resolved list");
                    Ok(list.id)
                }
                None => {
                    error!(board_id, list_name = %name, "No list with that name on the board");
                    Err(PublishError::ListNotFound {
                        name: name.clone(),
                        board_id: board_id.to_string(),
                    })
                }
            }
        }
    }
}

/// State shared by every per-file task.
struct TaskShared<C> {
    client: Arc<C>,
    board_id: String,
    list_id: String,
    policy: FailurePolicy,
    throttle: Throttle,
    permits: Semaphore,
    eligible: AtomicUsize,
}

enum TaskOutcome {
    Skipped,
    Created(CardOutcome),
    Failed(FileFailure),
    Cancelled,
}

/// Entrypoint: file every eligible note under the configured inbox as a
/// card on the configured board and list.
pub async fn publish<C>(
    config: &RunConfig,
    client: Arc<C>,
    shutdown: watch::Receiver<bool>,
) -> Result<PublishReport, PublishError>
where
    C: BoardClient + 'static,
{
    let list_id = resolve_list(client.as_ref(), &config.board.board_id, &config.board.list).await?;

    let root = &config.inbox.root;
    let files = collect_files(root).map_err(|e| {
        error!(root = %root.display(), error = ?e, "Inbox scan failed");
        PublishError::Scan {
            root: root.clone(),
            source: e,
        }
    })?;
    info!(root = %root.display(), entries = files.len(), "Inbox scan finished, dispatching tasks");

    let shared = Arc::new(TaskShared {
        client,
        board_id: config.board.board_id.clone(),
        list_id,
        policy: config.inbox.on_failure,
        throttle: Throttle::new(config.limits.request_interval),
        permits: Semaphore::new(config.limits.max_in_flight),
        eligible: AtomicUsize::new(0),
    });

    let mut paths = Vec::with_capacity(files.len());
    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        paths.push(path.clone());
        handles.push(tokio::spawn(process_note(
            shared.clone(),
            path,
            shutdown.clone(),
        )));
    }

    let mut report = PublishReport::default();
    for (path, joined) in paths.into_iter().zip(join_all(handles).await) {
        match joined {
            Ok(TaskOutcome::Skipped) => {}
            Ok(TaskOutcome::Created(outcome)) => report.created.push(outcome),
            Ok(TaskOutcome::Failed(failure)) => report.failed.push(failure),
            Ok(TaskOutcome::Cancelled) => report.cancelled += 1,
            Err(e) => {
                error!(file = %path.display(), error = ?e, "File task panicked");
                report.failed.push(FileFailure {
                    file: path,
                    reason: format!("task panicked: {e}"),
                });
            }
        }
    }
    report.eligible = shared.eligible.load(Ordering::Relaxed);

    info!(
        eligible = report.eligible,
        created = report.created.len(),
        failed = report.failed.len(),
        cancelled = report.cancelled,
        "Publish run complete"
    );

    Ok(report)
}

/// Resolves once the shutdown signal is raised. Pends forever if the sender
/// is gone without ever raising it.
async fn shutdown_requested(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

async fn process_note<C>(
    shared: Arc<TaskShared<C>>,
    path: PathBuf,
    mut shutdown: watch::Receiver<bool>,
) -> TaskOutcome
where
    C: BoardClient,
{
    if path.extension().and_then(|e| e.to_str()) != Some(NOTE_EXTENSION) {
        return TaskOutcome::Skipped;
    }
    shared.eligible.fetch_add(1, Ordering::Relaxed);

    // Bound how many tasks hold file content in memory at once.
    let _permit = tokio::select! {
        biased;
        _ = shutdown_requested(&mut shutdown) => return TaskOutcome::Cancelled,
        permit = shared.permits.acquire() => match permit {
            Ok(p) => p,
            Err(_) => return TaskOutcome::Cancelled,
        },
    };

    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!(file = %path.display(), error = ?e, "Failed to read note, leaving it in place");
            return TaskOutcome::Failed(FileFailure {
                file: path,
                reason: format!("read failed: {e}"),
            });
        }
    };

    tokio::select! {
        biased;
        _ = shutdown_requested(&mut shutdown) => return TaskOutcome::Cancelled,
        _ = shared.throttle.acquire() => {}
    }

    let title = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let req = NewCard {
        title: &title,
        body: &content,
        board_id: &shared.board_id,
        list_id: &shared.list_id,
    };

    match shared.client.create_card(req).await {
        Ok(card) => {
            println!("Filed card for {title}");
            info!(file = %path.display(), card_id = %card.id, "Card created");
            if let Ok(json) = serde_json::to_string(&card) {
                debug!(json = %json, "Created card response");
            }
            if let Err(e) = fs::remove_file(&path) {
                warn!(file = %path.display(), error = ?e, "Failed to remove filed note");
            }
            TaskOutcome::Created(CardOutcome {
                file: path,
                card_id: card.id,
            })
        }
        Err(e) => {
            println!("Error creating card for {title}: {e}");
            error!(file = %path.display(), error = ?e, "Card creation failed");
            if shared.policy == FailurePolicy::Delete {
                if let Err(rm) = fs::remove_file(&path) {
                    warn!(file = %path.display(), error = ?rm, "Failed to remove note after failed submission");
                }
            }
            TaskOutcome::Failed(FileFailure {
                file: path,
                reason: e.to_string(),
            })
        }
    }
}
