use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serial_test::serial;

use card_courier::config::{FailurePolicy, ListSelector};
use card_courier::load_config::load_config;

const ALL_KEYS: &[&str] = &[
    "API_KEY",
    "API_TOKEN",
    "BOARD_ID",
    "LIST_ID",
    "LIST_NAME",
    "INBOX_DIR",
    "REQUEST_INTERVAL_MS",
    "MAX_IN_FLIGHT",
    "ON_FAILURE",
];

fn clear_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
}

fn set_required() {
    env::set_var("API_KEY", "test-key");
    env::set_var("API_TOKEN", "test-token");
    env::set_var("BOARD_ID", "board-1");
}

#[test]
#[serial]
fn loads_defaults_with_list_name() {
    clear_env();
    set_required();
    env::set_var("LIST_NAME", "Inbox");

    let config = load_config().expect("config should load");

    assert_eq!(config.board.api_key, "test-key");
    assert_eq!(config.board.api_token, "test-token");
    assert_eq!(config.board.board_id, "board-1");
    assert!(matches!(
        config.board.list,
        ListSelector::Name(ref name) if name == "Inbox"
    ));
    assert_eq!(config.inbox.root, PathBuf::from("files"));
    assert_eq!(config.inbox.on_failure, FailurePolicy::Keep);
    assert_eq!(config.limits.request_interval, Duration::from_millis(1000));
    assert_eq!(config.limits.max_in_flight, 8);
}

#[test]
#[serial]
fn list_id_takes_precedence_over_list_name() {
    clear_env();
    set_required();
    env::set_var("LIST_ID", "list-42");
    env::set_var("LIST_NAME", "Inbox");

    let config = load_config().expect("config should load");
    assert!(matches!(
        config.board.list,
        ListSelector::Id(ref id) if id == "list-42"
    ));
}

#[test]
#[serial]
fn overrides_are_applied() {
    clear_env();
    set_required();
    env::set_var("LIST_ID", "list-42");
    env::set_var("INBOX_DIR", "/tmp/notes");
    env::set_var("REQUEST_INTERVAL_MS", "250");
    env::set_var("MAX_IN_FLIGHT", "2");
    env::set_var("ON_FAILURE", "delete");

    let config = load_config().expect("config should load");
    assert_eq!(config.inbox.root, PathBuf::from("/tmp/notes"));
    assert_eq!(config.inbox.on_failure, FailurePolicy::Delete);
    assert_eq!(config.limits.request_interval, Duration::from_millis(250));
    assert_eq!(config.limits.max_in_flight, 2);
}

#[test]
#[serial]
fn missing_credentials_fail() {
    clear_env();
    env::set_var("API_TOKEN", "test-token");
    env::set_var("BOARD_ID", "board-1");
    env::set_var("LIST_ID", "list-1");

    let err = load_config().unwrap_err();
    assert!(err.to_string().contains("API_KEY"), "got: {err}");
}

#[test]
#[serial]
fn missing_both_list_selectors_fails() {
    clear_env();
    set_required();

    let err = load_config().unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("LIST_ID") && msg.contains("LIST_NAME"),
        "got: {msg}"
    );
}

#[test]
#[serial]
fn empty_values_count_as_missing() {
    clear_env();
    set_required();
    env::set_var("LIST_ID", "");
    env::set_var("LIST_NAME", "Inbox");

    let config = load_config().expect("config should load");
    assert!(matches!(
        config.board.list,
        ListSelector::Name(ref name) if name == "Inbox"
    ));
}

#[test]
#[serial]
fn unparsable_interval_fails() {
    clear_env();
    set_required();
    env::set_var("LIST_ID", "list-1");
    env::set_var("REQUEST_INTERVAL_MS", "soon");

    let err = load_config().unwrap_err();
    assert!(err.to_string().contains("REQUEST_INTERVAL_MS"), "got: {err}");
}

#[test]
#[serial]
fn zero_in_flight_cap_fails() {
    clear_env();
    set_required();
    env::set_var("LIST_ID", "list-1");
    env::set_var("MAX_IN_FLIGHT", "0");

    let err = load_config().unwrap_err();
    assert!(err.to_string().contains("MAX_IN_FLIGHT"), "got: {err}");
}

#[test]
#[serial]
fn unknown_failure_policy_fails() {
    clear_env();
    set_required();
    env::set_var("LIST_ID", "list-1");
    env::set_var("ON_FAILURE", "quarantine");

    let err = load_config().unwrap_err();
    assert!(err.to_string().contains("ON_FAILURE"), "got: {err}");
}
