use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_publish_subcommand() {
    let mut cmd = Command::cargo_bin("card-courier").expect("Binary exists");
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("publish"));
}

#[test]
fn publish_fails_fast_without_credentials() {
    let mut cmd = Command::cargo_bin("card-courier").expect("Binary exists");
    cmd.arg("publish").env_clear();

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("API_KEY"));
}
