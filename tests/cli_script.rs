use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ledger_core_cli").unwrap();
    cmd.env("LEDGER_CORE_CLI_SCRIPT", "1")
        .env("LEDGER_CORE_HOME", home.path())
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .env("RUST_LOG", "off");
    cmd
}

const SCENARIO: &str = "\
add 2024-01-05 Expense 100 Food lunch
add 2024-01-10 Income 500 Salary
add 2024-01-10 Expense 50 Transport \"bus pass\"
";

#[test]
fn script_mode_records_and_persists() {
    let home = TempDir::new().unwrap();
    let input = format!("{SCENARIO}balance\nexit\n");

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Recorded."))
        .stdout(contains("bus pass"))
        .stdout(contains("350.00"));

    let json = std::fs::read_to_string(home.path().join("transactions.json")).unwrap();
    assert!(json.contains("\"Salary\""));
    assert!(json.contains("\"new_balance\": 350.0"));
}

#[test]
fn delete_by_row_uses_display_order() {
    let home = TempDir::new().unwrap();
    cli(&home).write_stdin(SCENARIO).assert().success();

    // Newest first: row 1 is Transport, row 2 is Salary.
    cli(&home)
        .write_stdin("delete 2\nbalance\n")
        .assert()
        .success()
        .stdout(contains("Deleted Income 500.00"))
        .stdout(contains("-150.00"));

    let json = std::fs::read_to_string(home.path().join("transactions.json")).unwrap();
    assert!(!json.contains("Salary"));
}

#[test]
fn filter_and_reports_use_active_view() {
    let home = TempDir::new().unwrap();
    let input = format!(
        "{SCENARIO}filter 2024-01-08 2024-01-10\nreport monthly\nreset\nreport categories\n"
    );
    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("2 record(s) match the filter."))
        .stdout(contains("2024-01"))
        .stdout(contains("66.7% (NT$100)"));
}

#[test]
fn invalid_input_is_reported_without_stopping() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add 2024-01-05 Expense -5 Food\nlst\nadd 2024-01-05 Expense 5 food\nbalance\n")
        .assert()
        .success()
        .stderr(contains("ERROR"))
        .stderr(contains("Did you mean `list`?"))
        .stdout(contains("Current balance"));

    assert!(!home.path().join("transactions.json").exists());
}

#[test]
fn corrupt_file_is_reported_and_replaced_on_save() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("transactions.json");
    std::fs::write(&path, "garbage").unwrap();

    cli(&home)
        .write_stdin("add 2024-02-01 Income 10 Other\n")
        .assert()
        .success()
        .stdout(contains("starting with an empty ledger"));

    let json = std::fs::read_to_string(&path).unwrap();
    assert!(json.contains("\"Other\""));
}
