use assert_cmd::Command;
use predicates::prelude::*;

fn bondcalc() -> Command {
    Command::cargo_bin("bondcalc").unwrap()
}

const ONE_YEAR_BOND: &str = r#"{
    "bond": {
        "annual_coupon": "100",
        "face_value": "1000",
        "periods_per_year": 1,
        "years_to_maturity": "1"
    },
    "annual_yield": "0.10"
}"#;

#[test]
fn test_price_json_from_stdin() {
    bondcalc()
        .arg("price")
        .write_stdin(ONE_YEAR_BOND)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"present_value\""))
        .stdout(predicate::str::contains("\"discounted_cashflows\""))
        .stdout(predicate::str::contains("\"methodology\""));
}

#[test]
fn test_price_minimal_from_stdin() {
    bondcalc()
        .args(["price", "--output", "minimal"])
        .write_stdin(ONE_YEAR_BOND)
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^(1000|999\.9999)").unwrap());
}

#[test]
fn test_risk_table_output() {
    bondcalc()
        .args(["risk", "--output", "table"])
        .write_stdin(ONE_YEAR_BOND)
        .assert()
        .success()
        .stdout(predicate::str::contains("dv01"));
}

#[test]
fn test_modified_duration_yaml() {
    bondcalc()
        .args(["modified-duration", "--output", "yaml"])
        .write_stdin(r#"{"macaulay_duration": "5.3", "annual_yield": "0.06", "periods_per_year": 1}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("modified_duration"));
}

#[test]
fn test_invalid_input_exits_nonzero() {
    bondcalc()
        .arg("price")
        .write_stdin(
            r#"{"bond": {"annual_coupon": "50", "face_value": "0", "years_to_maturity": "10"},
                "annual_yield": "0.05"}"#,
        )
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("face_value"));
}

#[test]
fn test_missing_input_is_reported() {
    bondcalc()
        .arg("duration")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON document on stdin is required"));
}

#[test]
fn test_file_input_flag_is_not_accepted() {
    bondcalc()
        .args(["price", "--input", "bond.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input"));
}

#[test]
fn test_menu_exit() {
    bondcalc()
        .write_stdin("9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("BOND CALCULATOR"))
        .stdout(predicate::str::contains("Thank you"));
}

#[test]
fn test_menu_price_then_exit() {
    bondcalc()
        .arg("menu")
        .write_stdin("1\n50\n1000\n5\n10\n\n9\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bond Price: $1000.00"));
}

#[test]
fn test_menu_closed_stdin_fails() {
    bondcalc()
        .write_stdin("1\n50\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("input stream closed"));
}

#[test]
fn test_version() {
    bondcalc()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("bondcalc "));
}
