use assert_cmd::cargo_bin_cmd;

/// Run fuelcost with the given arguments and default settings, checking that it succeeds
#[allow(dead_code)]
pub fn assert_fuelcost_runs(args: &[&str]) {
    cargo_bin_cmd!("fuelcost")
        .env("FUELCOST_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .assert()
        .success();
}

/// Run fuelcost with the given arguments and default settings, checking that it fails
#[allow(dead_code)]
pub fn assert_fuelcost_fails(args: &[&str]) {
    cargo_bin_cmd!("fuelcost")
        .env("FUELCOST_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .assert()
        .failure();
}

/// Run fuelcost with the given arguments and default settings, returning stdout
#[allow(dead_code)]
pub fn get_fuelcost_stdout(args: &[&str]) -> String {
    let output = cargo_bin_cmd!("fuelcost")
        .env("FUELCOST_USE_DEFAULT_SETTINGS", "1")
        .args(args)
        .output()
        .unwrap();
    assert!(output.status.success());

    String::from_utf8(output.stdout).unwrap()
}
