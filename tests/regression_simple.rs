//! A regression test for the reference scenario of the "simple" example.
use regression::run_regression_test;

#[test]
fn regression_simple() {
    run_regression_test("simple", "p1");
}
