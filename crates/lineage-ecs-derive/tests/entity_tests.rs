//! Compile-time tests for the Entity derive macro.
//!
//! Valid entity declarations must compile; malformed ones must fail with
//! an error pointing at the offending token.

#[test]
fn test_derive_passes() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/pass_*.rs");
}

#[test]
fn test_derive_compile_failures() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/ui/fail_*.rs");
}
