use super::*;

#[test]
fn shallow_recursion_returns_result() {
    fn sum_to(n: u64) -> u64 {
        ensure_sufficient_stack(|| if n == 0 { 0 } else { n + sum_to(n - 1) })
    }

    assert_eq!(sum_to(100), 5050);
}

#[test]
fn deep_recursion_grows_stack() {
    // A nested evaluator per level would overflow an 8MB stack long before this.
    fn nest(depth: u64) -> u64 {
        ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
    }

    assert_eq!(nest(100_000), 100_000);
}

#[test]
fn propagates_errors_unchanged() {
    let result: Result<u8, String> = ensure_sufficient_stack(|| Err("syntax".to_string()));
    assert_eq!(result, Err("syntax".to_string()));
}
