//! Custom assertion macros and utilities
//!
//! Provides assertion macros with more descriptive failure output for
//! API responses.

/// Assert a response status, printing the body on failure
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "unexpected status, body: {}",
            $response.body
        );
    };
}

/// Assert that two values are approximately equal (for floating point)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {
        let diff = ($left - $right).abs();
        assert!(
            diff < $epsilon,
            "Values are not approximately equal: {} vs {} (diff: {})",
            $left,
            $right,
            diff
        );
    };
}

/// Assert that a JSON array contains an object with the given `id`
#[macro_export]
macro_rules! assert_contains_id {
    ($array:expr, $id:expr) => {
        let id = $id.to_string();
        assert!(
            $array
                .as_array()
                .map(|items| items.iter().any(|item| item["id"] == id.as_str()))
                .unwrap_or(false),
            "Expected {} to contain id {}",
            $array,
            id
        );
    };
}
