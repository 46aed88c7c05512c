//! Domain-specific assertion macros for kist harnesses.
//!
//! These take a search body (`serde_json::Value`) and fail with the body
//! pretty-printed, which makes query-shape regressions easy to read.

/// Assert the fuzzy `must` clauses match `terms`, in order.
///
/// ```rust
/// assert_must_terms!(body, "Başlık", ["savaş", "barış"]);
/// ```
#[macro_export]
macro_rules! assert_must_terms {
    ($body:expr, $field:expr, [$($term:expr),* $(,)?]) => {{
        let body: &serde_json::Value = &$body;
        let expected: Vec<&str> = vec![$($term),*];
        let must = body["query"]["function_score"]["query"]["bool"]["must"]
            .as_array()
            .unwrap_or_else(|| panic!("no must array in body:\n{:#}", body));
        let actual: Vec<&str> = must
            .iter()
            .map(|clause| {
                let m = &clause["match"][$field];
                assert_eq!(m["fuzziness"], "AUTO", "clause is not fuzzy: {:#}", clause);
                m["query"].as_str().unwrap_or_default()
            })
            .collect();
        if actual != expected {
            panic!(
                "assert_must_terms! failed:\n  expected: {:?}\n  actual:   {:?}\n  body: {:#}",
                expected, actual, body
            );
        }
    }};
}

/// Assert the year range filters. Pass `None` for an absent bound.
#[macro_export]
macro_rules! assert_year_range {
    ($body:expr, $field:expr, $gte:expr, $lte:expr) => {{
        let body: &serde_json::Value = &$body;
        let filter = body["query"]["function_score"]["query"]["bool"]["filter"]
            .as_array()
            .unwrap_or_else(|| panic!("no filter array in body:\n{:#}", body));
        let bound = |op: &str| -> Option<i64> {
            filter
                .iter()
                .find_map(|clause| clause["range"][$field][op].as_i64())
        };
        let gte: Option<i64> = $gte;
        let lte: Option<i64> = $lte;
        if bound("gte") != gte || bound("lte") != lte {
            panic!(
                "assert_year_range! failed:\n  expected: gte={:?} lte={:?}\n  body: {:#}",
                gte, lte, body
            );
        }
    }};
}

/// Assert the sort is relevance first, then `field` in `order`.
#[macro_export]
macro_rules! assert_sorted_by {
    ($body:expr, $field:expr, $order:expr) => {{
        let body: &serde_json::Value = &$body;
        let expected = serde_json::json!([
            { "_score": "desc" },
            { $field: { "order": $order } }
        ]);
        if body["sort"] != expected {
            panic!(
                "assert_sorted_by! failed:\n  expected: {:#}\n  actual:   {:#}",
                expected, body["sort"]
            );
        }
    }};
}
