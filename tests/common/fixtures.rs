//! Static documents and listings used across harnesses.

use serde_json::{json, Value};

pub const TITLE: &str = "Başlık";
pub const YEAR: &str = "Yayin Yili";

/// A `_cat/indices?v` body with two system/alert indices and two visible ones.
pub const LISTING: &str = "\
health status index            uuid                   pri rep docs.count
green  open   .kibana          aBcDeFgHiJkLmNoPqRsTuV 1   0   12
green  open   books-2020       bCdEfGhIjKlMnOpQrStUvW 1   0   1200
yellow open   articles-alerts  cDeFgHiJkLmNoPqRsTuVwX 1   1   4

green  open   journals         dEfGhIjKlMnOpQrStUvWxY 1   0   310
";

/// A 400-character abstract, long enough to collapse.
pub fn long_abstract() -> String {
    "Osmanlı arşiv belgeleri üzerine kapsamlı bir inceleme. ".repeat(8)
}

/// One hit in engine shape.
pub fn book(id: &str, title: &str, year: i64) -> Value {
    json!({
        "_id": id,
        "_source": { TITLE: title, YEAR: year, "Yazar": "Anonim" }
    })
}

/// `n` numbered books, newest first.
pub fn books(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| book(&format!("b{i}"), &format!("Kitap {i} (1 adet)"), 2020 - i as i64))
        .collect()
}
