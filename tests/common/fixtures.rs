use serde_json::{Value, json};

pub struct Fixtures;

impl Fixtures {
    /// Wire-shaped playlist payload: one `(published link, duration)` pair
    /// per entry, in order.
    pub fn playlist_payload(items: &[(&str, i64)]) -> Value {
        json!({
            "data": items
                .iter()
                .map(|(url, duration)| json!({
                    "Duration": duration,
                    "Published Link": url,
                }))
                .collect::<Vec<_>>()
        })
    }

    pub fn playlist_body(items: &[(&str, i64)]) -> String {
        Self::playlist_payload(items).to_string()
    }
}
