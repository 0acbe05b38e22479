//! Response header collection and parsing.

use std::collections::HashMap;

/// Accumulates raw header lines from libcurl's header callback.
///
/// libcurl reports the headers of every response it sees, including
/// redirect hops and `100 Continue`; a new status line discards what came
/// before it, so only the final response's headers remain.
#[derive(Debug, Default)]
pub(crate) struct HeaderCollector {
    /// `(lower-cased name, value)` in arrival order, duplicates joined.
    fields: Vec<(String, String)>,
}

impl HeaderCollector {
    pub(crate) fn push_line(&mut self, data: &[u8]) {
        let line = String::from_utf8_lossy(data);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.starts_with("HTTP/") {
            self.fields.clear();
            return;
        }
        let Some((name, value)) = line.split_once(':') else {
            return;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            return;
        }
        let value = value.trim();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => {
                existing.push_str(", ");
                existing.push_str(value);
            }
            None => self.fields.push((name, value.to_string())),
        }
    }

    /// `name: value` lines joined with CRLF.
    pub(crate) fn into_block(self) -> String {
        self.fields
            .iter()
            .map(|(n, v)| format!("{n}: {v}"))
            .collect::<Vec<_>>()
            .join("\r\n")
    }
}

/// Parse a CRLF-separated header block into a map.
///
/// Each line is split on `": "`; the first part is the name and the rest,
/// re-joined with `": "`, is the value. Empty lines are skipped, a line with
/// no separator maps to an empty value, and later duplicates overwrite
/// earlier ones.
pub fn parse_header_block(raw: &str) -> HashMap<String, String> {
    let mut headers = HashMap::new();
    for line in raw.split("\r\n") {
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split(": ");
        let name = parts.next().unwrap_or_default();
        let value = parts.collect::<Vec<_>>().join(": ");
        headers.insert(name.to_string(), value);
    }
    headers
}
