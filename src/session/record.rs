//! JSONL record codec
//!
//! Each non-blank line holds one `{"query": ..., "ranked_candidates": [...]}` object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LoadError;

pub const QUERY_FIELD: &str = "query";
pub const CANDIDATES_FIELD: &str = "ranked_candidates";

/// One query and its ordered candidates, as found on a single input line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub query: String,
    pub ranked_candidates: Vec<String>,
}

/// Borrowed form used when writing records back out
#[derive(Serialize)]
struct RecordRef<'a> {
    query: &'a str,
    ranked_candidates: &'a [String],
}

impl RankingRecord {
    pub fn new(
        query: impl Into<String>,
        candidates: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            query: query.into(),
            ranked_candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }
}

/// Parse a whole file. A single bad line fails the entire parse.
pub fn parse_jsonl(text: &str) -> Result<Vec<RankingRecord>, LoadError> {
    text.split('\n')
        .enumerate()
        .filter(|(_, raw)| !raw.trim().is_empty())
        .map(|(i, raw)| parse_line(i + 1, raw))
        .collect()
}

/// Parse one line. `line` is only used for error reporting.
pub fn parse_line(line: usize, raw: &str) -> Result<RankingRecord, LoadError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|source| LoadError::Json { line, source })?;
    let Value::Object(mut obj) = value else {
        return Err(LoadError::NotAnObject { line });
    };

    let query = match obj.remove(QUERY_FIELD) {
        None => return Err(LoadError::MissingField { line, field: QUERY_FIELD }),
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(LoadError::InvalidField {
                line,
                field: QUERY_FIELD,
                expected: "a string",
            });
        }
    };

    let invalid_candidates = LoadError::InvalidField {
        line,
        field: CANDIDATES_FIELD,
        expected: "an array of strings",
    };
    let ranked_candidates = match obj.remove(CANDIDATES_FIELD) {
        None => return Err(LoadError::MissingField { line, field: CANDIDATES_FIELD }),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(invalid_candidates)?,
        Some(_) => return Err(invalid_candidates),
    };

    Ok(RankingRecord {
        query,
        ranked_candidates,
    })
}

/// Serialize one record as a single JSON line (no trailing newline)
pub fn record_line(query: &str, candidates: &[String]) -> serde_json::Result<String> {
    serde_json::to_string(&RecordRef {
        query,
        ranked_candidates: candidates,
    })
}

/// Join records into JSONL, one per line, without a trailing newline
pub fn to_jsonl<'a>(
    records: impl IntoIterator<Item = (&'a str, &'a [String])>,
) -> serde_json::Result<String> {
    let lines = records
        .into_iter()
        .map(|(query, candidates)| record_line(query, candidates))
        .collect::<serde_json::Result<Vec<_>>>()?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "\n{\"query\":\"q1\",\"ranked_candidates\":[\"a\",\"b\"]}\n   \n\
                    {\"query\":\"q2\",\"ranked_candidates\":[]}\n";
        let records = parse_jsonl(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], RankingRecord::new("q1", ["a", "b"]));
        assert_eq!(records[1].query, "q2");
        assert!(records[1].ranked_candidates.is_empty());
    }

    #[test]
    fn test_parse_tolerates_crlf_and_extra_fields() {
        let text = "{\"query\":\"q\",\"ranked_candidates\":[\"x\"],\"score\":3}\r\n";
        let records = parse_jsonl(text).unwrap();
        assert_eq!(records, vec![RankingRecord::new("q", ["x"])]);
    }

    #[test]
    fn test_parse_keeps_candidate_order() {
        let records = parse_jsonl(r#"{"query":"q","ranked_candidates":["z","a","m"]}"#).unwrap();
        assert_eq!(records[0].ranked_candidates, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_malformed_line_aborts_with_line_number() {
        let text = "{\"query\":\"ok\",\"ranked_candidates\":[]}\n\n{not json}\n";
        let err = parse_jsonl(text).unwrap_err();
        assert!(matches!(err, LoadError::Json { line: 3, .. }));
        assert_eq!(err.line(), 3);
    }

    #[test]
    fn test_missing_fields_rejected() {
        let err = parse_line(1, r#"{"ranked_candidates":["a"]}"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingField { field: "query", .. }));

        let err = parse_line(2, r#"{"query":"q"}"#).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingField {
                line: 2,
                field: "ranked_candidates"
            }
        ));
    }

    #[test]
    fn test_wrong_types_rejected() {
        let err = parse_line(1, r#"{"query":7,"ranked_candidates":[]}"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { field: "query", .. }));

        let err = parse_line(1, r#"{"query":"q","ranked_candidates":"a"}"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { field: "ranked_candidates", .. }));

        let err = parse_line(1, r#"{"query":"q","ranked_candidates":["a",1]}"#).unwrap_err();
        assert!(matches!(err, LoadError::InvalidField { field: "ranked_candidates", .. }));

        let err = parse_line(1, r#"["q",["a"]]"#).unwrap_err();
        assert!(matches!(err, LoadError::NotAnObject { line: 1 }));
    }

    #[test]
    fn test_record_line_field_order() {
        let line = record_line("q1", &["x".to_string(), "y".to_string()]).unwrap();
        assert_eq!(line, r#"{"query":"q1","ranked_candidates":["x","y"]}"#);
    }

    #[test]
    fn test_to_jsonl_has_no_trailing_newline() {
        let a = vec!["1".to_string()];
        let b = vec!["2".to_string(), "3".to_string()];
        let out = to_jsonl([("a", a.as_slice()), ("b", b.as_slice())]).unwrap();
        assert_eq!(
            out,
            "{\"query\":\"a\",\"ranked_candidates\":[\"1\"]}\n{\"query\":\"b\",\"ranked_candidates\":[\"2\",\"3\"]}"
        );
        assert_eq!(to_jsonl(std::iter::empty()).unwrap(), "");
    }

    #[test]
    fn test_unicode_round_trips_unescaped() {
        let records = parse_jsonl(r#"{"query":"café \"q\"","ranked_candidates":["ü\nline"]}"#).unwrap();
        let r = &records[0];
        let line = record_line(&r.query, &r.ranked_candidates).unwrap();
        assert_eq!(line, r#"{"query":"café \"q\"","ranked_candidates":["ü\nline"]}"#);
    }
}
