//! Transaction lines read from stdin.
//!
//! One JSON object per line:
//!
//! ```text
//! {"seller_id": "alice", "buyer_id": "bob", "amount": 12.5}
//! {"seller_id": "bob", "buyer_id": "carol", "amount": 3, "timestamp": "2017-08-09T10:11:12.000000Z"}
//! ```
//!
//! Lines without a timestamp are stamped on arrival. Blank lines and lines
//! starting with `#` are skipped.

use serde::Deserialize;
use shared_types::{SerializationError, Timestamp, Transaction};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("Malformed transaction line: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid transaction: {0}")]
    Invalid(#[from] SerializationError),
}

/// A submitted transaction before it is stamped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransactionRequest {
    pub seller_id: String,
    pub buyer_id: String,
    pub amount: f64,
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
}

impl TransactionRequest {
    pub fn into_transaction(self, now: Timestamp) -> Result<Transaction, SerializationError> {
        let timestamp = self.timestamp.unwrap_or(now);
        Transaction::new(self.seller_id, self.buyer_id, timestamp, self.amount)
    }
}

/// Parse one input line. `Ok(None)` for lines that carry nothing.
pub fn parse_line(line: &str, now: Timestamp) -> Result<Option<Transaction>, InputError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let request: TransactionRequest = serde_json::from_str(line)?;
    Ok(Some(request.into_transaction(now)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        Timestamp::from_ymd_hms_micro(2020, 1, 2, 3, 4, 5, 6).unwrap()
    }

    #[test]
    fn test_line_is_stamped_on_arrival() {
        let tx = parse_line(r#"{"seller_id": "alice", "buyer_id": "bob", "amount": 12.5}"#, now())
            .unwrap()
            .unwrap();
        assert_eq!(tx.seller_id(), "alice");
        assert_eq!(tx.buyer_id(), "bob");
        assert_eq!(tx.amount(), 12.5);
        assert_eq!(tx.timestamp(), now());
    }

    #[test]
    fn test_explicit_timestamp_is_kept() {
        let line = r#"{"seller_id": "a", "buyer_id": "b", "amount": 1, "timestamp": "2017-08-09T10:11:12.000000Z"}"#;
        let tx = parse_line(line, now()).unwrap().unwrap();
        assert_eq!(tx.timestamp().to_string(), "2017-08-09T10:11:12.000000Z");
    }

    #[test]
    fn test_skips_blank_and_comment_lines() {
        assert!(parse_line("   ", now()).unwrap().is_none());
        assert!(parse_line("# header", now()).unwrap().is_none());
    }

    #[test]
    fn test_rejects_bad_lines() {
        assert!(matches!(
            parse_line(r#"{"seller_id": "a"}"#, now()),
            Err(InputError::Malformed(_))
        ));
        assert!(matches!(
            parse_line(r#"{"seller_id": "a", "buyer_id": "b", "amount": 1, "fee": 2}"#, now()),
            Err(InputError::Malformed(_))
        ));
        assert!(matches!(
            parse_line(
                r#"{"seller_id": "a", "buyer_id": "b", "amount": 1, "timestamp": "yesterday"}"#,
                now()
            ),
            Err(InputError::Malformed(e)) if e.to_string().contains("Invalid timestamp")
        ));
    }
}
