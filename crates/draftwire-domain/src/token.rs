//! Callback token module - approve/reject actions over the wire
//!
//! Reviewer decisions travel through the messaging transport as opaque
//! callback strings. The token is decoded exactly once at the webhook
//! boundary into a tagged variant; nothing downstream re-parses the
//! wire string.

use crate::row::RowRef;

/// A reviewer action bound to a specific row
///
/// Wire format: `approve_<row>` or `reject_<row>`. The encode/decode
/// pair round-trips exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackToken {
    /// Approve the draft for the referenced row
    Approve(RowRef),

    /// Reject the draft for the referenced row
    Reject(RowRef),
}

impl CallbackToken {
    /// Encode the token into its wire string
    pub fn encode(&self) -> String {
        match self {
            CallbackToken::Approve(row) => format!("approve_{}", row),
            CallbackToken::Reject(row) => format!("reject_{}", row),
        }
    }

    /// Decode a wire string into a token
    ///
    /// Returns `None` for unknown actions or malformed row references;
    /// callers treat that as a no-op rather than an error.
    pub fn decode(data: &str) -> Option<Self> {
        let (action, row) = data.split_once('_')?;
        let row: RowRef = row.parse().ok()?;
        match action {
            "approve" => Some(CallbackToken::Approve(row)),
            "reject" => Some(CallbackToken::Reject(row)),
            _ => None,
        }
    }

    /// The row this token refers to
    pub fn row(&self) -> RowRef {
        match self {
            CallbackToken::Approve(row) | CallbackToken::Reject(row) => *row,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        for token in [CallbackToken::Approve(7), CallbackToken::Reject(12)] {
            assert_eq!(CallbackToken::decode(&token.encode()), Some(token));
        }
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(CallbackToken::Approve(7).encode(), "approve_7");
        assert_eq!(CallbackToken::Reject(12).encode(), "reject_12");
    }

    #[test]
    fn test_decode_rejects_malformed() {
        assert_eq!(CallbackToken::decode("approve_"), None);
        assert_eq!(CallbackToken::decode("approve_x"), None);
        assert_eq!(CallbackToken::decode("publish_3"), None);
        assert_eq!(CallbackToken::decode("approve"), None);
        assert_eq!(CallbackToken::decode(""), None);
    }

    #[test]
    fn test_row_accessor() {
        assert_eq!(CallbackToken::Approve(3).row(), 3);
        assert_eq!(CallbackToken::Reject(9).row(), 9);
    }
}
