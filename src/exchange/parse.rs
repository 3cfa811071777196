//! Typed parsing of venue payloads
//!
//! The venue is loose about field names: some deployments return camelCase,
//! some snake_case, and the outcome list appears under two different keys.
//! Each fallback chain here is an explicit priority list so the accepted
//! shapes are enumerable and testable.

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

use super::types::{Asset, Market, Outcome, Receipt};

/// Payload parsing errors
#[derive(Debug, Error)]
pub enum ParseError {
    /// A required field was absent under every accepted name
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    /// A field was present but not a valid decimal
    #[error("invalid number in `{field}`: {value}")]
    InvalidNumber { field: &'static str, value: String },
    /// The payload was not the expected JSON shape
    #[error("expected {0}")]
    UnexpectedShape(&'static str),
}

/// Extract the market array from a list-markets response.
///
/// Priority: `markets` field, then the payload itself as a bare array.
pub fn market_array(payload: &Value) -> Result<&Vec<Value>, ParseError> {
    if let Some(Value::Array(markets)) = payload.get("markets") {
        return Ok(markets);
    }
    match payload {
        Value::Array(markets) => Ok(markets),
        _ => Err(ParseError::UnexpectedShape("array of markets")),
    }
}

/// Parse a single market object
pub fn parse_market(payload: &Value) -> Result<Market, ParseError> {
    let id = required_str(payload, "id")?;
    let question = required_str(payload, "question")?;

    // Priority: camelCase, then snake_case, then empty.
    let end_date = first_str(payload, &["endDate", "end_date"]).unwrap_or_default();

    Ok(Market {
        asset: Asset::detect(&question),
        id,
        description: opt_str(payload, "description").unwrap_or_default(),
        end_date,
        active: payload.get("active").and_then(Value::as_bool).unwrap_or(false),
        volume: decimal_field(payload, "volume")?,
        liquidity: decimal_field(payload, "liquidity")?,
        slug: opt_str(payload, "slug").unwrap_or_default(),
        question,
    })
}

/// Extract the outcome list from a market payload.
///
/// Priority: `tokens` field, then `clobTokenIds`. A market with neither
/// is a parse failure, not an empty list.
pub fn parse_outcomes(payload: &Value) -> Result<Vec<Outcome>, ParseError> {
    let raw = ["tokens", "clobTokenIds"]
        .iter()
        .find_map(|key| match payload.get(*key) {
            Some(Value::Array(items)) => Some(items),
            _ => None,
        })
        .ok_or(ParseError::MissingField("tokens"))?;

    raw.iter().map(parse_outcome).collect()
}

fn parse_outcome(payload: &Value) -> Result<Outcome, ParseError> {
    Ok(Outcome {
        id: opt_str(payload, "id").unwrap_or_default(),
        label: opt_str(payload, "outcome").unwrap_or_default(),
        price: decimal_field(payload, "price")?,
        probability: decimal_field(payload, "probability")?,
        supply: decimal_field(payload, "supply")?,
    })
}

/// Read the liveness flag from a health payload.
///
/// Priority: `status == "ok"`, then `ok == true`.
pub fn parse_health(payload: &Value) -> bool {
    if payload.get("status").and_then(Value::as_str) == Some("ok") {
        return true;
    }
    payload.get("ok").and_then(Value::as_bool) == Some(true)
}

/// Extract the sample list from a history payload.
///
/// History is best-effort everywhere, so a missing or misshapen `history`
/// field is an empty list rather than an error.
pub fn history_array(payload: &Value) -> Vec<Value> {
    payload
        .get("history")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

/// Parse an order receipt.
///
/// Priority: `order_id` field, then `id`.
pub fn parse_receipt(payload: &Value) -> Result<Receipt, ParseError> {
    let id = first_str(payload, &["order_id", "id"]).ok_or(ParseError::MissingField("order_id"))?;
    Ok(Receipt { id })
}

/// Read a decimal that the venue may send as a JSON number or a string.
/// Absent fields default to zero; malformed values are an error.
fn decimal_field(payload: &Value, field: &'static str) -> Result<Decimal, ParseError> {
    match payload.get(field) {
        None | Some(Value::Null) => Ok(Decimal::ZERO),
        Some(Value::String(s)) => Decimal::from_str(s).map_err(|_| ParseError::InvalidNumber {
            field,
            value: s.clone(),
        }),
        Some(Value::Number(n)) => {
            Decimal::from_str(&n.to_string()).map_err(|_| ParseError::InvalidNumber {
                field,
                value: n.to_string(),
            })
        }
        Some(other) => Err(ParseError::InvalidNumber {
            field,
            value: other.to_string(),
        }),
    }
}

fn required_str(payload: &Value, field: &'static str) -> Result<String, ParseError> {
    opt_str(payload, field).ok_or(ParseError::MissingField(field))
}

fn opt_str(payload: &Value, field: &str) -> Option<String> {
    payload.get(field).and_then(Value::as_str).map(str::to_string)
}

fn first_str(payload: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|f| opt_str(payload, f))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_parse_market_full() {
        let payload = json!({
            "id": "0x123",
            "question": "BTC Up or Down - 15 minute",
            "description": "Will BTC go up?",
            "endDate": "2025-01-01T00:15:00Z",
            "active": true,
            "volume": "1200.5",
            "liquidity": 300,
            "slug": "btc-updown-15m-1735689600"
        });

        let market = parse_market(&payload).unwrap();
        assert_eq!(market.id, "0x123");
        assert_eq!(market.asset, Some(Asset::Btc));
        assert!(market.active);
        assert_eq!(market.volume, dec!(1200.5));
        assert_eq!(market.liquidity, dec!(300));
        assert_eq!(market.end_date, "2025-01-01T00:15:00Z");
    }

    #[test]
    fn test_parse_market_snake_case_end_date() {
        let payload = json!({
            "id": "1",
            "question": "ETH Up or Down - 15 min",
            "end_date": "2025-01-01T00:15:00Z"
        });
        let market = parse_market(&payload).unwrap();
        assert_eq!(market.end_date, "2025-01-01T00:15:00Z");
        // Absent numeric fields default to zero
        assert_eq!(market.volume, Decimal::ZERO);
        assert!(!market.active);
    }

    #[test]
    fn test_parse_market_missing_id() {
        let payload = json!({"question": "BTC Up or Down"});
        assert!(matches!(
            parse_market(&payload),
            Err(ParseError::MissingField("id"))
        ));
    }

    #[test]
    fn test_parse_market_bad_number() {
        let payload = json!({"id": "1", "question": "q", "volume": "not-a-number"});
        assert!(matches!(
            parse_market(&payload),
            Err(ParseError::InvalidNumber { field: "volume", .. })
        ));
    }

    #[test]
    fn test_market_array_wrapped_and_bare() {
        let wrapped = json!({"markets": [{"id": "1"}]});
        assert_eq!(market_array(&wrapped).unwrap().len(), 1);

        let bare = json!([{"id": "1"}, {"id": "2"}]);
        assert_eq!(market_array(&bare).unwrap().len(), 2);

        let neither = json!({"data": []});
        assert!(market_array(&neither).is_err());
    }

    #[test]
    fn test_parse_outcomes_tokens_field() {
        let payload = json!({
            "tokens": [
                {"id": "t1", "outcome": "Up", "price": "0.55", "probability": 0.55, "supply": 100},
                {"id": "t2", "outcome": "Down", "price": "0.45", "probability": 0.45, "supply": 100}
            ]
        });
        let outcomes = parse_outcomes(&payload).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].price, dec!(0.55));
        assert!(outcomes[1].is_down());
    }

    #[test]
    fn test_parse_outcomes_clob_token_ids_fallback() {
        let payload = json!({
            "clobTokenIds": [{"id": "t1", "outcome": "Up", "price": 0.6, "probability": 0.6, "supply": 0}]
        });
        let outcomes = parse_outcomes(&payload).unwrap();
        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].probability, dec!(0.6));
    }

    #[test]
    fn test_parse_outcomes_prefers_tokens_field() {
        let payload = json!({
            "tokens": [{"id": "t1", "outcome": "Up", "price": 0.7, "probability": 0.7, "supply": 0}],
            "clobTokenIds": [{"id": "t2", "outcome": "Up", "price": 0.1, "probability": 0.1, "supply": 0}]
        });
        let outcomes = parse_outcomes(&payload).unwrap();
        assert_eq!(outcomes[0].id, "t1");
    }

    #[test]
    fn test_parse_outcomes_neither_field() {
        let payload = json!({"id": "m1"});
        assert!(parse_outcomes(&payload).is_err());
    }

    #[test]
    fn test_parse_health_priority() {
        assert!(parse_health(&json!({"status": "ok"})));
        assert!(parse_health(&json!({"ok": true})));
        assert!(!parse_health(&json!({"status": "degraded"})));
        assert!(!parse_health(&json!({"ok": false})));
        assert!(!parse_health(&json!({})));
    }

    #[test]
    fn test_history_array_extraction() {
        let payload = json!({"history": [{"t": 1, "p": 0.5}, {"t": 2, "p": 0.55}]});
        assert_eq!(history_array(&payload).len(), 2);
    }

    #[test]
    fn test_history_array_tolerates_bad_shapes() {
        assert!(history_array(&json!({})).is_empty());
        assert!(history_array(&json!({"history": "oops"})).is_empty());
        assert!(history_array(&json!(null)).is_empty());
    }

    #[test]
    fn test_parse_receipt_priority() {
        assert_eq!(parse_receipt(&json!({"order_id": "abc"})).unwrap().id, "abc");
        assert_eq!(parse_receipt(&json!({"id": "xyz"})).unwrap().id, "xyz");
        assert!(parse_receipt(&json!({})).is_err());
    }
}
