//! Response normalization and the shape-checking decode step.
//!
//! The server answers either with the bare payload or with an envelope
//! `{ data, meta }`. [`normalize`] hides the difference; the `decode_*`
//! functions then check the payload has the container shape the caller
//! expects before handing typed values out.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::ApiError,
    model::{Listing, PageMeta},
};

/// Payload and metadata split out of a raw response body.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub payload: Value,
    pub meta: Option<Value>,
}

pub fn unwrap_envelope(raw: Value) -> Envelope {
    match raw {
        Value::Object(mut map) => match map.remove("data") {
            Some(payload) => Envelope {
                payload,
                meta: map.remove("meta"),
            },
            None => Envelope {
                payload: Value::Object(map),
                meta: None,
            },
        },
        other => Envelope {
            payload: other,
            meta: None,
        },
    }
}

/// Returns the `data` field when `raw` has one, otherwise `raw` unchanged.
pub fn normalize(raw: Value) -> Value {
    unwrap_envelope(raw).payload
}

/// Decode a list response. A payload that is not an array, or an element
/// that does not match `T`, is an [`ApiError::InvalidResponseShape`].
pub fn decode_list<T: DeserializeOwned>(raw: Value) -> Result<Listing<T>, ApiError> {
    let Envelope { payload, meta } = unwrap_envelope(raw);

    let items = match payload {
        Value::Array(items) => items,
        other => {
            warn!(found = kind(&other), "Expected a list in response payload");
            return Err(ApiError::InvalidResponseShape {
                expected: "array",
                found: kind(&other).to_string(),
            });
        }
    };

    let items = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value(item).map_err(|e| {
                warn!(index, error = %e, "List element does not match the expected record");
                ApiError::InvalidResponseShape {
                    expected: "array of records",
                    found: format!("element {index}: {e}"),
                }
            })
        })
        .collect::<Result<Vec<T>, _>>()?;

    let meta = meta.and_then(|meta| {
        serde_json::from_value::<PageMeta>(meta)
            .map_err(|e| debug!(error = %e, "Ignoring unreadable pagination meta"))
            .ok()
    });

    Ok(Listing { items, meta })
}

/// Decode a single record response; the payload must be an object.
pub fn decode_one<T: DeserializeOwned>(raw: Value) -> Result<T, ApiError> {
    match normalize(raw) {
        payload @ Value::Object(_) => serde_json::from_value(payload).map_err(|e| {
            warn!(error = %e, "Record does not match the expected shape");
            ApiError::InvalidResponseShape {
                expected: "record",
                found: e.to_string(),
            }
        }),
        other => {
            warn!(found = kind(&other), "Expected an object in response payload");
            Err(ApiError::InvalidResponseShape {
                expected: "object",
                found: kind(&other).to_string(),
            })
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DashboardStats, Employee};
    use serde_json::json;

    fn employee_json(employee_id: &str) -> Value {
        json!({
            "_id": format!("id-{employee_id}"),
            "employee_id": employee_id,
            "full_name": "Grace Hopper",
            "email": "grace@example.com",
            "department": "Research",
            "created_at": "2024-01-01T09:00:00"
        })
    }

    #[test]
    fn envelope_and_bare_payload_normalize_alike() {
        assert_eq!(normalize(json!({"data": [1, 2]})), json!([1, 2]));
        assert_eq!(normalize(json!([1, 2])), json!([1, 2]));
        assert_eq!(
            normalize(json!({"data": [1, 2], "meta": {"total": 2}})),
            normalize(json!([1, 2]))
        );
    }

    #[test]
    fn object_without_data_is_returned_unchanged() {
        let stats = json!({"total_employees": 3, "present_today": 1});
        assert_eq!(normalize(stats.clone()), stats);
        assert_eq!(normalize(json!("text")), json!("text"));
    }

    #[test]
    fn data_null_is_still_unwrapped() {
        assert_eq!(normalize(json!({"data": null})), Value::Null);
    }

    #[test]
    fn non_list_payload_is_invalid_shape() {
        let result = decode_list::<Employee>(json!({"data": "oops"}));
        match result {
            Err(ApiError::InvalidResponseShape { expected, found }) => {
                assert_eq!(expected, "array");
                assert_eq!(found, "string");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn mismatched_element_is_invalid_shape() {
        let result = decode_list::<Employee>(json!([employee_json("EMP001"), {"name": "x"}]));
        assert!(matches!(
            result,
            Err(ApiError::InvalidResponseShape { expected: "array of records", .. })
        ));
    }

    #[test]
    fn list_keeps_pagination_meta() {
        let listing = decode_list::<Employee>(json!({
            "data": [employee_json("EMP001"), employee_json("EMP002")],
            "meta": {"total": 12, "page": 1, "limit": 2, "total_pages": 6}
        }))
        .unwrap();

        assert_eq!(listing.items.len(), 2);
        assert_eq!(listing.meta.map(|m| m.total_pages), Some(6));
    }

    #[test]
    fn bare_list_has_no_meta() {
        let listing = decode_list::<Employee>(json!([employee_json("EMP001")])).unwrap();
        assert_eq!(listing.items[0].employee_id, "EMP001");
        assert!(listing.meta.is_none());
    }

    #[test]
    fn single_record_from_envelope_or_bare() {
        let body = json!({
            "total_employees": 4,
            "total_attendance_records": 10,
            "present_today": 3,
            "absent_today": 1
        });
        let wrapped: DashboardStats = decode_one(json!({ "data": body.clone() })).unwrap();
        let bare: DashboardStats = decode_one(body).unwrap();
        assert_eq!(wrapped, bare);
        assert_eq!(bare.unmarked_today(), 0);
    }

    #[test]
    fn list_where_record_expected_is_invalid_shape() {
        let result = decode_one::<DashboardStats>(json!({"data": []}));
        assert!(matches!(
            result,
            Err(ApiError::InvalidResponseShape { expected: "object", .. })
        ));
    }
}
