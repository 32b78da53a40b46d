use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::bot_registry::DEFAULT_USER_ID;

/// Point balance of the single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub points: u64,
    pub user_id: String,
}

impl Default for UserInfo {
    fn default() -> Self {
        Self {
            points: 0,
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

impl UserInfo {
    /// Parse a user-info document, coercing `points` and defaulting `userId`.
    ///
    /// Only a document that is not a JSON object is an error; bad field
    /// values fall back to their defaults.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        // Parse as generic JSON first so malformed fields can be repaired
        let value: Value = serde_json::from_str(content)?;
        let Some(obj) = value.as_object() else {
            return Err(serde::de::Error::custom("user info must be a JSON object"));
        };

        let points = coerce_points(obj.get("points"));
        let user_id = obj
            .get("userId")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_USER_ID)
            .to_string();

        Ok(Self { points, user_id })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Convert whatever is stored under `points` into a balance
fn coerce_points(value: Option<&Value>) -> u64 {
    if let Some(Value::Number(n)) = value {
        // Exact integers keep their value
        if let Some(points) = n.as_u64() {
            return points;
        }
        if let Some(negative) = n.as_i64() {
            warn!("Negative points balance {} in user info, using 0", negative);
            return 0;
        }
    }

    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() && n >= 0.0 => n.trunc() as u64,
        Some(n) if n.is_finite() => {
            warn!("Negative points balance {} in user info, using 0", n);
            0
        }
        _ => {
            if value.is_some() {
                warn!("Non-numeric points value {:?} in user info, using 0", value);
            }
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_valid_document() {
        let info = UserInfo::from_json(r#"{"points": 300, "userId": "alice"}"#).unwrap();
        assert_eq!(info.points, 300);
        assert_eq!(info.user_id, "alice");
    }

    #[test]
    fn test_coerces_points() {
        let cases = [
            (r#"{"points": "420"}"#, 420),
            (r#"{"points": 12.9}"#, 12),
            (r#"{"points": -5}"#, 0),
            (r#"{"points": -2.5}"#, 0),
            (r#"{"points": 9007199254740993}"#, 9_007_199_254_740_993),
            (r#"{"points": "lots"}"#, 0),
            (r#"{"points": null}"#, 0),
            (r#"{"points": true}"#, 0),
            (r#"{}"#, 0),
        ];

        for (doc, expected) in cases {
            assert_eq!(UserInfo::from_json(doc).unwrap().points, expected, "{}", doc);
        }
    }

    #[test]
    fn test_defaults_user_id() {
        assert_eq!(UserInfo::from_json(r#"{"points": 1}"#).unwrap().user_id, "guest");
        assert_eq!(
            UserInfo::from_json(r#"{"points": 1, "userId": ""}"#).unwrap().user_id,
            "guest"
        );
        assert_eq!(
            UserInfo::from_json(r#"{"points": 1, "userId": 7}"#).unwrap().user_id,
            "guest"
        );
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(UserInfo::from_json("[]").is_err());
        assert!(UserInfo::from_json("{broken").is_err());
    }

    #[test]
    fn test_round_trips_camel_case() {
        let json = UserInfo::default().to_json().unwrap();
        assert!(json.contains("\"userId\": \"guest\""));
        assert_eq!(UserInfo::from_json(&json).unwrap(), UserInfo::default());
    }
}
