use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Free-form user preferences
///
/// Kept as the raw JSON object so that every key the client sends (`styles`,
/// `tags`, `other_interests`, ...) reaches the model untouched. Only
/// `categories` and `price_range` are interpreted locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Preferences(Map<String, Value>);

impl Preferences {
    /// Requested categories, trimmed and lowercased
    ///
    /// `None` when no category filter was asked for (key absent, null, an empty
    /// list or an empty string). Otherwise the string entries of the list, or the
    /// single string. A non-empty request with no string entries yields
    /// `Some(vec![])`, which matches nothing. A blank entry normalizes to `""`
    /// and matches every category.
    pub fn categories(&self) -> Option<Vec<String>> {
        let normalize = |s: &str| s.trim().to_lowercase();

        match self.0.get("categories")? {
            Value::Null => None,
            Value::Array(values) if values.is_empty() => None,
            Value::Array(values) => Some(
                values
                    .iter()
                    .filter_map(Value::as_str)
                    .map(normalize)
                    .collect(),
            ),
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(vec![normalize(s.as_str())]),
            _ => Some(Vec::new()),
        }
    }

    /// Raw `price_range` value, interpreted by the preference filter
    pub fn price_range(&self) -> Option<&Value> {
        self.0.get("price_range").filter(|v| !v.is_null())
    }

    /// Pretty-printed JSON, as shown to the model
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Request body as it arrives over HTTP, before presence checks
#[derive(Debug, Deserialize)]
pub struct RecommendationPayload {
    pub preferences: Option<Preferences>,
    pub history_ids: Option<Vec<String>>,
}

/// A validated recommendation request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationRequest {
    pub preferences: Preferences,
    /// Recently viewed product ids, most relevant first. Unknown ids are ignored.
    pub history_ids: Vec<String>,
}

impl TryFrom<RecommendationPayload> for RecommendationRequest {
    type Error = AppError;

    fn try_from(payload: RecommendationPayload) -> Result<Self, Self::Error> {
        let preferences = payload.preferences.ok_or_else(|| {
            AppError::BadRequest("Missing 'preferences' in request body".to_string())
        })?;
        let history_ids = payload.history_ids.ok_or_else(|| {
            AppError::BadRequest("Missing 'history_ids' in request body".to_string())
        })?;

        Ok(Self {
            preferences,
            history_ids,
        })
    }
}

/// One model-proposed product with the reason it was picked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    pub product_id: String,
    pub explanation: String,
}

/// Successful response body for `POST /api/recommendations`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prefs(value: Value) -> Preferences {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_categories_normalized() {
        let p = prefs(json!({ "categories": ["  Electronics ", "HOME", 42, "   "] }));
        assert_eq!(p.categories().unwrap(), vec!["electronics", "home", ""]);
    }

    #[test]
    fn test_categories_single_string() {
        let p = prefs(json!({ "categories": "Clothing" }));
        assert_eq!(p.categories().unwrap(), vec!["clothing"]);
    }

    #[test]
    fn test_categories_absent() {
        assert!(Preferences::default().categories().is_none());
        assert!(prefs(json!({ "categories": null })).categories().is_none());
        assert!(prefs(json!({ "categories": [] })).categories().is_none());
        assert!(prefs(json!({ "categories": "" })).categories().is_none());
    }

    #[test]
    fn test_categories_without_strings_are_present_but_empty() {
        let p = prefs(json!({ "categories": [42, true] }));
        assert_eq!(p.categories(), Some(Vec::new()));
    }

    #[test]
    fn test_price_range_null_is_absent() {
        let p = prefs(json!({ "price_range": null }));
        assert!(p.price_range().is_none());
    }

    #[test]
    fn test_unknown_keys_are_kept() {
        let p = prefs(json!({ "styles": ["minimalist"], "other_interests": "hiking" }));
        let rendered = p.to_pretty_json();
        assert!(rendered.contains("\"minimalist\""));
        assert!(rendered.contains("\"hiking\""));
    }

    #[test]
    fn test_payload_requires_preferences() {
        let payload: RecommendationPayload =
            serde_json::from_value(json!({ "history_ids": [] })).unwrap();
        let err = RecommendationRequest::try_from(payload).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_payload_requires_history_ids() {
        let payload: RecommendationPayload =
            serde_json::from_value(json!({ "preferences": {} })).unwrap();
        let err = RecommendationRequest::try_from(payload).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_payload_complete() {
        let payload: RecommendationPayload = serde_json::from_value(json!({
            "preferences": { "categories": ["Books"] },
            "history_ids": ["p3", "p1"]
        }))
        .unwrap();
        let request = RecommendationRequest::try_from(payload).unwrap();
        assert_eq!(request.history_ids, vec!["p3", "p1"]);
        assert_eq!(request.preferences.categories().unwrap(), vec!["books"]);
    }
}
