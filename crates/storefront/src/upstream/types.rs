//! Wire types for the upstream API.

use serde::{Deserialize, Serialize};
use ventaro_core::Purchase;

/// Response of `GET /api/purchases/confirm`.
#[derive(Debug, Default, Deserialize)]
pub struct PurchasesResponse {
    /// Missing or `null` is treated as no purchases.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub purchases: Vec<Purchase>,
}

/// Body of `POST /api/consultation`.
///
/// Field names follow the upstream's camelCase contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub project_type: String,
    pub budget: String,
    pub timeline: String,
    pub current_website: String,
    pub project_vision: String,
}

/// Error body returned by any upstream endpoint on failure.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST /api/auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Response of `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: LoginUser,
}

/// User identity returned on successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub id: String,
    pub email: String,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_purchases_missing_or_null_is_empty() {
        let missing: PurchasesResponse = serde_json::from_str("{}").unwrap();
        assert!(missing.purchases.is_empty());

        let null: PurchasesResponse = serde_json::from_str(r#"{"purchases":null}"#).unwrap();
        assert!(null.purchases.is_empty());
    }

    #[test]
    fn test_consultation_request_uses_camel_case() {
        let request = ConsultationRequest {
            full_name: "Ada Lovelace".to_string(),
            project_type: "saas".to_string(),
            current_website: "https://ada.dev".to_string(),
            project_vision: "Analytical engine marketplace".to_string(),
            ..ConsultationRequest::default()
        };

        let json = serde_json::to_value(&request).unwrap();
        let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 9);
        assert_eq!(json["fullName"], "Ada Lovelace");
        assert_eq!(json["projectType"], "saas");
        assert_eq!(json["currentWebsite"], "https://ada.dev");
        assert_eq!(json["projectVision"], "Analytical engine marketplace");
        assert_eq!(json["company"], "");
    }
}
