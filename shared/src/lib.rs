//! Wire types shared between the repair shop server and its clients.
//!
//! Everything here is serialized as camelCase JSON. Money is carried as
//! [`Decimal`] and rendered as a JSON number.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Payment state of a repair ticket. Only `Paid` tickets count as revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
}

/// Role of an authenticated user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Admin,
    Staff,
}

/// A spare part fitted during a repair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SparePart {
    pub name: String,
    pub price: Decimal,
}

/// Reference to a stored photo (public URL plus the storage handle used to release it)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoRef {
    pub url: String,
    pub storage_id: String,
}

/// A repair ticket as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    /// Service date (not the insertion time)
    pub date: DateTime<Utc>,
    pub mobile_model: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub complaint: String,
    pub spare_parts: Vec<SparePart>,
    pub service_charge: Decimal,
    /// Always `service_charge + sum(spare_parts.price)`
    pub total_price: Decimal,
    pub payment_status: PaymentStatus,
    pub before_photo: Option<PhotoRef>,
    pub after_photo: Option<PhotoRef>,
    /// ID of the user who created the ticket
    pub user: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/records`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordRequest {
    /// Service date; defaults to the creation time
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    pub mobile_model: String,
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    pub complaint: String,
    #[serde(default)]
    pub spare_parts: Vec<SparePart>,
    #[serde(default)]
    pub service_charge: Option<Decimal>,
    /// Accepted for compatibility but ignored: the total is always derived
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub before_photo: Option<PhotoRef>,
    #[serde(default)]
    pub after_photo: Option<PhotoRef>,
}

/// Reads a present field as `Some`, so an explicit `null` becomes `Some(None)`
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Request body for `PUT /api/records/:id`; absent fields are left unchanged.
/// `customerPhone`, `beforePhoto` and `afterPhoto` are cleared by an explicit `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecordRequest {
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub mobile_model: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<Option<String>>,
    #[serde(default)]
    pub complaint: Option<String>,
    #[serde(default)]
    pub spare_parts: Option<Vec<SparePart>>,
    #[serde(default)]
    pub service_charge: Option<Decimal>,
    /// Ignored, see [`CreateRecordRequest::total_price`]
    #[serde(default)]
    pub total_price: Option<Decimal>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub before_photo: Option<Option<PhotoRef>>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub after_photo: Option<Option<PhotoRef>>,
}

/// Response for `DELETE /api/records/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteRecordResponse {
    pub id: String,
    pub message: String,
}

/// Two views on profit: net of parts cost, and labour (service charge) only
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profit {
    pub with_parts: Decimal,
    pub without_parts: Decimal,
}

/// One point of the monthly earnings series, e.g. `{"name": "Jan '24", "earnings": 1200}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub name: String,
    pub earnings: Decimal,
}

/// Response for `GET /api/summary`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub daily_collections: Decimal,
    pub monthly_collections: Decimal,
    pub yearly_collections: Decimal,
    pub daily_profit: Profit,
    pub monthly_profit: Profit,
    pub yearly_profit: Profit,
    /// At most twelve months, oldest first
    pub earnings_trend: Vec<TrendPoint>,
}

/// Response for `GET /api/analysis`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceAnalysis {
    pub total_repairs: i64,
    pub total_income: Decimal,
    pub total_spare_parts_cost: Decimal,
    pub profit: Decimal,
}

/// Request body for `POST /api/auth/register`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// Required for everyone except the very first account
    #[serde(default)]
    pub referral_code: Option<String>,
}

/// Request body for `POST /api/auth/login`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Returned by register and login
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub token: String,
}

/// A user account without credentials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /api/users/staff`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffRequest {
    pub username: String,
    pub password: String,
}

/// Application settings singleton
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub key: String,
    pub staff_referral_code: String,
}

/// Request body for `PUT /api/settings`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub staff_referral_code: Option<String>,
}

/// Generic `{"message": "..."}` body used for errors and acknowledgements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults() {
        let request: CreateRecordRequest = serde_json::from_value(json!({
            "mobileModel": "Pixel 7",
            "customerName": "Asha",
            "complaint": "Cracked screen"
        }))
        .unwrap();

        assert!(request.spare_parts.is_empty());
        assert_eq!(request.service_charge, None);
        assert_eq!(request.payment_status, None);
        assert_eq!(request.date, None);
    }

    #[test]
    fn test_update_request_tells_null_from_absent() {
        let request: UpdateRecordRequest = serde_json::from_value(json!({
            "customerPhone": null,
            "afterPhoto": {"url": "https://cdn.example/a.jpg", "storageId": "records/a"}
        }))
        .unwrap();

        assert_eq!(request.customer_phone, Some(None));
        assert_eq!(request.before_photo, None);
        assert_eq!(request.after_photo.flatten().map(|photo| photo.storage_id), Some("records/a".to_string()));
    }

    #[test]
    fn test_money_is_a_json_number() {
        let profit = Profit {
            with_parts: Decimal::new(20050, 2),
            without_parts: Decimal::new(200, 0),
        };
        let value = serde_json::to_value(profit).unwrap();

        assert_eq!(value["withParts"].as_f64(), Some(200.5));
        assert_eq!(value["withoutParts"].as_f64(), Some(200.0));
    }

    #[test]
    fn test_payment_status_wire_names() {
        assert_eq!(serde_json::to_value(PaymentStatus::Paid).unwrap(), json!("Paid"));
        let parsed: PaymentStatus = serde_json::from_value(json!("Pending")).unwrap();
        assert_eq!(parsed, PaymentStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
    }
}
