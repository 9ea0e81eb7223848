//! Domain model for a repair ticket.
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

/// Money amounts carry at most this many decimal places
pub const MONEY_SCALE: u32 = 2;

/// Round to whole cents, halves away from zero
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentStatus {
    Paid,
    #[default]
    Pending,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Paid" => Ok(PaymentStatus::Paid),
            "Pending" => Ok(PaymentStatus::Pending),
            other => Err(format!("Unknown payment status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SparePart {
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhotoRef {
    pub url: String,
    pub storage_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub date: DateTime<Utc>,
    pub mobile_model: String,
    pub customer_name: String,
    pub customer_phone: Option<String>,
    pub complaint: String,
    pub spare_parts: Vec<SparePart>,
    pub service_charge: Decimal,
    pub total_price: Decimal,
    pub payment_status: PaymentStatus,
    pub before_photo: Option<PhotoRef>,
    pub after_photo: Option<PhotoRef>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Record {
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    /// Sum of all spare part prices, `None` on overflow
    pub fn spare_parts_cost(&self) -> Option<Decimal> {
        self.spare_parts
            .iter()
            .try_fold(Decimal::ZERO, |sum, part| sum.checked_add(part.price))
    }

    /// `service_charge + sum(spare_parts.price)`, regardless of what `total_price` holds
    pub fn computed_total_price(&self) -> Option<Decimal> {
        self.service_charge.checked_add(self.spare_parts_cost()?)
    }

    /// Round the service charge and every part price to cents
    pub fn normalize_amounts(&mut self) {
        self.service_charge = round_money(self.service_charge);
        for part in &mut self.spare_parts {
            part.price = round_money(part.price);
        }
    }

    /// Normalize amounts and overwrite `total_price` with the derived value.
    /// Must run before every save.
    pub fn recompute_total_price(&mut self) -> Result<(), RecordValidationError> {
        self.normalize_amounts();
        self.total_price = self
            .computed_total_price()
            .ok_or(RecordValidationError::TotalOutOfRange)?;
        Ok(())
    }

    /// Storage handles of the photos attached to this record
    pub fn photo_storage_ids(&self) -> Vec<String> {
        [&self.before_photo, &self.after_photo]
            .into_iter()
            .flatten()
            .map(|photo| photo.storage_id.clone())
            .collect()
    }

    /// Field-level checks. Anything beyond these minimums is accepted as is.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.mobile_model.trim().is_empty() {
            return Err(RecordValidationError::MissingField("mobileModel"));
        }
        if self.customer_name.trim().is_empty() {
            return Err(RecordValidationError::MissingField("customerName"));
        }
        if self.complaint.trim().is_empty() {
            return Err(RecordValidationError::MissingField("complaint"));
        }
        if self.service_charge < Decimal::ZERO {
            return Err(RecordValidationError::NegativeServiceCharge);
        }
        for (index, part) in self.spare_parts.iter().enumerate() {
            if part.name.trim().is_empty() {
                return Err(RecordValidationError::UnnamedSparePart(index));
            }
            if part.price < Decimal::ZERO {
                return Err(RecordValidationError::NegativeSparePartPrice(part.name.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RecordValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Service charge cannot be negative")]
    NegativeServiceCharge,
    #[error("Spare part #{0} needs a name")]
    UnnamedSparePart(usize),
    #[error("Price of spare part '{0}' cannot be negative")]
    NegativeSparePartPrice(String),
    #[error("Total price is out of range")]
    TotalOutOfRange,
}
