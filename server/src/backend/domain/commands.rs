//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the DTOs from the
//! `shared` crate to these internal types.

pub mod records {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;

    use crate::backend::domain::models::record::{PaymentStatus, PhotoRef, SparePart};

    /// Input for creating a repair ticket. There is deliberately no total price field.
    #[derive(Debug, Clone)]
    pub struct CreateRecordCommand {
        pub date: Option<DateTime<Utc>>,
        pub mobile_model: String,
        pub customer_name: String,
        pub customer_phone: Option<String>,
        pub complaint: String,
        pub spare_parts: Vec<SparePart>,
        pub service_charge: Option<Decimal>,
        pub payment_status: Option<PaymentStatus>,
        pub before_photo: Option<PhotoRef>,
        pub after_photo: Option<PhotoRef>,
    }

    /// Partial update; `None` leaves the field untouched.
    /// For the optional fields `Some(None)` clears the stored value.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateRecordCommand {
        pub date: Option<DateTime<Utc>>,
        pub mobile_model: Option<String>,
        pub customer_name: Option<String>,
        pub customer_phone: Option<Option<String>>,
        pub complaint: Option<String>,
        pub spare_parts: Option<Vec<SparePart>>,
        pub service_charge: Option<Decimal>,
        pub payment_status: Option<PaymentStatus>,
        pub before_photo: Option<Option<PhotoRef>>,
        pub after_photo: Option<Option<PhotoRef>>,
    }

    /// Query parameters for listing records.
    #[derive(Debug, Clone, Default)]
    pub struct RecordListQuery {
        pub payment_status: Option<PaymentStatus>,
    }
}

pub mod reports {
    use std::fmt;
    use std::str::FromStr;

    use chrono::NaiveDate;

    /// Named look-back windows for the analysis report
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum AnalysisPeriod {
        /// Since the start of today
        Daily,
        /// The last seven days
        Weekly,
        /// Since the same instant one calendar month ago
        Monthly,
        #[default]
        All,
    }

    impl FromStr for AnalysisPeriod {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s {
                "daily" => Ok(AnalysisPeriod::Daily),
                "weekly" => Ok(AnalysisPeriod::Weekly),
                "monthly" => Ok(AnalysisPeriod::Monthly),
                "all" => Ok(AnalysisPeriod::All),
                other => Err(format!(
                    "Unknown period '{}', expected one of daily, weekly, monthly, all",
                    other
                )),
            }
        }
    }

    impl fmt::Display for AnalysisPeriod {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let name = match self {
                AnalysisPeriod::Daily => "daily",
                AnalysisPeriod::Weekly => "weekly",
                AnalysisPeriod::Monthly => "monthly",
                AnalysisPeriod::All => "all",
            };
            f.write_str(name)
        }
    }

    /// What the analysis report should cover
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum AnalysisScope {
        Period(AnalysisPeriod),
        /// Calendar dates, both inclusive (the end date runs to 23:59:59.999)
        Dates { start: NaiveDate, end: NaiveDate },
    }

    impl Default for AnalysisScope {
        fn default() -> Self {
            AnalysisScope::Period(AnalysisPeriod::All)
        }
    }
}

pub mod users {
    /// Input for self-registration
    #[derive(Debug, Clone)]
    pub struct RegisterCommand {
        pub username: String,
        pub password: String,
        pub referral_code: Option<String>,
    }

    #[derive(Debug, Clone)]
    pub struct LoginCommand {
        pub username: String,
        pub password: String,
    }

    /// Admin-initiated staff account creation
    #[derive(Debug, Clone)]
    pub struct CreateStaffCommand {
        pub username: String,
        pub password: String,
    }
}

#[cfg(test)]
mod tests {
    use super::reports::AnalysisPeriod;

    #[test]
    fn test_analysis_period_parsing() {
        assert_eq!("daily".parse::<AnalysisPeriod>(), Ok(AnalysisPeriod::Daily));
        assert_eq!("weekly".parse::<AnalysisPeriod>(), Ok(AnalysisPeriod::Weekly));
        assert_eq!("monthly".parse::<AnalysisPeriod>(), Ok(AnalysisPeriod::Monthly));
        assert_eq!("all".parse::<AnalysisPeriod>(), Ok(AnalysisPeriod::All));
        assert!("yearly".parse::<AnalysisPeriod>().is_err());
        assert_eq!(AnalysisPeriod::default(), AnalysisPeriod::All);
        assert_eq!(AnalysisPeriod::Weekly.to_string(), "weekly");
    }
}
