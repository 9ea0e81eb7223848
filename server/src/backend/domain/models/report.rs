//! Figures produced by the reporting service.
use rust_decimal::Decimal;

use crate::backend::storage::query::RecordTotals;

/// Collections and profit for one date window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodStats {
    /// Sum of `total_price`
    pub collections: Decimal,
    /// Collections minus spare part cost
    pub profit_with_parts: Decimal,
    /// Sum of service charges
    pub profit_without_parts: Decimal,
}

impl From<RecordTotals> for PeriodStats {
    fn from(totals: RecordTotals) -> Self {
        Self {
            collections: totals.total_price,
            profit_with_parts: totals.total_price - totals.spare_parts_cost,
            profit_without_parts: totals.service_charge,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_totals_give_zero_stats() {
        let stats = PeriodStats::from(RecordTotals::default());
        assert_eq!(stats, PeriodStats::default());
        assert_eq!(stats.collections, Decimal::ZERO);
    }

    #[test]
    fn test_profit_identity() {
        let totals = RecordTotals {
            record_count: 2,
            total_price: Decimal::new(38050, 2),
            service_charge: Decimal::from(300),
            spare_parts_cost: Decimal::new(8050, 2),
        };
        let stats = PeriodStats::from(totals);

        assert_eq!(stats.profit_with_parts + totals.spare_parts_cost, stats.collections);
        assert_eq!(stats.profit_without_parts, Decimal::from(300));
    }
}
