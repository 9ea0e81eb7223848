//! Report service domain logic for the repair shop.
//!
//! Aggregates paid repair records into collections and profit figures:
//!
//! - **Period stats**: collections and both profit views over a date window
//! - **Monthly trend**: revenue for the twelve most recent months that have any
//! - **Financial summary**: today / this month / this year plus the trend
//! - **Service analysis**: repair count, income, parts cost and profit for a
//!   named bucket or an explicit date range
//!
//! Only `Paid` records count, and every window filters on the service date.
//! A report captures `now` once and derives all of its boundaries from it.

use std::sync::Arc;

use anyhow::anyhow;
use chrono::{DateTime, Duration, Utc};
use shared::{FinancialSummary, Profit, ServiceAnalysis, TrendPoint};
use tracing::info;

use crate::backend::domain::calendar::ReportCalendar;
use crate::backend::domain::commands::reports::{AnalysisPeriod, AnalysisScope};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::report::PeriodStats;
use crate::backend::storage::query::{DateRange, MonthlyGrouping, RecordFilter};
use crate::backend::storage::{Connection, RecordStorage};

/// Number of months in the earnings trend
pub const TREND_MONTHS: u32 = 12;

#[derive(Clone)]
pub struct ReportService<C: Connection> {
    record_repository: C::RecordRepository,
    calendar: ReportCalendar,
}

impl<C: Connection> ReportService<C> {
    pub fn new(connection: Arc<C>, calendar: ReportCalendar) -> Self {
        Self {
            record_repository: connection.create_record_repository(),
            calendar,
        }
    }

    /// Collections and profit of paid records whose service date falls in `range`
    pub async fn period_stats(&self, range: DateRange) -> DomainResult<PeriodStats> {
        let filter = RecordFilter::paid().with_date(range);
        let totals = self.record_repository.aggregate_totals(&filter).await?;
        Ok(PeriodStats::from(totals))
    }

    /// Up to twelve most recent months with paid revenue, oldest first.
    /// Months without revenue are not padded in.
    pub async fn monthly_trend(&self) -> DomainResult<Vec<TrendPoint>> {
        let grouping = MonthlyGrouping {
            utc_offset_seconds: self.calendar.utc_offset_seconds(),
        };
        let months = self
            .record_repository
            .aggregate_monthly(&RecordFilter::paid(), grouping, TREND_MONTHS)
            .await?;

        months
            .into_iter()
            .rev()
            .map(|month| -> DomainResult<TrendPoint> {
                let name = ReportCalendar::month_label(month.year, month.month)
                    .ok_or_else(|| anyhow!("Store returned invalid month {}-{}", month.year, month.month))?;
                Ok(TrendPoint {
                    name,
                    earnings: month.total_price,
                })
            })
            .collect()
    }

    pub async fn financial_summary(&self) -> DomainResult<FinancialSummary> {
        self.financial_summary_at(Utc::now()).await
    }

    /// Summary as seen at `now`: today, this month, this year and the trend
    pub async fn financial_summary_at(&self, now: DateTime<Utc>) -> DomainResult<FinancialSummary> {
        let day = self
            .calendar
            .day_window(now)
            .ok_or_else(|| anyhow!("Cannot compute day window for {}", now))?;
        let month = self
            .calendar
            .month_window(now)
            .ok_or_else(|| anyhow!("Cannot compute month window for {}", now))?;
        let year = self
            .calendar
            .year_window(now)
            .ok_or_else(|| anyhow!("Cannot compute year window for {}", now))?;

        let (daily, monthly, yearly, earnings_trend) = tokio::try_join!(
            self.period_stats(day),
            self.period_stats(month),
            self.period_stats(year),
            self.monthly_trend(),
        )?;

        info!(
            "Financial summary at {}: daily {}, monthly {}, yearly {}, {} trend points",
            now,
            daily.collections,
            monthly.collections,
            yearly.collections,
            earnings_trend.len()
        );

        Ok(FinancialSummary {
            daily_collections: daily.collections,
            monthly_collections: monthly.collections,
            yearly_collections: yearly.collections,
            daily_profit: profit_of(&daily),
            monthly_profit: profit_of(&monthly),
            yearly_profit: profit_of(&yearly),
            earnings_trend,
        })
    }

    pub async fn service_analysis(&self, scope: AnalysisScope) -> DomainResult<ServiceAnalysis> {
        self.service_analysis_at(scope, Utc::now()).await
    }

    pub async fn service_analysis_at(&self, scope: AnalysisScope, now: DateTime<Utc>) -> DomainResult<ServiceAnalysis> {
        let range = self.analysis_range(scope, now)?;
        let totals = self
            .record_repository
            .aggregate_totals(&RecordFilter::paid().with_date(range))
            .await?;

        info!("Service analysis for {:?}: {} paid repairs", scope, totals.record_count);

        Ok(ServiceAnalysis {
            total_repairs: totals.record_count,
            total_income: totals.total_price,
            total_spare_parts_cost: totals.spare_parts_cost,
            profit: totals.total_price - totals.spare_parts_cost,
        })
    }

    /// Date window covered by an analysis scope.
    /// Named buckets only have a lower bound; explicit dates are inclusive at both ends.
    pub fn analysis_range(&self, scope: AnalysisScope, now: DateTime<Utc>) -> DomainResult<DateRange> {
        match scope {
            AnalysisScope::Dates { start, end } => {
                if start > end {
                    return Err(DomainError::validation("startDate must not be after endDate"));
                }
                let start = self
                    .calendar
                    .start_of_date(start)
                    .ok_or_else(|| DomainError::validation(format!("startDate {} is out of range", start)))?;
                let end = self
                    .calendar
                    .end_of_date(end)
                    .ok_or_else(|| DomainError::validation(format!("endDate {} is out of range", end)))?;
                Ok(DateRange::closed(start, end))
            }
            AnalysisScope::Period(AnalysisPeriod::Daily) => {
                let start = self
                    .calendar
                    .start_of_today(now)
                    .ok_or_else(|| anyhow!("Cannot compute start of today for {}", now))?;
                Ok(DateRange::starting_at(start))
            }
            AnalysisScope::Period(AnalysisPeriod::Weekly) => {
                let start = now
                    .checked_sub_signed(Duration::days(7))
                    .ok_or_else(|| anyhow!("Cannot go back one week from {}", now))?;
                Ok(DateRange::starting_at(start))
            }
            AnalysisScope::Period(AnalysisPeriod::Monthly) => {
                let start = self
                    .calendar
                    .months_before(now, 1)
                    .ok_or_else(|| anyhow!("Cannot go back one month from {}", now))?;
                Ok(DateRange::starting_at(start))
            }
            AnalysisScope::Period(AnalysisPeriod::All) => Ok(DateRange::unbounded()),
        }
    }
}

fn profit_of(stats: &PeriodStats) -> Profit {
    Profit {
        with_parts: stats.profit_with_parts,
        without_parts: stats.profit_without_parts,
    }
}
