use std::collections::HashMap;
use std::ops::Bound;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use rust_decimal::Decimal;
use sqlx::{QueryBuilder, Row, Sqlite};

use crate::backend::domain::models::record::{round_money, PaymentStatus, PhotoRef, Record, SparePart};
use crate::backend::storage::connection::DbConnection;
use crate::backend::storage::money::{from_minor_units, to_minor_units};
use crate::backend::storage::query::{
    MonthlyGrouping, MonthlyTotal, RecordFilter, RecordSort, RecordTotals, SortDirection,
};
use crate::backend::storage::timestamp::{from_millis, to_millis};
use crate::backend::storage::traits::RecordStorage;

const RECORD_COLUMNS: &str = r#"
    r.id, r.date, r.mobile_model, r.customer_name, r.customer_phone, r.complaint,
    r.service_charge, r.total_price, r.payment_status,
    r.before_photo_url, r.before_photo_storage_id, r.after_photo_url, r.after_photo_storage_id,
    r.user_id, r.created_at, r.updated_at
"#;

/// Stored total: the sum of the amounts as they are stored, each rounded to cents
fn total_price_of(record: &Record) -> Result<Decimal> {
    record
        .spare_parts
        .iter()
        .try_fold(round_money(record.service_charge), |sum, part| {
            sum.checked_add(round_money(part.price))
        })
        .ok_or_else(|| anyhow!("Total price of record {} is out of range", record.id))
}

/// Repository for repair records and their spare parts
#[derive(Clone)]
pub struct RecordRepository {
    db: DbConnection,
}

impl RecordRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    /// Append ` WHERE ...` for `filter` to a query selecting from `records r`
    fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &RecordFilter) {
        builder.push(" WHERE 1 = 1");

        if let Some(status) = filter.payment_status {
            builder.push(" AND r.payment_status = ").push_bind(status.as_str());
        }

        let column = filter.date_field.column();
        match filter.date.start {
            Bound::Included(start) => {
                builder.push(format!(" AND r.{} >= ", column)).push_bind(to_millis(start));
            }
            Bound::Excluded(start) => {
                builder.push(format!(" AND r.{} > ", column)).push_bind(to_millis(start));
            }
            Bound::Unbounded => {}
        }
        match filter.date.end {
            Bound::Included(end) => {
                builder.push(format!(" AND r.{} <= ", column)).push_bind(to_millis(end));
            }
            Bound::Excluded(end) => {
                builder.push(format!(" AND r.{} < ", column)).push_bind(to_millis(end));
            }
            Bound::Unbounded => {}
        }
    }

    fn record_from_row(row: &SqliteRow) -> Result<Record> {
        let status: String = row.try_get("payment_status")?;
        let payment_status = status.parse::<PaymentStatus>().map_err(|e| anyhow!(e))?;

        Ok(Record {
            id: row.try_get("id")?,
            date: from_millis(row.try_get("date")?)?,
            mobile_model: row.try_get("mobile_model")?,
            customer_name: row.try_get("customer_name")?,
            customer_phone: row.try_get("customer_phone")?,
            complaint: row.try_get("complaint")?,
            spare_parts: Vec::new(),
            service_charge: from_minor_units(row.try_get("service_charge")?),
            total_price: from_minor_units(row.try_get("total_price")?),
            payment_status,
            before_photo: Self::photo_from_row(row, "before_photo_url", "before_photo_storage_id")?,
            after_photo: Self::photo_from_row(row, "after_photo_url", "after_photo_storage_id")?,
            user_id: row.try_get("user_id")?,
            created_at: from_millis(row.try_get("created_at")?)?,
            updated_at: from_millis(row.try_get("updated_at")?)?,
        })
    }

    fn photo_from_row(row: &SqliteRow, url_column: &str, storage_id_column: &str) -> Result<Option<PhotoRef>> {
        let url: Option<String> = row.try_get(url_column)?;
        let storage_id: Option<String> = row.try_get(storage_id_column)?;
        Ok(match (url, storage_id) {
            (Some(url), Some(storage_id)) => Some(PhotoRef { url, storage_id }),
            _ => None,
        })
    }

    /// Load spare parts for the given records, in their original order
    async fn load_spare_parts(&self, record_ids: &[String]) -> Result<HashMap<String, Vec<SparePart>>> {
        let mut parts: HashMap<String, Vec<SparePart>> = HashMap::new();
        if record_ids.is_empty() {
            return Ok(parts);
        }

        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT record_id, name, price FROM spare_parts WHERE record_id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in record_ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(") ORDER BY record_id, position");

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        for row in rows {
            let record_id: String = row.try_get("record_id")?;
            parts.entry(record_id).or_default().push(SparePart {
                name: row.try_get("name")?,
                price: from_minor_units(row.try_get("price")?),
            });
        }
        Ok(parts)
    }

    async fn insert_spare_parts(
        tx: &mut sqlx::Transaction<'_, Sqlite>,
        record_id: &str,
        spare_parts: &[SparePart],
    ) -> Result<()> {
        for (position, part) in spare_parts.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO spare_parts (record_id, position, name, price)
                VALUES (?, ?, ?, ?)
                "#,
            )
            .bind(record_id)
            .bind(position as i64)
            .bind(&part.name)
            .bind(to_minor_units(part.price)?)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStorage for RecordRepository {
    async fn store_record(&self, record: &Record) -> Result<()> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query(
            r#"
            INSERT INTO records (
                id, date, mobile_model, customer_name, customer_phone, complaint,
                service_charge, total_price, payment_status,
                before_photo_url, before_photo_storage_id, after_photo_url, after_photo_storage_id,
                user_id, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(to_millis(record.date))
        .bind(&record.mobile_model)
        .bind(&record.customer_name)
        .bind(record.customer_phone.as_deref())
        .bind(&record.complaint)
        .bind(to_minor_units(record.service_charge)?)
        .bind(to_minor_units(total_price_of(record)?)?)
        .bind(record.payment_status.as_str())
        .bind(record.before_photo.as_ref().map(|photo| photo.url.as_str()))
        .bind(record.before_photo.as_ref().map(|photo| photo.storage_id.as_str()))
        .bind(record.after_photo.as_ref().map(|photo| photo.url.as_str()))
        .bind(record.after_photo.as_ref().map(|photo| photo.storage_id.as_str()))
        .bind(&record.user_id)
        .bind(to_millis(record.created_at))
        .bind(to_millis(record.updated_at))
        .execute(&mut *tx)
        .await?;

        Self::insert_spare_parts(&mut tx, &record.id, &record.spare_parts).await?;

        tx.commit().await?;
        Ok(())
    }

    async fn get_record(&self, record_id: &str) -> Result<Option<Record>> {
        let row = sqlx::query(&format!("SELECT {} FROM records r WHERE r.id = ?", RECORD_COLUMNS))
            .bind(record_id)
            .fetch_optional(self.db.pool())
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut record = Self::record_from_row(&row)?;
        let mut parts = self.load_spare_parts(std::slice::from_ref(&record.id)).await?;
        record.spare_parts = parts.remove(&record.id).unwrap_or_default();
        Ok(Some(record))
    }

    async fn list_records(&self, filter: &RecordFilter, sort: RecordSort) -> Result<Vec<Record>> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM records r", RECORD_COLUMNS));
        Self::push_filter(&mut builder, filter);

        let direction = match sort.direction {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        };
        builder.push(format!(" ORDER BY r.{} {}, r.id {}", sort.field.column(), direction, direction));

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        let mut records = rows
            .iter()
            .map(Self::record_from_row)
            .collect::<Result<Vec<_>>>()?;

        let ids: Vec<String> = records.iter().map(|record| record.id.clone()).collect();
        let mut parts = self.load_spare_parts(&ids).await?;
        for record in &mut records {
            record.spare_parts = parts.remove(&record.id).unwrap_or_default();
        }
        Ok(records)
    }

    async fn update_record(&self, record: &Record) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        // user_id and created_at are fixed at creation
        let result = sqlx::query(
            r#"
            UPDATE records SET
                date = ?, mobile_model = ?, customer_name = ?, customer_phone = ?, complaint = ?,
                service_charge = ?, total_price = ?, payment_status = ?,
                before_photo_url = ?, before_photo_storage_id = ?,
                after_photo_url = ?, after_photo_storage_id = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(to_millis(record.date))
        .bind(&record.mobile_model)
        .bind(&record.customer_name)
        .bind(record.customer_phone.as_deref())
        .bind(&record.complaint)
        .bind(to_minor_units(record.service_charge)?)
        .bind(to_minor_units(total_price_of(record)?)?)
        .bind(record.payment_status.as_str())
        .bind(record.before_photo.as_ref().map(|photo| photo.url.as_str()))
        .bind(record.before_photo.as_ref().map(|photo| photo.storage_id.as_str()))
        .bind(record.after_photo.as_ref().map(|photo| photo.url.as_str()))
        .bind(record.after_photo.as_ref().map(|photo| photo.storage_id.as_str()))
        .bind(to_millis(record.updated_at))
        .bind(&record.id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM spare_parts WHERE record_id = ?")
            .bind(&record.id)
            .execute(&mut *tx)
            .await?;
        Self::insert_spare_parts(&mut tx, &record.id, &record.spare_parts).await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete_record(&self, record_id: &str) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;

        sqlx::query("DELETE FROM spare_parts WHERE record_id = ?")
            .bind(record_id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM records WHERE id = ?")
            .bind(record_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn aggregate_totals(&self, filter: &RecordFilter) -> Result<RecordTotals> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            r#"
            SELECT
                COUNT(*) AS record_count,
                COALESCE(SUM(r.total_price), 0) AS total_price,
                COALESCE(SUM(r.service_charge), 0) AS service_charge,
                COALESCE(SUM(p.parts_cost), 0) AS spare_parts_cost
            FROM records r
            LEFT JOIN (
                SELECT record_id, SUM(price) AS parts_cost
                FROM spare_parts
                GROUP BY record_id
            ) p ON p.record_id = r.id
            "#,
        );
        Self::push_filter(&mut builder, filter);

        let row = builder.build().fetch_one(self.db.pool()).await?;
        Ok(RecordTotals {
            record_count: row.try_get("record_count")?,
            total_price: from_minor_units(row.try_get("total_price")?),
            service_charge: from_minor_units(row.try_get("service_charge")?),
            spare_parts_cost: from_minor_units(row.try_get("spare_parts_cost")?),
        })
    }

    async fn aggregate_monthly(
        &self,
        filter: &RecordFilter,
        grouping: MonthlyGrouping,
        limit: u32,
    ) -> Result<Vec<MonthlyTotal>> {
        // SQLite date modifier shifting UTC into the reporting offset
        let shift = format!("{:+} seconds", grouping.utc_offset_seconds);
        let column = filter.date_field.column();

        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT CAST(strftime('%Y', r.{} / 1000, 'unixepoch', ",
            column
        ));
        builder
            .push_bind(shift.clone())
            .push(format!(
                ") AS INTEGER) AS year, CAST(strftime('%m', r.{} / 1000, 'unixepoch', ",
                column
            ))
            .push_bind(shift)
            .push(") AS INTEGER) AS month, SUM(r.total_price) AS total_price FROM records r");
        Self::push_filter(&mut builder, filter);
        builder
            .push(" GROUP BY year, month ORDER BY year DESC, month DESC LIMIT ")
            .push_bind(i64::from(limit));

        let rows = builder.build().fetch_all(self.db.pool()).await?;
        rows.iter()
            .map(|row| {
                let year: i64 = row.try_get("year")?;
                let month: i64 = row.try_get("month")?;
                Ok(MonthlyTotal {
                    year: i32::try_from(year)?,
                    month: u32::try_from(month)?,
                    total_price: from_minor_units(row.try_get("total_price")?),
                })
            })
            .collect()
    }
}
