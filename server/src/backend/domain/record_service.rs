//! Record service domain logic for the repair shop.
//!
//! Owns the write path for repair tickets. Every create and update recomputes
//! `total_price` from the service charge and spare parts before the record is
//! persisted; a client-supplied total never reaches the store.

use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::backend::domain::commands::records::{CreateRecordCommand, RecordListQuery, UpdateRecordCommand};
use crate::backend::domain::error::{DomainError, DomainResult};
use crate::backend::domain::models::record::{PhotoRef, Record};
use crate::backend::storage::query::{RecordFilter, RecordSort};
use crate::backend::storage::{Connection, PhotoStorage, RecordStorage};

#[derive(Clone)]
pub struct RecordService<C: Connection> {
    record_repository: C::RecordRepository,
    photo_storage: Arc<dyn PhotoStorage>,
}

impl<C: Connection> RecordService<C> {
    pub fn new(connection: Arc<C>, photo_storage: Arc<dyn PhotoStorage>) -> Self {
        Self {
            record_repository: connection.create_record_repository(),
            photo_storage,
        }
    }

    /// Create a record on behalf of `creator_id`
    pub async fn create_record(&self, command: CreateRecordCommand, creator_id: &str) -> DomainResult<Record> {
        // Stored timestamps keep millisecond precision
        let now = Utc::now().trunc_subsecs(3);
        let mut record = Record {
            id: Record::generate_id(),
            date: command.date.map(|date| date.trunc_subsecs(3)).unwrap_or(now),
            mobile_model: command.mobile_model,
            customer_name: command.customer_name,
            customer_phone: command.customer_phone,
            complaint: command.complaint,
            spare_parts: command.spare_parts,
            service_charge: command.service_charge.unwrap_or(Decimal::ZERO),
            total_price: Decimal::ZERO,
            payment_status: command.payment_status.unwrap_or_default(),
            before_photo: command.before_photo,
            after_photo: command.after_photo,
            user_id: creator_id.to_string(),
            created_at: now,
            updated_at: now,
        };
        record.validate()?;
        record.recompute_total_price()?;

        self.record_repository.store_record(&record).await?;
        info!(
            "Created record {} ({}, total {}, {})",
            record.id, record.mobile_model, record.total_price, record.payment_status
        );
        Ok(record)
    }

    pub async fn get_record(&self, record_id: &str) -> DomainResult<Record> {
        self.record_repository
            .get_record(record_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Record not found"))
    }

    /// Newest first, optionally restricted to one payment status
    pub async fn list_records(&self, query: RecordListQuery) -> DomainResult<Vec<Record>> {
        let filter = RecordFilter::all().with_status(query.payment_status);
        let records = self
            .record_repository
            .list_records(&filter, RecordSort::newest_first())
            .await?;
        info!("Listed {} records (status filter: {:?})", records.len(), query.payment_status);
        Ok(records)
    }

    pub async fn update_record(&self, record_id: &str, command: UpdateRecordCommand) -> DomainResult<Record> {
        let mut record = self.get_record(record_id).await?;
        let mut replaced_photos = Vec::new();

        if let Some(date) = command.date {
            record.date = date.trunc_subsecs(3);
        }
        if let Some(mobile_model) = command.mobile_model {
            record.mobile_model = mobile_model;
        }
        if let Some(customer_name) = command.customer_name {
            record.customer_name = customer_name;
        }
        if let Some(customer_phone) = command.customer_phone {
            record.customer_phone = customer_phone;
        }
        if let Some(complaint) = command.complaint {
            record.complaint = complaint;
        }
        if let Some(spare_parts) = command.spare_parts {
            record.spare_parts = spare_parts;
        }
        if let Some(service_charge) = command.service_charge {
            record.service_charge = service_charge;
        }
        if let Some(payment_status) = command.payment_status {
            record.payment_status = payment_status;
        }
        if let Some(photo) = command.before_photo {
            replaced_photos.extend(replace_photo(&mut record.before_photo, photo));
        }
        if let Some(photo) = command.after_photo {
            replaced_photos.extend(replace_photo(&mut record.after_photo, photo));
        }

        record.validate()?;
        record.recompute_total_price()?;
        record.updated_at = Utc::now().trunc_subsecs(3);

        if !self.record_repository.update_record(&record).await? {
            return Err(DomainError::not_found("Record not found"));
        }
        info!("Updated record {} (total {})", record.id, record.total_price);

        self.release_photos(&replaced_photos).await;
        Ok(record)
    }

    /// Delete a record and release its photos. Returns the deleted record.
    pub async fn delete_record(&self, record_id: &str) -> DomainResult<Record> {
        let record = self.get_record(record_id).await?;

        if !self.record_repository.delete_record(record_id).await? {
            return Err(DomainError::not_found("Record not found"));
        }
        info!("Deleted record {}", record_id);

        self.release_photos(&record.photo_storage_ids()).await;
        Ok(record)
    }

    /// Release failures are logged; the record change has already happened.
    async fn release_photos(&self, storage_ids: &[String]) {
        for storage_id in storage_ids {
            if let Err(e) = self.photo_storage.release(storage_id).await {
                warn!("Failed to release photo {}: {:#}", storage_id, e);
            }
        }
    }
}

/// Swap in `new_photo` (`None` clears the slot), returning the storage id of
/// the previous photo unless it is still the one attached
fn replace_photo(slot: &mut Option<PhotoRef>, new_photo: Option<PhotoRef>) -> Option<String> {
    let previous = std::mem::replace(slot, new_photo);
    match (previous, slot.as_ref()) {
        (Some(old), Some(new)) if old.storage_id == new.storage_id => None,
        (Some(old), _) => Some(old.storage_id),
        (None, _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::record::{PaymentStatus, SparePart};
    use crate::backend::storage::DbConnection;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::Mutex;

    /// Records release calls instead of touching the filesystem
    #[derive(Default)]
    struct RecordingPhotoStorage {
        released: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl PhotoStorage for RecordingPhotoStorage {
        async fn release(&self, storage_id: &str) -> anyhow::Result<()> {
            self.released.lock().unwrap().push(storage_id.to_string());
            if self.fail {
                anyhow::bail!("bucket unavailable");
            }
            Ok(())
        }
    }

    async fn create_test_service(
        photos: Arc<RecordingPhotoStorage>,
    ) -> RecordService<DbConnection> {
        let db = Arc::new(DbConnection::in_memory().await.unwrap());
        RecordService::new(db, photos)
    }

    fn create_command() -> CreateRecordCommand {
        CreateRecordCommand {
            date: None,
            mobile_model: "Redmi Note 10".to_string(),
            customer_name: "Kiran".to_string(),
            customer_phone: None,
            complaint: "Battery drains fast".to_string(),
            spare_parts: vec![
                SparePart { name: "Battery".to_string(), price: Decimal::from(50) },
                SparePart { name: "Adhesive".to_string(), price: Decimal::from(30) },
            ],
            service_charge: Some(Decimal::from(200)),
            payment_status: Some(PaymentStatus::Paid),
            before_photo: Some(photo("before-1")),
            after_photo: None,
        }
    }

    fn photo(storage_id: &str) -> PhotoRef {
        PhotoRef {
            url: format!("https://cdn.example/{}.jpg", storage_id),
            storage_id: storage_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_record_derives_total() {
        let service = create_test_service(Arc::default()).await;

        let record = service.create_record(create_command(), "user-1").await.unwrap();

        assert_eq!(record.total_price, Decimal::from(280));
        assert_eq!(record.user_id, "user-1");
        assert_eq!(record.date, record.created_at);

        let stored = service.get_record(&record.id).await.unwrap();
        assert_eq!(stored.total_price, Decimal::from(280));
    }

    #[tokio::test]
    async fn test_create_record_defaults() {
        let service = create_test_service(Arc::default()).await;
        let mut command = create_command();
        command.spare_parts.clear();
        command.service_charge = None;
        command.payment_status = None;

        let record = service.create_record(command, "user-1").await.unwrap();

        assert_eq!(record.total_price, Decimal::ZERO);
        assert_eq!(record.payment_status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_record_validation() {
        let service = create_test_service(Arc::default()).await;
        let mut command = create_command();
        command.mobile_model = String::new();

        let result = service.create_record(command, "user-1").await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_recomputes_total_and_keeps_owner() {
        let service = create_test_service(Arc::default()).await;
        let created = service.create_record(create_command(), "user-1").await.unwrap();

        let update = UpdateRecordCommand {
            service_charge: Some(Decimal::from(250)),
            ..Default::default()
        };
        let updated = service.update_record(&created.id, update).await.unwrap();

        assert_eq!(updated.total_price, Decimal::from(330));
        assert_eq!(updated.user_id, "user-1");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_releases_replaced_photo() {
        let photos = Arc::new(RecordingPhotoStorage::default());
        let service = create_test_service(photos.clone()).await;
        let created = service.create_record(create_command(), "user-1").await.unwrap();

        let update = UpdateRecordCommand {
            before_photo: Some(Some(photo("before-2"))),
            after_photo: Some(Some(photo("after-1"))),
            ..Default::default()
        };
        service.update_record(&created.id, update).await.unwrap();

        assert_eq!(*photos.released.lock().unwrap(), vec!["before-1".to_string()]);
    }

    #[tokio::test]
    async fn test_update_clears_optional_fields() {
        let photos = Arc::new(RecordingPhotoStorage::default());
        let service = create_test_service(photos.clone()).await;
        let mut command = create_command();
        command.customer_phone = Some("9876543210".to_string());
        let created = service.create_record(command, "user-1").await.unwrap();

        let update = UpdateRecordCommand {
            customer_phone: Some(None),
            before_photo: Some(None),
            ..Default::default()
        };
        let updated = service.update_record(&created.id, update).await.unwrap();

        assert_eq!(updated.customer_phone, None);
        assert_eq!(updated.before_photo, None);
        assert_eq!(*photos.released.lock().unwrap(), vec!["before-1".to_string()]);

        let stored = service.get_record(&created.id).await.unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_sub_cent_amounts_keep_total_consistent() {
        let service = create_test_service(Arc::default()).await;
        let mut command = create_command();
        command.service_charge = Some(Decimal::new(5, 3));
        command.spare_parts = vec![SparePart { name: "Screw".to_string(), price: Decimal::new(5, 3) }];

        let created = service.create_record(command, "user-1").await.unwrap();
        let stored = service.get_record(&created.id).await.unwrap();

        assert_eq!(created.total_price, Decimal::new(2, 2));
        assert_eq!(stored, created);
        assert_eq!(
            stored.total_price,
            stored.service_charge + stored.spare_parts.iter().map(|part| part.price).sum::<Decimal>()
        );
    }

    #[tokio::test]
    async fn test_client_date_is_stored_at_millisecond_precision() {
        let service = create_test_service(Arc::default()).await;
        let mut command = create_command();
        command.date = Some(Utc.with_ymd_and_hms(2024, 1, 31, 20, 0, 0).unwrap() + Duration::nanoseconds(1_234_567));

        let created = service.create_record(command, "user-1").await.unwrap();
        let stored = service.get_record(&created.id).await.unwrap();

        assert_eq!(created.date.timestamp_subsec_nanos(), 1_000_000);
        assert_eq!(stored.date, created.date);
    }

    #[tokio::test]
    async fn test_update_missing_record() {
        let service = create_test_service(Arc::default()).await;
        let result = service.update_record("missing", UpdateRecordCommand::default()).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_releases_photos_even_when_release_fails() {
        let photos = Arc::new(RecordingPhotoStorage { fail: true, ..Default::default() });
        let service = create_test_service(photos.clone()).await;
        let mut command = create_command();
        command.after_photo = Some(photo("after-1"));
        let created = service.create_record(command, "user-1").await.unwrap();

        service.delete_record(&created.id).await.unwrap();

        assert_eq!(photos.released.lock().unwrap().len(), 2);
        assert!(matches!(service.get_record(&created.id).await, Err(DomainError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_records_by_status() {
        let service = create_test_service(Arc::default()).await;
        service.create_record(create_command(), "user-1").await.unwrap();
        let mut pending = create_command();
        pending.payment_status = Some(PaymentStatus::Pending);
        service.create_record(pending, "user-1").await.unwrap();

        let all = service.list_records(RecordListQuery::default()).await.unwrap();
        let paid = service
            .list_records(RecordListQuery { payment_status: Some(PaymentStatus::Paid) })
            .await
            .unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(paid.len(), 1);
    }
}
