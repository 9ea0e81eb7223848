use crate::backend::domain::commands::records::{CreateRecordCommand, UpdateRecordCommand};
use crate::backend::domain::models::record::{
    PaymentStatus as DomainPaymentStatus, PhotoRef as DomainPhotoRef, Record as DomainRecord,
    SparePart as DomainSparePart,
};
use shared::{
    CreateRecordRequest, PaymentStatus as SharedPaymentStatus, PhotoRef as SharedPhotoRef,
    Record as SharedRecord, SparePart as SharedSparePart, UpdateRecordRequest,
};

pub struct RecordMapper;

impl RecordMapper {
    pub fn to_dto(domain: DomainRecord) -> SharedRecord {
        SharedRecord {
            id: domain.id,
            date: domain.date,
            mobile_model: domain.mobile_model,
            customer_name: domain.customer_name,
            customer_phone: domain.customer_phone,
            complaint: domain.complaint,
            spare_parts: domain.spare_parts.into_iter().map(Self::to_dto_part).collect(),
            service_charge: domain.service_charge,
            total_price: domain.total_price,
            payment_status: Self::to_dto_status(domain.payment_status),
            before_photo: domain.before_photo.map(Self::to_dto_photo),
            after_photo: domain.after_photo.map(Self::to_dto_photo),
            user: domain.user_id,
            created_at: domain.created_at,
            updated_at: domain.updated_at,
        }
    }

    /// The request's `total_price` is dropped here
    pub fn to_create_command(request: CreateRecordRequest) -> CreateRecordCommand {
        CreateRecordCommand {
            date: request.date,
            mobile_model: request.mobile_model,
            customer_name: request.customer_name,
            customer_phone: request.customer_phone,
            complaint: request.complaint,
            spare_parts: request.spare_parts.into_iter().map(Self::to_domain_part).collect(),
            service_charge: request.service_charge,
            payment_status: request.payment_status.map(Self::to_domain_status),
            before_photo: request.before_photo.map(Self::to_domain_photo),
            after_photo: request.after_photo.map(Self::to_domain_photo),
        }
    }

    pub fn to_update_command(request: UpdateRecordRequest) -> UpdateRecordCommand {
        UpdateRecordCommand {
            date: request.date,
            mobile_model: request.mobile_model,
            customer_name: request.customer_name,
            customer_phone: request.customer_phone,
            complaint: request.complaint,
            spare_parts: request
                .spare_parts
                .map(|parts| parts.into_iter().map(Self::to_domain_part).collect()),
            service_charge: request.service_charge,
            payment_status: request.payment_status.map(Self::to_domain_status),
            before_photo: request.before_photo.map(|photo| photo.map(Self::to_domain_photo)),
            after_photo: request.after_photo.map(|photo| photo.map(Self::to_domain_photo)),
        }
    }

    pub fn to_domain_status(dto_status: SharedPaymentStatus) -> DomainPaymentStatus {
        match dto_status {
            SharedPaymentStatus::Paid => DomainPaymentStatus::Paid,
            SharedPaymentStatus::Pending => DomainPaymentStatus::Pending,
        }
    }

    fn to_dto_status(domain_status: DomainPaymentStatus) -> SharedPaymentStatus {
        match domain_status {
            DomainPaymentStatus::Paid => SharedPaymentStatus::Paid,
            DomainPaymentStatus::Pending => SharedPaymentStatus::Pending,
        }
    }

    fn to_domain_part(dto: SharedSparePart) -> DomainSparePart {
        DomainSparePart {
            name: dto.name,
            price: dto.price,
        }
    }

    fn to_dto_part(domain: DomainSparePart) -> SharedSparePart {
        SharedSparePart {
            name: domain.name,
            price: domain.price,
        }
    }

    fn to_domain_photo(dto: SharedPhotoRef) -> DomainPhotoRef {
        DomainPhotoRef {
            url: dto.url,
            storage_id: dto.storage_id,
        }
    }

    fn to_dto_photo(domain: DomainPhotoRef) -> SharedPhotoRef {
        SharedPhotoRef {
            url: domain.url,
            storage_id: domain.storage_id,
        }
    }
}
