//! Conversions between domain models and the `shared` wire types.
pub mod record_mapper;
pub mod user_mapper;

pub use record_mapper::RecordMapper;
pub use user_mapper::UserMapper;
