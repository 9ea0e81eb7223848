// Repository modules
pub mod record_repository;
pub mod settings_repository;
pub mod user_repository;

// Re-export repository types
pub use record_repository::RecordRepository;
pub use settings_repository::SettingsRepository;
pub use user_repository::UserRepository;
