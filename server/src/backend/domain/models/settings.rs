//! Application-wide settings, stored as a single row.

/// Key of the one settings row
pub const SETTINGS_KEY: &str = "app-settings";

/// Referral code used when settings are created lazily
pub const DEFAULT_REFERRAL_CODE: &str = "DEFAULT-CODE";

/// Referral code seeded when the first admin registers
pub const INITIAL_REFERRAL_CODE: &str = "PLEASE-UPDATE-ME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub key: String,
    pub staff_referral_code: String,
}

impl Settings {
    pub fn with_referral_code(code: impl Into<String>) -> Self {
        Self {
            key: SETTINGS_KEY.to_string(),
            staff_referral_code: code.into(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_referral_code(DEFAULT_REFERRAL_CODE)
    }
}
