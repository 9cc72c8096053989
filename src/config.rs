use std::num::NonZeroU32;

use chrono::FixedOffset;
use nonzero_ext::nonzero;

use crate::dto::PredictionError;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_ASSET_ID: &str = "bitcoin";
pub const DEFAULT_VS_CURRENCY: &str = "jpy";
/// Japan Standard Time; dates are shown the way a ja-JP locale sees them.
pub const DEFAULT_DISPLAY_OFFSET_SECS: i32 = 9 * 3600;

/// Connection and display settings for [`crate::PredictionSdk`].
///
/// The defaults target the public CoinGecko API for Bitcoin quoted in yen.
/// Tests usually only swap `base_url` for a mock server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SdkConfig {
    pub base_url: String,
    pub asset_id: String,
    pub vs_currency: String,
    pub display_offset_secs: i32,
    pub requests_per_second: NonZeroU32,
}

impl SdkConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn display_offset(&self) -> Result<FixedOffset, PredictionError> {
        FixedOffset::east_opt(self.display_offset_secs).ok_or(PredictionError::TimeConversion)
    }
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            asset_id: DEFAULT_ASSET_ID.to_string(),
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            display_offset_secs: DEFAULT_DISPLAY_OFFSET_SECS,
            // Rate limit: 8 requests per second (burst 8)
            requests_per_second: nonzero!(8u32),
        }
    }
}
