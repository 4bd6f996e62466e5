//! Limit/skip pagination parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, PickFirst, serde_as};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Page selection accepted both as a query string and as a JSON body.
///
/// Values may be sent as numbers or as numeric strings.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde_as(as = "Option<PickFirst<(_, DisplayFromStr)>>")]
    #[serde(default)]
    pub skip: Option<i64>,
}

impl PageParams {
    /// Validates the parameters and returns `(limit, skip)`.
    ///
    /// # Defaults
    ///
    /// - `limit`: 10
    /// - `skip`: 0
    ///
    /// # Validation
    ///
    /// - Limit must be between 1 and 100
    /// - Skip must not be negative
    pub fn validate_and_get_limit_skip(&self) -> Result<(i64, i64), String> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        let skip = self.skip.unwrap_or(0);

        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(format!("Limit must be between 1 and {MAX_LIMIT}"));
        }

        if skip < 0 {
            return Err("Skip must not be negative".to_string());
        }

        Ok((limit, skip))
    }
}
