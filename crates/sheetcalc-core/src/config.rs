//! Per-sheet configuration.

use serde::{Deserialize, Serialize};

use sheetcalc_engine::engine::Limits;

/// Settings a [`crate::Sheet`] is created with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Addressable grid area. Clamped to the hard maxima.
    pub limits: Limits,
}

impl SheetConfig {
    /// Return a copy whose limits lie within the hard grid maxima.
    pub fn normalized(self) -> SheetConfig {
        let limits = self.limits.clamped();
        if limits != self.limits {
            log::warn!(
                "grid limits {}x{} clamped to {}x{}",
                self.limits.max_rows,
                self.limits.max_cols,
                limits.max_rows,
                limits.max_cols
            );
        }
        SheetConfig { limits }
    }
}
