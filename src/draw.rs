use chrono::{Datelike, NaiveDateTime};
use tracing::info;

/// Draw-wide context derived from the export's `LocalDrawDateTime`.
///
/// Built exactly once per draw and immutable afterwards; every bet of the
/// draw shares the same multiplier.
#[derive(Debug, Clone)]
pub struct DrawContext {
    /// The raw attribute value, `DD-MM-YYYY HH:MM`.
    pub local_draw_date_time: String,
    /// Day of week, Sunday = 0 through Saturday = 6.
    pub weekday: u32,
    /// `2^weekday`, so one of {1, 2, 4, 8, 16, 32, 64}.
    pub multiplier: u32,
}

/// The draw date-time could not be interpreted. Fatal for the whole pass.
#[derive(Debug)]
pub struct DrawDateError {
    pub input: String,
    pub reason: String,
}

impl DrawContext {
    /// Derive the context from a `DD-MM-YYYY HH:MM` local date-time string.
    pub fn from_local_date_time(raw: &str) -> Result<DrawContext, DrawDateError> {
        let parsed = NaiveDateTime::parse_from_str(raw, "%d-%m-%Y %H:%M").map_err(|e| {
            DrawDateError {
                input: raw.to_string(),
                reason: e.to_string(),
            }
        })?;

        let weekday = parsed.weekday().num_days_from_sunday();
        let multiplier = 1u32 << weekday;

        info!(
            local_draw_date_time = raw,
            weekday,
            multiplier,
            "Derived draw context"
        );

        Ok(DrawContext {
            local_draw_date_time: raw.to_string(),
            weekday,
            multiplier,
        })
    }
}
