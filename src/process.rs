//! Coordinating module for the parse-transcode-encode pipeline.
//!
//! A pass is all-or-nothing at the document level: malformed XML or an
//! unusable draw date aborts before any bet output exists. Per bet it is
//! best-effort: skipped bets and encoding failures are recorded in the
//! report and never interrupt the remaining bets.

use futures::future::join_all;
use tracing::{debug, error, info};

use crate::config::EncodeConfig;
use crate::draw::DrawContext;
use crate::encode::{BarcodeEncoder, EncodedImage};
use crate::ticket;
use crate::transcode::{transcode_bets, BetOutcome, SkipReason};

/// The top-level process configuration.
#[derive(Debug, Clone, Default)]
pub struct ProcessConfig {
    pub encode: EncodeConfig,
}

/// Outcome of a whole pass over one draw export.
#[derive(Debug)]
pub struct ProcessReport {
    pub local_draw_date_time: String,
    pub weekday: u32,
    pub multiplier: u32,
    pub total_bets: usize,
    pub encoded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// One report per bet, in document order.
    pub bets: Vec<BetReport>,
}

impl ProcessReport {
    /// Ordered (ordinal, protocol string) pairs for every transcoded bet.
    pub fn aggregated_data(&self) -> Vec<(&str, &str)> {
        self.bets
            .iter()
            .filter_map(|bet| match &bet.result {
                BetResult::Encoded { data, .. } | BetResult::EncodeFailed { data, .. } => {
                    Some((bet.ordinal.as_str(), data.as_str()))
                }
                BetResult::Skipped { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct BetReport {
    pub ordinal: String,
    pub result: BetResult,
}

#[derive(Debug)]
pub enum BetResult {
    /// Transcoded and rendered.
    Encoded { data: String, image: EncodedImage },
    /// Transcoded, but the rendering collaborator failed.
    EncodeFailed { data: String, error: String },
    /// No protocol line was produced for this bet.
    Skipped { reason: SkipReason },
}

#[derive(serde::Serialize)]
struct EncodeSummary<'a> {
    ordinal: &'a str,
    width: u32,
    height: u32,
    data_len: usize,
}

/// Run one full pass: parse the export, derive the draw context, transcode
/// every bet and render each produced line through the encoder.
pub async fn process<E>(
    config: &ProcessConfig,
    encoder: &E,
    xml: &str,
) -> Result<ProcessReport, String>
where
    E: BarcodeEncoder,
{
    info!(scale = config.encode.scale, "[PROCESS] Starting transcoding pass");

    let document = ticket::parse(xml).map_err(|e| {
        error!(error = ?e, "[PROCESS][ERROR] Failed to parse draw export");
        format!("Failed to parse draw export: {e:?}")
    })?;

    let ctx = DrawContext::from_local_date_time(&document.local_draw_date_time).map_err(|e| {
        error!(error = ?e, "[PROCESS][ERROR] Failed to derive draw context");
        format!("Failed to derive draw context: {e:?}")
    })?;

    let outcomes = transcode_bets(&document.bets, &ctx);
    info!(total = outcomes.len(), "[PROCESS] Transcoded bet records");

    // Each encode call is independent; join_all preserves input order, so
    // the reports stay aligned with the document's bet order.
    let bets: Vec<BetReport> = join_all(outcomes.into_iter().map(|outcome| async move {
        match outcome {
            BetOutcome::Produced { ordinal, data } => match encoder.encode(&data).await {
                Ok(image) => {
                    info!(ordinal = %ordinal, "[PROCESS][ENCODE] Rendered optical code");
                    let summary = EncodeSummary {
                        ordinal: &ordinal,
                        width: image.width,
                        height: image.height,
                        data_len: data.len(),
                    };
                    match serde_json::to_string(&summary) {
                        Ok(json) => {
                            debug!(json = %json, "[PROCESS][ENCODE][DEBUG] Encode summary")
                        }
                        Err(e) => {
                            error!(error = ?e, "[PROCESS][ENCODE][DEBUG] Failed to serialize encode summary")
                        }
                    }
                    BetReport {
                        ordinal,
                        result: BetResult::Encoded { data, image },
                    }
                }
                Err(e) => {
                    error!(ordinal = %ordinal, error = %e, "[PROCESS][ERROR][ENCODE] Rendering failed");
                    BetReport {
                        ordinal,
                        result: BetResult::EncodeFailed {
                            data,
                            error: e.to_string(),
                        },
                    }
                }
            },
            BetOutcome::Skipped { ordinal, reason } => BetReport {
                ordinal,
                result: BetResult::Skipped { reason },
            },
        }
    }))
    .await;

    let encoded = bets
        .iter()
        .filter(|b| matches!(b.result, BetResult::Encoded { .. }))
        .count();
    let failed = bets
        .iter()
        .filter(|b| matches!(b.result, BetResult::EncodeFailed { .. }))
        .count();
    let skipped = bets
        .iter()
        .filter(|b| matches!(b.result, BetResult::Skipped { .. }))
        .count();

    info!(
        total = bets.len(),
        encoded,
        failed,
        skipped,
        "[PROCESS] Pass complete"
    );

    Ok(ProcessReport {
        local_draw_date_time: document.local_draw_date_time,
        weekday: ctx.weekday,
        multiplier: ctx.multiplier,
        total_bets: bets.len(),
        encoded,
        failed,
        skipped,
        bets,
    })
}
