//! The bet transcoder: turns one bet record into its protocol line.
//!
//! Every line shares the same grammar:
//!
//! ```text
//! 1;FDJ;PDJ;0,0000;141;<BODY>;0,0;<multiplier>,1;1
//! ```
//!
//! where the body is built from the bet's guess data and the multiplier
//! comes from the shared [`DrawContext`]. Bets are independent of each
//! other; a bet that cannot be transcoded is skipped with a reason, never
//! a fatal error. Guess tokens are treated as opaque text: they are padded
//! and concatenated as-is, without any legality checks.

use tracing::{debug, warn};

use crate::draw::DrawContext;
use crate::ticket::BetRecord;

const PROTOCOL_PREFIX: &str = "1;FDJ;PDJ;0,0000;141;";

/// Result of transcoding a single bet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BetOutcome {
    /// The bet produced a protocol line.
    Produced { ordinal: String, data: String },
    /// The bet produced nothing; the reason says why.
    Skipped { ordinal: String, reason: SkipReason },
}

/// Non-fatal reasons a bet yields no protocol line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// `BetType` is neither `Regular` nor `Systematic`.
    UnsupportedBetType(String),
    /// A required guess sub-element or attribute is absent.
    MissingGuessData,
}

/// Transcode all bets in input order, one outcome per bet.
pub fn transcode_bets(bets: &[BetRecord], ctx: &DrawContext) -> Vec<BetOutcome> {
    bets.iter().map(|bet| transcode_bet(bet, ctx)).collect()
}

/// Transcode one bet against the shared draw context.
pub fn transcode_bet(bet: &BetRecord, ctx: &DrawContext) -> BetOutcome {
    let body = match bet.bet_type.as_str() {
        "Regular" => regular_body(bet),
        "Systematic" => systematic_body(bet),
        other => {
            warn!(ordinal = %bet.ordinal_number, bet_type = other, "Unsupported bet type, skipping");
            return BetOutcome::Skipped {
                ordinal: bet.ordinal_number.clone(),
                reason: SkipReason::UnsupportedBetType(other.to_string()),
            };
        }
    };

    match body {
        Some(body) => {
            let data = format!("{PROTOCOL_PREFIX}{body};0,0;{},1;1", ctx.multiplier);
            debug!(ordinal = %bet.ordinal_number, data = %data, "Transcoded bet");
            BetOutcome::Produced {
                ordinal: bet.ordinal_number.clone(),
                data,
            }
        }
        None => {
            warn!(ordinal = %bet.ordinal_number, bet_type = %bet.bet_type, "Missing guess data, skipping");
            BetOutcome::Skipped {
                ordinal: bet.ordinal_number.clone(),
                reason: SkipReason::MissingGuessData,
            }
        }
    }
}

/// Body of a regular bet: one fragment per existing block, joined with `,`.
///
/// Block indices run `1..=BlockCount`; an index with no matching block is
/// skipped and later indices still contribute, so the join never produces
/// an empty fragment or a stray separator.
fn regular_body(bet: &BetRecord) -> Option<String> {
    let block_count: u32 = bet.block_count.as_deref()?.parse().ok()?;

    let fragments: Vec<String> = (1..=block_count)
        .filter_map(|i| bet.regular_blocks.iter().find(|b| b.index == i))
        .map(|block| guess_fragment(block.regular_guess.split(','), &block.additional_guess))
        .collect();

    Some(fragments.join(","))
}

/// Body of a systematic bet: a single fragment from the nested guess element.
fn systematic_body(bet: &BetRecord) -> Option<String> {
    let guess = bet.systematic.as_ref()?;
    Some(guess_fragment(
        guess.systematic_guess.split(';'),
        &guess.additional_guess,
    ))
}

/// `<padded numbers>C<padded additional>O0`
fn guess_fragment<'a>(numbers: impl Iterator<Item = &'a str>, additional: &str) -> String {
    let numbers: String = numbers.map(pad2).collect();
    format!("{}C{}O0", numbers, pad2(additional))
}

/// Left-pad a token with zeros to width 2. Longer tokens pass through
/// unchanged; padding never truncates.
fn pad2(token: &str) -> String {
    format!("{token:0>2}")
}
