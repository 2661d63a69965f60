//! Ingestion of the draw export document.
//!
//! Turns the XML text into an in-memory snapshot: one draw date-time plus
//! the list of bet records in document order. Only well-formedness and the
//! presence of `LocalDrawDateTime` are enforced here; everything else is
//! captured verbatim for the transcoding stage to interpret.

use roxmltree::{Document, Node};
use tracing::{debug, info};

/// Fatal ingestion errors. Either one aborts the whole pass.
#[derive(Debug)]
pub enum TicketError {
    /// The document is not well-formed XML.
    Xml(String),
    /// The root element carries no `LocalDrawDateTime` attribute.
    MissingDrawDateTime,
}

/// The parsed export: the draw's raw date-time and all bet records.
#[derive(Debug)]
pub struct TicketDocument {
    pub local_draw_date_time: String,
    pub bets: Vec<BetRecord>,
}

/// Read-only snapshot of one `bet` element.
#[derive(Debug, Clone)]
pub struct BetRecord {
    /// Preserved verbatim, never renumbered or validated as numeric.
    pub ordinal_number: String,
    /// Raw `BetType` attribute; classified later by the transcoder.
    pub bet_type: String,
    /// Raw `BlockCount` attribute, only meaningful for regular bets.
    pub block_count: Option<String>,
    /// All `Block<N>` children that carry both guess attributes.
    pub regular_blocks: Vec<RegularBlock>,
    /// The first nested `guess` element, if any.
    pub systematic: Option<SystematicGuess>,
}

#[derive(Debug, Clone)]
pub struct RegularBlock {
    pub index: u32,
    pub regular_guess: String,
    pub additional_guess: String,
}

#[derive(Debug, Clone)]
pub struct SystematicGuess {
    pub systematic_guess: String,
    pub additional_guess: String,
}

/// Parse the export text into a [`TicketDocument`].
pub fn parse(xml: &str) -> Result<TicketDocument, TicketError> {
    let doc = Document::parse(xml).map_err(|e| TicketError::Xml(e.to_string()))?;
    let root = doc.root_element();

    let local_draw_date_time = root
        .attribute("LocalDrawDateTime")
        .ok_or(TicketError::MissingDrawDateTime)?
        .to_string();

    let bets: Vec<BetRecord> = doc
        .descendants()
        .filter(|n| n.has_tag_name("bet"))
        .map(parse_bet)
        .collect();

    info!(
        local_draw_date_time = %local_draw_date_time,
        bets = bets.len(),
        "Parsed draw export"
    );

    Ok(TicketDocument {
        local_draw_date_time,
        bets,
    })
}

fn parse_bet(node: Node) -> BetRecord {
    let ordinal_number = node.attribute("OrdinalNumber").unwrap_or("").to_string();
    let bet_type = node.attribute("BetType").unwrap_or("").to_string();
    let block_count = node.attribute("BlockCount").map(str::to_string);

    let mut regular_blocks = Vec::new();
    let mut systematic = None;

    for child in node.children().filter(|c| c.is_element()) {
        let name = child.tag_name().name();
        if let Some(suffix) = name.strip_prefix("Block") {
            // A block without both guess attributes is treated as absent.
            if let (Ok(index), Some(regular), Some(additional)) = (
                suffix.parse::<u32>(),
                child.attribute("RegularGuess"),
                child.attribute("AdditionalGuess"),
            ) {
                regular_blocks.push(RegularBlock {
                    index,
                    regular_guess: regular.to_string(),
                    additional_guess: additional.to_string(),
                });
            }
        } else if name == "guess" && systematic.is_none() {
            if let (Some(sys), Some(additional)) = (
                child.attribute("SystematicGuess"),
                child.attribute("AdditionalGuess"),
            ) {
                systematic = Some(SystematicGuess {
                    systematic_guess: sys.to_string(),
                    additional_guess: additional.to_string(),
                });
            }
        }
    }

    debug!(
        ordinal = %ordinal_number,
        bet_type = %bet_type,
        blocks = regular_blocks.len(),
        has_systematic = systematic.is_some(),
        "Parsed bet record"
    );

    BetRecord {
        ordinal_number,
        bet_type,
        block_count,
        regular_blocks,
        systematic,
    }
}
