use draw_codes::encode::{EncodedImage, MockBarcodeEncoder};
use draw_codes::process::{process, BetResult, ProcessConfig};
use draw_codes::transcode::SkipReason;

const REFERENCE_EXPORT: &str = r#"
<draw LocalDrawDateTime="15-03-2024 20:00">
  <bet BetType="Regular" OrdinalNumber="7" BlockCount="1">
    <Block1 RegularGuess="1,2,3,4,5" AdditionalGuess="9"/>
  </bet>
  <bet BetType="Systematic" OrdinalNumber="8">
    <guess SystematicGuess="1;2;3" AdditionalGuess="4"/>
  </bet>
</draw>
"#;

const REGULAR_DATA: &str = "1;FDJ;PDJ;0,0000;141;0102030405C09O0;0,0;32,1;1";
const SYSTEMATIC_DATA: &str = "1;FDJ;PDJ;0,0000;141;010203C04O0;0,0;32,1;1";

fn dummy_image() -> EncodedImage {
    EncodedImage {
        width: 2,
        height: 2,
        pixels: vec![0, 255, 255, 0],
        unicode: "▀▄".to_string(),
    }
}

#[tokio::test]
async fn test_process_reports_each_bet_in_order() {
    let mut encoder = MockBarcodeEncoder::new();
    encoder
        .expect_encode()
        .times(2)
        .returning(|_data: &str| Ok(dummy_image()));

    let config = ProcessConfig::default();
    let report = process(&config, &encoder, REFERENCE_EXPORT)
        .await
        .expect("Pass should succeed");

    assert_eq!(report.local_draw_date_time, "15-03-2024 20:00");
    assert_eq!(report.weekday, 5, "15-03-2024 is a Friday");
    assert_eq!(report.multiplier, 32);
    assert_eq!(report.total_bets, 2);
    assert_eq!(report.encoded, 2);
    assert_eq!(report.failed, 0);
    assert_eq!(report.skipped, 0);

    // Ordinal-to-row correspondence must match the document order.
    assert_eq!(
        report.aggregated_data(),
        vec![("7", REGULAR_DATA), ("8", SYSTEMATIC_DATA)]
    );
}

#[tokio::test]
async fn test_encoding_failure_does_not_abort_remaining_bets() {
    let mut encoder = MockBarcodeEncoder::new();
    encoder.expect_encode().times(2).returning(|data: &str| {
        if data == REGULAR_DATA {
            Err("Data Matrix generation failed: payload rejected".into())
        } else {
            Ok(dummy_image())
        }
    });

    let config = ProcessConfig::default();
    let report = process(&config, &encoder, REFERENCE_EXPORT)
        .await
        .expect("Per-bet encoding failures are not fatal");

    assert_eq!(report.total_bets, 2);
    assert_eq!(report.encoded, 1);
    assert_eq!(report.failed, 1);

    // The failed bet keeps its position, its data string and the message.
    match &report.bets[0].result {
        BetResult::EncodeFailed { data, error } => {
            assert_eq!(report.bets[0].ordinal, "7");
            assert_eq!(data, REGULAR_DATA);
            assert!(error.contains("payload rejected"), "got: {error}");
        }
        other => panic!("Expected EncodeFailed for ordinal 7, got {other:?}"),
    }
    match &report.bets[1].result {
        BetResult::Encoded { data, .. } => assert_eq!(data, SYSTEMATIC_DATA),
        other => panic!("Expected Encoded for ordinal 8, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unsupported_bet_type_is_reported_not_fatal() {
    let xml = r#"
<draw LocalDrawDateTime="15-03-2024 20:00">
  <bet BetType="Unknown" OrdinalNumber="1"/>
  <bet BetType="Systematic" OrdinalNumber="2">
    <guess SystematicGuess="1;2;3" AdditionalGuess="4"/>
  </bet>
</draw>
"#;

    let mut encoder = MockBarcodeEncoder::new();
    encoder
        .expect_encode()
        .times(1)
        .returning(|_data: &str| Ok(dummy_image()));

    let config = ProcessConfig::default();
    let report = process(&config, &encoder, xml)
        .await
        .expect("Unknown bet types are skipped, not fatal");

    assert_eq!(report.total_bets, 2);
    assert_eq!(report.encoded, 1);
    assert_eq!(report.skipped, 1);
    match &report.bets[0].result {
        BetResult::Skipped {
            reason: SkipReason::UnsupportedBetType(t),
        } => assert_eq!(t, "Unknown"),
        other => panic!("Expected UnsupportedBetType skip, got {other:?}"),
    }
    assert_eq!(report.aggregated_data(), vec![("2", SYSTEMATIC_DATA)]);
}

#[tokio::test]
async fn test_malformed_document_aborts_before_any_encoding() {
    // No expectations: the encoder must never be called.
    let encoder = MockBarcodeEncoder::new();

    let config = ProcessConfig::default();
    let err = process(&config, &encoder, "<draw LocalDrawDateTime=")
        .await
        .expect_err("Malformed XML must be fatal");
    assert!(err.contains("parse draw export"), "got: {err}");
}

#[tokio::test]
async fn test_missing_draw_date_aborts_before_any_encoding() {
    let encoder = MockBarcodeEncoder::new();

    let xml = r#"
<draw>
  <bet BetType="Systematic" OrdinalNumber="1">
    <guess SystematicGuess="1;2" AdditionalGuess="3"/>
  </bet>
</draw>
"#;

    let config = ProcessConfig::default();
    let err = process(&config, &encoder, xml)
        .await
        .expect_err("Missing draw date must be fatal");
    assert!(err.contains("MissingDrawDateTime"), "got: {err}");
}

#[tokio::test]
async fn test_empty_draw_produces_empty_report() {
    let encoder = MockBarcodeEncoder::new();

    let config = ProcessConfig::default();
    let report = process(&config, &encoder, r#"<draw LocalDrawDateTime="07-01-2024 18:30"/>"#)
        .await
        .expect("A draw without bets is still a valid pass");

    assert_eq!(report.multiplier, 1, "07-01-2024 is a Sunday");
    assert_eq!(report.total_bets, 0);
    assert!(report.aggregated_data().is_empty());
}
