// End-to-end contract tests: score a snapshot batch, train on the scorer's
// own output, then serve ad hoc predictions.
use defi_risk_analyzer::{
    AssetRecord, RiskClassifier, RiskError, RiskLabel, RiskPipeline, RiskScorer,
};

fn record(symbol: &str, price: f64, market_cap: f64, total_volume: f64) -> AssetRecord {
    AssetRecord {
        id: symbol.to_lowercase(),
        symbol: symbol.to_string(),
        name: format!("{} Protocol", symbol),
        current_price: price,
        market_cap,
        total_volume,
    }
}

/// A snapshot with ten assets in each risk tier. Prices are flat so the
/// score is driven entirely by the volume/market-cap ratio.
fn mixed_batch() -> Vec<AssetRecord> {
    let mut batch = Vec::new();
    for i in 0..10 {
        let jitter = i as f64 * 1000.0;
        // ratio 0.05 -> score 3 -> Low
        let low_cap = 1_000_000_000.0 + jitter;
        batch.push(record(&format!("LOW{}", i), 100.0, low_cap, low_cap * 0.05));
        // ratio 0.75 -> score 45 -> Medium
        let mid_cap = 100_000_000.0 + jitter;
        batch.push(record(&format!("MID{}", i), 100.0, mid_cap, mid_cap * 0.75));
        // ratio 1.4 -> score 84 -> High
        let high_cap = 10_000_000.0 + jitter;
        batch.push(record(&format!("HI{}", i), 100.0, high_cap, high_cap * 1.4));
    }
    batch
}

#[test]
fn full_pipeline_scores_trains_and_predicts() {
    let pipeline = RiskPipeline::new();
    let batch = mixed_batch();
    let analysis = pipeline.analyze(&batch).unwrap();

    assert_eq!(analysis.scored.len(), batch.len());
    assert!(analysis.report.accuracy >= 0.0 && analysis.report.accuracy <= 1.0);
    assert!(analysis.report.evaluation_examples > 0);

    // Every tier is represented in the scorer output
    for label in [RiskLabel::Low, RiskLabel::Medium, RiskLabel::High] {
        assert!(
            analysis.scored.iter().any(|s| s.risk_label == label),
            "no {} asset in scored batch",
            label
        );
    }

    // The trained classifier serves tuples that were never in the batch,
    // e.g. user-entered values from an interactive collaborator
    let predictions = analysis
        .classifier
        .predict(&[[950_000_000.0, 40_000_000.0, 0.0]])
        .unwrap();
    assert_eq!(predictions.len(), 1);
}

#[test]
fn scored_labels_agree_with_the_threshold_mapping() {
    let scorer = RiskScorer::new();
    let scored = scorer.score_batch(&mixed_batch()).unwrap();

    for asset in &scored {
        assert_eq!(asset.risk_label, RiskLabel::from_score(asset.risk_score));
        assert!(asset.risk_score.is_finite());
    }
}

#[test]
fn two_runs_over_the_same_snapshot_are_identical() {
    let batch = mixed_batch();
    let queries = [
        [900_000_000.0, 50_000_000.0, 0.0],
        [100_000_000.0, 80_000_000.0, 0.1],
        [5_000_000.0, 9_000_000.0, 0.5],
    ];

    let first = RiskPipeline::new().analyze(&batch).unwrap();
    let second = RiskPipeline::new().analyze(&batch).unwrap();

    assert_eq!(first.report.accuracy, second.report.accuracy);
    assert_eq!(first.scored, second.scored);
    assert_eq!(
        first.classifier.predict(&queries).unwrap(),
        second.classifier.predict(&queries).unwrap()
    );
}

#[test]
fn untrained_classifier_refuses_to_predict() {
    let classifier = RiskClassifier::new();
    for query in [[0.0, 0.0, 0.0], [1e9, 1e8, 0.2]] {
        assert_eq!(classifier.predict(&[query]).unwrap_err(), RiskError::NotTrained);
    }
}

#[test]
fn scored_asset_json_shape_is_stable() {
    let scorer = RiskScorer::new();
    let scored = scorer
        .score_batch(&[record("AAA", 100.0, 1000.0, 600.0)])
        .unwrap();

    let json = serde_json::to_value(&scored[0]).unwrap();
    assert_eq!(json["asset"]["symbol"], "AAA");
    assert_eq!(json["asset"]["current_price"], 100.0);
    assert_eq!(json["volatility"], 0.0);
    assert_eq!(json["risk_score"], 36.0);
    assert_eq!(json["risk_label"], "Medium");
    assert_eq!(json["ratio_fallback"], serde_json::Value::Null);
}

#[test]
fn asset_record_round_trips_through_json() {
    // Input contract: batches arrive as deserialized upstream JSON
    let raw = r#"{
        "id": "wrapped-ether",
        "symbol": "WETH",
        "name": "Wrapped Ether",
        "current_price": 3200.5,
        "market_cap": 9000000000.0,
        "total_volume": 450000000.0
    }"#;
    let parsed: AssetRecord = serde_json::from_str(raw).unwrap();
    assert_eq!(parsed.symbol, "WETH");

    let scored = RiskScorer::new().score_record(&parsed, None).unwrap();
    assert_eq!(scored.risk_label, RiskLabel::Low);
}
