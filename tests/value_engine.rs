//! End-to-end checks of the value engine through the public API.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use statsedge::engine::ledger::{MemoryLedger, WalletBook, WalletLedger};
use statsedge::engine::settlement::{SettlementAction, Settler};
use statsedge::storage;
use statsedge::strategy::{
    edge, evaluate, expected_value, implied_probability, kelly_stake, process_bet_result,
    ValueEngine,
};
use statsedge::types::{BetOutcome, EngineError, Recommendation};

#[test]
fn implied_probability_contract() {
    assert_eq!(implied_probability(2.0), Ok(0.5));
    assert!((implied_probability(1.5).unwrap() - 0.6667).abs() < 1e-4);
    assert_eq!(implied_probability(1.0), Err(EngineError::InvalidOdds(1.0)));
    assert!(implied_probability(0.0).is_err());
}

#[test]
fn edge_and_ev_contract() {
    for (p, q) in [(0.55, 0.48), (1.2, -0.4), (0.0, 1.0)] {
        assert_eq!(edge(p, q), p - q);
    }
    assert_eq!(expected_value(0.5, 2.0), 0.0);
}

#[test]
fn kelly_contract() {
    assert_eq!(kelly_stake(dec!(1000), 0.4, 2.0, 0.25), Decimal::ZERO);
    assert_eq!(kelly_stake(dec!(1000), 0.6, 2.0, 0.25), dec!(50));
    assert_eq!(kelly_stake(dec!(1000), 0.99, 1.0, 0.25), Decimal::ZERO);
    assert_eq!(kelly_stake(dec!(1000), 0.99, 0.7, 1.0), Decimal::ZERO);
}

#[test]
fn evaluate_contract() {
    let a = evaluate(0.55, 0.48);
    assert!((a.edge - 0.07).abs() < 1e-9);
    assert!(!a.is_elite_alert);
    assert_eq!(a.recommendation, Recommendation::Bet);

    let b = evaluate(0.60, 0.45);
    assert!((b.edge - 0.15).abs() < 1e-9);
    assert!(b.is_elite_alert);
    assert_eq!(b.recommendation, Recommendation::Bet);

    let c = evaluate(0.40, 0.50);
    assert!((c.edge + 0.10).abs() < 1e-9);
    assert_eq!(c.recommendation, Recommendation::Pass);
}

#[test]
fn refund_contract() {
    assert_eq!(process_bet_result(dec!(15.00), "lost", true), Some(dec!(15.00)));
    assert_eq!(process_bet_result(dec!(50.00), "lost", true), Some(dec!(15.00)));
    assert_eq!(process_bet_result(dec!(10.00), "lost", true), Some(dec!(10.00)));
    assert_eq!(process_bet_result(dec!(15.00), "LOST", true), Some(dec!(15.00)));
    assert_eq!(process_bet_result(dec!(15.00), "lost", false), None);
    assert_eq!(process_bet_result(dec!(15.00), "won", true), None);
}

#[test]
fn repeated_calls_are_identical() {
    let engine = ValueEngine::default();
    for _ in 0..3 {
        assert_eq!(implied_probability(3.4), implied_probability(3.4));
        assert_eq!(evaluate(0.61, 0.47), evaluate(0.61, 0.47));
        assert_eq!(
            kelly_stake(dec!(2500), 0.41, 2.9, 0.25),
            kelly_stake(dec!(2500), 0.41, 2.9, 0.25)
        );
        assert_eq!(
            process_bet_result(dec!(22.10), "Lost", true),
            process_bet_result(dec!(22.10), "Lost", true)
        );
        assert_eq!(
            engine.analyze(dec!(800), 0.52, 2.2),
            engine.analyze(dec!(800), 0.52, 2.2)
        );
    }
}

#[test]
fn engine_shared_across_threads() {
    let engine = Arc::new(ValueEngine::default());
    let expected = engine.analyze(dec!(1000), 0.58, 2.05).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            std::thread::spawn(move || engine.analyze(dec!(1000), 0.58, 2.05).unwrap())
        })
        .collect();

    for h in handles {
        assert_eq!(h.join().unwrap(), expected);
    }
}

#[test]
fn settle_persist_and_restore() {
    tokio_test::block_on(async {
        let engine = ValueEngine::default();
        let ledger = MemoryLedger::new(WalletBook::new(dec!(20)));

        let lost = BetOutcome::new(dec!(40), "lost", true);
        let report = Settler::settle(&engine, &ledger, "punter", &lost).await.unwrap();
        assert_eq!(report.action, SettlementAction::RefundIssued);
        assert_eq!(report.amount, dec!(15.00));

        let won = BetOutcome::new(dec!(40), "won", true);
        let report = Settler::settle(&engine, &ledger, "punter", &won).await.unwrap();
        assert_eq!(report.action, SettlementAction::NoAction);

        let mut path = std::env::temp_dir();
        path.push(format!("statsedge_it_{}.json", uuid::Uuid::new_v4()));
        let path = path.to_string_lossy().to_string();

        storage::save_book(&ledger.snapshot().await, Some(&path)).unwrap();
        let restored = MemoryLedger::new(storage::load_book(Some(&path)).unwrap().unwrap());
        assert_eq!(restored.balance("punter").await.unwrap(), dec!(35.00));
        assert_eq!(restored.balance("someone_else").await.unwrap(), dec!(20));

        // Refunds size the next stake
        let analysis = engine
            .analyze(restored.balance("punter").await.unwrap(), 0.6, 2.0)
            .unwrap();
        assert_eq!(analysis.kelly_stake, dec!(1.75));

        storage::delete_book(Some(&path)).unwrap();
    });
}
