//! End-to-end epoch processing tests.
//!
//! Each test builds a genesis pool, signs candidate batches with real Ed25519
//! keys, and checks the accepted subset and the resulting pool state.

use std::collections::HashMap;

use utxo_core::types::*;
use utxo_core::{TransactionError, TxValidator, UtxoPool};
use utxo_tests::helpers::*;

// ======================================================================
// A pays B the whole of a genesis output.
// ======================================================================

#[test]
fn genesis_transfer_updates_pool() {
    let a = keypair(1);
    let b = keypair(2);
    let h0 = genesis_utxo(0xA0, 0);
    let mut validator = TxValidator::new(make_pool(&[(h0, 10, &a)]));

    let tx1 = make_signed_tx(&[h0], &[(10, &b)], &[&a]);
    assert!(validator.is_valid(&tx1));

    let accepted = validator.process_epoch(vec![tx1.clone()]);
    assert_eq!(accepted, vec![tx1.clone()]);

    let pool = validator.pool();
    assert!(!pool.contains(&h0));
    assert_eq!(pool.all_utxos(), vec![output_of(&tx1, 0)]);
    let out = pool.get(&output_of(&tx1, 0)).unwrap();
    assert_eq!(out.value, 10);
    assert_eq!(out.owner, b.owner_key());
}

// ======================================================================
// Construction copies the caller's data.
// ======================================================================

#[test]
fn caller_map_changes_do_not_reach_validator() {
    let a = keypair(1);
    let h0 = genesis_utxo(0xA0, 0);
    let mut initial = HashMap::new();
    initial.insert(h0, TxOutput::new(10, a.owner_key()));

    let validator = TxValidator::new(UtxoPool::from_entries(&initial));
    initial.get_mut(&h0).unwrap().value = 1_000;
    initial.insert(genesis_utxo(0xA1, 0), TxOutput::new(5, a.owner_key()));

    assert_eq!(validator.pool().get(&h0).unwrap().value, 10);
    assert_eq!(validator.pool().len(), 1);
}

// ======================================================================
// Mutual consistency and ordering within a batch.
// ======================================================================

#[test]
fn double_spend_across_batch_keeps_earlier() {
    let a = keypair(1);
    let b = keypair(2);
    let c = keypair(3);
    let h0 = genesis_utxo(0xA0, 0);
    let mut validator = TxValidator::new(make_pool(&[(h0, 10, &a)]));

    let first = make_signed_tx(&[h0], &[(10, &b)], &[&a]);
    let second = make_signed_tx(&[h0], &[(9, &c)], &[&a]);

    let report = validator.process_epoch_with_report(vec![first.clone(), second]);
    assert_eq!(report.accepted, vec![first]);
    assert_eq!(report.rejected, vec![(1, TransactionError::UnknownUtxo(h0))]);
}

#[test]
fn accepted_preserve_candidate_order() {
    let a = keypair(1);
    let b = keypair(2);
    let utxos: Vec<Utxo> = (0..5).map(|i| genesis_utxo(0xB0 + i, 0)).collect();
    let pool = make_pool(
        &utxos
            .iter()
            .map(|u| (*u, 10, &a))
            .collect::<Vec<_>>(),
    );
    let mut validator = TxValidator::new(pool);

    // Odd positions overspend and are rejected.
    let candidates: Vec<Transaction> = utxos
        .iter()
        .enumerate()
        .map(|(i, u)| {
            let value = if i % 2 == 1 { 11 } else { 10 - i as i64 };
            make_signed_tx(&[*u], &[(value, &b)], &[&a])
        })
        .collect();

    let accepted = validator.process_epoch(candidates.clone());
    assert_eq!(
        accepted,
        vec![candidates[0].clone(), candidates[2].clone(), candidates[4].clone()]
    );
}

#[test]
fn spending_chain_in_one_epoch() {
    let a = keypair(1);
    let b = keypair(2);
    let c = keypair(3);
    let h0 = genesis_utxo(0xA0, 0);
    let mut validator = TxValidator::new(make_pool(&[(h0, 100, &a)]));

    let t1 = make_signed_tx(&[h0], &[(60, &b), (40, &a)], &[&a]);
    let t2 = make_signed_tx(&[output_of(&t1, 0)], &[(59, &c)], &[&b]);
    let t3 = make_signed_tx(&[output_of(&t1, 1), output_of(&t2, 0)], &[(98, &a)], &[&a, &c]);

    let report = validator.process_epoch_with_report(vec![t1, t2, t3.clone()]);
    assert_eq!(report.accepted.len(), 3);
    assert_eq!(report.total_fees, 2);
    assert_eq!(validator.pool().all_utxos(), vec![output_of(&t3, 0)]);
    assert_eq!(validator.pool().balance_of(&a.owner_key()), 98);
}

// ======================================================================
// State carries over between epochs.
// ======================================================================

#[test]
fn pool_persists_across_epochs() {
    let a = keypair(1);
    let b = keypair(2);
    let h0 = genesis_utxo(0xA0, 0);
    let mut validator = TxValidator::new(make_pool(&[(h0, 10, &a)]));

    let t1 = make_signed_tx(&[h0], &[(10, &b)], &[&a]);
    assert_eq!(validator.process_epoch(vec![t1.clone()]).len(), 1);

    // Replaying the same transaction next epoch is a double-spend.
    assert!(validator.process_epoch(vec![t1.clone()]).is_empty());

    let t2 = make_signed_tx(&[output_of(&t1, 0)], &[(10, &a)], &[&b]);
    assert_eq!(validator.process_epoch(vec![t2.clone()]), vec![t2.clone()]);
    assert_eq!(validator.pool().all_utxos(), vec![output_of(&t2, 0)]);
}

// ======================================================================
// Rejections reported per rule.
// ======================================================================

#[test]
fn report_names_each_violated_rule() {
    let a = keypair(1);
    let m = keypair(9);
    let utxos: Vec<Utxo> = (0..4).map(|i| genesis_utxo(0xC0 + i, 0)).collect();
    let mut validator = TxValidator::new(make_pool(&[
        (utxos[0], 10, &a),
        (utxos[1], 10, &a),
        (utxos[2], 10, &a),
        (utxos[3], 10, &a),
    ]));

    let candidates = vec![
        make_signed_tx(&[genesis_utxo(0xEE, 0)], &[(1, &a)], &[&a]),
        make_signed_tx(&[utxos[0]], &[(10, &m)], &[&m]),
        make_signed_tx(&[utxos[1], utxos[1]], &[(10, &a)], &[&a, &a]),
        make_signed_tx(&[utxos[2]], &[(12, &a), (-3, &a)], &[&a]),
        make_signed_tx(&[utxos[3]], &[(11, &a)], &[&a]),
    ];

    let report = validator.process_epoch_with_report(candidates);
    assert!(report.accepted.is_empty());
    let reasons: Vec<_> = report.rejected.into_iter().map(|(_, e)| e).collect();
    assert_eq!(
        reasons,
        vec![
            TransactionError::UnknownUtxo(genesis_utxo(0xEE, 0)),
            TransactionError::InvalidSignature { index: 0 },
            TransactionError::DuplicateInput(utxos[1]),
            TransactionError::NegativeOutput { index: 1, value: -3 },
            TransactionError::InsufficientFunds { have: 10, need: 11 },
        ]
    );
    assert_eq!(validator.pool().len(), 4);
}

#[test]
fn epoch_json_roundtrip_preserves_outcome() {
    let a = keypair(1);
    let b = keypair(2);
    let h0 = genesis_utxo(0xA0, 0);
    let pool = make_pool(&[(h0, 10, &a)]);
    let tx = make_signed_tx(&[h0], &[(10, &b)], &[&a]);

    let pool_json = serde_json::to_string(&pool).unwrap();
    let tx_json = serde_json::to_string(&vec![tx.clone()]).unwrap();

    let pool: UtxoPool = serde_json::from_str(&pool_json).unwrap();
    let txs: Vec<Transaction> = serde_json::from_str(&tx_json).unwrap();
    let mut validator = TxValidator::new(pool);

    assert_eq!(validator.process_epoch(txs), vec![tx]);
}
