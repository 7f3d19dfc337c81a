//! Block data codec for mined transaction batches.
//!
//! A mined block carries `{tx_hash: transaction}` as its data. Blocks whose
//! data has any other shape are foreign to this codec and simply contain no
//! transactions.

use serde::Deserialize;
use serde_json::{Map, Value};
use shared_types::{Canonical, Chain, SerializationError, Transaction};
use std::collections::{HashMap, HashSet};

/// Encode a batch, keyed by transaction hash.
pub fn encode<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Value {
    let map: Map<String, Value> = transactions
        .into_iter()
        .map(|tx| (tx.hash(), tx.to_canonical()))
        .collect();
    Value::Object(map)
}

/// Decode a batch. Every key must be the hash of its transaction.
pub fn decode(data: &Value) -> Result<HashMap<String, Transaction>, SerializationError> {
    let batch = HashMap::<String, Transaction>::deserialize(data)?;
    if let Some((key, tx)) = batch.iter().find(|(key, tx)| tx.hash() != **key) {
        return Err(SerializationError::HashMismatch {
            stored: key.clone(),
            computed: tx.hash(),
        });
    }
    Ok(batch)
}

/// Transactions of a block, empty for data this codec does not recognise.
pub fn transactions_of(data: &Value) -> HashMap<String, Transaction> {
    decode(data).unwrap_or_default()
}

/// Hashes of every transaction recorded in `chain`.
pub fn chain_hashes(chain: &Chain) -> HashSet<String> {
    chain
        .blocks()
        .iter()
        .flat_map(|block| transactions_of(block.data()).into_keys())
        .collect()
}

/// Whether a block of `chain` records the transaction with `hash`.
pub fn chain_contains(chain: &Chain, hash: &str) -> bool {
    chain.blocks().iter().any(|block| {
        block
            .data()
            .get(hash)
            .and_then(|value| Transaction::from_canonical(value).ok())
            .is_some_and(|tx| tx.hash() == hash)
    })
}
