//! # Core Ledger Entities
//!
//! ## Clusters
//!
//! - **Intake**: [`Transaction`], identified by its content hash
//! - **History**: [`Block`], [`Chain`]
//!
//! Hashes are lowercase hex SHA-256 over compact JSON text. A transaction
//! hashes its fields in declaration order (`seller_id, buyer_id, timestamp,
//! amount`). A block hashes `[timestamp, prev_hash, data]`, where `data` is a
//! `serde_json::Value` whose object keys are kept sorted, so the digest does
//! not depend on the process or on insertion order.
//!
//! Block and chain documents are decoded through [`BlockDocument`] and
//! [`ChainDocument`], which carry the fields as written and are checked on
//! conversion.

use crate::canonical::Canonical;
use crate::errors::{ChainError, SerializationError};
use crate::sha256_hex;
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{json, Number, Value};

// =============================================================================
// TRANSACTION
// =============================================================================

/// A transfer between a seller and a buyer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Transaction {
    seller_id: String,
    buyer_id: String,
    timestamp: Timestamp,
    amount: Number,
}

impl Transaction {
    /// Create a transaction. Fails if `amount` is not finite.
    pub fn new(
        seller_id: impl Into<String>,
        buyer_id: impl Into<String>,
        timestamp: Timestamp,
        amount: f64,
    ) -> Result<Self, SerializationError> {
        let amount = Number::from_f64(amount).ok_or(SerializationError::InvalidAmount)?;
        Ok(Self {
            seller_id: seller_id.into(),
            buyer_id: buyer_id.into(),
            timestamp,
            amount,
        })
    }

    pub fn seller_id(&self) -> &str {
        &self.seller_id
    }

    pub fn buyer_id(&self) -> &str {
        &self.buyer_id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Amount as a float. Integer amounts read from a document convert exactly
    /// while they stay below 2^53.
    pub fn amount(&self) -> f64 {
        self.amount.as_f64().unwrap_or_default()
    }

    /// Content hash; equal field values always give equal hashes.
    pub fn hash(&self) -> String {
        sha256_hex(self.to_json().as_bytes())
    }
}

impl Canonical for Transaction {
    type Document = Self;

    fn from_document(document: Self) -> Result<Self, SerializationError> {
        Ok(document)
    }
}

// =============================================================================
// BLOCK
// =============================================================================

/// A unit of chain history.
///
/// The hash is computed once from `(timestamp, prev_hash, data)`; a block is
/// fully determined by those inputs and exposes no mutators. `data` is opaque
/// to the block and to chain linkage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BlockDocument")]
pub struct Block {
    timestamp: Timestamp,
    prev_hash: Option<String>,
    data: Value,
    hash: String,
}

impl Block {
    /// Build a block. An empty `prev_hash` is treated as absent (genesis).
    pub fn new(timestamp: Timestamp, prev_hash: Option<String>, data: Value) -> Self {
        let prev_hash = prev_hash.filter(|h| !h.is_empty());
        let hash = Self::compute_hash(&timestamp, prev_hash.as_deref(), &data);
        Self {
            timestamp,
            prev_hash,
            data,
            hash,
        }
    }

    fn compute_hash(timestamp: &Timestamp, prev_hash: Option<&str>, data: &Value) -> String {
        let raw = json!([timestamp.to_string(), prev_hash, data]);
        sha256_hex(raw.to_string().as_bytes())
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn prev_hash(&self) -> Option<&str> {
        self.prev_hash.as_deref()
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// Wire form of a [`Block`]. `hash` may be omitted; when present it must
/// match the contents.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockDocument {
    timestamp: Timestamp,
    #[serde(default)]
    prev_hash: Option<String>,
    data: Value,
    #[serde(default)]
    hash: Option<String>,
}

impl TryFrom<BlockDocument> for Block {
    type Error = SerializationError;

    fn try_from(document: BlockDocument) -> Result<Self, Self::Error> {
        let block = Self::new(document.timestamp, document.prev_hash, document.data);
        match document.hash {
            Some(stored) if stored != block.hash => Err(SerializationError::HashMismatch {
                stored,
                computed: block.hash,
            }),
            _ => Ok(block),
        }
    }
}

impl Canonical for Block {
    type Document = BlockDocument;

    fn from_document(document: BlockDocument) -> Result<Self, SerializationError> {
        Self::try_from(document)
    }
}

// =============================================================================
// CHAIN
// =============================================================================

/// Genesis-first sequence of blocks.
///
/// INVARIANT: for every `i > 0`, `blocks[i].prev_hash == blocks[i - 1].hash`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "ChainDocument")]
pub struct Chain {
    blocks: Vec<Block>,
}

impl Chain {
    /// The empty chain, the valid state of a node with no history yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from blocks, checking linkage after the first block.
    ///
    /// The first block may carry any `prev_hash`.
    pub fn from_blocks(blocks: Vec<Block>) -> Result<Self, SerializationError> {
        if let Some(index) = blocks
            .windows(2)
            .position(|pair| pair[1].prev_hash() != Some(pair[0].hash()))
        {
            return Err(SerializationError::BrokenLink { index: index + 1 });
        }
        Ok(Self { blocks })
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn latest_block(&self) -> Option<&Block> {
        self.blocks.last()
    }

    /// Hash of the last block, `None` for an empty chain.
    pub fn latest_hash(&self) -> Option<&str> {
        self.blocks.last().map(Block::hash)
    }

    /// Append a block whose `prev_hash` equals the tail hash.
    ///
    /// On an empty chain only a block without `prev_hash` is accepted. A
    /// rejected block leaves the chain untouched.
    pub fn add_block(&mut self, block: Block) -> Result<(), ChainError> {
        let expected = self.latest_hash();
        if block.prev_hash() != expected {
            return Err(ChainError::InvariantViolation {
                expected: expected.map(str::to_string),
                actual: block.prev_hash().map(str::to_string),
            });
        }
        self.blocks.push(block);
        Ok(())
    }

    /// Drop and return the tail block.
    pub fn remove_latest_block(&mut self) -> Option<Block> {
        self.blocks.pop()
    }
}

/// Wire form of a [`Chain`]: `{"blocks": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChainDocument {
    blocks: Vec<BlockDocument>,
}

impl TryFrom<ChainDocument> for Chain {
    type Error = SerializationError;

    fn try_from(document: ChainDocument) -> Result<Self, Self::Error> {
        let blocks = document
            .blocks
            .into_iter()
            .map(Block::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_blocks(blocks)
    }
}

impl Canonical for Chain {
    type Document = ChainDocument;

    fn from_document(document: ChainDocument) -> Result<Self, SerializationError> {
        Self::try_from(document)
    }
}
