//! Bounded, durable log of past conversions.

use anyhow::Result;
use chrono::Utc;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

use crate::rate_provider::Conversion;

/// Most conversions kept; the oldest entry is evicted past this.
pub const HISTORY_LIMIT: usize = 10;

const HISTORY_KEY: &str = "conversions";

/// One past conversion. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    pub amount: f64,
    pub from: String,
    pub to: String,
    /// Converted amount, rounded to 2 decimals.
    pub result: f64,
    /// Rate, rounded to 4 decimals.
    pub rate: f64,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl ConversionRecord {
    pub fn new(amount: f64, from: &str, to: &str, conversion: &Conversion) -> Self {
        ConversionRecord {
            amount,
            from: from.to_string(),
            to: to.to_string(),
            result: conversion.converted_amount,
            rate: conversion.rate,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// Conversion history persisted to a local fjall keyspace. The whole list is
/// written as one JSON snapshot under a single key, so a write is
/// all-or-nothing at the storage layer.
pub struct HistoryStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl HistoryStore {
    pub fn open(path: &Path) -> Result<Self> {
        let keyspace = fjall::Config::new(path).open()?;
        let partition = keyspace.open_partition("history", PartitionCreateOptions::default())?;
        Ok(HistoryStore {
            keyspace,
            partition,
        })
    }

    /// Reads the stored snapshot. An absent or unreadable snapshot yields an
    /// empty list, never an error.
    pub fn load(&self) -> Vec<ConversionRecord> {
        match self.partition.get(HISTORY_KEY) {
            Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!("Discarding unreadable history snapshot: {e}");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("Failed to read history snapshot: {e}");
                Vec::new()
            }
        }
    }

    /// Inserts a record at the front, evicting the oldest entry beyond
    /// [`HISTORY_LIMIT`], and persists the full snapshot. Returns the new
    /// list, newest first.
    pub fn append(&self, record: ConversionRecord) -> Result<Vec<ConversionRecord>> {
        let mut records = self.load();
        records.insert(0, record);
        records.truncate(HISTORY_LIMIT);

        self.partition
            .insert(HISTORY_KEY, serde_json::to_vec(&records)?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Persisted {} history records", records.len());
        Ok(records)
    }

    /// Empties the list and removes the persisted snapshot.
    pub fn clear(&self) -> Result<()> {
        self.partition.remove(HISTORY_KEY)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!("Cleared conversion history");
        Ok(())
    }
}
