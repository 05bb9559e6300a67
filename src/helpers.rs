use log::warn;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    error::{QuizError, Result},
    storage::Storage,
};

/// Reads a whole collection for display. Read failures come back as an empty
/// list, so this must not feed a write.
pub async fn load_collection<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Vec<T> {
    let raw = match storage.get(key).await {
        Ok(raw) => raw,
        Err(error) => {
            warn!("Could not read {}: {}", key, error);
            return Vec::new();
        }
    };

    match raw {
        Some(raw) => parse_collection(key, &raw),
        None => Vec::new(),
    }
}

/// Reads a whole collection ahead of a read-modify-write. A failed read is
/// returned to the caller instead of being mistaken for an empty list.
pub async fn read_collection<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Vec<T>> {
    let raw = storage.get(key).await?;
    Ok(raw.map(|raw| parse_collection(key, &raw)).unwrap_or_default())
}

/// Decodes a stored array record by record. Records that do not decode are
/// skipped; a payload that is not an array reads as empty.
pub fn parse_collection<T: DeserializeOwned>(key: &str, raw: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    let records = match serde_json::from_str(raw) {
        Ok(Value::Array(records)) => records,
        Ok(_) => {
            warn!("Discarding {} payload: not an array", key);
            return Vec::new();
        }
        Err(error) => {
            warn!("Discarding corrupt {} payload: {}", key, error);
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(error) => {
                warn!("Skipping {} record {}: {}", key, index, error);
                None
            }
        })
        .collect()
}

pub async fn save_collection<T: Serialize>(
    storage: &dyn Storage,
    key: &str,
    list: &[T],
) -> Result<()> {
    let raw = serde_json::to_string(list)?;
    storage.set(key, &raw).await?;
    Ok(())
}

pub fn remove_at<T>(list: &mut Vec<T>, position: usize) -> Result<T> {
    if position >= list.len() {
        return Err(QuizError::OutOfRange {
            position,
            len: list.len(),
        });
    }
    Ok(list.remove(position))
}
