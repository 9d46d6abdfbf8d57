//! Key-value store accessor.
//!
//! Every piece of engine state lives under a named key holding JSON text.
//! `multi_set` on `Database` commits all pairs in one transaction; the
//! default implementation writes them in order.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Durable string-keyed map of JSON values.
pub trait KvStore {
    /// Read the raw JSON text stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store raw JSON text under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Read several keys at once, preserving the requested order.
    fn multi_get(&self, keys: &[&str]) -> Result<Vec<(String, Option<String>)>> {
        keys.iter()
            .map(|key| Ok((key.to_string(), self.get(key)?)))
            .collect()
    }

    /// Write several keys at once.
    fn multi_set(&self, pairs: &[(&str, String)]) -> Result<()> {
        for (key, value) in pairs {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Read and deserialize the JSON value under `key`.
pub fn get_json<S, T>(store: &S, key: &str) -> Result<Option<T>>
where
    S: KvStore + ?Sized,
    T: DeserializeOwned,
{
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` and store it under `key`.
pub fn set_json<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: KvStore + ?Sized,
    T: Serialize + ?Sized,
{
    store.set(key, &serde_json::to_string(value)?)
}
