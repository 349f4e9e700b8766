//! Key-value blob storage
//!
//! LocalStorage on the web. Native builds keep blobs in a per-thread map so
//! the same load/save code paths run under `cargo test`.

use serde::Serialize;
use serde::de::DeserializeOwned;

#[cfg(target_arch = "wasm32")]
use crate::error::GameError;
use crate::error::Result;

#[cfg(target_arch = "wasm32")]
fn storage() -> Result<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
        .ok_or(GameError::StorageUnavailable)
}

/// Read a raw blob
#[cfg(target_arch = "wasm32")]
pub fn load_raw(key: &str) -> Result<Option<String>> {
    storage()?
        .get_item(key)
        .map_err(|e| GameError::Storage(format!("{e:?}")))
}

/// Write a raw blob
#[cfg(target_arch = "wasm32")]
pub fn save_raw(key: &str, value: &str) -> Result<()> {
    storage()?
        .set_item(key, value)
        .map_err(|e| GameError::Storage(format!("{e:?}")))
}

#[cfg(target_arch = "wasm32")]
pub fn remove(key: &str) -> Result<()> {
    storage()?
        .remove_item(key)
        .map_err(|e| GameError::Storage(format!("{e:?}")))
}

#[cfg(not(target_arch = "wasm32"))]
thread_local! {
    static MEMORY: std::cell::RefCell<std::collections::HashMap<String, String>> =
        std::cell::RefCell::new(std::collections::HashMap::new());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_raw(key: &str) -> Result<Option<String>> {
    Ok(MEMORY.with(|m| m.borrow().get(key).cloned()))
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_raw(key: &str, value: &str) -> Result<()> {
    MEMORY.with(|m| m.borrow_mut().insert(key.to_string(), value.to_string()));
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove(key: &str) -> Result<()> {
    MEMORY.with(|m| m.borrow_mut().remove(key));
    Ok(())
}

/// Read and decode a JSON blob; `None` if the key is absent
pub fn load_json<T: DeserializeOwned>(key: &str) -> Result<Option<T>> {
    match load_raw(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON blob
pub fn save_json<T: Serialize>(key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    save_raw(key, &json)
}
