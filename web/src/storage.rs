use geocoin_core::{GameError, KeyValueStore, Result};
use gloo::storage::{LocalStorage, Storage};
use wasm_bindgen::JsValue;

/// Session store backed by the browser's `localStorage`.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct LocalStorageStore;

fn storage_error(err: JsValue) -> GameError {
    GameError::Storage(format!("{:?}", err))
}

impl KeyValueStore for LocalStorageStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        LocalStorage::raw().get_item(key).map_err(storage_error)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        LocalStorage::raw().set_item(key, value).map_err(storage_error)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        LocalStorage::delete(key);
        Ok(())
    }
}
