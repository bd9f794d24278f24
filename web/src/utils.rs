use garden_core::KeyValueStore;
use gloo::storage::{LocalStorage, Storage};

/// Browser local storage. Writes are fire-and-forget, failures only get logged.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub(crate) struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn read(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::error!("failed to read {}: {:?}", key, err);
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(err) = LocalStorage::raw().set_item(key, value) {
            log::error!("failed to store {}: {:?}", key, err);
        }
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use garden_core::{HighScore, StorageKey};
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn high_score_survives_local_storage() {
        HighScore(120).save(&mut BrowserStorage);

        assert_eq!(
            LocalStorage::raw().get_item(HighScore::KEY).unwrap().as_deref(),
            Some("120")
        );
        assert_eq!(HighScore::load_or_default(&BrowserStorage), HighScore(120));
    }

    #[wasm_bindgen_test]
    fn malformed_high_score_loads_as_default() {
        BrowserStorage.write(HighScore::KEY, "lots");

        assert_eq!(HighScore::load_or_default(&BrowserStorage), HighScore::default());
    }

    #[wasm_bindgen_test]
    fn missing_key_reads_as_none() {
        LocalStorage::delete("garden:missing");

        assert_eq!(BrowserStorage.read("garden:missing"), None);
    }
}
