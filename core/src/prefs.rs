use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// String key/value storage that outlives a game, such as browser local storage.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> Option<String>;

    /// Best effort, implementations log failures instead of returning them.
    fn write(&mut self, key: &str, value: &str);
}

/// A value persisted under a fixed key. Absent or malformed values load as
/// the default.
pub trait StorageKey: Sized + Default {
    const KEY: &'static str;

    fn decode(raw: &str) -> Option<Self>;

    fn encode(&self) -> String;

    fn load_or_default<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        match store.read(Self::KEY) {
            Some(raw) => Self::decode(&raw).unwrap_or_else(|| {
                log::warn!("ignoring malformed {}: {:?}", Self::KEY, raw);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        store.write(Self::KEY, &self.encode());
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub const fn scheme(self) -> &'static str {
        use Theme::*;
        match self {
            Light => "light",
            Dark => "dark",
        }
    }

    pub const fn toggled(self) -> Self {
        use Theme::*;
        match self {
            Light => Dark,
            Dark => Light,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::Light
    }
}

impl StorageKey for Theme {
    const KEY: &'static str = "garden:theme";

    fn decode(raw: &str) -> Option<Self> {
        match raw.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    fn encode(&self) -> String {
        self.scheme().to_string()
    }
}

/// Best score of any finished game.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct HighScore(pub u32);

impl HighScore {
    /// Keeps `score` if it beats the current best, returning whether it did.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.0 {
            log::debug!("new high score {} (was {})", score, self.0);
            self.0 = score;
            true
        } else {
            false
        }
    }
}

impl StorageKey for HighScore {
    const KEY: &'static str = "garden:high-score";

    fn decode(raw: &str) -> Option<Self> {
        raw.trim().parse().ok().map(Self)
    }

    fn encode(&self) -> String {
        self.0.to_string()
    }
}

/// Everything kept between sessions.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Preferences {
    pub theme: Theme,
    pub high_score: HighScore,
}

impl Preferences {
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        Self {
            theme: Theme::load_or_default(store),
            high_score: HighScore::load_or_default(store),
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) {
        self.theme.save(store);
        self.high_score.save(store);
    }

    /// Records the score of a finished game, saving only if it is a new best.
    pub fn finish_game<S: KeyValueStore + ?Sized>(&mut self, score: u32, store: &mut S) -> bool {
        let improved = self.high_score.record(score);
        if improved {
            self.high_score.save(store);
        }
        improved
    }
}

/// In-memory store for native hosts and tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore(BTreeMap<String, String>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.0.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }
}
