use once_cell::sync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::info_log;

pub const EMBEDDED_WORDBANK: &str = include_str!("resources/words.txt");

const APP_DIR: &str = "wordle-game";
const WORDBANK_FILE: &str = "words.txt";

static SHARED: OnceCell<Arc<WordStore>> = OnceCell::new();

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read word list '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("word list contains no words")]
    Empty,
}

/// The loaded dictionary, indexed by word length.
///
/// Words are lowercase, trimmed and unique; order follows the source.
#[derive(Debug, Clone)]
pub struct WordStore {
    words: Vec<String>,
    by_length: HashMap<usize, Vec<String>>,
    lookup: HashSet<String>,
}

impl FromStr for WordStore {
    type Err = LoadError;

    /// Parses a newline-delimited word list.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Empty`] when nothing is left after dropping blank lines.
    fn from_str(data: &str) -> Result<Self, LoadError> {
        let mut words = Vec::new();
        let mut lookup = HashSet::new();
        for line in data.lines() {
            let word = line.trim().to_lowercase();
            if word.is_empty() || lookup.contains(&word) {
                continue;
            }
            lookup.insert(word.clone());
            words.push(word);
        }

        if words.is_empty() {
            return Err(LoadError::Empty);
        }

        let mut by_length: HashMap<usize, Vec<String>> = HashMap::new();
        for word in &words {
            by_length
                .entry(word.chars().count())
                .or_default()
                .push(word.clone());
        }

        Ok(Self {
            words,
            by_length,
            lookup,
        })
    }
}

impl WordStore {
    /// Reads and parses a word list file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, or
    /// [`LoadError::Empty`] if it holds no words.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store: Self = data.parse()?;
        info_log!("Loaded {} words from {}", store.len(), path.display());
        Ok(store)
    }

    /// The dictionary compiled into the binary.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded list is empty.
    pub fn embedded() -> Result<Self, LoadError> {
        EMBEDDED_WORDBANK.parse()
    }

    /// All words with exactly `length` characters, in source order.
    #[must_use]
    pub fn candidates_of_length(&self, length: usize) -> &[String] {
        self.by_length.get(&length).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.lookup.contains(word)
    }

    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Returns the process-wide word store, running `loader` on first use only.
///
/// # Errors
///
/// Propagates the loader's error; a failed load leaves the cache empty.
pub fn shared<F>(loader: F) -> Result<Arc<WordStore>, LoadError>
where
    F: FnOnce() -> Result<WordStore, LoadError>,
{
    SHARED
        .get_or_try_init(|| loader().map(Arc::new))
        .map(Arc::clone)
}

/// Location of a user-supplied word list, e.g. `~/.local/share/wordle-game/words.txt`.
#[must_use]
pub fn default_wordbank_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR).join(WORDBANK_FILE))
}

/// Loads the word list from `explicit`, else the user data directory, else the embedded list.
///
/// # Errors
///
/// An explicit path must be readable and non-empty. A broken file in the
/// data directory is reported as well rather than silently replaced.
pub fn load_wordbank(explicit: Option<&Path>) -> Result<WordStore, LoadError> {
    load_wordbank_from(explicit, default_wordbank_path().as_deref())
}

/// [`load_wordbank`] with the data-directory location supplied by the caller.
///
/// # Errors
///
/// Same as [`load_wordbank`].
pub fn load_wordbank_from(
    explicit: Option<&Path>,
    data_path: Option<&Path>,
) -> Result<WordStore, LoadError> {
    if let Some(path) = explicit {
        return WordStore::from_file(path);
    }
    if let Some(path) = data_path
        && path.is_file()
    {
        return WordStore::from_file(path);
    }
    info_log!("Using embedded word list");
    WordStore::embedded()
}
