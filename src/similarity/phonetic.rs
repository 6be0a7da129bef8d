//! Phonetic signatures for names
//!
//! Soundex, Metaphone and NYSIIS codes are kept side by side; each family
//! collapses a different class of homophones.

use rphonetic::{Encoder, Metaphone, Nysiis, Soundex};
use serde::{Deserialize, Serialize};

/// Metaphone code length cap. rphonetic defaults to 4, which makes long
/// names that share their first four consonant sounds indistinguishable.
const METAPHONE_MAX_LEN: usize = 32;

/// Phonetic codes for one name. Every field is empty when the input
/// contains no ASCII letters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneticCode {
    pub soundex: String,
    pub metaphone: String,
    pub nysiis: String,
}

impl PhoneticCode {
    /// The sentinel produced for input without letters
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.soundex.is_empty() && self.metaphone.is_empty() && self.nysiis.is_empty()
    }
}

/// Stateless encoder producing [`PhoneticCode`]s
#[derive(Debug)]
pub struct PhoneticEncoder {
    soundex: Soundex,
    metaphone: Metaphone,
    nysiis: Nysiis,
}

impl Default for PhoneticEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PhoneticEncoder {
    pub fn new() -> Self {
        Self {
            soundex: Soundex::default(),
            metaphone: Metaphone::new(METAPHONE_MAX_LEN),
            nysiis: Nysiis::default(),
        }
    }

    /// Encode a name into all three code families
    pub fn encode(&self, name: &str) -> PhoneticCode {
        let letters = ascii_letters(name);
        if letters.is_empty() {
            return PhoneticCode::empty();
        }

        PhoneticCode {
            soundex: self.soundex.encode(&letters),
            metaphone: self.metaphone.encode(&letters),
            nysiis: self.nysiis.encode(&letters),
        }
    }

    pub fn soundex(&self, name: &str) -> String {
        let letters = ascii_letters(name);
        if letters.is_empty() {
            return String::new();
        }
        self.soundex.encode(&letters)
    }

    pub fn metaphone(&self, name: &str) -> String {
        let letters = ascii_letters(name);
        if letters.is_empty() {
            return String::new();
        }
        self.metaphone.encode(&letters)
    }

    pub fn nysiis(&self, name: &str) -> String {
        let letters = ascii_letters(name);
        if letters.is_empty() {
            return String::new();
        }
        self.nysiis.encode(&letters)
    }
}

/// Lowercase ASCII letters of `s`, everything else dropped
fn ascii_letters(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
