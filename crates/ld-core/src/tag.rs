use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Global string interner for element tags. Documents repeat a handful of
/// tags many times over, and every render copies them again.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::default);

/// Tag used when an element record carries an empty tag.
pub const DEFAULT_TAG: &str = "div";

/// An interned element tag (`gds-flex`, `gds-button`, `div`, ...).
/// 4 bytes, Copy, Eq, Hash in O(1).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(Spur);

impl Tag {
    /// Intern a tag name, or return the existing handle.
    pub fn intern(s: &str) -> Self {
        Tag(INTERNER.get_or_intern(s))
    }

    /// Intern a tag name, substituting [`DEFAULT_TAG`] for an empty one.
    pub fn intern_or_default(s: &str) -> Self {
        if s.is_empty() {
            Self::intern(DEFAULT_TAG)
        } else {
            Self::intern(s)
        }
    }

    /// Resolve back to a string slice.
    pub fn as_str(&self) -> &'static str {
        INTERNER.resolve(&self.0)
    }
}

impl Default for Tag {
    fn default() -> Self {
        Self::intern(DEFAULT_TAG)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.as_str())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Tag::intern_or_default(&s))
    }
}
