//! Identifier management using string interning
//!
//! Shapes, connectors, ports and tool artifacts are all addressed by [`Id`].
//! Ids are cheap `Copy` handles into a global interner, so comparing them in
//! the linear scans done by connector sync costs a single integer compare.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Interned identifier
///
/// # Examples
///
/// ```
/// use ligature_core::identifier::Id;
///
/// let shape = Id::new("enzyme");
/// assert_eq!(shape, "enzyme");
///
/// let port = shape.with_suffix("top-left");
/// assert_eq!(port, "enzyme-top-left");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates an id of the form `{prefix}-{idx}`, used for generated objects.
    ///
    /// ```
    /// use ligature_core::identifier::Id;
    ///
    /// assert_eq!(Id::generated("connector", 3), "connector-3");
    /// ```
    pub fn generated(prefix: &str, idx: usize) -> Self {
        Self::new(&format!("{prefix}-{idx}"))
    }

    /// Creates the id `{self}-{suffix}`.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let mut interner = interner();
        let base = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        let name = format!("{base}-{suffix}");
        Self(interner.get_or_intern(&name))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        f.write_str(str_value)
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        interner.resolve(self.0) == Some(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::new(&value))
    }
}
