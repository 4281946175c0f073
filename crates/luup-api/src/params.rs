// Luup query parameters
//
// The canonical parameter vocabulary, case-insensitive key translation, and
// the ordered parameter map every request is assembled from. Nothing in here
// touches the network.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use indexmap::map::Iter as MapIter;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};
use url::Url;

use crate::error::Error;

/// RFC 3986 unreserved characters pass through, everything else is escaped.
/// Spaces become `%20`, never `+`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

// ── Vocabulary ──────────────────────────────────────────────────────

/// Query keys the Luup server recognizes, spelled the way it expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum ParamName {
    #[strum(serialize = "action")]
    Action,
    /// The plain `device` key. Not an alias of [`ParamName::DeviceNum`].
    #[strum(serialize = "device")]
    Device,
    #[strum(serialize = "DeviceNum")]
    DeviceNum,
    #[strum(serialize = "id")]
    Id,
    #[strum(serialize = "name")]
    Name,
    #[strum(serialize = "output_format")]
    OutputFormat,
    #[strum(serialize = "room")]
    Room,
    #[strum(serialize = "scene")]
    Scene,
    #[strum(serialize = "SceneNum")]
    SceneNum,
    #[strum(serialize = "serviceId")]
    ServiceId,
    #[strum(serialize = "UDN")]
    Udn,
    #[strum(serialize = "Value")]
    Value,
    #[strum(serialize = "Variable")]
    Variable,
    #[strum(serialize = "Code")]
    Code,
    #[strum(serialize = "LoadTime")]
    LoadTime,
    #[strum(serialize = "DataVersion")]
    DataVersion,
    #[strum(serialize = "timeout")]
    Timeout,
    #[strum(serialize = "minimumdelay")]
    MinimumDelay,
}

/// Lowercased canonical name -> canonical name. First entry wins on a fold collision.
static BY_FOLDED_NAME: LazyLock<HashMap<String, ParamName>> = LazyLock::new(|| {
    let mut table = HashMap::new();
    for name in ParamName::iter() {
        table.entry(name.as_str().to_lowercase()).or_insert(name);
    }
    table
});

impl ParamName {
    /// Canonical spelling, e.g. `DeviceNum`.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Case-insensitive lookup in the vocabulary.
    pub fn lookup(key: &str) -> Option<Self> {
        BY_FOLDED_NAME.get(&key.to_lowercase()).copied()
    }
}

impl fmt::Display for ParamName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ParamName> for Cow<'static, str> {
    fn from(name: ParamName) -> Self {
        Cow::Borrowed(name.as_str())
    }
}

/// Map a caller-supplied key onto its canonical spelling.
///
/// Keys outside the vocabulary come back unchanged, so parameters this crate
/// doesn't know about (`newTargetValue`, `seconds`, ...) still reach the server.
pub fn translate_param_name(from: &str) -> Cow<'_, str> {
    match ParamName::lookup(from) {
        Some(name) => Cow::Borrowed(name.as_str()),
        None => Cow::Borrowed(from),
    }
}

// ── Values ──────────────────────────────────────────────────────────

/// A single query value. Absent values are simply not inserted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
}

impl ParamValue {
    /// Empty or whitespace-only text. Integers are never blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Integer(_) => false,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for ParamValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for ParamValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for ParamValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u16> for ParamValue {
    fn from(n: u16) -> Self {
        Self::Integer(i64::from(n))
    }
}

// ── Parameter map ───────────────────────────────────────────────────

type Key = Cow<'static, str>;

/// Insertion-ordered query parameters.
///
/// Re-inserting an existing key replaces its value but keeps its position.
/// Equality ignores order. `translated` and `merged` always build a new map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(IndexMap<Key, ParamValue>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<Key>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder-style insert that skips `None`.
    pub fn with_opt<V: Into<ParamValue>>(self, key: impl Into<Key>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub fn insert(&mut self, key: impl Into<Key>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Exact-key lookup (no case folding).
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_ref(), v))
    }

    /// Default parameters carried in a URL's query string.
    pub fn from_url_query(url: &Url) -> Self {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    /// Copy with every key run through [`translate_param_name`].
    ///
    /// When two keys fold onto the same canonical name the later value wins.
    pub fn translated(&self) -> Self {
        self.0
            .iter()
            .map(|(key, value)| {
                let key: Key = match ParamName::lookup(key) {
                    Some(name) => name.into(),
                    None => key.clone(),
                };
                (key, value.clone())
            })
            .collect()
    }

    /// Copy of `self` overlaid with `overrides`, key for key.
    pub fn merged(&self, overrides: &Params) -> Self {
        let mut out = self.clone();
        out.0
            .extend(overrides.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        out
    }

    /// `ids` first, then `self` translated; `ids` win every conflict.
    pub(crate) fn bound_to(&self, ids: &Params) -> Self {
        ids.merged(&self.translated()).merged(ids)
    }

    /// The value under `name`, or `MissingArgument` if it is absent or blank.
    pub fn require(&self, name: ParamName) -> Result<&ParamValue, Error> {
        self.get(name.as_str())
            .filter(|v| !v.is_blank())
            .ok_or(Error::MissingArgument {
                name: name.as_str(),
            })
    }

    /// `k=v&k=v` with both sides percent-encoded.
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, QUERY_COMPONENT),
                    utf8_percent_encode(&v.to_string(), QUERY_COMPONENT)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<Key>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K, V> Extend<(K, V)> for Params
where
    K: Into<Key>,
    V: Into<ParamValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a Key, &'a ParamValue);
    type IntoIter = MapIter<'a, Key, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Names given to create/rename/save operations must have visible content.
/// Inner whitespace is fine: "Kitchen Light" is a valid name.
pub(crate) fn require_name(arg: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::blank_name(arg));
    }
    Ok(())
}
