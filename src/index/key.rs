//! Ordered key types for secondary and compound indexes
//!
//! Every indexed attribute value is projected into an `IndexKey`.
//! Ordering is total and deterministic: Min < Bool < numbers < String < Max.
//!
//! `Int` and `Float` are one numeric domain and compare by value, so `150`
//! sorts between `50.5` and `175.5`. Integral floats are stored as `Int`,
//! which keeps `from_float(150.0) == from_int(150)`.
//!
//! `Min` and `Max` are sentinels. They express open range bounds and are
//! never stored as attribute values.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Bound;

/// Index key representing a projected attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    /// Sentinel below every real value ("negative infinity")
    Min,
    /// Boolean value (false < true)
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Non-integral float value (stored as bits for total ordering)
    Float(u64),
    /// String value
    String(String),
    /// Sentinel above every real value ("positive infinity")
    Max,
}

/// Canonical bits for every NaN so all NaNs compare equal.
const CANONICAL_NAN: u64 = 0x7ff8_0000_0000_0000;

/// 2^63: floats in `[-I64_BOUND, I64_BOUND)` truncate to an exact i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

impl IndexKey {
    /// Create a key from a boolean
    pub fn from_bool(v: bool) -> Self {
        IndexKey::Bool(v)
    }

    /// Create a key from an integer
    pub fn from_int(v: i64) -> Self {
        IndexKey::Int(v)
    }

    /// Create a key from a float
    ///
    /// Integral values that fit an i64 become `Int` (so `-0.0` is `Int(0)`).
    /// Everything else uses its bit representation for total ordering, with
    /// every NaN folded into one canonical NaN that sorts above `+inf`.
    pub fn from_float(v: f64) -> Self {
        if v.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&v) {
            return IndexKey::Int(v as i64);
        }
        let bits = if v.is_nan() { CANONICAL_NAN } else { v.to_bits() };
        // Negative: flip all bits. Positive: flip sign bit.
        let ordered = if (bits >> 63) == 1 {
            !bits
        } else {
            bits ^ (1 << 63)
        };
        IndexKey::Float(ordered)
    }

    /// Create a key from a string
    pub fn from_string(v: impl Into<String>) -> Self {
        IndexKey::String(v.into())
    }

    /// Create a key from a JSON value
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(IndexKey::from_bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(IndexKey::from_int(i))
                } else {
                    n.as_f64().map(IndexKey::from_float)
                }
            }
            serde_json::Value::String(s) => Some(IndexKey::from_string(s)),
            _ => None,
        }
    }

    /// Numeric value of an `Int` or `Float` key
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            IndexKey::Int(i) => Some(*i as f64),
            IndexKey::Float(ordered) => Some(decode_float(*ordered)),
            _ => None,
        }
    }

    /// Position of the value type in the cross-type ordering
    fn rank(&self) -> u8 {
        match self {
            IndexKey::Min => 0,
            IndexKey::Bool(_) => 1,
            IndexKey::Int(_) | IndexKey::Float(_) => 2,
            IndexKey::String(_) => 3,
            IndexKey::Max => 4,
        }
    }

    /// Returns true for `Min` and `Max`
    pub fn is_sentinel(&self) -> bool {
        matches!(self, IndexKey::Min | IndexKey::Max)
    }

    /// Short name of the value type, used in logs and errors
    pub fn type_name(&self) -> &'static str {
        match self {
            IndexKey::Min => "min",
            IndexKey::Bool(_) => "bool",
            IndexKey::Int(_) => "int",
            IndexKey::Float(_) => "float",
            IndexKey::String(_) => "string",
            IndexKey::Max => "max",
        }
    }
}

fn decode_float(ordered: u64) -> f64 {
    let bits = if (ordered >> 63) == 1 {
        ordered ^ (1 << 63)
    } else {
        !ordered
    };
    f64::from_bits(bits)
}

/// Exact comparison of an integer with a float.
///
/// Numerically equal values (only possible for hand-built `Float` keys)
/// order the `Int` first so `Ord` stays consistent with `Eq`.
fn cmp_int_float(int: i64, ordered: u64) -> Ordering {
    let float = decode_float(ordered);
    if float.is_nan() || float >= I64_BOUND {
        return Ordering::Less;
    }
    if float < -I64_BOUND {
        return Ordering::Greater;
    }
    let whole = float.trunc();
    match int.cmp(&(whole as i64)) {
        Ordering::Equal if float < whole => Ordering::Greater,
        Ordering::Equal => Ordering::Less,
        other => other,
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IndexKey::Bool(a), IndexKey::Bool(b)) => a.cmp(b),
            (IndexKey::Int(a), IndexKey::Int(b)) => a.cmp(b),
            (IndexKey::Float(a), IndexKey::Float(b)) => a.cmp(b),
            (IndexKey::Int(a), IndexKey::Float(b)) => cmp_int_float(*a, *b),
            (IndexKey::Float(a), IndexKey::Int(b)) => cmp_int_float(*b, *a).reverse(),
            (IndexKey::String(a), IndexKey::String(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for IndexKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKey::Min => write!(f, "-inf"),
            IndexKey::Bool(b) => write!(f, "{}", b),
            IndexKey::Int(i) => write!(f, "{}", i),
            IndexKey::Float(ordered) => write!(f, "{}", decode_float(*ordered)),
            IndexKey::String(s) => write!(f, "{:?}", s),
            IndexKey::Max => write!(f, "+inf"),
        }
    }
}

impl From<bool> for IndexKey {
    fn from(v: bool) -> Self {
        IndexKey::from_bool(v)
    }
}

impl From<i32> for IndexKey {
    fn from(v: i32) -> Self {
        IndexKey::from_int(i64::from(v))
    }
}

impl From<i64> for IndexKey {
    fn from(v: i64) -> Self {
        IndexKey::from_int(v)
    }
}

impl From<u32> for IndexKey {
    fn from(v: u32) -> Self {
        IndexKey::from_int(i64::from(v))
    }
}

impl From<f64> for IndexKey {
    fn from(v: f64) -> Self {
        IndexKey::from_float(v)
    }
}

impl From<&str> for IndexKey {
    fn from(v: &str) -> Self {
        IndexKey::from_string(v)
    }
}

impl From<String> for IndexKey {
    fn from(v: String) -> Self {
        IndexKey::String(v)
    }
}

/// Ordered pair of keys for two-attribute indexes.
///
/// Compares lexicographically: `first`, then `second`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompositeKey {
    pub first: IndexKey,
    pub second: IndexKey,
}

impl CompositeKey {
    pub fn new(first: IndexKey, second: IndexKey) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// One end of a range scan: a key plus an inclusivity flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBound {
    pub key: IndexKey,
    pub inclusive: bool,
}

impl KeyBound {
    pub fn included(key: impl Into<IndexKey>) -> Self {
        Self {
            key: key.into(),
            inclusive: true,
        }
    }

    pub fn excluded(key: impl Into<IndexKey>) -> Self {
        Self {
            key: key.into(),
            inclusive: false,
        }
    }

    /// Open lower bound
    pub fn unbounded_below() -> Self {
        Self::included(IndexKey::Min)
    }

    /// Open upper bound
    pub fn unbounded_above() -> Self {
        Self::included(IndexKey::Max)
    }

    pub(crate) fn as_bound(&self) -> Bound<&IndexKey> {
        if self.inclusive {
            Bound::Included(&self.key)
        } else {
            Bound::Excluded(&self.key)
        }
    }
}

/// Returns true when `[lower, upper]` (with the given inclusivity) selects nothing.
///
/// `lower > upper` is an empty range, not an error. BTreeMap::range panics on
/// inverted bounds, so every scan checks this first.
pub fn is_empty_range(lower: &KeyBound, upper: &KeyBound) -> bool {
    match lower.key.cmp(&upper.key) {
        Ordering::Greater => true,
        Ordering::Equal => !(lower.inclusive && upper.inclusive),
        Ordering::Less => false,
    }
}
