//! Cache Key Module
//!
//! Deterministic construction of cache keys from a resource prefix and a list
//! of optional parameters.

/// Separator placed between the prefix and each parameter.
pub const KEY_SEPARATOR: &str = "_";

// == Key Segment ==
/// One parameter of a cache key. Absent segments are dropped from the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySegment(Option<String>);

impl KeySegment {
    /// A segment that contributes nothing to the key.
    pub fn absent() -> Self {
        Self(None)
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }
}

macro_rules! impl_key_segment {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for KeySegment {
                fn from(value: $ty) -> Self {
                    Self(Some(value.to_string()))
                }
            }

            impl From<Option<$ty>> for KeySegment {
                fn from(value: Option<$ty>) -> Self {
                    Self(value.map(|v| v.to_string()))
                }
            }
        )*
    };
}

impl_key_segment!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, bool, char, String);

impl From<&str> for KeySegment {
    fn from(value: &str) -> Self {
        Self(Some(value.to_string()))
    }
}

impl From<Option<&str>> for KeySegment {
    fn from(value: Option<&str>) -> Self {
        Self(value.map(str::to_string))
    }
}

impl From<&String> for KeySegment {
    fn from(value: &String) -> Self {
        Self(Some(value.clone()))
    }
}

// == Create Key ==
/// Builds a key from `prefix` followed by every present segment, in order.
///
/// Absent segments are skipped entirely, so `("p", 1, None, "x")` and
/// `("p", 1, "x")` produce the same key. With no present segments the key is
/// the bare prefix. An empty prefix is accepted and yields keys such as `_1`.
pub fn create_key<I, S>(prefix: &str, segments: I) -> String
where
    I: IntoIterator<Item = S>,
    S: Into<KeySegment>,
{
    let params: Vec<String> = segments
        .into_iter()
        .filter_map(|segment| segment.into().0)
        .collect();

    if params.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}{KEY_SEPARATOR}{}", params.join(KEY_SEPARATOR))
    }
}

/// Builds a cache key from a prefix and heterogeneous parameters.
///
/// ```
/// use recaudo_gateway::cache_key;
///
/// let page: Option<u32> = None;
/// assert_eq!(cache_key!("convenios", 1, page, "x"), "convenios_1_x");
/// assert_eq!(cache_key!("tablas"), "tablas");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr) => {
        $crate::cache::create_key($prefix, ::std::iter::empty::<$crate::cache::KeySegment>())
    };
    ($prefix:expr, $($param:expr),+ $(,)?) => {
        $crate::cache::create_key(
            $prefix,
            [$($crate::cache::KeySegment::from($param)),+],
        )
    };
}
