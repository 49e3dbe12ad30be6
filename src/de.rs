//! Lenient deserializers for fixed capacity fields
//!
//! Strings longer than their field are cut at a character boundary and
//! sequences longer than their vector keep only the head, both with a
//! warning instead of failing the whole document.

use core::fmt;
use core::marker::PhantomData;

use heapless::{String, Vec};
use serde::de::{self, Deserialize, Deserializer, IgnoredAny, SeqAccess, Visitor};

use crate::widget::truncated;

struct StringVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for StringVisitor<N> {
    type Value = String<N>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<String<N>, E> {
        Ok(truncated(value, "string field"))
    }
}

/// A string cut down to `N` bytes
pub(crate) fn string<'de, D, const N: usize>(deserializer: D) -> Result<String<N>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_str(StringVisitor::<N>)
}

struct OptionalStringVisitor<const N: usize>;

impl<'de, const N: usize> Visitor<'de> for OptionalStringVisitor<N> {
    type Value = Option<String<N>>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string or null")
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        string(deserializer).map(Some)
    }
}

/// Like [`string`], `null` gives `None`
pub(crate) fn optional_string<'de, D, const N: usize>(
    deserializer: D,
) -> Result<Option<String<N>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(OptionalStringVisitor::<N>)
}

struct CappedVisitor<T, const N: usize>(PhantomData<T>);

impl<'de, T, const N: usize> Visitor<'de> for CappedVisitor<T, N>
where
    T: Deserialize<'de>,
{
    type Value = (Vec<T, N>, usize);

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a sequence")
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::new();
        while !items.is_full() {
            match seq.next_element::<T>()? {
                // not full, cannot fail
                Some(item) => {
                    let _ = items.push(item);
                }
                None => return Ok((items, 0)),
            }
        }
        let mut dropped = 0;
        while seq.next_element::<IgnoredAny>()?.is_some() {
            dropped += 1;
        }
        Ok((items, dropped))
    }
}

/// The first `N` elements of a sequence and the number of elements dropped
pub(crate) fn capped_seq<'de, D, T, const N: usize>(
    deserializer: D,
) -> Result<(Vec<T, N>, usize), D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    deserializer.deserialize_seq(CappedVisitor::<T, N>(PhantomData))
}

/// The first `N` elements of a sequence, the rest is dropped with a warning
pub(crate) fn capped<'de, D, T, const N: usize>(deserializer: D) -> Result<Vec<T, N>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let (items, dropped) = capped_seq(deserializer)?;
    if dropped > 0 {
        log::warn!("kept the first {} entries, dropped {}", N, dropped);
    }
    Ok(items)
}
