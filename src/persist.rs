// rill - Persisted form for finite streams
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Size-prefixed persisted form for finite streams.
//!
//! A non-empty stream is written as an explicit element count followed
//! by its fully-forced elements in order; the empty stream has its own
//! distinct envelope. On the way back in, a count below one is treated
//! as a corrupt or hostile payload and rejected with
//! [`Error::InvalidPersistedForm`] - it is never a valid spelling of the
//! empty stream. Suspended tail computations are never part of a
//! payload: encoding forces the stream down to plain values first, and
//! [`Lazy`](crate::lazy::Lazy) refuses direct serialization outright.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::stream::Stream;

/// Wire envelope: `{"form":"empty"}` or
/// `{"form":"elements","len":N,"elements":[...]}`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
enum Persisted<T> {
    Empty,
    Elements { len: i64, elements: Vec<T> },
}

/// Encode a finite stream, forcing it completely.
///
/// # Errors
///
/// [`Error::Malformed`] if the underlying encoder fails.
pub fn encode<T: Clone + Serialize>(stream: &Stream<T>) -> Result<String> {
    let form = if stream.is_empty() {
        Persisted::Empty
    } else {
        let elements: Vec<T> = stream.iter().collect();
        Persisted::Elements {
            len: elements.len() as i64,
            elements,
        }
    };
    serde_json::to_string(&form).map_err(|e| Error::Malformed(e.to_string()))
}

/// Decode a stream persisted by [`encode`].
///
/// # Errors
///
/// [`Error::InvalidPersistedForm`] if the payload's element count is
/// below one or disagrees with the number of elements present;
/// [`Error::Malformed`] if the payload is not a persisted stream at all.
pub fn decode<T: DeserializeOwned>(payload: &str) -> Result<Stream<T>> {
    let form: Persisted<T> =
        serde_json::from_str(payload).map_err(|e| Error::Malformed(e.to_string()))?;
    match form {
        Persisted::Empty => Ok(Stream::empty()),
        Persisted::Elements { len, elements } => {
            if len < 1 || len as usize != elements.len() {
                return Err(Error::invalid_form(len));
            }
            Ok(Stream::of(elements))
        }
    }
}
