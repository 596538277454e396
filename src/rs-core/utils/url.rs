use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes kept as is in a query value: the RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Abstraction allowing to help with the handling of URLs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Url {
    inner: String,
}

impl Url {
    pub fn new(url: String) -> Self {
        Self { inner: url }
    }

    pub fn take(self) -> String {
        self.inner
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &str {
        self.inner.as_str()
    }

    /// Returns the percent-decoded value of the first query parameter called `name`,
    /// if one.
    pub fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        self.query()?.split('&').find_map(|pair| {
            let mut split = pair.splitn(2, '=');
            let key = percent_decode_str(split.next()?).decode_utf8_lossy();
            if key == name {
                Some(percent_decode_str(split.next().unwrap_or("")).decode_utf8_lossy())
            } else {
                None
            }
        })
    }

    /// Returns a new `Url` with the `name` query parameter appended to it.
    ///
    /// The value is percent-encoded and any fragment is kept at the end of the URL.
    pub fn with_query_param(&self, name: &str, value: &str) -> Url {
        let (base, fragment) = match self.inner.find('#') {
            Some(idx) => (&self.inner[..idx], &self.inner[idx..]),
            None => (self.inner.as_str(), ""),
        };
        let separator = if !base.contains('?') {
            "?"
        } else if base.ends_with('?') || base.ends_with('&') {
            ""
        } else {
            "&"
        };
        Url {
            inner: format!(
                "{}{}{}={}{}",
                base,
                separator,
                name,
                utf8_percent_encode(value, QUERY_VALUE),
                fragment
            ),
        }
    }

    fn query(&self) -> Option<&str> {
        let without_fragment = match self.inner.find('#') {
            Some(idx) => &self.inner[..idx],
            None => &self.inner,
        };
        let query_idx = without_fragment.find('?')?;
        Some(&without_fragment[query_idx + 1..])
    }
}
