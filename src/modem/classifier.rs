//! Response decoding and classification.
//!
//! The modem answers in loosely framed ASCII and the link reads whatever
//! happens to be buffered at each poll, so a response may be split across
//! reads or interleaved with unsolicited lines.  Classification is plain
//! substring matching on one decoded chunk at a time; it lives here so
//! the policy can be tested and changed apart from the polling loop.

/// Decode bytes as UTF-8, dropping invalid sequences instead of failing
/// or substituting replacement characters.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut rest = bytes;
    loop {
        match core::str::from_utf8(rest) {
            Ok(valid) => {
                out.push_str(valid);
                return out;
            }
            Err(e) => {
                let (valid, after) = rest.split_at(e.valid_up_to());
                // `valid_up_to` guarantees this prefix decodes.
                out.push_str(core::str::from_utf8(valid).unwrap_or_default());
                match e.error_len() {
                    Some(bad) => rest = &after[bad..],
                    // Truncated sequence at the end of the chunk.
                    None => return out,
                }
            }
        }
    }
}

/// Success markers for one step of the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseClassifier {
    markers: &'static [&'static str],
}

impl ResponseClassifier {
    /// Network join confirmed.
    pub const JOINED: Self = Self {
        markers: &["WIFI GOT IP", "OK"],
    };

    /// HTTP status line of an accepted upload.
    pub const HTTP_OK: Self = Self {
        markers: &["200 OK"],
    };

    pub const fn new(markers: &'static [&'static str]) -> Self {
        Self { markers }
    }

    /// The first marker found in `text`, if any.
    pub fn matched(&self, text: &str) -> Option<&'static str> {
        self.markers.iter().copied().find(|m| text.contains(m))
    }

    pub fn is_success(&self, text: &str) -> bool {
        self.matched(text).is_some()
    }
}
