//! Message payloads carried by a channel.

/// A single message: either an opaque byte sequence or a UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Payload {
    /// Opaque binary data.
    Binary(Vec<u8>),

    /// UTF-8 text.
    Text(String),
}

impl Payload {
    /// Returns true for the `Binary` variant.
    pub fn is_binary(&self) -> bool {
        matches!(self, Payload::Binary(_))
    }

    /// Returns true for the `Text` variant.
    pub fn is_text(&self) -> bool {
        matches!(self, Payload::Text(_))
    }

    /// Returns the bytes of a `Binary` payload.
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Payload::Binary(data) => Some(data),
            Payload::Text(_) => None,
        }
    }

    /// Returns the string of a `Text` payload.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Binary(_) => None,
            Payload::Text(text) => Some(text),
        }
    }

    /// Raw bytes of either variant.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Binary(data) => data,
            Payload::Text(text) => text.as_bytes(),
        }
    }

    /// Size of the payload in bytes.
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// Returns true if the payload carries no bytes.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<u8>> for Payload {
    fn from(data: Vec<u8>) -> Self {
        Payload::Binary(data)
    }
}

impl From<&[u8]> for Payload {
    fn from(data: &[u8]) -> Self {
        Payload::Binary(data.to_vec())
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_owned())
    }
}
