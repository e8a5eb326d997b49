//! Types produced by the recognizer.

use std::fmt;

/// Family of identifier formats the recognizer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IdKind {
    /// Studio prefix plus serial, e.g. `ABC-123`.
    Censored,
    /// FC2 content market, e.g. `FC2-1234567`.
    Fc2,
    /// HEYZO, e.g. `HEYZO-1234`.
    Heyzo,
    /// Caribbeancom date serial, e.g. `123456-789`.
    Caribbean,
    /// 1Pondo date serial, e.g. `123456_789`.
    OnePondo,
    /// Tokyo-Hot, e.g. `N1234`.
    TokyoHot,
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Censored => "censored",
            Self::Fc2 => "fc2",
            Self::Heyzo => "heyzo",
            Self::Caribbean => "caribbean",
            Self::OnePondo => "1pondo",
            Self::TokyoHot => "tokyo-hot",
        };
        f.write_str(s)
    }
}

/// A canonical identifier recognized in free text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Identifier {
    /// Canonical form used as the provider search key.
    pub id: String,
    /// Which identifier family matched.
    pub kind: IdKind,
    /// The slice of the cleaned input that produced the match.
    pub matched: String,
}

impl Identifier {
    pub(crate) fn new(id: impl Into<String>, kind: IdKind, matched: &str) -> Self {
        Self {
            id: id.into(),
            kind,
            matched: matched.to_string(),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
