//! Edge connectors and their compatibility predicate

use std::fmt;

/// Label identifying a family of sockets
pub type SocketId = String;

/// Connector kind, used to detect one id being declared with two kinds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SocketKind {
    /// Connects to an identical socket
    Symmetric,
    /// Connects only to its flipped counterpart
    Asymmetric,
}

impl fmt::Display for SocketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symmetric => f.write_str("symmetric"),
            Self::Asymmetric => f.write_str("asymmetric"),
        }
    }
}

/// A connector on one edge of a tile
///
/// Adjacent tiles may touch only if some socket on one facing edge is
/// [`compatible`](Self::compatible) with some socket on the other.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Socket {
    /// Matches any socket with the same id
    Symmetric(SocketId),
    /// Tab/slot connector: matches the same id with the opposite `flipped` flag
    Asymmetric {
        /// Shared id of the tab and slot pair
        id: SocketId,
        /// Which half of the pair this socket is
        flipped: bool,
    },
}

impl Socket {
    /// Symmetric socket with the given id
    pub fn symmetric(id: impl Into<SocketId>) -> Self {
        Self::Symmetric(id.into())
    }

    /// Unflipped half of an asymmetric pair
    pub fn asymmetric(id: impl Into<SocketId>) -> Self {
        Self::Asymmetric {
            id: id.into(),
            flipped: false,
        }
    }

    /// The other half of an asymmetric pair; symmetric sockets are returned unchanged
    #[must_use]
    pub fn counterpart(&self) -> Self {
        match self {
            Self::Symmetric(_) => self.clone(),
            Self::Asymmetric { id, flipped } => Self::Asymmetric {
                id: id.clone(),
                flipped: !flipped,
            },
        }
    }

    /// Id shared by every socket of this family
    pub fn id(&self) -> &str {
        match self {
            Self::Symmetric(id) | Self::Asymmetric { id, .. } => id,
        }
    }

    /// Kind of connector
    pub const fn kind(&self) -> SocketKind {
        match self {
            Self::Symmetric(_) => SocketKind::Symmetric,
            Self::Asymmetric { .. } => SocketKind::Asymmetric,
        }
    }

    /// Whether two facing sockets may touch
    ///
    /// Sockets of different kinds never match, even with equal ids; the
    /// catalog rejects such id reuse before any comparison happens.
    pub fn compatible(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Symmetric(a), Self::Symmetric(b)) => a == b,
            (
                Self::Asymmetric {
                    id: a,
                    flipped: flipped_a,
                },
                Self::Asymmetric {
                    id: b,
                    flipped: flipped_b,
                },
            ) => a == b && flipped_a != flipped_b,
            _ => false,
        }
    }
}

impl fmt::Display for Socket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Symmetric(id) => write!(f, "{id}"),
            Self::Asymmetric { id, flipped: false } => write!(f, "{id}+"),
            Self::Asymmetric { id, flipped: true } => write!(f, "{id}-"),
        }
    }
}
