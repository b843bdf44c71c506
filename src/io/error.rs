//! Error types for rule loading, catalog construction and rendering

use std::fmt;
use std::path::PathBuf;

use crate::algorithm::socket::SocketKind;
use crate::spatial::direction::Direction;

/// Main error type for all generation operations
///
/// Contradictions reached during propagation are not errors; they surface as
/// invalid cells in a [`Snapshot`](crate::spatial::grid::Snapshot).
#[derive(Debug)]
pub enum GenerationError {
    /// Rule or graphics file declares a schema version this build cannot read
    UnsupportedVersion {
        /// Version found in the file, if any
        found: Option<u64>,
        /// Versions this build understands
        supported: &'static [u64],
    },

    /// Rule or graphics file does not match the expected schema
    MalformedRules {
        /// What was being parsed
        context: String,
        /// Underlying YAML error
        source: serde_yaml::Error,
    },

    /// A tile references a socket label that no declaration introduced
    UndeclaredSocket {
        /// Tile whose definition holds the reference
        tile: String,
        /// Label that was not declared
        socket: String,
    },

    /// The same socket label is declared more than once
    DuplicateSocket {
        /// Label declared twice
        socket: String,
    },

    /// One socket id is used both as symmetric and asymmetric
    InconsistentSocketKind {
        /// The socket id in conflict
        socket: String,
        /// Kind seen first
        first: SocketKind,
        /// Conflicting kind seen later
        second: SocketKind,
    },

    /// Two tile definitions share an id
    DuplicateTile {
        /// The repeated id
        tile: String,
    },

    /// A tile definition declares no sockets for one of its edges
    MissingDirection {
        /// Tile with the missing edge
        tile: String,
        /// Edge without sockets
        direction: Direction,
    },

    /// No tile definitions were supplied
    EmptyCatalog,

    /// A superposition was constructed without candidates
    EmptySuperposition,

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Coordinate outside the grid
    InvalidCoordinate {
        /// Requested `[row, col]`
        coordinate: [usize; 2],
        /// Grid side length
        size: usize,
    },

    /// Internal operation invoked on a cell in the wrong state
    Precondition {
        /// Operation that was attempted
        operation: &'static str,
        /// Description of the violated precondition
        reason: String,
    },

    /// A collapsed tile has no image in the atlas
    UnknownTileGraphic {
        /// Tile lacking an image
        tile: String,
    },

    /// Failed to load a tile image from filesystem
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to save a rendered image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedVersion { found, supported } => match found {
                Some(version) => write!(
                    f,
                    "Unsupported file version {version} (supported versions are {supported:?})"
                ),
                None => write!(
                    f,
                    "Missing file version (supported versions are {supported:?})"
                ),
            },
            Self::MalformedRules { context, source } => {
                write!(f, "Failed to parse {context}: {source}")
            }
            Self::UndeclaredSocket { tile, socket } => {
                write!(f, "Tile '{tile}' references undeclared socket '{socket}'")
            }
            Self::DuplicateSocket { socket } => {
                write!(f, "Socket '{socket}' is declared more than once")
            }
            Self::InconsistentSocketKind {
                socket,
                first,
                second,
            } => {
                write!(
                    f,
                    "Socket ID '{socket}' has inconsistent socket types ({first} and {second})"
                )
            }
            Self::DuplicateTile { tile } => {
                write!(f, "Tile ID '{tile}' is defined more than once")
            }
            Self::MissingDirection { tile, direction } => {
                write!(f, "Tile '{tile}' declares no sockets facing {direction}")
            }
            Self::EmptyCatalog => write!(f, "No tile definitions supplied"),
            Self::EmptySuperposition => {
                write!(f, "Cannot create a superposition without candidates")
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::InvalidCoordinate { coordinate, size } => {
                write!(
                    f,
                    "Coordinate ({}, {}) is outside the {size}x{size} grid",
                    coordinate[0], coordinate[1]
                )
            }
            Self::Precondition { operation, reason } => {
                write!(f, "Precondition violated in {operation}: {reason}")
            }
            Self::UnknownTileGraphic { tile } => {
                write!(f, "No graphic registered for tile '{tile}'")
            }
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for GenerationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::MalformedRules { source, .. } => Some(source),
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for generation results
pub type Result<T> = std::result::Result<T, GenerationError>;

impl From<image::ImageError> for GenerationError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageLoad {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

impl From<std::io::Error> for GenerationError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("<unknown>"),
            operation: "unknown",
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for GenerationError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::MalformedRules {
            context: "YAML document".to_string(),
            source: err,
        }
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> GenerationError {
    GenerationError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Create a precondition error
pub fn precondition(operation: &'static str, reason: &impl ToString) -> GenerationError {
    GenerationError::Precondition {
        operation,
        reason: reason.to_string(),
    }
}

/// Create a file system error carrying the offending path
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
    source: std::io::Error,
) -> GenerationError {
    GenerationError::FileSystem {
        path: path.into(),
        operation,
        source,
    }
}
