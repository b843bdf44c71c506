//! YAML rule files describing sockets and tiles
//!
//! ```yaml
//! version: 1
//! sockets:
//!   - { id: a, type: symmetric }
//!   - { id: tab, type: asymmetric, counterpart: slot }
//! tiles:
//!   - id: 1
//!     sockets: { left: [a], up: [a], down: [tab], right: [slot] }
//!     prob_weight: 2.5
//!     allowed_rotations: [none, clockwise]
//! ```

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::Value;

use crate::algorithm::socket::Socket;
use crate::io::configuration::SUPPORTED_RULE_VERSIONS;
use crate::io::error::{GenerationError, Result, file_system, invalid_parameter};
use crate::spatial::direction::{DirectionMap, Rotation};
use crate::spatial::tiles::{SocketSets, TileDefinition};

/// Identifier written either as a YAML string or integer
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RawId {
    /// Numeric id such as `1`
    Integer(i64),
    /// Textual id such as `grass`
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum SocketDeclaration {
    Symmetric { id: RawId },
    Asymmetric { id: RawId, counterpart: RawId },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSocketSets {
    left: Vec<RawId>,
    up: Vec<RawId>,
    down: Vec<RawId>,
    right: Vec<RawId>,
}

// Keys beyond these are tolerated so rule files can carry extra tile metadata
#[derive(Debug, Deserialize)]
struct TileDeclaration {
    id: RawId,
    sockets: RawSocketSets,
    #[serde(default)]
    prob_weight: Option<f64>,
    #[serde(default)]
    allowed_rotations: Option<Vec<String>>,
}

// `version` is read by `check_version` before this is deserialized
#[derive(Debug, Deserialize)]
struct RuleDocument {
    sockets: Vec<SocketDeclaration>,
    tiles: Vec<TileDeclaration>,
}

/// Read the `version` key and reject unsupported schemas
///
/// # Errors
///
/// Returns an error if the version is missing or not supported
pub fn check_version(document: &Value) -> Result<u64> {
    let found = document.get("version").and_then(Value::as_u64);
    match found {
        Some(version) if SUPPORTED_RULE_VERSIONS.contains(&version) => Ok(version),
        _ => Err(GenerationError::UnsupportedVersion {
            found,
            supported: SUPPORTED_RULE_VERSIONS,
        }),
    }
}

/// Parse a YAML document after checking its schema version
///
/// # Errors
///
/// Returns an error if the text is not YAML, the version is unsupported, or
/// the document does not match `T`
pub fn parse_versioned<T: serde::de::DeserializeOwned>(text: &str, context: &str) -> Result<T> {
    let document: Value =
        serde_yaml::from_str(text).map_err(|source| GenerationError::MalformedRules {
            context: context.to_string(),
            source,
        })?;
    check_version(&document)?;
    serde_yaml::from_value(document).map_err(|source| GenerationError::MalformedRules {
        context: context.to_string(),
        source,
    })
}

/// Tile definitions loaded from a rule file
#[derive(Clone, Debug)]
pub struct RuleSet {
    definitions: Vec<TileDefinition>,
}

impl RuleSet {
    /// Parse rules from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The version is missing or unsupported
    /// - The document does not follow the rule schema
    /// - A socket label is declared twice or referenced without declaration
    /// - A rotation name is not one of `none`, `clockwise`, `half`, `anticlockwise`
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let document: RuleDocument = parse_versioned(text, "rule definitions")?;
        let sockets = load_sockets(document.sockets)?;
        let definitions = document
            .tiles
            .into_iter()
            .map(|tile| load_tile(tile, &sockets))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { definitions })
    }

    /// Read and parse a rule file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| file_system(path, "read rules", source))?;
        Self::from_yaml_str(&text)
    }

    /// Loaded definitions in file order
    pub fn definitions(&self) -> &[TileDefinition] {
        &self.definitions
    }

    /// Take ownership of the definitions
    pub fn into_definitions(self) -> Vec<TileDefinition> {
        self.definitions
    }
}

fn load_sockets(declarations: Vec<SocketDeclaration>) -> Result<HashMap<String, Socket>> {
    let mut sockets = HashMap::new();
    let mut declare = |label: &RawId, socket: Socket| {
        let label = label.to_string();
        if sockets.contains_key(&label) {
            return Err(GenerationError::DuplicateSocket { socket: label });
        }
        sockets.insert(label, socket);
        Ok(())
    };

    for declaration in declarations {
        match declaration {
            SocketDeclaration::Symmetric { id } => {
                declare(&id, Socket::symmetric(id.to_string()))?;
            }
            SocketDeclaration::Asymmetric { id, counterpart } => {
                let socket = Socket::asymmetric(id.to_string());
                declare(&counterpart, socket.counterpart())?;
                declare(&id, socket)?;
            }
        }
    }

    Ok(sockets)
}

fn load_tile(tile: TileDeclaration, sockets: &HashMap<String, Socket>) -> Result<TileDefinition> {
    let tile_id = tile.id.to_string();
    let resolve = |labels: &[RawId]| -> Result<BTreeSet<Socket>> {
        labels
            .iter()
            .map(|label| {
                sockets.get(&label.to_string()).cloned().ok_or_else(|| {
                    GenerationError::UndeclaredSocket {
                        tile: tile_id.clone(),
                        socket: label.to_string(),
                    }
                })
            })
            .collect()
    };

    let socket_sets: SocketSets = DirectionMap {
        left: resolve(&tile.sockets.left)?,
        up: resolve(&tile.sockets.up)?,
        down: resolve(&tile.sockets.down)?,
        right: resolve(&tile.sockets.right)?,
    };

    let mut definition = TileDefinition::new(tile_id.clone(), socket_sets);

    if let Some(weight) = tile.prob_weight {
        definition = definition.with_weight(weight);
    }

    if let Some(names) = tile.allowed_rotations {
        let rotations = names
            .iter()
            .map(|name| {
                Rotation::from_name(name).ok_or_else(|| {
                    invalid_parameter(
                        "allowed_rotations",
                        name,
                        &format!("tile '{tile_id}' lists an unknown rotation"),
                    )
                })
            })
            .collect::<Result<Vec<_>>>()?;
        definition = definition.with_rotations(rotations);
    }

    Ok(definition)
}
