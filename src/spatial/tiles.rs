//! Tile definitions and the oriented deployment catalog derived from them
//!
//! A [`TileDefinition`] is authored rule data. Building a [`TileCatalog`]
//! validates the definitions and expands each one into a [`TileDeployment`]
//! per allowed rotation. The catalog is an arena: grid cells refer to
//! deployments by index and never copy socket sets.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

use log::info;

use crate::algorithm::socket::{Socket, SocketKind};
use crate::io::error::{GenerationError, Result, invalid_parameter};
use crate::spatial::direction::{Direction, DirectionMap, Rotation};

/// Unique tile identifier, as written in rule files
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub String);

impl TileId {
    /// Borrow the textual id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TileId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u32> for TileId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Acceptable sockets on each edge of a tile
pub type SocketSets = DirectionMap<BTreeSet<Socket>>;

/// Declarative description of one tile
#[derive(Clone, Debug, PartialEq)]
pub struct TileDefinition {
    /// Unique identifier
    pub id: TileId,
    /// Sockets offered on each edge in the authored orientation
    pub socket_sets: SocketSets,
    /// Relative likelihood of being chosen on collapse
    pub weight: f64,
    /// Orientations this tile may be deployed in
    pub allowed_rotations: BTreeSet<Rotation>,
}

impl TileDefinition {
    /// Definition with weight 1 and no rotations besides the authored one
    pub fn new(id: impl Into<TileId>, socket_sets: SocketSets) -> Self {
        Self {
            id: id.into(),
            socket_sets,
            weight: 1.0,
            allowed_rotations: BTreeSet::from([Rotation::None]),
        }
    }

    /// Definition offering the same socket set on all four edges
    pub fn uniform(id: impl Into<TileId>, sockets: impl IntoIterator<Item = Socket>) -> Self {
        let sockets: BTreeSet<Socket> = sockets.into_iter().collect();
        Self::new(id, DirectionMap::from_fn(|_| sockets.clone()))
    }

    /// Replace the probability weight
    #[must_use]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Replace the allowed rotation set
    #[must_use]
    pub fn with_rotations(mut self, rotations: impl IntoIterator<Item = Rotation>) -> Self {
        self.allowed_rotations = rotations.into_iter().collect();
        self
    }

    /// Allow all four rotations
    #[must_use]
    pub fn rotatable(self) -> Self {
        self.with_rotations(Rotation::ALL)
    }

    fn validate(&self) -> Result<()> {
        for (direction, sockets) in self.socket_sets.iter() {
            if sockets.is_empty() {
                return Err(GenerationError::MissingDirection {
                    tile: self.id.to_string(),
                    direction,
                });
            }
        }

        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(invalid_parameter(
                "prob_weight",
                &self.weight,
                &format!("weight of tile '{}' must be finite and non-negative", self.id),
            ));
        }

        if self.allowed_rotations.is_empty() {
            return Err(invalid_parameter(
                "allowed_rotations",
                &"[]",
                &format!("tile '{}' must allow at least one rotation", self.id),
            ));
        }

        Ok(())
    }
}

/// One concrete oriented instance of a tile definition
#[derive(Clone, Debug, PartialEq)]
pub struct TileDeployment {
    /// Index of the originating definition in the catalog
    pub tile_index: usize,
    /// Orientation of this instance
    pub rotation: Rotation,
    /// Socket sets after applying `rotation`
    pub socket_sets: SocketSets,
}

impl TileDeployment {
    /// Derive the deployment of `definition` turned by `rotation`
    pub fn expand(tile_index: usize, definition: &TileDefinition, rotation: Rotation) -> Self {
        Self {
            tile_index,
            rotation,
            socket_sets: definition.socket_sets.rotated(rotation),
        }
    }

    /// Sockets offered on the edge facing `direction`
    pub fn facing(&self, direction: Direction) -> &BTreeSet<Socket> {
        self.socket_sets.get(direction)
    }
}

/// Immutable arena of all deployments for one generation run
#[derive(Clone, Debug)]
pub struct TileCatalog {
    definitions: Vec<TileDefinition>,
    deployments: Vec<TileDeployment>,
}

impl TileCatalog {
    /// Validate definitions and expand them into deployments
    ///
    /// Deployments are ordered by definition, then by rotation in
    /// [`Rotation::ALL`] order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No definitions are given
    /// - Two definitions share an id
    /// - A definition has an edge without sockets, an invalid weight or no rotations
    /// - One socket id is used with both socket kinds
    pub fn build(definitions: Vec<TileDefinition>) -> Result<Self> {
        if definitions.is_empty() {
            return Err(GenerationError::EmptyCatalog);
        }

        check_definitions(&definitions)?;

        let deployments: Vec<TileDeployment> = definitions
            .iter()
            .enumerate()
            .flat_map(|(tile_index, definition)| {
                definition
                    .allowed_rotations
                    .iter()
                    .map(move |&rotation| TileDeployment::expand(tile_index, definition, rotation))
            })
            .collect();

        info!(
            "Built tile catalog: {} definitions expanded to {} deployments",
            definitions.len(),
            deployments.len()
        );

        Ok(Self {
            definitions,
            deployments,
        })
    }

    /// Number of deployments in the arena
    pub fn len(&self) -> usize {
        self.deployments.len()
    }

    /// Whether the arena is empty (never true for a built catalog)
    pub fn is_empty(&self) -> bool {
        self.deployments.is_empty()
    }

    /// Deployment at `index`
    pub fn deployment(&self, index: usize) -> Option<&TileDeployment> {
        self.deployments.get(index)
    }

    /// All deployments in arena order
    pub fn deployments(&self) -> &[TileDeployment] {
        &self.deployments
    }

    /// All definitions in authored order
    pub fn definitions(&self) -> &[TileDefinition] {
        &self.definitions
    }

    /// Definition with the given index
    pub fn definition(&self, tile_index: usize) -> Option<&TileDefinition> {
        self.definitions.get(tile_index)
    }

    /// Id and rotation of the deployment at `index`
    pub fn describe(&self, index: usize) -> Option<(&TileId, Rotation)> {
        let deployment = self.deployments.get(index)?;
        let definition = self.definitions.get(deployment.tile_index)?;
        Some((&definition.id, deployment.rotation))
    }
}

/// Reject repeated ids, malformed definitions and socket ids reused across kinds
fn check_definitions(definitions: &[TileDefinition]) -> Result<()> {
    let mut seen_ids = HashSet::new();
    let mut socket_kinds: HashMap<&str, SocketKind> = HashMap::new();

    for definition in definitions {
        if !seen_ids.insert(&definition.id) {
            return Err(GenerationError::DuplicateTile {
                tile: definition.id.to_string(),
            });
        }

        definition.validate()?;

        for (_, sockets) in definition.socket_sets.iter() {
            for socket in sockets {
                let kind = socket.kind();
                let first = *socket_kinds.entry(socket.id()).or_insert(kind);
                if first != kind {
                    return Err(GenerationError::InconsistentSocketKind {
                        socket: socket.id().to_string(),
                        first,
                        second: kind,
                    });
                }
            }
        }
    }

    Ok(())
}
