//! Per-cell candidate sets with entropy, weighted collapse and neighbor propagation

use std::collections::BTreeSet;

use rand::Rng;

use crate::algorithm::bitset::CandidateSet;
use crate::algorithm::socket::Socket;
use crate::io::error::{GenerationError, Result, precondition};
use crate::math::probability::{uniform_choice, weighted_choice};
use crate::spatial::direction::Direction;
use crate::spatial::tiles::TileCatalog;

/// Resolution state of a single cell
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellStatus {
    /// No candidates remain (contradiction)
    Invalid,
    /// Exactly one candidate remains
    Collapsed,
    /// More than one candidate remains
    Superposed,
}

/// Remaining candidate deployments for one grid cell
///
/// Candidates only ever shrink. Deployment data lives in the shared
/// [`TileCatalog`]; the cell stores indices only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Superposition {
    candidates: CandidateSet,
}

impl Superposition {
    /// Cell seeded with every deployment of `catalog`
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog has no deployments
    pub fn full(catalog: &TileCatalog) -> Result<Self> {
        Self::from_candidates(CandidateSet::all(catalog.len()))
    }

    /// Cell seeded with an explicit candidate set
    ///
    /// # Errors
    ///
    /// Returns an error if `candidates` is empty
    pub fn from_candidates(candidates: CandidateSet) -> Result<Self> {
        if candidates.is_empty() {
            return Err(GenerationError::EmptySuperposition);
        }
        Ok(Self { candidates })
    }

    /// Remaining candidate count, used as selection priority
    ///
    /// A plain count, not a weighted Shannon entropy: authored probability
    /// weights do not affect cell ordering.
    pub fn entropy(&self) -> usize {
        self.candidates.count()
    }

    /// Current resolution state
    pub fn status(&self) -> CellStatus {
        match self.candidates.count() {
            0 => CellStatus::Invalid,
            1 => CellStatus::Collapsed,
            _ => CellStatus::Superposed,
        }
    }

    /// At least one candidate remains
    pub fn is_valid(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// Exactly one candidate remains
    pub fn is_collapsed(&self) -> bool {
        self.status() == CellStatus::Collapsed
    }

    /// Remaining candidates
    pub const fn candidates(&self) -> &CandidateSet {
        &self.candidates
    }

    /// Deployment index of a collapsed cell
    ///
    /// # Errors
    ///
    /// Returns an error if the cell is invalid or still superposed
    pub fn collapsed_deployment(&self) -> Result<usize> {
        let mut members = self.candidates.iter();
        match (members.next(), members.next()) {
            (Some(index), None) => Ok(index),
            _ => Err(precondition(
                "collapsed_deployment",
                &format!("cell holds {} candidates", self.entropy()),
            )),
        }
    }

    /// Resolve to a single candidate
    ///
    /// Candidates are grouped by originating tile; a group is picked by the
    /// tile's weight and a member of the group uniformly. Returns the chosen
    /// deployment index.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two candidates remain
    pub fn collapse<R: Rng>(&mut self, catalog: &TileCatalog, rng: &mut R) -> Result<usize> {
        if self.entropy() < 2 {
            return Err(precondition(
                "collapse",
                &format!("cannot collapse a cell holding {} candidates", self.entropy()),
            ));
        }

        // Candidates iterate in arena order, which keeps a tile's rotations adjacent
        let mut groups: Vec<(usize, Vec<usize>)> = Vec::new();
        for index in self.candidates.iter() {
            let tile_index = catalog
                .deployment(index)
                .map(|deployment| deployment.tile_index)
                .ok_or_else(|| {
                    precondition("collapse", &format!("unknown deployment index {index}"))
                })?;
            match groups.last_mut() {
                Some((last_tile, members)) if *last_tile == tile_index => members.push(index),
                _ => groups.push((tile_index, vec![index])),
            }
        }

        let weights: Vec<f64> = groups
            .iter()
            .map(|(tile_index, _)| {
                catalog
                    .definition(*tile_index)
                    .map_or(0.0, |definition| definition.weight)
            })
            .collect();

        let chosen = weighted_choice(rng, &weights)
            .and_then(|group| groups.get(group))
            .and_then(|(_, members)| {
                uniform_choice(rng, members.len()).and_then(|member| members.get(member))
            })
            .copied()
            .ok_or_else(|| precondition("collapse", &"weighted choice produced no candidate"))?;

        self.candidates.retain_only(chosen);
        Ok(chosen)
    }

    /// Force this cell to a specific deployment
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is not a remaining candidate
    pub fn collapse_to(&mut self, index: usize) -> Result<()> {
        if !self.candidates.contains(index) {
            return Err(precondition(
                "collapse_to",
                &format!("deployment {index} is not a remaining candidate"),
            ));
        }
        self.candidates.retain_only(index);
        Ok(())
    }

    /// Union of the sockets every remaining candidate offers towards `direction`
    pub fn facing_sockets<'c>(
        &self,
        direction: Direction,
        catalog: &'c TileCatalog,
    ) -> BTreeSet<&'c Socket> {
        self.candidates
            .iter()
            .filter_map(|index| catalog.deployment(index))
            .flat_map(|deployment| deployment.facing(direction))
            .collect()
    }

    /// Drop candidates whose edge facing back towards a neighbor has no
    /// socket compatible with `offered`
    ///
    /// `direction` points from the neighbor to this cell, so the edge checked
    /// is the one facing `direction.opposite()`. Returns whether any
    /// candidate was removed.
    pub fn restrict(
        &mut self,
        direction: Direction,
        offered: &BTreeSet<&Socket>,
        catalog: &TileCatalog,
    ) -> bool {
        let facing_back = direction.opposite();
        let mut supported = CandidateSet::new(self.candidates.capacity());
        for index in self.candidates.iter() {
            let fits = catalog.deployment(index).is_some_and(|deployment| {
                deployment
                    .facing(facing_back)
                    .iter()
                    .any(|socket| offered.iter().any(|other| socket.compatible(other)))
            });
            if fits {
                supported.insert(index);
            }
        }

        let before = self.candidates.count();
        self.candidates.intersect_with(&supported);
        self.candidates.count() < before
    }

    /// Remove from `other` every candidate incompatible with all of this
    /// cell's candidates along `direction`
    ///
    /// `other` is the neighbor reached by stepping `direction` from this
    /// cell. Returns whether `other` lost any candidate.
    pub fn propagate(&self, other: &mut Self, direction: Direction, catalog: &TileCatalog) -> bool {
        let offered = self.facing_sockets(direction, catalog);
        other.restrict(direction, &offered, catalog)
    }
}
