/// Fixed-size bitset of candidate deployments
pub mod bitset;
/// Worklist-driven constraint propagation between neighboring cells
pub mod propagation;
/// Lowest-entropy cell selection
pub mod selection;
/// Socket kinds and compatibility
pub mod socket;
/// Per-cell superposition of candidate deployments
pub mod superposition;
