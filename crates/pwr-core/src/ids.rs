use core::fmt;
use core::num::NonZeroU32;

/// Compact, stable identifier used across the engine's state arenas.
///
/// - `u32` keeps the rate bags and state arenas small.
/// - `NonZero` makes `Option<Id>` the same size as `Id`, which matters once
///   every node carries an `Option<NodeId>` (container references, shell
///   nodes for HX-tube burst records, etc).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Id(NonZeroU32);

impl Id {
    /// Create an Id from a 0-based index by storing index+1.
    pub fn from_index(index: u32) -> Self {
        Self(NonZeroU32::new(index + 1).expect("index+1 is nonzero"))
    }

    /// Recover the 0-based index.
    pub fn index(self) -> u32 {
        self.0.get() - 1
    }

    /// Recover the 0-based index as `usize`, for arena indexing.
    pub fn idx(self) -> usize {
        self.index() as usize
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Domain-specific ID aliases for clarity (no runtime cost).
pub type NodeId = Id;
pub type ThermalNodeId = Id;
pub type FlowNodeId = Id;
pub type ConnId = Id;
pub type CompId = Id;
pub type CoreId = Id;
