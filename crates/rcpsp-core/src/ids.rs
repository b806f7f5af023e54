//! Component identifiers.

/// Index of a component (atomic model) in the coordinator's slot `Vec`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentId(pub u32);

impl ComponentId {
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl TryFrom<usize> for ComponentId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<ComponentId, Self::Error> {
        u32::try_from(n).map(ComponentId)
    }
}
