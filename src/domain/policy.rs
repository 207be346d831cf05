//! Tile scheduler execution policies (C4 configuration surface).
//!
//! Five base policies, each with an optional four-color parallel
//! variant — except `Seq`, which sweeps the whole interior as a single
//! region and gains nothing from coloring a tile grid of one tile.

/// Which scheduling strategy the convergence driver should use.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Policy {
    Seq,
    Tiled,
    TiledParallel,
    TiledDouble,
    TiledDoubleParallel,
    TiledStable,
    TiledStableParallel,
    TiledDoubleStable,
    TiledDoubleStableParallel,
}

impl Policy {
    pub const fn all() -> [Policy; 9] {
        [
            Policy::Seq,
            Policy::Tiled,
            Policy::TiledParallel,
            Policy::TiledDouble,
            Policy::TiledDoubleParallel,
            Policy::TiledStable,
            Policy::TiledStableParallel,
            Policy::TiledDoubleStable,
            Policy::TiledDoubleStableParallel,
        ]
    }

    /// Canonical name, matching spec.md §6's policy enum spelling.
    pub const fn name(self) -> &'static str {
        match self {
            Policy::Seq => "seq",
            Policy::Tiled => "tiled",
            Policy::TiledParallel => "tiled_parallel",
            Policy::TiledDouble => "tiled_double",
            Policy::TiledDoubleParallel => "tiled_double_parallel",
            Policy::TiledStable => "tiled_stable",
            Policy::TiledStableParallel => "tiled_stable_parallel",
            Policy::TiledDoubleStable => "tiled_double_stable",
            Policy::TiledDoubleStableParallel => "tiled_double_stable_parallel",
        }
    }

    pub fn from_name(name: &str) -> Option<Policy> {
        Policy::all().into_iter().find(|p| p.name() == name)
    }

    pub const fn is_parallel(self) -> bool {
        matches!(
            self,
            Policy::TiledParallel
                | Policy::TiledDoubleParallel
                | Policy::TiledStableParallel
                | Policy::TiledDoubleStableParallel
        )
    }

    pub const fn is_double(self) -> bool {
        matches!(
            self,
            Policy::TiledDouble
                | Policy::TiledDoubleParallel
                | Policy::TiledDoubleStable
                | Policy::TiledDoubleStableParallel
        )
    }

    pub const fn is_stable(self) -> bool {
        matches!(
            self,
            Policy::TiledStable
                | Policy::TiledStableParallel
                | Policy::TiledDoubleStable
                | Policy::TiledDoubleStableParallel
        )
    }
}

impl Default for Policy {
    fn default() -> Self {
        Policy::TiledDoubleStableParallel
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_round_trip() {
        let names: Vec<_> = Policy::all().iter().map(|p| p.name()).collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len());

        for p in Policy::all() {
            assert_eq!(Policy::from_name(p.name()), Some(p));
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert_eq!(Policy::from_name("quantum_tiled"), None);
    }

    #[test]
    fn seq_has_no_parallel_variant_in_enum() {
        assert!(!Policy::Seq.is_parallel());
    }
}
