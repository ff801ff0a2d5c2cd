/// A handle to an element of a [`Sequence`](super::Sequence).
///
/// A position does not borrow its sequence; the sequence checks it on every use.
/// `Position::NIL` stands in for "before the first / after the last / no such element",
/// and is the only position with slot 0.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub(super) owner: u32,
    pub(super) slot: u32,
    pub(super) generation: u32,
}

impl Position {
    /// The shared nil position.
    pub const NIL: Position = Position {
        owner: 0,
        slot: 0,
        generation: 0,
    };

    #[inline]
    pub fn is_nil(&self) -> bool {
        self.slot == 0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_nil() {
            write!(f, "nil")
        } else {
            write!(f, "seq{}#{}.{}", self.owner, self.slot, self.generation)
        }
    }
}
