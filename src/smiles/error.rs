use thiserror::Error;

/// Errors produced when reading a SMILES string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SmilesError {
    /// The input string was empty or contained only whitespace.
    #[error("empty SMILES string")]
    EmptyInput,
    /// An unexpected character was encountered at the given position.
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    /// An unrecognized element symbol was found.
    #[error("invalid element '{text}' at position {pos}")]
    InvalidElement { pos: usize, text: String },
    /// A bracket atom `[` was opened but never closed with `]`.
    #[error("unclosed bracket atom starting at position {pos}")]
    UnclosedBracket { pos: usize },
    /// A charge, isotope or hydrogen count inside a bracket atom overflowed.
    #[error("numeric overflow in bracket atom at position {pos}")]
    NumericOverflow { pos: usize },
    /// A ring-opening digit was never matched by a ring-closing digit.
    #[error("unclosed ring {digit}")]
    UnclosedRing { digit: u16 },
    /// A ring-closure digit or bond appeared before any atom.
    #[error("ring bond {digit} at position {pos} has no preceding atom")]
    DanglingRingBond { digit: u16, pos: usize },
    /// A ring closure would bond an atom to itself or duplicate an existing bond.
    #[error("ring closure {digit} at position {pos} does not form a new bond")]
    InvalidRingBond { digit: u16, pos: usize },
    /// Two ring-closure bonds on the same digit specify conflicting bond types.
    #[error("conflicting bond types on ring closure {digit}")]
    RingBondConflict { digit: u16 },
    /// A parenthesis was opened without a matching close, or vice versa.
    #[error("unmatched parenthesis at position {pos}")]
    UnmatchedParen { pos: usize },
    /// A bond symbol was not followed by an atom or ring closure.
    #[error("bond at position {pos} is not followed by an atom")]
    DanglingBond { pos: usize },
}
