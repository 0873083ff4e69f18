pub mod atom;
pub mod bond;
pub mod bridging;
pub mod config;
pub mod depict;
pub mod element;
pub mod error;
pub mod layout;
pub mod mol;
pub mod paths;
pub mod rings;
pub mod smiles;
pub mod traits;

pub use atom::Atom;
pub use bond::{Bond, BondOrder};
pub use bridging::{analyze, classify, is_admissible, select, BridgingResult, MaximallyBridgingRings};
pub use config::BridgeConfig;
pub use element::Element;
pub use error::BridgeError;
pub use mol::Mol;
pub use paths::{Path, PathEnumerator, PathError, SimplePaths};
pub use rings::{AllRingsFinder, Ring, RingError, RingFinder, RingSet};
pub use smiles::{parse_smiles, SmilesError};
pub use traits::{HasAtomicNum, HasBondOrder, HasFormalCharge, HasLabel};

#[cfg(test)]
mod tests;
