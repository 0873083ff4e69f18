use crate::bond::BondOrder;

pub trait HasAtomicNum {
    fn atomic_num(&self) -> u8;
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i8;
}

/// Text drawn at an atom's position in a depiction.
pub trait HasLabel {
    fn label(&self) -> String;
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}
