use crate::element::Element;

/// Atom type produced by the SMILES reader.
///
/// Only the properties a depiction label needs are kept. The bridging
/// analysis never looks inside an atom; it works on graph vertices alone.
///
/// # Examples
///
/// ```
/// use bridgecrab::Atom;
///
/// let nitrogen = Atom {
///     atomic_num: 7,
///     hydrogen_count: 1,
///     ..Atom::default()
/// };
/// assert_eq!(nitrogen.label(), "NH");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …). `0` is the `*` wildcard.
    pub atomic_num: u8,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Mass number. `0` means natural isotopic abundance.
    pub isotope: u16,
    /// Number of implicit hydrogens.
    pub hydrogen_count: u8,
    /// Written in lowercase (aromatic) form in the input.
    pub is_aromatic: bool,
}

impl Atom {
    pub fn element(&self) -> Option<Element> {
        Element::from_atomic_num(self.atomic_num)
    }

    /// Text shown for this atom in a depiction, e.g. `"N"`, `"OH"`, `"NH3+"`.
    pub fn label(&self) -> String {
        let mut label = String::new();
        if self.isotope > 0 {
            label.push_str(&self.isotope.to_string());
        }
        label.push_str(self.element().map(Element::symbol).unwrap_or("*"));
        match self.hydrogen_count {
            0 => {}
            1 => label.push('H'),
            n => {
                label.push('H');
                label.push_str(&n.to_string());
            }
        }
        match self.formal_charge {
            0 => {}
            1 => label.push('+'),
            -1 => label.push('-'),
            q if q > 0 => label.push_str(&format!("{}+", q)),
            q => label.push_str(&format!("{}-", -q)),
        }
        label
    }
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.atomic_num
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}

impl crate::traits::HasLabel for Atom {
    fn label(&self) -> String {
        Atom::label(self)
    }
}
