use crate::element::Element;
use crate::smiles::error::SmilesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond(BondToken, usize),
    RingClosure { digit: u16, pos: usize },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    /// `None` for the `*` wildcard.
    pub element: Option<Element>,
    pub is_aromatic: bool,
    pub isotope: u16,
    pub hcount: Option<u8>,
    pub charge: i8,
    pub is_bracket: bool,
    pub pos: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Aromatic,
    Up,
    Down,
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let mut lexer = Lexer {
        chars: input.chars().collect(),
        pos: 0,
    };
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.next_token()? {
        tokens.push(tok);
    }
    Ok(tokens)
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, SmilesError> {
        while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
            self.pos += 1;
        }
        let start = self.pos;
        let Some(ch) = self.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '[' => Token::Atom(self.bracket_atom()?),
            '*' => {
                self.pos += 1;
                Token::Atom(bare_atom(None, false, start))
            }
            'B' | 'C' => {
                let two_letter = match (ch, self.peek_at(1)) {
                    ('B', Some('r')) => Some(Element::Br),
                    ('C', Some('l')) => Some(Element::Cl),
                    _ => None,
                };
                let element = match two_letter {
                    Some(e) => {
                        self.pos += 2;
                        e
                    }
                    None => {
                        self.pos += 1;
                        if ch == 'B' {
                            Element::B
                        } else {
                            Element::C
                        }
                    }
                };
                Token::Atom(bare_atom(Some(element), false, start))
            }
            'N' | 'O' | 'P' | 'S' | 'F' | 'I' => {
                self.pos += 1;
                let element = Element::from_symbol(&ch.to_string());
                Token::Atom(bare_atom(element, false, start))
            }
            'b' | 'c' | 'n' | 'o' | 'p' | 's' => {
                self.pos += 1;
                let element = Element::from_symbol(&ch.to_ascii_uppercase().to_string());
                Token::Atom(bare_atom(element, true, start))
            }
            '-' | '=' | '#' | ':' | '/' | '\\' => {
                self.pos += 1;
                let bond = match ch {
                    '-' => BondToken::Single,
                    '=' => BondToken::Double,
                    '#' => BondToken::Triple,
                    ':' => BondToken::Aromatic,
                    '/' => BondToken::Up,
                    _ => BondToken::Down,
                };
                Token::Bond(bond, start)
            }
            '(' => {
                self.pos += 1;
                Token::OpenParen(start)
            }
            ')' => {
                self.pos += 1;
                Token::CloseParen(start)
            }
            '.' => {
                self.pos += 1;
                Token::Dot(start)
            }
            '%' => {
                let (d1, d2) = match (self.peek_at(1), self.peek_at(2)) {
                    (Some(a), Some(b)) if a.is_ascii_digit() && b.is_ascii_digit() => (a, b),
                    _ => return Err(SmilesError::UnexpectedChar { pos: start, ch: '%' }),
                };
                self.pos += 3;
                Token::RingClosure {
                    digit: digit_value(d1) * 10 + digit_value(d2),
                    pos: start,
                }
            }
            d if d.is_ascii_digit() => {
                self.pos += 1;
                Token::RingClosure {
                    digit: digit_value(d),
                    pos: start,
                }
            }
            ch => return Err(SmilesError::UnexpectedChar { pos: start, ch }),
        };
        Ok(Some(token))
    }

    fn bracket_atom(&mut self) -> Result<AtomToken, SmilesError> {
        let start = self.pos;
        self.pos += 1; // '['

        let isotope = self.number(start)?.unwrap_or(0);
        let (element, is_aromatic) = self.bracket_element(start)?;
        self.skip_chirality();
        let hcount = if self.eat('H') {
            Some(match self.peek() {
                Some(d) if d.is_ascii_digit() => {
                    self.pos += 1;
                    digit_value(d) as u8
                }
                _ => 1,
            })
        } else {
            Some(0)
        };
        let charge = self.charge(start)?;
        if self.eat(':') {
            // Atom classes carry no meaning for ring analysis.
            self.number(start)?;
        }

        if !self.eat(']') {
            return Err(SmilesError::UnclosedBracket { pos: start });
        }

        Ok(AtomToken {
            element,
            is_aromatic,
            isotope,
            hcount,
            charge,
            is_bracket: true,
            pos: start,
        })
    }

    fn bracket_element(&mut self, start: usize) -> Result<(Option<Element>, bool), SmilesError> {
        let Some(first) = self.peek() else {
            return Err(SmilesError::UnclosedBracket { pos: start });
        };
        if first == '*' {
            self.pos += 1;
            return Ok((None, false));
        }

        // Aromatic selenium and tellurium are the only two-letter lowercase symbols.
        for (pat, elem) in [("se", Element::Se), ("te", Element::Te)] {
            if self.starts_with(pat) {
                self.pos += 2;
                return Ok((Some(elem), true));
            }
        }
        if matches!(first, 'b' | 'c' | 'n' | 'o' | 'p' | 's') {
            self.pos += 1;
            let element = Element::from_symbol(&first.to_ascii_uppercase().to_string());
            return Ok((element, true));
        }

        if first.is_ascii_uppercase() {
            if let Some(second) = self.peek_at(1).filter(char::is_ascii_lowercase) {
                let sym: String = [first, second].iter().collect();
                if let Some(e) = Element::from_symbol(&sym) {
                    self.pos += 2;
                    return Ok((Some(e), false));
                }
            }
            if let Some(e) = Element::from_symbol(&first.to_string()) {
                self.pos += 1;
                return Ok((Some(e), false));
            }
        }

        Err(SmilesError::InvalidElement {
            pos: self.pos,
            text: first.to_string(),
        })
    }

    fn starts_with(&self, pat: &str) -> bool {
        pat.chars()
            .enumerate()
            .all(|(i, c)| self.peek_at(i) == Some(c))
    }

    /// `@`, `@@`, and the `@TH1`-style long forms are accepted and ignored.
    fn skip_chirality(&mut self) {
        if !self.eat('@') {
            return;
        }
        if self.eat('@') {
            return;
        }
        if ["TH", "AL", "SP", "TB", "OH"].iter().any(|class| self.starts_with(class)) {
            self.pos += 2;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
    }

    fn number(&mut self, start: usize) -> Result<Option<u16>, SmilesError> {
        let mut value: Option<u16> = None;
        while let Some(d) = self.peek().filter(char::is_ascii_digit) {
            let acc = value.unwrap_or(0);
            value = Some(
                acc.checked_mul(10)
                    .and_then(|v| v.checked_add(digit_value(d)))
                    .ok_or(SmilesError::NumericOverflow { pos: start })?,
            );
            self.pos += 1;
        }
        Ok(value)
    }

    fn charge(&mut self, start: usize) -> Result<i8, SmilesError> {
        let sign: i8 = match self.peek() {
            Some('+') => 1,
            Some('-') => -1,
            _ => return Ok(0),
        };
        let symbol = if sign > 0 { '+' } else { '-' };
        self.pos += 1;

        if let Some(n) = self.number(start)? {
            let n = i8::try_from(n).map_err(|_| SmilesError::NumericOverflow { pos: start })?;
            return Ok(sign * n);
        }
        let mut magnitude: i8 = 1;
        while self.eat(symbol) {
            magnitude = magnitude
                .checked_add(1)
                .ok_or(SmilesError::NumericOverflow { pos: start })?;
        }
        Ok(sign * magnitude)
    }
}

fn digit_value(d: char) -> u16 {
    d as u16 - '0' as u16
}

fn bare_atom(element: Option<Element>, aromatic: bool, pos: usize) -> AtomToken {
    AtomToken {
        element,
        is_aromatic: aromatic,
        isotope: 0,
        hcount: None,
        charge: 0,
        is_bracket: false,
        pos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_atom(s: &str) -> AtomToken {
        match tokenize(s).unwrap().into_iter().next() {
            Some(Token::Atom(a)) => a,
            other => panic!("expected atom, got {:?}", other),
        }
    }

    #[test]
    fn tokenize_methane() {
        let a = single_atom("C");
        assert_eq!(a.element, Some(Element::C));
        assert!(!a.is_bracket);
        assert!(!a.is_aromatic);
    }

    #[test]
    fn two_letter_organic() {
        let tokens = tokenize("ClCBr").unwrap();
        assert_eq!(tokens.len(), 3);
        assert!(matches!(&tokens[0], Token::Atom(a) if a.element == Some(Element::Cl)));
        assert!(matches!(&tokens[2], Token::Atom(a) if a.element == Some(Element::Br)));
    }

    #[test]
    fn tokenize_bracket_atom() {
        let a = single_atom("[NH4+]");
        assert_eq!(a.element, Some(Element::N));
        assert!(a.is_bracket);
        assert_eq!(a.hcount, Some(4));
        assert_eq!(a.charge, 1);
    }

    #[test]
    fn tokenize_isotope() {
        let a = single_atom("[13C]");
        assert_eq!(a.isotope, 13);
        assert_eq!(a.element, Some(Element::C));
    }

    #[test]
    fn chirality_is_skipped() {
        let a = single_atom("[C@@H](F)(Cl)Br");
        assert_eq!(a.hcount, Some(1));
        let a = single_atom("[C@TH2H]");
        assert_eq!(a.hcount, Some(1));
    }

    #[test]
    fn ring_closures() {
        let tokens = tokenize("C1CC%10").unwrap();
        assert!(matches!(&tokens[1], Token::RingClosure { digit: 1, .. }));
        assert!(matches!(&tokens[4], Token::RingClosure { digit: 10, .. }));
    }

    #[test]
    fn bracket_aromatic_se() {
        let a = single_atom("[se]");
        assert!(a.is_aromatic);
        assert_eq!(a.element, Some(Element::Se));
    }

    #[test]
    fn charge_variants() {
        assert_eq!(single_atom("[O-]").charge, -1);
        assert_eq!(single_atom("[O-2]").charge, -2);
        assert_eq!(single_atom("[O--]").charge, -2);
        assert_eq!(single_atom("[Fe+++]").charge, 3);
    }

    #[test]
    fn atom_class_is_consumed() {
        let a = single_atom("[CH3:12]");
        assert_eq!(a.hcount, Some(3));
    }

    #[test]
    fn wildcard() {
        assert_eq!(single_atom("*").element, None);
        assert_eq!(single_atom("[*]").element, None);
    }

    #[test]
    fn errors() {
        assert!(matches!(
            tokenize("C$C"),
            Err(SmilesError::UnexpectedChar { pos: 1, ch: '$' })
        ));
        assert!(matches!(
            tokenize("[CH4"),
            Err(SmilesError::UnclosedBracket { pos: 0 })
        ));
        assert!(matches!(
            tokenize("[Xx]"),
            Err(SmilesError::InvalidElement { .. })
        ));
        assert!(matches!(
            tokenize("C%1"),
            Err(SmilesError::UnexpectedChar { ch: '%', .. })
        ));
    }
}
