//! Wires, linear combinations, and R1CS constraints

use ark_ff::PrimeField;
use std::ops::{Add, Neg, Sub};

/// The distinguished constant-one wire. Index 0 in every witness layout.
pub const ONE_WIRE: Wire = Wire(0);

/// Opaque handle to a single scalar-field element of the active curve.
///
/// Indices are builder-local until compilation, which renumbers wires into
/// the final `[one | public | secret | internal]` layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Wire(pub(crate) usize);

impl Wire {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Visibility class of a wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireClass {
    /// The constant-one wire.
    One,
    /// Supplied by the caller and revealed to the verifier.
    Public,
    /// Supplied by the caller, known only to the prover.
    Secret,
    /// Deduced by the solver.
    Internal,
}

/// A single coefficient-weighted wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Term<F: PrimeField> {
    pub coeff: F,
    pub wire: Wire,
}

/// A sum of coefficient-weighted wires, kept in canonical form: terms
/// sorted by wire index, duplicate wires merged, zero coefficients dropped.
///
/// Every constructor and operator re-canonicalises, so equality is plain
/// structural equality.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct LinearCombination<F: PrimeField> {
    terms: Vec<Term<F>>,
}

impl<F: PrimeField> LinearCombination<F> {
    /// The empty combination, equal to zero.
    pub fn zero() -> Self {
        LinearCombination { terms: Vec::new() }
    }

    /// The constant `k`, expressed as `k · one`.
    pub fn from_const(k: F) -> Self {
        if k.is_zero() {
            return Self::zero();
        }
        LinearCombination {
            terms: vec![Term {
                coeff: k,
                wire: ONE_WIRE,
            }],
        }
    }

    /// Canonicalise an arbitrary term list: sort by wire, merge, drop zeros.
    pub fn from_terms(mut terms: Vec<Term<F>>) -> Self {
        terms.sort_by_key(|t| t.wire);
        let mut merged: Vec<Term<F>> = Vec::with_capacity(terms.len());
        for t in terms {
            match merged.last_mut() {
                Some(last) if last.wire == t.wire => last.coeff += t.coeff,
                _ => merged.push(t),
            }
        }
        merged.retain(|t| !t.coeff.is_zero());
        LinearCombination { terms: merged }
    }

    pub fn terms(&self) -> &[Term<F>] {
        &self.terms
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns `Some(k)` when the combination is the constant `k`
    /// (including the empty combination, which is 0).
    pub fn as_constant(&self) -> Option<F> {
        match self.terms.as_slice() {
            [] => Some(F::zero()),
            [t] if t.wire == ONE_WIRE => Some(t.coeff),
            _ => None,
        }
    }

    /// Multiply every coefficient by `k`.
    pub fn scale(&self, k: F) -> Self {
        if k.is_zero() {
            return Self::zero();
        }
        LinearCombination {
            terms: self
                .terms
                .iter()
                .map(|t| Term {
                    coeff: t.coeff * k,
                    wire: t.wire,
                })
                .collect(),
        }
    }

    /// Evaluate over a full witness vector.
    pub fn eval(&self, witness: &[F]) -> F {
        self.terms
            .iter()
            .map(|t| t.coeff * witness[t.wire.0])
            .sum()
    }

    /// Evaluate, treating `skip` as zero. Used by the solver to isolate an
    /// unknown wire.
    pub(crate) fn eval_without(&self, witness: &[F], skip: Wire) -> F {
        self.terms
            .iter()
            .filter(|t| t.wire != skip)
            .map(|t| t.coeff * witness[t.wire.0])
            .sum()
    }

    /// Coefficient of `wire`, if present.
    pub(crate) fn coeff_of(&self, wire: Wire) -> Option<F> {
        self.terms
            .binary_search_by_key(&wire, |t| t.wire)
            .ok()
            .map(|i| self.terms[i].coeff)
    }

    /// Rewrite every wire through `f`, re-canonicalising. Used by the
    /// compiler when it assigns final wire numbers.
    pub(crate) fn map_wires(&self, f: impl Fn(Wire) -> Wire) -> Self {
        Self::from_terms(
            self.terms
                .iter()
                .map(|t| Term {
                    coeff: t.coeff,
                    wire: f(t.wire),
                })
                .collect(),
        )
    }

    // Merge-walk over two sorted term lists; linear in the input size.
    fn merged(&self, other: &Self, negate_other: bool) -> Self {
        let (a, b) = (&self.terms, &other.terms);
        let mut out: Vec<Term<F>> = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() || j < b.len() {
            let take_a = match (a.get(i), b.get(j)) {
                (Some(x), Some(y)) => x.wire <= y.wire,
                (Some(_), None) => true,
                _ => false,
            };
            let t = if take_a {
                let t = a[i];
                i += 1;
                t
            } else {
                let mut t = b[j];
                j += 1;
                if negate_other {
                    t.coeff = -t.coeff;
                }
                t
            };
            match out.last_mut() {
                Some(last) if last.wire == t.wire => last.coeff += t.coeff,
                _ => out.push(t),
            }
        }
        out.retain(|t| !t.coeff.is_zero());
        LinearCombination { terms: out }
    }
}

impl<F: PrimeField> From<Wire> for LinearCombination<F> {
    fn from(wire: Wire) -> Self {
        LinearCombination {
            terms: vec![Term {
                coeff: F::one(),
                wire,
            }],
        }
    }
}

impl<F: PrimeField> Add for &LinearCombination<F> {
    type Output = LinearCombination<F>;

    fn add(self, other: Self) -> LinearCombination<F> {
        self.merged(other, false)
    }
}

impl<F: PrimeField> Sub for &LinearCombination<F> {
    type Output = LinearCombination<F>;

    fn sub(self, other: Self) -> LinearCombination<F> {
        self.merged(other, true)
    }
}

impl<F: PrimeField> Neg for &LinearCombination<F> {
    type Output = LinearCombination<F>;

    fn neg(self) -> LinearCombination<F> {
        LinearCombination::zero().merged(self, true)
    }
}

/// A rank-one constraint `a · b = c`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint<F: PrimeField> {
    pub a: LinearCombination<F>,
    pub b: LinearCombination<F>,
    pub c: LinearCombination<F>,
}

impl<F: PrimeField> Constraint<F> {
    pub fn new(
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        c: LinearCombination<F>,
    ) -> Self {
        Constraint { a, b, c }
    }

    /// Whether `a·b = c` holds under the given witness.
    pub fn is_satisfied(&self, witness: &[F]) -> bool {
        self.a.eval(witness) * self.b.eval(witness) == self.c.eval(witness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    fn lc(pairs: &[(u64, usize)]) -> LinearCombination<Fr> {
        LinearCombination::from_terms(
            pairs
                .iter()
                .map(|&(c, w)| Term {
                    coeff: Fr::from(c),
                    wire: Wire(w),
                })
                .collect(),
        )
    }

    #[test]
    fn test_canonical_form_merges_and_sorts() {
        let a = lc(&[(3, 2), (1, 1), (4, 2)]);
        let b = lc(&[(1, 1), (7, 2)]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_coefficients_dropped() {
        let a = lc(&[(5, 1)]);
        let b = lc(&[(5, 1), (3, 2)]);
        let diff = &b - &a;
        assert_eq!(diff, lc(&[(3, 2)]));
        let cancelled = &a - &a;
        assert!(cancelled.is_zero());
    }

    #[test]
    fn test_add_sub_eval() {
        let witness = vec![Fr::from(1u64), Fr::from(10u64), Fr::from(20u64)];
        let a = lc(&[(2, 1), (1, 2)]); // 2*10 + 20 = 40
        let b = lc(&[(1, 1)]); // 10
        assert_eq!((&a + &b).eval(&witness), Fr::from(50u64));
        assert_eq!((&a - &b).eval(&witness), Fr::from(30u64));
        assert_eq!((-&b).eval(&witness), -Fr::from(10u64));
    }

    #[test]
    fn test_as_constant() {
        assert_eq!(
            LinearCombination::<Fr>::from_const(Fr::from(9u64)).as_constant(),
            Some(Fr::from(9u64))
        );
        assert_eq!(
            LinearCombination::<Fr>::zero().as_constant(),
            Some(Fr::from(0u64))
        );
        assert_eq!(lc(&[(1, 3)]).as_constant(), None);
    }

    #[test]
    fn test_coeff_of() {
        let a = lc(&[(2, 1), (5, 4)]);
        assert_eq!(a.coeff_of(Wire(4)), Some(Fr::from(5u64)));
        assert_eq!(a.coeff_of(Wire(3)), None);
    }
}
