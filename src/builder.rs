//! Circuit front-end: the operations a circuit definition calls
//!
//! The builder is symbolic until forced. Affine combinations (add, sub,
//! constant scaling) rewrite linear combinations and cost nothing; only
//! multiplication of two non-constant combinations, explicit assertions,
//! and hint-bound wires append constraints.

use crate::errors::CircuitError;
use crate::hints::{Hint, HintBinding};
use crate::lc::{Constraint, LinearCombination, Wire, WireClass};
use crate::math::Math;
use ark_ff::PrimeField;

/// Wire indices are serialised as u32.
const MAX_WIRES: usize = u32::MAX as usize;

/// A circuit description, defined once and compiled per curve.
pub trait Circuit {
    fn define<F: PrimeField>(&self, api: &mut CircuitBuilder<F>) -> Result<(), CircuitError>;
}

/// Records wires, constraints, and hint bindings as a circuit defines
/// itself. Frozen into a [`CompiledR1CS`](crate::r1cs::CompiledR1CS) by the
/// compiler.
pub struct CircuitBuilder<F: PrimeField> {
    pub(crate) classes: Vec<WireClass>,
    pub(crate) input_names: Vec<(String, Wire)>,
    pub(crate) constraints: Vec<Constraint<F>>,
    pub(crate) hints: Vec<(Wire, HintBinding<F>)>,
}

impl<F: PrimeField> CircuitBuilder<F> {
    pub(crate) fn new() -> Self {
        CircuitBuilder {
            classes: vec![WireClass::One],
            input_names: Vec::new(),
            constraints: Vec::new(),
            hints: Vec::new(),
        }
    }

    fn new_wire(&mut self, class: WireClass) -> Result<Wire, CircuitError> {
        if self.classes.len() == MAX_WIRES {
            return Err(CircuitError::TooManyWires);
        }
        let wire = Wire(self.classes.len());
        self.classes.push(class);
        Ok(wire)
    }

    fn new_input(&mut self, name: &str, class: WireClass) -> Result<Wire, CircuitError> {
        if self.input_names.iter().any(|(n, _)| n == name) {
            return Err(CircuitError::DuplicateInput(name.to_string()));
        }
        let wire = self.new_wire(class)?;
        self.input_names.push((name.to_string(), wire));
        Ok(wire)
    }

    /// Declare a named public input wire.
    pub fn public_input(&mut self, name: &str) -> Result<Wire, CircuitError> {
        self.new_input(name, WireClass::Public)
    }

    /// Declare a named secret input wire.
    pub fn secret_input(&mut self, name: &str) -> Result<Wire, CircuitError> {
        self.new_input(name, WireClass::Secret)
    }

    /// Allocate an internal wire bound to `hint` over `inputs`. The hint
    /// fires at the first constraint referencing the wire; callers must
    /// constrain the result.
    pub fn new_hint(
        &mut self,
        hint: Hint,
        inputs: Vec<LinearCombination<F>>,
    ) -> Result<Wire, CircuitError> {
        let wire = self.new_wire(WireClass::Internal)?;
        self.hints.push((wire, HintBinding { hint, inputs }));
        Ok(wire)
    }

    fn enforce(
        &mut self,
        a: LinearCombination<F>,
        b: LinearCombination<F>,
        c: LinearCombination<F>,
    ) {
        self.constraints.push(Constraint::new(a, b, c));
    }

    /// The constant `k`. No constraint.
    pub fn constant(&self, k: impl Into<F>) -> LinearCombination<F> {
        LinearCombination::from_const(k.into())
    }

    /// `x + y`. No constraint.
    pub fn add(
        &self,
        x: &LinearCombination<F>,
        y: &LinearCombination<F>,
    ) -> LinearCombination<F> {
        x + y
    }

    /// `x - y`. No constraint.
    pub fn sub(
        &self,
        x: &LinearCombination<F>,
        y: &LinearCombination<F>,
    ) -> LinearCombination<F> {
        x - y
    }

    /// `-x`. No constraint.
    pub fn neg(&self, x: &LinearCombination<F>) -> LinearCombination<F> {
        -x
    }

    /// `x · y`. Folds symbolically when either side is a constant;
    /// otherwise allocates an internal wire `z` and emits `x·y = z`.
    pub fn mul(
        &mut self,
        x: &LinearCombination<F>,
        y: &LinearCombination<F>,
    ) -> Result<LinearCombination<F>, CircuitError> {
        if let Some(k) = x.as_constant() {
            return Ok(y.scale(k));
        }
        if let Some(k) = y.as_constant() {
            return Ok(x.scale(k));
        }
        let z = self.new_wire(WireClass::Internal)?;
        self.enforce(x.clone(), y.clone(), z.into());
        Ok(z.into())
    }

    /// `x / y`. The quotient wire is hint-bound and the emitted constraint
    /// `z·y = x` both pins the hint and proves `y ≠ 0`.
    pub fn div(
        &mut self,
        x: &LinearCombination<F>,
        y: &LinearCombination<F>,
    ) -> Result<LinearCombination<F>, CircuitError> {
        let z = self.new_hint(Hint::Div, vec![x.clone(), y.clone()])?;
        self.enforce(z.into(), y.clone(), x.clone());
        Ok(z.into())
    }

    /// `1 / x`.
    pub fn inverse(
        &mut self,
        x: &LinearCombination<F>,
    ) -> Result<LinearCombination<F>, CircuitError> {
        let one = self.constant(F::one());
        self.div(&one, x)
    }

    /// Emit `(x - y)·1 = 0`.
    pub fn assert_is_equal(&mut self, x: &LinearCombination<F>, y: &LinearCombination<F>) {
        let one = LinearCombination::from_const(F::one());
        self.enforce(x - y, one, LinearCombination::zero());
    }

    /// Emit `x·(1 - x) = 0`.
    pub fn assert_is_boolean(&mut self, x: &LinearCombination<F>) {
        let one_minus_x = &LinearCombination::from_const(F::one()) - x;
        self.enforce(x.clone(), one_minus_x, LinearCombination::zero());
    }

    /// Decompose `x` into `n` bits, least significant first. Each bit wire
    /// is hint-bound, boolean-constrained, and the recomposition
    /// `Σ 2ⁱ·bᵢ = x` is enforced.
    pub fn to_binary(
        &mut self,
        x: &LinearCombination<F>,
        n: usize,
    ) -> Result<Vec<LinearCombination<F>>, CircuitError> {
        let mut bits = Vec::with_capacity(n);
        for i in 0..n {
            let pos = LinearCombination::from_const(F::from(i as u64));
            let bit = self.new_hint(Hint::IthBit, vec![x.clone(), pos])?;
            let bit: LinearCombination<F> = bit.into();
            self.assert_is_boolean(&bit);
            bits.push(bit);
        }
        let sum = self.from_binary(&bits);
        self.assert_is_equal(&sum, x);
        Ok(bits)
    }

    /// `Σ 2ⁱ·bᵢ`. No constraint; the caller is responsible for the bits
    /// already being boolean-constrained.
    pub fn from_binary(&self, bits: &[LinearCombination<F>]) -> LinearCombination<F> {
        let mut sum = LinearCombination::zero();
        let mut coeff = F::one();
        for bit in bits {
            sum = &sum + &bit.scale(coeff);
            coeff.double_in_place();
        }
        sum
    }

    /// Assert `x ≤ bound` for a constant bound: decompose `x` into
    /// `bitlen(bound)` bits and walk the bound's bits most significant
    /// first, keeping a running product of "prefix still equal" — where the
    /// bound has a 0 bit, `x` may have a 1 only if a more significant bit
    /// already made it smaller.
    pub fn assert_is_less_or_equal(
        &mut self,
        x: &LinearCombination<F>,
        bound: u64,
    ) -> Result<(), CircuitError> {
        let n = bound.bit_len();
        let bits = self.to_binary(x, n)?;
        let mut prefix = LinearCombination::from_const(F::one());
        for i in (0..n).rev() {
            let gated = self.mul(&prefix, &bits[i])?;
            if bound >> i & 1 == 1 {
                prefix = gated;
            } else {
                self.assert_is_equal(&gated, &LinearCombination::zero());
            }
        }
        Ok(())
    }

    /// `cond ? a : b` with `cond` boolean. One wire, one constraint:
    /// `cond·(a - b) = z - b`.
    pub fn select(
        &mut self,
        cond: &LinearCombination<F>,
        a: &LinearCombination<F>,
        b: &LinearCombination<F>,
    ) -> Result<LinearCombination<F>, CircuitError> {
        let z = self.new_wire(WireClass::Internal)?;
        let z_lc: LinearCombination<F> = z.into();
        self.enforce(cond.clone(), a - b, &z_lc - b);
        Ok(z_lc)
    }

    /// Boolean `1` iff `x = 0`. The indicator `m` is hint-bound and pinned
    /// by three constraints: `m` boolean, `x·m = 0` (forces `m = 0` for
    /// nonzero `x`), and `(x + m)·inv = 1` (forces `m = 1` when `x = 0`,
    /// since `x + m` must be invertible).
    pub fn is_zero(
        &mut self,
        x: &LinearCombination<F>,
    ) -> Result<LinearCombination<F>, CircuitError> {
        let m = self.new_hint(Hint::IsZero, vec![x.clone()])?;
        let m: LinearCombination<F> = m.into();
        self.assert_is_boolean(&m);
        self.enforce(x.clone(), m.clone(), LinearCombination::zero());
        let x_plus_m = x + &m;
        let one = self.constant(F::one());
        let inv = self.new_hint(Hint::Div, vec![one.clone(), x_plus_m.clone()])?;
        self.enforce(x_plus_m, inv.into(), one);
        Ok(m)
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_wires(&self) -> usize {
        self.classes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;

    #[test]
    fn test_affine_ops_are_free() {
        let mut b = CircuitBuilder::<Fr>::new();
        let x = b.public_input("x").unwrap();
        let y = b.secret_input("y").unwrap();
        let x: LinearCombination<Fr> = x.into();
        let y: LinearCombination<Fr> = y.into();
        let s = b.add(&x, &y);
        let d = b.sub(&s, &b.constant(3u64));
        let _ = b.neg(&d);
        assert_eq!(b.num_constraints(), 0);
    }

    #[test]
    fn test_mul_by_constant_is_symbolic() {
        let mut b = CircuitBuilder::<Fr>::new();
        let x: LinearCombination<Fr> = b.public_input("x").unwrap().into();
        let k = b.constant(7u64);
        let scaled = b.mul(&x, &k).unwrap();
        assert_eq!(b.num_constraints(), 0);
        assert_eq!(scaled, x.scale(Fr::from(7u64)));
    }

    #[test]
    fn test_mul_allocates_one_constraint() {
        let mut b = CircuitBuilder::<Fr>::new();
        let x: LinearCombination<Fr> = b.public_input("x").unwrap().into();
        let y: LinearCombination<Fr> = b.secret_input("y").unwrap().into();
        let _ = b.mul(&x, &y).unwrap();
        assert_eq!(b.num_constraints(), 1);
        assert_eq!(b.num_wires(), 4); // one + x + y + product
    }

    #[test]
    fn test_to_binary_constraint_count() {
        let mut b = CircuitBuilder::<Fr>::new();
        let x: LinearCombination<Fr> = b.public_input("x").unwrap().into();
        let bits = b.to_binary(&x, 4).unwrap();
        assert_eq!(bits.len(), 4);
        // one boolean constraint per bit plus the recomposition check
        assert_eq!(b.num_constraints(), 5);
        assert_eq!(b.hints.len(), 4);
    }

    #[test]
    fn test_duplicate_input_rejected() {
        let mut b = CircuitBuilder::<Fr>::new();
        b.public_input("x").unwrap();
        assert_eq!(
            b.secret_input("x"),
            Err(CircuitError::DuplicateInput("x".to_string()))
        );
    }
}
