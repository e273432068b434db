//! Out-of-band hint functions
//!
//! A hint computes a wire value the solver cannot reach by rearranging a
//! single constraint (bit extraction, inverse of a possibly-zero element).
//! Hints are pure functions identified by a stable tag, so a compiled
//! circuit serialises without capturing closures; deserialisation re-binds
//! the tag to the in-process implementation. Hint results are
//! non-deterministic input to the solver and are always pinned down by one
//! or more constraints emitted alongside them.

use crate::lc::LinearCombination;
use ark_ff::{BigInteger, PrimeField};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HintError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("expected {expected} inputs, got {got}")]
    InputCount { expected: usize, got: usize },
    #[error("bit position does not fit a machine word")]
    BitPosition,
}

/// Identifier of a built-in hint function.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    /// `[x, y] -> x · y⁻¹`; fails when `y = 0`.
    Div,
    /// `[x, i] -> bit i of x`.
    IthBit,
    /// `[x] -> 1 when x = 0, 0 otherwise`.
    IsZero,
}

impl Hint {
    pub(crate) fn tag(self) -> u8 {
        match self {
            Hint::Div => 0,
            Hint::IthBit => 1,
            Hint::IsZero => 2,
        }
    }

    pub(crate) fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Hint::Div),
            1 => Some(Hint::IthBit),
            2 => Some(Hint::IsZero),
            _ => None,
        }
    }

    fn expect_inputs(self, got: usize) -> Result<(), HintError> {
        let expected = match self {
            Hint::Div | Hint::IthBit => 2,
            Hint::IsZero => 1,
        };
        if got != expected {
            return Err(HintError::InputCount { expected, got });
        }
        Ok(())
    }

    /// Evaluate on resolved input values.
    pub fn evaluate<F: PrimeField>(self, inputs: &[F]) -> Result<F, HintError> {
        self.expect_inputs(inputs.len())?;
        match self {
            Hint::Div => {
                let inv = inputs[1].inverse().ok_or(HintError::DivisionByZero)?;
                Ok(inputs[0] * inv)
            }
            Hint::IthBit => {
                let pos = inputs[1].into_bigint();
                let limbs = pos.as_ref();
                if limbs[1..].iter().any(|&l| l != 0) {
                    return Err(HintError::BitPosition);
                }
                let i = limbs[0] as usize;
                let value = inputs[0].into_bigint();
                if i >= value.num_bits() as usize {
                    return Ok(F::zero());
                }
                Ok(F::from(value.get_bit(i)))
            }
            Hint::IsZero => Ok(if inputs[0].is_zero() {
                F::one()
            } else {
                F::zero()
            }),
        }
    }
}

/// A hint attached to one wire: the identifier plus the ordered input
/// combinations, evaluated over already-solved wires at solve time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HintBinding<F: PrimeField> {
    pub hint: Hint,
    pub inputs: Vec<LinearCombination<F>>,
}
