//! Witness computation
//!
//! Constraints are solved strictly in append order. Each constraint first
//! fires the hint-bound wires the compiler scheduled for it, then either
//! verifies itself (pure check) or isolates its single unknown wire.

use crate::assignment::Assignment;
use crate::errors::SolverError;
use crate::hints::HintError;
use crate::lc::Wire;
use crate::r1cs::{CompiledR1CS, OutputWire};
use crate::timer::stage;
use ark_ff::PrimeField;

/// Options for witness computation.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolverOptions {
    /// Force mode: suppress solving failures (unsatisfied checks, hint
    /// errors, divisions by zero) and substitute zero for anything that
    /// cannot be solved, so the cryptographic stages still execute. A
    /// proof built from such a witness is bit-valid but will not verify.
    pub ignore_errors: bool,
}

/// Compute the full witness `[one | public | secret | internal]` from a
/// named input assignment.
pub fn solve<F: PrimeField>(
    r1cs: &CompiledR1CS<F>,
    assignment: &Assignment,
) -> Result<Vec<F>, SolverError> {
    solve_with(r1cs, assignment, SolverOptions::default())
}

pub fn solve_with<F: PrimeField>(
    r1cs: &CompiledR1CS<F>,
    assignment: &Assignment,
    options: SolverOptions,
) -> Result<Vec<F>, SolverError> {
    let _timer = stage("solve");
    let mut witness = vec![F::zero(); r1cs.num_wires()];
    witness[0] = F::one();
    for (name, wire) in &r1cs.inputs {
        match assignment.value_of::<F>(name) {
            Some(value) => witness[*wire] = value,
            None if options.ignore_errors => {}
            None => {
                return Err(SolverError::MissingInput {
                    name: name.clone(),
                })
            }
        }
    }
    solve_prefixed(r1cs, &mut witness, options)?;
    Ok(witness)
}

/// Solve with the `[one | public | secret]` prefix of `witness` already
/// populated; fills in the internal wires.
pub(crate) fn solve_prefixed<F: PrimeField>(
    r1cs: &CompiledR1CS<F>,
    witness: &mut [F],
    options: SolverOptions,
) -> Result<(), SolverError> {
    if witness.len() != r1cs.num_wires() {
        return Err(SolverError::SizeMismatch);
    }

    for (index, (constraint, step)) in
        r1cs.constraints.iter().zip(r1cs.steps.iter()).enumerate()
    {
        for &wire in &step.hints {
            let binding = &r1cs.hints[&wire];
            let inputs: Vec<F> = binding
                .inputs
                .iter()
                .map(|lc| lc.eval(witness))
                .collect();
            match binding.hint.evaluate(&inputs) {
                Ok(value) => witness[wire] = value,
                Err(_) if options.ignore_errors => witness[wire] = F::zero(),
                Err(HintError::DivisionByZero) => {
                    return Err(SolverError::DivisionByZero { constraint: index })
                }
                Err(e) => {
                    return Err(SolverError::Hint {
                        constraint: index,
                        message: e.to_string(),
                    })
                }
            }
        }

        match step.output {
            OutputWire::None => {
                if !constraint.is_satisfied(witness) && !options.ignore_errors {
                    return Err(SolverError::UnsatisfiedConstraint { index });
                }
            }
            OutputWire::C(wire) => {
                let u = Wire(wire);
                let product =
                    constraint.a.eval(witness) * constraint.b.eval(witness);
                let rest = constraint.c.eval_without(witness, u);
                // canonical form guarantees a nonzero coefficient
                let coeff = constraint.c.coeff_of(u).expect("annotated output wire");
                let inv = coeff
                    .inverse()
                    .ok_or(SolverError::DivisionByZero { constraint: index })?;
                witness[wire] = (product - rest) * inv;
            }
            OutputWire::A(wire) | OutputWire::B(wire) => {
                let u = Wire(wire);
                // the factor the unknown lives in, and its co-factor
                let (holder, cofactor) = match step.output {
                    OutputWire::A(_) => (&constraint.a, &constraint.b),
                    _ => (&constraint.b, &constraint.a),
                };
                let cofactor_value = cofactor.eval(witness);
                let coeff = holder.coeff_of(u).expect("annotated output wire");
                let denominator = coeff * cofactor_value;
                match denominator.inverse() {
                    Some(inv) => {
                        let rest = holder.eval_without(witness, u) * cofactor_value;
                        witness[wire] = (constraint.c.eval(witness) - rest) * inv;
                    }
                    None if options.ignore_errors => witness[wire] = F::zero(),
                    None => {
                        return Err(SolverError::DivisionByZero { constraint: index })
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Circuit, CircuitBuilder};
    use crate::compiler::compile;
    use crate::errors::CircuitError;
    use crate::lc::LinearCombination;
    use ark_bn254::Fr;
    use ark_ff::Field;

    /// y = x^3 + x + 5
    struct Cubic;

    impl Circuit for Cubic {
        fn define<F: PrimeField>(
            &self,
            api: &mut CircuitBuilder<F>,
        ) -> Result<(), CircuitError> {
            let x: LinearCombination<F> = api.secret_input("x")?.into();
            let y: LinearCombination<F> = api.public_input("y")?.into();
            let x2 = api.mul(&x, &x)?;
            let x3 = api.mul(&x2, &x)?;
            let sum = api.add(&api.add(&x3, &x), &api.constant(F::from(5u64)));
            api.assert_is_equal(&sum, &y);
            Ok(())
        }
    }

    fn cubic_assignment(x: u64, y: u64) -> Assignment {
        let mut a = Assignment::new();
        a.set_u64("x", x);
        a.set_u64("y", y);
        a
    }

    #[test]
    fn test_solve_cubic() {
        let r1cs = compile::<Fr, _>(&Cubic).unwrap();
        let witness = solve(&r1cs, &cubic_assignment(3, 35)).unwrap();
        assert_eq!(witness.len(), r1cs.num_wires());
        r1cs.is_sat(&witness).unwrap();
    }

    #[test]
    fn test_unsatisfied_constraint_reported() {
        let r1cs = compile::<Fr, _>(&Cubic).unwrap();
        let err = solve(&r1cs, &cubic_assignment(3, 36)).unwrap_err();
        assert!(matches!(err, SolverError::UnsatisfiedConstraint { .. }));
    }

    #[test]
    fn test_missing_input_reported() {
        let r1cs = compile::<Fr, _>(&Cubic).unwrap();
        let mut a = Assignment::new();
        a.set_u64("x", 3);
        assert_eq!(
            solve(&r1cs, &a).unwrap_err(),
            SolverError::MissingInput {
                name: "y".to_string()
            }
        );
    }

    #[test]
    fn test_force_mode_swallows_failures() {
        let r1cs = compile::<Fr, _>(&Cubic).unwrap();
        let witness = solve_with(
            &r1cs,
            &cubic_assignment(3, 36),
            SolverOptions {
                ignore_errors: true,
            },
        )
        .unwrap();
        assert!(r1cs.is_sat(&witness).is_err());
    }

    #[test]
    fn test_mutated_witness_breaks_some_constraint() {
        let r1cs = compile::<Fr, _>(&Cubic).unwrap();
        let witness = solve(&r1cs, &cubic_assignment(3, 35)).unwrap();
        for wire in 1..witness.len() {
            let mut tampered = witness.clone();
            tampered[wire] += Fr::from(1u64);
            assert!(
                r1cs.is_sat(&tampered).is_err(),
                "no constraint noticed a change to wire {wire}"
            );
        }
    }

    /// z = 1/x, division by zero when x = 0
    struct Inverse;

    impl Circuit for Inverse {
        fn define<F: PrimeField>(
            &self,
            api: &mut CircuitBuilder<F>,
        ) -> Result<(), CircuitError> {
            let x: LinearCombination<F> = api.secret_input("x")?.into();
            let y: LinearCombination<F> = api.public_input("y")?.into();
            let inv = api.inverse(&x)?;
            api.assert_is_equal(&inv, &y);
            Ok(())
        }
    }

    #[test]
    fn test_division_by_zero_reported() {
        let r1cs = compile::<Fr, _>(&Inverse).unwrap();
        let mut a = Assignment::new();
        a.set_u64("x", 0);
        a.set_u64("y", 0);
        assert!(matches!(
            solve(&r1cs, &a).unwrap_err(),
            SolverError::DivisionByZero { .. }
        ));
    }

    #[test]
    fn test_solve_inverse() {
        let r1cs = compile::<Fr, _>(&Inverse).unwrap();
        use ark_ff::BigInteger;
        let inv7 = Fr::from(7u64).inverse().unwrap();
        let mut a = Assignment::new();
        a.set_u64("x", 7);
        a.set_bytes("y", &inv7.into_bigint().to_bytes_be());
        let witness = solve(&r1cs, &a).unwrap();
        r1cs.is_sat(&witness).unwrap();
    }
}
