//! Groth16 prover
//!
//! The quotient polynomial H is computed over a coset: evaluate the
//! witness against every constraint row, interpolate, re-evaluate on the
//! coset where the vanishing polynomial is a nonzero constant, divide
//! pointwise, and interpolate back. The three proof elements then follow
//! from multi-scalar multiplications over the proving-key queries, with
//! blinding scalars r and s folded in per the paper.

use super::{qap_domain, Proof, ProvingKey};
use crate::errors::{ProofError, SolverError};
use crate::r1cs::CompiledR1CS;
use crate::timer::stage;
use ark_ec::pairing::Pairing;
use ark_ec::{CurveGroup, VariableBaseMSM};
use ark_ff::{Field, FftField, One, UniformRand, Zero};
use ark_poly::EvaluationDomain;
use rand::RngCore;
use rayon::prelude::*;

/// Produce a proof from a proving key and a full witness vector.
///
/// The witness is taken as-is; running the solver (and deciding what to
/// do when it fails) is the dispatch layer's job.
pub fn prove<E: Pairing>(
    r1cs: &CompiledR1CS<E::ScalarField>,
    pk: &ProvingKey<E>,
    witness: &[E::ScalarField],
    rng: &mut impl RngCore,
) -> Result<Proof<E>, ProofError> {
    let _timer = stage("groth16_prove");
    let num_wires = r1cs.num_wires();
    let num_instance = r1cs.num_instance();
    if witness.len() != num_wires
        || pk.a_query.len() != num_wires
        || pk.l_query.len() != num_wires - num_instance
    {
        return Err(SolverError::SizeMismatch.into());
    }

    let h = quotient_coefficients::<E>(r1cs, witness)?;

    let r = E::ScalarField::rand(rng);
    let s = E::ScalarField::rand(rng);

    let msm_stage = stage("prove_msm");
    let a_acc = msm::<E::G1>(&pk.a_query, witness)?;
    let b_g1_acc = msm::<E::G1>(&pk.b_g1_query, witness)?;
    let b_g2_acc = msm::<E::G2>(&pk.b_g2_query, witness)?;
    let l_acc = msm::<E::G1>(&pk.l_query, &witness[num_instance..])?;
    let h_acc = msm::<E::G1>(&pk.h_query, &h)?;
    msm_stage.finish();

    let a_total = a_acc + pk.alpha_g1 + pk.delta_g1 * r;
    let b1_total = b_g1_acc + pk.beta_g1 + pk.delta_g1 * s;
    let b2_total = b_g2_acc + pk.beta_g2 + pk.delta_g2 * s;
    let c_total = l_acc + h_acc + a_total * s + b1_total * r - pk.delta_g1 * (r * s);

    Ok(Proof {
        a: a_total.into_affine(),
        b: b2_total.into_affine(),
        c: c_total.into_affine(),
    })
}

/// Coefficients of H(X) = (A(X)·B(X) − C(X)) / Z(X), degree ≤ n−2.
fn quotient_coefficients<E: Pairing>(
    r1cs: &CompiledR1CS<E::ScalarField>,
    witness: &[E::ScalarField],
) -> Result<Vec<E::ScalarField>, ProofError> {
    let _timer = stage("prove_fft");
    let num_constraints = r1cs.num_constraints();
    let num_instance = r1cs.num_instance();
    let domain = qap_domain::<E>(num_constraints, num_instance)?;
    let n = domain.size();

    let rows: Vec<(E::ScalarField, E::ScalarField, E::ScalarField)> = r1cs
        .constraints
        .par_iter()
        .map(|constraint| {
            (
                constraint.a.eval(witness),
                constraint.b.eval(witness),
                constraint.c.eval(witness),
            )
        })
        .collect();

    let mut a_evals = vec![E::ScalarField::zero(); n];
    let mut b_evals = vec![E::ScalarField::zero(); n];
    let mut c_evals = vec![E::ScalarField::zero(); n];
    for (j, (a, b, c)) in rows.into_iter().enumerate() {
        a_evals[j] = a;
        b_evals[j] = b;
        c_evals[j] = c;
    }
    // input-consistency rows: a = wᵢ, b = c = 0
    for k in 0..num_instance {
        a_evals[num_constraints + k] = witness[k];
    }

    let a_coeffs = domain.ifft(&a_evals);
    let b_coeffs = domain.ifft(&b_evals);
    let c_coeffs = domain.ifft(&c_evals);

    let coset = domain
        .get_coset(E::ScalarField::GENERATOR)
        .ok_or_else(|| ProofError::Prove("no coset available for the FFT domain".into()))?;
    let a_coset = coset.fft(&a_coeffs);
    let b_coset = coset.fft(&b_coeffs);
    let c_coset = coset.fft(&c_coeffs);

    // Z is the constant gⁿ−1 on the coset
    let z_inv = (E::ScalarField::GENERATOR.pow([n as u64]) - E::ScalarField::one())
        .inverse()
        .ok_or_else(|| ProofError::Prove("vanishing polynomial is zero on the coset".into()))?;
    let h_coset: Vec<E::ScalarField> = (0..n)
        .into_par_iter()
        .map(|i| (a_coset[i] * b_coset[i] - c_coset[i]) * z_inv)
        .collect();

    let mut h = coset.ifft(&h_coset);
    h.truncate(n - 1);
    Ok(h)
}

fn msm<G: VariableBaseMSM>(bases: &[G::MulBase], scalars: &[G::ScalarField]) -> Result<G, ProofError> {
    G::msm(bases, scalars).map_err(|_| SolverError::SizeMismatch.into())
}
