//! Groth16 trusted setup
//!
//! Single-party setup: the toxic scalars α, β, γ, δ, τ are sampled from
//! OS randomness and dropped on return. The R1CS matrices are evaluated
//! at τ through the domain's Lagrange coefficients, with one
//! input-consistency row appended per instance wire so the public inputs
//! cannot be malleated out of the A polynomials.

use super::{qap_domain, ProvingKey, VerifyingKey};
use crate::errors::ProofError;
use crate::math::Math;
use crate::r1cs::CompiledR1CS;
use crate::timer::{note, stage};
use ark_ec::pairing::Pairing;
use ark_ec::{CurveGroup, PrimeGroup};
use ark_ff::{Field, One, PrimeField, UniformRand, Zero};
use ark_poly::EvaluationDomain;
use rand::RngCore;
use rayon::prelude::*;

/// Produce a proving and verifying key for one compiled circuit.
pub fn setup<E: Pairing>(
    r1cs: &CompiledR1CS<E::ScalarField>,
    rng: &mut impl RngCore,
) -> Result<(ProvingKey<E>, VerifyingKey<E>), ProofError> {
    let _timer = stage("groth16_setup");
    let num_wires = r1cs.num_wires();
    let num_instance = r1cs.num_instance();
    let num_constraints = r1cs.num_constraints();

    let domain = qap_domain::<E>(num_constraints, num_instance)?;
    let n = domain.size();
    note(&format!("domain_size 2^{}", (n as u64).log_2()));

    let alpha = nonzero_scalar::<E::ScalarField>(rng);
    let beta = nonzero_scalar::<E::ScalarField>(rng);
    let gamma = nonzero_scalar::<E::ScalarField>(rng);
    let delta = nonzero_scalar::<E::ScalarField>(rng);
    let tau = nonzero_scalar::<E::ScalarField>(rng);

    let gamma_inv = gamma
        .inverse()
        .ok_or_else(|| ProofError::Setup("gamma is not invertible".into()))?;
    let delta_inv = delta
        .inverse()
        .ok_or_else(|| ProofError::Setup("delta is not invertible".into()))?;

    // A_i(τ), B_i(τ), C_i(τ) per wire, via L_j(τ) over the domain.
    let eval_stage = stage("matrix_evaluation");
    let lagrange = domain.evaluate_all_lagrange_coefficients(tau);
    let mut a_tau = vec![E::ScalarField::zero(); num_wires];
    let mut b_tau = vec![E::ScalarField::zero(); num_wires];
    let mut c_tau = vec![E::ScalarField::zero(); num_wires];
    for (j, constraint) in r1cs.constraints.iter().enumerate() {
        let l_j = lagrange[j];
        for term in constraint.a.terms() {
            a_tau[term.wire.index()] += l_j * term.coeff;
        }
        for term in constraint.b.terms() {
            b_tau[term.wire.index()] += l_j * term.coeff;
        }
        for term in constraint.c.terms() {
            c_tau[term.wire.index()] += l_j * term.coeff;
        }
    }
    for k in 0..num_instance {
        a_tau[k] += lagrange[num_constraints + k];
    }
    eval_stage.finish();

    let g1 = E::G1::generator();
    let g2 = E::G2::generator();

    let query_stage = stage("query_vectors");
    let a_query: Vec<E::G1> = a_tau.par_iter().map(|s| g1 * *s).collect();
    let b_g1_query: Vec<E::G1> = b_tau.par_iter().map(|s| g1 * *s).collect();
    let b_g2_query: Vec<E::G2> = b_tau.par_iter().map(|s| g2 * *s).collect();

    let combined = |i: usize| beta * a_tau[i] + alpha * b_tau[i] + c_tau[i];
    let gamma_abc: Vec<E::G1> = (0..num_instance)
        .into_par_iter()
        .map(|i| g1 * (combined(i) * gamma_inv))
        .collect();
    let l_query: Vec<E::G1> = (num_instance..num_wires)
        .into_par_iter()
        .map(|i| g1 * (combined(i) * delta_inv))
        .collect();

    // [τⁱ·t(τ)/δ]₁ for i < n-1
    let t_tau_over_delta = domain.evaluate_vanishing_polynomial(tau) * delta_inv;
    let mut tau_powers = Vec::with_capacity(n - 1);
    let mut power = E::ScalarField::one();
    for _ in 0..n - 1 {
        tau_powers.push(power);
        power *= tau;
    }
    let h_query: Vec<E::G1> = tau_powers
        .par_iter()
        .map(|p| g1 * (*p * t_tau_over_delta))
        .collect();
    query_stage.finish();

    let alpha_g1 = (g1 * alpha).into_affine();
    let beta_g1 = (g1 * beta).into_affine();
    let beta_g2 = (g2 * beta).into_affine();
    let gamma_g2 = (g2 * gamma).into_affine();
    let delta_g1 = (g1 * delta).into_affine();
    let delta_g2 = (g2 * delta).into_affine();

    let pk = ProvingKey {
        alpha_g1,
        beta_g1,
        beta_g2,
        delta_g1,
        delta_g2,
        a_query: E::G1::normalize_batch(&a_query),
        b_g1_query: E::G1::normalize_batch(&b_g1_query),
        b_g2_query: E::G2::normalize_batch(&b_g2_query),
        h_query: E::G1::normalize_batch(&h_query),
        l_query: E::G1::normalize_batch(&l_query),
    };
    let vk = VerifyingKey {
        alpha_g1,
        beta_g2,
        gamma_g2,
        delta_g2,
        gamma_abc_g1: E::G1::normalize_batch(&gamma_abc),
        alpha_beta_gt: E::pairing(alpha_g1, beta_g2),
        public_inputs: r1cs.public_input_names(),
    };
    Ok((pk, vk))
}

/// A proving key of the correct shape built from a single random pair of
/// group elements. Useless for soundness; sized for benchmarking prove.
pub fn dummy_setup<E: Pairing>(
    r1cs: &CompiledR1CS<E::ScalarField>,
    rng: &mut impl RngCore,
) -> Result<ProvingKey<E>, ProofError> {
    let num_wires = r1cs.num_wires();
    let num_instance = r1cs.num_instance();
    let domain = qap_domain::<E>(r1cs.num_constraints(), num_instance)?;
    let p1 = E::G1::rand(rng).into_affine();
    let p2 = E::G2::rand(rng).into_affine();
    Ok(ProvingKey {
        alpha_g1: p1,
        beta_g1: p1,
        beta_g2: p2,
        delta_g1: p1,
        delta_g2: p2,
        a_query: vec![p1; num_wires],
        b_g1_query: vec![p1; num_wires],
        b_g2_query: vec![p2; num_wires],
        h_query: vec![p1; domain.size() - 1],
        l_query: vec![p1; num_wires - num_instance],
    })
}

fn nonzero_scalar<F: PrimeField>(rng: &mut impl RngCore) -> F {
    loop {
        let v = F::rand(rng);
        if !v.is_zero() {
            return v;
        }
    }
}
