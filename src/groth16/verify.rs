//! Groth16 verifier
//!
//! A single multi-pairing checks `e(A,B) = e(α,β)·e(vk_x,γ)·e(C,δ)` with
//! the left-hand factors negated and the precomputed `e(α,β)` compared in
//! the target group. Group membership is enforced when artifacts are
//! deserialised, so the check here is purely the pairing equation.

use super::{Proof, VerifyingKey};
use crate::errors::{ProofError, SolverError};
use crate::timer::stage;
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup, VariableBaseMSM};

/// Accept or reject a proof against the public portion of the witness.
pub fn verify<E: Pairing>(
    proof: &Proof<E>,
    vk: &VerifyingKey<E>,
    public: &[E::ScalarField],
) -> Result<(), ProofError> {
    let _timer = stage("groth16_verify");
    if vk.gamma_abc_g1.is_empty() || public.len() != vk.num_public_inputs() {
        return Err(SolverError::SizeMismatch.into());
    }

    let mut vk_x: E::G1 = vk.gamma_abc_g1[0].into_group();
    vk_x += E::G1::msm(&vk.gamma_abc_g1[1..], public)
        .map_err(|_| ProofError::from(SolverError::SizeMismatch))?;

    let result = E::multi_pairing(
        [
            E::G1Prepared::from(proof.a),
            E::G1Prepared::from((-vk_x).into_affine()),
            E::G1Prepared::from((-proof.c.into_group()).into_affine()),
        ],
        [
            E::G2Prepared::from(proof.b),
            E::G2Prepared::from(vk.gamma_g2),
            E::G2Prepared::from(vk.delta_g2),
        ],
    );

    if result == vk.alpha_beta_gt {
        Ok(())
    } else {
        Err(ProofError::InvalidProof)
    }
}
