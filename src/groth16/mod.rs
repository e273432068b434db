//! Groth16 proving system, generic over the pairing curve
//!
//! Setup, prove, and verify are written once against [`Pairing`] and
//! monomorphised per curve; the dispatch layer owns curve selection. Keys
//! reference the constraint system only by shape (wire counts and the
//! public-input names), never by pointer, so they are freely read-shared
//! across concurrent proofs.

pub mod prove;
pub mod setup;
pub mod solidity;
pub mod verify;

pub use prove::prove;
pub use setup::{dummy_setup, setup};
pub use verify::verify;

use crate::errors::ProofError;
use crate::serialize::{
    read_point, read_point_vec, read_string, read_u32, write_len, write_point, write_point_vec,
    write_string, CountingReader, CountingWriter,
};
use ark_ec::pairing::{Pairing, PairingOutput};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use std::io::{Read, Write};

/// Proving key: the full Groth16 query vectors.
///
/// `h_query` is the δ⁻¹-scaled H query `[τⁱ·t(τ)/δ]₁`; `l_query` covers
/// the non-instance wires `[(β·Aᵢ + α·Bᵢ + Cᵢ)/δ]₁`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvingKey<E: Pairing> {
    pub alpha_g1: E::G1Affine,
    pub beta_g1: E::G1Affine,
    pub beta_g2: E::G2Affine,
    pub delta_g1: E::G1Affine,
    pub delta_g2: E::G2Affine,
    pub a_query: Vec<E::G1Affine>,
    pub b_g1_query: Vec<E::G1Affine>,
    pub b_g2_query: Vec<E::G2Affine>,
    pub h_query: Vec<E::G1Affine>,
    pub l_query: Vec<E::G1Affine>,
}

/// Verifying key: γ⁻¹-scaled instance commitments plus the precomputed
/// pairing `e(α·G1, β·G2)`, and the ordered public-input names so a named
/// assignment can be laid out for verification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey<E: Pairing> {
    pub alpha_g1: E::G1Affine,
    pub beta_g2: E::G2Affine,
    pub gamma_g2: E::G2Affine,
    pub delta_g2: E::G2Affine,
    pub gamma_abc_g1: Vec<E::G1Affine>,
    pub alpha_beta_gt: PairingOutput<E>,
    pub public_inputs: Vec<String>,
}

impl<E: Pairing> VerifyingKey<E> {
    /// Number of elements expected in the public witness.
    pub fn num_public_inputs(&self) -> usize {
        self.gamma_abc_g1.len().saturating_sub(1)
    }
}

/// A Groth16 proof: three group elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof<E: Pairing> {
    pub a: E::G1Affine,
    pub b: E::G2Affine,
    pub c: E::G1Affine,
}

/// Evaluation domain for the quotient polynomial: the smallest power of
/// two covering the constraints plus the input-consistency rows appended
/// for the instance wires.
pub(crate) fn qap_domain<E: Pairing>(
    num_constraints: usize,
    num_instance: usize,
) -> Result<Radix2EvaluationDomain<E::ScalarField>, ProofError> {
    Radix2EvaluationDomain::new(num_constraints + num_instance)
        .ok_or_else(|| ProofError::Setup("circuit exceeds the curve's FFT domain".into()))
}

impl<E: Pairing> ProvingKey<E> {
    pub(crate) fn write_body<W: Write>(&self, w: &mut CountingWriter<W>) -> Result<(), ProofError> {
        write_point(w, &self.alpha_g1)?;
        write_point(w, &self.beta_g1)?;
        write_point(w, &self.beta_g2)?;
        write_point(w, &self.delta_g1)?;
        write_point(w, &self.delta_g2)?;
        write_point_vec(w, &self.a_query)?;
        write_point_vec(w, &self.b_g1_query)?;
        write_point_vec(w, &self.b_g2_query)?;
        write_point_vec(w, &self.h_query)?;
        write_point_vec(w, &self.l_query)
    }

    pub(crate) fn read_body<R: Read>(r: &mut CountingReader<R>) -> Result<Self, ProofError> {
        Ok(ProvingKey {
            alpha_g1: read_point(r)?,
            beta_g1: read_point(r)?,
            beta_g2: read_point(r)?,
            delta_g1: read_point(r)?,
            delta_g2: read_point(r)?,
            a_query: read_point_vec(r)?,
            b_g1_query: read_point_vec(r)?,
            b_g2_query: read_point_vec(r)?,
            h_query: read_point_vec(r)?,
            l_query: read_point_vec(r)?,
        })
    }
}

impl<E: Pairing> VerifyingKey<E> {
    pub(crate) fn write_body<W: Write>(&self, w: &mut CountingWriter<W>) -> Result<(), ProofError> {
        write_point(w, &self.alpha_g1)?;
        write_point(w, &self.beta_g2)?;
        write_point(w, &self.gamma_g2)?;
        write_point(w, &self.delta_g2)?;
        write_point_vec(w, &self.gamma_abc_g1)?;
        write_point(w, &self.alpha_beta_gt)?;
        write_len(w, self.public_inputs.len())?;
        for name in &self.public_inputs {
            write_string(w, name)?;
        }
        Ok(())
    }

    pub(crate) fn read_body<R: Read>(r: &mut CountingReader<R>) -> Result<Self, ProofError> {
        let alpha_g1 = read_point(r)?;
        let beta_g2 = read_point(r)?;
        let gamma_g2 = read_point(r)?;
        let delta_g2 = read_point(r)?;
        let gamma_abc_g1 = read_point_vec(r)?;
        let alpha_beta_gt = read_point(r)?;
        let num_names = read_u32(r)? as usize;
        let mut public_inputs = Vec::with_capacity(num_names.min(4096));
        for _ in 0..num_names {
            public_inputs.push(read_string(r)?);
        }
        Ok(VerifyingKey {
            alpha_g1,
            beta_g2,
            gamma_g2,
            delta_g2,
            gamma_abc_g1,
            alpha_beta_gt,
            public_inputs,
        })
    }
}

impl<E: Pairing> Proof<E> {
    pub(crate) fn write_body<W: Write>(&self, w: &mut CountingWriter<W>) -> Result<(), ProofError> {
        write_point(w, &self.a)?;
        write_point(w, &self.b)?;
        write_point(w, &self.c)
    }

    pub(crate) fn read_body<R: Read>(r: &mut CountingReader<R>) -> Result<Self, ProofError> {
        Ok(Proof {
            a: read_point(r)?,
            b: read_point(r)?,
            c: read_point(r)?,
        })
    }
}
