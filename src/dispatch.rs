//! Curve dispatch
//!
//! The generic front-end and Groth16 code is monomorphised over four
//! pairing curves; this module is the thin sum-type layer that routes by
//! curve identifier. Every serialised artifact starts with a one-byte
//! curve tag, an unknown tag is an error value rather than a panic, and
//! mixing artifacts of different curves is rejected with `CurveMismatch`.

use crate::assignment::{read_witness, Assignment};
use crate::builder::Circuit;
use crate::compiler;
use crate::errors::{CircuitError, ProofError, SolverError};
use crate::groth16;
use crate::r1cs::CompiledR1CS;
use crate::serialize::{read_u8, write_u8, CountingReader, CountingWriter};
use crate::solver::{self, SolverOptions};
use ark_bls12_377::Bls12_377;
use ark_bls12_381::Bls12_381;
use ark_bn254::Bn254;
use ark_bw6_761::BW6_761;
use ark_ec::pairing::Pairing;
use ark_ff::{One, Zero};
use rand::rngs::OsRng;
use std::fmt;
use std::io::{Read, Write};

/// Identifier of a supported pairing curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CurveId {
    Bn254,
    Bls12_377,
    Bls12_381,
    Bw6_761,
}

impl CurveId {
    pub(crate) fn tag(self) -> u8 {
        match self {
            CurveId::Bn254 => 1,
            CurveId::Bls12_377 => 2,
            CurveId::Bls12_381 => 3,
            CurveId::Bw6_761 => 4,
        }
    }

    /// Inverse of [`tag`](Self::tag); any other value is rejected.
    pub fn from_tag(tag: u8) -> Result<Self, ProofError> {
        match tag {
            1 => Ok(CurveId::Bn254),
            2 => Ok(CurveId::Bls12_377),
            3 => Ok(CurveId::Bls12_381),
            4 => Ok(CurveId::Bw6_761),
            _ => Err(ProofError::UnsupportedCurve),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CurveId::Bn254 => "bn254",
            CurveId::Bls12_377 => "bls12-377",
            CurveId::Bls12_381 => "bls12-381",
            CurveId::Bw6_761 => "bw6-761",
        }
    }
}

impl fmt::Display for CurveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A compiled circuit tagged with its curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompiledCircuit {
    Bn254(CompiledR1CS<ark_bn254::Fr>),
    Bls12_377(CompiledR1CS<ark_bls12_377::Fr>),
    Bls12_381(CompiledR1CS<ark_bls12_381::Fr>),
    Bw6_761(CompiledR1CS<ark_bw6_761::Fr>),
}

/// A Groth16 proving key tagged with its curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProvingKey {
    Bn254(groth16::ProvingKey<Bn254>),
    Bls12_377(groth16::ProvingKey<Bls12_377>),
    Bls12_381(groth16::ProvingKey<Bls12_381>),
    Bw6_761(groth16::ProvingKey<BW6_761>),
}

/// A Groth16 verifying key tagged with its curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifyingKey {
    Bn254(groth16::VerifyingKey<Bn254>),
    Bls12_377(groth16::VerifyingKey<Bls12_377>),
    Bls12_381(groth16::VerifyingKey<Bls12_381>),
    Bw6_761(groth16::VerifyingKey<BW6_761>),
}

/// A Groth16 proof tagged with its curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Proof {
    Bn254(groth16::Proof<Bn254>),
    Bls12_377(groth16::Proof<Bls12_377>),
    Bls12_381(groth16::Proof<Bls12_381>),
    Bw6_761(groth16::Proof<BW6_761>),
}

macro_rules! dispatch {
    ($enum:ident, $value:expr, $inner:ident => $body:expr) => {
        match $value {
            $enum::Bn254($inner) => $body,
            $enum::Bls12_377($inner) => $body,
            $enum::Bls12_381($inner) => $body,
            $enum::Bw6_761($inner) => $body,
        }
    };
}

impl CompiledCircuit {
    pub fn curve(&self) -> CurveId {
        match self {
            CompiledCircuit::Bn254(_) => CurveId::Bn254,
            CompiledCircuit::Bls12_377(_) => CurveId::Bls12_377,
            CompiledCircuit::Bls12_381(_) => CurveId::Bls12_381,
            CompiledCircuit::Bw6_761(_) => CurveId::Bw6_761,
        }
    }

    pub fn num_constraints(&self) -> usize {
        dispatch!(CompiledCircuit, self, cs => cs.num_constraints())
    }

    pub fn num_public_inputs(&self) -> usize {
        dispatch!(CompiledCircuit, self, cs => cs.num_public_inputs())
    }

    pub fn num_secret_inputs(&self) -> usize {
        dispatch!(CompiledCircuit, self, cs => cs.num_secret_inputs())
    }

    pub fn num_wires(&self) -> usize {
        dispatch!(CompiledCircuit, self, cs => cs.num_wires())
    }

    /// Digest of the frozen constraint system; identical for identical
    /// circuit descriptions.
    pub fn digest(&self) -> [u8; 32] {
        dispatch!(CompiledCircuit, self, cs => cs.digest())
    }

    pub fn write_to<W: Write>(&self, sink: W) -> Result<(), ProofError> {
        let mut w = CountingWriter::new(sink);
        write_u8(&mut w, self.curve().tag())?;
        dispatch!(CompiledCircuit, self, cs => cs.write_body(&mut w))
    }

    pub fn read_from<R: Read>(source: R) -> Result<Self, ProofError> {
        let mut r = CountingReader::new(source);
        match CurveId::from_tag(read_u8(&mut r)?)? {
            CurveId::Bn254 => CompiledR1CS::read_body(&mut r).map(CompiledCircuit::Bn254),
            CurveId::Bls12_377 => CompiledR1CS::read_body(&mut r).map(CompiledCircuit::Bls12_377),
            CurveId::Bls12_381 => CompiledR1CS::read_body(&mut r).map(CompiledCircuit::Bls12_381),
            CurveId::Bw6_761 => CompiledR1CS::read_body(&mut r).map(CompiledCircuit::Bw6_761),
        }
    }
}

impl ProvingKey {
    pub fn curve(&self) -> CurveId {
        match self {
            ProvingKey::Bn254(_) => CurveId::Bn254,
            ProvingKey::Bls12_377(_) => CurveId::Bls12_377,
            ProvingKey::Bls12_381(_) => CurveId::Bls12_381,
            ProvingKey::Bw6_761(_) => CurveId::Bw6_761,
        }
    }

    pub fn write_to<W: Write>(&self, sink: W) -> Result<(), ProofError> {
        let mut w = CountingWriter::new(sink);
        write_u8(&mut w, self.curve().tag())?;
        dispatch!(ProvingKey, self, pk => pk.write_body(&mut w))
    }

    pub fn read_from<R: Read>(source: R) -> Result<Self, ProofError> {
        let mut r = CountingReader::new(source);
        match CurveId::from_tag(read_u8(&mut r)?)? {
            CurveId::Bn254 => groth16::ProvingKey::read_body(&mut r).map(ProvingKey::Bn254),
            CurveId::Bls12_377 => {
                groth16::ProvingKey::read_body(&mut r).map(ProvingKey::Bls12_377)
            }
            CurveId::Bls12_381 => {
                groth16::ProvingKey::read_body(&mut r).map(ProvingKey::Bls12_381)
            }
            CurveId::Bw6_761 => groth16::ProvingKey::read_body(&mut r).map(ProvingKey::Bw6_761),
        }
    }
}

impl VerifyingKey {
    pub fn curve(&self) -> CurveId {
        match self {
            VerifyingKey::Bn254(_) => CurveId::Bn254,
            VerifyingKey::Bls12_377(_) => CurveId::Bls12_377,
            VerifyingKey::Bls12_381(_) => CurveId::Bls12_381,
            VerifyingKey::Bw6_761(_) => CurveId::Bw6_761,
        }
    }

    /// Number of elements expected in the public witness.
    pub fn num_public_inputs(&self) -> usize {
        dispatch!(VerifyingKey, self, vk => vk.num_public_inputs())
    }

    pub fn write_to<W: Write>(&self, sink: W) -> Result<(), ProofError> {
        let mut w = CountingWriter::new(sink);
        write_u8(&mut w, self.curve().tag())?;
        dispatch!(VerifyingKey, self, vk => vk.write_body(&mut w))
    }

    pub fn read_from<R: Read>(source: R) -> Result<Self, ProofError> {
        let mut r = CountingReader::new(source);
        match CurveId::from_tag(read_u8(&mut r)?)? {
            CurveId::Bn254 => groth16::VerifyingKey::read_body(&mut r).map(VerifyingKey::Bn254),
            CurveId::Bls12_377 => {
                groth16::VerifyingKey::read_body(&mut r).map(VerifyingKey::Bls12_377)
            }
            CurveId::Bls12_381 => {
                groth16::VerifyingKey::read_body(&mut r).map(VerifyingKey::Bls12_381)
            }
            CurveId::Bw6_761 => {
                groth16::VerifyingKey::read_body(&mut r).map(VerifyingKey::Bw6_761)
            }
        }
    }
}

impl Proof {
    pub fn curve(&self) -> CurveId {
        match self {
            Proof::Bn254(_) => CurveId::Bn254,
            Proof::Bls12_377(_) => CurveId::Bls12_377,
            Proof::Bls12_381(_) => CurveId::Bls12_381,
            Proof::Bw6_761(_) => CurveId::Bw6_761,
        }
    }

    pub fn write_to<W: Write>(&self, sink: W) -> Result<(), ProofError> {
        let mut w = CountingWriter::new(sink);
        write_u8(&mut w, self.curve().tag())?;
        dispatch!(Proof, self, proof => proof.write_body(&mut w))
    }

    pub fn read_from<R: Read>(source: R) -> Result<Self, ProofError> {
        let mut r = CountingReader::new(source);
        match CurveId::from_tag(read_u8(&mut r)?)? {
            CurveId::Bn254 => groth16::Proof::read_body(&mut r).map(Proof::Bn254),
            CurveId::Bls12_377 => groth16::Proof::read_body(&mut r).map(Proof::Bls12_377),
            CurveId::Bls12_381 => groth16::Proof::read_body(&mut r).map(Proof::Bls12_381),
            CurveId::Bw6_761 => groth16::Proof::read_body(&mut r).map(Proof::Bw6_761),
        }
    }
}

/// Compile a circuit description over the scalar field of `curve`.
pub fn compile<C: Circuit>(circuit: &C, curve: CurveId) -> Result<CompiledCircuit, CircuitError> {
    Ok(match curve {
        CurveId::Bn254 => CompiledCircuit::Bn254(compiler::compile(circuit)?),
        CurveId::Bls12_377 => CompiledCircuit::Bls12_377(compiler::compile(circuit)?),
        CurveId::Bls12_381 => CompiledCircuit::Bls12_381(compiler::compile(circuit)?),
        CurveId::Bw6_761 => CompiledCircuit::Bw6_761(compiler::compile(circuit)?),
    })
}

/// Run the trusted setup for a compiled circuit.
pub fn setup(r1cs: &CompiledCircuit) -> Result<(ProvingKey, VerifyingKey), ProofError> {
    match r1cs {
        CompiledCircuit::Bn254(cs) => {
            let (pk, vk) = groth16::setup(cs, &mut OsRng)?;
            Ok((ProvingKey::Bn254(pk), VerifyingKey::Bn254(vk)))
        }
        CompiledCircuit::Bls12_377(cs) => {
            let (pk, vk) = groth16::setup(cs, &mut OsRng)?;
            Ok((ProvingKey::Bls12_377(pk), VerifyingKey::Bls12_377(vk)))
        }
        CompiledCircuit::Bls12_381(cs) => {
            let (pk, vk) = groth16::setup(cs, &mut OsRng)?;
            Ok((ProvingKey::Bls12_381(pk), VerifyingKey::Bls12_381(vk)))
        }
        CompiledCircuit::Bw6_761(cs) => {
            let (pk, vk) = groth16::setup(cs, &mut OsRng)?;
            Ok((ProvingKey::Bw6_761(pk), VerifyingKey::Bw6_761(vk)))
        }
    }
}

/// A proving key of the correct shape with random content. Benchmarking
/// prove only; no verifying key exists for it.
pub fn dummy_setup(r1cs: &CompiledCircuit) -> Result<ProvingKey, ProofError> {
    match r1cs {
        CompiledCircuit::Bn254(cs) => {
            groth16::dummy_setup(cs, &mut OsRng).map(ProvingKey::Bn254)
        }
        CompiledCircuit::Bls12_377(cs) => {
            groth16::dummy_setup(cs, &mut OsRng).map(ProvingKey::Bls12_377)
        }
        CompiledCircuit::Bls12_381(cs) => {
            groth16::dummy_setup(cs, &mut OsRng).map(ProvingKey::Bls12_381)
        }
        CompiledCircuit::Bw6_761(cs) => {
            groth16::dummy_setup(cs, &mut OsRng).map(ProvingKey::Bw6_761)
        }
    }
}

/// Solve the witness from `assignment` and produce a proof.
///
/// With `force` set, solver failures are suppressed and unsolvable wires
/// are zeroed so the cryptographic stages still execute; the resulting
/// proof is bit-valid but will not verify.
pub fn prove(
    r1cs: &CompiledCircuit,
    pk: &ProvingKey,
    assignment: &Assignment,
    force: bool,
) -> Result<Proof, ProofError> {
    match (r1cs, pk) {
        (CompiledCircuit::Bn254(cs), ProvingKey::Bn254(pk)) => {
            prove_inner(cs, pk, assignment, force).map(Proof::Bn254)
        }
        (CompiledCircuit::Bls12_377(cs), ProvingKey::Bls12_377(pk)) => {
            prove_inner(cs, pk, assignment, force).map(Proof::Bls12_377)
        }
        (CompiledCircuit::Bls12_381(cs), ProvingKey::Bls12_381(pk)) => {
            prove_inner(cs, pk, assignment, force).map(Proof::Bls12_381)
        }
        (CompiledCircuit::Bw6_761(cs), ProvingKey::Bw6_761(pk)) => {
            prove_inner(cs, pk, assignment, force).map(Proof::Bw6_761)
        }
        _ => Err(ProofError::CurveMismatch),
    }
}

/// Like [`prove`], with the `[public | secret]` witness values read from
/// `source` in the wire format instead of resolved by name.
pub fn read_and_prove<R: Read>(
    r1cs: &CompiledCircuit,
    pk: &ProvingKey,
    source: R,
    force: bool,
) -> Result<Proof, ProofError> {
    match (r1cs, pk) {
        (CompiledCircuit::Bn254(cs), ProvingKey::Bn254(pk)) => {
            read_and_prove_inner(cs, pk, source, force).map(Proof::Bn254)
        }
        (CompiledCircuit::Bls12_377(cs), ProvingKey::Bls12_377(pk)) => {
            read_and_prove_inner(cs, pk, source, force).map(Proof::Bls12_377)
        }
        (CompiledCircuit::Bls12_381(cs), ProvingKey::Bls12_381(pk)) => {
            read_and_prove_inner(cs, pk, source, force).map(Proof::Bls12_381)
        }
        (CompiledCircuit::Bw6_761(cs), ProvingKey::Bw6_761(pk)) => {
            read_and_prove_inner(cs, pk, source, force).map(Proof::Bw6_761)
        }
        _ => Err(ProofError::CurveMismatch),
    }
}

/// Check a proof against the named public assignment.
pub fn verify(proof: &Proof, vk: &VerifyingKey, public: &Assignment) -> Result<(), ProofError> {
    match (proof, vk) {
        (Proof::Bn254(proof), VerifyingKey::Bn254(vk)) => verify_inner(proof, vk, public),
        (Proof::Bls12_377(proof), VerifyingKey::Bls12_377(vk)) => verify_inner(proof, vk, public),
        (Proof::Bls12_381(proof), VerifyingKey::Bls12_381(vk)) => verify_inner(proof, vk, public),
        (Proof::Bw6_761(proof), VerifyingKey::Bw6_761(vk)) => verify_inner(proof, vk, public),
        _ => Err(ProofError::CurveMismatch),
    }
}

/// Like [`verify`], with the public witness read from `source` in the
/// wire format.
pub fn read_and_verify<R: Read>(
    proof: &Proof,
    vk: &VerifyingKey,
    source: R,
) -> Result<(), ProofError> {
    match (proof, vk) {
        (Proof::Bn254(proof), VerifyingKey::Bn254(vk)) => {
            read_and_verify_inner(proof, vk, source)
        }
        (Proof::Bls12_377(proof), VerifyingKey::Bls12_377(vk)) => {
            read_and_verify_inner(proof, vk, source)
        }
        (Proof::Bls12_381(proof), VerifyingKey::Bls12_381(vk)) => {
            read_and_verify_inner(proof, vk, source)
        }
        (Proof::Bw6_761(proof), VerifyingKey::Bw6_761(vk)) => {
            read_and_verify_inner(proof, vk, source)
        }
        _ => Err(ProofError::CurveMismatch),
    }
}

/// Render the verifying key as a Solidity verifier contract. BN254 only.
pub fn export_solidity<W: Write>(vk: &VerifyingKey, sink: &mut W) -> Result<(), ProofError> {
    match vk {
        VerifyingKey::Bn254(vk) => groth16::solidity::export_solidity(vk, sink),
        _ => Err(ProofError::UnsupportedCurve),
    }
}

fn prove_inner<E: Pairing>(
    cs: &CompiledR1CS<E::ScalarField>,
    pk: &groth16::ProvingKey<E>,
    assignment: &Assignment,
    force: bool,
) -> Result<groth16::Proof<E>, ProofError> {
    let witness = solver::solve_with(
        cs,
        assignment,
        SolverOptions {
            ignore_errors: force,
        },
    )?;
    groth16::prove(cs, pk, &witness, &mut OsRng)
}

fn read_and_prove_inner<E: Pairing, R: Read>(
    cs: &CompiledR1CS<E::ScalarField>,
    pk: &groth16::ProvingKey<E>,
    source: R,
    force: bool,
) -> Result<groth16::Proof<E>, ProofError> {
    let supplied = cs.num_public_inputs() + cs.num_secret_inputs();
    let values: Vec<E::ScalarField> = read_witness(source, supplied)?;
    let mut witness = vec![E::ScalarField::zero(); cs.num_wires()];
    witness[0] = E::ScalarField::one();
    witness[1..1 + supplied].copy_from_slice(&values);
    solver::solve_prefixed(
        cs,
        &mut witness,
        SolverOptions {
            ignore_errors: force,
        },
    )?;
    groth16::prove(cs, pk, &witness, &mut OsRng)
}

fn verify_inner<E: Pairing>(
    proof: &groth16::Proof<E>,
    vk: &groth16::VerifyingKey<E>,
    public: &Assignment,
) -> Result<(), ProofError> {
    let values = vk
        .public_inputs
        .iter()
        .map(|name| {
            public
                .value_of::<E::ScalarField>(name)
                .ok_or_else(|| {
                    ProofError::from(SolverError::MissingInput { name: name.clone() })
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    groth16::verify(proof, vk, &values)
}

fn read_and_verify_inner<E: Pairing, R: Read>(
    proof: &groth16::Proof<E>,
    vk: &groth16::VerifyingKey<E>,
    source: R,
) -> Result<(), ProofError> {
    let values: Vec<E::ScalarField> = read_witness(source, vk.num_public_inputs())?;
    groth16::verify(proof, vk, &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::write_witness;
    use crate::builder::CircuitBuilder;
    use crate::lc::LinearCombination;
    use ark_ff::{Field, PrimeField};

    /// y = x^3 + x + 5 with secret x and public y
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

    fn public_y(y: u64) -> Assignment {
        let mut a = Assignment::new();
        a.set_u64("y", y);
        a
    }

    #[test]
    fn test_cubic_end_to_end() {
        let r1cs = compile(&Cubic, CurveId::Bn254).unwrap();
        let (pk, vk) = setup(&r1cs).unwrap();
        let proof = prove(&r1cs, &pk, &cubic_assignment(3, 35), false).unwrap();
        verify(&proof, &vk, &public_y(35)).unwrap();
        // the same proof does not speak for a different public input
        assert!(matches!(
            verify(&proof, &vk, &public_y(36)),
            Err(ProofError::InvalidProof)
        ));
    }

    #[test]
    fn test_blinding_makes_proofs_distinct() {
        let r1cs = compile(&Cubic, CurveId::Bn254).unwrap();
        let (pk, vk) = setup(&r1cs).unwrap();
        let p1 = prove(&r1cs, &pk, &cubic_assignment(3, 35), false).unwrap();
        let p2 = prove(&r1cs, &pk, &cubic_assignment(3, 35), false).unwrap();
        let (mut b1, mut b2) = (Vec::new(), Vec::new());
        p1.write_to(&mut b1).unwrap();
        p2.write_to(&mut b2).unwrap();
        assert_ne!(b1, b2);
        verify(&p1, &vk, &public_y(35)).unwrap();
        verify(&p2, &vk, &public_y(35)).unwrap();
    }

    #[test]
    fn test_force_mode_produces_rejected_proof() {
        let r1cs = compile(&Cubic, CurveId::Bn254).unwrap();
        let (pk, vk) = setup(&r1cs).unwrap();
        // an unsatisfiable assignment fails outright without force
        assert!(matches!(
            prove(&r1cs, &pk, &cubic_assignment(3, 36), false),
            Err(ProofError::Solver(SolverError::UnsatisfiedConstraint { .. }))
        ));
        // with force it yields a bit-valid proof that must not verify
        let forced = prove(&r1cs, &pk, &cubic_assignment(3, 36), true).unwrap();
        assert!(matches!(
            verify(&forced, &vk, &public_y(36)),
            Err(ProofError::InvalidProof)
        ));
    }

    #[test]
    fn test_dummy_setup_supports_proving() {
        let r1cs = compile(&Cubic, CurveId::Bn254).unwrap();
        let pk = dummy_setup(&r1cs).unwrap();
        // prove-time benchmarking works; there is no key to verify against
        prove(&r1cs, &pk, &cubic_assignment(3, 35), false).unwrap();
    }

    #[test]
    fn test_read_and_prove_wire_format() {
        let r1cs = compile(&Cubic, CurveId::Bn254).unwrap();
        let (pk, vk) = setup(&r1cs).unwrap();
        // [public | secret] order: y first, then x
        let full = vec![ark_bn254::Fr::from(35u64), ark_bn254::Fr::from(3u64)];
        let mut witness_bytes = Vec::new();
        write_witness(&full, &mut witness_bytes).unwrap();
        let proof = read_and_prove(&r1cs, &pk, &witness_bytes[..], false).unwrap();

        let mut public_bytes = Vec::new();
        write_witness(&[ark_bn254::Fr::from(35u64)], &mut public_bytes).unwrap();
        read_and_verify(&proof, &vk, &public_bytes[..]).unwrap();
    }

    #[test]
    fn test_curve_isolation() {
        let bn = compile(&Cubic, CurveId::Bn254).unwrap();
        let bls = compile(&Cubic, CurveId::Bls12_381).unwrap();
        let (pk_bn, vk_bn) = setup(&bn).unwrap();
        let (pk_bls, vk_bls) = setup(&bls).unwrap();
        let proof_bn = prove(&bn, &pk_bn, &cubic_assignment(3, 35), false).unwrap();

        assert!(matches!(
            verify(&proof_bn, &vk_bls, &public_y(35)),
            Err(ProofError::CurveMismatch)
        ));
        assert!(matches!(
            prove(&bn, &pk_bls, &cubic_assignment(3, 35), false),
            Err(ProofError::CurveMismatch)
        ));
        let proof_bls = prove(&bls, &pk_bls, &cubic_assignment(3, 35), false).unwrap();
        verify(&proof_bls, &vk_bls, &public_y(35)).unwrap();
        assert!(matches!(
            verify(&proof_bls, &vk_bn, &public_y(35)),
            Err(ProofError::CurveMismatch)
        ));
    }

    #[test]
    fn test_serialization_round_trips_bitwise() {
        let r1cs = compile(&Cubic, CurveId::Bn254).unwrap();
        let (pk, vk) = setup(&r1cs).unwrap();
        let proof = prove(&r1cs, &pk, &cubic_assignment(3, 35), false).unwrap();

        let mut bytes = Vec::new();
        r1cs.write_to(&mut bytes).unwrap();
        assert_eq!(bytes[0], CurveId::Bn254.tag());
        let r1cs_back = CompiledCircuit::read_from(&bytes[..]).unwrap();
        assert_eq!(r1cs_back, r1cs);
        let mut again = Vec::new();
        r1cs_back.write_to(&mut again).unwrap();
        assert_eq!(again, bytes);

        let mut bytes = Vec::new();
        pk.write_to(&mut bytes).unwrap();
        let pk_back = ProvingKey::read_from(&bytes[..]).unwrap();
        assert_eq!(pk_back, pk);

        let mut bytes = Vec::new();
        vk.write_to(&mut bytes).unwrap();
        let vk_back = VerifyingKey::read_from(&bytes[..]).unwrap();
        assert_eq!(vk_back, vk);

        let mut bytes = Vec::new();
        proof.write_to(&mut bytes).unwrap();
        let proof_back = Proof::read_from(&bytes[..]).unwrap();
        assert_eq!(proof_back, proof);
        // the round-tripped artifacts still work together
        verify(&proof_back, &vk_back, &public_y(35)).unwrap();
    }

    #[test]
    fn test_unknown_curve_tag_rejected() {
        assert!(matches!(
            CurveId::from_tag(9),
            Err(ProofError::UnsupportedCurve)
        ));
        let bytes = [9u8, 0, 0, 0];
        assert!(matches!(
            Proof::read_from(&bytes[..]),
            Err(ProofError::UnsupportedCurve)
        ));
    }

    #[test]
    fn test_solidity_export_gated_by_curve() {
        let bn = compile(&Cubic, CurveId::Bn254).unwrap();
        let (_, vk) = setup(&bn).unwrap();
        let mut out = Vec::new();
        export_solidity(&vk, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Groth16Verifier"));

        let bls = compile(&Cubic, CurveId::Bls12_377).unwrap();
        let (_, vk) = setup(&bls).unwrap();
        let mut out = Vec::new();
        assert!(matches!(
            export_solidity(&vk, &mut out),
            Err(ProofError::UnsupportedCurve)
        ));
    }

    /// x < 2^8 via a constant-bound comparison
    struct RangeCheck;

    impl Circuit for RangeCheck {
        fn define<F: PrimeField>(
            &self,
            api: &mut CircuitBuilder<F>,
        ) -> Result<(), CircuitError> {
            let x: LinearCombination<F> = api.secret_input("x")?.into();
            api.assert_is_less_or_equal(&x, 255)
        }
    }

    #[test]
    fn test_range_check() {
        let r1cs = compile(&RangeCheck, CurveId::Bn254).unwrap();
        let (pk, vk) = setup(&r1cs).unwrap();

        let mut a = Assignment::new();
        a.set_u64("x", 200);
        let proof = prove(&r1cs, &pk, &a, false).unwrap();
        verify(&proof, &vk, &Assignment::new()).unwrap();

        let mut a = Assignment::new();
        a.set_u64("x", 300);
        assert!(matches!(
            prove(&r1cs, &pk, &a, false),
            Err(ProofError::Solver(SolverError::UnsatisfiedConstraint { .. }))
        ));
    }

    /// y = 1/x with public y
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
    fn test_inverse_over_bls12_381() {
        use ark_ff::BigInteger;
        let r1cs = compile(&Inverse, CurveId::Bls12_381).unwrap();
        let (pk, vk) = setup(&r1cs).unwrap();

        let inv7 = ark_bls12_381::Fr::from(7u64).inverse().unwrap();
        let inv7_bytes = inv7.into_bigint().to_bytes_be();
        let mut a = Assignment::new();
        a.set_u64("x", 7);
        a.set_bytes("y", &inv7_bytes);
        let proof = prove(&r1cs, &pk, &a, false).unwrap();

        let mut public = Assignment::new();
        public.set_bytes("y", &inv7_bytes);
        verify(&proof, &vk, &public).unwrap();
    }

    /// z = IsZero(x) exposed as a public output
    struct IsZeroCircuit;

    impl Circuit for IsZeroCircuit {
        fn define<F: PrimeField>(
            &self,
            api: &mut CircuitBuilder<F>,
        ) -> Result<(), CircuitError> {
            let x: LinearCombination<F> = api.secret_input("x")?.into();
            let z: LinearCombination<F> = api.public_input("z")?.into();
            let m = api.is_zero(&x)?;
            api.assert_is_equal(&m, &z);
            Ok(())
        }
    }

    #[test]
    fn test_is_zero_both_branches() {
        let r1cs = compile(&IsZeroCircuit, CurveId::Bn254).unwrap();
        let (pk, vk) = setup(&r1cs).unwrap();

        for (x, z) in [(0u64, 1u64), (5, 0)] {
            let mut a = Assignment::new();
            a.set_u64("x", x);
            a.set_u64("z", z);
            let proof = prove(&r1cs, &pk, &a, false).unwrap();
            let mut public = Assignment::new();
            public.set_u64("z", z);
            verify(&proof, &vk, &public).unwrap();
        }

        // the wrong indicator is unsatisfiable
        let mut a = Assignment::new();
        a.set_u64("x", 5);
        a.set_u64("z", 1);
        assert!(prove(&r1cs, &pk, &a, false).is_err());
    }

    /// to_binary then from_binary must reproduce the input
    struct BitsRoundTrip;

    impl Circuit for BitsRoundTrip {
        fn define<F: PrimeField>(
            &self,
            api: &mut CircuitBuilder<F>,
        ) -> Result<(), CircuitError> {
            let x: LinearCombination<F> = api.secret_input("x")?.into();
            let y: LinearCombination<F> = api.public_input("y")?.into();
            let bits = api.to_binary(&x, 4)?;
            let recomposed = api.from_binary(&bits);
            api.assert_is_equal(&recomposed, &y);
            Ok(())
        }
    }

    #[test]
    fn test_binary_round_trip_and_overflow() {
        let r1cs = compile(&BitsRoundTrip, CurveId::Bn254).unwrap();
        let (pk, vk) = setup(&r1cs).unwrap();

        for x in 0u64..16 {
            let mut a = Assignment::new();
            a.set_u64("x", x);
            a.set_u64("y", x);
            let proof = prove(&r1cs, &pk, &a, false).unwrap();
            let mut public = Assignment::new();
            public.set_u64("y", x);
            verify(&proof, &vk, &public).unwrap();
        }

        // 16 does not fit four bits
        let mut a = Assignment::new();
        a.set_u64("x", 16);
        a.set_u64("y", 16);
        assert!(matches!(
            prove(&r1cs, &pk, &a, false),
            Err(ProofError::Solver(SolverError::UnsatisfiedConstraint { .. }))
        ));
    }

    /// cond ? a : b over BW6-761, whose scalar field is the BLS12-377
    /// base field
    struct SelectCircuit;

    impl Circuit for SelectCircuit {
        fn define<F: PrimeField>(
            &self,
            api: &mut CircuitBuilder<F>,
        ) -> Result<(), CircuitError> {
            let cond: LinearCombination<F> = api.secret_input("cond")?.into();
            let a: LinearCombination<F> = api.secret_input("a")?.into();
            let b: LinearCombination<F> = api.secret_input("b")?.into();
            let out: LinearCombination<F> = api.public_input("out")?.into();
            api.assert_is_boolean(&cond);
            let chosen = api.select(&cond, &a, &b)?;
            api.assert_is_equal(&chosen, &out);
            Ok(())
        }
    }

    #[test]
    fn test_select_over_bw6_761() {
        let r1cs = compile(&SelectCircuit, CurveId::Bw6_761).unwrap();
        let (pk, vk) = setup(&r1cs).unwrap();

        for (cond, expected) in [(1u64, 10u64), (0, 20)] {
            let mut a = Assignment::new();
            a.set_u64("cond", cond);
            a.set_u64("a", 10);
            a.set_u64("b", 20);
            a.set_u64("out", expected);
            let proof = prove(&r1cs, &pk, &a, false).unwrap();
            let mut public = Assignment::new();
            public.set_u64("out", expected);
            verify(&proof, &vk, &public).unwrap();
        }
    }

    #[test]
    fn test_compiled_circuit_metadata() {
        let r1cs = compile(&Cubic, CurveId::Bls12_377).unwrap();
        assert_eq!(r1cs.curve(), CurveId::Bls12_377);
        assert_eq!(r1cs.num_public_inputs(), 1);
        assert_eq!(r1cs.num_secret_inputs(), 1);
        assert_eq!(r1cs.curve().to_string(), "bls12-377");
        // same description compiles to the same digest
        let again = compile(&Cubic, CurveId::Bls12_377).unwrap();
        assert_eq!(r1cs.digest(), again.digest());
    }
}
