//! Compiled rank-one constraint systems
//!
//! A `CompiledR1CS` is the frozen output of the compiler: the ordered
//! constraint list, the per-constraint solving annotations, the hint
//! table, and the wire layout `[one | public | secret | internal]`. It is
//! immutable, reusable across proofs, and safe to share between threads.

use crate::compiler;
use crate::errors::{ProofError, SolverError};
use crate::hints::{Hint, HintBinding};
use crate::lc::{Constraint, LinearCombination, Term, Wire};
use crate::serialize::{
    malformed, read_scalar, read_string, read_u32, read_u8, write_len, write_scalar,
    write_string, write_u32, write_u8, CountingReader, CountingWriter,
};
use ark_ff::PrimeField;
use sha3::{Digest, Sha3_256};
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Which factor of `a·b = c` holds the wire a constraint resolves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputWire {
    /// Pure check; every referenced wire is already known.
    None,
    A(usize),
    B(usize),
    C(usize),
}

/// Compile-time solving annotation for one constraint: the hint-bound
/// wires that fire here, then the wire (if any) solved by rearrangement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SolveStep {
    pub hints: Vec<usize>,
    pub output: OutputWire,
}

/// A frozen constraint system over the scalar field of one curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledR1CS<F: PrimeField> {
    pub(crate) constraints: Vec<Constraint<F>>,
    pub(crate) steps: Vec<SolveStep>,
    pub(crate) hints: BTreeMap<usize, HintBinding<F>>,
    pub(crate) num_public: usize,
    pub(crate) num_secret: usize,
    pub(crate) num_internal: usize,
    /// Named inputs in wire order: public inputs first, then secret.
    pub(crate) inputs: Vec<(String, usize)>,
}

impl<F: PrimeField> CompiledR1CS<F> {
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Total wire count, including the constant-one wire.
    pub fn num_wires(&self) -> usize {
        1 + self.num_public + self.num_secret + self.num_internal
    }

    /// One-wire plus public inputs; the statement visible to the verifier.
    pub fn num_instance(&self) -> usize {
        1 + self.num_public
    }

    pub fn num_public_inputs(&self) -> usize {
        self.num_public
    }

    pub fn num_secret_inputs(&self) -> usize {
        self.num_secret
    }

    /// Input names in wire order (public first, then secret).
    pub fn input_names(&self) -> impl Iterator<Item = &str> {
        self.inputs.iter().map(|(n, _)| n.as_str())
    }

    pub fn public_input_names(&self) -> Vec<String> {
        self.inputs
            .iter()
            .filter(|&&(_, w)| w < self.num_instance())
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// Check every constraint against a full witness.
    pub fn is_sat(&self, witness: &[F]) -> Result<(), SolverError> {
        if witness.len() != self.num_wires() {
            return Err(SolverError::SizeMismatch);
        }
        for (index, constraint) in self.constraints.iter().enumerate() {
            if !constraint.is_satisfied(witness) {
                return Err(SolverError::UnsatisfiedConstraint { index });
            }
        }
        Ok(())
    }

    /// Sha3-256 over the serialised body. Two compilations of the same
    /// circuit produce the same digest.
    pub fn digest(&self) -> [u8; 32] {
        let mut bytes = Vec::new();
        let mut w = CountingWriter::new(&mut bytes);
        self.write_body(&mut w)
            .expect("writing to a Vec cannot fail");
        let mut hasher = Sha3_256::new();
        hasher.update(&bytes);
        hasher.finalize().into()
    }

    pub(crate) fn write_body<W: Write>(&self, w: &mut CountingWriter<W>) -> Result<(), ProofError> {
        write_len(w, self.num_public)?;
        write_len(w, self.num_secret)?;
        write_len(w, self.num_internal)?;

        write_len(w, self.inputs.len())?;
        for (name, wire) in &self.inputs {
            write_string(w, name)?;
            write_u32(w, *wire as u32)?;
        }

        write_len(w, self.constraints.len())?;
        for constraint in &self.constraints {
            write_lc(w, &constraint.a)?;
            write_lc(w, &constraint.b)?;
            write_lc(w, &constraint.c)?;
        }

        write_len(w, self.hints.len())?;
        for (wire, binding) in &self.hints {
            write_u32(w, *wire as u32)?;
            write_u8(w, binding.hint.tag())?;
            write_len(w, binding.inputs.len())?;
            for lc in &binding.inputs {
                write_lc(w, lc)?;
            }
        }
        Ok(())
    }

    /// Reconstruct from the body layout and re-derive the solving
    /// annotations (they are a pure function of constraints and hints).
    pub(crate) fn read_body<R: Read>(r: &mut CountingReader<R>) -> Result<Self, ProofError> {
        let num_public = read_u32(r)? as usize;
        let num_secret = read_u32(r)? as usize;
        let num_internal = read_u32(r)? as usize;
        let num_wires = 1 + num_public + num_secret + num_internal;

        let read_wire = |r: &mut CountingReader<R>| -> Result<usize, ProofError> {
            let w = read_u32(r)? as usize;
            if w >= num_wires {
                return Err(malformed(r.offset(), format!("wire index {w} out of range")));
            }
            Ok(w)
        };

        let num_inputs = read_u32(r)? as usize;
        let mut inputs = Vec::with_capacity(num_inputs.min(4096));
        for _ in 0..num_inputs {
            let name = read_string(r)?;
            let wire = read_wire(r)?;
            inputs.push((name, wire));
        }

        let num_constraints = read_u32(r)? as usize;
        let mut constraints = Vec::with_capacity(num_constraints.min(4096));
        for _ in 0..num_constraints {
            let a = read_lc(r, num_wires)?;
            let b = read_lc(r, num_wires)?;
            let c = read_lc(r, num_wires)?;
            constraints.push(Constraint::new(a, b, c));
        }

        let num_hints = read_u32(r)? as usize;
        let mut hints = BTreeMap::new();
        for _ in 0..num_hints {
            let wire = read_wire(r)?;
            let tag = read_u8(r)?;
            let hint = Hint::from_tag(tag)
                .ok_or_else(|| malformed(r.offset(), format!("unknown hint tag {tag}")))?;
            let num_lcs = read_u32(r)? as usize;
            let mut lcs = Vec::with_capacity(num_lcs.min(4096));
            for _ in 0..num_lcs {
                lcs.push(read_lc(r, num_wires)?);
            }
            if hints.insert(wire, HintBinding { hint, inputs: lcs }).is_some() {
                return Err(malformed(r.offset(), format!("wire {wire} has two hints")));
            }
        }

        let steps = compiler::annotate(&constraints, &hints, 1 + num_public + num_secret, num_wires)
            .map_err(|e| malformed(r.offset(), e.to_string()))?;

        Ok(CompiledR1CS {
            constraints,
            steps,
            hints,
            num_public,
            num_secret,
            num_internal,
            inputs,
        })
    }
}

fn write_lc<F: PrimeField, W: Write>(
    w: &mut CountingWriter<W>,
    lc: &LinearCombination<F>,
) -> Result<(), ProofError> {
    write_len(w, lc.terms().len())?;
    for term in lc.terms() {
        write_scalar(w, &term.coeff)?;
        write_u32(w, term.wire.index() as u32)?;
    }
    Ok(())
}

fn read_lc<F: PrimeField, R: Read>(
    r: &mut CountingReader<R>,
    num_wires: usize,
) -> Result<LinearCombination<F>, ProofError> {
    let len = read_u32(r)? as usize;
    let mut terms = Vec::with_capacity(len.min(4096));
    for _ in 0..len {
        let coeff = read_scalar(r)?;
        let wire = read_u32(r)? as usize;
        if wire >= num_wires {
            return Err(malformed(r.offset(), format!("wire index {wire} out of range")));
        }
        terms.push(Term {
            coeff,
            wire: Wire(wire),
        });
    }
    Ok(LinearCombination::from_terms(terms))
}
