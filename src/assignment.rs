//! Input assignments and the witness wire format
//!
//! An `Assignment` maps input names to values without committing to a
//! curve: values are big-endian byte strings reduced into the active
//! scalar field when the solver runs. This is what lets one circuit
//! definition prove over any of the supported curves.

use crate::errors::ProofError;
use crate::serialize::{read_scalar, read_u32, write_len, write_scalar, CountingReader, CountingWriter};
use ark_ff::PrimeField;
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// Values for the public and secret input wires, keyed by input name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Assignment {
    values: BTreeMap<String, Vec<u8>>,
}

impl Assignment {
    pub fn new() -> Self {
        Assignment::default()
    }

    /// Assign a small integer value.
    pub fn set_u64(&mut self, name: &str, value: u64) -> &mut Self {
        self.set_bytes(name, &value.to_be_bytes())
    }

    /// Assign a big-endian integer, reduced modulo the scalar field of
    /// whichever curve the circuit is proved over.
    pub fn set_bytes(&mut self, name: &str, big_endian: &[u8]) -> &mut Self {
        self.values.insert(name.to_string(), big_endian.to_vec());
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn value_of<F: PrimeField>(&self, name: &str) -> Option<F> {
        self.values
            .get(name)
            .map(|bytes| F::from_be_bytes_mod_order(bytes))
    }
}

/// Write witness values as `uint32 nbElements | element…`. Used for both
/// full `[public | secret]` witnesses and public-only witnesses.
pub fn write_witness<F: PrimeField, W: Write>(values: &[F], sink: W) -> Result<(), ProofError> {
    let mut w = CountingWriter::new(sink);
    write_len(&mut w, values.len())?;
    for value in values {
        write_scalar(&mut w, value)?;
    }
    Ok(())
}

/// Read a witness in the wire format, checking the element count.
pub fn read_witness<F: PrimeField, R: Read>(
    source: R,
    expected: usize,
) -> Result<Vec<F>, ProofError> {
    let mut r = CountingReader::new(source);
    let len = read_u32(&mut r)? as usize;
    if len != expected {
        return Err(crate::errors::SolverError::SizeMismatch.into());
    }
    let mut out = Vec::with_capacity(len.min(4096));
    for _ in 0..len {
        out.push(read_scalar(&mut r)?);
    }
    Ok(out)
}
