//! Length-prefixed big-endian framing shared by every artifact
//!
//! Scalars are fixed-size big-endian arrays of ceil(field_bits/8) bytes;
//! group elements use the curve's compressed point encoding; vectors carry
//! a u32 length prefix. Readers and writers track their byte offset so
//! malformed-buffer errors can point at the failure.

use crate::errors::ProofError;
use ark_ff::{BigInteger, PrimeField};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

pub(crate) struct CountingWriter<W: Write> {
    inner: W,
    offset: u64,
}

impl<W: Write> CountingWriter<W> {
    pub(crate) fn new(inner: W) -> Self {
        CountingWriter { inner, offset: 0 }
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.offset += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

pub(crate) struct CountingReader<R: Read> {
    inner: R,
    offset: u64,
}

impl<R: Read> CountingReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        CountingReader { inner, offset: 0 }
    }

    pub(crate) fn offset(&self) -> u64 {
        self.offset
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.offset += n as u64;
        Ok(n)
    }
}

pub(crate) fn malformed(offset: u64, message: impl Into<String>) -> ProofError {
    ProofError::Serialization {
        offset,
        message: message.into(),
    }
}

pub(crate) fn write_u8<W: Write>(w: &mut CountingWriter<W>, v: u8) -> Result<(), ProofError> {
    w.write_u8(v).map_err(|e| malformed(w.offset(), e.to_string()))
}

pub(crate) fn read_u8<R: Read>(r: &mut CountingReader<R>) -> Result<u8, ProofError> {
    r.read_u8().map_err(|e| malformed(r.offset(), e.to_string()))
}

pub(crate) fn write_u32<W: Write>(w: &mut CountingWriter<W>, v: u32) -> Result<(), ProofError> {
    w.write_u32::<BigEndian>(v)
        .map_err(|e| malformed(w.offset(), e.to_string()))
}

pub(crate) fn read_u32<R: Read>(r: &mut CountingReader<R>) -> Result<u32, ProofError> {
    r.read_u32::<BigEndian>()
        .map_err(|e| malformed(r.offset(), e.to_string()))
}

pub(crate) fn write_len<W: Write>(w: &mut CountingWriter<W>, len: usize) -> Result<(), ProofError> {
    let v = u32::try_from(len).map_err(|_| malformed(w.offset(), "length exceeds u32"))?;
    write_u32(w, v)
}

pub(crate) fn write_string<W: Write>(
    w: &mut CountingWriter<W>,
    s: &str,
) -> Result<(), ProofError> {
    write_len(w, s.len())?;
    w.write_all(s.as_bytes())
        .map_err(|e| malformed(w.offset(), e.to_string()))
}

pub(crate) fn read_string<R: Read>(r: &mut CountingReader<R>) -> Result<String, ProofError> {
    let len = read_u32(r)? as usize;
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)
        .map_err(|e| malformed(r.offset(), e.to_string()))?;
    String::from_utf8(buf).map_err(|_| malformed(r.offset(), "string is not valid utf-8"))
}

/// Serialized size of a scalar of the field, ceil(field_bits/8).
pub(crate) fn scalar_byte_len<F: PrimeField>() -> usize {
    (F::MODULUS_BIT_SIZE as usize + 7) / 8
}

pub(crate) fn write_scalar<F: PrimeField, W: Write>(
    w: &mut CountingWriter<W>,
    s: &F,
) -> Result<(), ProofError> {
    let repr = s.into_bigint().to_bytes_be();
    let start = repr.len() - scalar_byte_len::<F>();
    w.write_all(&repr[start..])
        .map_err(|e| malformed(w.offset(), e.to_string()))
}

pub(crate) fn read_scalar<F: PrimeField, R: Read>(
    r: &mut CountingReader<R>,
) -> Result<F, ProofError> {
    let mut buf = vec![0u8; scalar_byte_len::<F>()];
    r.read_exact(&mut buf)
        .map_err(|e| malformed(r.offset(), e.to_string()))?;
    let v = F::from_be_bytes_mod_order(&buf);
    // a canonical encoding round-trips; anything >= the modulus does not
    let repr = v.into_bigint().to_bytes_be();
    if repr[repr.len() - buf.len()..] != buf[..] {
        return Err(malformed(r.offset(), "scalar is not in canonical form"));
    }
    Ok(v)
}

pub(crate) fn write_point<T: CanonicalSerialize, W: Write>(
    w: &mut CountingWriter<W>,
    p: &T,
) -> Result<(), ProofError> {
    let at = w.offset();
    p.serialize_compressed(&mut *w)
        .map_err(|e| malformed(at, e.to_string()))
}

pub(crate) fn read_point<T: CanonicalDeserialize, R: Read>(
    r: &mut CountingReader<R>,
) -> Result<T, ProofError> {
    let at = r.offset();
    T::deserialize_compressed(&mut *r).map_err(|e| malformed(at, e.to_string()))
}

pub(crate) fn write_point_vec<T: CanonicalSerialize, W: Write>(
    w: &mut CountingWriter<W>,
    points: &[T],
) -> Result<(), ProofError> {
    write_len(w, points.len())?;
    for p in points {
        write_point(w, p)?;
    }
    Ok(())
}

pub(crate) fn read_point_vec<T: CanonicalDeserialize, R: Read>(
    r: &mut CountingReader<R>,
) -> Result<Vec<T>, ProofError> {
    let len = read_u32(r)? as usize;
    let mut out = Vec::with_capacity(len.min(4096));
    for _ in 0..len {
        out.push(read_point(r)?);
    }
    Ok(out)
}
