//! Groth16 zkSNARK toolkit over the arkworks pairing curves
//!
//! Circuits are described against [`CircuitBuilder`], compiled into a
//! rank-one constraint system, solved into a witness from a named input
//! assignment, and proved/verified with Groth16 over one of four curves
//! (BN254, BLS12-377, BLS12-381, BW6-761).
//!
//! # Workflow
//! ```ignore
//! let r1cs = compile(&MyCircuit, CurveId::Bn254)?;
//! let (pk, vk) = setup(&r1cs)?;
//! let proof = prove(&r1cs, &pk, &assignment, false)?;
//! verify(&proof, &vk, &public_assignment)?;
//! ```
//!
//! The front-end is symbolic until forced: affine combinations are free,
//! and only multiplications, assertions, and hint-bound wires cost
//! constraints.

pub mod assignment;
pub mod builder;
pub mod compiler;
pub mod dispatch;
pub mod errors;
pub mod groth16;
pub mod hints;
pub mod lc;
pub mod math;
pub mod r1cs;
mod serialize;
pub mod solver;
pub mod timer;

// Re-exports
pub use assignment::{read_witness, write_witness, Assignment};
pub use builder::{Circuit, CircuitBuilder};
pub use dispatch::{
    compile, dummy_setup, export_solidity, prove, read_and_prove, read_and_verify, setup,
    verify, CompiledCircuit, CurveId, Proof, ProvingKey, VerifyingKey,
};
pub use errors::{CircuitError, ProofError, SolverError};
pub use hints::Hint;
pub use lc::{LinearCombination, Wire, WireClass};
pub use r1cs::CompiledR1CS;
pub use solver::{solve, solve_with, SolverOptions};
