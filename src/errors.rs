//! Error types for circuit compilation, witness solving, and proving

use thiserror::Error;

/// Errors raised while a circuit is being built or compiled.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CircuitError {
    #[error("invalid circuit: {0}")]
    InvalidCircuit(String),
    #[error("wire count exceeds the supported maximum")]
    TooManyWires,
    #[error("input {0} is declared twice")]
    DuplicateInput(String),
}

/// Errors raised while computing a witness from an input assignment.
///
/// These are reported to the caller unchanged; the cryptographic layers
/// never rewrap them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("constraint {index} is not satisfied")]
    UnsatisfiedConstraint { index: usize },
    #[error("division by zero while solving constraint {constraint}")]
    DivisionByZero { constraint: usize },
    #[error("no value assigned to input {name}")]
    MissingInput { name: String },
    #[error("witness length does not match the constraint system")]
    SizeMismatch,
    #[error("hint failed on constraint {constraint}: {message}")]
    Hint { constraint: usize, message: String },
}

/// Errors raised by the Groth16 stages and the curve dispatch layer.
#[derive(Error, Debug)]
pub enum ProofError {
    #[error("setup failed: {0}")]
    Setup(String),
    #[error("prove failed: {0}")]
    Prove(String),
    #[error("artifacts belong to different curves")]
    CurveMismatch,
    #[error("operation is not supported for this curve")]
    UnsupportedCurve,
    #[error("serialization error at byte {offset}: {message}")]
    Serialization { offset: u64, message: String },
    #[error("proof rejected")]
    InvalidProof,
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
