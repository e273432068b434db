//! Lowers a circuit description into a frozen constraint system
//!
//! Compilation assigns final wire numbers in the layout
//! `[one | public | secret | internal]`, re-canonicalises every linear
//! combination under that numbering, and annotates each constraint with
//! its solving action: which hint-bound wires fire there and which wire
//! (if any) the constraint resolves by rearrangement. A constraint may
//! resolve at most one unknown wire.

use crate::builder::{Circuit, CircuitBuilder};
use crate::errors::CircuitError;
use crate::hints::HintBinding;
use crate::lc::{Constraint, Wire, WireClass};
use crate::r1cs::{CompiledR1CS, OutputWire, SolveStep};
use crate::timer::{note, stage};
use ark_ff::PrimeField;
use std::collections::BTreeMap;

/// Run a circuit definition and freeze the result.
pub fn compile<F: PrimeField, C: Circuit>(circuit: &C) -> Result<CompiledR1CS<F>, CircuitError> {
    let mut builder = CircuitBuilder::new();
    circuit.define(&mut builder)?;
    freeze(builder)
}

pub(crate) fn freeze<F: PrimeField>(
    builder: CircuitBuilder<F>,
) -> Result<CompiledR1CS<F>, CircuitError> {
    let _timer = stage("compile");

    let num_public = count(&builder.classes, WireClass::Public);
    let num_secret = count(&builder.classes, WireClass::Secret);
    let num_internal = count(&builder.classes, WireClass::Internal);
    let num_wires = builder.classes.len();

    // Final numbering: one wire, publics, secrets, internals, each group
    // in allocation order.
    let mut renumber = vec![0usize; num_wires];
    let mut next_public = 1;
    let mut next_secret = 1 + num_public;
    let mut next_internal = 1 + num_public + num_secret;
    for (old, class) in builder.classes.iter().enumerate() {
        renumber[old] = match class {
            WireClass::One => 0,
            WireClass::Public => post_inc(&mut next_public),
            WireClass::Secret => post_inc(&mut next_secret),
            WireClass::Internal => post_inc(&mut next_internal),
        };
    }

    let constraints: Vec<Constraint<F>> = builder
        .constraints
        .into_iter()
        .map(|c| {
            Constraint::new(
                c.a.map_wires(|w| Wire(renumber[w.index()])),
                c.b.map_wires(|w| Wire(renumber[w.index()])),
                c.c.map_wires(|w| Wire(renumber[w.index()])),
            )
        })
        .collect();

    let mut hints = BTreeMap::new();
    for (wire, binding) in builder.hints {
        let inputs = binding
            .inputs
            .iter()
            .map(|lc| lc.map_wires(|w| Wire(renumber[w.index()])))
            .collect();
        hints.insert(
            renumber[wire.index()],
            HintBinding {
                hint: binding.hint,
                inputs,
            },
        );
    }

    let mut inputs: Vec<(String, usize)> = builder
        .input_names
        .into_iter()
        .map(|(name, wire)| (name, renumber[wire.index()]))
        .collect();
    inputs.sort_by_key(|&(_, wire)| wire);

    let num_supplied = 1 + num_public + num_secret;
    let steps = annotate(&constraints, &hints, num_supplied, num_wires)?;

    note(&format!("number_of_constraints {}", constraints.len()));
    note(&format!(
        "number_of_wires {num_wires} (public {num_public}, secret {num_secret}, internal {num_internal})"
    ));

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

/// Determine, in constraint order, how the solver will resolve every
/// wire. Also the consistency check: every internal wire must be bound by
/// exactly one constraint output or one hint.
pub(crate) fn annotate<F: PrimeField>(
    constraints: &[Constraint<F>],
    hints: &BTreeMap<usize, HintBinding<F>>,
    num_supplied: usize,
    num_wires: usize,
) -> Result<Vec<SolveStep>, CircuitError> {
    let mut solved = vec![false; num_wires];
    for known in solved.iter_mut().take(num_supplied) {
        *known = true;
    }

    let mut steps = Vec::with_capacity(constraints.len());
    for (index, constraint) in constraints.iter().enumerate() {
        let factors = [&constraint.a, &constraint.b, &constraint.c];

        // Fire hints whose inputs are resolvable, to a fixpoint: one hint
        // may feed another within the same constraint.
        let mut fired = Vec::new();
        loop {
            let mut progressed = false;
            for lc in factors {
                for term in lc.terms() {
                    let wire = term.wire.index();
                    if solved[wire] {
                        continue;
                    }
                    if let Some(binding) = hints.get(&wire) {
                        let ready = binding.inputs.iter().all(|input| {
                            input.terms().iter().all(|t| solved[t.wire.index()])
                        });
                        if ready {
                            solved[wire] = true;
                            fired.push(wire);
                            progressed = true;
                        }
                    }
                }
            }
            if !progressed {
                break;
            }
        }

        let mut unknowns: Vec<usize> = Vec::new();
        for lc in factors {
            for term in lc.terms() {
                let wire = term.wire.index();
                if !solved[wire] && !unknowns.contains(&wire) {
                    unknowns.push(wire);
                }
            }
        }

        let output = match unknowns.as_slice() {
            [] => OutputWire::None,
            &[wire] => {
                if hints.contains_key(&wire) {
                    return Err(CircuitError::InvalidCircuit(format!(
                        "hint inputs for wire {wire} are unresolved at constraint {index}"
                    )));
                }
                let w = Wire(wire);
                let positions = (
                    constraint.a.coeff_of(w).is_some(),
                    constraint.b.coeff_of(w).is_some(),
                    constraint.c.coeff_of(w).is_some(),
                );
                let output = match positions {
                    (true, false, false) => OutputWire::A(wire),
                    (false, true, false) => OutputWire::B(wire),
                    (false, false, true) => OutputWire::C(wire),
                    _ => {
                        return Err(CircuitError::InvalidCircuit(format!(
                            "wire {wire} appears in several factors of constraint {index}"
                        )))
                    }
                };
                solved[wire] = true;
                output
            }
            _ => {
                return Err(CircuitError::InvalidCircuit(format!(
                    "constraint {index} has {} unresolved wires",
                    unknowns.len()
                )))
            }
        };

        steps.push(SolveStep {
            hints: fired,
            output,
        });
    }

    for (wire, known) in solved.iter().enumerate().skip(num_supplied) {
        if !known && !hints.contains_key(&wire) {
            return Err(CircuitError::InvalidCircuit(format!(
                "internal wire {wire} has no solving constraint or hint"
            )));
        }
    }

    Ok(steps)
}

fn count(classes: &[WireClass], class: WireClass) -> usize {
    classes.iter().filter(|&&c| c == class).count()
}

fn post_inc(n: &mut usize) -> usize {
    let v = *n;
    *n += 1;
    v
}
