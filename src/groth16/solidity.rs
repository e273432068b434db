//! Solidity verifier export
//!
//! Renders a self-contained verifier contract around the EVM's BN254
//! precompiles (ecAdd at 0x06, ecMul at 0x07, pairing at 0x08). Only
//! BN254 is exportable; the dispatch layer rejects the other curves. G2
//! coordinates are emitted imaginary-part first, as the pairing
//! precompile expects.

use super::VerifyingKey;
use crate::errors::ProofError;
use ark_bn254::{Bn254, Fq, Fq2};
use ark_ec::pairing::Pairing;
use ark_ec::AffineRepr;
use std::io::Write;

type G1 = <Bn254 as Pairing>::G1Affine;
type G2 = <Bn254 as Pairing>::G2Affine;

pub fn export_solidity<W: Write>(vk: &VerifyingKey<Bn254>, sink: &mut W) -> Result<(), ProofError> {
    let alpha = g1_coords(&vk.alpha_g1)?;
    let beta = g2_coords(&vk.beta_g2)?;
    let gamma = g2_coords(&vk.gamma_g2)?;
    let delta = g2_coords(&vk.delta_g2)?;

    sink.write_all(HEADER.as_bytes())?;
    writeln!(
        sink,
        "        vk.alpha = Pairing.G1Point({}, {});",
        alpha.0, alpha.1
    )?;
    writeln!(sink, "        vk.beta = {};", g2_literal(&beta))?;
    writeln!(sink, "        vk.gamma = {};", g2_literal(&gamma))?;
    writeln!(sink, "        vk.delta = {};", g2_literal(&delta))?;
    writeln!(
        sink,
        "        vk.ic = new Pairing.G1Point[]({});",
        vk.gamma_abc_g1.len()
    )?;
    for (i, point) in vk.gamma_abc_g1.iter().enumerate() {
        let (x, y) = g1_coords(point)?;
        writeln!(sink, "        vk.ic[{i}] = Pairing.G1Point({x}, {y});")?;
    }
    sink.write_all(FOOTER.as_bytes())?;
    Ok(())
}

fn g1_coords(p: &G1) -> Result<(String, String), ProofError> {
    let (x, y) = p.xy().ok_or_else(infinity)?;
    Ok((fq_dec(&x), fq_dec(&y)))
}

fn g2_coords(p: &G2) -> Result<(Fq2, Fq2), ProofError> {
    p.xy().ok_or_else(infinity)
}

fn g2_literal(coords: &(Fq2, Fq2)) -> String {
    format!(
        "Pairing.G2Point([{}, {}], [{}, {}])",
        fq_dec(&coords.0.c1),
        fq_dec(&coords.0.c0),
        fq_dec(&coords.1.c1),
        fq_dec(&coords.1.c0)
    )
}

fn fq_dec(v: &Fq) -> String {
    use ark_ff::PrimeField;
    v.into_bigint().to_string()
}

fn infinity() -> ProofError {
    ProofError::Serialization {
        offset: 0,
        message: "verifying key contains the point at infinity".into(),
    }
}

const HEADER: &str = r#"// SPDX-License-Identifier: Apache-2.0
pragma solidity ^0.8.0;

library Pairing {
    struct G1Point {
        uint256 x;
        uint256 y;
    }

    struct G2Point {
        uint256[2] x;
        uint256[2] y;
    }

    function negate(G1Point memory p) internal pure returns (G1Point memory) {
        uint256 q = 21888242871839275222246405745257275088696311157297823662689037894645226208583;
        if (p.x == 0 && p.y == 0) {
            return G1Point(0, 0);
        }
        return G1Point(p.x, q - (p.y % q));
    }

    function add(G1Point memory a, G1Point memory b) internal view returns (G1Point memory r) {
        uint256[4] memory input = [a.x, a.y, b.x, b.y];
        bool ok;
        assembly {
            ok := staticcall(gas(), 6, input, 0x80, r, 0x40)
        }
        require(ok, "ec-add failed");
    }

    function mul(G1Point memory p, uint256 s) internal view returns (G1Point memory r) {
        uint256[3] memory input = [p.x, p.y, s];
        bool ok;
        assembly {
            ok := staticcall(gas(), 7, input, 0x60, r, 0x40)
        }
        require(ok, "ec-mul failed");
    }

    function pairingCheck(G1Point[4] memory g1, G2Point[4] memory g2) internal view returns (bool) {
        uint256[24] memory input;
        for (uint256 i = 0; i < 4; i++) {
            input[i * 6 + 0] = g1[i].x;
            input[i * 6 + 1] = g1[i].y;
            input[i * 6 + 2] = g2[i].x[0];
            input[i * 6 + 3] = g2[i].x[1];
            input[i * 6 + 4] = g2[i].y[0];
            input[i * 6 + 5] = g2[i].y[1];
        }
        uint256[1] memory out;
        bool ok;
        assembly {
            ok := staticcall(gas(), 8, input, 0x300, out, 0x20)
        }
        require(ok, "pairing failed");
        return out[0] == 1;
    }
}

contract Groth16Verifier {
    struct VerifyingKey {
        Pairing.G1Point alpha;
        Pairing.G2Point beta;
        Pairing.G2Point gamma;
        Pairing.G2Point delta;
        Pairing.G1Point[] ic;
    }

    struct Proof {
        Pairing.G1Point a;
        Pairing.G2Point b;
        Pairing.G1Point c;
    }

    function verifyingKey() internal pure returns (VerifyingKey memory vk) {
"#;

const FOOTER: &str = r#"    }

    function verifyProof(
        uint256[2] memory a,
        uint256[2][2] memory b,
        uint256[2] memory c,
        uint256[] memory input
    ) public view returns (bool) {
        VerifyingKey memory vk = verifyingKey();
        require(input.length + 1 == vk.ic.length, "bad input length");
        Pairing.G1Point memory vkX = vk.ic[0];
        for (uint256 i = 0; i < input.length; i++) {
            vkX = Pairing.add(vkX, Pairing.mul(vk.ic[i + 1], input[i]));
        }
        Proof memory proof = Proof(
            Pairing.G1Point(a[0], a[1]),
            Pairing.G2Point(b[0], b[1]),
            Pairing.G1Point(c[0], c[1])
        );
        return Pairing.pairingCheck(
            [Pairing.negate(proof.a), vk.alpha, vkX, proof.c],
            [proof.b, vk.beta, vk.gamma, vk.delta]
        );
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Circuit, CircuitBuilder};
    use crate::compiler::compile;
    use crate::errors::CircuitError;
    use crate::groth16::setup;
    use crate::lc::LinearCombination;

    struct Square;

    impl Circuit for Square {
        fn define<F: ark_ff::PrimeField>(
            &self,
            api: &mut CircuitBuilder<F>,
        ) -> Result<(), CircuitError> {
            let x: LinearCombination<F> = api.secret_input("x")?.into();
            let y: LinearCombination<F> = api.public_input("y")?.into();
            let sq = api.mul(&x, &x)?;
            api.assert_is_equal(&sq, &y);
            Ok(())
        }
    }

    #[test]
    fn test_export_contains_ic_points() {
        let r1cs = compile::<ark_bn254::Fr, _>(&Square).unwrap();
        let (_, vk) = setup::<Bn254>(&r1cs, &mut rand::rngs::OsRng).unwrap();
        let mut out = Vec::new();
        export_solidity(&vk, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("contract Groth16Verifier"));
        assert!(text.contains("vk.ic = new Pairing.G1Point[](2);"));
        assert!(text.contains("vk.ic[1]"));
    }
}
