// Copyright 2018 The Grin Developers
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Types for a Cuckatoo/Cuckarood proof of work: the generic solver/verifier
//! interface, the nonce-array proof and a handful of canned parameter
//! presets used by tests and the CLI's `-s` flag.

use std::fmt;

use blake2::blake2b::blake2b;
use rand::{thread_rng, Rng};

use crate::pow::common::EdgeType;
use crate::pow::error::Error;

/// Generic trait for a solver/verifier providing a common interface into the
/// Cuckoo family of proofs of work. Mostly used for verification, but also
/// for solving when a `cuckatoo_trim`-backed context is plugged in.
pub trait PoWContext<T>
where
	T: EdgeType,
{
	/// Sets the header along with an optional nonce at the end. `solve`
	/// indicates whether to set up structures for a solve (true) or just
	/// validate (false).
	fn set_header_nonce(
		&mut self,
		header: Vec<u8>,
		nonce: Option<u32>,
		solve: bool,
	) -> Result<(), Error>;
	/// Find solutions using the stored parameters and header.
	fn find_cycles(&mut self) -> Result<Vec<Proof>, Error>;
	/// Verify a solution with the stored parameters.
	fn verify(&self, proof: &Proof) -> Result<(), Error>;
}

/// A canned `(edge_bits, proof_size, bucket_bits)` triple, so tests and the
/// CLI can refer to a size regime by name instead of assembling parameters
/// by hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsPreset {
	/// Toy parameters: instant solves, used throughout the test suite.
	AutomatedTesting,
	/// Mid-size parameters, large enough to exercise bucket partitioning.
	UserTesting,
	/// Full-size parameters matching the intended deployment target.
	Production,
}

impl ParamsPreset {
	/// Resolve this preset into `(edge_bits, proof_size, bucket_bits)`.
	pub fn params(self) -> (u8, usize, u8) {
		match self {
			ParamsPreset::AutomatedTesting => (8, 4, 4),
			ParamsPreset::UserTesting => (16, 42, 8),
			ParamsPreset::Production => (29, 42, 12),
		}
	}
}

/// A Cuckatoo/Cuckarood proof of work: the edge_bits used to size the graph
/// (the 2-log of the number of edges) and the ascending array of L nonces
/// that make up the cycle.
#[derive(Clone, PartialOrd, PartialEq, Serialize, Deserialize)]
pub struct Proof {
	/// Power of 2 used for the size of the graph
	pub edge_bits: u8,
	/// The nonces, in strictly ascending order
	pub nonces: Vec<u64>,
}

impl fmt::Debug for Proof {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Cuckatoo{}(", self.edge_bits)?;
		for (i, val) in self.nonces[..].iter().enumerate() {
			write!(f, "{:x}", val)?;
			if i < self.nonces.len() - 1 {
				write!(f, " ")?;
			}
		}
		write!(f, ")")
	}
}

impl fmt::Display for Proof {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}

impl Eq for Proof {}

impl Proof {
	/// Builds a proof with the provided nonces, re-sorted ascending, at the
	/// given edge_bits.
	pub fn new(mut in_nonces: Vec<u64>, edge_bits: u8) -> Proof {
		in_nonces.sort_unstable();
		Proof {
			edge_bits,
			nonces: in_nonces,
		}
	}

	/// Builds a proof with all nonces zeroed out, of the given proof_size.
	pub fn zero(proof_size: usize, edge_bits: u8) -> Proof {
		Proof {
			edge_bits,
			nonces: vec![0; proof_size],
		}
	}

	/// Builds a proof with random nonces, within edge_bits bits. Useful for
	/// tests that need a plausible-looking but not necessarily valid proof.
	pub fn random(proof_size: usize, edge_bits: u8) -> Proof {
		let nonce_mask = (1u64 << edge_bits) - 1;
		let mut rng = thread_rng();
		let mut v: Vec<u64> = (0..proof_size)
			.map(|_| rng.gen::<u64>() & nonce_mask)
			.collect();
		v.sort_unstable();
		Proof { edge_bits, nonces: v }
	}

	/// Returns the proof size (number of nonces).
	pub fn proof_size(&self) -> usize {
		self.nonces.len()
	}

	/// Advisory Blake2b-256 fingerprint of the packed nonces, used for
	/// display/logging purposes. Not part of the verification path.
	pub fn cyclehash(&self) -> [u8; 32] {
		let mut bytes = Vec::with_capacity(1 + self.nonces.len() * 8);
		bytes.push(self.edge_bits);
		for n in &self.nonces {
			bytes.extend_from_slice(&n.to_le_bytes());
		}
		let hash = blake2b(32, &[], &bytes);
		let mut out = [0u8; 32];
		out.copy_from_slice(hash.as_bytes());
		out
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn proof_serializes_round_trip() {
		let p = Proof::new(vec![5, 1, 3, 2], 8);
		assert_eq!(p.nonces, vec![1, 2, 3, 5]);
		let json = serde_json::to_string(&p).unwrap();
		let p2: Proof = serde_json::from_str(&json).unwrap();
		assert_eq!(p, p2);
	}

	#[test]
	fn preset_params() {
		assert_eq!(ParamsPreset::AutomatedTesting.params(), (8, 4, 4));
	}
}
