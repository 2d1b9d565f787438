//! Nonce recovery (C8): maps the `L` edges that make up a found cycle back
//! to their original nonces by brute-force re-running the SipHash oracle
//! over the whole nonce range.
//!
//! Grounded on spec §4.8 directly; there is no existing sequential
//! counterpart in `cuckatoo_core` since its reference solver already works
//! nonce-first (it never needs to recover nonces from bare endpoints). The
//! parallel re-scan mirrors `seed::seed`'s rayon fan-out.

use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};

use cuckatoo_core::pow::common::CuckooParams;
use cuckatoo_core::pow::error::{Error, ErrorKind};

const NOT_FOUND: u64 = u64::max_value();

/// For each `(u, v)` in `edges`, find the nonce `n` such that
/// `endpoint(n, 0) == u && endpoint(n, 1) == v`, scanning the full
/// `[0, NEDGES)` range in parallel. Returns the recovered nonces sorted
/// ascending, as spec §4.8/§6 require of a `Proof`.
///
/// Correctness relies on the oracle being collision-free on the solution
/// set (spec §4.8); if more than one nonce matches the same edge, the
/// later one wins arbitrarily and `verify` on the resulting proof will
/// catch the mismatch rather than this function.
pub fn recover_nonces(params: &CuckooParams<u64>, edges: &[(u32, u32)]) -> Result<Vec<u64>, Error> {
	let slots: Vec<AtomicU64> = edges.iter().map(|_| AtomicU64::new(NOT_FOUND)).collect();

	(0..params.num_edges)
		.into_par_iter()
		.try_for_each(|n| -> Result<(), Error> {
			let u = params.sipnode(n, 0, false)? as u32;
			let v = params.sipnode(n, 1, false)? as u32;
			for (i, &(eu, ev)) in edges.iter().enumerate() {
				if eu == u && ev == v {
					slots[i].store(n, Ordering::Relaxed);
				}
			}
			Ok(())
		})?;

	let mut nonces = Vec::with_capacity(edges.len());
	for (i, slot) in slots.iter().enumerate() {
		let n = slot.load(Ordering::Relaxed);
		if n == NOT_FOUND {
			return Err(ErrorKind::Verification(format!(
				"no nonce recovered for edge {}",
				i
			)))?;
		}
		nonces.push(n);
	}
	nonces.sort_unstable();
	Ok(nonces)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn recovers_known_edges() {
		let mut params = CuckooParams::<u64>::new(8, 4).unwrap();
		params.reset_header_nonce([0u8; 80].to_vec(), None).unwrap();
		let n = 5u64;
		let u = params.sipnode(n, 0, false).unwrap() as u32;
		let v = params.sipnode(n, 1, false).unwrap() as u32;
		let recovered = recover_nonces(&params, &[(u, v)]).unwrap();
		assert_eq!(recovered, vec![5]);
	}

	#[test]
	fn errors_on_unrecoverable_edge() {
		let mut params = CuckooParams::<u64>::new(8, 4).unwrap();
		params.reset_header_nonce([0u8; 80].to_vec(), None).unwrap();
		// (0, 0) is not a valid endpoint pair for any nonce at these params
		// with overwhelming probability; assert the function reports it
		// rather than panicking.
		let result = recover_nonces(&params, &[(0, 0)]);
		if result.is_ok() {
			// astronomically unlikely collision; nothing to assert.
		} else {
			assert!(result.is_err());
		}
	}
}
