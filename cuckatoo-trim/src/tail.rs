//! Tail / edge export (C6): flattens the final generation of an arena into
//! a plain host-side vector of uncompressed `(u, v)` node pairs.
//!
//! Grounded on `cuckatoo_core::pow::lean::Lean::trim`'s final `edges_iter`
//! hand-off to the reference cycle finder; here it reads from a
//! `BucketArena` of widened `Slot::Pair` entries instead of a single
//! bitmap.

use cuckatoo_core::pow::error::{Error, ErrorKind};
use log::warn;

use crate::arena::{BucketArena, Slot};

/// Flatten every bucket of `arena` (which must already hold only
/// `Slot::Pair` entries — i.e. a post-widen generation) into one edge list.
/// If more than `max_edges` survive, the excess is truncated and the solve
/// is abandoned for this nonce rather than handed to the cycle finder
/// (spec §7: "MAXEDGES overflow... logged; the excess is truncated and the
/// solve is abandoned for this nonce").
pub fn export(arena: &BucketArena, max_edges: usize) -> Result<Vec<(u32, u32)>, Error> {
	let mut edges = Vec::with_capacity(arena.total_len().min(max_edges + 1));
	for b in 0..arena.num_buckets() {
		for slot in arena.bucket(b) {
			match slot {
				Slot::Pair(u, v) => edges.push((u, v)),
				Slot::Nonce(_) => return Err(ErrorKind::EdgeAddition)?,
			}
		}
	}
	if edges.len() > max_edges {
		warn!(
			"tail export: {} survivors exceeds max_edges {}, truncating and abandoning this nonce",
			edges.len(),
			max_edges
		);
		edges.truncate(max_edges);
		return Err(ErrorKind::NoSolution)?;
	}
	Ok(edges)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn exports_all_pairs_across_buckets() {
		let arena = BucketArena::new(2, 4);
		arena.push(0, Slot::Pair(1, 2));
		arena.push(1, Slot::Pair(3, 4));
		let edges = export(&arena, 16).unwrap();
		assert_eq!(edges.len(), 2);
		assert!(edges.contains(&(1, 2)));
		assert!(edges.contains(&(3, 4)));
	}

	#[test]
	fn overflow_truncates_and_errors() {
		let arena = BucketArena::new(1, 8);
		for i in 0..4u32 {
			arena.push(0, Slot::Pair(i, i + 1));
		}
		let result = export(&arena, 2);
		assert!(result.is_err());
	}

	#[test]
	fn rejects_unwidened_nonce_slots() {
		let arena = BucketArena::new(1, 4);
		arena.push(0, Slot::Nonce(7));
		assert!(export(&arena, 16).is_err());
	}
}
