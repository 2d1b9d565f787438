//! Trimmer (orchestrator): wires the seeder, the trim round schedule, the
//! tag relay, the tail export, the cycle finder and nonce recovery into one
//! `solve(header, nonce)` call.
//!
//! Grounded on `cuckatoo_core::pow::lean::Lean::find_cycles`, which is the
//! teacher's own "run a trimmer, then hand its survivors to the cycle
//! finder" shape; generalized here to the bucketed, multi-round pipeline
//! instead of `Lean`'s single bitmap pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};

use cuckatoo_core::pow::common::CuckooParams;
use cuckatoo_core::pow::error::{Error, ErrorKind};
use cuckatoo_core::pow::types::Proof;

use crate::arena::BucketArena;
use crate::{cycle, recover, relay, seed, tail, trim};

/// Per-round survivor counts and overflow tally for one `solve` call,
/// exposed so tests (and the CLI's `-c` stats flag) can assert monotonic
/// decrease and detect capacity regressions (spec §9: "expose survivor
/// counts per round via an observer callback").
#[derive(Debug, Clone, Default)]
pub struct SolveStats {
	/// Survivor count after the seed and after each trim round, in order.
	pub round_survivors: Vec<usize>,
	/// Total edges dropped to bucket overflow across the whole solve.
	pub overflow: usize,
	/// Number of duplicate `(u, v)` pairs the cycle finder deduplicated at
	/// insertion (spec §4.7: "the caller receives a duplicate count").
	pub duplicate_edges: usize,
}

/// Bucketed trimming pipeline for one `(edge_bits, proof_size, bucket_bits)`
/// parameter set. A `Trimmer` owns its arenas and is reused across the
/// nonce range a caller iterates over; `set_header_nonce` rekeys it without
/// reallocating.
pub struct Trimmer {
	params: CuckooParams<u64>,
	bucket_bits: u8,
	ntrims: usize,
	max_edges: usize,
	max_sols: u32,
	cancel: Arc<AtomicBool>,
	arena_a: BucketArena,
	arena_b: BucketArena,
}

impl Trimmer {
	/// Build a trimmer for the given sizing. `ntrims` must be even and at
	/// least 2 (it must include the round-2 widening step); `bucket_bits`
	/// must be strictly less than `edge_bits`. `idx_shift` is spec §2's
	/// `IDXSHIFT` (S): the tail export bounds survivors to
	/// `NEDGES >> idx_shift` (spec §7's `MAXEDGES` overflow rule).
	pub fn new(
		edge_bits: u8,
		proof_size: usize,
		bucket_bits: u8,
		idx_shift: u8,
		ntrims: usize,
		max_sols: u32,
	) -> Result<Trimmer, Error> {
		if bucket_bits >= edge_bits {
			return Err(ErrorKind::Verification(
				"bucket_bits must be smaller than edge_bits".to_owned(),
			))?;
		}
		if idx_shift >= edge_bits {
			return Err(ErrorKind::Verification(
				"idx_shift must be smaller than edge_bits".to_owned(),
			))?;
		}
		if ntrims < 3 {
			return Err(ErrorKind::Verification(
				"ntrims must be at least 3 (round 2 widens surviving slots to pairs)".to_owned(),
			))?;
		}
		let params = CuckooParams::new(edge_bits, proof_size)?;
		let num_buckets = 1usize << bucket_bits;
		// Slack factor loosely mirrors spec §4.2's NEPS_A/NEPS_B headroom:
		// more room in early (nonce-only) rounds than in the widened,
		// pair-carrying tail of the schedule.
		let capacity = (params.num_edges as usize / num_buckets) * 2 + 64;
		let max_edges = (params.num_edges as usize) >> idx_shift;
		Ok(Trimmer {
			params,
			bucket_bits,
			ntrims,
			max_edges,
			max_sols,
			cancel: Arc::new(AtomicBool::new(false)),
			arena_a: BucketArena::new(num_buckets, capacity),
			arena_b: BucketArena::new(num_buckets, capacity),
		})
	}

	/// A clonable handle that can be used to cancel an in-flight `solve`
	/// from another thread (spec §5: "a cooperative boolean flag is polled
	/// at round boundaries").
	pub fn cancel_handle(&self) -> Arc<AtomicBool> {
		self.cancel.clone()
	}

	/// Rekey the SipHash oracle for a new header/nonce pair.
	pub fn set_header_nonce(&mut self, header: Vec<u8>, nonce: Option<u32>) -> Result<(), Error> {
		self.params.reset_header_nonce(header, nonce)
	}

	/// Run the full pipeline once against the currently configured sipkeys,
	/// calling `on_round(round_index, survivor_count)` after every round.
	pub fn solve_with_observer(
		&mut self,
		mut on_round: impl FnMut(usize, usize),
	) -> Result<(Vec<Proof>, SolveStats), Error> {
		self.arena_a.clear();
		self.arena_b.clear();
		let mut stats = SolveStats::default();

		seed::seed(&self.params, self.bucket_bits, 0, self.params.num_edges, &self.arena_a)?;
		stats.round_survivors.push(self.arena_a.total_len());
		stats.overflow += self.arena_a.total_overflow();
		on_round(0, self.arena_a.total_len());

		let mut src_is_a = true;
		for r in 0..self.ntrims {
			if self.cancel.load(Ordering::Relaxed) {
				debug!("trim cancelled at round {}", r);
				return Err(ErrorKind::Cancelled)?;
			}
			let side = (r % 2) as u64;
			let widen = r == 2;
			let (src, dst) = if src_is_a {
				(&self.arena_a, &self.arena_b)
			} else {
				(&self.arena_b, &self.arena_a)
			};
			dst.clear();
			let n = trim::trim_round(&self.params, self.bucket_bits, side, widen, src, dst)?;
			stats.round_survivors.push(n);
			stats.overflow += dst.total_overflow();
			on_round(r + 1, n);
			src_is_a = !src_is_a;
		}

		let final_arena = if src_is_a { &self.arena_a } else { &self.arena_b };
		let edges = match tail::export(final_arena, self.max_edges) {
			Ok(edges) => edges,
			Err(_) => {
				info!("tail export exceeded max_edges; abandoning this nonce");
				return Ok((vec![], stats));
			}
		};

		let (cycles, duplicates) =
			cycle::find_cycles(&edges, self.params.num_edges, self.params.proof_size, self.max_sols)?;
		stats.duplicate_edges = duplicates;
		let mut proofs = Vec::with_capacity(cycles.len());
		let mut found_nonces: Vec<Vec<u64>> = Vec::with_capacity(cycles.len());
		for sol in &cycles {
			let selected: Vec<(u32, u32)> = sol.iter().map(|&i| edges[i as usize]).collect();
			let nonces = recover::recover_nonces(&self.params, &selected)?;
			found_nonces.push(nonces.clone());
			proofs.push(Proof::new(nonces, self.params.edge_bits));
		}

		// Tag relay (C5), wired into the default solve path per spec §2's
		// "(C4/C5 interleaved tail)" flow: run a single relay pass over the
		// tail-exported edges and look for any L-cycle that has fully
		// collapsed into a 2-edge cycle of the relayed graph. One relay
		// pass reaches exactly this state for `proof_size == 4` (spec §9:
		// ⌈L/2⌉−1 relay rounds collapse a surviving L-cycle to 2 edges; for
		// L=4 that is a single round). At larger proof sizes a single pass
		// rarely collapses a whole cycle in one step, so this is additive
		// to — never a replacement for — the direct search above, which
		// stays the authoritative path.
		if (proofs.len() as u32) < self.max_sols {
			for extra in self.relay_assisted_cycles(&edges)? {
				let selected: Vec<(u32, u32)> = extra.iter().map(|&i| edges[i as usize]).collect();
				let nonces = recover::recover_nonces(&self.params, &selected)?;
				if found_nonces.iter().any(|n| n == &nonces) {
					continue;
				}
				found_nonces.push(nonces.clone());
				proofs.push(Proof::new(nonces, self.params.edge_bits));
				if proofs.len() as u32 >= self.max_sols {
					break;
				}
			}
		}
		Ok((proofs, stats))
	}

	/// Run one relay pass (C5) over `edges` and return, for every pair of
	/// relayed edges that land on the same unordered endpoint pair (spec
	/// §4.5: "after relay rounds, every surviving L-cycle appears as a
	/// ≤2-edge cycle in the relayed multigraph"), the sorted, deduplicated
	/// set of original `edges` positions they were built from — but only
	/// when that set has exactly `proof_size` members, i.e. the relayed
	/// 2-cycle unwinds to a complete, non-overlapping L-cycle.
	fn relay_assisted_cycles(&self, edges: &[(u32, u32)]) -> Result<Vec<Vec<u32>>, Error> {
		if edges.is_empty() {
			return Ok(vec![]);
		}
		let zbits = self.params.edge_bits - self.bucket_bits;
		// The final trim round bucketed survivors by the high bits of
		// whichever coordinate its own round didn't use as the source
		// side; relay's sibling test groups by the low bits of the same
		// coordinate, so edges are reoriented to put that coordinate first.
		let last_round_side = (self.ntrims as u64 - 1) % 2;
		let key_side = 1 - last_round_side;
		let reoriented: Vec<(u32, u32)> = edges
			.iter()
			.map(|&(u, v)| if key_side == 0 { (u, v) } else { (v, u) })
			.collect();
		let relayed = relay::relay_bucket(&reoriented, zbits, true, &[]);

		let mut by_pair: std::collections::HashMap<(u32, u32), Vec<usize>> =
			std::collections::HashMap::new();
		for (k, r) in relayed.iter().enumerate() {
			let (y1, y2) = (r.a.1, r.b.1);
			let key = if y1 <= y2 { (y1, y2) } else { (y2, y1) };
			by_pair.entry(key).or_insert_with(Vec::new).push(k);
		}

		let mut out = Vec::new();
		for members in by_pair.values() {
			if members.len() < 2 {
				continue;
			}
			for a in 0..members.len() {
				for b in (a + 1)..members.len() {
					let r1 = &relayed[members[a]];
					let r2 = &relayed[members[b]];
					let mut positions =
						vec![r1.a_idx as u32, r1.b_idx as u32, r2.a_idx as u32, r2.b_idx as u32];
					positions.sort_unstable();
					positions.dedup();
					if positions.len() == self.params.proof_size {
						out.push(positions);
					}
				}
			}
		}
		Ok(out)
	}

	/// Convenience wrapper over [`Trimmer::solve_with_observer`] for callers
	/// that don't need per-round stats.
	pub fn solve(&mut self) -> Result<Vec<Proof>, Error> {
		let (proofs, _) = self.solve_with_observer(|_, _| {})?;
		Ok(proofs)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use cuckatoo_core::pow::types::PoWContext;

	#[test]
	fn toy_params_trim_and_find_known_solution() {
		// N=8, L=4, B=4, nonce=38: spec §8 scenario 2, a known solution
		// seed for the reference Cuckatoo 8/4 — exactly one cycle expected.
		let mut trimmer = Trimmer::new(8, 4, 4, 4, 6, 4).unwrap();
		trimmer
			.set_header_nonce([0u8; 80].to_vec(), Some(38))
			.unwrap();
		let proofs = trimmer.solve().unwrap();
		assert_eq!(proofs.len(), 1, "nonce 38 at N=8/L=4 has exactly one known cycle");

		let mut reference =
			cuckatoo_core::pow::cuckatoo::CuckatooContext::<u32>::new_impl(8, 4, 4).unwrap();
		reference
			.set_header_nonce([0u8; 80].to_vec(), Some(38), false)
			.unwrap();
		for p in &proofs {
			assert_eq!(p.proof_size(), 4);
			reference
				.verify(p)
				.expect("trimmer-found proof must verify against the reference context");
		}
	}

	#[test]
	fn trim_solution_count_matches_sequential_reference_over_a_nonce_range() {
		// spec §8 scenario 3: the total count of L-cycles across all
		// nonces equals the reference count produced by a sequential
		// baseline.
		let header = [0u8; 80].to_vec();
		let edge_bits = 8;
		let proof_size = 4;
		let range = 0..64u32;

		let mut trimmer = Trimmer::new(edge_bits, proof_size, 4, 4, 6, 10).unwrap();
		let mut trimmer_total = 0usize;
		for n in range.clone() {
			trimmer
				.set_header_nonce(header.clone(), Some(n))
				.unwrap();
			trimmer_total += trimmer.solve().unwrap().len();
		}

		let mut reference_total = 0usize;
		for n in range {
			let mut reference = cuckatoo_core::pow::cuckatoo::CuckatooContext::<u32>::new_impl(
				edge_bits, proof_size, 10,
			)
			.unwrap();
			reference
				.set_header_nonce(header.clone(), Some(n), true)
				.unwrap();
			if let Ok(sols) = reference.find_cycles() {
				reference_total += sols.len();
			}
		}

		assert_eq!(trimmer_total, reference_total);
	}

	#[test]
	fn cancellation_yields_cancelled_error_and_reusable_context() {
		let mut trimmer = Trimmer::new(8, 4, 4, 4, 6, 4).unwrap();
		trimmer.set_header_nonce([0u8; 80].to_vec(), Some(0)).unwrap();
		trimmer.cancel_handle().store(true, Ordering::Relaxed);
		let result = trimmer.solve();
		assert!(result.is_err());

		// the context is reusable for a subsequent call once the flag is
		// cleared (spec §8 scenario 4).
		trimmer.cancel_handle().store(false, Ordering::Relaxed);
		trimmer.set_header_nonce([0u8; 80].to_vec(), Some(1)).unwrap();
		assert!(trimmer.solve().is_ok());
	}

	#[test]
	fn observer_sees_monotonically_shrinking_rounds() {
		let mut trimmer = Trimmer::new(8, 4, 4, 4, 6, 4).unwrap();
		trimmer.set_header_nonce([0u8; 80].to_vec(), Some(0)).unwrap();
		let mut counts = vec![];
		let (_, stats) = trimmer
			.solve_with_observer(|_, n| counts.push(n))
			.unwrap();
		assert_eq!(counts, stats.round_survivors);
		for w in stats.round_survivors.windows(2) {
			assert!(w[1] <= w[0]);
		}
	}
}
