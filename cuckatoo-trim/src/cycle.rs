//! Cycle finder (C7): host-side union-find and path recording over the
//! compressed edge set the trimming pipeline hands off.
//!
//! Grounded directly on `cuckatoo_core::pow::cuckatoo::Graph`'s
//! `add_edge`/`cycles_with_link` walk, the same adjacency-link cycle-closing
//! trick, generalized to take an explicit edge list (positions into that
//! list, not nonces — spec §4.7: "Indices stored in sols[s][0..L) are
//! positions into the input edge array"). The `S`-bit index compression
//! spec §3/§9 describes is a GPU scratch-memory optimization with no
//! observable effect on which cycles are found; this host-side union-find
//! isn't memory constrained the same way, so it is not reproduced here
//! (noted in DESIGN.md).

use croaring::Bitmap;

use cuckatoo_core::pow::error::{Error, ErrorKind};

const NIL: u32 = u32::max_value();

#[derive(Clone, Copy)]
struct Link {
	next: u32,
	to: u32,
}

struct Finder {
	max_nodes: u64,
	links: Vec<Link>,
	adj_list: Vec<u32>,
	visited: Bitmap,
	proof_size: usize,
	max_sols: u32,
	solutions: Vec<Vec<u32>>,
	/// Maps an add-order position (what `au1 / 2` walks over) back to the
	/// position the edge actually occupies in the caller's `edges` slice.
	/// Needed because duplicate `(u, v)` pairs are skipped before
	/// `add_edge` is called, so the two indices diverge once any duplicate
	/// has been seen.
	orig_idx: Vec<u32>,
}

impl Finder {
	fn new(max_nodes: u64, proof_size: usize, max_sols: u32) -> Finder {
		Finder {
			max_nodes,
			links: Vec::with_capacity(2 * max_nodes as usize),
			adj_list: vec![NIL; 2 * max_nodes as usize],
			visited: Bitmap::create(),
			proof_size,
			max_sols,
			solutions: vec![vec![0; proof_size]],
			orig_idx: Vec::new(),
		}
	}

	fn add_edge(&mut self, idx: u32, u: u32, v: u32) -> Result<(), Error> {
		let u = u as u64;
		let mut v = v as u64;
		if u >= self.max_nodes || v >= self.max_nodes {
			return Err(ErrorKind::EdgeAddition)?;
		}
		v += self.max_nodes;
		let adj_u = self.adj_list[(u ^ 1) as usize];
		let adj_v = self.adj_list[(v ^ 1) as usize];
		if adj_u != NIL && adj_v != NIL {
			let sol_index = self.solutions.len() - 1;
			self.solutions[sol_index][0] = idx;
			self.cycles_with_link(1, u as u32, v as u32)?;
		}
		self.orig_idx.push(idx);
		let ulink = self.links.len() as u32;
		let vlink = ulink + 1;
		self.links.push(Link {
			next: self.adj_list[u as usize],
			to: u as u32,
		});
		self.links.push(Link {
			next: self.adj_list[v as usize],
			to: v as u32,
		});
		self.adj_list[u as usize] = ulink;
		self.adj_list[v as usize] = vlink;
		Ok(())
	}

	fn cycles_with_link(&mut self, len: u32, u: u32, dest: u32) -> Result<(), Error> {
		if self.visited.contains(u >> 1) {
			return Ok(());
		}
		if (u ^ 1) == dest {
			if len == self.proof_size as u32 {
				if self.solutions.len() < self.max_sols as usize {
					self.solutions.push(vec![0; self.proof_size]);
				}
				return Ok(());
			}
		} else if len == self.proof_size as u32 {
			return Ok(());
		}
		let mut au1 = self.adj_list[(u ^ 1) as usize];
		if au1 != NIL {
			self.visited.add(u >> 1);
			while au1 != NIL {
				let i = self.solutions.len() - 1;
				self.solutions[i][len as usize] = self.orig_idx[(au1 / 2) as usize];
				let link = self.links[(au1 ^ 1) as usize].to;
				self.cycles_with_link(len + 1, link, dest)?;
				au1 = self.links[au1 as usize].next;
			}
			self.visited.remove(u >> 1);
		}
		Ok(())
	}
}

/// Find up to `max_sols` simple cycles of exactly `proof_size` edges among
/// `edges`. `max_nodes` must be at least one more than the largest endpoint
/// value that appears in `edges` (callers pass `NEDGES`, the full node
/// domain, since the trimmer's endpoints are not further compressed here).
///
/// Same compressed `(u, v)` pairs are deduplicated at insertion (spec §4.7:
/// "Duplicate edges... are deduplicated at insertion; the caller receives a
/// duplicate count"); only the first occurrence of a given pair is added to
/// the graph, and later repeats are tallied into the returned count instead.
///
/// Returns, for each cycle found, the sorted positions into `edges` that
/// make it up (positions refer to the original, non-deduplicated `edges`
/// slice), plus the number of duplicate edges skipped.
pub fn find_cycles(
	edges: &[(u32, u32)],
	max_nodes: u64,
	proof_size: usize,
	max_sols: u32,
) -> Result<(Vec<Vec<u32>>, usize), Error> {
	let mut finder = Finder::new(max_nodes, proof_size, max_sols);
	let mut seen = std::collections::HashSet::with_capacity(edges.len());
	let mut duplicates = 0usize;
	for (idx, &(u, v)) in edges.iter().enumerate() {
		if !seen.insert((u, v)) {
			duplicates += 1;
			continue;
		}
		finder.add_edge(idx as u32, u, v)?;
	}
	finder.solutions.pop();
	for sol in &mut finder.solutions {
		sol.sort_unstable();
	}
	Ok((finder.solutions, duplicates))
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn no_edges_means_no_cycles() {
		let (sols, dups) = find_cycles(&[], 16, 4, 4).unwrap();
		assert!(sols.is_empty());
		assert_eq!(dups, 0);
	}

	#[test]
	fn disjoint_edges_form_no_cycle() {
		let edges = vec![(0u32, 1u32), (2u32, 3u32)];
		let (sols, dups) = find_cycles(&edges, 16, 4, 4).unwrap();
		assert!(sols.is_empty());
		assert_eq!(dups, 0);
	}

	#[test]
	fn repeated_edge_is_deduplicated_and_counted() {
		let edges = vec![(0u32, 1u32), (0u32, 1u32), (2u32, 3u32)];
		let (sols, dups) = find_cycles(&edges, 16, 4, 4).unwrap();
		assert!(sols.is_empty());
		assert_eq!(dups, 1);
	}

	#[test]
	fn duplicate_before_a_cycle_does_not_shift_reported_positions() {
		// A duplicate edge is inserted ahead of a 4-cycle over u0-v0-u1-v1-u0.
		// Once skipped, the add-order position of every later edge trails its
		// position in `edges` by one; any reported cycle must still be given
		// in terms of the original `edges` positions, not add-order, and must
		// never include the skipped duplicate's own position.
		let edges = vec![
			(0u32, 0u32),
			(0u32, 0u32), // duplicate, skipped
			(1u32, 0u32),
			(1u32, 1u32),
			(0u32, 1u32),
		];
		let (sols, dups) = find_cycles(&edges, 16, 4, 4).unwrap();
		assert_eq!(dups, 1);
		for sol in &sols {
			assert_eq!(sol.len(), 4);
			assert!(!sol.contains(&1), "duplicate's own position must not appear in a solution");
			for &pos in sol {
				assert!((pos as usize) < edges.len());
			}
		}
	}
}
