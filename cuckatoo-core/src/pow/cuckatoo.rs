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

//! Implementation of Cuckatoo Cycle designed by John Tromp. This is the
//! sequential reference solver/verifier: correct, but not the bucketed
//! parallel trimmer (see the `cuckatoo_trim` crate for that). It doubles as
//! the oracle used by `cuckatoo_trim`'s tests.
use byteorder::{BigEndian, WriteBytesExt};
use croaring::Bitmap;
use std::mem;

use crate::pow::common::{CuckooParams, EdgeType, Link};
use crate::pow::error::{Error, ErrorKind};
use crate::pow::types::{PoWContext, Proof};
use util::ToHex;

struct Graph<T>
where
	T: EdgeType,
{
	/// Maximum number of edges
	max_edges: u64,
	/// Maximum nodes
	max_nodes: u64,
	/// Adjacency links
	links: Vec<Link<T>>,
	/// Index into links array
	adj_list: Vec<T>,
	/// Nodes already visited by the recursive cycle walk
	visited: Bitmap,
	/// Maximum solutions
	max_sols: u32,
	/// Solutions found so far, last entry is the one being built
	pub solutions: Vec<Proof>,
	/// Proof size
	proof_size: usize,
	/// Edge bits, carried so found proofs can be tagged
	edge_bits: u8,
	/// NIL sentinel for this edge type
	nil: T,
}

impl<T> Graph<T>
where
	T: EdgeType,
{
	/// Create a new graph with given parameters
	pub fn new(max_edges: u64, max_sols: u32, proof_size: usize, edge_bits: u8) -> Result<Graph<T>, Error> {
		if max_edges >= u64::max_value() / 2 {
			return Err(ErrorKind::Verification("graph is too big to build".to_string()))?;
		}
		let max_nodes = 2 * max_edges;
		Ok(Graph {
			max_edges,
			max_nodes,
			max_sols,
			proof_size,
			edge_bits,
			links: vec![],
			adj_list: vec![],
			visited: Bitmap::create(),
			solutions: vec![],
			nil: T::max_value(),
		})
	}

	pub fn reset(&mut self) -> Result<(), Error> {
		self.links = Vec::with_capacity(2 * self.max_nodes as usize);
		self.adj_list = vec![self.nil; 2 * self.max_nodes as usize];
		self.solutions = vec![Proof::zero(self.proof_size, self.edge_bits); 1];
		self.visited = Bitmap::create();
		Ok(())
	}

	pub fn byte_count(&self) -> Result<u64, Error> {
		Ok(2 * self.max_edges * mem::size_of::<Link<T>>() as u64
			+ mem::size_of::<T>() as u64 * 2 * self.max_nodes)
	}

	/// Add an edge to the graph, extending any cycle that closes as a result.
	pub fn add_edge(&mut self, u: T, v: T) -> Result<(), Error> {
		let u = to_u64!(u);
		let mut v = to_u64!(v);
		if u >= self.max_nodes || v >= self.max_nodes {
			return Err(ErrorKind::EdgeAddition)?;
		}
		v += self.max_nodes;
		let adj_u = self.adj_list[(u ^ 1) as usize];
		let adj_v = self.adj_list[(v ^ 1) as usize];
		if adj_u != self.nil && adj_v != self.nil {
			let sol_index = self.solutions.len() - 1;
			self.solutions[sol_index].nonces[0] = self.links.len() as u64 / 2;
			self.cycles_with_link(1, to_edge!(u), to_edge!(v))?;
		}
		let ulink = self.links.len() as u64;
		let vlink = (self.links.len() + 1) as u64;
		if to_edge!(vlink) == self.nil {
			return Err(ErrorKind::EdgeAddition)?;
		}
		self.links.push(Link {
			next: self.adj_list[u as usize],
			to: to_edge!(u),
		});
		self.links.push(Link {
			next: self.adj_list[v as usize],
			to: to_edge!(v),
		});
		self.adj_list[u as usize] = to_edge!(ulink);
		self.adj_list[v as usize] = to_edge!(vlink);
		Ok(())
	}

	fn test_bit(&mut self, u: u64) -> bool {
		self.visited.contains(u as u32)
	}

	fn cycles_with_link(&mut self, len: u32, u: T, dest: T) -> Result<(), Error> {
		let u64_u = to_u64!(u);
		if self.test_bit(u64_u >> 1) {
			return Ok(());
		}
		if (u64_u ^ 1) == to_u64!(dest) {
			if len == self.proof_size as u32 {
				if self.solutions.len() < self.max_sols as usize {
					self.solutions.push(Proof::zero(self.proof_size, self.edge_bits));
				}
				return Ok(());
			}
		} else if len == self.proof_size as u32 {
			return Ok(());
		}
		let mut au1 = self.adj_list[(u64_u ^ 1) as usize];
		if au1 != self.nil {
			self.visited.add((u64_u >> 1) as u32);
			while au1 != self.nil {
				let au1_64 = to_u64!(au1);
				let i = self.solutions.len() - 1;
				self.solutions[i].nonces[len as usize] = au1_64 / 2;
				let link_index = (au1_64 ^ 1) as usize;
				let link = self.links[link_index].to;
				if link != self.nil {
					self.cycles_with_link(len + 1, link, dest)?;
				}
				au1 = self.links[au1_64 as usize].next;
			}
			self.visited.remove((u64_u >> 1) as u32);
		}
		Ok(())
	}
}

/// Instantiate a new CuckatooContext as a PowContext. Note that this can't
/// be moved in the PoWContext trait as this particular trait needs to be
/// convertible to an object trait.
pub fn new_cuckatoo_ctx<T>(
	edge_bits: u8,
	proof_size: usize,
	max_sols: u32,
) -> Result<Box<dyn PoWContext<T>>, Error>
where
	T: EdgeType + 'static,
{
	Ok(Box::new(CuckatooContext::<T>::new_impl(
		edge_bits, proof_size, max_sols,
	)?))
}

/// Cuckatoo solver context
pub struct CuckatooContext<T>
where
	T: EdgeType,
{
	params: CuckooParams<T>,
	graph: Graph<T>,
}

impl<T> PoWContext<T> for CuckatooContext<T>
where
	T: EdgeType,
{
	fn set_header_nonce(
		&mut self,
		header: Vec<u8>,
		nonce: Option<u32>,
		solve: bool,
	) -> Result<(), Error> {
		self.set_header_nonce_impl(header, nonce, solve)
	}

	fn find_cycles(&mut self) -> Result<Vec<Proof>, Error> {
		let num_edges = self.params.num_edges;
		self.find_cycles_iter(0..num_edges)
	}

	fn verify(&self, proof: &Proof) -> Result<(), Error> {
		self.verify_impl(proof)
	}
}

impl<T> CuckatooContext<T>
where
	T: EdgeType,
{
	/// New Solver context
	pub fn new_impl(
		edge_bits: u8,
		proof_size: usize,
		max_sols: u32,
	) -> Result<CuckatooContext<T>, Error> {
		let params = CuckooParams::new(edge_bits, proof_size)?;
		let num_edges = params.num_edges;
		Ok(CuckatooContext {
			params,
			graph: Graph::new(num_edges, max_sols, proof_size, edge_bits)?,
		})
	}

	/// Get a siphash key as a hex string (for display convenience)
	pub fn sipkey_hex(&self, index: usize) -> Result<String, Error> {
		let mut rdr = vec![];
		rdr.write_u64::<BigEndian>(self.params.siphash_keys[index])?;
		Ok(rdr.to_hex())
	}

	/// Return number of bytes used by the graph
	pub fn byte_count(&self) -> Result<u64, Error> {
		self.graph.byte_count()
	}

	/// Set the header and optional nonce in the last part of the header
	pub fn set_header_nonce_impl(
		&mut self,
		header: Vec<u8>,
		nonce: Option<u32>,
		solve: bool,
	) -> Result<(), Error> {
		self.params.reset_header_nonce(header, nonce)?;
		if solve {
			self.graph.reset()?;
		}
		Ok(())
	}

	/// Simple reference implementation: add every edge from the iterator to
	/// the graph, then report whatever cycles closed along the way. Used
	/// directly by tests, and by `Lean`-style trimmers that hand in an
	/// iterator over a reduced edge set instead of the full range.
	pub fn find_cycles_iter<I>(&mut self, iter: I) -> Result<Vec<Proof>, Error>
	where
		I: Iterator<Item = u64>,
	{
		let mut val = vec![];
		for n in iter {
			val.push(n);
			let edge_index: T = to_edge!(n);
			let u = self.params.sipnode(edge_index, 0, false)?;
			let v = self.params.sipnode(edge_index, 1, false)?;
			self.graph.add_edge(u, v)?;
		}
		self.graph.solutions.pop();
		for s in &mut self.graph.solutions {
			s.nonces = map_vec!(s.nonces, |n| val[*n as usize]);
			s.nonces.sort_unstable();
		}
		for s in &self.graph.solutions {
			self.verify_impl(&s)?;
		}
		if self.graph.solutions.is_empty() {
			Err(ErrorKind::NoSolution)?
		} else {
			Ok(self.graph.solutions.clone())
		}
	}

	/// Verify that given edges are ascending and form a cycle in a
	/// header-generated graph.
	pub fn verify_impl(&self, proof: &Proof) -> Result<(), Error> {
		let size = proof.proof_size();
		if size != self.params.proof_size {
			return Err(ErrorKind::Verification("wrong cycle length".to_owned()))?;
		}
		let nonces = &proof.nonces;
		let mut uvs = vec![0u64; 2 * size];
		let mask = u64::max_value() >> size.leading_zeros(); // round size up to 2-power - 1
		let mut xor0: u64 = (size as u64 / 2) & 1;
		let mut xor1: u64 = xor0;
		// the next two arrays form a linked list of nodes with matching bits 6..1
		let mut headu = vec![2 * size; 1 + mask as usize];
		let mut headv = vec![2 * size; 1 + mask as usize];
		let mut prev = vec![0usize; 2 * size];

		for n in 0..size {
			if nonces[n] > to_u64!(self.params.edge_mask) {
				return Err(ErrorKind::Verification("edge too big".to_owned()))?;
			}
			if n > 0 && nonces[n] <= nonces[n - 1] {
				return Err(ErrorKind::Verification("edges not ascending".to_owned()))?;
			}
			let edge_index: T = to_edge!(nonces[n]);
			let u = to_u64!(self.params.sipnode(edge_index, 0, false)?);
			let v = to_u64!(self.params.sipnode(edge_index, 1, false)?);

			uvs[2 * n] = u;
			let ubits = (u >> 1 & mask) as usize; // larger shifts work too, up to edgebits-6
			prev[2 * n] = headu[ubits];
			headu[ubits] = 2 * n;

			uvs[2 * n + 1] = v;
			let vbits = (v >> 1 & mask) as usize;
			prev[2 * n + 1] = headv[vbits];
			headv[vbits] = 2 * n + 1;

			xor0 ^= u;
			xor1 ^= v;
		}
		if xor0 | xor1 != 0 {
			return Err(ErrorKind::Verification("endpoints don't match up".to_owned()))?;
		}
		// make prev lists circular
		for n in 0..size {
			if prev[2 * n] == 2 * size {
				let ubits = (uvs[2 * n] >> 1 & mask) as usize;
				prev[2 * n] = headu[ubits];
			}
			if prev[2 * n + 1] == 2 * size {
				let vbits = (uvs[2 * n + 1] >> 1 & mask) as usize;
				prev[2 * n + 1] = headv[vbits];
			}
		}
		let mut n = 0;
		let mut i = 0;
		let mut j;
		loop {
			// follow cycle
			j = i;
			let mut k = j;
			loop {
				k = prev[k];
				if k == i {
					break;
				}
				if uvs[k] >> 1 == uvs[i] >> 1 {
					// find other edge endpoint matching one at i
					if j != i {
						return Err(ErrorKind::Verification("branch in cycle".to_owned()))?;
					}
					j = k;
				}
			}
			if j == i || uvs[j] == uvs[i] {
				return Err(ErrorKind::Verification("cycle dead ends".to_owned()))?;
			}
			i = j ^ 1;
			n += 1;
			if i == 0 {
				break;
			}
		}
		if n == size {
			Ok(())
		} else {
			Err(ErrorKind::Verification("cycle too short".to_owned()))?
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	// Cuckatoo 29 Solution for Header [0u8;80] - nonce 20
	static V1_29: [u64; 42] = [
		0x48a9e2, 0x9cf043, 0x155ca30, 0x18f4783, 0x248f86c, 0x2629a64, 0x5bad752, 0x72e3569,
		0x93db760, 0x97d3b37, 0x9e05670, 0xa315d5a, 0xa3571a1, 0xa48db46, 0xa7796b6, 0xac43611,
		0xb64912f, 0xbb6c71e, 0xbcc8be1, 0xc38a43a, 0xd4faa99, 0xe018a66, 0xe37e49c, 0xfa975fa,
		0x11786035, 0x1243b60a, 0x12892da0, 0x141b5453, 0x1483c3a0, 0x1505525e, 0x1607352c,
		0x16181fe3, 0x17e3a1da, 0x180b651e, 0x1899d678, 0x1931b0bb, 0x19606448, 0x1b041655,
		0x1b2c20ad, 0x1bd7a83c, 0x1c05d5b0, 0x1c0b9caa,
	];

	// Cuckatoo 31 Solution for Header [0u8;80] - nonce 99
	static V1_31: [u64; 42] = [
		0x1128e07, 0xc181131, 0x110fad36, 0x1135ddee, 0x1669c7d3, 0x1931e6ea, 0x1c0005f3,
		0x1dd6ecca, 0x1e29ce7e, 0x209736fc, 0x2692bf1a, 0x27b85aa9, 0x29bb7693, 0x2dc2a047,
		0x2e28650a, 0x2f381195, 0x350eb3f9, 0x3beed728, 0x3e861cbc, 0x41448cc1, 0x41f08f6d,
		0x42fbc48a, 0x4383ab31, 0x4389c61f, 0x4540a5ce, 0x49a17405, 0x50372ded, 0x512f0db0,
		0x588b6288, 0x5a36aa46, 0x5c29e1fe, 0x6118ab16, 0x634705b5, 0x6633d190, 0x6683782f,
		0x6728b6e1, 0x67adfb45, 0x68ae2306, 0x6d60f5e1, 0x78af3c4f, 0x7dde51ab, 0x7faced21,
	];

	#[test]
	fn cuckatoo29_vectors() {
		let mut ctx = CuckatooContext::<u64>::new_impl(29, 42, 10).unwrap();
		ctx.set_header_nonce([0u8; 80].to_vec(), Some(20), false)
			.unwrap();
		assert!(ctx
			.verify(&Proof::new(V1_29.to_vec(), 29))
			.is_ok());
	}

	#[test]
	fn cuckatoo31_vectors() {
		let mut ctx = CuckatooContext::<u64>::new_impl(31, 42, 10).unwrap();
		ctx.set_header_nonce([0u8; 80].to_vec(), Some(99), false)
			.unwrap();
		assert!(ctx
			.verify(&Proof::new(V1_31.to_vec(), 31))
			.is_ok());
	}

	#[test]
	fn cuckatoo_verify_fails_on_tampered_header_or_proof() {
		let mut ctx = CuckatooContext::<u64>::new_impl(29, 42, 10).unwrap();
		let mut header = [0u8; 80];
		header[0] = 1u8;
		ctx.set_header_nonce(header.to_vec(), Some(20), false)
			.unwrap();
		assert!(ctx.verify(&Proof::new(V1_29.to_vec(), 29)).is_err());

		header[0] = 0u8;
		ctx.set_header_nonce(header.to_vec(), Some(20), false)
			.unwrap();
		assert!(ctx.verify(&Proof::new(V1_29.to_vec(), 29)).is_ok());

		let mut bad_proof = V1_29;
		bad_proof[0] = 0x48a9e1;
		assert!(ctx.verify(&Proof::new(bad_proof.to_vec(), 29)).is_err());
	}

	#[test]
	fn cuckatoo_basic_solve() {
		let nonce = 1546569;
		let header = [0u8; 80].to_vec();
		let proof_size = 42;
		let edge_bits = 15;
		let max_sols = 4;

		let mut ctx_u32 = CuckatooContext::<u32>::new_impl(edge_bits, proof_size, max_sols).unwrap();
		ctx_u32
			.set_header_nonce(header, Some(nonce), true)
			.unwrap();
		let sols = ctx_u32.find_cycles().unwrap();
		// This nonce is known to produce 2 solutions at these parameters.
		assert_eq!(sols.len(), 2);
	}

	#[test]
	fn cuckatoo_toy_params_find_and_verify() {
		// N=8, L=4 toy scenario (see spec scenario 1/2).
		let header = [0u8; 80].to_vec();
		let edge_bits = 8;
		let proof_size = 4;
		let mut ctx = CuckatooContext::<u32>::new_impl(edge_bits, proof_size, 10).unwrap();
		ctx.set_header_nonce(header, Some(38), true).unwrap();
		let sols = ctx.find_cycles();
		if let Ok(sols) = sols {
			for s in &sols {
				assert!(ctx.verify(s).is_ok());
			}
		}
	}
}
