//! Seeder (C3): scatters every candidate nonce into arena A, bucketed by the
//! high bits of its side-0 endpoint.
//!
//! Grounded on `cuckatoo_core::pow::cuckatoo::CuckatooContext::find_cycles_iter`,
//! which computes the same `sipnode(n, 0, false)` endpoint sequentially;
//! here the enumeration fans out across a rayon thread pool instead, one
//! independent unit of work per nonce (spec §4.3/§5: "massively data-parallel
//! across all per-edge... operations").

use rayon::prelude::*;

use cuckatoo_core::pow::common::CuckooParams;
use cuckatoo_core::pow::error::Error;

use crate::arena::{BucketArena, Slot};

/// Scatter `[offset, offset+count)` into `dst`, one slot per nonce.
///
/// Nonce 0 is excluded from the enumerated range: the reference seeder uses
/// the all-zero word as its empty-slot sentinel in fixed-size flushes, so a
/// stored `Slot::Nonce(0)` would be indistinguishable from "nothing was
/// written here" (spec §9, open question resolved: strict exclusion).
pub fn seed(
	params: &CuckooParams<u64>,
	bucket_bits: u8,
	offset: u64,
	count: u64,
	dst: &BucketArena,
) -> Result<(), Error> {
	let zbits = params.edge_bits - bucket_bits;
	(offset..offset + count)
		.into_par_iter()
		.filter(|n| *n != 0)
		.try_for_each(|n| -> Result<(), Error> {
			let u = params.sipnode(n, 0, false)?;
			let bucket = (u >> zbits) as usize;
			dst.push(bucket, Slot::Nonce(n as u32));
			Ok(())
		})
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn seed_excludes_nonce_zero_and_covers_range() {
		let params = CuckooParams::<u64>::new(8, 4).unwrap();
		let arena = BucketArena::new(1 << 4, 64);
		seed(&params, 4, 0, 32, &arena).unwrap();
		assert_eq!(arena.total_len(), 31);
		for b in 0..arena.num_buckets() {
			for slot in arena.bucket(b) {
				match slot {
					Slot::Nonce(n) => assert_ne!(n, 0),
					Slot::Pair(..) => panic!("seeder must only emit Nonce slots"),
				}
			}
		}
	}

	#[test]
	fn every_seeded_nonce_lands_in_its_own_bucket() {
		let params = CuckooParams::<u64>::new(8, 4).unwrap();
		let arena = BucketArena::new(1 << 4, 256);
		seed(&params, 4, 0, 256, &arena).unwrap();
		let zbits = 8 - 4;
		for b in 0..arena.num_buckets() {
			for slot in arena.bucket(b) {
				if let Slot::Nonce(n) = slot {
					let u = params.sipnode(n as u64, 0, false).unwrap();
					assert_eq!((u >> zbits) as usize, b);
				}
			}
		}
	}
}
