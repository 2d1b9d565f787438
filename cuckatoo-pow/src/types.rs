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

//! Solver parameters and stats: the configuration and outcome types that
//! cross the `run_solver` boundary (spec §6).

use cuckatoo_core::pow::types::{ParamsPreset, Proof};

/// All tunable knobs recognized by `fill_default_params`/`create_solver_ctx`
/// (spec §6). The launch-shape fields (`genablocks`..`recovertpb`) are
/// tuning-only here: this is a CPU port and there is no device to launch
/// kernels on, but they're kept so a config file written against this
/// interface round-trips the same fields a GPU-backed solver would expect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverParams {
	/// Accelerator device index. Unused by the CPU trimmer; kept for
	/// interface compatibility.
	pub device: i32,
	/// Power of 2 used for the size of the graph.
	pub edge_bits: u8,
	/// Length of the cycle being searched for.
	pub proof_size: usize,
	/// `log2` of the number of buckets the trimmer partitions edges into.
	pub bucket_bits: u8,
	/// `IDXSHIFT` (spec §2/§3): `MAXEDGES = NEDGES >> idx_shift` bounds how
	/// many survivors the tail export will accept before abandoning the
	/// nonce (spec §7). Left at 0, `fill_default_params` mirrors it from
	/// `bucket_bits`, matching the typical deployment where both are 12.
	pub idx_shift: u8,
	/// Number of trim rounds. Must match `proof_size / 2` in parity (spec
	/// §6); `fill_default_params` picks a sensible default if left at 0.
	pub ntrims: usize,
	/// Maximum number of cycles to report per nonce.
	pub max_sols: u32,
	/// Seeding launch shape (tuning only).
	pub genablocks: u32,
	/// Seeding launch shape, A-side (tuning only).
	pub genatpb: u32,
	/// Seeding launch shape, B-side (tuning only).
	pub genbtpb: u32,
	/// Trim round launch shape (tuning only).
	pub trimtpb: u32,
	/// Tail export launch shape (tuning only).
	pub tailtpb: u32,
	/// Nonce recovery launch shape (tuning only).
	pub recoverblocks: u32,
	/// Nonce recovery launch shape (tuning only).
	pub recovertpb: u32,
	/// Whether the host thread should busy-spin while the device works.
	/// Unused on the CPU path.
	pub cpuload: bool,
	/// If true, the last 4 bytes of the header are overwritten with the
	/// nonce in little-endian before hashing.
	pub mutate_nonce: bool,
}

impl Default for SolverParams {
	/// Defaults to the `Production` preset (spec §2's edge_bits=29,
	/// proof_size=42, bucket_bits=12), matching what a config file with no
	/// `[solver]` section should resolve to.
	fn default() -> SolverParams {
		SolverParams::from_preset(ParamsPreset::Production)
	}
}

impl SolverParams {
	/// Build params from a named preset (spec §6's `-s` display flag and
	/// `ParamsPreset`'s CLI/test convenience).
	pub fn from_preset(preset: ParamsPreset) -> SolverParams {
		let (edge_bits, proof_size, bucket_bits) = preset.params();
		let mut params = SolverParams {
			device: 0,
			edge_bits,
			proof_size,
			bucket_bits,
			idx_shift: 0,
			ntrims: 0,
			max_sols: 4,
			genablocks: 0,
			genatpb: 0,
			genbtpb: 0,
			trimtpb: 0,
			tailtpb: 0,
			recoverblocks: 0,
			recovertpb: 0,
			cpuload: true,
			mutate_nonce: true,
		};
		crate::fill_default_params(&mut params);
		params
	}
}

/// Outcome of one `run_solver` call across a nonce range.
#[derive(Debug, Clone, Default)]
pub struct SolverStats {
	/// Every proof found across the range, in nonce order.
	pub solutions: Vec<Proof>,
	/// Number of nonces actually attempted before stopping (may be less
	/// than `range` on cancellation).
	pub nonces_tried: u32,
	/// Set if any per-nonce attempt returned an error other than "no
	/// solution at this nonce" or cancellation (spec §7: init/accelerator
	/// failures are recorded here rather than aborting the range).
	pub has_errored: bool,
	/// Human-readable reason for the most recent error, if any (spec §7's
	/// `LAST_ERROR_REASON`).
	pub last_error_reason: Option<String>,
	/// Set if the range was cut short by `stop_solver`. Per spec §7/§8,
	/// cancellation yields zero solutions even if some had already been
	/// found before the flag was observed.
	pub cancelled: bool,
	/// Wall-clock time spent in this `run_solver` call.
	pub elapsed: std::time::Duration,
}

impl SolverStats {
	/// Whether any solutions were found (spec §6: "returns a nonzero value
	/// if any solutions were found").
	pub fn found_solution(&self) -> bool {
		!self.solutions.is_empty()
	}
}
