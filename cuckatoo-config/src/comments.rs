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

//! Comments for configuration + injection into output .toml

use std::collections::HashMap;

/// maps entries to Comments that should precede them
fn comments() -> HashMap<String, String> {
	let mut retval = HashMap::new();
	retval.insert(
		"[solver]".to_string(),
		"
# Generated Solver Configuration File for cuckatoo
#
# When running the cuckatoo-miner executable without specifying any command
# line arguments, it will look for this file in two places, in the
# following order:
#
# -The working directory
# -[user home]/.cuckatoo
#

#########################################
### SOLVER CONFIGURATION              ###
#########################################
"
		.to_string(),
	);

	retval.insert(
		"device".to_string(),
		"
#accelerator device index. Unused by the CPU trimmer; kept for interface
#compatibility with a GPU-backed solver
"
		.to_string(),
	);

	retval.insert(
		"edge_bits".to_string(),
		"
#log2 of the number of edges in the graph (N). Determines graph size and
#memory footprint; 29 matches the production target, 16 a quick local
#test, 8 the automated test suite
"
		.to_string(),
	);

	retval.insert(
		"proof_size".to_string(),
		"
#length of the cycle being searched for (L), 42 in production
"
		.to_string(),
	);

	retval.insert(
		"bucket_bits".to_string(),
		"
#log2 of the number of buckets the trimmer partitions edges into (B)
"
		.to_string(),
	);

	retval.insert(
		"idx_shift".to_string(),
		"
#IDXSHIFT (S): bounds how many survivors the tail export accepts
#(MAXEDGES = 2^edge_bits >> idx_shift) before abandoning the nonce.
#Leave at 0 to let fill_default_params mirror it from bucket_bits
"
		.to_string(),
	);

	retval.insert(
		"ntrims".to_string(),
		"
#number of trim rounds to run before handing the survivors to the cycle
#finder. Must match proof_size/2 in parity; leave at 0 to let
#fill_default_params choose
"
		.to_string(),
	);

	retval.insert(
		"max_sols".to_string(),
		"
#maximum number of cycles to report per nonce
"
		.to_string(),
	);

	retval.insert(
		"genablocks".to_string(),
		"
#seeding launch shape, A-side (tuning only, no accelerator on this port)
"
		.to_string(),
	);

	retval.insert(
		"genatpb".to_string(),
		"
#seeding launch shape, A-side threads per block (tuning only)
"
		.to_string(),
	);

	retval.insert(
		"genbtpb".to_string(),
		"
#seeding launch shape, B-side threads per block (tuning only)
"
		.to_string(),
	);

	retval.insert(
		"trimtpb".to_string(),
		"
#trim round launch shape (tuning only)
"
		.to_string(),
	);

	retval.insert(
		"tailtpb".to_string(),
		"
#tail export launch shape (tuning only)
"
		.to_string(),
	);

	retval.insert(
		"recoverblocks".to_string(),
		"
#nonce recovery launch shape (tuning only)
"
		.to_string(),
	);

	retval.insert(
		"recovertpb".to_string(),
		"
#nonce recovery launch shape, threads per block (tuning only)
"
		.to_string(),
	);

	retval.insert(
		"cpuload".to_string(),
		"
#whether the host thread should busy-spin while the solver works
"
		.to_string(),
	);

	retval.insert(
		"mutate_nonce".to_string(),
		"
#if true, the last 4 bytes of the header are overwritten with the nonce
#in little-endian before hashing
"
		.to_string(),
	);

	retval.insert(
		"[logging]".to_string(),
		"
#########################################
### LOGGING CONFIGURATION              ###
#########################################
"
		.to_string(),
	);

	retval.insert(
		"log_to_stdout".to_string(),
		"
#whether to log to stdout
"
		.to_string(),
	);

	retval.insert(
		"stdout_log_level".to_string(),
		"
#logging level for stdout: Error, Warning, Info, Debug, Trace
"
		.to_string(),
	);

	retval.insert(
		"log_to_file".to_string(),
		"
#whether to log to file
"
		.to_string(),
	);

	retval.insert(
		"file_log_level".to_string(),
		"
#log file level
"
		.to_string(),
	);

	retval.insert(
		"log_file_path".to_string(),
		"
#log file path
"
		.to_string(),
	);

	retval.insert(
		"log_file_append".to_string(),
		"
#whether to append to the log file (true), or replace it on every run (false)
"
		.to_string(),
	);

	retval.insert(
		"log_max_size".to_string(),
		"
#maximum log file size in bytes before performing log rotation
#comment it to disable log rotation
"
		.to_string(),
	);

	retval
}

fn get_key(line: &str) -> String {
	if line.contains("[") && line.contains("]") {
		return line.to_owned();
	} else if line.contains("=") {
		return line.split("=").collect::<Vec<&str>>()[0].trim().to_owned();
	} else {
		return "NOT_FOUND".to_owned();
	}
}

/// Walk a rendered TOML document line by line and insert the matching
/// comment block (if any) before each `[section]` header or `key = value`
/// line.
pub fn insert_comments(orig: String) -> String {
	let comments = comments();
	let lines: Vec<&str> = orig.split("\n").collect();
	let mut out_lines = vec![];
	for l in lines {
		let key = get_key(l);
		if let Some(v) = comments.get(&key) {
			out_lines.push(v.to_owned());
		}
		out_lines.push(l.to_owned());
		out_lines.push("\n".to_owned());
	}
	let mut ret_val = String::from("");
	for l in out_lines {
		ret_val.push_str(&l);
	}
	ret_val.to_owned()
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn insert_comments_prefixes_known_keys() {
		let rendered = "[solver]\nedge_bits = 29\n".to_string();
		let out = insert_comments(rendered);
		assert!(out.contains("SOLVER CONFIGURATION"));
		assert!(out.contains("log2 of the number of edges"));
	}

	#[test]
	fn insert_comments_leaves_unknown_keys_alone() {
		let rendered = "unknown_key = 1\n".to_string();
		let out = insert_comments(rendered);
		assert_eq!(out, "unknown_key = 1\n\n");
	}
}
