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

//! CLI front-end for the cuckatoo solver (spec.md §6): parses the `-d -h -m
//! -n -r -U -Z -z -c -s` flags plus the ambient `--config`/`--log-level`/
//! `--log-file` ergonomics, wires SIGINT to the solver's cancellation flag
//! the way grin's `cmd::server` wires shutdown to ctrlc, and prints any
//! proofs found.

#[macro_use]
extern crate clap;
#[macro_use]
extern crate log;
extern crate ctrlc;
extern crate humansize;
extern crate serde_json;

extern crate cuckatoo_config;
extern crate cuckatoo_pow;
extern crate cuckatoo_util;

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use clap::App;
use humansize::{file_size_opts, FileSize};

use cuckatoo_config::GlobalConfig;
use cuckatoo_pow::{create_solver_ctx, fill_default_params, run_solver, SolverParams};
use cuckatoo_util::{from_hex, LogLevel, ToHex};

fn main() {
	let yaml = load_yaml!("cuckatoo-miner.yml");
	let args = App::from_yaml(yaml).get_matches();

	let config_path = args.value_of("config").map(PathBuf::from);
	let global_config = match GlobalConfig::new(config_path.as_deref()) {
		Ok(c) => c,
		Err(e) => {
			eprintln!("Error loading config: {}", e);
			std::process::exit(1);
		}
	};

	let mut logging = global_config.logging.clone().unwrap_or_default();
	if let Some(level) = args.value_of("log_level") {
		if let Some(parsed) = parse_log_level(level) {
			logging.stdout_log_level = parsed;
		}
	}
	if let Some(file) = args.value_of("log_file") {
		logging.log_file_path = file.to_owned();
	}
	cuckatoo_util::init_logger(Some(logging));

	let mut params = global_config.solver;
	apply_cli_overrides(&mut params, &args);
	fill_default_params(&mut params);

	if args.is_present("show_params") {
		println!("{}", serde_json::to_string_pretty(&params).unwrap());
		std::process::exit(0);
	}

	let header = match args.value_of("header") {
		Some(h) => from_hex(h).unwrap_or_else(|e| {
			eprintln!("Invalid hex header: {}", e);
			std::process::exit(1);
		}),
		None => vec![0u8; 80],
	};

	let nonce: u32 = value_t!(args, "nonce", u32).unwrap_or(0);
	let range: u32 = value_t!(args, "range", u32).unwrap_or(1);

	info!(
		"cuckatoo-miner starting: edge_bits={} proof_size={} bucket_bits={} idx_shift={} ntrims={} nonce={} range={}",
		params.edge_bits, params.proof_size, params.bucket_bits, params.idx_shift, params.ntrims, nonce, range
	);

	let mut ctx = match create_solver_ctx(params) {
		Ok(c) => c,
		Err(e) => {
			error!("Failed to create solver context: {}", e);
			std::process::exit(1);
		}
	};

	let cancel = ctx.cancel_handle();
	let ctrlc_cancel = Arc::clone(&cancel);
	ctrlc::set_handler(move || {
		warn!("Received SIGINT (Ctrl+C), stopping solver...");
		ctrlc_cancel.store(true, Ordering::SeqCst);
	})
	.expect("Error setting Ctrl-C handler");

	let stats = match run_solver(&mut ctx, &header, nonce, range) {
		Ok(s) => s,
		Err(e) => {
			error!("Solver error: {}", e);
			std::process::exit(1);
		}
	};

	let graph_bytes = (1u64 << ctx.params().edge_bits) * 8;
	debug!(
		"solve touched ~{} of graph state, {} nonces attempted in {:.2}s",
		graph_bytes
			.file_size(file_size_opts::DECIMAL)
			.unwrap_or_default(),
		stats.nonces_tried,
		stats.elapsed.as_secs_f64()
	);

	if stats.solutions.is_empty() {
		println!("No solutions found ({} nonces tried)", stats.nonces_tried);
		std::process::exit(0);
	}

	for proof in &stats.solutions {
		let hash = proof.cyclehash();
		println!("Solution: {}", proof);
		println!("Cyclehash: {}", hash.to_hex());
	}
	// spec.md §6: run_solver "returns a nonzero value if any solutions were
	// found" -- mirrored here in the process exit code.
	std::process::exit(1);
}

fn apply_cli_overrides(params: &mut SolverParams, args: &clap::ArgMatches) {
	if let Some(d) = args.value_of("device").and_then(|v| v.parse().ok()) {
		params.device = d;
	}
	if let Some(e) = args.value_of("edge_bits").and_then(|v| v.parse().ok()) {
		params.edge_bits = e;
	}
	if let Some(l) = args.value_of("proof_size").and_then(|v| v.parse().ok()) {
		params.proof_size = l;
	}
	if let Some(b) = args.value_of("bucket_bits").and_then(|v| v.parse().ok()) {
		params.bucket_bits = b;
	}
	if let Some(s) = args.value_of("idx_shift").and_then(|v| v.parse().ok()) {
		params.idx_shift = s;
	}
	if let Some(m) = args.value_of("ntrims").and_then(|v| v.parse().ok()) {
		params.ntrims = m;
	}
	if let Some(u) = args.value_of("seedblocks").and_then(|v| v.parse().ok()) {
		params.genablocks = u;
	}
	if let Some(z) = args.value_of("recoverblocks").and_then(|v| v.parse().ok()) {
		params.recoverblocks = z;
	}
	if let Some(z) = args.value_of("recovertpb").and_then(|v| v.parse().ok()) {
		params.recovertpb = z;
	}
	if args.is_present("cpuload") {
		params.cpuload = true;
	}
	if args.is_present("mutate_nonce") {
		params.mutate_nonce = true;
	}
}

fn parse_log_level(level: &str) -> Option<LogLevel> {
	match level.to_lowercase().as_str() {
		"error" => Some(LogLevel::Error),
		"warning" | "warn" => Some(LogLevel::Warning),
		"info" => Some(LogLevel::Info),
		"debug" => Some(LogLevel::Debug),
		"trace" => Some(LogLevel::Trace),
		_ => None,
	}
}
