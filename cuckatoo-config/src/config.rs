// Copyright 2016 The Grin Developers
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

//! Configuration file management

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::comments::insert_comments;
use crate::types::{ConfigError, GlobalConfig};

/// Name of the config file looked for in the working directory and in
/// `[user home]/.cuckatoo`.
pub const CONFIG_FILE_NAME: &str = "cuckatoo.toml";

const CUCKATOO_HOME: &str = ".cuckatoo";

impl GlobalConfig {
	/// Search, in order, the working directory and `~/.cuckatoo` for
	/// `cuckatoo.toml`, returning the first path found.
	pub fn derive_config_location() -> Result<PathBuf, ConfigError> {
		let local = PathBuf::from(CONFIG_FILE_NAME);
		if local.exists() {
			return Ok(local);
		}
		if let Some(mut home) = dirs::home_dir() {
			home.push(CUCKATOO_HOME);
			home.push(CONFIG_FILE_NAME);
			if home.exists() {
				return Ok(home);
			}
		}
		Err(ConfigError::FileNotFoundError(String::from(
			CONFIG_FILE_NAME,
		)))
	}

	/// Load configuration, trying `config_file` if given, otherwise
	/// searching the default locations; falls back to `GlobalConfig`'s
	/// `Default` impl (spec §6's `fill_default_params` behaviour) if no
	/// file is found.
	pub fn new(config_file: Option<&Path>) -> Result<GlobalConfig, ConfigError> {
		let path = match config_file {
			Some(p) => Some(p.to_path_buf()),
			None => GlobalConfig::derive_config_location().ok(),
		};

		let path = match path {
			Some(p) => p,
			None => return Ok(GlobalConfig::default()),
		};

		GlobalConfig::load_from_file(&path)
	}

	/// Read and parse a config file at the given path.
	pub fn load_from_file(path: &Path) -> Result<GlobalConfig, ConfigError> {
		let mut file = File::open(path).map_err(|e| {
			ConfigError::FileIOError(
				path.to_string_lossy().into_owned(),
				format!("Unable to open config file: {}", e),
			)
		})?;
		let mut contents = String::new();
		file.read_to_string(&mut contents)?;
		let mut config: GlobalConfig = toml::from_str(&contents)?;
		config.config_file_path = Some(path.to_path_buf());
		Ok(config)
	}

	/// Serialize to TOML, with auto-generated comments, and write to the
	/// given path.
	pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
		let toml_str = toml::to_string(self)
			.map_err(|e| ConfigError::SerializationError(format!("{}", e)))?;
		let commented = insert_comments(toml_str);
		let mut file = File::create(path)?;
		file.write_all(commented.as_bytes())?;
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use cuckatoo_pow::SolverParams;

	#[test]
	fn round_trip_default_config() {
		let dir = std::env::temp_dir();
		let path = dir.join("cuckatoo_config_test_round_trip.toml");

		let config = GlobalConfig::default();
		config.write_to_file(&path).unwrap();

		let loaded = GlobalConfig::load_from_file(&path).unwrap();
		assert_eq!(loaded.solver.edge_bits, config.solver.edge_bits);
		assert_eq!(loaded.solver.proof_size, config.solver.proof_size);

		std::fs::remove_file(&path).ok();
	}

	#[test]
	fn load_from_file_rejects_missing_file() {
		let missing = Path::new("/nonexistent/cuckatoo-config-test.toml");
		assert!(GlobalConfig::load_from_file(missing).is_err());
	}

	#[test]
	fn parses_explicit_solver_section() {
		let dir = std::env::temp_dir();
		let path = dir.join("cuckatoo_config_test_explicit.toml");
		std::fs::write(
			&path,
			"[solver]\nedge_bits = 16\nproof_size = 42\nbucket_bits = 8\nidx_shift = 0\n\
			 ntrims = 0\nmax_sols = 4\ngenablocks = 0\ngenatpb = 0\ngenbtpb = 0\n\
			 trimtpb = 0\ntailtpb = 0\nrecoverblocks = 0\nrecovertpb = 0\n\
			 cpuload = true\nmutate_nonce = true\ndevice = 0\n",
		)
		.unwrap();

		let loaded = GlobalConfig::load_from_file(&path).unwrap();
		let expected = SolverParams::from_preset(cuckatoo_core::pow::types::ParamsPreset::UserTesting);
		assert_eq!(loaded.solver.edge_bits, expected.edge_bits);

		std::fs::remove_file(&path).ok();
	}
}
