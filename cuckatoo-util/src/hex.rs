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

//! Hex-encoding helpers, backed by the `hex` crate rather than a
//! hand-rolled codec.

use crate::hex_crate::FromHexError;

/// Encode the provided bytes into a lowercase hex string.
pub trait ToHex {
	/// Encode `self` as a lowercase hex string.
	fn to_hex(&self) -> String;
}

impl ToHex for [u8] {
	fn to_hex(&self) -> String {
		crate::hex_crate::encode(self)
	}
}

impl ToHex for Vec<u8> {
	fn to_hex(&self) -> String {
		crate::hex_crate::encode(self)
	}
}

/// Decode a hex string into bytes, tolerating an optional leading `0x`.
pub fn from_hex(hex_str: &str) -> Result<Vec<u8>, FromHexError> {
	let trimmed = hex_str.trim();
	let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
	crate::hex_crate::decode(trimmed)
}
