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

//! SipHash endpoint oracle, edge/proof types, and the sequential reference
//! solver/verifier for the Cuckatoo and Cuckarood proof-of-work cycles.
//!
//! This crate defines the vocabulary the rest of the workspace builds on:
//! `EdgeType`, `CuckooParams`, `Proof` and the `PoWContext` trait. The
//! `cuckatoo_trim` crate implements the actual bucketed, parallel trimming
//! engine against these types; this crate's own `CuckatooContext`/
//! `CuckaroodContext` are a slower, unconditionally-correct reference used
//! for verification and for testing the trimmer against.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

extern crate blake2_rfc as blake2;
extern crate byteorder;
extern crate croaring;
extern crate failure;
#[macro_use]
extern crate failure_derive;
extern crate num;
extern crate rand;
extern crate serde;
#[macro_use]
extern crate serde_derive;

extern crate cuckatoo_util as util;

#[cfg(test)]
extern crate serde_json;

#[macro_use]
pub mod macros;

pub mod pow;

pub use crate::pow::common::{CuckooParams, Edge, EdgeType, Link};
pub use crate::pow::cuckarood::{new_cuckarood_ctx, CuckaroodContext};
pub use crate::pow::cuckatoo::{new_cuckatoo_ctx, CuckatooContext};
pub use crate::pow::error::{Error, ErrorKind};
pub use crate::pow::siphash::{siphash24, siphash_block};
pub use crate::pow::types::{ParamsPreset, PoWContext, Proof};
