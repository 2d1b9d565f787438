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

//! Cuckatoo/Cuckarood proof of work: the SipHash endpoint oracle, the
//! common edge/parameter types, a sequential reference solver/verifier for
//! each variant, and the error type shared throughout the workspace.
//!
//! This is the "slow but obviously correct" half of the system. The
//! bucketed, data-parallel trimming engine that makes solving practical at
//! production edge_bits lives in the separate `cuckatoo_trim` crate, built
//! on top of the types defined here.

pub mod common;
pub mod cuckarood;
pub mod cuckatoo;
pub mod error;
pub mod lean;
pub mod siphash;
pub mod types;

pub use self::common::{CuckooParams, Edge, EdgeType, Link};
pub use self::cuckarood::{new_cuckarood_ctx, CuckaroodContext};
pub use self::cuckatoo::{new_cuckatoo_ctx, CuckatooContext};
pub use self::error::{Error, ErrorKind};
pub use self::siphash::{siphash24, siphash_block};
pub use self::types::{ParamsPreset, PoWContext, Proof};
