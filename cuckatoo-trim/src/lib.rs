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

//! Bucketed, multi-pass edge-trimming engine for the Cuckatoo/Cuckarood
//! graph: the seeder (C3), trim rounds (C4), tag relay (C5), tail export
//! (C6), the host-side cycle finder (C7) and nonce recovery (C8).
//!
//! `cuckatoo_core` defines the SipHash oracle and parameter types this
//! crate builds on, plus a slower sequential reference solver used to
//! cross-check `Trimmer`'s output in tests. This crate is the half of the
//! system that makes solving at production edge_bits practical.

#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![warn(missing_docs)]

extern crate croaring;
#[macro_use]
extern crate log;
extern crate parking_lot;
extern crate rayon;

extern crate cuckatoo_core;

pub mod arena;
pub mod context;
pub mod cycle;
pub mod recover;
pub mod relay;
pub mod seed;
pub mod tail;
pub mod trim;

pub use crate::arena::{BucketArena, Slot};
pub use crate::context::{SolveStats, Trimmer};
