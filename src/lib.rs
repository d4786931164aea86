//Copyright (C) 2017-2018 Baidu, Inc. All Rights Reserved.
//
//Redistribution and use in source and binary forms, with or without
//modification, are permitted provided that the following conditions
//are met:
//
// * Redistributions of source code must retain the above copyright
//   notice, this list of conditions and the following disclaimer.
//
// * Redistributions in binary form must reproduce the above copyright
//   notice, this list of conditions and the following disclaimer in
//   the documentation and/or other materials provided with the
//   distribution.
//
// * Neither the name of Baidu, Inc., nor the names of its
//   contributors may be used to endorse or promote products derived
//   from this software without specific prior written permission.
//
//THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS
//"AS IS" AND ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT
//LIMITED TO, THE IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR
//A PARTICULAR PURPOSE ARE DISCLAIMED. IN NO EVENT SHALL THE COPYRIGHT
//OWNER OR CONTRIBUTORS BE LIABLE FOR ANY DIRECT, INDIRECT, INCIDENTAL,
//SPECIAL, EXEMPLARY, OR CONSEQUENTIAL DAMAGES (INCLUDING, BUT NOT
//LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS OR SERVICES; Loss OF USE,
//DATA, OR PROFITS; OR BUSINESS INTERRUPTION) HOWEVER CAUSED AND ON ANY
//THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT LIABILITY, OR TORT
//(INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY OUT OF THE USE
//OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF SUCH DAMAGE.

//! Regression tree induction with branch-by-branch prediction.
//!
//! Trees are grown over a training table with discrete and continuous
//! explanatory attributes by repeatedly picking the split that minimizes the
//! summed variance of the class over the child ranges. A trained tree can be
//! dumped as a structure listing or as rules, saved to a file and loaded
//! again, and queried one branch at a time through a
//! [`predict::PredictionSession`].
//!
//! # Example
//! ```rust
//! use regtree::input::{self, InputFormat};
//! use regtree::predict::{PredictionSession, Reply};
//! use regtree::regression_tree::RegressionTree;
//!
//! let mut dataset = input::load("dataset/servo/servo.csv", InputFormat::csv_format()).unwrap();
//! let tree = RegressionTree::fit(&mut dataset);
//! println!("{}", tree.rules_text());
//!
//! let mut session = PredictionSession::new(&tree);
//! let mut reply = session.begin().unwrap();
//! while let Reply::Query { .. } = reply {
//!     reply = session.submit_answer(0).unwrap().unwrap();
//! }
//! ```

#![allow(clippy::ptr_arg)]
#![allow(clippy::type_complexity)]

#[macro_use]
extern crate log;
extern crate serde;
#[macro_use]
extern crate serde_derive;

pub mod arena;
pub mod config;
pub mod data;
pub mod errors;
pub mod fitness;
#[cfg(feature = "input")]
pub mod input;
pub mod node;
pub mod persistence;
pub mod predict;
pub mod regression_tree;
#[cfg(feature = "enable_training")]
pub mod split;
