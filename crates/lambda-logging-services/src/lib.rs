//! # Lambda Logging Services
//!
//! Remote service clients for lambda-logging.
//!
//! This crate provides async clients for:
//! - **Lambda**: function configuration updates for functions the template
//!   patch could not reach

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod lambda;

pub use lambda::{LambdaClient, LambdaConfig};
