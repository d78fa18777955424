//! Cotejar - A/B conversion test analyzer
//!
//! This library provides the core functionality for analyzing conversion
//! experiments: per-group conversion metrics, a two-proportion z-test with
//! confidence intervals and effect size, and a fixed decision rule mapping
//! the outcome to a business recommendation.

pub mod analysis;
pub mod cli;
pub mod covariates;
pub mod csv_output;
pub mod dataset;
pub mod html_output;
pub mod json_output;
pub mod report;
