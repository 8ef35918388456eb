//! Core of the what-if pricing simulator.
//!
//! Flow: load records → build the category vocabulary → fit the demand
//! model once → run any number of single-product simulations against the
//! resulting read-only `SimContext`.

pub mod churn;
pub mod config;
pub mod dataset;
pub mod demand_model;
pub mod error;
pub mod features;
pub mod report;
pub mod simulation;
pub mod types;
pub mod vocabulary;
