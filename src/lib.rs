//! Balance reconciliation and dunning-mail generation for a debtor/creditor
//! administration backed by an external accounting API.
//!
//! The pipeline: raw account + transaction data ([`exact`]) ->
//! [`normalize`] -> [`reconcile`] -> [`classify`] for the report views and
//! [`dunning`] for the payment-reminder mails. [`money`] does the shared
//! amount formatting.

pub mod classify;
pub mod cli;
pub mod config;
pub mod directory;
pub mod domain;
pub mod dunning;
pub mod error;
pub mod exact;
pub mod mail;
pub mod money;
pub mod normalize;
pub mod reconcile;
pub mod render;
pub mod report;

pub use error::{Error, Result};
