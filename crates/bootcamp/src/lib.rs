//! Bootcamp management service core.
//!
//! Applicants, instructors, and employees register through [`auth`]; employees and
//! instructors run bootcamps through their lifecycle and review applications via
//! [`services`]; [`rules`] holds the validation predicates every use case is gated by.
//! Storage is reached only through the [`repository`] unit of work so each request
//! commits or rolls back as a whole.

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod paging;
pub mod repository;
pub mod rules;
pub mod services;
pub mod telemetry;
