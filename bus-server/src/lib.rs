//! Bus route planner server.
//!
//! A web application that answers: "which buses, with at most two
//! changes, take me from this stop to that one?"

pub mod cache;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod planner;
pub mod store;
pub mod web;
