//! Preprocess, analyze and explore the UIUC airfoil coordinate database.
//!
//! The core is [data::normalize], which turns the database's assorted
//! coordinate layouts into the trailing-edge-first contour a panel solver
//! expects. Around it: batch drivers ([batch]), the XFOIL wrapper
//! ([solver]), the polar summary ([summary]) and the explorer queries
//! ([data::filter], [state]).

pub mod batch;
pub mod config;
pub mod data;
pub mod error;
pub mod solver;
pub mod state;
pub mod summary;
