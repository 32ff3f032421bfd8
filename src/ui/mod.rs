//! UI module - contains UI rendering components
//!
//! Screen rendering lives in `app`; this module holds the widgets it shares.

pub mod components;
