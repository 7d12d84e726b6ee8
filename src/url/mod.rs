//! URL handling module for Backmap
//!
//! This module provides the canonical page identity (reverse-domain keys)
//! and the scope/link filter pipeline applied to extracted anchors.

mod canonical;
mod filter;

pub use canonical::{canonicalize, canonicalize_url, reverse_domain};
pub use filter::{LinkFilter, OutboundLink};
