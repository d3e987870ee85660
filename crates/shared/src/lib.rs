//! Vocabulary shared between the tracking client and its front ends:
//! identifiers, entry shapes as the tracking service exchanges them, and the
//! service's error body.

pub mod domain;
pub mod error;
pub mod protocol;
