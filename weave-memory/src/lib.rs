//! # weave-memory — the Memory Controller
//!
//! Fans a chunk batch's embedding requests out onto independent tasks,
//! writes survivors through a [`weave_core::vector_store::VectorStore`]
//! transaction, and answers top-k retrieval queries.

#![deny(missing_docs)]

mod controller;

pub use controller::MemoryController;
