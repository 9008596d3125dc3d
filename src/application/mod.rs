//! Application layer - the dialogue and indexing cores.
//!
//! Services depend on domain ports (traits) rather than on concrete model,
//! embedding or loader clients.

pub mod services;

pub use services::{
    merge_indexes, DialogueAgent, DialogueSimulator, IndexGenerator, PdfIndexGenerator,
    RagService, Responder,
};
