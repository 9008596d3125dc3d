mod dialogue;
mod index;
mod pdf;
mod rag;
mod simulator;

pub use dialogue::{DialogueAgent, Responder};
pub use index::{merge_indexes, IndexGenerator};
pub use pdf::PdfIndexGenerator;
pub use rag::RagService;
pub use simulator::{round_robin, DialogueSimulator, SpeakerSelector};
