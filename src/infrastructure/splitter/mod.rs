mod recursive;
mod tokens;

pub use recursive::{CharLength, LengthFunction, RecursiveCharacterSplitter};
pub use tokens::TokenizerLength;
