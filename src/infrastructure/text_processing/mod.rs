mod recursive_character_splitter;
mod srt_loader;
mod text_sanitizer;

pub use recursive_character_splitter::RecursiveCharacterSplitter;
pub use srt_loader::SrtLoader;
pub use text_sanitizer::sanitize_dialogue_line;
