mod openai_whisper_engine;
mod pcm_recorder;

pub use openai_whisper_engine::{OpenAiWhisperEngine, detect_audio_format};
pub use pcm_recorder::{PcmFormat, PcmRecorder, Recording, RecordingError};
