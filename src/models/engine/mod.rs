pub mod constants;
pub mod hit_window;
pub mod note;
pub mod timing;

pub use constants::*;
pub use hit_window::HitWindow;
pub use note::{NoteId, NoteState, PlayableNote};
pub use timing::{NoteTiming, beat_to_seconds, resolve_note_times};
