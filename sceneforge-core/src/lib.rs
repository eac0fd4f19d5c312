//! Core library for sceneforge, a scene-based video assembly engine.
//!
//! The pipeline turns an ordered list of scenes (still image, optional
//! narration audio, optional narration text) into a single MP4 with
//! pan-and-zoom motion, crossfade transitions, a sequential narration
//! track, and optional time-accurate SRT subtitles:
//!
//! 1. Assets are staged into a per-build temp directory.
//! 2. Each scene's duration is resolved from its audio (or a fallback).
//! 3. A contiguous timeline of scene windows is built; it is the single
//!    source of truth for all downstream timing.
//! 4. Motion clips, crossfade transitions, audio segments, and subtitle
//!    cues are planned as pure values over that timeline.
//! 5. One ffmpeg invocation compiles the plan to H.264/AAC MP4.
//!
//! The entry point is [`assemble`]; inputs are [`Scene`] values plus an
//! [`AssemblyConfig`].

pub mod config;
pub mod error;
pub mod external;
pub mod processing;
pub mod scene;
pub mod temp_files;
pub mod utils;

pub use config::{AssemblyConfig, PanDirection};
pub use error::{CoreError, CoreResult};
pub use processing::timeline::{SceneTiming, Timeline};
pub use processing::{assemble, CompiledVideo};
pub use scene::Scene;
