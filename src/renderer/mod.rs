//! Rendering
//!
//! `frame` describes what to draw in host-neutral terms; `ansi` draws a frame
//! to a truecolor terminal.

pub mod ansi;
pub mod frame;
pub mod palette;

pub use frame::{Cell, Frame, FrameBody, GridFrame, Header};
pub use palette::Rgb;
