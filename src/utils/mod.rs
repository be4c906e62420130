//! Shared utility modules.

pub mod html;
