//! Data types shared across stages.

pub mod index;
pub mod record;
pub mod report;
