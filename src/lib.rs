pub mod config;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod fs_util;
pub mod instrument;
pub mod locator;
pub mod output;
pub mod prep;
pub mod sample_sheet;
