//! Integration tests for termvid

mod helpers;

mod cli_test;
mod render_roundtrip_test;
mod status_test;
