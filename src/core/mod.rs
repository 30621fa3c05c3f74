pub mod cache;
pub mod config;
pub mod frame_source;
pub mod keymap;
pub mod output;
pub mod session;

#[cfg(test)]
pub mod test_support;
