pub mod second;
