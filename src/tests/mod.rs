mod config;
mod frame;
