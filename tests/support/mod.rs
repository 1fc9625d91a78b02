#![allow(dead_code)]

pub mod artifacts;
pub mod pearlyx_env;
pub mod signals;
pub mod wav;
