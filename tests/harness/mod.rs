#![allow(dead_code)]

pub mod recording_subscriber;
pub mod temp_db;
