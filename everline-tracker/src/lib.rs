//! Real-time train tracker for the Yongin Everline.
//!
//! Polls the Everline's public JSON feed, works out how far each train has
//! got through its current segment, and answers "how often do trains run
//! right now?" from the published interval timetable.

pub mod config;
pub mod domain;
pub mod feed;
pub mod line;
pub mod poller;
pub mod progress;
pub mod schedule;
pub mod web;
