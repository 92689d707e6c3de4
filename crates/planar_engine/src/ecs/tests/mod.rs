//! Whole-world simulation scenarios

mod bounce_scenario;
