//! Specialist panel adapters

pub mod scripted;

pub use scripted::ScriptedSpecialist;
