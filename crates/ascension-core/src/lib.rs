//! World clock, tick driver, and orchestration for the Ascension simulation.
//!
//! This crate owns the monthly tick cycle: each living actor ages, decides
//! when uncommitted, and runs one step of its committed action.
//!
//! # Modules
//!
//! - [`clock`] -- World clock with tick counter and year/month derivation.
//! - [`config`] -- Configuration loading from `ascension-config.yaml` into
//!   strongly-typed structs.
//! - [`decision`] -- [`DecisionSource`] trait with idle, scripted, and
//!   heuristic implementations.
//! - [`events`] -- [`EventSink`] trait and the bounded [`EventLog`].
//! - [`narrative`] -- [`StoryTeller`] trait and [`PlainStoryTeller`].
//! - [`runner`] -- The bounded async simulation loop.
//! - [`snapshot`] -- JSON snapshot and restore of resumable state.
//! - [`tick`] -- The per-tick engine loop.
//!
//! [`DecisionSource`]: decision::DecisionSource
//! [`EventSink`]: events::EventSink
//! [`EventLog`]: events::EventLog
//! [`StoryTeller`]: narrative::StoryTeller
//! [`PlainStoryTeller`]: narrative::PlainStoryTeller

pub mod clock;
pub mod config;
pub mod decision;
pub mod events;
pub mod narrative;
pub mod runner;
pub mod snapshot;
pub mod tick;
