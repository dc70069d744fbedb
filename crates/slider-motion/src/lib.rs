//! # slider-motion
//!
//! The motion planner and pulse scheduler for a single-axis stepper-driven
//! camera slider: a real-time state machine that computes the inter-pulse
//! interval on every step, handles position and speed control modes, queues
//! follow-up moves when a direction reversal is required, enforces rail
//! limits, and supports linear and quadratic acceleration profiles.
//!
//! This crate is `no_std` by default and hardware-agnostic: [`SliderController`]
//! is generic over the [`timer::StepDriver`], [`timer::StepTimer`] and
//! [`timer::DeferredTimer`] capabilities a concrete MCU (or simulation)
//! supplies. Enable the `std` feature for host-side use (tests, `slider-sim`).

#![cfg_attr(not(feature = "std"), no_std)]

pub mod command;
pub mod config;
pub mod error;
pub mod limits;
pub mod planner;
pub mod ramp;
pub mod state;
pub mod timer;

pub use command::{SliderController, DEFERRED_ACTION_TICKS};
pub use config::RailConfig;
pub use error::{MotionError, MoveOutcome};
pub use state::{
    ControlMode, Direction, MotionState, MoveMode, Phase, Positions, Profile, QueuedCommand,
    StopKind,
};
pub use timer::{DeferredTimer, LimitSwitch, PollDelay, StepDriver, StepTimer};
