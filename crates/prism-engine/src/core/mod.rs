//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! applications. Apps never see winit or wgpu types; they receive [`Event`]s,
//! draw through a [`GraphicsContext`] and schedule frames through a
//! [`FrameScheduler`].
//!
//! [`Event`]: crate::event::Event
//! [`GraphicsContext`]: crate::gfx::GraphicsContext

mod app;
mod schedule;

pub use app::{App, FrameScheduler};
pub use schedule::{CoalescingScheduler, FrameRequests};
