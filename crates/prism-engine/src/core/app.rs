use crate::event::Event;
use crate::gfx::GraphicsContext;

/// Capability to ask the host for one more paint tick.
///
/// Each call schedules at most one `Event::Paint { external: false }`; repeated
/// calls before the tick is delivered coalesce.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Application contract implemented by programs running on the runtime.
///
/// Events are delivered strictly sequentially; each call runs to completion
/// before the next event is read.
pub trait App {
    fn on_event<G, S>(&mut self, event: Event, gfx: &mut G, scheduler: &mut S)
    where
        G: GraphicsContext,
        S: FrameScheduler;
}
