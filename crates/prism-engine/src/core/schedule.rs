use super::FrameScheduler;

/// Whether the app has a paint outstanding.
///
/// The host marks requests through [`CoalescingScheduler`] and calls
/// [`take_paint`](Self::take_paint) when it delivers a paint; a paint nobody
/// asked for is external.
#[derive(Debug, Default)]
pub struct FrameRequests {
    pending: bool,
}

impl FrameRequests {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the pending flag and returns the `external` value for the paint
    /// being delivered.
    pub fn take_paint(&mut self) -> bool {
        !std::mem::take(&mut self.pending)
    }
}

/// [`FrameScheduler`] that forwards at most one redraw request to the host
/// per delivered paint.
pub struct CoalescingScheduler<'a, F: FnMut()> {
    requests: &'a mut FrameRequests,
    redraw: F,
}

impl<'a, F: FnMut()> CoalescingScheduler<'a, F> {
    pub fn new(requests: &'a mut FrameRequests, redraw: F) -> Self {
        Self { requests, redraw }
    }
}

impl<F: FnMut()> FrameScheduler for CoalescingScheduler<'_, F> {
    fn request_frame(&mut self) {
        if !self.requests.pending {
            self.requests.pending = true;
            (self.redraw)();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_paint_is_not_external() {
        let mut requests = FrameRequests::new();
        let mut redraws = 0;
        CoalescingScheduler::new(&mut requests, || redraws += 1).request_frame();

        assert_eq!(redraws, 1);
        assert!(!requests.take_paint());
        assert!(requests.take_paint());
    }

    #[test]
    fn unrequested_paint_is_external() {
        let mut requests = FrameRequests::new();
        assert!(requests.take_paint());
    }

    #[test]
    fn repeated_requests_coalesce_into_one_redraw() {
        let mut requests = FrameRequests::new();
        let mut redraws = 0;
        {
            let mut scheduler = CoalescingScheduler::new(&mut requests, || redraws += 1);
            scheduler.request_frame();
            scheduler.request_frame();
        }
        assert_eq!(redraws, 1);

        assert!(!requests.take_paint());
        // The second request was absorbed by the first paint.
        assert!(requests.take_paint());
    }

    #[test]
    fn request_after_paint_asks_again() {
        let mut requests = FrameRequests::new();
        let mut redraws = 0;

        CoalescingScheduler::new(&mut requests, || redraws += 1).request_frame();
        requests.take_paint();
        CoalescingScheduler::new(&mut requests, || redraws += 1).request_frame();

        assert_eq!(redraws, 2);
    }
}
