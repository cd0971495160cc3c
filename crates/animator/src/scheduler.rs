/// Host-side hook that arranges for the next tick to run.
///
/// On desktop this requests a window redraw; headless drivers count requests
/// and call `tick` themselves.
pub trait FrameScheduler {
    fn request_next_frame(&mut self);
}

impl<F: FnMut()> FrameScheduler for F {
    fn request_next_frame(&mut self) {
        self()
    }
}

/// Scheduler that only records how many frames were requested.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ManualScheduler {
    requested: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_next_frame(&mut self) {
        self.requested += 1;
    }
}
