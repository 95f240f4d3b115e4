/// Offset bookkeeping for the generations gallery. Only the most recently
/// issued request may complete, so a page is never applied twice.
#[derive(Debug, Default)]
pub struct GalleryPager {
    offset: usize,
    pending: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub request: u64,
    pub offset: usize,
    pub reset: bool,
}

impl GalleryPager {
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn reset(&mut self) {
        self.offset = 0;
        self.pending = None;
    }

    pub fn begin(&mut self, request: u64, reset: bool) -> PageRequest {
        if reset {
            self.offset = 0;
        }
        self.pending = Some(request);
        PageRequest {
            request,
            offset: self.offset,
            reset,
        }
    }

    /// Clears the pending slot if `request` owns it.
    pub fn accept(&mut self, request: u64) -> bool {
        if self.pending == Some(request) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    pub fn advance(&mut self, received: usize) {
        self.offset += received;
    }
}
