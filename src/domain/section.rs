/// Where the scan currently is relative to the target section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    OutsideTarget,
    InsideTarget,
    Closed,
}

/// Start header of the target section and the header that ended it.
/// Ordinals count section headers in document order, starting at 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBoundary {
    pub start_label: String,
    pub start_ordinal: usize,
    pub end_label: Option<String>,
    pub end_ordinal: Option<usize>,
}

pub fn is_target_header(text: &str) -> bool {
    let text = text.trim();
    text == "Listings" || text.contains("Search Results")
}

/// Two-step scanner fed with section header texts in document order.
///
/// The first header matching [`is_target_header`] opens the window and the
/// next header of any label closes it. Once closed it stays closed.
#[derive(Debug)]
pub struct SectionScanner {
    state: ScanState,
    headers_seen: usize,
    boundary: Option<SectionBoundary>,
}

impl SectionScanner {
    pub fn new() -> Self {
        SectionScanner {
            state: ScanState::OutsideTarget,
            headers_seen: 0,
            boundary: None,
        }
    }

    pub fn is_inside(&self) -> bool {
        self.state == ScanState::InsideTarget
    }

    pub fn observe_header(&mut self, text: &str) -> ScanState {
        let ordinal = self.headers_seen;
        self.headers_seen += 1;

        self.state = match self.state {
            ScanState::OutsideTarget if is_target_header(text) => {
                self.boundary = Some(SectionBoundary {
                    start_label: text.trim().to_string(),
                    start_ordinal: ordinal,
                    end_label: None,
                    end_ordinal: None,
                });
                ScanState::InsideTarget
            }
            ScanState::OutsideTarget => ScanState::OutsideTarget,
            ScanState::InsideTarget => {
                if let Some(boundary) = self.boundary.as_mut() {
                    boundary.end_label = Some(text.trim().to_string());
                    boundary.end_ordinal = Some(ordinal);
                }
                ScanState::Closed
            }
            ScanState::Closed => ScanState::Closed,
        };

        self.state
    }

    /// `None` when no header ever opened the target section.
    pub fn finish(self) -> Option<SectionBoundary> {
        self.boundary
    }
}
