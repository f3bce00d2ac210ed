#![allow(dead_code)]

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use harvester_engine::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, HarvestEvent,
    InteractiveSurface, Ordinal, ProgressSink, SurfaceError,
};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Surface whose growth follows a fixed script of `(visible, extent)` readings.
///
/// Each reveal advances one step; the last step repeats forever.
pub struct ScriptedSurface {
    state: Mutex<SurfaceState>,
}

#[derive(Default)]
struct SurfaceState {
    growth: Vec<(u64, u64)>,
    step: usize,
    endless_extent: bool,
    reveals: u32,
    show_more: bool,
    show_more_clicks: u32,
    locators: HashMap<Ordinal, Option<String>>,
    selected: Option<Ordinal>,
    selections: Vec<Ordinal>,
    fail_counts: bool,
}

impl ScriptedSurface {
    pub fn new(growth: Vec<(u64, u64)>) -> Self {
        assert!(!growth.is_empty());
        Self {
            state: Mutex::new(SurfaceState {
                growth,
                ..SurfaceState::default()
            }),
        }
    }

    /// Extent grows on every reveal while the visible count stays put.
    pub fn endless(visible: u64) -> Self {
        let surface = Self::new(vec![(visible, 0)]);
        surface.state.lock().unwrap().endless_extent = true;
        surface
    }

    pub fn with_show_more(self) -> Self {
        self.state.lock().unwrap().show_more = true;
        self
    }

    pub fn with_locator(self, ordinal: Ordinal, locator: Option<&str>) -> Self {
        self.state
            .lock()
            .unwrap()
            .locators
            .insert(ordinal, locator.map(str::to_string));
        self
    }

    pub fn failing_counts(self) -> Self {
        self.state.lock().unwrap().fail_counts = true;
        self
    }

    pub fn reveals(&self) -> u32 {
        self.state.lock().unwrap().reveals
    }

    pub fn show_more_clicks(&self) -> u32 {
        self.state.lock().unwrap().show_more_clicks
    }

    pub fn selections(&self) -> Vec<Ordinal> {
        self.state.lock().unwrap().selections.clone()
    }
}

#[async_trait::async_trait]
impl InteractiveSurface for ScriptedSurface {
    async fn trigger_reveal(&self) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().unwrap();
        state.reveals += 1;
        state.step = (state.step + 1).min(state.growth.len() - 1);
        Ok(())
    }

    async fn visible_item_count(&self) -> Result<u64, SurfaceError> {
        let state = self.state.lock().unwrap();
        if state.fail_counts {
            return Err(SurfaceError::operation("visible_item_count", "session gone"));
        }
        Ok(state.growth[state.step].0)
    }

    async fn content_extent(&self) -> Result<u64, SurfaceError> {
        let state = self.state.lock().unwrap();
        if state.endless_extent {
            return Ok(u64::from(state.reveals) * 100);
        }
        Ok(state.growth[state.step].1)
    }

    async fn activate_show_more(&self) -> Result<bool, SurfaceError> {
        let mut state = self.state.lock().unwrap();
        if state.show_more {
            state.show_more_clicks += 1;
        }
        Ok(state.show_more)
    }

    async fn select_item(&self, ordinal: Ordinal) -> Result<(), SurfaceError> {
        let mut state = self.state.lock().unwrap();
        state.selections.push(ordinal);
        if state.locators.contains_key(&ordinal) {
            state.selected = Some(ordinal);
            Ok(())
        } else {
            state.selected = None;
            Err(SurfaceError::ItemAbsent(ordinal))
        }
    }

    async fn resolve_selected_locator(&self) -> Result<Option<String>, SurfaceError> {
        let state = self.state.lock().unwrap();
        match state.selected {
            Some(ordinal) => Ok(state.locators.get(&ordinal).cloned().flatten()),
            None => Err(SurfaceError::operation("resolve_selected_locator", "nothing selected")),
        }
    }
}

/// Fetcher answering from a fixed table keyed by url.
#[derive(Default)]
pub struct TableFetcher {
    responses: HashMap<String, Result<Vec<u8>, FailureKind>>,
    requested: Mutex<Vec<String>>,
}

impl TableFetcher {
    pub fn serve(mut self, url: &str, bytes: Vec<u8>) -> Self {
        self.responses.insert(url.to_string(), Ok(bytes));
        self
    }

    pub fn fail(mut self, url: &str, kind: FailureKind) -> Self {
        self.responses.insert(url.to_string(), Err(kind));
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for TableFetcher {
    async fn fetch(
        &self,
        _ordinal: Ordinal,
        url: &str,
        _sink: &dyn ProgressSink,
    ) -> Result<FetchOutput, FetchError> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(Ok(bytes)) => Ok(FetchOutput {
                bytes: bytes.clone(),
                metadata: FetchMetadata {
                    original_url: url.to_string(),
                    final_url: url.to_string(),
                    redirect_count: 0,
                    content_type: Some("image/png".into()),
                    byte_len: bytes.len() as u64,
                },
            }),
            Some(Err(kind)) => Err(FetchError::new(kind.clone(), "scripted failure")),
            None => Err(FetchError::new(FailureKind::HttpStatus(404), "not scripted")),
        }
    }
}

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<HarvestEvent>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<HarvestEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for RecordingSink {
    fn emit(&self, event: HarvestEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Encodes a small gradient RGB image in the given format.
pub fn encoded_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let image = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 7) as u8, (y * 5) as u8, 90]));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(image)
        .write_to(&mut out, format)
        .unwrap();
    out.into_inner()
}
