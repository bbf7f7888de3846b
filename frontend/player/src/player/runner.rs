use gloo_timers::future::TimeoutFuture;
use tokio::select;
use tokio::sync::{broadcast, mpsc};
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, HtmlVideoElement};

use super::events::{
    EventControlsChange, EventFullscreenChange, EventRateChange, EventTimeUpdate, EventVolumeChange, UserEvent,
};
use super::inner::PlayerInnerHolder;
use super::state::Speed;
use super::util::{bind_events, now_ms, Bound};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerEvent {
    VideoPlay,
    VideoPause,
    VideoEnded,
    VideoTimeUpdate,
    VideoVolumeChange,
    VideoRateChange,
    VideoLoadedMetadata,
    FullscreenChange,
    PointerActivity,
}

/// Closure factory: pushes `evt` onto the runner channel. The channel is
/// deep enough that a full queue means the runner is wedged, so the event
/// is dropped with a warning rather than blocking the browser thread.
fn forward(tx: &mpsc::Sender<RunnerEvent>, evt: RunnerEvent) -> impl FnMut(web_sys::Event) + 'static {
    let tx = tx.clone();
    move |_| {
        if tx.try_send(evt).is_err() {
            tracing::warn!("player event channel full, dropping {:?}", evt);
        }
    }
}

fn bind_video(element: HtmlVideoElement, tx: &mpsc::Sender<RunnerEvent>) -> Bound<HtmlVideoElement> {
    bind_events!(element, {
        "play" | "playing" => forward(tx, RunnerEvent::VideoPlay),
        "pause" => forward(tx, RunnerEvent::VideoPause),
        "ended" => forward(tx, RunnerEvent::VideoEnded),
        "timeupdate" => forward(tx, RunnerEvent::VideoTimeUpdate),
        "volumechange" => forward(tx, RunnerEvent::VideoVolumeChange),
        "ratechange" => forward(tx, RunnerEvent::VideoRateChange),
        "loadedmetadata" => forward(tx, RunnerEvent::VideoLoadedMetadata),
    })
}

fn bind_container(element: HtmlElement, tx: &mpsc::Sender<RunnerEvent>) -> Bound<HtmlElement> {
    bind_events!(element, {
        "pointermove" | "pointerdown" | "touchstart" => forward(tx, RunnerEvent::PointerActivity),
    })
}

fn bind_document(document: Document, tx: &mpsc::Sender<RunnerEvent>) -> Bound<Document> {
    bind_events!(document, {
        "fullscreenchange" => forward(tx, RunnerEvent::FullscreenChange),
    })
}

/// Mirrors the element into the shared state and fans events out to JS
/// listeners. Dropping the runner detaches every native listener.
pub struct PlayerRunner {
    inner: PlayerInnerHolder,
    shutdown_recv: broadcast::Receiver<()>,
    evt_recv: mpsc::Receiver<RunnerEvent>,

    video_element: Bound<HtmlVideoElement>,
    container: Option<Bound<HtmlElement>>,
    document: Option<Bound<Document>>,
}

impl PlayerRunner {
    pub fn new(inner: PlayerInnerHolder, shutdown_recv: broadcast::Receiver<()>) -> Self {
        let (tx, rx) = mpsc::channel(128);

        let video_element = bind_video(inner.acquire().video_element().unwrap(), &tx);
        let container = inner.acquire().container_element().map(|el| bind_container(el, &tx));
        let document = web_sys::window()
            .and_then(|w| w.document())
            .map(|doc| bind_document(doc, &tx));

        Self {
            inner,
            shutdown_recv,
            evt_recv: rx,
            video_element,
            container,
            document,
        }
    }

    pub async fn start(mut self) {
        self.sync_from_element();

        'running: loop {
            // wake on the controls hide deadline, or just poll
            let timeout = self
                .inner
                .acquire()
                .controls()
                .deadline_in(now_ms())
                .map(|ms| ms as u32)
                .unwrap_or(250);

            select! {
                _ = self.shutdown_recv.recv() => {
                    break 'running;
                }
                evt = self.evt_recv.recv() => {
                    match evt {
                        Some(evt) => self.handle_event(evt),
                        None => break 'running,
                    }
                }
                _ = TimeoutFuture::new(timeout) => {
                    let changed = self.inner.acquire_mut().controls_mut().poll(now_ms());
                    if changed {
                        self.dispatch(EventControlsChange { visible: false }.into());
                    }
                }
            }
        }

        self.dispatch(UserEvent::Destroyed);

        tracing::debug!("player runner stopped");
    }

    fn dispatch(&self, event: UserEvent) {
        self.inner.acquire_mut().events_mut().dispatch_event(event);
    }

    /// The element may already be mid-playback when we attach.
    fn sync_from_element(&mut self) {
        {
            let mut inner = self.inner.acquire_mut();
            let state = inner.state_mut();

            state.tick(self.video_element.current_time(), self.video_element.duration());
            state.is_muted = self.video_element.muted() || self.video_element.volume() == 0.0;
            if self.video_element.paused() {
                state.observe_paused();
            } else {
                state.observe_playing();
            }
        }

        let paused = self.video_element.paused();
        self.inner.acquire_mut().controls_mut().set_paused(now_ms(), paused);
    }

    fn element_is_fullscreen(&self) -> bool {
        let Some(document) = self.document.as_deref() else {
            return false;
        };

        document
            .fullscreen_element()
            .map(|el| {
                el.is_same_node(Some(self.video_element.unchecked_ref()))
                    || self
                        .container
                        .as_deref()
                        .map(|c| el.is_same_node(Some(c.unchecked_ref())))
                        .unwrap_or(false)
                    || el.contains(Some(self.video_element.unchecked_ref()))
            })
            .unwrap_or(false)
    }

    fn handle_event(&mut self, evt: RunnerEvent) {
        match evt {
            RunnerEvent::VideoPlay => {
                let changed = {
                    let mut inner = self.inner.acquire_mut();
                    inner.state_mut().observe_playing();
                    inner.controls_mut().set_paused(now_ms(), false)
                };
                self.dispatch(UserEvent::Play);
                if changed {
                    self.dispatch(EventControlsChange { visible: true }.into());
                }
            }
            RunnerEvent::VideoPause | RunnerEvent::VideoEnded => {
                let changed = {
                    let mut inner = self.inner.acquire_mut();
                    inner.state_mut().observe_paused();
                    inner.controls_mut().set_paused(now_ms(), true)
                };
                self.dispatch(if evt == RunnerEvent::VideoEnded {
                    UserEvent::Ended
                } else {
                    UserEvent::Pause
                });
                if changed {
                    self.dispatch(EventControlsChange { visible: true }.into());
                }
            }
            RunnerEvent::VideoTimeUpdate | RunnerEvent::VideoLoadedMetadata => {
                let current_time = self.video_element.current_time();
                let duration = self.video_element.duration();

                let progress = {
                    let mut inner = self.inner.acquire_mut();
                    inner.state_mut().tick(current_time, duration);
                    inner.state().progress
                };

                self.dispatch(
                    EventTimeUpdate {
                        current_time,
                        duration: if duration.is_finite() { duration } else { 0.0 },
                        progress,
                    }
                    .into(),
                );
            }
            RunnerEvent::VideoVolumeChange => {
                let volume = self.video_element.volume();
                let is_muted = self.video_element.muted() || volume == 0.0;

                self.inner.acquire_mut().state_mut().is_muted = is_muted;

                self.dispatch(EventVolumeChange { is_muted, volume }.into());
            }
            RunnerEvent::VideoRateChange => {
                let rate = self.video_element.playback_rate();
                match Speed::try_from(rate) {
                    Ok(speed) => {
                        self.inner.acquire_mut().state_mut().speed = speed;
                        self.dispatch(EventRateChange { speed: rate }.into());
                    }
                    Err(other) => {
                        tracing::warn!("ignoring playback rate outside the supported set: {}", other);
                    }
                }
            }
            RunnerEvent::FullscreenChange => {
                let is_full_screen = self.element_is_fullscreen();
                self.inner.acquire_mut().state_mut().is_full_screen = is_full_screen;
                self.dispatch(EventFullscreenChange { is_full_screen }.into());
            }
            RunnerEvent::PointerActivity => {
                let changed = self.inner.acquire_mut().controls_mut().interact(now_ms());
                if changed {
                    self.dispatch(EventControlsChange { visible: true }.into());
                }
            }
        }
    }
}
