use tokio::sync::broadcast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlElement, HtmlVideoElement};

use self::inner::PlayerInnerHolder;
use self::runner::PlayerRunner;
use self::state::{format_time, unmute_volume, Speed};
use self::util::now_ms;

mod events;
mod inner;
mod runner;
pub mod state;
mod util;

/// Controller for a single `<video>` element. The element stays the
/// source of truth; this mirrors it and exposes playback intents.
#[wasm_bindgen]
pub struct Player {
    shutdown_sender: broadcast::Sender<()>,
    inner: PlayerInnerHolder,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Player {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let inner = PlayerInnerHolder::default();
        let (shutdown_sender, _) = broadcast::channel(128);

        Self {
            shutdown_sender,
            inner,
        }
    }

    /// Binds the controller to a video element and starts mirroring it.
    pub fn attach(&self, el: HtmlVideoElement, container: Option<HtmlElement>) -> Result<(), JsValue> {
        if let Some(existing) = self.inner.acquire().video_element() {
            if existing.is_same_node(Some(&el)) {
                return Err(JsValue::from_str("element is already attached"));
            }
        }

        {
            let mut inner = self.inner.acquire_mut();
            inner.set_video_element(Some(el));
            inner.set_container_element(container);
        }

        self.shutdown();
        self.spawn_runner();

        Ok(())
    }

    /// Stops the runner and drops every native listener.
    pub fn detach(&self) {
        self.shutdown();

        let mut inner = self.inner.acquire_mut();
        inner.set_video_element(None);
        inner.set_container_element(None);
    }

    #[wasm_bindgen(js_name = togglePlay)]
    pub fn toggle_play(&self) -> Result<(), JsValue> {
        let element = self.video_element()?;

        if self.inner.acquire().state().is_playing {
            element.pause()?;
            return Ok(());
        }

        let generation = self.inner.acquire_mut().state_mut().begin_play();

        match element.play() {
            Ok(promise) => {
                let inner = self.inner.clone();
                spawn_local(async move {
                    if let Err(err) = JsFuture::from(promise).await {
                        tracing::warn!("play request rejected: {:?}", err);
                        inner.acquire_mut().state_mut().play_rejected(generation);
                    }
                });
            }
            Err(err) => {
                self.inner.acquire_mut().state_mut().play_rejected(generation);
                return Err(err);
            }
        }

        Ok(())
    }

    /// Seeks to a percentage of the duration. Progress moves
    /// optimistically; the element catches up via timeupdate.
    pub fn seek(&self, percent: f64) -> Result<(), JsValue> {
        let element = self.video_element()?;

        if let Some(target) = self.inner.acquire_mut().state_mut().seek(percent) {
            element.set_current_time(target);
        }

        Ok(())
    }

    #[wasm_bindgen(js_name = setSpeed)]
    pub fn set_speed(&self, speed: f64) -> Result<(), JsValue> {
        let element = self.video_element()?;

        let speed = Speed::try_from(speed)
            .map_err(|other| JsValue::from_str(&format!("unsupported playback rate: {}", other)))?;

        element.set_playback_rate(speed.as_f64());

        Ok(())
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) -> Result<(), JsValue> {
        let element = self.video_element()?;

        if self.inner.acquire().state().is_muted {
            element.set_muted(false);
            element.set_volume(unmute_volume(element.volume()));
        } else {
            element.set_muted(true);
        }

        Ok(())
    }

    /// Fullscreen failures are logged and swallowed; the flag only moves
    /// on a real fullscreenchange event.
    #[wasm_bindgen(js_name = toggleFullscreen)]
    pub fn toggle_fullscreen(&self) {
        if self.inner.acquire().state().is_full_screen {
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                document.exit_fullscreen();
            }
            return;
        }

        let target = self
            .inner
            .acquire()
            .container_element()
            .map(web_sys::Element::from)
            .or_else(|| self.inner.acquire().video_element().map(web_sys::Element::from));

        if let Some(target) = target {
            if let Err(err) = target.request_fullscreen() {
                tracing::warn!("fullscreen request rejected: {:?}", err);
            }
        }
    }

    #[wasm_bindgen(js_name = setDragging)]
    pub fn set_dragging(&self, dragging: bool) {
        self.inner.acquire_mut().controls_mut().set_dragging(now_ms(), dragging);
    }

    #[wasm_bindgen(getter, js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.inner.acquire().state().is_playing
    }

    #[wasm_bindgen(getter)]
    pub fn progress(&self) -> f64 {
        self.inner.acquire().state().progress
    }

    #[wasm_bindgen(getter)]
    pub fn duration(&self) -> f64 {
        self.inner.acquire().state().duration
    }

    #[wasm_bindgen(getter)]
    pub fn speed(&self) -> f64 {
        self.inner.acquire().state().speed.as_f64()
    }

    #[wasm_bindgen(getter, js_name = isMuted)]
    pub fn is_muted(&self) -> bool {
        self.inner.acquire().state().is_muted
    }

    #[wasm_bindgen(getter, js_name = isFullScreen)]
    pub fn is_full_screen(&self) -> bool {
        self.inner.acquire().state().is_full_screen
    }

    #[wasm_bindgen(getter, js_name = controlsVisible)]
    pub fn controls_visible(&self) -> bool {
        self.inner.acquire().controls().visible()
    }

    /// `MM:SS` rendering of a second count, for the scrubber labels.
    #[wasm_bindgen(js_name = formatTime)]
    pub fn format_time(seconds: f64) -> String {
        format_time(seconds)
    }

    #[wasm_bindgen(js_name = addEventListener)]
    pub fn add_event_listener(&self, event: &str, f: JsValue, once: Option<bool>) {
        self.inner
            .acquire_mut()
            .events_mut()
            .add_event_listener(event, f, once.unwrap_or(false));
    }

    #[wasm_bindgen(js_name = removeEventListener)]
    pub fn remove_event_listener(&self, event: &str, f: JsValue) {
        self.inner.acquire_mut().events_mut().remove_event_listener(event, f);
    }

    pub fn shutdown(&self) {
        self.shutdown_sender.send(()).ok();
    }
}

impl Player {
    fn video_element(&self) -> Result<HtmlVideoElement, JsValue> {
        self.inner
            .acquire()
            .video_element()
            .ok_or_else(|| JsValue::from_str("no element attached"))
    }

    fn spawn_runner(&self) {
        spawn_local(PlayerRunner::new(self.inner.clone(), self.shutdown_sender.subscribe()).start());
    }
}
