use wasm_bindgen::prelude::*;

/// Why a play request rejected. An abort means a newer request
/// superseded it, anything else means the browser refused playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayRejection {
    Aborted,
    Other,
}

/// Ambient audio playlist. Pure so the cycling and gating rules are
/// testable off the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistState {
    tracks: Vec<String>,
    current: usize,
    interacted: bool,
    intent_playing: bool,
}

impl PlaylistState {
    pub fn new(tracks: Vec<String>) -> Self {
        Self {
            tracks,
            current: 0,
            interacted: false,
            intent_playing: false,
        }
    }

    pub fn current_track(&self) -> Option<&str> {
        self.tracks.get(self.current).map(String::as_str)
    }

    pub fn is_playing(&self) -> bool {
        self.intent_playing
    }

    /// First user gesture. Nothing plays before this, browsers block
    /// unprompted audio anyway.
    pub fn mark_interacted(&mut self) {
        self.interacted = true;
    }

    /// Returns whether playback may actually start.
    pub fn request_play(&mut self) -> bool {
        if !self.interacted || self.tracks.is_empty() {
            return false;
        }

        self.intent_playing = true;
        true
    }

    pub fn pause(&mut self) {
        self.intent_playing = false;
    }

    pub fn next(&mut self) -> Option<&str> {
        if self.tracks.is_empty() {
            return None;
        }

        self.current = (self.current + 1) % self.tracks.len();
        self.current_track()
    }

    pub fn previous(&mut self) -> Option<&str> {
        if self.tracks.is_empty() {
            return None;
        }

        self.current = (self.current + self.tracks.len() - 1) % self.tracks.len();
        self.current_track()
    }

    /// A play promise rejected. An aborted request was superseded by a
    /// newer one, so the intent stands; any other failure reverts to
    /// paused.
    pub fn handle_rejection(&mut self, rejection: PlayRejection) {
        if rejection == PlayRejection::Other {
            self.intent_playing = false;
        }
    }
}

/// Thin JS binding over [`PlaylistState`].
#[wasm_bindgen]
pub struct Playlist {
    state: PlaylistState,
}

#[wasm_bindgen]
impl Playlist {
    #[wasm_bindgen(constructor)]
    pub fn new(tracks: Vec<String>) -> Self {
        Self {
            state: PlaylistState::new(tracks),
        }
    }

    #[wasm_bindgen(js_name = markInteracted)]
    pub fn mark_interacted(&mut self) {
        self.state.mark_interacted();
    }

    #[wasm_bindgen(js_name = requestPlay)]
    pub fn request_play(&mut self) -> bool {
        self.state.request_play()
    }

    pub fn pause(&mut self) {
        self.state.pause();
    }

    pub fn next(&mut self) -> Option<String> {
        self.state.next().map(str::to_owned)
    }

    pub fn previous(&mut self) -> Option<String> {
        self.state.previous().map(str::to_owned)
    }

    #[wasm_bindgen(getter, js_name = currentTrack)]
    pub fn current_track(&self) -> Option<String> {
        self.state.current_track().map(str::to_owned)
    }

    #[wasm_bindgen(getter, js_name = isPlaying)]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// `name` is the DOMException name off the rejected play promise.
    #[wasm_bindgen(js_name = handleRejection)]
    pub fn handle_rejection(&mut self, name: &str) {
        let rejection = if name == "AbortError" {
            PlayRejection::Aborted
        } else {
            PlayRejection::Other
        };

        self.state.handle_rejection(rejection);
    }
}
