use std::collections::HashMap;

use serde::Serialize;
use tsify::Tsify;
use wasm_bindgen::prelude::*;

#[derive(Tsify, Serialize)]
#[tsify(into_wasm_abi)]
pub struct EventTimeUpdate {
    pub current_time: f64,
    pub duration: f64,
    pub progress: f64,
}

#[derive(Tsify, Serialize)]
#[tsify(into_wasm_abi)]
pub struct EventRateChange {
    /// The numeric playback rate, one of 0.5, 1, 1.5, 2.
    pub speed: f64,
}

#[derive(Tsify, Serialize)]
#[tsify(into_wasm_abi)]
pub struct EventVolumeChange {
    pub is_muted: bool,
    pub volume: f64,
}

#[derive(Tsify, Serialize)]
#[tsify(into_wasm_abi)]
pub struct EventFullscreenChange {
    pub is_full_screen: bool,
}

#[derive(Tsify, Serialize)]
#[tsify(into_wasm_abi)]
pub struct EventControlsChange {
    pub visible: bool,
}

pub enum UserEvent {
    Play,
    Pause,
    TimeUpdate(EventTimeUpdate),
    RateChange(EventRateChange),
    VolumeChange(EventVolumeChange),
    FullscreenChange(EventFullscreenChange),
    ControlsChange(EventControlsChange),
    Ended,
    Destroyed,
}

impl UserEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::TimeUpdate(_) => "timeupdate",
            Self::RateChange(_) => "ratechange",
            Self::VolumeChange(_) => "volumechange",
            Self::FullscreenChange(_) => "fullscreenchange",
            Self::ControlsChange(_) => "controlschange",
            Self::Ended => "ended",
            Self::Destroyed => "destroyed",
        }
    }

    fn value(self) -> JsValue {
        match self {
            Self::Play | Self::Pause | Self::Ended | Self::Destroyed => JsValue::null(),
            Self::TimeUpdate(evt) => evt.into_js().unwrap().into(),
            Self::RateChange(evt) => evt.into_js().unwrap().into(),
            Self::VolumeChange(evt) => evt.into_js().unwrap().into(),
            Self::FullscreenChange(evt) => evt.into_js().unwrap().into(),
            Self::ControlsChange(evt) => evt.into_js().unwrap().into(),
        }
    }
}

impl From<EventTimeUpdate> for UserEvent {
    fn from(evt: EventTimeUpdate) -> Self {
        Self::TimeUpdate(evt)
    }
}

impl From<EventRateChange> for UserEvent {
    fn from(evt: EventRateChange) -> Self {
        Self::RateChange(evt)
    }
}

impl From<EventVolumeChange> for UserEvent {
    fn from(evt: EventVolumeChange) -> Self {
        Self::VolumeChange(evt)
    }
}

impl From<EventFullscreenChange> for UserEvent {
    fn from(evt: EventFullscreenChange) -> Self {
        Self::FullscreenChange(evt)
    }
}

impl From<EventControlsChange> for UserEvent {
    fn from(evt: EventControlsChange) -> Self {
        Self::ControlsChange(evt)
    }
}

struct EventListener {
    f: js_sys::Function,
    once: bool,
}

pub struct EventManager {
    events: HashMap<String, Vec<EventListener>>,
}

impl EventManager {
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
        }
    }

    pub fn add_event_listener(&mut self, event: &str, f: JsValue, once: bool) {
        let listeners = self.events.entry(event.to_string()).or_insert_with(Vec::new);
        listeners.push(EventListener { f: f.unchecked_into(), once });
    }

    pub fn remove_event_listener(&mut self, event: &str, f: JsValue) {
        if let Some(listeners) = self.events.get_mut(event) {
            listeners.retain(|x| !JsValue::eq(&x.f, &f));
        }

        if let Some(listeners) = self.events.get(event) {
            if listeners.is_empty() {
                self.events.remove(event);
            }
        }
    }

    pub fn dispatch_event(&mut self, event: impl Into<UserEvent>) {
        let event = event.into();
        let name = event.name();
        let evt = event.value();

        if let Some(listeners) = self.events.get_mut(name) {
            let mut remove_listeners = Vec::new();
            for (idx, listener) in listeners.iter().enumerate() {
                let func: &js_sys::Function = listener.f.unchecked_ref();
                if let Err(err) = func.call1(&JsValue::undefined(), &evt) {
                    tracing::error!("event target raised exception: {:?}", err);
                }

                if listener.once {
                    remove_listeners.push(idx);
                }
            }

            for idx in remove_listeners.into_iter().rev() {
                listeners.remove(idx);
            }
        }
    }
}
