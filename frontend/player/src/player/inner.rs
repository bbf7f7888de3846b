use std::cell::{Cell, Ref, RefCell, RefMut};
use std::panic::Location;
use std::rc::Rc;

use web_sys::{HtmlElement, HtmlVideoElement};

use super::events::EventManager;
use super::state::{ControlsState, PlaybackState};

pub struct PlayerInner {
    video_element: Option<HtmlVideoElement>,
    container_element: Option<HtmlElement>,
    state: PlaybackState,
    controls: ControlsState,
    events: EventManager,
}

impl Default for PlayerInner {
    fn default() -> Self {
        Self {
            video_element: None,
            container_element: None,
            state: PlaybackState::default(),
            controls: ControlsState::default(),
            events: EventManager::new(),
        }
    }
}

#[derive(Default, Clone)]
pub struct PlayerInnerHolder {
    inner: Rc<RefCell<PlayerInner>>,
    previous_holder: Cell<Option<&'static Location<'static>>>,
}

impl PlayerInnerHolder {
    const ACQUIRE_ERROR: &'static str = r#"We failed to borrow the inner state, this is a bug!
Likely caused by holding a reference to the inner state across an await point."#;

    #[track_caller]
    pub fn acquire(&self) -> Ref<'_, PlayerInner> {
        let Ok(inner) = self.inner.try_borrow() else {
            tracing::error!(
                "{}\nPrevious hold at: {}\nNew hold at: {}",
                Self::ACQUIRE_ERROR,
                self.previous_holder.get().map(|l| l.to_string()).unwrap_or_default(),
                Location::caller()
            );
            unreachable!("{}", Self::ACQUIRE_ERROR)
        };

        self.previous_holder.set(Some(Location::caller()));

        inner
    }

    #[track_caller]
    pub fn acquire_mut(&self) -> RefMut<'_, PlayerInner> {
        let Ok(inner) = self.inner.try_borrow_mut() else {
            tracing::error!(
                "{}\nPrevious hold at: {}\nNew hold at: {}",
                Self::ACQUIRE_ERROR,
                self.previous_holder.get().map(|l| l.to_string()).unwrap_or_default(),
                Location::caller()
            );
            unreachable!("{}", Self::ACQUIRE_ERROR)
        };

        self.previous_holder.set(Some(Location::caller()));

        inner
    }
}

impl PlayerInner {
    pub fn video_element(&self) -> Option<HtmlVideoElement> {
        self.video_element.clone()
    }

    pub fn set_video_element(&mut self, element: Option<HtmlVideoElement>) {
        self.video_element = element;
    }

    pub fn container_element(&self) -> Option<HtmlElement> {
        self.container_element.clone()
    }

    pub fn set_container_element(&mut self, element: Option<HtmlElement>) {
        self.container_element = element;
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut PlaybackState {
        &mut self.state
    }

    pub fn controls(&self) -> &ControlsState {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut ControlsState {
        &mut self.controls
    }

    pub fn events_mut(&mut self) -> &mut EventManager {
        &mut self.events
    }
}
