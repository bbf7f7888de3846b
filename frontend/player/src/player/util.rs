use std::ops::{Deref, DerefMut};

use wasm_bindgen::JsCast;

type Detach = Box<dyn FnOnce(&web_sys::EventTarget)>;

/// A JS event target bundled with the native listeners attached to it.
/// Dropping the binding removes every listener, so nothing keeps firing
/// into a player that has been detached.
pub struct Bound<T: JsCast> {
    target: T,
    detach: Option<Detach>,
}

impl<T: JsCast> Bound<T> {
    pub fn new(target: T, detach: Detach) -> Self {
        Self {
            target,
            detach: Some(detach),
        }
    }
}

impl<T: JsCast> Deref for Bound<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.target
    }
}

impl<T: JsCast> DerefMut for Bound<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.target
    }
}

impl<T: JsCast> Drop for Bound<T> {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach(self.target.unchecked_ref());
        }
    }
}

/// Attaches a handler per event-name group to a target and yields the
/// [`Bound`] wrapper that detaches them all on drop.
macro_rules! bind_events {
    ($target:expr, {
        $(
            $($evt:literal)|+ => $handler:expr
        ),* $(,)?
    }) => {{
        let target = $target;
        let mut listeners: Vec<(
            Vec<&'static str>,
            wasm_bindgen::closure::Closure<dyn FnMut(web_sys::Event)>,
        )> = Vec::new();

        $(
            let callback = wasm_bindgen::closure::Closure::<dyn FnMut(web_sys::Event)>::new($handler);
            let names = vec![$($evt),+];
            for name in &names {
                target
                    .add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
                    .unwrap();
            }
            listeners.push((names, callback));
        )*

        $crate::player::util::Bound::new(
            target,
            Box::new(move |target: &web_sys::EventTarget| {
                for (names, callback) in listeners {
                    for name in names {
                        target
                            .remove_event_listener_with_callback(name, callback.as_ref().unchecked_ref())
                            .unwrap();
                    }
                }
            }),
        )
    }};
}

pub(super) use bind_events;

/// Millisecond monotonic clock, `performance.now()`.
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_default()
}
