#![forbid(unsafe_code)]

//! DOM event names and identity-aware listener wiring.
//!
//! A [`Listener`] compares by identity, not behaviour: two listeners built
//! from identical closures are different, while clones of one listener are
//! the same. [`listen`] relies on that to stay idempotent.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::element::Element;
use crate::error::DomError;

/// DOM events pue attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventType {
    Change,
    Input,
    Click,
    DoubleClick,
    KeyDown,
    KeyUp,
    MouseEnter,
    MouseLeave,
    MouseMove,
    ContextMenu,
    DragStart,
    DragEnd,
    DragOver,
    Drop,
    TouchStart,
    TouchEnd,
    TouchMove,
    TouchCancel,
    DomContentLoaded,
}

impl EventType {
    pub const ALL: [Self; 19] = [
        Self::Change,
        Self::Input,
        Self::Click,
        Self::DoubleClick,
        Self::KeyDown,
        Self::KeyUp,
        Self::MouseEnter,
        Self::MouseLeave,
        Self::MouseMove,
        Self::ContextMenu,
        Self::DragStart,
        Self::DragEnd,
        Self::DragOver,
        Self::Drop,
        Self::TouchStart,
        Self::TouchEnd,
        Self::TouchMove,
        Self::TouchCancel,
        Self::DomContentLoaded,
    ];

    /// The DOM event type string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Input => "input",
            Self::Click => "click",
            Self::DoubleClick => "dblclick",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::MouseMove => "mousemove",
            Self::ContextMenu => "contextmenu",
            Self::DragStart => "dragstart",
            Self::DragEnd => "dragend",
            Self::DragOver => "dragover",
            Self::Drop => "drop",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::TouchMove => "touchmove",
            Self::TouchCancel => "touchcancel",
            Self::DomContentLoaded => "DOMContentLoaded",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = DomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| DomError::conversion(s, "EventType"))
    }
}

/// A shared, identity-compared event callback.
#[derive(Clone)]
pub struct Listener(Rc<dyn Fn()>);

impl Listener {
    pub fn new(callback: impl Fn() + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// Invoke the callback.
    pub fn call(&self) {
        (self.0)();
    }

    /// Identity key; stable while any clone of this listener is alive.
    #[must_use]
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0).cast::<()>() as usize
    }

    /// Whether `other` is a clone of this listener.
    #[must_use]
    pub fn same(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&format_args!("{:#x}", self.id()))
            .finish()
    }
}

/// Attach `listener` for `event` on every element, first detaching any
/// earlier registration of the same listener so it is never stacked.
pub fn listen<E: Element>(elements: &[E], event: EventType, listener: &Listener) {
    for element in elements {
        element.remove_listener(event, listener);
        element.add_listener(event, listener);
    }
    tracing::trace!(
        message = "event.listen",
        event = event.as_str(),
        elements = elements.len()
    );
}

/// Set inline style properties on every element.
pub fn style<E: Element>(elements: &[E], properties: &[(&str, &str)]) {
    for element in elements {
        for (property, value) in properties {
            element.set_style(property, value);
        }
    }
}

macro_rules! event_helpers {
    ($($name:ident => $variant:ident),* $(,)?) => {
        $(
            #[doc = concat!("[`listen`] for [`EventType::", stringify!($variant), "`].")]
            pub fn $name<E: Element>(elements: &[E], listener: &Listener) {
                listen(elements, EventType::$variant, listener);
            }
        )*
    };
}

event_helpers! {
    on_click => Click,
    on_double_click => DoubleClick,
    on_key_down => KeyDown,
    on_key_up => KeyUp,
    on_mouse_enter => MouseEnter,
    on_mouse_leave => MouseLeave,
    on_mouse_move => MouseMove,
    on_context_menu => ContextMenu,
    on_drag_start => DragStart,
    on_drag_end => DragEnd,
    on_drag_over => DragOver,
    on_drop => Drop,
    on_touch_start => TouchStart,
    on_touch_end => TouchEnd,
    on_touch_move => TouchMove,
    on_touch_cancel => TouchCancel,
}
