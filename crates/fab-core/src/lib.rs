#![forbid(unsafe_code)]

//! Platform-independent substrate for the fab widget: screen-space
//! geometry, easing curves, the tween timeline, aggregate completion
//! groups, and `Rc`-based observables for host-event reactivity.
//!
//! Everything here is single-threaded and event-loop driven: animations
//! progress only on explicit ticks, and all callbacks run synchronously
//! on the loop that ticked them.

pub mod easing;
pub mod geometry;
pub mod group;
pub mod observable;
pub mod timeline;

pub use easing::Easing;
pub use geometry::{Insets, Point, Rect, Size};
pub use group::{CompletionGroup, CompletionTicket};
pub use observable::{Observable, Subscription, SubscriptionSet};
pub use timeline::{Completion, Timeline, Tween, Visual, VisualHandle};
