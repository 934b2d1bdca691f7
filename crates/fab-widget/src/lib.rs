#![forbid(unsafe_code)]

//! A floating action button: a circular control that expands into a
//! stacked menu of items with staggered, strategy-selectable open and
//! close animations.
//!
//! The widget is renderer-agnostic: it owns interaction state, layout,
//! and animation, and the host draws from the visual state it exposes
//! ([`Fab::button_visual`], per-item visuals, the overlay and title
//! label) while feeding input events and timeline ticks back in.
//!
//! ```
//! use fab_widget::{Fab, FabConfig, OpenAnimationType};
//!
//! let fab = Fab::with_config(
//!     FabConfig::default().open_animation_type(OpenAnimationType::SlideUp),
//! );
//! fab.add_titled_with("Map", |_| println!("map selected"));
//! fab.toggle();
//! fab.tick(0.5); // host event loop drives the animations
//! assert!(!fab.is_closed());
//! ```

pub mod animation;
pub mod delegate;
pub mod fab;
pub mod item;
pub mod label;
pub mod overlay;
pub mod placement;
pub mod reactivity;
pub mod style;

pub use animation::{
    AnimationContext, OpenAnimationType, Schedule, TweenTarget, TransitionAnimator, TweenSpec,
    VerticalDirection,
};
pub use delegate::FabDelegate;
pub use fab::{Fab, FabConfig};
pub use item::{FabItem, FabItemBuilder, ItemDefaults, ItemHandler, LabelPosition};
pub use label::TitleLabel;
pub use overlay::Overlay;
pub use placement::{anchor_frame, LayoutDirection, Placement, PlacementInput, DEFAULT_SCREEN};
pub use reactivity::{HostSignals, OrientationChange};
pub use style::{FontMetrics, Rgba};
