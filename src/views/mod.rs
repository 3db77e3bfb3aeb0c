//! Settings views and the start-up router.
//!
//! # Views
//! - `proxy`: pricing proxy endpoints with save/clear and reachability feedback
//! - `rightcodes_login`: Right.codes credential exchange
//!
//! The selector is read once at start-up; there is no switching between views
//! afterwards.

pub mod field;
pub mod proxy;
pub mod rightcodes_login;

use crate::backend::{Request, Response};
use crate::ui::{Document, Surface, UiError, UiEvent, MOUNT_ID};

pub use proxy::ProxyView;
pub use rightcodes_login::RightcodesLoginView;

/// Selector value for the proxy view.
pub const PROXY_VIEW: &str = "proxy";
/// Selector value for the Right.codes login view.
pub const RIGHTCODES_LOGIN_VIEW: &str = "rightcodes_login";

/// The single view owning the mount container.
pub enum MountedView {
    Proxy(ProxyView),
    RightcodesLogin(RightcodesLoginView),
}

impl MountedView {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Proxy(_) => "Proxy settings",
            Self::RightcodesLogin(_) => "Right.codes login",
        }
    }

    pub fn handle<S: Surface>(&mut self, surface: &mut S, event: UiEvent) -> Option<Request> {
        match self {
            Self::Proxy(view) => view.handle(surface, event),
            Self::RightcodesLogin(view) => view.handle(surface, event),
        }
    }

    /// Whether key presses may edit the focused input.
    pub fn accepts_edits(&self) -> bool {
        match self {
            Self::Proxy(view) => view.accepts_edits(),
            Self::RightcodesLogin(_) => true,
        }
    }

    pub fn complete<S: Surface>(&mut self, surface: &mut S, response: Response) {
        match self {
            Self::Proxy(view) => view.complete(surface, response),
            Self::RightcodesLogin(view) => view.complete(surface, response),
        }
    }
}

/// Result of routing: the mounted view plus the request it wants issued first.
pub struct Mounted {
    pub view: MountedView,
    pub initial: Option<Request>,
}

/// Mounts the view named by `selector` into the document's mount container.
///
/// Unknown or missing selectors leave the container empty and return `None`.
///
/// # Errors
/// - [`UiError::MissingElement`] if the document has no mount container
pub fn mount(document: &mut Document, selector: Option<&str>) -> Result<Option<Mounted>, UiError> {
    let container = document.container_mut(MOUNT_ID)?;

    let mounted = match selector {
        Some(PROXY_VIEW) => {
            let (view, load) = ProxyView::mount(container);
            Some(Mounted {
                view: MountedView::Proxy(view),
                initial: Some(load),
            })
        }
        Some(RIGHTCODES_LOGIN_VIEW) => Some(Mounted {
            view: MountedView::RightcodesLogin(RightcodesLoginView::mount(container)),
            initial: None,
        }),
        other => {
            tracing::warn!("No view for selector {:?}", other);
            container.clear();
            None
        }
    };

    Ok(mounted)
}
