//! Root component: picks the screen from the page path.
//!
//! - `/register/{form_id}`: public registration form.
//! - `/admin`: submission review.

use yew::prelude::*;

use crate::components::registration::RegistrationForm;
use crate::components::review::ReviewComponent;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
    Register(String),
    Review,
    Unknown,
}

pub fn page_for_path(path: &str) -> Page {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["register", form_id] => Page::Register(form_id.to_string()),
        ["admin"] | ["admin", ..] => Page::Review,
        _ => Page::Unknown,
    }
}

pub struct App {
    page: Page,
}

impl Component for App {
    type Message = ();
    type Properties = ();

    fn create(_ctx: &Context<Self>) -> Self {
        let path = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_default();
        Self {
            page: page_for_path(&path),
        }
    }

    fn view(&self, _ctx: &Context<Self>) -> Html {
        match &self.page {
            Page::Register(form_id) => html! { <RegistrationForm form_id={form_id.clone()} /> },
            Page::Review => html! { <ReviewComponent /> },
            Page::Unknown => html! {
                <div class="not-found">
                    <h1>{ "Student registration" }</h1>
                    <p>{ "Open the registration link you were given, or /admin to review submissions." }</p>
                </div>
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_by_path() {
        assert_eq!(page_for_path("/register/abc-123"), Page::Register("abc-123".to_string()));
        assert_eq!(page_for_path("/register/abc-123/"), Page::Register("abc-123".to_string()));
        assert_eq!(page_for_path("/admin"), Page::Review);
        assert_eq!(page_for_path("/admin/submissions"), Page::Review);
        assert_eq!(page_for_path("/register"), Page::Unknown);
        assert_eq!(page_for_path("/"), Page::Unknown);
    }
}
