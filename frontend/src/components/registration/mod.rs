//! Public registration form.
//!
//! Loads the public view of a form plus the reference data its dropdowns need,
//! renders the fields grouped by section, checks answers with the same rules the
//! server applies, and posts everything as one multipart request.

use common::model::form::Form;
use common::model::reference::{AcademicYear, College, Course};
use common::render::ReferenceData;
use yew::platform::spawn_local;
use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

use crate::components::api::{get_json, ApiFailure};
use crate::components::notify::{show_toast, Tone};
pub use messages::Msg;
pub use props::RegistrationProps;
pub use state::RegistrationForm;

impl Component for RegistrationForm {
    type Message = Msg;
    type Properties = RegistrationProps;

    fn create(_ctx: &Context<Self>) -> Self {
        RegistrationForm::new()
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        update::update(self, ctx, msg)
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        view::view(self, ctx)
    }

    fn rendered(&mut self, ctx: &Context<Self>, first_render: bool) {
        if first_render && !self.loaded {
            self.loaded = true;

            let link = ctx.link().clone();
            let form_id = ctx.props().form_id.clone();
            spawn_local(async move {
                match get_json::<Form>(&format!("/api/forms/public/{}", form_id), &[]).await {
                    Ok(form) => link.send_message(Msg::FormLoaded(form)),
                    Err(err) => link.send_message(Msg::LoadFailed(err)),
                }
            });

            let link = ctx.link().clone();
            spawn_local(async move {
                match load_reference().await {
                    Ok(reference) => link.send_message(Msg::ReferenceLoaded(reference)),
                    Err(err) => show_toast(
                        &format!("Could not load colleges and courses: {}", err),
                        Tone::Error,
                    ),
                }
            });
        }
    }
}

async fn load_reference() -> Result<ReferenceData, ApiFailure> {
    Ok(ReferenceData {
        colleges: get_json::<Vec<College>>("/api/colleges/public", &[]).await?,
        courses: get_json::<Vec<Course>>("/api/courses/options", &[]).await?,
        academic_years: get_json::<Vec<AcademicYear>>("/api/academic-years/public", &[]).await?,
    })
}
