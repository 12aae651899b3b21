//! Admin review screen: pending submissions, approve or reject, and the
//! semester promotion job.

use yew::prelude::*;

mod helpers;
mod messages;
mod props;
mod state;
mod update;
mod view;

pub use messages::Msg;
pub use props::ReviewProps;
pub use state::ReviewComponent;

impl Component for ReviewComponent {
    type Message = Msg;
    type Properties = ReviewProps;

    fn create(_ctx: &Context<Self>) -> Self {
        ReviewComponent::new()
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
            ctx.link().send_message(Msg::Load);
        }
    }
}
