//! Sheet that slides down from the top of the page.
//!
//! The sheet stays in the DOM; `open_top_sheet` and `close_top_sheet` toggle the
//! `show` class on the element behind `node_ref`.

use yew::{html, AttrValue, Callback, Component, Context, Html, MouseEvent, NodeRef, Properties};

const SHOW_CLASS: &str = "show";
const TRANSITION_DELAY_MILLIS: u32 = 50;

pub struct YwMaterialTopSheet;

#[derive(Properties, PartialEq)]
pub struct Props {
    #[prop_or_default]
    pub children: Html,
    pub node_ref: NodeRef,
    /// Fired by the sheet's own close button.
    #[prop_or_default]
    pub on_close: Option<Callback<MouseEvent>>,
    #[prop_or(AttrValue::Static("Close"))]
    pub close_label: AttrValue,
}

impl Component for YwMaterialTopSheet {
    type Message = ();
    type Properties = Props;

    fn create(_ctx: &Context<Self>) -> Self {
        YwMaterialTopSheet
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let props = ctx.props();
        let onclick = props.on_close.clone().unwrap_or_else(|| {
            let node_ref = props.node_ref.clone();
            Callback::from(move |_| close_top_sheet(node_ref.clone()))
        });
        html! {
            <div class="top-sheet" ref={props.node_ref.clone()}>
                { props.children.clone() }
                <button class="top-sheet-close" {onclick}>{ props.close_label.clone() }</button>
            </div>
        }
    }
}

pub fn open_top_sheet(top_sheet_ref: NodeRef) {
    toggle(top_sheet_ref, true);
}

pub fn close_top_sheet(top_sheet_ref: NodeRef) {
    toggle(top_sheet_ref, false);
}

// Deferred so a sheet rendered in the same frame still animates.
fn toggle(top_sheet_ref: NodeRef, show: bool) {
    wasm_bindgen_futures::spawn_local(async move {
        gloo_timers::future::TimeoutFuture::new(TRANSITION_DELAY_MILLIS).await;
        if let Some(top_sheet) = top_sheet_ref.cast::<web_sys::HtmlElement>() {
            let classes = top_sheet.class_list();
            let result = if show {
                classes.add_1(SHOW_CLASS)
            } else {
                classes.remove_1(SHOW_CLASS)
            };
            result.ok();
        }
    });
}
